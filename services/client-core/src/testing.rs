//! テスト用モッククライアント
//!
//! コマンド型ごとに応答を登録し、受け取った入力とオプションを記録する。
//!
//! ```ignore
//! let mock = MockClient::<DynamoDb>::new();
//! mock.on::<PutItemInputBuilder>().resolves(PutItemOutput::builder().build());
//!
//! let dynamodb = DynamoDbService::new(mock.clone());
//! dynamodb.put_item(args.clone()).await?;
//!
//! assert_eq!(mock.received::<PutItemInputBuilder>(), vec![args]);
//! ```
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use aws_smithy_runtime_api::client::result::SdkError;

use crate::client::ClientInstance;
use crate::command::{AwsService, Command, CommandResult};
use crate::config::HandlerOptions;

/// 登録された応答
type Responder<S, C> = Arc<dyn Fn(&C) -> CommandResult<C, S> + Send + Sync>;

/// 記録された呼び出し
struct RecordedCall {
    type_id: TypeId,
    input: Box<dyn Any + Send + Sync>,
    options: HandlerOptions,
}

#[derive(Default)]
struct MockState {
    /// コマンド型 -> Responder<S, C>
    responders: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    calls: Vec<RecordedCall>,
}

/// ClientInstanceのモック実装
///
/// cloneしたモックは状態を共有する。
pub struct MockClient<S: AwsService> {
    state: Arc<Mutex<MockState>>,
    _service: PhantomData<fn() -> S>,
}

impl<S: AwsService> MockClient<S> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            _service: PhantomData,
        }
    }

    /// 登録した応答と記録をすべて消去
    pub fn reset(&self) -> &Self {
        let mut state = self.lock();
        state.responders.clear();
        state.calls.clear();
        self
    }

    /// コマンド型`C`の応答を登録する
    pub fn on<C: Command<S>>(&self) -> MockBehavior<'_, S, C> {
        MockBehavior {
            mock: self,
            _command: PhantomData,
        }
    }

    /// コマンド型`C`で受け取った入力（受信順）
    pub fn received<C: Command<S>>(&self) -> Vec<C> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.type_id == TypeId::of::<C>())
            .filter_map(|call| call.input.downcast_ref::<C>().cloned())
            .collect()
    }

    /// コマンド型`C`の受信回数
    pub fn received_times<C: Command<S>>(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.type_id == TypeId::of::<C>())
            .count()
    }

    /// コマンド型`C`を指定した入力で受け取ったか
    pub fn received_with<C: Command<S>>(&self, input: &C) -> bool {
        self.received::<C>().iter().any(|received| received == input)
    }

    /// コマンド型`C`で受け取った呼び出し単位のオプション
    pub fn received_options<C: Command<S>>(&self) -> Vec<HandlerOptions> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.type_id == TypeId::of::<C>())
            .map(|call| call.options.clone())
            .collect()
    }

    /// すべてのコマンドの受信回数
    pub fn total_calls(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register<C: Command<S>>(&self, responder: Responder<S, C>) {
        self.lock()
            .responders
            .insert(TypeId::of::<C>(), Box::new(responder));
    }

    fn responder<C: Command<S>>(&self) -> Option<Responder<S, C>> {
        self.lock()
            .responders
            .get(&TypeId::of::<C>())
            .and_then(|responder| responder.downcast_ref::<Responder<S, C>>())
            .cloned()
    }
}

impl<S: AwsService> Default for MockClient<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AwsService> Clone for MockClient<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            _service: PhantomData,
        }
    }
}

impl<S: AwsService> fmt::Debug for MockClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockClient")
            .field("service", &S::NAME)
            .field("calls", &self.total_calls())
            .finish()
    }
}

#[async_trait]
impl<S: AwsService> ClientInstance<S> for MockClient<S> {
    async fn send<C: Command<S>>(&self, command: C, options: &HandlerOptions) -> CommandResult<C, S> {
        let responder = self.responder::<C>();

        self.lock().calls.push(RecordedCall {
            type_id: TypeId::of::<C>(),
            input: Box::new(command.clone()),
            options: options.clone(),
        });

        match responder {
            Some(responder) => (*responder)(&command),
            None => Err(SdkError::construction_failure(format!(
                "no mock response configured for {}",
                C::NAME
            ))),
        }
    }
}

/// 1つのコマンド型に対する応答の登録
pub struct MockBehavior<'a, S: AwsService, C: Command<S>> {
    mock: &'a MockClient<S>,
    _command: PhantomData<fn() -> C>,
}

impl<S: AwsService, C: Command<S>> MockBehavior<'_, S, C> {
    /// 常に指定した出力を返す
    pub fn resolves(self, output: C::Output)
    where
        C::Output: Clone + Sync,
    {
        self.responds_with(move |_| Ok(output.clone()));
    }

    /// 常に指定したSDKエラーで失敗する
    pub fn rejects_with<F>(self, error: F)
    where
        F: Fn() -> SdkError<C::Error, HttpResponse> + Send + Sync + 'static,
    {
        self.responds_with(move |_| Err(error()));
    }

    /// 入力に応じて応答する
    pub fn responds_with<F>(self, respond: F)
    where
        F: Fn(&C) -> CommandResult<C, S> + Send + Sync + 'static,
    {
        self.mock.register::<C>(Arc::new(respond));
    }
}

#[cfg(test)]
pub(crate) use self::fixtures::{TestCommand, TestError, TestKind, TestService};


#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SdkClient;
    use aws_config::SdkConfig;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unconfigured_command_fails_and_is_recorded() {
        let mock = MockClient::<TestService>::new();

        let result = mock
            .send(TestCommand::new("ping"), &HandlerOptions::default())
            .await;

        assert!(matches!(result, Err(SdkError::ConstructionFailure(_))));
        assert_eq!(mock.received_times::<TestCommand>(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears_state() {
        let mock = MockClient::<TestService>::new();
        mock.on::<TestCommand>().resolves("pong".to_string());
        mock.send(TestCommand::new("ping"), &HandlerOptions::default())
            .await
            .unwrap();

        mock.reset();

        assert_eq!(mock.total_calls(), 0);
        let result = mock
            .send(TestCommand::new("ping"), &HandlerOptions::default())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_responds_with_sees_input() {
        let mock = MockClient::<TestService>::new();
        mock.on::<TestCommand>()
            .responds_with(|command| Ok(command.payload.to_uppercase()));

        let output = mock
            .send(TestCommand::new("hello"), &HandlerOptions::default())
            .await
            .unwrap();

        assert_eq!(output, "HELLO");
        assert!(mock.received_with(&TestCommand::new("hello")));
        assert!(!mock.received_with(&TestCommand::new("other")));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockClient::<TestService>::new();
        let cloned = mock.clone();
        cloned.on::<TestCommand>().resolves("pong".to_string());

        mock.send(TestCommand::new("ping"), &HandlerOptions::default())
            .await
            .unwrap();

        assert_eq!(cloned.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_sdk_client_dispatches_command() {
        let client = SdkClient::<TestService>::new(SdkConfig::builder().build());

        let output = client
            .send(TestCommand::new("ping"), &HandlerOptions::default())
            .await
            .unwrap();

        assert_eq!(output, "ping");
    }

    #[tokio::test]
    async fn test_sdk_client_applies_handler_options() {
        let client = SdkClient::<TestService>::new(SdkConfig::builder().build());
        let options = HandlerOptions::with_request_timeout(Duration::from_millis(1000));

        let output = client.send(TestCommand::new("ping"), &options).await.unwrap();

        assert_eq!(output, "ping (1000ms)");
        // 元のクライアントは変更されない
        assert!(client.client().timeout_config().is_none());
    }
}
