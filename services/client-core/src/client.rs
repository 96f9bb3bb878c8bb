/// クライアントコンテキスト
///
/// [`ClientInstance`]はコマンドを送信する抽象で、本物のSDKクライアント
/// （[`SdkClient`]）とテスト用モックを差し替えられるようにします。
/// [`ClientLayer`]は設定と、そこから一度だけ構築されるクライアントを保持します。
use std::fmt;

use async_trait::async_trait;
use aws_config::SdkConfig;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::command::{AwsService, Command, CommandResult};
use crate::config::{ClientOptions, HandlerOptions};

/// コマンド送信用トレイト
#[async_trait]
pub trait ClientInstance<S: AwsService>: Send + Sync {
    /// コマンドを1回だけ送信する
    ///
    /// # 引数
    /// * `command` - 送信するコマンド（SDKの入力ビルダー）
    /// * `options` - 呼び出し単位のオプション
    ///
    /// # 戻り値
    /// SDKの出力、またはSDKエラーそのもの
    async fn send<C: Command<S>>(&self, command: C, options: &HandlerOptions) -> CommandResult<C, S>;
}

/// SDKクライアントを使ったClientInstance実装
pub struct SdkClient<S: AwsService> {
    /// SDKクライアント（内部は共有ハンドルなのでcloneは安価）
    client: S::Client,
}

impl<S: AwsService> SdkClient<S> {
    /// 構築済みのSDKクライアントから作成
    pub fn new(client: S::Client) -> Self {
        Self { client }
    }

    /// 共有AWS設定から作成
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self::new(S::client_from_sdk_config(sdk_config))
    }

    /// クライアント設定から作成
    pub async fn from_options(options: &ClientOptions) -> Self {
        Self::from_sdk_config(&options.load_sdk_config().await)
    }

    /// 環境のデフォルト設定から作成
    pub async fn from_default_config() -> Self {
        Self::from_options(&ClientOptions::default()).await
    }

    /// SDKクライアントへの参照を取得
    pub fn client(&self) -> &S::Client {
        &self.client
    }
}

impl<S: AwsService> Clone for SdkClient<S> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<S: AwsService> fmt::Debug for SdkClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkClient")
            .field("service", &S::NAME)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<S: AwsService> ClientInstance<S> for SdkClient<S> {
    async fn send<C: Command<S>>(&self, command: C, options: &HandlerOptions) -> CommandResult<C, S> {
        if options.is_empty() {
            return command.dispatch(&self.client).await;
        }

        debug!(
            service = S::NAME,
            command = C::NAME,
            request_timeout_ms = options.request_timeout.map(|d| d.as_millis() as u64),
            "呼び出し単位のオプションでクライアントを派生"
        );
        let client = S::client_with_handler_options(&self.client, options);
        command.dispatch(&client).await
    }
}

/// 設定とシングルトンクライアントを保持するレイヤー
///
/// `client()`を何度呼んでも同じインスタンスを返す。
pub struct ClientLayer<S: AwsService> {
    options: ClientOptions,
    instance: OnceCell<SdkClient<S>>,
}

impl<S: AwsService> ClientLayer<S> {
    /// 環境のデフォルト設定を使うレイヤー
    pub fn default_layer() -> Self {
        Self::from_options(ClientOptions::default())
    }

    /// 指定した設定からクライアントを構築するレイヤー
    pub fn from_options(options: ClientOptions) -> Self {
        Self {
            options,
            instance: OnceCell::new(),
        }
    }

    /// 構築済みのSDKクライアントを提供するレイヤー
    pub fn from_client(client: S::Client) -> Self {
        Self {
            options: ClientOptions::default(),
            instance: OnceCell::new_with(Some(SdkClient::new(client))),
        }
    }

    /// レイヤーの設定を取得
    ///
    /// `from_client`で作成した場合は使われない。
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// クライアントが構築済みか
    pub fn is_initialized(&self) -> bool {
        self.instance.initialized()
    }

    /// クライアントを取得（初回のみ構築）
    pub async fn client(&self) -> &SdkClient<S> {
        self.instance
            .get_or_init(|| async {
                debug!(service = S::NAME, "クライアントを構築");
                SdkClient::from_options(&self.options).await
            })
            .await
    }
}

impl<S: AwsService> fmt::Debug for ClientLayer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientLayer")
            .field("service", &S::NAME)
            .field("options", &self.options)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
