/// サービスビルダー
///
/// [`execute`]はコマンドを1回送信し、失敗時にSDKエラーを[`ServiceError`]へ
/// 変換する境界。[`define_service!`](crate::define_service)はコマンドテーブルから
/// コマンド実装とサービス構造体を生成する。
use tracing::{debug, warn};

use crate::client::ClientInstance;
use crate::command::{AwsService, Command};
use crate::config::HandlerOptions;
use crate::error::ServiceError;

/// コマンドを送信し、失敗を型付きエラーに変換する
///
/// リトライはしない（SDK側の設定に委ねる）。
pub async fn execute<S, I, C>(
    client: &I,
    command: C,
    options: &HandlerOptions,
) -> Result<C::Output, ServiceError<S::ErrorKind>>
where
    S: AwsService,
    I: ClientInstance<S> + ?Sized,
    C: Command<S>,
{
    debug!(service = S::NAME, command = C::NAME, "コマンド送信");

    match client.send(command, options).await {
        Ok(output) => Ok(output),
        Err(err) => {
            let error = ServiceError::from_sdk_error(err);
            warn!(
                service = S::NAME,
                command = C::NAME,
                code = error.code(),
                status = error.status(),
                error = %error,
                "コマンド失敗"
            );
            Err(error)
        }
    }
}

/// コマンドテーブルからサービス構造体を生成する
///
/// 各エントリ`method(InputBuilder) -> Output, Error;`について
/// `$sdk::operation::method`配下の型を使い、
/// - 入力ビルダーへの[`Command`]実装
/// - サービス構造体の同名メソッド
///
/// を生成する。
///
/// ```ignore
/// client_core::define_service! {
///     /// DynamoDBサービス
///     pub struct DynamoDbService for DynamoDb, sdk = aws_sdk_dynamodb {
///         /// PutItemコマンド
///         put_item(PutItemInputBuilder) -> PutItemOutput, PutItemError;
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_service {
    (
        $(#[$attr:meta])*
        pub struct $service:ident for $marker:ident, sdk = $sdk:ident {
            $(
                $(#[$command_attr:meta])*
                $method:ident($input:ident) -> $output:ident, $error:ident;
            )*
        }
    ) => {
        $(
            impl $crate::Command<$marker> for $sdk::operation::$method::builders::$input {
                const NAME: &'static str = stringify!($method);
                type Output = $sdk::operation::$method::$output;
                type Error = $sdk::operation::$method::$error;

                fn dispatch(
                    self,
                    client: &$sdk::Client,
                ) -> $crate::__private::BoxFuture<'_, $crate::CommandResult<Self, $marker>> {
                    ::std::boxed::Box::pin(self.send_with(client))
                }
            }
        )*

        $(#[$attr])*
        pub struct $service<I = $crate::SdkClient<$marker>> {
            client: ::std::sync::Arc<I>,
            options: $crate::HandlerOptions,
        }

        impl<I> ::std::clone::Clone for $service<I> {
            fn clone(&self) -> Self {
                Self {
                    client: ::std::sync::Arc::clone(&self.client),
                    options: self.options.clone(),
                }
            }
        }

        impl<I: ::std::fmt::Debug> ::std::fmt::Debug for $service<I> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($service))
                    .field("client", &self.client)
                    .field("options", &self.options)
                    .finish()
            }
        }

        impl $service {
            /// 環境のデフォルト設定でクライアントを構築して作成
            pub async fn from_default_config() -> Self {
                Self::new($crate::SdkClient::from_default_config().await)
            }

            /// 指定した設定でクライアントを構築して作成
            pub async fn from_options(options: &$crate::ClientOptions) -> Self {
                Self::new($crate::SdkClient::from_options(options).await)
            }

            /// レイヤーが保持するクライアントを共有して作成
            pub async fn from_layer(layer: &$crate::ClientLayer<$marker>) -> Self {
                Self::new(layer.client().await.clone())
            }
        }

        impl<I: $crate::ClientInstance<$marker>> $service<I> {
            /// 任意のクライアントインスタンスから作成
            pub fn new(client: I) -> Self {
                Self::from_shared(::std::sync::Arc::new(client))
            }

            /// 共有済みのクライアントインスタンスから作成
            pub fn from_shared(client: ::std::sync::Arc<I>) -> Self {
                Self {
                    client,
                    options: $crate::HandlerOptions::default(),
                }
            }

            /// 呼び出し単位のオプションを設定したサービスを作成
            ///
            /// クライアントは共有される。
            pub fn with_handler_options(&self, options: $crate::HandlerOptions) -> Self {
                Self {
                    client: ::std::sync::Arc::clone(&self.client),
                    options,
                }
            }

            /// クライアントインスタンスへの参照を取得
            pub fn client(&self) -> &I {
                &self.client
            }

            /// 現在の呼び出し単位のオプション
            pub fn handler_options(&self) -> &$crate::HandlerOptions {
                &self.options
            }

            /// 任意のコマンドを送信
            pub async fn send<C: $crate::Command<$marker>>(
                &self,
                command: C,
            ) -> ::std::result::Result<
                C::Output,
                $crate::ServiceError<<$marker as $crate::AwsService>::ErrorKind>,
            > {
                $crate::execute::<$marker, I, C>(&*self.client, command, &self.options).await
            }

            $(
                $(#[$command_attr])*
                pub async fn $method(
                    &self,
                    args: $sdk::operation::$method::builders::$input,
                ) -> ::std::result::Result<
                    $sdk::operation::$method::$output,
                    $crate::ServiceError<<$marker as $crate::AwsService>::ErrorKind>,
                > {
                    self.send(args).await
                }
            )*
        }
    };
}
