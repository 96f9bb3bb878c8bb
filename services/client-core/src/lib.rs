//! AWS SDKクライアントを型付きサービスとして公開するための共通基盤
//!
//! 各AWSサービスパッケージ（DynamoDB、API Gateway Management APIなど）は
//! このクレートの部品を組み合わせて構築される。
//!
//! - [`AwsService`]: サービスごとのSDKクライアント型とエラー種別
//! - [`Command`]: SDKコマンド1つ分（入力・出力・操作エラー）
//! - [`ClientInstance`]: コマンドを送信するクライアント（本物のSDKまたはモック）
//! - [`ClientLayer`]: 設定とシングルトンクライアントを保持するコンテキスト
//! - [`ServiceError`]: SDKエラーを型付きエラーに変換した結果
//! - [`define_service!`]: コマンドテーブルからサービス構造体を生成するマクロ

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// Re-exports
pub use client::{ClientInstance, ClientLayer, SdkClient};
pub use command::{AwsService, Command, CommandResult};
pub use config::{ClientOptions, ConfigError, HandlerOptions};
pub use error::{BoxError, ErrorKind, SdkFailure, ServiceError, ServiceException};
pub use service::execute;

// 共有AWS設定（AwsService実装で使う）
pub use aws_config::SdkConfig;

// define_service!マクロの展開先から参照するためのパス
#[doc(hidden)]
pub mod __private {
    pub use futures::future::BoxFuture;
}
