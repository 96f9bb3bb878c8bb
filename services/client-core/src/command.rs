//! AWSサービスとSDKコマンドの抽象化
//!
//! [`AwsService`]はサービスごとに1つ定義するマーカー型に実装し、
//! [`Command`]はSDKの入力ビルダー（例: `PutItemInputBuilder`）に実装する。
//! 実装は通常[`define_service!`](crate::define_service)マクロが生成する。
use std::error::Error as StdError;
use std::fmt;

use aws_config::SdkConfig;
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use futures::future::BoxFuture;

use crate::config::HandlerOptions;
use crate::error::ErrorKind;

/// コマンド送信の生の結果（SDKエラーのまま）
pub type CommandResult<C, S> =
    Result<<C as Command<S>>::Output, SdkError<<C as Command<S>>::Error, HttpResponse>>;

/// SDKクライアント1種類を表すサービス定義
pub trait AwsService: fmt::Debug + Send + Sync + 'static {
    /// ログに出力するサービス名
    const NAME: &'static str;

    /// SDKクライアント型（例: `aws_sdk_dynamodb::Client`）
    type Client: Clone + fmt::Debug + Send + Sync + 'static;

    /// このサービスが型付きエラーとして扱う例外の種別
    type ErrorKind: ErrorKind;

    /// 共有AWS設定からSDKクライアントを作成
    fn client_from_sdk_config(sdk_config: &SdkConfig) -> Self::Client;

    /// 呼び出し単位のオプションを反映したクライアントを作成
    ///
    /// 元のクライアントのHTTPコネクタや認証情報はそのまま共有される。
    fn client_with_handler_options(client: &Self::Client, options: &HandlerOptions)
    -> Self::Client;
}

/// SDKコマンド1つ分
///
/// 入力ビルダーそのものがコマンドを表し、`dispatch`で一度だけ送信される。
pub trait Command<S: AwsService>: fmt::Debug + Clone + PartialEq + Send + Sync + 'static {
    /// コマンド名（メソッド名と同じ）
    const NAME: &'static str;

    /// コマンドの出力型
    type Output: fmt::Debug + Send + 'static;

    /// コマンドの操作エラー型（例: `PutItemError`）
    type Error: ProvideErrorMetadata + StdError + Send + Sync + 'static;

    /// SDKクライアントでコマンドを送信
    fn dispatch(self, client: &S::Client) -> BoxFuture<'_, CommandResult<Self, S>>;
}
