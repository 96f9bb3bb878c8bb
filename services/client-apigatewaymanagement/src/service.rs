/// API Gateway Management APIサービス
///
/// 各メソッドはSDKコマンドを1回送信し、出力をそのまま返す。
/// 失敗は[`ApiGatewayManagementApiError`](crate::ApiGatewayManagementApiError)に変換される。
use client_core::{ClientOptions, ConfigError};
use tracing::info;

use crate::context::ApiGatewayManagementApi;

client_core::define_service! {
    /// API Gateway Management APIの型付きサービス
    ///
    /// `I`はコマンドを送信するクライアントインスタンス（デフォルトはSDKクライアント）。
    pub struct ApiGatewayManagementApiService for ApiGatewayManagementApi, sdk = aws_sdk_apigatewaymanagement {
        /// 接続を切断する
        ///
        /// 失敗時の種別: `Gone` / `Forbidden` / `LimitExceeded`
        delete_connection(DeleteConnectionInputBuilder) -> DeleteConnectionOutput, DeleteConnectionError;

        /// 接続情報を取得する
        ///
        /// 失敗時の種別: `Gone` / `Forbidden` / `LimitExceeded`
        get_connection(GetConnectionInputBuilder) -> GetConnectionOutput, GetConnectionError;

        /// 接続にデータを送信する
        ///
        /// 失敗時の種別: `Gone` / `Forbidden` / `LimitExceeded` / `PayloadTooLarge`
        post_to_connection(PostToConnectionInputBuilder) -> PostToConnectionOutput, PostToConnectionError;
    }
}

impl ApiGatewayManagementApiService {
    /// 指定されたエンドポイントURLでサービスを作成
    ///
    /// リージョンと認証情報は環境のデフォルト設定から解決される。
    ///
    /// # 引数
    /// * `endpoint_url` - API Gateway Management APIエンドポイントURL
    ///   (例: "https://{api-id}.execute-api.{region}.amazonaws.com/{stage}")
    pub async fn for_endpoint(endpoint_url: &str) -> Result<Self, ConfigError> {
        let options = ClientOptions::new().with_endpoint_url(endpoint_url)?;
        info!(endpoint_url = %endpoint_url, "API Gateway Management APIクライアントを作成");
        Ok(Self::from_options(&options).await)
    }
}
