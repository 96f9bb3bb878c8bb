/// API Gateway Management APIのクライアントコンテキスト
use aws_sdk_apigatewaymanagement::Client as ApiGatewayManagementClient;
use client_core::{
    AwsService, ClientLayer, ClientOptions, ConfigError, HandlerOptions, SdkClient, SdkConfig,
};

use crate::error::ApiGatewayManagementApiErrorKind;

/// 環境変数の接頭辞
pub const ENV_PREFIX: &str = "APIGW_MANAGEMENT";

/// API Gateway Management APIのサービス定義
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiGatewayManagementApi;

impl AwsService for ApiGatewayManagementApi {
    const NAME: &'static str = "ApiGatewayManagementApi";
    type Client = ApiGatewayManagementClient;
    type ErrorKind = ApiGatewayManagementApiErrorKind;

    fn client_from_sdk_config(sdk_config: &SdkConfig) -> Self::Client {
        ApiGatewayManagementClient::new(sdk_config)
    }

    fn client_with_handler_options(
        client: &Self::Client,
        options: &HandlerOptions,
    ) -> Self::Client {
        let config = client.config();
        let mut builder = config.to_builder();
        if let Some(timeouts) = options.merge_timeouts(config.timeout_config()) {
            builder.set_timeout_config(Some(timeouts));
        }
        ApiGatewayManagementClient::from_conf(builder.build())
    }
}

/// SDKクライアントを保持するクライアントインスタンス
pub type ApiGatewayManagementApiClientInstance = SdkClient<ApiGatewayManagementApi>;

/// 設定とクライアントインスタンスを保持するレイヤー
pub type ApiGatewayManagementApiClientLayer = ClientLayer<ApiGatewayManagementApi>;

/// API GatewayリクエストコンテキストからエンドポイントURLを構築
///
/// # 引数
/// * `domain_name` - リクエストコンテキストからのドメイン名
/// * `stage` - リクエストコンテキストからのステージ
///
/// # 戻り値
/// API Gateway Management APIのエンドポイントURL
pub fn build_endpoint_url(domain_name: &str, stage: &str) -> String {
    format!("https://{domain_name}/{stage}")
}

/// 環境変数からクライアント設定を読み込む
///
/// # 環境変数
/// - `APIGW_MANAGEMENT_ENDPOINT_URL`: 管理APIのエンドポイントURL（必須）
/// - `APIGW_MANAGEMENT_REGION` / `_PROFILE` / `_MAX_ATTEMPTS`: オプション
///
/// # エラー
/// - `MissingEnvVar`: エンドポイントURLが設定されていない
/// - その他は[`ClientOptions::from_env`]と同じ
pub fn options_from_env() -> Result<ClientOptions, ConfigError> {
    let options = ClientOptions::from_env(ENV_PREFIX)?;

    if options.endpoint_url().is_none() {
        return Err(ConfigError::MissingEnvVar(format!("{ENV_PREFIX}_ENDPOINT_URL")));
    }

    Ok(options)
}
