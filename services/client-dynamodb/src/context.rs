/// DynamoDBのクライアントコンテキスト
use aws_sdk_dynamodb::Client as DynamoDbClient;
use client_core::{
    AwsService, ClientLayer, ClientOptions, ConfigError, HandlerOptions, SdkClient, SdkConfig,
};

use crate::error::DynamoDbErrorKind;

/// 環境変数の接頭辞
pub const ENV_PREFIX: &str = "DYNAMODB";

/// DynamoDBのサービス定義
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamoDb;

impl AwsService for DynamoDb {
    const NAME: &'static str = "DynamoDB";
    type Client = DynamoDbClient;
    type ErrorKind = DynamoDbErrorKind;

    fn client_from_sdk_config(sdk_config: &SdkConfig) -> Self::Client {
        DynamoDbClient::new(sdk_config)
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
        DynamoDbClient::from_conf(builder.build())
    }
}

/// SDKクライアントを保持するクライアントインスタンス
pub type DynamoDbClientInstance = SdkClient<DynamoDb>;

/// 設定とクライアントインスタンスを保持するレイヤー
pub type DynamoDbClientLayer = ClientLayer<DynamoDb>;

/// 環境変数からクライアント設定を読み込む
///
/// # 環境変数
/// - `DYNAMODB_ENDPOINT_URL`: エンドポイントURL（DynamoDB Local等）
/// - `DYNAMODB_REGION` / `_PROFILE` / `_MAX_ATTEMPTS`
///
/// いずれもオプション。未設定の項目はSDKのデフォルト解決に従う。
pub fn options_from_env() -> Result<ClientOptions, ConfigError> {
    ClientOptions::from_env(ENV_PREFIX)
}
