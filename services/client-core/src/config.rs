/// クライアント設定と呼び出し単位のオプション
///
/// `ClientOptions`はSDKクライアント作成時に渡す設定（リージョン、エンドポイント、
/// 認証情報など）を保持します。未設定の項目はaws-configのデフォルト解決
/// （`AWS_REGION`や認証情報チェーン）に委ねます。
use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_smithy_runtime_api::client::http::{HttpClient, SharedHttpClient};
use aws_smithy_types::timeout::TimeoutConfig;
use thiserror::Error;
use url::Url;

/// 設定読み込みのエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment variable {name}: {value}")]
    InvalidEnvVar { name: String, value: String },

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

/// SDKクライアントの構築設定
///
/// 一度レイヤーに渡した後は変更しない前提です。
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    region: Option<String>,
    endpoint_url: Option<String>,
    profile_name: Option<String>,
    credentials: Option<Credentials>,
    max_attempts: Option<u32>,
    http_client: Option<SharedHttpClient>,
}

impl ClientOptions {
    /// 認証情報プロバイダー名（SDKのログに出る）
    const CREDENTIALS_PROVIDER_NAME: &'static str = "ClientOptions";

    /// すべてデフォルト解決に任せる設定を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 環境変数から設定を読み込む
    ///
    /// # 環境変数（すべてオプション）
    /// - `{prefix}_REGION`: リージョン
    /// - `{prefix}_ENDPOINT_URL`: エンドポイントURL（http/https）
    /// - `{prefix}_PROFILE`: 共有設定ファイルのプロファイル名
    /// - `{prefix}_MAX_ATTEMPTS`: SDKの最大試行回数（1以上）
    ///
    /// # エラー
    /// - `InvalidEndpoint`: エンドポイントURLが無効
    /// - `InvalidEnvVar`: 最大試行回数が正の整数でない
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let mut options = Self::new();

        if let Some(region) = read_env(prefix, "REGION") {
            options = options.with_region(region);
        }

        if let Some(endpoint_url) = read_env(prefix, "ENDPOINT_URL") {
            options = options.with_endpoint_url(endpoint_url)?;
        }

        if let Some(profile_name) = read_env(prefix, "PROFILE") {
            options = options.with_profile_name(profile_name);
        }

        if let Some(value) = read_env(prefix, "MAX_ATTEMPTS") {
            let max_attempts = value
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidEnvVar {
                    name: format!("{prefix}_MAX_ATTEMPTS"),
                    value,
                })?;
            options = options.with_max_attempts(max_attempts);
        }

        Ok(options)
    }

    /// リージョンを設定
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// エンドポイントURLを設定
    ///
    /// # エラー
    /// - `InvalidEndpoint`: URLとして解釈できない、またはスキームがhttp/httpsでない
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Result<Self, ConfigError> {
        let endpoint_url = endpoint_url.into();
        validate_endpoint(&endpoint_url)?;
        self.endpoint_url = Some(endpoint_url);
        Ok(self)
    }

    /// 共有設定ファイルのプロファイル名を設定
    pub fn with_profile_name(mut self, profile_name: impl Into<String>) -> Self {
        self.profile_name = Some(profile_name.into());
        self
    }

    /// 静的な認証情報を設定
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        self.credentials = Some(Credentials::new(
            access_key_id,
            secret_access_key,
            session_token,
            None,
            Self::CREDENTIALS_PROVIDER_NAME,
        ));
        self
    }

    /// SDKのリトライ設定に渡す最大試行回数を設定
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// SDKが使うHTTPクライアントを差し替える
    pub fn with_http_client(mut self, http_client: impl HttpClient + 'static) -> Self {
        self.http_client = Some(SharedHttpClient::new(http_client));
        self
    }

    /// リージョンを取得
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// エンドポイントURLを取得
    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    /// プロファイル名を取得
    pub fn profile_name(&self) -> Option<&str> {
        self.profile_name.as_deref()
    }

    /// 最大試行回数を取得
    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// 静的な認証情報が設定されているか
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// この設定を反映した共有AWS設定を読み込む
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile_name) = &self.profile_name {
            loader = loader.profile_name(profile_name);
        }
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        if let Some(credentials) = &self.credentials {
            loader = loader.credentials_provider(credentials.clone());
        }
        if let Some(max_attempts) = self.max_attempts {
            loader = loader.retry_config(RetryConfig::standard().with_max_attempts(max_attempts));
        }
        if let Some(http_client) = &self.http_client {
            loader = loader.http_client(http_client.clone());
        }

        loader.load().await
    }
}

/// 呼び出し単位のオプション
///
/// 空の場合はクライアントをそのまま使う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerOptions {
    /// 1回の試行あたりのタイムアウト
    pub request_timeout: Option<Duration>,
}

impl HandlerOptions {
    /// リクエストタイムアウトを指定したオプションを作成
    pub fn with_request_timeout(request_timeout: Duration) -> Self {
        Self {
            request_timeout: Some(request_timeout),
        }
    }

    /// 何も指定されていないか
    pub fn is_empty(&self) -> bool {
        self.request_timeout.is_none()
    }

    /// 既存のタイムアウト設定にこのオプションを重ねる
    ///
    /// 上書きするものがなければ`None`を返す。
    pub fn merge_timeouts(&self, current: Option<&TimeoutConfig>) -> Option<TimeoutConfig> {
        let request_timeout = self.request_timeout?;
        let builder = current.map_or_else(TimeoutConfig::builder, TimeoutConfig::to_builder);
        Some(builder.operation_attempt_timeout(request_timeout).build())
    }
}

/// `{prefix}_{name}`の環境変数を読む（空文字は未設定扱い）
fn read_env(prefix: &str, name: &str) -> Option<String> {
    std::env::var(format!("{prefix}_{name}"))
        .ok()
        .filter(|value| !value.is_empty())
}

/// エンドポイントURLのバリデーション
fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidEndpoint(format!(
            "{endpoint}: scheme must be http or https"
        )));
    }

    Ok(())
}
