/// API Gateway Management APIのエラー型
use client_core::{ErrorKind, ServiceError};

/// 型付きで扱う例外の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiGatewayManagementApiErrorKind {
    /// 接続が切断された（410 GONE）
    Gone,
    /// 認可に失敗
    Forbidden,
    /// リクエスト数の上限超過
    LimitExceeded,
    /// データが大きすぎる（PostToConnectionのみ）
    PayloadTooLarge,
}

impl ApiGatewayManagementApiErrorKind {
    /// すべての種別
    pub const ALL: [Self; 4] = [
        Self::Gone,
        Self::Forbidden,
        Self::LimitExceeded,
        Self::PayloadTooLarge,
    ];
}

impl ErrorKind for ApiGatewayManagementApiErrorKind {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "GoneException" => Some(Self::Gone),
            "ForbiddenException" => Some(Self::Forbidden),
            "LimitExceededException" => Some(Self::LimitExceeded),
            "PayloadTooLargeException" => Some(Self::PayloadTooLarge),
            _ => None,
        }
    }

    fn code(self) -> &'static str {
        match self {
            Self::Gone => "GoneException",
            Self::Forbidden => "ForbiddenException",
            Self::LimitExceeded => "LimitExceededException",
            Self::PayloadTooLarge => "PayloadTooLargeException",
        }
    }
}

/// API Gateway Management APIのサービスエラー
pub type ApiGatewayManagementApiError = ServiceError<ApiGatewayManagementApiErrorKind>;
