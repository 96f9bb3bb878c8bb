/// SDKエラーを型付きエラーに変換する
///
/// SDKが返すエラーコード（例: `GoneException`）をサービスごとの閉じた
/// 種別列挙型[`ErrorKind`]と照合し、境界で一度だけ分類する。
/// 一致した場合は[`ServiceError::Exception`]、それ以外はすべて
/// [`ServiceError::Sdk`]になる。どちらも元のSDKエラーを`source`として保持する。
use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;
use std::hash::Hash;

use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::{ErrorMetadata, ProvideErrorMetadata};
use thiserror::Error;

/// 型消去されたエラー
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// リクエストIDが格納されるエラーメタデータのキー
const AWS_REQUEST_ID: &str = "aws_request_id";

/// サービスが型付きで扱う例外の種別
pub trait ErrorKind: fmt::Debug + Copy + Eq + Hash + Send + Sync + 'static {
    /// SDKのエラーコードから種別を判定
    fn from_code(code: &str) -> Option<Self>;

    /// 種別に対応するSDKのエラーコード
    fn code(self) -> &'static str;
}

/// サービス操作のエラー型
#[derive(Debug, Error)]
pub enum ServiceError<K: ErrorKind> {
    /// 既知の例外（種別は`ServiceException::kind`）
    #[error(transparent)]
    Exception(ServiceException<K>),

    /// それ以外のSDKエラー（タイムアウト、通信障害、未知の例外など）
    #[error(transparent)]
    Sdk(SdkFailure),
}

impl<K: ErrorKind> ServiceError<K> {
    /// SDKエラーを分類して型付きエラーに変換
    pub fn from_sdk_error<E>(err: SdkError<E, HttpResponse>) -> Self
    where
        E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
    {
        let meta = err.meta().clone();
        let status = err.raw_response().map(|raw| raw.status().as_u16());
        let modeled = match &err {
            SdkError::ServiceError(context) => modeled_exception(context.err()),
            _ => None,
        };
        let kind = meta.code().and_then(K::from_code).or_else(|| {
            modeled
                .as_ref()
                .and_then(|(name, _)| K::from_code(name))
        });

        match kind {
            Some(kind) => {
                let message = meta
                    .message()
                    .map(str::to_string)
                    .or_else(|| modeled.and_then(|(_, message)| message));
                let source: BoxError = match err {
                    SdkError::ServiceError(context) => Box::new(context.into_err()),
                    other => Box::new(other),
                };
                Self::Exception(ServiceException {
                    kind,
                    message,
                    status,
                    meta,
                    backtrace: Backtrace::capture(),
                    source,
                })
            }
            None => {
                let message = meta
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
                Self::Sdk(SdkFailure {
                    message,
                    status,
                    meta,
                    backtrace: Backtrace::capture(),
                    source: Box::new(err),
                })
            }
        }
    }

    /// 既知の例外であればその種別
    pub fn kind(&self) -> Option<K> {
        match self {
            Self::Exception(exception) => Some(exception.kind),
            Self::Sdk(_) => None,
        }
    }

    /// 指定した種別の例外か
    pub fn is(&self, kind: K) -> bool {
        self.kind() == Some(kind)
    }

    /// エラーメッセージ
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Exception(exception) => exception.message(),
            Self::Sdk(failure) => Some(failure.message()),
        }
    }

    /// SDKのエラーコード
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Exception(exception) => Some(exception.code()),
            Self::Sdk(failure) => failure.code(),
        }
    }

    /// AWSリクエストID
    pub fn request_id(&self) -> Option<&str> {
        self.meta().extra(AWS_REQUEST_ID)
    }

    /// HTTPステータスコード（レスポンスを受け取った場合のみ）
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Exception(exception) => exception.status,
            Self::Sdk(failure) => failure.status,
        }
    }

    /// 変換時に取得したバックトレース
    pub fn backtrace(&self) -> &Backtrace {
        match self {
            Self::Exception(exception) => &exception.backtrace,
            Self::Sdk(failure) => &failure.backtrace,
        }
    }

    /// 元のSDKエラーを具体型として参照
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        match self {
            Self::Exception(exception) => exception.downcast_ref(),
            Self::Sdk(failure) => failure.downcast_ref(),
        }
    }

    fn meta(&self) -> &ErrorMetadata {
        match self {
            Self::Exception(exception) => &exception.meta,
            Self::Sdk(failure) => &failure.meta,
        }
    }
}

/// 操作エラーの表示（`GoneException: message`）から例外名とメッセージを取り出す
///
/// エラーメタデータを持たない例外（モックで直接組み立てたものなど）の分類に使う。
fn modeled_exception<E: fmt::Display>(err: &E) -> Option<(String, Option<String>)> {
    let display = err.to_string();
    let (head, message) = match display.split_once(": ") {
        Some((head, message)) => (head, Some(message.to_string())),
        None => (display.as_str(), None),
    };
    let name = head.split_whitespace().next()?;
    Some((name.to_string(), message))
}

/// 既知の種別に分類されたサービス例外
///
/// `source`は操作エラー（例: `PostToConnectionError`）で、例外固有の
/// フィールドは`downcast_ref`で参照できる。
#[derive(Debug)]
pub struct ServiceException<K: ErrorKind> {
    kind: K,
    message: Option<String>,
    status: Option<u16>,
    meta: ErrorMetadata,
    backtrace: Backtrace,
    source: BoxError,
}

impl<K: ErrorKind> ServiceException<K> {
    /// 例外の種別
    pub fn kind(&self) -> K {
        self.kind
    }

    /// 例外メッセージ
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// SDKのエラーコード
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// AWSリクエストID
    pub fn request_id(&self) -> Option<&str> {
        self.meta.extra(AWS_REQUEST_ID)
    }

    /// HTTPステータスコード
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// エラーメタデータ
    pub fn meta(&self) -> &ErrorMetadata {
        &self.meta
    }

    /// 変換時に取得したバックトレース
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// 元の操作エラーを具体型として参照
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.source.downcast_ref::<T>()
    }

    /// 元の操作エラーを取り出す
    pub fn into_source(self) -> BoxError {
        self.source
    }
}

impl<K: ErrorKind> fmt::Display for ServiceException<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.kind.code(), message),
            None => f.write_str(self.kind.code()),
        }
    }
}

impl<K: ErrorKind> StdError for ServiceException<K> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

/// 既知の種別に当てはまらないSDKエラー
///
/// `source`は元の`SdkError`そのもの。
#[derive(Debug)]
pub struct SdkFailure {
    message: String,
    status: Option<u16>,
    meta: ErrorMetadata,
    backtrace: Backtrace,
    source: BoxError,
}

impl SdkFailure {
    /// エラーメッセージ
    pub fn message(&self) -> &str {
        &self.message
    }

    /// SDKのエラーコード（未知の例外の場合のみ）
    pub fn code(&self) -> Option<&str> {
        self.meta.code()
    }

    /// HTTPステータスコード
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// 変換時に取得したバックトレース
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// 元のSDKエラーを具体型として参照
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.source.downcast_ref::<T>()
    }

    /// 元のSDKエラーを取り出す
    pub fn into_source(self) -> BoxError {
        self.source
    }
}

impl fmt::Display for SdkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for SdkFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}
