/// DynamoDBのエラー型
use client_core::{ErrorKind, ServiceError};

macro_rules! error_kinds {
    ($( $(#[$attr:meta])* $kind:ident => $code:literal, )*) => {
        /// 型付きで扱う例外の種別
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum DynamoDbErrorKind {
            $( $(#[$attr])* $kind, )*
        }

        impl DynamoDbErrorKind {
            /// すべての種別
            pub const ALL: &'static [Self] = &[$( Self::$kind, )*];
        }

        impl ErrorKind for DynamoDbErrorKind {
            fn from_code(code: &str) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$kind), )*
                    _ => None,
                }
            }

            fn code(self) -> &'static str {
                match self {
                    $( Self::$kind => $code, )*
                }
            }
        }
    };
}

error_kinds! {
    BackupInUse => "BackupInUseException",
    BackupNotFound => "BackupNotFoundException",
    /// 条件式の評価に失敗（`ReturnValuesOnConditionCheckFailure`指定時は項目を含む）
    ConditionalCheckFailed => "ConditionalCheckFailedException",
    ContinuousBackupsUnavailable => "ContinuousBackupsUnavailableException",
    DuplicateItem => "DuplicateItemException",
    ExportConflict => "ExportConflictException",
    ExportNotFound => "ExportNotFoundException",
    GlobalTableAlreadyExists => "GlobalTableAlreadyExistsException",
    GlobalTableNotFound => "GlobalTableNotFoundException",
    IdempotentParameterMismatch => "IdempotentParameterMismatchException",
    ImportConflict => "ImportConflictException",
    ImportNotFound => "ImportNotFoundException",
    IndexNotFound => "IndexNotFoundException",
    InternalServer => "InternalServerError",
    InvalidEndpoint => "InvalidEndpointException",
    InvalidExportTime => "InvalidExportTimeException",
    InvalidRestoreTime => "InvalidRestoreTimeException",
    ItemCollectionSizeLimitExceeded => "ItemCollectionSizeLimitExceededException",
    LimitExceeded => "LimitExceededException",
    PointInTimeRecoveryUnavailable => "PointInTimeRecoveryUnavailableException",
    PolicyNotFound => "PolicyNotFoundException",
    /// スループット超過（SDKのリトライ後）
    ProvisionedThroughputExceeded => "ProvisionedThroughputExceededException",
    ReplicaAlreadyExists => "ReplicaAlreadyExistsException",
    ReplicaNotFound => "ReplicaNotFoundException",
    ReplicatedWriteConflict => "ReplicatedWriteConflictException",
    RequestLimitExceeded => "RequestLimitExceeded",
    ResourceInUse => "ResourceInUseException",
    ResourceNotFound => "ResourceNotFoundException",
    TableAlreadyExists => "TableAlreadyExistsException",
    TableInUse => "TableInUseException",
    TableNotFound => "TableNotFoundException",
    Throttling => "ThrottlingException",
    /// トランザクションがキャンセルされた（理由は操作エラー側に含まれる）
    TransactionCanceled => "TransactionCanceledException",
    TransactionConflict => "TransactionConflictException",
    TransactionInProgress => "TransactionInProgressException",
}

/// DynamoDBのサービスエラー
pub type DynamoDbError = ServiceError<DynamoDbErrorKind>;
