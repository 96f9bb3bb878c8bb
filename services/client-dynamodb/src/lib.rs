//! DynamoDBの型付きサービス
//!
//! DynamoDBのすべてのSDKコマンドを[`DynamoDbService`]のメソッドとして公開し、
//! SDKの例外を[`DynamoDbError`]に変換する。
//!
//! ```ignore
//! use aws_sdk_dynamodb::operation::put_item::PutItemInput;
//! use aws_sdk_dynamodb::types::AttributeValue;
//! use client_dynamodb::{DynamoDbErrorKind, DynamoDbService};
//!
//! let dynamodb = DynamoDbService::from_default_config().await;
//! let args = PutItemInput::builder()
//!     .table_name("events")
//!     .item("id", AttributeValue::S(event_id.to_string()))
//!     .condition_expression("attribute_not_exists(id)");
//! match dynamodb.put_item(args).await {
//!     Err(err) if err.is(DynamoDbErrorKind::ConditionalCheckFailed) => { /* 登録済み */ }
//!     other => { other?; }
//! }
//! ```

pub mod context;
pub mod error;
pub mod service;

// Re-exports
pub use context::{DynamoDb, DynamoDbClientInstance, DynamoDbClientLayer, options_from_env};
pub use error::{DynamoDbError, DynamoDbErrorKind};
pub use service::DynamoDbService;
