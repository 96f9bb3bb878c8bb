//! API Gateway Management APIの型付きサービス
//!
//! WebSocket APIの接続に対する`DeleteConnection`、`GetConnection`、
//! `PostToConnection`を[`ApiGatewayManagementApiService`]のメソッドとして公開し、
//! SDKの例外を[`ApiGatewayManagementApiError`]に変換する。
//!
//! ```ignore
//! use aws_sdk_apigatewaymanagement::operation::post_to_connection::PostToConnectionInput;
//! use aws_sdk_apigatewaymanagement::primitives::Blob;
//! use client_apigatewaymanagement::{ApiGatewayManagementApiErrorKind, ApiGatewayManagementApiService};
//!
//! let endpoint = build_endpoint_url(domain_name, stage);
//! let apigw = ApiGatewayManagementApiService::for_endpoint(&endpoint).await?;
//! let args = PostToConnectionInput::builder()
//!     .connection_id(connection_id)
//!     .data(Blob::new(message.as_bytes()));
//! match apigw.post_to_connection(args).await {
//!     Err(err) if err.is(ApiGatewayManagementApiErrorKind::Gone) => { /* 切断済み */ }
//!     other => { other?; }
//! }
//! ```

pub mod context;
pub mod error;
pub mod service;

// Re-exports
pub use context::{
    ApiGatewayManagementApi, ApiGatewayManagementApiClientInstance,
    ApiGatewayManagementApiClientLayer, build_endpoint_url, options_from_env,
};
pub use error::{ApiGatewayManagementApiError, ApiGatewayManagementApiErrorKind};
pub use service::ApiGatewayManagementApiService;
