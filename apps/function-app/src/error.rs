//! # 関数アプリ エラーハンドリング
//!
//! HTTP API のエラー定義と、axum レスポンスへの変換。
//!
//! ## レスポンス形式
//!
//! エラーはすべて `error`（と必要に応じて `details`）を持つ JSON で返す。
//!
//! ```json
//! {
//!   "error": "Failed to obtain Azure Identity credentials",
//!   "details": "managed identity endpoint is unavailable: ..."
//! }
//! ```
//!
//! Fabric CLI の非ゼロ終了はエラーではなく、
//! [`FabricAuthResponse`](crate::handler::FabricAuthResponse) として返す。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use fabfunc_domain::DomainError;
use fabfunc_infra::CommandError;
use serde::Serialize;
use thiserror::Error;

/// 関数アプリで発生するエラー
///
/// `IntoResponse` を実装しているため、axum が自動的に HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum FunctionError {
   /// リクエストボディが JSON として解釈できない（400 Bad Request）
   #[error("Invalid JSON in request body")]
   InvalidJson,

   /// リクエストの値が不正（400 Bad Request）
   #[error("{0}")]
   Validation(String),

   /// デフォルトの資格情報を解決できない（401 Unauthorized）
   #[error("Failed to obtain Azure Identity credentials: {0}")]
   DefaultCredential(String),

   /// 指定されたマネージド ID を解決できない（401 Unauthorized）
   #[error("Failed to initialize managed identity credential: {0}")]
   ManagedIdentityCredential(String),

   /// CLI に渡すクライアント ID がない（400 Bad Request）
   #[error("client_id is required")]
   ClientIdRequired,

   /// CLI がタイムアウトした（408 Request Timeout）
   #[error("Command timed out")]
   CommandTimedOut,

   /// 分類されないエラー（500 Internal Server Error）
   #[error("{0}")]
   Internal(#[from] anyhow::Error),
}

impl From<DomainError> for FunctionError {
   fn from(err: DomainError) -> Self {
      match err {
         DomainError::Validation(msg) => FunctionError::Validation(msg),
      }
   }
}

impl From<CommandError> for FunctionError {
   fn from(err: CommandError) -> Self {
      match err {
         CommandError::TimedOut { .. } => FunctionError::CommandTimedOut,
         err @ CommandError::Spawn { .. } => FunctionError::Internal(err.into()),
      }
   }
}

/// エラーレスポンスボディ
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
   pub error:   String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub details: Option<String>,
}

impl ErrorResponse {
   fn new(error: impl Into<String>) -> Self {
      Self {
         error:   error.into(),
         details: None,
      }
   }

   fn with_details(error: impl Into<String>, details: String) -> Self {
      Self {
         error:   error.into(),
         details: Some(details),
      }
   }
}

impl IntoResponse for FunctionError {
   fn into_response(self) -> Response {
      let (status, body) = match self {
         FunctionError::InvalidJson => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Invalid JSON in request body"),
         ),
         FunctionError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
         FunctionError::DefaultCredential(details) => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::with_details("Failed to obtain Azure Identity credentials", details),
         ),
         FunctionError::ManagedIdentityCredential(details) => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::with_details(
               "Failed to initialize managed identity credential",
               details,
            ),
         ),
         FunctionError::ClientIdRequired => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("client_id is required"),
         ),
         FunctionError::CommandTimedOut => (
            StatusCode::REQUEST_TIMEOUT,
            ErrorResponse::new("Command timed out"),
         ),
         FunctionError::Internal(err) => {
            tracing::error!("Error: {:?}", err);
            (
               StatusCode::INTERNAL_SERVER_ERROR,
               ErrorResponse::new(err.to_string()),
            )
         }
      };

      (status, Json(body)).into_response()
   }
}
