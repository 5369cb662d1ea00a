//! # Fabric 認証ハンドラ
//!
//! マネージド ID で Fabric CLI にログインし、ワークスペースのアイテムを一覧する。
//!
//! ## エンドポイント
//!
//! ```text
//! POST /fabric/auth/login
//! {"client_id": "<ユーザー割り当て ID のクライアント ID>"}   // client_id は省略可
//! ```
//!
//! ## 処理の流れ
//!
//! ```text
//! ボディ解析 ──失敗──▶ 400 Invalid JSON
//!    │        └─オブジェクト以外 / client_id が文字列以外──▶ 500
//!    │
//! 資格情報の解決 ──失敗──▶ 401
//!    │
//! クライアント ID の確定 ──なし──▶ 400 client_id is required
//!    │
//! fab auth login --identity -u <id> ──非ゼロ──▶ 400 Authentication failed
//!    │
//! fab ls ──非ゼロ──▶ 400 Failed to list items（ログイン出力を含む）
//!    │
//! 200 success
//! ```
//!
//! どちらのコマンドもタイムアウトした場合は 408 を返す。

use std::sync::Arc;

use anyhow::anyhow;
use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use fabfunc_domain::ClientId;
use fabfunc_infra::{FabricCli, IdentityProvider};
use serde::Serialize;
use serde_json::Value;

use crate::error::FunctionError;

/// Fabric 認証ハンドラの共有状態
pub struct FabricAuthState {
   pub identity_provider: Arc<dyn IdentityProvider>,
   pub fabric_cli:        FabricCli,
}

/// Fabric 認証レスポンス
///
/// CLI が実行できた場合は終了コードにかかわらずこの形式で返す。
/// フィールドの出力順は `status`, `message`, `auth_output`, `items`, `error`。
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FabricAuthResponse {
   pub status:      String,
   pub message:     String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub auth_output: Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub items:       Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub error:       Option<String>,
}

impl FabricAuthResponse {
   fn success(auth_output: String, items: String) -> Self {
      Self {
         status:      "success".to_string(),
         message:     "Successfully authenticated and listed items".to_string(),
         auth_output: Some(auth_output),
         items:       Some(items),
         error:       None,
      }
   }

   fn authentication_failed(stderr: String) -> Self {
      Self {
         status:      "error".to_string(),
         message:     "Authentication failed".to_string(),
         auth_output: None,
         items:       None,
         error:       Some(stderr),
      }
   }

   fn listing_failed(auth_output: String, stderr: String) -> Self {
      Self {
         status:      "error".to_string(),
         message:     "Failed to list items".to_string(),
         auth_output: Some(auth_output),
         items:       None,
         error:       Some(stderr),
      }
   }
}

/// Fabric 認証エンドポイント
///
/// ボディは `Json` エクストラクタではなく生のバイト列で受け取る。
/// 解析失敗時のレスポンスを `FunctionError::InvalidJson` に揃えるため。
#[tracing::instrument(skip_all)]
pub async fn fabric_auth_login(
   State(state): State<Arc<FabricAuthState>>,
   body: Bytes,
) -> Result<(StatusCode, Json<FabricAuthResponse>), FunctionError> {
   let requested = parse_client_id(&body)?;

   let credential = match &requested {
      Some(client_id) => {
         tracing::info!("Using provided client_id for managed identity");
         let credential = state
            .identity_provider
            .managed_identity_credential(client_id)
            .await
            .map_err(|e| {
               tracing::error!("Failed to obtain Azure Identity: {}", e);
               FunctionError::ManagedIdentityCredential(e.to_string())
            })?;
         tracing::info!("Successfully initialized ManagedIdentityCredential");
         credential
      }
      None => {
         tracing::info!("Retrieving Azure Identity credentials...");
         let credential = state
            .identity_provider
            .default_credential()
            .await
            .map_err(|e| {
               tracing::error!("Failed to obtain Azure Identity: {}", e);
               FunctionError::DefaultCredential(e.to_string())
            })?;
         tracing::info!("Successfully obtained Azure Identity credential");
         credential
      }
   };

   tracing::debug!(
      source = ?credential.source(),
      expires_on = ?credential.expires_on(),
      "資格情報を解決しました"
   );

   let Some(client_id) = requested.or_else(|| credential.client_id().cloned()) else {
      tracing::warn!("No client_id available for fab command");
      return Err(FunctionError::ClientIdRequired);
   };

   let auth = state.fabric_cli.login_with_identity(&client_id).await?;
   if !auth.success() {
      tracing::warn!(exit_code = auth.exit_code, "fab auth login に失敗しました");
      return Ok((
         StatusCode::BAD_REQUEST,
         Json(FabricAuthResponse::authentication_failed(auth.stderr)),
      ));
   }

   let listing = state.fabric_cli.list_items().await?;
   if !listing.success() {
      tracing::warn!(exit_code = listing.exit_code, "fab ls に失敗しました");
      return Ok((
         StatusCode::BAD_REQUEST,
         Json(FabricAuthResponse::listing_failed(auth.stdout, listing.stderr)),
      ));
   }

   Ok((
      StatusCode::OK,
      Json(FabricAuthResponse::success(auth.stdout, listing.stdout)),
   ))
}

/// リクエストボディから `client_id` を取り出す
///
/// - JSON として解釈できない → `InvalidJson`
/// - JSON だがオブジェクトでない → `Internal`
/// - `client_id` がない、`null`、空文字列 → `None`
/// - 文字列以外 → `Internal`
fn parse_client_id(body: &[u8]) -> Result<Option<ClientId>, FunctionError> {
   let value: Value = serde_json::from_slice(body).map_err(|_| FunctionError::InvalidJson)?;
   let Value::Object(fields) = value else {
      return Err(anyhow!("request body must be a JSON object").into());
   };

   match fields.get("client_id") {
      None | Some(Value::Null) => Ok(None),
      Some(Value::String(s)) => Ok(ClientId::parse(s.as_str())?),
      Some(_) => Err(anyhow!("client_id must be a string").into()),
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_parse_client_id_文字列を取り出す() {
      let client_id = parse_client_id(br#"{"client_id": "abc"}"#).unwrap();
      assert_eq!(client_id.unwrap().as_str(), "abc");
   }

   #[test]
   fn test_parse_client_id_未指定とnullと空文字列はnone() {
      assert_eq!(parse_client_id(b"{}").unwrap(), None);
      assert_eq!(parse_client_id(br#"{"client_id": null}"#).unwrap(), None);
      assert_eq!(parse_client_id(br#"{"client_id": ""}"#).unwrap(), None);
   }

   #[test]
   fn test_parse_client_id_不正なjsonはinvalid_json() {
      assert!(matches!(
         parse_client_id(b"{not json"),
         Err(FunctionError::InvalidJson)
      ));
      assert!(matches!(parse_client_id(b""), Err(FunctionError::InvalidJson)));
   }

   #[test]
   fn test_parse_client_id_オブジェクト以外はinternal() {
      let bodies: [&[u8]; 3] = [br#"["abc"]"#, b"\"abc\"", b"null"];
      for body in bodies {
         let err = parse_client_id(body).unwrap_err();
         assert!(matches!(err, FunctionError::Internal(_)));
         assert_eq!(err.to_string(), "request body must be a JSON object");
      }
   }

   #[test]
   fn test_parse_client_id_文字列以外はinternal() {
      let err = parse_client_id(br#"{"client_id": 42}"#).unwrap_err();
      assert!(matches!(err, FunctionError::Internal(_)));
      assert_eq!(err.to_string(), "client_id must be a string");
   }

   #[test]
   fn test_parse_client_id_空白のみは指定ありとして保持する() {
      let client_id = parse_client_id(br#"{"client_id": " "}"#).unwrap();
      assert_eq!(client_id.unwrap().as_str(), " ");
   }

   #[test]
   fn test_parse_client_id_先頭ハイフンはvalidation() {
      let err = parse_client_id(br#"{"client_id": "--help"}"#).unwrap_err();
      assert_eq!(err.to_string(), "client_id must not start with '-'");
   }

   #[test]
   fn test_レスポンスのフィールド順() {
      let json = serde_json::to_string(&FabricAuthResponse::listing_failed(
         "logged in".to_string(),
         "denied".to_string(),
      ))
      .unwrap();
      assert_eq!(
         json,
         r#"{"status":"error","message":"Failed to list items","auth_output":"logged in","error":"denied"}"#
      );
   }
}
