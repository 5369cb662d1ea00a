//! # マネージド ID による資格情報の解決
//!
//! Azure のマネージド ID エンドポイントからトークンを取得し、
//! ID が利用可能であることを確認する。
//!
//! ## 解決モード
//!
//! | モード | 使用するクライアント ID |
//! |--------|--------------------------|
//! | デフォルト | `AZURE_CLIENT_ID`（未設定ならシステム割り当て ID） |
//! | 明示指定 | 呼び出し元が指定した値 |
//!
//! ## エンドポイント
//!
//! | 実行環境 | URL | 認証ヘッダー |
//! |----------|-----|--------------|
//! | App Service / Functions | `$IDENTITY_ENDPOINT?api-version=2019-08-01` | `X-IDENTITY-HEADER: $IDENTITY_HEADER` |
//! | VM / コンテナ（IMDS） | `http://169.254.169.254/metadata/identity/oauth2/token?api-version=2018-02-01` | `Metadata: true` |
//!
//! 取得したトークンは破棄する。Fabric CLI は `--identity` で自前のトークンを取得する。

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fabfunc_domain::{ClientId, Credential, CredentialSource};
use serde::Deserialize;
use thiserror::Error;

/// IMDS のトークンエンドポイント
pub const IMDS_TOKEN_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

/// Fabric REST API のリソース URI
pub const DEFAULT_FABRIC_RESOURCE: &str = "https://api.fabric.microsoft.com";

const APP_SERVICE_API_VERSION: &str = "2019-08-01";
const IMDS_API_VERSION: &str = "2018-02-01";

/// ID 解決エラー
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
   /// エンドポイントに到達できない、またはタイムアウト
   #[error("managed identity endpoint is unavailable: {0}")]
   Unavailable(String),

   /// エンドポイントがトークン発行を拒否した
   #[error("managed identity endpoint returned {status}: {body}")]
   Rejected { status: u16, body: String },

   /// レスポンスを解釈できない
   #[error("invalid token response: {0}")]
   InvalidResponse(String),

   /// その他のネットワークエラー
   #[error("network error: {0}")]
   Network(String),
}

impl From<reqwest::Error> for IdentityError {
   fn from(err: reqwest::Error) -> Self {
      if err.is_connect() || err.is_timeout() {
         IdentityError::Unavailable(err.to_string())
      } else if err.is_decode() {
         IdentityError::InvalidResponse(err.to_string())
      } else {
         IdentityError::Network(err.to_string())
      }
   }
}

/// ID 解決トレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait IdentityProvider: Send + Sync {
   /// 環境から資格情報を解決する
   async fn default_credential(&self) -> Result<Credential, IdentityError>;

   /// 指定したクライアント ID のマネージド ID で資格情報を解決する
   async fn managed_identity_credential(
      &self,
      client_id: &ClientId,
   ) -> Result<Credential, IdentityError>;
}

/// マネージド ID エンドポイントの種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagedIdentityEndpoint {
   /// App Service / Azure Functions
   AppService { endpoint: String, header: String },
   /// Instance Metadata Service
   Imds { endpoint: String },
}

impl ManagedIdentityEndpoint {
   /// 環境変数の値からエンドポイントを選択する
   ///
   /// `IDENTITY_ENDPOINT` と `IDENTITY_HEADER` が両方あれば App Service、
   /// それ以外は IMDS を使う。
   pub fn detect(identity_endpoint: Option<String>, identity_header: Option<String>) -> Self {
      match (identity_endpoint, identity_header) {
         (Some(endpoint), Some(header)) => Self::AppService { endpoint, header },
         _ => Self::Imds {
            endpoint: IMDS_TOKEN_ENDPOINT.to_string(),
         },
      }
   }
}

/// [`ManagedIdentityProvider`] の設定
#[derive(Debug, Clone)]
pub struct ManagedIdentityConfig {
   pub endpoint:          ManagedIdentityEndpoint,
   /// トークンを要求するリソース
   pub resource:          String,
   /// デフォルト解決で使うクライアント ID（`AZURE_CLIENT_ID`）
   pub default_client_id: Option<ClientId>,
   /// HTTP リクエストのタイムアウト
   pub timeout:           Duration,
}

/// トークンレスポンス
///
/// `expires_on` は App Service では数値、IMDS では文字列で返ってくる。
#[derive(Debug, Deserialize)]
struct TokenResponse {
   #[serde(default)]
   expires_on: Option<serde_json::Value>,
}

/// reqwest によるマネージド ID 実装
pub struct ManagedIdentityProvider {
   client: reqwest::Client,
   config: ManagedIdentityConfig,
}

impl ManagedIdentityProvider {
   pub fn new(config: ManagedIdentityConfig) -> Result<Self, IdentityError> {
      let client = reqwest::Client::builder()
         .timeout(config.timeout)
         .build()
         .map_err(|e| IdentityError::Network(e.to_string()))?;

      Ok(Self { client, config })
   }

   /// トークンを取得し、資格情報ハンドルに変換する
   async fn acquire(
      &self,
      source: CredentialSource,
      client_id: Option<&ClientId>,
   ) -> Result<Credential, IdentityError> {
      let (url, api_version) = match &self.config.endpoint {
         ManagedIdentityEndpoint::AppService { endpoint, .. } => {
            (endpoint.as_str(), APP_SERVICE_API_VERSION)
         }
         ManagedIdentityEndpoint::Imds { endpoint } => (endpoint.as_str(), IMDS_API_VERSION),
      };

      let mut query = vec![
         ("api-version", api_version),
         ("resource", self.config.resource.as_str()),
      ];
      if let Some(client_id) = client_id {
         query.push(("client_id", client_id.as_str()));
      }

      let request = self.client.get(url).query(&query);
      let request = match &self.config.endpoint {
         ManagedIdentityEndpoint::AppService { header, .. } => {
            request.header("X-IDENTITY-HEADER", header)
         }
         ManagedIdentityEndpoint::Imds { .. } => request.header("Metadata", "true"),
      };

      let response = request.send().await?;
      let status = response.status();
      if !status.is_success() {
         let body = response.text().await.unwrap_or_default();
         return Err(IdentityError::Rejected {
            status: status.as_u16(),
            body,
         });
      }

      let token = response.json::<TokenResponse>().await?;
      let expires_on = token.expires_on.as_ref().and_then(parse_expires_on);

      Ok(Credential::new(source, client_id.cloned(), expires_on))
   }
}

#[async_trait]
impl IdentityProvider for ManagedIdentityProvider {
   async fn default_credential(&self) -> Result<Credential, IdentityError> {
      let client_id = self.config.default_client_id.as_ref();
      tracing::debug!(
         client_id = client_id.map(ClientId::as_str),
         "デフォルトの資格情報を解決します"
      );
      self.acquire(CredentialSource::Default, client_id).await
   }

   async fn managed_identity_credential(
      &self,
      client_id: &ClientId,
   ) -> Result<Credential, IdentityError> {
      self.acquire(CredentialSource::ManagedIdentity, Some(client_id))
         .await
   }
}

/// `expires_on`（エポック秒、数値または文字列）を日時に変換する
fn parse_expires_on(value: &serde_json::Value) -> Option<DateTime<Utc>> {
   let secs = match value {
      serde_json::Value::Number(n) => n.as_i64()?,
      serde_json::Value::String(s) => s.parse().ok()?,
      _ => return None,
   };
   DateTime::from_timestamp(secs, 0)
}
