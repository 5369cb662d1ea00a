//! # 資格情報ハンドル
//!
//! ID 解決に成功したことを表す不透明な値。
//! 関数アプリはトークンそのものを使わないため、アクセストークンは保持しない。
//! Fabric CLI は `--identity` で自前のトークンを取得する。

use chrono::{DateTime, Utc};

use crate::ClientId;

/// 資格情報の取得方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
   /// 環境から自動解決した ID
   Default,
   /// 呼び出し元が指定したクライアント ID に紐づくマネージド ID
   ManagedIdentity,
}

/// ID 解決の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
   source:     CredentialSource,
   client_id:  Option<ClientId>,
   expires_on: Option<DateTime<Utc>>,
}

impl Credential {
   /// 新しい資格情報ハンドルを作成する
   pub fn new(
      source: CredentialSource,
      client_id: Option<ClientId>,
      expires_on: Option<DateTime<Utc>>,
   ) -> Self {
      Self {
         source,
         client_id,
         expires_on,
      }
   }

   pub fn source(&self) -> CredentialSource {
      self.source
   }

   /// 資格情報が紐づくクライアント ID
   ///
   /// システム割り当て ID でデフォルト解決した場合は `None`。
   pub fn client_id(&self) -> Option<&ClientId> {
      self.client_id.as_ref()
   }

   pub fn expires_on(&self) -> Option<DateTime<Utc>> {
      self.expires_on
   }
}
