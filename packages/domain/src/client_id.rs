//! # マネージド ID のクライアント ID
//!
//! ユーザー割り当てマネージド ID を指定するための識別子。
//! リクエストボディの `client_id` から作られ、ID 解決と Fabric CLI の
//! `-u` 引数の両方に使われる。
//!
//! ## 設計判断
//!
//! ### Newtype パターンの採用
//!
//! 任意の `String` と区別することで、検証済みの値だけが
//! CLI 引数に渡ることを型で保証する。
//!
//! ### 空文字列の扱い
//!
//! 空文字列は「未指定」と同じに扱う。空白だけの値は指定ありとして保持する。
//! [`ClientId::parse`] は `Ok(None)` を返し、呼び出し側はデフォルトの
//! ID 解決にフォールバックする。
//!
//! ## 使用例
//!
//! ```rust
//! use fabfunc_domain::ClientId;
//!
//! let client_id = ClientId::parse("00000000-0000-0000-0000-000000000001")
//!    .unwrap()
//!    .unwrap();
//! assert_eq!(client_id.as_str(), "00000000-0000-0000-0000-000000000001");
//!
//! // 空文字列は未指定扱い
//! assert_eq!(ClientId::parse("").unwrap(), None);
//! ```

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// ユーザー割り当てマネージド ID のクライアント ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
   /// 文字列を検証してクライアント ID を作成する
   ///
   /// # 戻り値
   ///
   /// - `Ok(Some(ClientId))`: 有効な値（前後の空白も含めてそのまま保持する）
   /// - `Ok(None)`: 空文字列
   /// - `Err(DomainError::Validation)`: CLI 引数として安全でない値
   ///
   /// # エラー
   ///
   /// - 先頭が `-`: Fabric CLI にフラグとして解釈されてしまう
   /// - 制御文字を含む
   pub fn parse(value: impl Into<String>) -> Result<Option<Self>, DomainError> {
      let value = value.into();

      if value.is_empty() {
         return Ok(None);
      }
      if value.starts_with('-') {
         return Err(DomainError::Validation(
            "client_id must not start with '-'".to_string(),
         ));
      }
      if value.chars().any(char::is_control) {
         return Err(DomainError::Validation(
            "client_id must not contain control characters".to_string(),
         ));
      }

      Ok(Some(Self(value)))
   }

   /// 内部の文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl std::fmt::Display for ClientId {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "{}", self.0)
   }
}
