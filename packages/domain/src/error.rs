//! # ドメインエラー

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
   /// 入力値が不正
   ///
   /// メッセージはそのままクライアントに返されるため英語で記述する。
   #[error("{0}")]
   Validation(String),
}
