//! # FabFunc ドメイン
//!
//! 関数アプリ全体で共有する値オブジェクトを定義する。
//!
//! ## モジュール構成
//!
//! - [`client_id`] - ユーザー割り当てマネージド ID のクライアント ID
//! - [`credential`] - ID 解決の結果として得られる資格情報ハンドル
//! - [`error`] - ドメイン層のエラー定義

pub mod client_id;
pub mod credential;
pub mod error;

pub use client_id::ClientId;
pub use credential::{Credential, CredentialSource};
pub use error::DomainError;
