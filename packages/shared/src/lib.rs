//! # FabFunc 共有ユーティリティ
//!
//! 関数アプリとインフラ層で共通に使う横断的関心事をまとめる。
//!
//! - [`observability`] - トレーシング初期化、Request ID、リクエストスパン

pub mod observability;
