//! # HTTP リクエストハンドラ
//!
//! ## モジュール構成
//!
//! ```text
//! handler.rs              # 親モジュール（re-export）
//! └── handler/
//!     ├── fabric_auth.rs  # Fabric CLI ログイン + アイテム一覧
//!     ├── health.rs       # ヘルスチェック
//!     └── hello.rs        # 挨拶（稼働確認用）
//! ```

pub mod fabric_auth;
pub mod health;
pub mod hello;

pub use fabric_auth::{FabricAuthResponse, FabricAuthState, fabric_auth_login};
pub use health::health_check;
pub use hello::hello;
