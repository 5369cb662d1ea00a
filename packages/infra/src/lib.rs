//! # FabFunc インフラ層
//!
//! 関数アプリが依存する外部コラボレーターを実装する。
//!
//! ## モジュール構成
//!
//! - [`command`] - 外部プロセスの実行（タイムアウト付き）
//! - [`fabric_cli`] - Fabric CLI（`fab`）の呼び出し
//! - [`identity`] - マネージド ID による資格情報の解決
//!
//! どちらのコラボレーターもトレイトで定義しており、
//! ハンドラのテストではスタブに差し替える。

pub mod command;
pub mod fabric_cli;
pub mod identity;

pub use command::{CommandError, CommandOutput, CommandRunner, ProcessCommandRunner};
pub use fabric_cli::FabricCli;
pub use identity::{
   IdentityError,
   IdentityProvider,
   ManagedIdentityConfig,
   ManagedIdentityEndpoint,
   ManagedIdentityProvider,
};
