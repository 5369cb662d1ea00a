//! # FabFunc 関数アプリ サーバー
//!
//! Azure Functions のカスタムハンドラとして動作する HTTP サーバー。
//!
//! ## 役割
//!
//! - **挨拶**: `GET /hello` で稼働確認
//! - **Fabric 認証**: `POST /fabric/auth/login` でマネージド ID による
//!   Fabric CLI ログインとワークスペースアイテムの一覧
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Functions    │────▶│  FabFunc     │────▶│  fab CLI     │
//! │ Host         │     │  (this)      │     │  (子プロセス) │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │ Managed      │
//!                      │ Identity     │
//!                      └──────────────┘
//! ```
//!
//! 環境変数は [`config`](fabfunc_app::config) を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p fabfunc-app
//!
//! # Functions ホスト経由（deploy/functions に実行ファイルを配置）
//! func start
//! ```

use std::{net::SocketAddr, sync::Arc};

use fabfunc_app::{app_builder::build_app, config::FunctionAppConfig, handler::FabricAuthState};
use fabfunc_infra::{FabricCli, IdentityProvider, ManagedIdentityProvider, ProcessCommandRunner};
use fabfunc_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// 関数アプリのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. 外部コラボレーター（マネージド ID、Fabric CLI）の初期化
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   let tracing_config = TracingConfig::from_env("function-app");
   init_tracing(&tracing_config);
   let _tracing_guard = tracing_config.app_span().entered();

   let config = FunctionAppConfig::from_env()?;

   tracing::info!(
      "関数アプリを起動します: {}:{} (prefix: {:?}, fab: {})",
      config.host,
      config.port,
      config.route_prefix,
      config.fab_cli_path
   );

   let identity_provider: Arc<dyn IdentityProvider> =
      Arc::new(ManagedIdentityProvider::new(config.identity.clone())?);
   let fabric_cli = FabricCli::new(
      Arc::new(ProcessCommandRunner),
      &config.fab_cli_path,
      config.command_timeout,
   );
   let state = Arc::new(FabricAuthState {
      identity_provider,
      fabric_cli,
   });

   let app = build_app(state, &config.route_prefix);

   let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("関数アプリが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
