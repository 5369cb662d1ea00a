//! # ルーター構築
//!
//! ルートテーブルとミドルウェアを組み立てる。
//! `main.rs` は依存関係の初期化とサーバー起動に集中する。
//!
//! ## ルートテーブル
//!
//! | メソッド | パス | ハンドラ |
//! |----------|------|----------|
//! | GET | `/health` | [`health_check`] |
//! | GET | `/hello` | [`hello`] |
//! | POST | `/fabric/auth/login` | [`fabric_auth_login`] |
//!
//! Functions ホストは `routePrefix`（既定 `api`）付きのパスで転送してくるため、
//! 同じテーブルをプレフィックス配下にもマウントする。

use std::sync::Arc;

use axum::{
   Router,
   routing::{get, post},
};
use fabfunc_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
   request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
   trace::TraceLayer,
};

use crate::handler::{FabricAuthState, fabric_auth_login, health_check, hello};

/// アプリケーションのルーターを構築する
///
/// `route_prefix` が空または `/` の場合はプレフィックス配下へのマウントを行わない。
pub fn build_app(state: Arc<FabricAuthState>, route_prefix: &str) -> Router {
   let routes = Router::new()
      .route("/health", get(health_check))
      .route("/hello", get(hello))
      .route("/fabric/auth/login", post(fabric_auth_login))
      .with_state(state);

   let app = match normalize_prefix(route_prefix) {
      Some(prefix) => routes.clone().nest(&prefix, routes),
      None => routes,
   };

   // レイヤー順序: 下に書いたものが外側
   // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
   // 2. TraceLayer: スパンに request_id を含める
   // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
   app.layer(PropagateRequestIdLayer::x_request_id())
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
      .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

/// `api`, `/api/`, ` /api ` をすべて `/api` に揃える
fn normalize_prefix(prefix: &str) -> Option<String> {
   let trimmed = prefix.trim().trim_matches('/');
   if trimmed.is_empty() {
      None
   } else {
      Some(format!("/{trimmed}"))
   }
}
