//! # ヘルスチェックハンドラ
//!
//! 関数アプリの稼働状態を確認するためのエンドポイント。
//! Fabric CLI やマネージド ID エンドポイントへの疎通は確認しない。
//!
//! ```text
//! GET /health
//! {"status":"healthy","version":"0.1.0"}
//! ```

use axum::Json;
use serde::Serialize;

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize)]
pub struct HealthResponse {
   /// 稼働状態（常に `"healthy"`）
   pub status:  String,
   /// アプリケーションバージョン（Cargo.toml から取得）
   pub version: String,
}

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
   Json(HealthResponse {
      status:  "healthy".to_string(),
      version: env!("CARGO_PKG_VERSION").to_string(),
   })
}
