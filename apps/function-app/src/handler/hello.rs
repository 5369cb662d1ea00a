//! # 挨拶ハンドラ
//!
//! 関数アプリが起動していることを確認するための簡易エンドポイント。
//!
//! ```text
//! GET /hello?name=Ada
//! {"message":"Hello, Ada!","status":"success"}
//! ```

use std::collections::HashMap;

use axum::{Json, extract::Query};
use serde::Serialize;

/// `name` が未指定または空のときに使う名前
const DEFAULT_NAME: &str = "World";

/// 挨拶レスポンス
#[derive(Debug, Serialize)]
pub struct HelloResponse {
   pub message: String,
   pub status:  String,
}

/// 挨拶エンドポイント
///
/// クエリは `HashMap` で受け取る。構造体で受けると `name` の重複指定が
/// 400 になってしまうため。
pub async fn hello(Query(params): Query<HashMap<String, String>>) -> Json<HelloResponse> {
   tracing::info!("Hello endpoint was triggered");

   let name = params
      .get("name")
      .map(String::as_str)
      .filter(|name| !name.is_empty())
      .unwrap_or(DEFAULT_NAME);

   Json(HelloResponse {
      message: format!("Hello, {name}!"),
      status:  "success".to_string(),
   })
}
