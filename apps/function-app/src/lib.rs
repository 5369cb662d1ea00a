//! # FabFunc 関数アプリ ライブラリ
//!
//! Azure Functions のカスタムハンドラとして動作する HTTP サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - [`app_builder`] - ルーター構築（ルートテーブルとミドルウェア）
//! - [`config`] - 環境変数からの設定読み込み
//! - [`error`] - エラー定義と HTTP レスポンスへの変換
//! - [`handler`] - HTTP ハンドラ

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
