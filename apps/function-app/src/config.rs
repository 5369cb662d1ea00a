//! # 関数アプリ設定
//!
//! 環境変数から関数アプリの設定を読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `FUNCTIONS_CUSTOMHANDLER_PORT` | No | - | Functions ホストが割り当てたポート（最優先） |
//! | `FUNC_PORT` | No | `7071` | ホスト外で起動する場合のポート |
//! | `FUNC_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `FUNC_ROUTE_PREFIX` | No | `/api` | ルートテーブルを追加でマウントするプレフィックス |
//! | `FAB_CLI_PATH` | No | `fab` | Fabric CLI の実行ファイル |
//! | `FAB_COMMAND_TIMEOUT_SECS` | No | `30` | CLI 1 コマンドあたりのタイムアウト |
//! | `AZURE_CLIENT_ID` | No | - | デフォルト解決で使うユーザー割り当て ID |
//! | `IDENTITY_ENDPOINT` | No | - | App Service のマネージド ID エンドポイント |
//! | `IDENTITY_HEADER` | No | - | 同エンドポイントの認証ヘッダー値 |
//! | `FABRIC_RESOURCE` | No | `https://api.fabric.microsoft.com` | トークンを要求するリソース |
//! | `IDENTITY_TIMEOUT_SECS` | No | `10` | マネージド ID エンドポイントのタイムアウト |
//!
//! `IDENTITY_ENDPOINT` / `IDENTITY_HEADER` は Functions ホストが自動で設定する。

use std::{env, time::Duration};

use fabfunc_domain::ClientId;
use fabfunc_infra::{
   ManagedIdentityConfig,
   ManagedIdentityEndpoint,
   identity::DEFAULT_FABRIC_RESOURCE,
};
use thiserror::Error;

const DEFAULT_PORT: u16 = 7071;
const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   /// 環境変数の値を解釈できない
   #[error("環境変数 {name} の値が不正です: {value:?}")]
   Invalid { name: &'static str, value: String },
}

/// 関数アプリの設定
#[derive(Debug, Clone)]
pub struct FunctionAppConfig {
   /// バインドアドレス
   pub host:            String,
   /// ポート番号
   pub port:            u16,
   /// ルートプレフィックス（空なら追加マウントしない）
   pub route_prefix:    String,
   /// Fabric CLI の実行ファイル
   pub fab_cli_path:    String,
   /// CLI 1 コマンドあたりのタイムアウト
   pub command_timeout: Duration,
   /// マネージド ID の設定
   pub identity:        ManagedIdentityConfig,
}

impl FunctionAppConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 任意の参照関数から設定を読み込む
   ///
   /// テストではプロセスの環境変数を書き換えずに済むよう、
   /// `HashMap` などを参照する関数を渡す。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let port = match lookup("FUNCTIONS_CUSTOMHANDLER_PORT") {
         Some(value) => parse_number("FUNCTIONS_CUSTOMHANDLER_PORT", value)?,
         None => match lookup("FUNC_PORT") {
            Some(value) => parse_number("FUNC_PORT", value)?,
            None => DEFAULT_PORT,
         },
      };

      let command_timeout_secs = match lookup("FAB_COMMAND_TIMEOUT_SECS") {
         Some(value) => parse_number("FAB_COMMAND_TIMEOUT_SECS", value)?,
         None => DEFAULT_COMMAND_TIMEOUT_SECS,
      };

      let identity_timeout_secs = match lookup("IDENTITY_TIMEOUT_SECS") {
         Some(value) => parse_number("IDENTITY_TIMEOUT_SECS", value)?,
         None => DEFAULT_IDENTITY_TIMEOUT_SECS,
      };

      let default_client_id = match lookup("AZURE_CLIENT_ID") {
         Some(value) => ClientId::parse(value.clone()).map_err(|_| ConfigError::Invalid {
            name: "AZURE_CLIENT_ID",
            value,
         })?,
         None => None,
      };

      Ok(Self {
         host: lookup("FUNC_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
         port,
         route_prefix: lookup("FUNC_ROUTE_PREFIX").unwrap_or_else(|| "/api".to_string()),
         fab_cli_path: lookup("FAB_CLI_PATH").unwrap_or_else(|| "fab".to_string()),
         command_timeout: Duration::from_secs(command_timeout_secs),
         identity: ManagedIdentityConfig {
            endpoint: ManagedIdentityEndpoint::detect(
               lookup("IDENTITY_ENDPOINT"),
               lookup("IDENTITY_HEADER"),
            ),
            resource: lookup("FABRIC_RESOURCE")
               .unwrap_or_else(|| DEFAULT_FABRIC_RESOURCE.to_string()),
            default_client_id,
            timeout: Duration::from_secs(identity_timeout_secs),
         },
      })
   }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
   value
      .trim()
      .parse()
      .map_err(|_| ConfigError::Invalid { name, value })
}
