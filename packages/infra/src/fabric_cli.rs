//! # Fabric CLI クライアント
//!
//! Microsoft Fabric CLI（`fab`）を [`CommandRunner`] 経由で呼び出す。
//!
//! ## 実行するコマンド
//!
//! | メソッド | コマンドライン |
//! |----------|----------------|
//! | [`FabricCli::login_with_identity`] | `fab auth login --identity -u <client_id>` |
//! | [`FabricCli::list_items`] | `fab ls` |

use std::{sync::Arc, time::Duration};

use fabfunc_domain::ClientId;

use crate::command::{CommandError, CommandOutput, CommandRunner};

/// Fabric CLI の呼び出しを担当する
#[derive(Clone)]
pub struct FabricCli {
   runner:  Arc<dyn CommandRunner>,
   program: String,
   timeout: Duration,
}

impl FabricCli {
   /// # 引数
   ///
   /// - `runner`: コマンド実行の実装
   /// - `program`: CLI の実行ファイル（通常は `fab`）
   /// - `timeout`: 1 コマンドあたりのタイムアウト
   pub fn new(runner: Arc<dyn CommandRunner>, program: impl Into<String>, timeout: Duration) -> Self {
      Self {
         runner,
         program: program.into(),
         timeout,
      }
   }

   /// マネージド ID で Fabric にログインする
   pub async fn login_with_identity(
      &self,
      client_id: &ClientId,
   ) -> Result<CommandOutput, CommandError> {
      let args = vec![
         "auth".to_string(),
         "login".to_string(),
         "--identity".to_string(),
         "-u".to_string(),
         client_id.as_str().to_string(),
      ];
      self.execute(args).await
   }

   /// ワークスペースのアイテムを一覧する
   pub async fn list_items(&self) -> Result<CommandOutput, CommandError> {
      self.execute(vec!["ls".to_string()]).await
   }

   async fn execute(&self, args: Vec<String>) -> Result<CommandOutput, CommandError> {
      tracing::info!("Executing: {} {}", self.program, args.join(" "));

      let output = self.runner.run(&self.program, &args, self.timeout).await?;

      tracing::debug!(exit_code = output.exit_code, "コマンドが終了しました");
      Ok(output)
   }
}
