//! # 外部コマンド実行
//!
//! 引数ベクタでプロセスを起動し、標準出力・標準エラー・終了コードを取得する。
//!
//! ## 設計方針
//!
//! - **シェルを経由しない**: 引数は `Command::args` でそのまま渡す
//! - **タイムアウト**: `tokio::time::timeout` で待機を打ち切る。
//!   子プロセスは `kill_on_drop(true)` のため、タイムアウト時に破棄されると kill される
//! - **非ゼロ終了はエラーではない**: 終了コードの解釈は呼び出し側に任せる

use std::{io, process::Stdio, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// コマンドの実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
   /// 終了コード（シグナルで終了した場合は `None`）
   pub exit_code: Option<i32>,
   pub stdout:    String,
   pub stderr:    String,
}

impl CommandOutput {
   /// 終了コードが 0 かどうか
   pub fn success(&self) -> bool {
      self.exit_code == Some(0)
   }
}

/// コマンド実行エラー
#[derive(Debug, Error)]
pub enum CommandError {
   /// タイムアウト
   #[error("command `{program}` timed out after {}s", timeout.as_secs())]
   TimedOut { program: String, timeout: Duration },

   /// プロセスの起動に失敗（実行ファイルが存在しない等）
   #[error("failed to execute `{program}`: {source}")]
   Spawn {
      program: String,
      #[source]
      source:  io::Error,
   },
}

/// コマンド実行トレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait CommandRunner: Send + Sync {
   /// `program` を `args` で実行し、終了まで待つ
   ///
   /// `timeout` を超えた場合は [`CommandError::TimedOut`] を返す。
   async fn run(
      &self,
      program: &str,
      args: &[String],
      timeout: Duration,
   ) -> Result<CommandOutput, CommandError>;
}

/// `tokio::process` による実装
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessCommandRunner;

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
   async fn run(
      &self,
      program: &str,
      args: &[String],
      timeout: Duration,
   ) -> Result<CommandOutput, CommandError> {
      let mut command = Command::new(program);
      command
         .args(args)
         .stdin(Stdio::null())
         .stdout(Stdio::piped())
         .stderr(Stdio::piped())
         .kill_on_drop(true);

      let child = command.spawn().map_err(|source| CommandError::Spawn {
         program: program.to_string(),
         source,
      })?;

      let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
         Ok(Ok(output)) => output,
         Ok(Err(source)) => {
            return Err(CommandError::Spawn {
               program: program.to_string(),
               source,
            });
         }
         Err(_) => {
            tracing::warn!(
               program,
               timeout_secs = timeout.as_secs(),
               "コマンドがタイムアウトしました"
            );
            return Err(CommandError::TimedOut {
               program: program.to_string(),
               timeout,
            });
         }
      };

      Ok(CommandOutput {
         exit_code: output.status.code(),
         stdout:    String::from_utf8_lossy(&output.stdout).into_owned(),
         stderr:    String::from_utf8_lossy(&output.stderr).into_owned(),
      })
   }
}
