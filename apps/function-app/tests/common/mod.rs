//! 統合テスト共通のスタブとヘルパー
//!
//! マネージド ID と Fabric CLI をスタブに差し替えた状態でルーターを構築する。

#![allow(dead_code)]

use std::{
   io,
   sync::{Arc, Mutex},
   time::Duration,
};

use async_trait::async_trait;
use axum::{
   Router,
   body::{Body, to_bytes},
   http::{Method, Request, StatusCode},
};
use fabfunc_app::{app_builder::build_app, handler::FabricAuthState};
use fabfunc_domain::{ClientId, Credential, CredentialSource};
use fabfunc_infra::{
   CommandError,
   CommandOutput,
   CommandRunner,
   FabricCli,
   IdentityError,
   IdentityProvider,
};
use serde_json::Value;
use tower::ServiceExt;

/// テストで使う CLI のタイムアウト
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

pub fn client_id(value: &str) -> ClientId {
   ClientId::parse(value).unwrap().unwrap()
}

// --- マネージド ID スタブ ---

/// マネージド ID スタブ
pub struct StubIdentityProvider {
   default_result: Result<Credential, IdentityError>,
   managed_error:  Option<IdentityError>,
   /// `managed_identity_credential` に渡されたクライアント ID
   pub managed_calls: Mutex<Vec<String>>,
   /// `default_credential` の呼び出し回数
   pub default_calls: Mutex<usize>,
}

impl StubIdentityProvider {
   /// どちらのモードも成功する（デフォルト解決はクライアント ID なし）
   pub fn success() -> Self {
      Self {
         default_result: Ok(Credential::new(CredentialSource::Default, None, None)),
         managed_error:  None,
         managed_calls:  Mutex::new(Vec::new()),
         default_calls:  Mutex::new(0),
      }
   }

   /// デフォルト解決が環境のクライアント ID を返す
   pub fn with_ambient_client_id(value: &str) -> Self {
      Self {
         default_result: Ok(Credential::new(
            CredentialSource::Default,
            Some(client_id(value)),
            None,
         )),
         ..Self::success()
      }
   }

   /// デフォルト解決が失敗する
   pub fn default_fails(err: IdentityError) -> Self {
      Self {
         default_result: Err(err),
         ..Self::success()
      }
   }

   /// 明示指定の解決が失敗する
   pub fn managed_fails(err: IdentityError) -> Self {
      Self {
         managed_error: Some(err),
         ..Self::success()
      }
   }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
   async fn default_credential(&self) -> Result<Credential, IdentityError> {
      *self.default_calls.lock().unwrap() += 1;
      self.default_result.clone()
   }

   async fn managed_identity_credential(
      &self,
      client_id: &ClientId,
   ) -> Result<Credential, IdentityError> {
      self.managed_calls
         .lock()
         .unwrap()
         .push(client_id.as_str().to_string());
      match &self.managed_error {
         Some(err) => Err(err.clone()),
         None => Ok(Credential::new(
            CredentialSource::ManagedIdentity,
            Some(client_id.clone()),
            None,
         )),
      }
   }
}

// --- Fabric CLI スタブ ---

/// スタブコマンドの振る舞い
#[derive(Debug, Clone)]
pub enum StubCommand {
   /// 指定の終了コードと出力で終了する
   Exit {
      code:   i32,
      stdout: &'static str,
      stderr: &'static str,
   },
   /// タイムアウトする
   TimedOut,
   /// 実行ファイルが見つからない
   Missing,
}

impl StubCommand {
   pub fn ok(stdout: &'static str) -> Self {
      Self::Exit {
         code: 0,
         stdout,
         stderr: "",
      }
   }

   pub fn fail(code: i32, stderr: &'static str) -> Self {
      Self::Exit {
         code,
         stdout: "",
         stderr,
      }
   }
}

/// `fab auth ...` と `fab ls` の振る舞いを個別に指定できるスタブ
pub struct StubCommandRunner {
   auth:      StubCommand,
   ls:        StubCommand,
   /// 実行されたコマンドライン（プログラム名 + 引数）
   pub calls: Mutex<Vec<Vec<String>>>,
}

impl StubCommandRunner {
   pub fn new(auth: StubCommand, ls: StubCommand) -> Self {
      Self {
         auth,
         ls,
         calls: Mutex::new(Vec::new()),
      }
   }

   pub fn calls(&self) -> Vec<Vec<String>> {
      self.calls.lock().unwrap().clone()
   }
}

#[async_trait]
impl CommandRunner for StubCommandRunner {
   async fn run(
      &self,
      program: &str,
      args: &[String],
      timeout: Duration,
   ) -> Result<CommandOutput, CommandError> {
      let mut line = vec![program.to_string()];
      line.extend(args.iter().cloned());
      self.calls.lock().unwrap().push(line);

      let behavior = match args.first().map(String::as_str) {
         Some("auth") => &self.auth,
         Some("ls") => &self.ls,
         other => panic!("想定外のコマンド: {other:?}"),
      };

      match behavior {
         StubCommand::Exit {
            code,
            stdout,
            stderr,
         } => Ok(CommandOutput {
            exit_code: Some(*code),
            stdout:    stdout.to_string(),
            stderr:    stderr.to_string(),
         }),
         StubCommand::TimedOut => Err(CommandError::TimedOut {
            program: program.to_string(),
            timeout,
         }),
         StubCommand::Missing => Err(CommandError::Spawn {
            program: program.to_string(),
            source:  io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
         }),
      }
   }
}

// --- ルーターとリクエストヘルパー ---

/// スタブを注入したルーターを構築する（プレフィックスは `/api`）
pub fn test_app(identity: Arc<StubIdentityProvider>, runner: Arc<StubCommandRunner>) -> Router {
   let state = Arc::new(FabricAuthState {
      identity_provider: identity,
      fabric_cli:        FabricCli::new(runner, "fab", COMMAND_TIMEOUT),
   });
   build_app(state, "/api")
}

/// リクエストを送り、ステータスと JSON ボディを返す
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
   let response = app.oneshot(request).await.unwrap();
   let status = response.status();
   let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
   let body = if bytes.is_empty() {
      Value::Null
   } else {
      serde_json::from_slice(&bytes).unwrap()
   };
   (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
   Request::builder()
      .method(Method::GET)
      .uri(uri)
      .body(Body::empty())
      .unwrap()
}

pub fn post_login(body: &str) -> Request<Body> {
   post_login_to("/fabric/auth/login", body)
}

pub fn post_login_to(uri: &str, body: &str) -> Request<Body> {
   Request::builder()
      .method(Method::POST)
      .uri(uri)
      .header("content-type", "application/json")
      .body(Body::from(body.to_string()))
      .unwrap()
}
