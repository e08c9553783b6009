//! 実行サービスのクライアント

use super::response::{interpret_response, TransportResponse};
use super::{ExecutionRequest, RawExecutionRequest, TestResult};
use crate::error::execution::Result;
use crate::error::TransportError;
use crate::language::LanguageId;
use crate::problem::ProblemId;

/// 実行サービスへの通信路
pub trait ExecutionTransport {
    /// JSON 本文を POST し、ステータスと本文を返す
    fn post(&mut self, body: &str) -> std::result::Result<TransportResponse, TransportError>;
}

/// 実行サービスのクライアント
///
/// 検証に失敗したリクエストは通信路に渡さない。
pub struct ExecutionClient<T> {
    transport: T,
}

impl<T: ExecutionTransport> ExecutionClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// 解答コードを実行
    pub fn run(
        &mut self,
        language: LanguageId,
        problem: &ProblemId,
        code: &str,
    ) -> Result<Vec<TestResult>> {
        let request = ExecutionRequest::new(language, problem, code)?;
        self.send(&request)
    }

    /// 受信したままのリクエストを検証して実行
    pub fn execute(&mut self, request: &RawExecutionRequest) -> Result<Vec<TestResult>> {
        let request = request.validate()?;
        self.send(&request)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&mut self, request: &ExecutionRequest) -> Result<Vec<TestResult>> {
        let body = serde_json::to_string(request).map_err(|err| TransportError::MalformedBody {
            message: err.to_string(),
        })?;

        log::debug!(
            "submitting {} solution for {}",
            request.language,
            request.problem_id
        );
        let response = self.transport.post(&body)?;
        let outcome = interpret_response(&response);
        if let Err(err) = &outcome {
            log::debug!("execution failed: {}", err);
        }
        outcome
    }
}
