//! コード実行サービスとの境界
//!
//! リクエストの検証・送信と、結果またはエラーペイロードの解釈を行う。
//! 実際の通信は `ExecutionTransport` として注入する。

pub mod client;
pub mod response;

pub use client::{ExecutionClient, ExecutionTransport};
pub use response::{interpret_response, normalize_payload, TransportResponse};

use crate::error::ValidationError;
use crate::language::LanguageId;
use crate::problem::ProblemId;
use serde::{Deserialize, Serialize};

/// テストケース一件分の実行結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: String,
    #[serde(default)]
    pub stdout: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

/// 受信したままの実行リクエスト（全フィールド任意）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExecutionRequest {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub problem_id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl RawExecutionRequest {
    /// 必須フィールドを検証して送信可能なリクエストにする
    pub fn validate(&self) -> Result<ExecutionRequest, ValidationError> {
        let language = present(&self.language);
        let problem_id = present(&self.problem_id);
        let code = present(&self.code);

        let missing: Vec<&'static str> = [
            ("language", language.is_none()),
            ("problem_id", problem_id.is_none()),
            ("code", code.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        match (language, problem_id, code) {
            (Some(language), Some(problem_id), Some(code)) => {
                let language = language.parse::<LanguageId>().map_err(|_| {
                    ValidationError::UnknownLanguage {
                        name: language.to_string(),
                    }
                })?;
                Ok(ExecutionRequest {
                    language,
                    problem_id: ProblemId::from(problem_id),
                    code: code.to_string(),
                })
            }
            _ => Err(ValidationError::MissingFields { fields: missing }),
        }
    }
}

// 空文字列は未指定と同じ扱い
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// 検証済みの実行リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRequest {
    pub language: LanguageId,
    pub problem_id: ProblemId,
    pub code: String,
}

impl ExecutionRequest {
    pub fn new(
        language: LanguageId,
        problem: &ProblemId,
        code: &str,
    ) -> Result<Self, ValidationError> {
        RawExecutionRequest {
            language: Some(language.as_str().to_string()),
            problem_id: Some(problem.as_str().to_string()),
            code: Some(code.to_string()),
        }
        .validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_code_is_rejected() {
        let raw: RawExecutionRequest =
            serde_json::from_str(r#"{"language": "python", "problem_id": "two_sum"}"#).unwrap();
        assert_eq!(
            raw.validate(),
            Err(ValidationError::MissingFields {
                fields: vec!["code"]
            })
        );
    }

    #[test]
    fn test_empty_fields_count_as_missing() {
        let raw = RawExecutionRequest {
            language: Some(String::new()),
            problem_id: None,
            code: Some("print(1)".to_string()),
        };
        assert_eq!(
            raw.validate(),
            Err(ValidationError::MissingFields {
                fields: vec!["language", "problem_id"]
            })
        );
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let raw = RawExecutionRequest {
            language: Some("brainfuck".to_string()),
            problem_id: Some("two_sum".to_string()),
            code: Some("+".to_string()),
        };
        assert!(matches!(
            raw.validate(),
            Err(ValidationError::UnknownLanguage { .. })
        ));
    }

    #[test]
    fn test_request_serializes_wire_fields() {
        let request =
            ExecutionRequest::new(LanguageId::Cpp, &ProblemId::from("add_list"), "int main(){}")
                .unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["language"], "cpp");
        assert_eq!(json["problem_id"], "add_list");
        assert_eq!(json["code"], "int main(){}");
    }

    #[test]
    fn test_result_stderr_is_optional() {
        let result: TestResult =
            serde_json::from_str(r#"{"id": "1", "stdout": "3", "success": true}"#).unwrap();
        assert_eq!(result.stderr, None);
        assert!(result.success);
    }
}
