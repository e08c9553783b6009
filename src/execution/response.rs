//! 実行サービス応答の解釈

use super::TestResult;
use crate::error::execution::Result;
use crate::error::{BackendFailure, ExecutionError, TransportError};
use serde_json::Value;

/// 通信層が返す生の応答
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// プロキシ経由の封筒を外す
///
/// `body` が JSON 文字列ならもう一度デコードし、オブジェクトならそのまま使う。
pub fn normalize_payload(payload: Value) -> std::result::Result<Value, TransportError> {
    match payload {
        Value::Object(mut object) => match object.remove("body") {
            Some(Value::String(encoded)) => {
                serde_json::from_str(&encoded).map_err(|err| TransportError::MalformedBody {
                    message: err.to_string(),
                })
            }
            Some(inner @ (Value::Object(_) | Value::Array(_))) => Ok(inner),
            Some(other) => {
                object.insert("body".to_string(), other);
                Ok(Value::Object(object))
            }
            None => Ok(Value::Object(object)),
        },
        other => Ok(other),
    }
}

/// 応答を結果一覧またはエラーに変換
pub fn interpret_response(response: &TransportResponse) -> Result<Vec<TestResult>> {
    let parsed = serde_json::from_str::<Value>(&response.body);

    if !response.is_success() {
        let relayed = parsed
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string));
        return Err(match relayed {
            Some(message) => ExecutionError::Relayed {
                status: response.status,
                message,
            },
            None => TransportError::Status {
                status: response.status,
            }
            .into(),
        });
    }

    let payload = parsed.map_err(|err| TransportError::MalformedBody {
        message: err.to_string(),
    })?;
    let payload = normalize_payload(payload)?;

    if let Some(kind) = payload
        .get("status")
        .and_then(Value::as_str)
        .and_then(BackendFailure::from_status)
    {
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Execution failed")
            .to_string();
        return Err(ExecutionError::Backend { kind, message });
    }

    let results = match payload {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut object) => object.remove("test_results").ok_or_else(|| {
            TransportError::MalformedBody {
                message: "missing test_results".to_string(),
            }
        })?,
        _ => {
            return Err(TransportError::MalformedBody {
                message: "unexpected payload".to_string(),
            }
            .into())
        }
    };

    serde_json::from_value(results).map_err(|err| {
        TransportError::MalformedBody {
            message: err.to_string(),
        }
        .into()
    })
}
