pub mod config;
pub mod quote;
pub mod statuses;
pub mod trail;
pub mod transition;

use serde::Serialize;
use serde_json::Value;

pub const EXIT_OK: u8 = 0;
pub const EXIT_INVALID_INPUT: u8 = 2;
pub const EXIT_CONFIG: u8 = 3;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome<'a> {
    command: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_class: Option<&'a str>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        let payload = CommandOutcome {
            command,
            status: "ok",
            error_class: None,
            message: message.into(),
            data: to_value(data),
        };
        Self { exit_code: EXIT_OK, output: serialize_payload(&payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with(command, error_class, message, exit_code, Option::<()>::None)
    }

    pub fn failure_with(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        data: Option<impl Serialize>,
    ) -> Self {
        let payload = CommandOutcome {
            command,
            status: "error",
            error_class: Some(error_class),
            message: message.into(),
            data: data.and_then(to_value),
        };
        Self { exit_code, output: serialize_payload(&payload) }
    }
}

fn to_value(data: impl Serialize) -> Option<Value> {
    serde_json::to_value(data).ok().filter(|value| !value.is_null())
}

fn serialize_payload(payload: &CommandOutcome<'_>) -> String {
    serde_json::to_string(payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{CommandResult, EXIT_INVALID_INPUT};

    #[test]
    fn success_payload_carries_data() {
        let result = CommandResult::success("statuses", "listed", json!({ "count": 6 }));
        let payload: Value = serde_json::from_str(&result.output).expect("json");

        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["count"], 6);
        assert!(payload.get("error_class").is_none());
    }

    #[test]
    fn failure_payload_omits_missing_data() {
        let result = CommandResult::failure("quote", "invalid_input", "nope", EXIT_INVALID_INPUT);
        let payload: Value = serde_json::from_str(&result.output).expect("json");

        assert_eq!(result.exit_code, EXIT_INVALID_INPUT);
        assert_eq!(payload["error_class"], "invalid_input");
        assert!(payload.get("data").is_none());
    }
}
