use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    EmptyInput,
    RequestPending,
    Transport,
    MalformedResponse,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptyInput => "empty_input",
            ErrorCode::RequestPending => "request_pending",
            ErrorCode::Transport => "transport",
            ErrorCode::MalformedResponse => "malformed_response",
        }
    }
}

/// Why a submit action did not start a request. Neither case is shown to
/// the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("input text is empty")]
    EmptyInput,
    #[error("a translation request is already pending")]
    RequestPending,
}

impl SubmitRejected {
    pub fn code(self) -> ErrorCode {
        match self {
            SubmitRejected::EmptyInput => ErrorCode::EmptyInput,
            SubmitRejected::RequestPending => ErrorCode::RequestPending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language '{0}' (expected en or hi)")]
pub struct UnknownLanguage(pub String);
