/// Command envelope structures for the UI protocol
///
/// Requests name one of the three commands and carry its parameters;
/// responses are either a success payload or an error message string.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command names understood by the server
pub mod commands {
    pub const ADD_HABIT: &str = "add-habit";
    pub const GET_HABITS: &str = "get-habits";
    pub const UPDATE_HABIT_COMPLETION: &str = "update-habit-completion";
}

/// One request line from the UI collaborator
#[derive(Debug, Deserialize)]
pub struct Request {
    /// Which command to run (e.g. "add-habit")
    pub command: String,
    /// Parameters for the command
    #[serde(default)]
    pub params: Value,
}

/// One response line back to the UI collaborator
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    /// Successful result with the command's payload
    Ok {
        #[serde(skip_serializing_if = "Value::is_null")]
        data: Value,
    },
    /// Failure with a human-readable message
    Error { message: String },
}

impl Response {
    /// Create a successful response
    pub fn ok(data: Value) -> Self {
        Response::Ok { data }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
        }
    }
}
