use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphqlErrorExtensions>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphqlErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl GraphqlError {
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref().and_then(|e| e.code.as_deref())
    }
}

impl fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = if self.message.is_empty() {
            "Unknown error"
        } else {
            self.message.as_str()
        };
        match self.code() {
            Some(code) => write!(f, "{}: {}", code, message),
            None => write!(f, "{}", message),
        }
    }
}

/// Failure talking to the remote board service.
///
/// Every payload shape the service can answer with is folded into one of
/// these variants at the transport boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("{}", join_errors(.0))]
    Graphql(Vec<GraphqlError>),

    #[error("{0}")]
    Message(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Normalizes a loosely shaped error payload.
    ///
    /// Accepts a bare string, a single error object, an array of error
    /// objects or strings, or a response body carrying an `errors` array.
    pub fn from_payload(payload: &Value) -> Self {
        match payload {
            Value::String(message) => Self::Message(message.clone()),
            Value::Array(items) => Self::Graphql(items.iter().map(graphql_error_from).collect()),
            Value::Object(map) => match map.get("errors") {
                Some(errors @ Value::Array(_)) => Self::from_payload(errors),
                _ if map.contains_key("message") => Self::Graphql(vec![graphql_error_from(payload)]),
                _ => Self::Message(payload.to_string()),
            },
            other => Self::Message(other.to_string()),
        }
    }

    /// GraphQL error codes carried by this error, if any
    pub fn codes(&self) -> Vec<&str> {
        match self {
            Self::Graphql(errors) => errors.iter().filter_map(GraphqlError::code).collect(),
            _ => Vec::new(),
        }
    }

    /// True when the service rejected the caller's credentials
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 401 || *status == 403,
            Self::Graphql(_) => self
                .codes()
                .iter()
                .any(|c| *c == "invalid-jwt" || *c == "access-denied"),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

fn graphql_error_from(value: &Value) -> GraphqlError {
    match value {
        Value::String(message) => GraphqlError {
            message: message.clone(),
            extensions: None,
        },
        other => serde_json::from_value(other.clone()).unwrap_or_else(|_| GraphqlError {
            message: other.to_string(),
            extensions: None,
        }),
    }
}

fn join_errors(errors: &[GraphqlError]) -> String {
    if errors.is_empty() {
        return "Unknown error".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
