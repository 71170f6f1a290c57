use thiserror::Error;
use crate::session::SessionId;

#[derive(Error, Debug, Clone)]
pub enum ChatError {
    #[error("Failed to read persisted sessions: {0}")]
    PersistenceRead(String),

    #[error("Failed to persist sessions: {0}")]
    PersistenceWrite(String),

    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),

    #[error("Store invariant violated: {0}")]
    InvariantViolation(String),

    #[error("A reply is still pending")]
    Busy,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Serialization(e.to_string())
    }
}

/// Failures of the arithmetic evaluator. The message ends up in the bot reply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected input after the expression")]
    TrailingInput,

    #[error("unbalanced parenthesis")]
    UnbalancedParen,

    #[error("unknown name '{0}'")]
    UnknownName(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NotFinite,

    #[error("expression is nested too deeply")]
    TooDeep,
}
