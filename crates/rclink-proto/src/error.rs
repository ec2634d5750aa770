/// Errors produced when interpreting wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// The message was empty after splitting.
    #[error("empty command message")]
    EmptyMessage,

    /// The command name is not part of the vocabulary.
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    /// The identity token is not part of the vocabulary.
    #[error("unknown identity: {0:?}")]
    UnknownIdentity(String),

    /// A required parameter is missing.
    #[error("command {command:?} requires a power parameter")]
    MissingParameter { command: String },

    /// A parameter could not be parsed.
    #[error("command {command:?} has a non-numeric power parameter: {value:?}")]
    InvalidParameter { command: String, value: String },
}

pub type Result<T> = std::result::Result<T, ProtoError>;
