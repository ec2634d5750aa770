use rclink_proto::Identity;

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] rclink_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] rclink_frame::FrameError),

    /// The server did not approve our identity token.
    ///
    /// Fatal: a wrong identity will never be approved, so this is never
    /// retried.
    #[error("identity {identity} rejected by server (reply: {reply:?})")]
    IdentityRejected { identity: Identity, reply: String },

    /// Every connection attempt in the retry budget failed.
    #[error("connection failed after {attempts} retries")]
    RetriesExhausted { attempts: u32 },

    /// The peer closed the stream.
    #[error("peer disconnected: {0}")]
    Disconnected(String),

    /// The operation requires a connected session.
    #[error("session is not connected")]
    NotConnected,

    /// A connecting peer presented a token outside the identity vocabulary.
    #[error("unknown identity token: {0:?}")]
    UnknownIdentity(String),

    /// Environment configuration is missing or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
