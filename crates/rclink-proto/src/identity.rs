use std::fmt;
use std::str::FromStr;

use crate::error::{ProtoError, Result};
use crate::tokens;

/// Role of a connecting endpoint, used for admission control.
///
/// The token is sent exactly once per connection attempt as the first
/// frame, and is fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Detection-stream producer (vision process).
    Recognition,
    /// Joystick command producer.
    Joystick,
    /// Vehicle command consumer.
    Vehicle,
    /// Diagnostic endpoint used by tooling and tests.
    Fake,
}

impl Identity {
    /// Every identity the admission hub recognizes.
    pub const ALL: [Identity; 4] = [
        Identity::Recognition,
        Identity::Joystick,
        Identity::Vehicle,
        Identity::Fake,
    ];

    /// The wire token for this identity.
    pub fn token(&self) -> &'static str {
        match self {
            Identity::Recognition => tokens::ID_RECOGNITION,
            Identity::Joystick => tokens::ID_JOYSTICK,
            Identity::Vehicle => tokens::ID_VEHICLE,
            Identity::Fake => tokens::ID_FAKE,
        }
    }

    /// Parse a wire token into an identity.
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            tokens::ID_RECOGNITION => Ok(Identity::Recognition),
            tokens::ID_JOYSTICK => Ok(Identity::Joystick),
            tokens::ID_VEHICLE => Ok(Identity::Vehicle),
            tokens::ID_FAKE => Ok(Identity::Fake),
            other => Err(ProtoError::UnknownIdentity(other.to_string())),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Identity {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s)
    }
}
