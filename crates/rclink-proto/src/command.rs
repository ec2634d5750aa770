use std::fmt;
use std::str::FromStr;

use crate::error::{ProtoError, Result};
use crate::tokens;

/// A decoded control command.
///
/// Drive commands carry a power percentage. Range validation happens at
/// the actuation boundary, not here: parsing only checks that a power
/// parameter is present and numeric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Drive both tracks forward at `power` percent.
    Forward { power: f32 },
    /// Drive both tracks in reverse at `power` percent.
    Backward { power: f32 },
    /// Stop both tracks.
    Neutral,
    /// Slew the steering servo left.
    SteerLeft,
    /// Slew the steering servo right.
    SteerRight,
    /// Center the steering servo.
    SteerNeutral,
    /// Peer is tearing the session down.
    Disconnect,
}

impl Command {
    /// The wire name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Forward { .. } => tokens::JOY_FORWARD,
            Command::Backward { .. } => tokens::JOY_BACKWARD,
            Command::Neutral => tokens::JOY_NEUTRAL,
            Command::SteerLeft => tokens::JOY_DIR_LEFT,
            Command::SteerRight => tokens::JOY_DIR_RIGHT,
            Command::SteerNeutral => tokens::JOY_DIR_NEUTRAL,
            Command::Disconnect => tokens::DISCONNECT,
        }
    }

    /// Parse one decoded frame into a command.
    ///
    /// The message is a space-separated token sequence: the command name
    /// followed by its parameters. Surplus parameters are ignored.
    pub fn parse(message: &str) -> Result<Self> {
        let mut parts = message.split_whitespace();
        let name = parts.next().ok_or(ProtoError::EmptyMessage)?;

        match name {
            tokens::JOY_FORWARD => Ok(Command::Forward {
                power: parse_power(name, parts.next())?,
            }),
            tokens::JOY_BACKWARD => Ok(Command::Backward {
                power: parse_power(name, parts.next())?,
            }),
            tokens::JOY_NEUTRAL => Ok(Command::Neutral),
            tokens::JOY_DIR_LEFT => Ok(Command::SteerLeft),
            tokens::JOY_DIR_RIGHT => Ok(Command::SteerRight),
            tokens::JOY_DIR_NEUTRAL => Ok(Command::SteerNeutral),
            tokens::DISCONNECT => Ok(Command::Disconnect),
            other => Err(ProtoError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_power(command: &str, param: Option<&str>) -> Result<f32> {
    let value = param.ok_or_else(|| ProtoError::MissingParameter {
        command: command.to_string(),
    })?;
    value.parse::<f32>().map_err(|_| ProtoError::InvalidParameter {
        command: command.to_string(),
        value: value.to_string(),
    })
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Forward { power } | Command::Backward { power } => {
                write!(f, "{} {}", self.name(), power)
            }
            _ => f.write_str(self.name()),
        }
    }
}

impl FromStr for Command {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drive_commands() {
        assert_eq!(
            Command::parse("joy_forward 75").unwrap(),
            Command::Forward { power: 75.0 }
        );
        assert_eq!(
            Command::parse("joy_backward 12.5").unwrap(),
            Command::Backward { power: 12.5 }
        );
        assert_eq!(Command::parse("joy_neutral").unwrap(), Command::Neutral);
    }

    #[test]
    fn parse_steering_commands() {
        assert_eq!(Command::parse("joy_dir_left").unwrap(), Command::SteerLeft);
        assert_eq!(Command::parse("joy_dir_right").unwrap(), Command::SteerRight);
        assert_eq!(
            Command::parse("joy_dir_neutral").unwrap(),
            Command::SteerNeutral
        );
    }

    #[test]
    fn parse_accepts_python_float_reprs() {
        // Producers that stringify floats send e.g. "75.0".
        assert_eq!(
            Command::parse("joy_forward 75.0").unwrap(),
            Command::Forward { power: 75.0 }
        );
    }

    #[test]
    fn missing_power_is_rejected() {
        let err = Command::parse("joy_forward").unwrap_err();
        assert!(matches!(err, ProtoError::MissingParameter { .. }));
    }

    #[test]
    fn non_numeric_power_is_rejected() {
        let err = Command::parse("joy_backward fast").unwrap_err();
        assert!(matches!(err, ProtoError::InvalidParameter { .. }));
    }

    #[test]
    fn unknown_command_is_rejected() {
        let err = Command::parse("joy_launch").unwrap_err();
        assert!(matches!(err, ProtoError::UnknownCommand(name) if name == "joy_launch"));
    }

    #[test]
    fn empty_message_is_rejected() {
        assert!(matches!(
            Command::parse("   ").unwrap_err(),
            ProtoError::EmptyMessage
        ));
    }

    #[test]
    fn display_matches_wire_format() {
        assert_eq!(Command::Forward { power: 75.0 }.to_string(), "joy_forward 75");
        assert_eq!(
            Command::Backward { power: 12.5 }.to_string(),
            "joy_backward 12.5"
        );
        assert_eq!(Command::SteerNeutral.to_string(), "joy_dir_neutral");
    }

    #[test]
    fn display_parse_roundtrip() {
        let commands = [
            Command::Forward { power: 33.0 },
            Command::Backward { power: 0.0 },
            Command::Neutral,
            Command::SteerLeft,
            Command::SteerRight,
            Command::SteerNeutral,
            Command::Disconnect,
        ];
        for command in commands {
            assert_eq!(Command::parse(&command.to_string()).unwrap(), command);
        }
    }
}
