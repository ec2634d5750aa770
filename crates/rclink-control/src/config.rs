use crate::error::{ControlError, Result};

pub const ENV_PIN_LEFT_FORWARD: &str = "PIN_LEFT_FORWARD";
pub const ENV_PIN_LEFT_BACKWARD: &str = "PIN_LEFT_BACKWARD";
pub const ENV_PIN_LEFT_PWM: &str = "PIN_LEFT_PWM";
pub const ENV_PIN_RIGHT_FORWARD: &str = "PIN_RIGHT_FORWARD";
pub const ENV_PIN_RIGHT_BACKWARD: &str = "PIN_RIGHT_BACKWARD";
pub const ENV_PIN_RIGHT_PWM: &str = "PIN_RIGHT_PWM";
pub const ENV_PIN_SERVO_PWM: &str = "PIN_SERVO_PWM";

/// GPIO/servo pin assignments, sourced from the environment.
///
/// Consumed only by the hardware layer behind the [`crate::Actuator`]
/// seam; this crate just carries the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinConfig {
    pub left_forward: u8,
    pub left_backward: u8,
    pub left_pwm: u8,
    pub right_forward: u8,
    pub right_backward: u8,
    pub right_pwm: u8,
    pub servo_pwm: u8,
}

impl PinConfig {
    /// Read every pin assignment from the environment. All are required.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            left_forward: pin_from_env(ENV_PIN_LEFT_FORWARD)?,
            left_backward: pin_from_env(ENV_PIN_LEFT_BACKWARD)?,
            left_pwm: pin_from_env(ENV_PIN_LEFT_PWM)?,
            right_forward: pin_from_env(ENV_PIN_RIGHT_FORWARD)?,
            right_backward: pin_from_env(ENV_PIN_RIGHT_BACKWARD)?,
            right_pwm: pin_from_env(ENV_PIN_RIGHT_PWM)?,
            servo_pwm: pin_from_env(ENV_PIN_SERVO_PWM)?,
        })
    }
}

fn pin_from_env(var: &'static str) -> Result<u8> {
    let value = std::env::var(var).map_err(|_| ControlError::MissingPin { var })?;
    value
        .parse::<u8>()
        .map_err(|_| ControlError::InvalidPin { var, value })
}
