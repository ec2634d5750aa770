/// Errors that can occur in actuation control.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    /// Power outside [0,100].
    ///
    /// Not clamped: silently clamping would mask interpolation bugs in the
    /// producing side.
    #[error("power {0} outside [0,100]")]
    PowerOutOfRange(f32),

    /// A required pin assignment is missing from the environment.
    #[error("pin assignment {var} is not set")]
    MissingPin { var: &'static str },

    /// A pin assignment is not a pin number.
    #[error("pin assignment {var} is not a pin number: {value:?}")]
    InvalidPin { var: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ControlError>;
