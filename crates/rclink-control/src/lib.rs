//! Vehicle-side actuation and joystick-side input mapping.
//!
//! The consuming end maps decoded commands onto per-actuator
//! forward/reverse/neutral state machines; the producing end maps trigger
//! input onto outgoing commands at a fixed tick rate. Hardware pin driving
//! sits behind the [`Actuator`] seam and is out of scope here.

pub mod actuator;
pub mod config;
pub mod error;
pub mod mapper;
pub mod vehicle;

pub use actuator::{Actuator, DriveState, LogActuator, MotionController, NullActuator};
pub use config::PinConfig;
pub use error::{ControlError, Result};
pub use mapper::{map_triggers, pump, rescale_axis, InputSource, TriggerState, TICK_INTERVAL};
pub use vehicle::Vehicle;
