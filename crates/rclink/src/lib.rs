//! Remote-control command transport.
//!
//! rclink carries discrete text commands between a joystick-side producer,
//! a vehicle-side consumer, and auxiliary stream producers over persistent,
//! identity-negotiated, auto-reconnecting TCP sessions.
//!
//! # Crate Structure
//!
//! - [`transport`] — TCP stream layer
//! - [`frame`] — delimiter-terminated text framing
//! - [`proto`] — shared command vocabulary
//! - [`session`] — sessions, reconnect, listener, admission hub
//! - [`control`] — actuator state machine and input mapping

/// Re-export transport types.
pub mod transport {
    pub use rclink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use rclink_frame::*;
}

/// Re-export vocabulary types.
pub mod proto {
    pub use rclink_proto::*;
}

/// Re-export session types.
pub mod session {
    pub use rclink_session::*;
}

/// Re-export control types.
pub mod control {
    pub use rclink_control::*;
}
