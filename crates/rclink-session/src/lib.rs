//! Identity-negotiated, auto-reconnecting command sessions.
//!
//! This is the control-transport core. A [`Session`] owns one stream to a
//! remote endpoint: it performs the identity handshake, reconnects with a
//! bounded fixed-backoff budget, and exposes framed send/receive. A
//! [`Listener`] drives the session's read loop and dispatches decoded
//! commands to a callback, reconnecting on failure. The [`Hub`] is the
//! server side: it admits peers by identity token and hands back framed
//! connections.

pub mod config;
pub mod error;
pub mod hub;
pub mod listener;
pub mod retry;
pub mod session;

pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use hub::{Hub, HubPeer};
pub use listener::{Listener, StopHandle};
pub use retry::{Clock, RetryPolicy, SystemClock};
pub use session::{CommandSender, Session};
