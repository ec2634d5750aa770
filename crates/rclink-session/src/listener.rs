use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::session::Session;

/// Cooperative stop signal for a running [`Listener`].
///
/// Honored at the next loop boundary in any state; the wait timeout bounds
/// how long that takes.
#[derive(Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StopHandle {
    /// A fresh, un-triggered stop signal.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Request the listener to disconnect and stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

enum State {
    Waiting,
    Dispatching(Vec<String>),
    Reconnecting,
    Stopped,
}

/// Drives a session's read loop and dispatches decoded commands.
///
/// Exactly one listener drives a session at a time; it takes ownership.
/// Frames decoded from one read are dispatched in arrival order. A lost
/// connection triggers disconnect-then-reconnect with a fresh retry budget
/// (unless reconnect is disabled), and reconnect failure terminates the
/// run with the session error.
pub struct Listener {
    session: Session,
    reconnect: bool,
    stop: Arc<AtomicBool>,
}

impl Listener {
    /// Wrap a connected session. Reconnect is enabled by default.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            reconnect: true,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enable or disable reconnect-on-failure.
    pub fn with_reconnect(mut self, enabled: bool) -> Self {
        self.reconnect = enabled;
        self
    }

    /// A handle that stops this listener from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.stop.clone())
    }

    /// Run the listening loop, dispatching each decoded frame to `callback`.
    ///
    /// Returns `Ok(())` on an operator stop or on peer disconnect with
    /// reconnect disabled; returns the session error when a reconnect
    /// fails (retry exhaustion or handshake rejection).
    pub fn run<F: FnMut(&str)>(mut self, mut callback: F) -> Result<()> {
        info!(identity = %self.session.identity(), "started listening");
        let mut state = State::Waiting;

        loop {
            if self.stop.load(Ordering::SeqCst) && !matches!(state, State::Stopped) {
                debug!("stop requested");
                self.session.disconnect();
                state = State::Stopped;
            }

            state = match state {
                State::Waiting => match self.session.recv_available() {
                    Ok(frames) if frames.is_empty() => {
                        self.idle_pause();
                        State::Waiting
                    }
                    Ok(frames) => State::Dispatching(frames),
                    Err(err) => {
                        warn!(error = %err, "connection lost");
                        State::Reconnecting
                    }
                },
                State::Dispatching(frames) => {
                    for frame in &frames {
                        callback(frame);
                    }
                    self.idle_pause();
                    State::Waiting
                }
                State::Reconnecting => {
                    self.session.disconnect();
                    if !self.reconnect {
                        State::Stopped
                    } else {
                        match self.session.connect() {
                            Ok(()) => State::Waiting,
                            Err(err) => {
                                warn!(error = %err, "reconnect failed; stopping listener");
                                return Err(err);
                            }
                        }
                    }
                }
                State::Stopped => {
                    info!("listener stopped");
                    return Ok(());
                }
            };
        }
    }

    fn idle_pause(&self) {
        self.session
            .clock
            .sleep(self.session.config().idle_pause);
    }
}
