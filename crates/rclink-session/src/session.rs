use std::io::ErrorKind;
use std::sync::Arc;

use rclink_frame::{FrameError, FrameReader, FrameWriter};
use rclink_proto::{tokens, Command, Identity};
use rclink_transport::LinkStream;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::retry::{Clock, SystemClock};

/// One logical connection to a remote endpoint.
///
/// Created disconnected. [`Session::connect`] performs the identity
/// handshake with a bounded retry budget; [`Session::disconnect`] tears the
/// stream down and is safe to call repeatedly. The identity token is fixed
/// at construction and re-sent identically on every reconnect attempt.
pub struct Session {
    identity: Identity,
    config: SessionConfig,
    pub(crate) clock: Arc<dyn Clock>,
    reader: Option<FrameReader<LinkStream>>,
    writer: Option<FrameWriter<LinkStream>>,
    connected: bool,
    on_disconnect: Option<Box<dyn FnMut() + Send>>,
}

impl Session {
    /// Create a disconnected session.
    pub fn new(identity: Identity, config: SessionConfig) -> Self {
        Self::with_clock(identity, config, Arc::new(SystemClock))
    }

    /// Create a disconnected session with an injected clock.
    pub fn with_clock(identity: Identity, config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity,
            config,
            clock,
            reader: None,
            writer: None,
            connected: false,
            on_disconnect: None,
        }
    }

    /// Register a callback invoked at the start of every disconnect.
    pub fn on_disconnect(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_disconnect = Some(Box::new(callback));
    }

    /// This session's identity.
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// This session's connection parameters.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether the most recent handshake succeeded with no disconnect since.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Connect using the configured retry budget.
    pub fn connect(&mut self) -> Result<()> {
        self.connect_with_retries(self.config.retry.max_attempts)
    }

    /// Connect, retrying up to `max_attempts` times after the initial try.
    ///
    /// Transport failures consume the budget with a fixed backoff sleep
    /// between attempts. A handshake rejection is fatal and returns
    /// immediately — a wrong identity will never be approved, so retrying
    /// would only hide the configuration error.
    pub fn connect_with_retries(&mut self, max_attempts: u32) -> Result<()> {
        info!(
            identity = %self.identity,
            host = %self.config.host,
            port = self.config.port,
            "connecting to remote host"
        );

        let mut remaining = max_attempts;
        loop {
            match self.try_connect() {
                Ok(()) => {
                    self.connected = true;
                    info!(identity = %self.identity, "connection established");
                    return Ok(());
                }
                Err(err @ SessionError::IdentityRejected { .. }) => {
                    warn!(error = %err, "handshake rejected");
                    return Err(err);
                }
                Err(err) if remaining > 0 => {
                    remaining -= 1;
                    warn!(
                        error = %err,
                        attempts_left = remaining,
                        delay = ?self.config.retry.delay,
                        "failed to connect; retrying"
                    );
                    self.clock.sleep(self.config.retry.delay);
                }
                Err(err) => {
                    warn!(error = %err, "giving up after exhausting retry budget");
                    return Err(SessionError::RetriesExhausted {
                        attempts: max_attempts,
                    });
                }
            }
        }
    }

    fn try_connect(&mut self) -> Result<()> {
        let stream = LinkStream::connect(&self.config.host, self.config.port)?;
        let read_half = stream.try_clone()?;

        let mut reader = FrameReader::with_wait_timeout(read_half, self.config.wait_timeout)?;
        let mut writer = FrameWriter::with_write_timeout(stream, self.config.wait_timeout)?;

        writer.send(self.identity.token())?;
        let reply = reader.read_frame()?;
        if reply != tokens::ID_APPROVED {
            return Err(SessionError::IdentityRejected {
                identity: self.identity,
                reply,
            });
        }

        self.reader = Some(reader);
        self.writer = Some(writer);
        Ok(())
    }

    /// Tear the connection down.
    ///
    /// Invokes the disconnect callback (if any) before releasing the
    /// stream. Calling this on an already-disconnected session is a no-op.
    pub fn disconnect(&mut self) {
        if self.reader.is_none() && self.writer.is_none() {
            self.connected = false;
            return;
        }

        info!(identity = %self.identity, "closing connection");
        if let Some(callback) = self.on_disconnect.as_mut() {
            callback();
        }

        if let Some(writer) = self.writer.take() {
            writer.into_inner().shutdown();
        }
        self.reader = None;
        self.connected = false;
    }

    /// Send one raw message frame.
    ///
    /// Transport failures are logged and reported as `false`; they never
    /// escape as errors.
    pub fn send(&mut self, message: &str) -> bool {
        let Some(writer) = self.writer.as_mut() else {
            warn!("send on a disconnected session");
            return false;
        };
        match writer.send(message) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "send failed");
                false
            }
        }
    }

    /// Send one command frame.
    pub fn send_command(&mut self, command: &Command) -> bool {
        self.send(&command.to_string())
    }

    /// Perform one readiness-bounded read and return the complete frames
    /// it yielded, in arrival order.
    ///
    /// `Ok(vec![])` means nothing was ready within the wait timeout (or
    /// only a partial frame arrived). Peer EOF is
    /// `Err(SessionError::Disconnected)`.
    pub fn recv_available(&mut self) -> Result<Vec<String>> {
        let reader = self.reader.as_mut().ok_or(SessionError::NotConnected)?;
        match reader.read_available() {
            Ok(frames) => Ok(frames),
            Err(FrameError::ConnectionClosed) => Err(SessionError::Disconnected(
                "peer closed the stream".to_string(),
            )),
            Err(FrameError::Io(err))
                if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Block until the next complete frame arrives.
    ///
    /// Bounded by the wait timeout; used for request/reply exchanges.
    pub fn recv_frame(&mut self) -> Result<String> {
        let reader = self.reader.as_mut().ok_or(SessionError::NotConnected)?;
        match reader.read_frame() {
            Ok(frame) => Ok(frame),
            Err(FrameError::ConnectionClosed) => Err(SessionError::Disconnected(
                "peer closed the stream".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    /// An independent sender over a cloned stream handle.
    ///
    /// Lets a producer thread write while a listener drives reads; the two
    /// directions of the socket are independent. A reconnect invalidates
    /// outstanding senders — their sends start returning `false` and the
    /// producer re-acquires from the session.
    pub fn sender(&self) -> Result<CommandSender> {
        let writer = self.writer.as_ref().ok_or(SessionError::NotConnected)?;
        let stream = writer.get_ref().try_clone()?;
        Ok(CommandSender {
            writer: FrameWriter::new(stream),
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("connected", &self.connected)
            .finish()
    }
}

/// Write-only handle to a session's stream.
pub struct CommandSender {
    writer: FrameWriter<LinkStream>,
}

impl CommandSender {
    pub(crate) fn from_stream(stream: LinkStream) -> Self {
        Self {
            writer: FrameWriter::new(stream),
        }
    }

    /// Send one raw message frame. Failures are logged, never raised.
    pub fn send(&mut self, message: &str) -> bool {
        match self.writer.send(message) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "send failed");
                false
            }
        }
    }

    /// Send one command frame.
    pub fn send_command(&mut self, command: &Command) -> bool {
        self.send(&command.to_string())
    }
}
