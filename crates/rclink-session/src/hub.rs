use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;

use rclink_frame::{FrameError, FrameReader, FrameWriter};
use rclink_proto::{tokens, Identity};
use rclink_transport::{LinkStream, TcpServer};
use tracing::{info, warn};

use crate::config::DEFAULT_WAIT_TIMEOUT;
use crate::error::{Result, SessionError};
use crate::session::CommandSender;

/// Server-side admission point.
///
/// Accepts raw connections and runs the identity handshake: the first
/// frame a client sends must be a known identity token, answered with
/// `id_approved`. Anything else is answered with `unknown` and the
/// connection is closed.
pub struct Hub {
    server: TcpServer,
    allowed: Vec<Identity>,
    wait_timeout: Duration,
}

impl Hub {
    /// Bind to `host:port`. All identities are admitted by default.
    pub fn bind(host: &str, port: u16) -> Result<Self> {
        let server = TcpServer::bind(host, port)?;
        Ok(Self {
            server,
            allowed: Identity::ALL.to_vec(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        })
    }

    /// Restrict the admitted identity set.
    ///
    /// This is the authorization boundary for admission.
    pub fn with_identities(mut self, identities: &[Identity]) -> Self {
        self.allowed = identities.to_vec();
        self
    }

    /// Override the per-read wait bound on admitted connections.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// The address this hub is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    /// Accept the next connection and run the admission handshake.
    pub fn accept(&self) -> Result<HubPeer> {
        let stream = self.server.accept()?;
        let peer_addr = stream.peer_addr().ok();
        let read_half = stream.try_clone()?;

        let mut reader = FrameReader::with_wait_timeout(read_half, self.wait_timeout)?;
        let mut writer = FrameWriter::with_write_timeout(stream, self.wait_timeout)?;

        let hello = reader.read_frame()?;
        match Identity::from_token(&hello) {
            Ok(identity) if self.allowed.contains(&identity) => {
                writer.send(tokens::ID_APPROVED)?;
                info!(%identity, peer = ?peer_addr, "peer admitted");
                Ok(HubPeer {
                    identity,
                    reader,
                    writer,
                })
            }
            _ => {
                warn!(token = %hello, peer = ?peer_addr, "rejecting unknown identity");
                if let Err(err) = writer.send(tokens::ERR_UNKNOWN) {
                    warn!(error = %err, "failed sending rejection");
                }
                Err(SessionError::UnknownIdentity(hello))
            }
        }
    }
}

/// One admitted connection on the hub side.
pub struct HubPeer {
    identity: Identity,
    reader: FrameReader<LinkStream>,
    writer: FrameWriter<LinkStream>,
}

impl HubPeer {
    /// The identity this peer was admitted with.
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Perform one readiness-bounded read; empty when nothing was ready.
    pub fn recv_available(&mut self) -> Result<Vec<String>> {
        match self.reader.read_available() {
            Ok(frames) => Ok(frames),
            Err(FrameError::ConnectionClosed) => Err(SessionError::Disconnected(
                self.identity.to_string(),
            )),
            Err(FrameError::Io(err))
                if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Send one raw message frame to this peer.
    pub fn send(&mut self, message: &str) -> Result<()> {
        self.writer.send(message).map_err(Into::into)
    }

    /// An independent write handle over a cloned stream, for relay fan-out.
    pub fn sender(&self) -> Result<CommandSender> {
        let stream = self.writer.get_ref().try_clone()?;
        Ok(CommandSender::from_stream(stream))
    }
}

impl std::fmt::Debug for HubPeer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubPeer")
            .field("identity", &self.identity)
            .finish()
    }
}
