use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};

/// A connected command stream — implements Read + Write.
///
/// Wraps a TCP stream. Both directions of the socket are independent; a
/// session splits the stream with [`LinkStream::try_clone`] so one handle
/// drives reads while another drives writes.
pub struct LinkStream {
    inner: TcpStream,
}

impl LinkStream {
    /// Connect to a listening endpoint (blocking).
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let resolved = (host, port)
            .to_socket_addrs()
            .map_err(|source| TransportError::Connect {
                addr: addr.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| TransportError::Unresolvable { addr: addr.clone() })?;

        let stream = TcpStream::connect(resolved).map_err(|source| TransportError::Connect {
            addr: addr.clone(),
            source,
        })?;
        stream.set_nodelay(true)?;
        debug!(%addr, "connected to remote host");
        Ok(Self { inner: stream })
    }

    pub(crate) fn from_tcp(stream: TcpStream) -> Self {
        Self { inner: stream }
    }

    /// Set read timeout on the underlying stream.
    ///
    /// A timed-out read surfaces as `WouldBlock`/`TimedOut`, which callers
    /// use as the bounded readiness wait.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_read_timeout(timeout).map_err(Into::into)
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_write_timeout(timeout).map_err(Into::into)
    }

    /// Try to clone this stream (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        let cloned = self.inner.try_clone()?;
        Ok(Self::from_tcp(cloned))
    }

    /// Address of the connected peer.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.inner.peer_addr().map_err(Into::into)
    }

    /// Shut down both directions of the stream.
    ///
    /// Safe to call on a stream the peer already closed; `NotConnected` is
    /// not an error here.
    pub fn shutdown(&self) {
        if let Err(err) = self.inner.shutdown(Shutdown::Both) {
            if err.kind() != std::io::ErrorKind::NotConnected {
                debug!(error = %err, "stream shutdown failed");
            }
        }
    }
}

impl Read for LinkStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for LinkStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl std::fmt::Debug for LinkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkStream")
            .field("peer", &self.inner.peer_addr().ok())
            .finish()
    }
}
