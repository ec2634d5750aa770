use std::net::{SocketAddr, TcpListener};

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::LinkStream;

/// TCP server socket.
///
/// Binds a listening socket and yields one [`LinkStream`] per accepted
/// connection. Binding port 0 picks an ephemeral port; use
/// [`TcpServer::local_addr`] to learn which.
pub struct TcpServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl TcpServer {
    /// Bind and listen on `host:port`.
    pub fn bind(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let listener = TcpListener::bind((host, port)).map_err(|source| TransportError::Bind {
            addr: addr.clone(),
            source,
        })?;
        let addr = listener.local_addr()?;

        info!(%addr, "listening");
        Ok(Self { listener, addr })
    }

    /// Accept an incoming connection (blocking).
    pub fn accept(&self) -> Result<LinkStream> {
        let (stream, peer) = self.listener.accept().map_err(TransportError::Accept)?;
        stream.set_nodelay(true).map_err(TransportError::Accept)?;
        debug!(%peer, "accepted connection");
        Ok(LinkStream::from_tcp(stream))
    }

    /// The address this server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }
}
