use std::io::{ErrorKind, Write};
use std::time::Duration;

use bytes::BytesMut;
use rclink_transport::LinkStream;

use crate::codec::{encode_command, encode_frame};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Writes complete frames to any `Write` stream.
///
/// Each `send` emits exactly one delimiter-terminated frame and flushes.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode and send one message as a frame (blocking).
    pub fn send(&mut self, message: &str) -> Result<()> {
        self.buf.clear();
        encode_frame(message, &mut self.buf)?;
        self.write_buffered()
    }

    /// Encode and send a command name plus parameters as one frame.
    pub fn send_command(&mut self, name: &str, params: &[&str]) -> Result<()> {
        self.buf.clear();
        encode_command(name, params, &mut self.buf)?;
        self.write_buffered()
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl FrameWriter<LinkStream> {
    /// Create a frame writer whose blocking writes are bounded by `timeout`.
    pub fn with_write_timeout(inner: LinkStream, timeout: Duration) -> Result<Self> {
        inner
            .set_write_timeout(Some(timeout))
            .map_err(transport_to_frame_error)?;
        Ok(Self::new(inner))
    }
}

fn transport_to_frame_error(err: rclink_transport::TransportError) -> FrameError {
    match err {
        rclink_transport::TransportError::Io(io)
        | rclink_transport::TransportError::Accept(io) => FrameError::Io(io),
        rclink_transport::TransportError::Bind { source, .. }
        | rclink_transport::TransportError::Connect { source, .. } => FrameError::Io(source),
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
