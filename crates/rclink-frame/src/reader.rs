use std::collections::VecDeque;
use std::io::{ErrorKind, Read};
use std::time::Duration;

use bytes::{Buf, BytesMut};
use rclink_transport::LinkStream;

use crate::codec::DELIMITER;
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Size of one read from the underlying stream.
pub const READ_CHUNK_SIZE: usize = 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally: an incomplete trailing fragment stays
/// buffered until its delimiter arrives, and a read that carries several
/// concatenated frames queues all of them in arrival order.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    pending: VecDeque<String>,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            pending: VecDeque::new(),
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<String> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(frame);
            }
            self.fill()?;
        }
    }

    /// Perform one read and return every complete frame now available.
    ///
    /// Returns an empty vec when the read delivered only part of a frame.
    /// EOF is `Err(FrameError::ConnectionClosed)`; a read timeout
    /// propagates as `FrameError::Io` with `WouldBlock`/`TimedOut`.
    pub fn read_available(&mut self) -> Result<Vec<String>> {
        if self.pending.is_empty() {
            self.fill()?;
        }
        Ok(self.pending.drain(..).collect())
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let read = loop {
            match self.inner.read(&mut chunk) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        };

        if read == 0 {
            return Err(FrameError::ConnectionClosed);
        }

        self.buf.extend_from_slice(&chunk[..read]);
        self.drain_complete()
    }

    fn drain_complete(&mut self) -> Result<()> {
        let delimiter = DELIMITER.as_bytes();
        while let Some(pos) = self
            .buf
            .windows(delimiter.len())
            .position(|window| window == delimiter)
        {
            let message = self.buf.split_to(pos);
            self.buf.advance(delimiter.len());
            if message.is_empty() {
                continue;
            }
            self.pending.push_back(String::from_utf8(message.to_vec())?);
        }
        Ok(())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl FrameReader<LinkStream> {
    /// Create a frame reader whose blocking reads are bounded by `timeout`.
    ///
    /// This is the readiness wait: a read that sees no data within the
    /// timeout fails with `WouldBlock`/`TimedOut` instead of blocking
    /// forever, keeping the listening loop responsive to interruption.
    pub fn with_wait_timeout(inner: LinkStream, timeout: Duration) -> Result<Self> {
        inner
            .set_read_timeout(Some(timeout))
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

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn read_single_frame() {
        let mut reader = FrameReader::new(Cursor::new(b"joy_neutral<|>".to_vec()));
        assert_eq!(reader.read_frame().unwrap(), "joy_neutral");
    }

    #[test]
    fn read_concatenated_frames_in_order() {
        let mut reader = FrameReader::new(Cursor::new(b"joy_forward 10<|>joy_neutral<|>".to_vec()));

        let frames = reader.read_available().unwrap();
        assert_eq!(frames, vec!["joy_forward 10", "joy_neutral"]);
    }

    #[test]
    fn partial_frame_is_retained_until_complete() {
        let mut reader = FrameReader::new(TwoPartReader {
            parts: vec![b"joy_forw".to_vec(), b"ard 50<|>".to_vec()],
            next: 0,
        });

        assert!(reader.read_available().unwrap().is_empty());
        assert_eq!(reader.read_available().unwrap(), vec!["joy_forward 50"]);
    }

    #[test]
    fn byte_by_byte_delivery_yields_whole_frames() {
        let reader = ByteByByteReader {
            bytes: b"joy_backward 30<|>joy_dir_left<|>".to_vec(),
            pos: 0,
        };
        let mut reader = FrameReader::new(reader);

        assert_eq!(reader.read_frame().unwrap(), "joy_backward 30");
        assert_eq!(reader.read_frame().unwrap(), "joy_dir_left");
    }

    #[test]
    fn eof_is_connection_closed() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn eof_with_incomplete_fragment_never_dispatches_it() {
        let mut reader = FrameReader::new(Cursor::new(b"joy_forward 1".to_vec()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn empty_segments_are_skipped() {
        let mut reader = FrameReader::new(Cursor::new(b"<|><|>joy_neutral<|>".to_vec()));
        assert_eq!(reader.read_frame().unwrap(), "joy_neutral");
    }

    #[test]
    fn invalid_utf8_frame_is_an_error() {
        let mut wire = b"\xff\xfe".to_vec();
        wire.extend_from_slice(DELIMITER.as_bytes());
        let mut reader = FrameReader::new(Cursor::new(wire));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::InvalidUtf8(_)));
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = InterruptedThenData {
            interrupted: false,
            bytes: b"joy_neutral<|>".to_vec(),
            pos: 0,
        };
        let mut reader = FrameReader::new(reader);
        assert_eq!(reader.read_frame().unwrap(), "joy_neutral");
    }

    #[test]
    fn would_block_propagates_as_io() {
        struct AlwaysWouldBlock;
        impl Read for AlwaysWouldBlock {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(ErrorKind::WouldBlock))
            }
        }

        let mut reader = FrameReader::new(AlwaysWouldBlock);
        let err = reader.read_available().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn read_frame_leaves_later_frames_pending() {
        let mut reader =
            FrameReader::new(Cursor::new(b"id_approved<|>joy_forward 5<|>".to_vec()));

        assert_eq!(reader.read_frame().unwrap(), "id_approved");
        assert_eq!(reader.read_available().unwrap(), vec!["joy_forward 5"]);
    }

    struct TwoPartReader {
        parts: Vec<Vec<u8>>,
        next: usize,
    }

    impl Read for TwoPartReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.next >= self.parts.len() {
                return Ok(0);
            }
            let part = &self.parts[self.next];
            self.next += 1;
            buf[..part.len()].copy_from_slice(part);
            Ok(part.len())
        }
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        interrupted: bool,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let n = (self.bytes.len() - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }
}
