//! Delimiter-terminated text command framing.
//!
//! Every command on the wire is a UTF-8 text message terminated by the
//! `<|>` delimiter. One TCP read may carry zero, one, or several frames;
//! [`FrameReader`] buffers partial frames across reads so callers only ever
//! see complete, delimiter-terminated commands.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{decode_frames, encode_command, encode_frame, DELIMITER};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
