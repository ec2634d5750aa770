use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Frame delimiter. Chosen so it cannot occur inside a legitimate
/// space-separated command payload.
pub const DELIMITER: &str = "<|>";

/// Encode one already-joined command message as a frame.
///
/// Appends the message bytes followed by the delimiter. The message must
/// not contain the delimiter sequence.
pub fn encode_frame(message: &str, dst: &mut BytesMut) -> Result<()> {
    if message.contains(DELIMITER) {
        return Err(FrameError::DelimiterInPayload(message.to_string()));
    }
    dst.reserve(message.len() + DELIMITER.len());
    dst.put_slice(message.as_bytes());
    dst.put_slice(DELIMITER.as_bytes());
    Ok(())
}

/// Encode a command name plus parameters as a frame.
///
/// Wire format:
/// ```text
/// <name> [<param> ...]<|>
/// ```
/// Name and params are joined with single spaces. No escaping is performed;
/// a delimiter inside any part is a caller contract violation.
pub fn encode_command(name: &str, params: &[&str], dst: &mut BytesMut) -> Result<()> {
    let mut message = String::with_capacity(name.len() + params.iter().map(|p| p.len() + 1).sum::<usize>());
    message.push_str(name);
    for param in params {
        message.push(' ');
        message.push_str(param);
    }
    encode_frame(&message, dst)
}

/// Decode a buffer into the ordered sequence of command messages it holds.
///
/// Splits on the delimiter and drops empty segments, so a trailing
/// delimiter is optional and an empty buffer yields an empty sequence.
pub fn decode_frames(buffer: &str) -> Vec<String> {
    buffer
        .split(DELIMITER)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
        .collect()
}
