//! Framing for the engine channel.
//!
//! The engine is a remote peer on an ordered byte channel. Each frame is a
//! big-endian u32 payload length followed by one JSON document: outgoing,
//! the tick batch produced by [`encode_outgoing`]; inbound, one engine
//! reply. Frame-level corruption (truncated stream, absurd length prefix)
//! is an I/O error. The inbound payload is returned undecoded on purpose:
//! whether it parses is the runtime's concern, so one malformed engine
//! message never kills the channel.

use std::io::{self, Read, Write};

use aria_types::OutgoingMessage;

use crate::encode_outgoing;

/// Engine replies are a handful of scalar fields and a tick batch is a few
/// commands; a length prefix anywhere near this is corruption, not data.
const MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// Frame and write one tick's outgoing batch.
pub fn write_outgoing<W: Write>(writer: &mut W, message: &OutgoingMessage) -> io::Result<()> {
    let payload = serde_json::to_vec(&encode_outgoing(message))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writer.write_all(&(payload.len() as u32).to_be_bytes())?;
    writer.write_all(&payload)?;
    writer.flush()
}

/// Read one frame's payload without decoding it.
pub fn read_frame<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf) as usize;

    if len > MAX_FRAME_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame length {} exceeds the {} byte bound", len, MAX_FRAME_BYTES),
        ));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}
