use std::io::{self, Read, Write};

use super::error::FrameError;

pub const DEFAULT_MAX_FRAME_SIZE: u64 = 1 << 30;

/// Writes `payload` prefixed by its length as a little-endian u32
pub fn write_frame(writer: &mut impl Write, payload: &[u8]) -> io::Result<()> {
    let length = u32::try_from(payload.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("frame of {} bytes does not fit a u32 length prefix", payload.len()),
        )
    })?;
    writer.write_all(&length.to_le_bytes())?;
    writer.write_all(payload)
}

/// Reassembles length-prefixed frames from a byte stream
pub struct FrameReader<R: Read> {
    reader: R,
    max_frame_size: u64,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_frame_size(reader, DEFAULT_MAX_FRAME_SIZE)
    }

    pub fn with_max_frame_size(reader: R, max_frame_size: u64) -> Self {
        Self {
            reader,
            max_frame_size,
        }
    }

    /// Returns the next frame, or `None` when the stream closed cleanly
    /// between frames
    pub fn read_frame(&mut self) -> Result<Option<Vec<u8>>, FrameError> {
        let mut prefix = [0_u8; 4];
        let mut filled = 0;
        while filled < prefix.len() {
            match self.reader.read(&mut prefix[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => return Err(FrameError::Truncated),
                Ok(count) => filled += count,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }

        let size = u32::from_le_bytes(prefix) as u64;
        if size > self.max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size,
                max: self.max_frame_size,
            });
        }

        // grows with the bytes that actually arrive, the prefix is untrusted
        let mut payload = Vec::new();
        (&mut self.reader).take(size).read_to_end(&mut payload)?;
        if payload.len() as u64 != size {
            return Err(FrameError::Truncated);
        }
        Ok(Some(payload))
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
