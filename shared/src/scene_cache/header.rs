use std::io::{self, Read, Write};

use crate::{compression::compression_config::SceneCacheEncoding, types::PROTOCOL_VERSION};

use crate::messages::frame::DEFAULT_MAX_FRAME_SIZE;

use super::error::SceneCacheError;

pub const SCENE_CACHE_MAGIC: [u8; 4] = *b"SSCF";

/// magic + version + sample_rate + encoding + level
pub const HEADER_SIZE: u64 = 4 + 4 + 4 + 1 + 4;

/// time + encoded_size + decoded_size
pub const RECORD_HEADER_SIZE: u64 = 4 + 8 + 8;

/// Largest decoded record a reader accepts. A record holds one scene, the
/// same unit a frame carries.
pub const MAX_RECORD_SIZE: u64 = DEFAULT_MAX_FRAME_SIZE;

#[derive(Clone, Debug, PartialEq)]
pub struct SceneCacheHeader {
    pub version: u32,
    /// Samples per second the file was written at
    pub sample_rate: f32,
    pub encoding: SceneCacheEncoding,
    pub level: i32,
}

impl SceneCacheHeader {
    pub fn new(sample_rate: f32, encoding: SceneCacheEncoding, level: i32) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            sample_rate,
            encoding,
            level,
        }
    }

    pub fn write(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(&SCENE_CACHE_MAGIC)?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.sample_rate.to_le_bytes())?;
        writer.write_all(&[self.encoding as u8])?;
        writer.write_all(&self.level.to_le_bytes())
    }

    pub fn read(reader: &mut impl Read) -> Result<Self, SceneCacheError> {
        let mut magic = [0_u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != SCENE_CACHE_MAGIC {
            return Err(SceneCacheError::BadMagic { found: magic });
        }

        let version = u32::from_le_bytes(read_array(reader)?);
        if version != PROTOCOL_VERSION {
            return Err(SceneCacheError::UnsupportedVersion { version });
        }

        let sample_rate = f32::from_le_bytes(read_array(reader)?);
        let [tag] = read_array::<1>(reader)?;
        let encoding =
            SceneCacheEncoding::from_tag(tag).ok_or(SceneCacheError::UnknownEncoding { tag })?;
        let level = i32::from_le_bytes(read_array(reader)?);

        Ok(Self {
            version,
            sample_rate,
            encoding,
            level,
        })
    }
}

/// Fixed-size prefix of every record. A header with `encoded_size == 0`
/// terminates the file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordHeader {
    pub time: f32,
    pub encoded_size: u64,
    pub decoded_size: u64,
}

impl RecordHeader {
    pub fn terminator() -> Self {
        Self {
            time: 0.0,
            encoded_size: 0,
            decoded_size: 0,
        }
    }

    pub fn is_terminator(&self) -> bool {
        self.encoded_size == 0
    }

    pub fn write(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(&self.time.to_le_bytes())?;
        writer.write_all(&self.encoded_size.to_le_bytes())?;
        writer.write_all(&self.decoded_size.to_le_bytes())
    }

    pub fn read(reader: &mut impl Read) -> io::Result<Self> {
        Ok(Self {
            time: f32::from_le_bytes(read_array(reader)?),
            encoded_size: u64::from_le_bytes(read_array(reader)?),
            decoded_size: u64::from_le_bytes(read_array(reader)?),
        })
    }
}

fn read_array<const N: usize>(reader: &mut impl Read) -> io::Result<[u8; N]> {
    let mut bytes = [0_u8; N];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}
