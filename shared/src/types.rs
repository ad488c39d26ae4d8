use scenesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Sentinel id meaning "no object". Callers substitute a default (e.g. "no
/// material") rather than treating it as an error.
pub const INVALID_ID: i32 = -1;

/// Version written into every wire message and scene cache file header
pub const PROTOCOL_VERSION: u32 = 1;

/// Logical identity of a deleted or exported object: its path (or name)
/// plus the process-local id it was exported with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
    pub id: i32,
}

impl Identifier {
    pub fn new(name: impl Into<String>, id: i32) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    /// Matches by id when both ids are valid, otherwise by name
    pub fn identify(&self, other: &Identifier) -> bool {
        if self.id != INVALID_ID && other.id != INVALID_ID {
            self.id == other.id
        } else {
            self.name == other.name
        }
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self {
            name: String::new(),
            id: INVALID_ID,
        }
    }
}

impl Serde for Identifier {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.name.ser(writer);
        self.id.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let name = String::de(reader)?;
        let id = i32::de(reader)?;
        Ok(Self { name, id })
    }
}
