use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr};

/// A type that can be written to and read from a bit stream
pub trait Serde: Sized + Clone + PartialEq {
    /// Serialize Self to a BitWrite sink
    fn ser(&self, writer: &mut dyn BitWrite);

    /// Parse Self from a BitReader
    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;
}
