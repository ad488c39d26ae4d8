use crate::{BitReader, BitWrite, Serde, SerdeErr};

use super::{read_length, write_length};

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_length(writer, self.len());
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        // every Serde value occupies at least one bit
        let length = read_length(reader, 1)?;
        let mut output = Vec::with_capacity(length);
        for _ in 0..length {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }
}
