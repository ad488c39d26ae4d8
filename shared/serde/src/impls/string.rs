use crate::{BitReader, BitWrite, Serde, SerdeErr};

use super::{read_length, write_length};

impl Serde for String {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_length(writer, self.len());
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let length = read_length(reader, 8)?;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes).map_err(|_| SerdeErr::InvalidUtf8)
    }
}
