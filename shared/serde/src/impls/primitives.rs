use crate::{BitReader, BitWrite, Serde, SerdeErr};

impl Serde for bool {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_bit()
    }
}

impl Serde for u8 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_byte(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_byte()
    }
}

// fixed-width little-endian numbers
macro_rules! impl_serde_le_bytes {
    ($($ty:ty),*) => {$(
        impl Serde for $ty {
            fn ser(&self, writer: &mut dyn BitWrite) {
                writer.write_bytes(&self.to_le_bytes());
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                let mut bytes = [0_u8; std::mem::size_of::<$ty>()];
                for byte in bytes.iter_mut() {
                    *byte = reader.read_byte()?;
                }
                Ok(<$ty>::from_le_bytes(bytes))
            }
        }
    )*};
}

impl_serde_le_bytes!(u16, u32, u64, i8, i16, i32, i64, f32, f64);
