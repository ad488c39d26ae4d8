use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde};

pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<false, BITS>;
pub type SignedVariableInteger<const BITS: u8> = SerdeInteger<true, BITS>;

/// A variable-length integer written as chunks of `BITS` bits, each chunk
/// preceded by a "proceed" bit. Signed integers carry a leading sign bit.
// This outer generic type wraps an inner type that is not generic, to reduce code bloat through monomorphization.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const SIGNED: bool, const BITS: u8> {
    inner: SerdeIntegerInner,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
struct SerdeIntegerInner {
    negative: bool,
    magnitude: u64,
}

impl SerdeIntegerInner {
    fn ser(&self, writer: &mut dyn BitWrite, signed: bool, bits: u8) {
        if signed {
            writer.write_bit(self.negative);
        }

        let mut value = self.magnitude;
        loop {
            let proceed = bits < 64 && value >= (1_u64 << bits);
            writer.write_bit(proceed);
            for _ in 0..bits {
                writer.write_bit(value & 1 != 0);
                value >>= 1;
            }
            if !proceed {
                return;
            }
        }
    }

    fn de(reader: &mut BitReader, signed: bool, bits: u8) -> Result<Self, SerdeErr> {
        let negative = if signed { reader.read_bit()? } else { false };

        let mut magnitude: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let proceed = reader.read_bit()?;
            for _ in 0..bits {
                if reader.read_bit()? {
                    if shift >= 64 {
                        return Err(SerdeErr::IntegerOverflow);
                    }
                    magnitude |= 1 << shift;
                }
                shift += 1;
            }
            if !proceed {
                // every value has exactly one encoding
                let trailing_zero_chunk = shift > bits as u32 && magnitude >> (shift - bits as u32) == 0;
                if trailing_zero_chunk || (negative && magnitude == 0) {
                    return Err(SerdeErr::NonCanonicalInteger);
                }
                return Ok(Self {
                    negative,
                    magnitude,
                });
            }
            if shift >= 64 {
                return Err(SerdeErr::IntegerOverflow);
            }
        }
    }
}

impl<const BITS: u8> SerdeInteger<false, BITS> {
    pub fn new(value: u64) -> Self {
        debug_assert!(BITS > 0, "can't create an integer with 0 bits");
        Self {
            inner: SerdeIntegerInner {
                negative: false,
                magnitude: value,
            },
        }
    }

    pub fn get(&self) -> u64 {
        self.inner.magnitude
    }
}

impl<const BITS: u8> SerdeInteger<true, BITS> {
    pub fn new(value: i64) -> Self {
        debug_assert!(BITS > 0, "can't create an integer with 0 bits");
        Self {
            inner: SerdeIntegerInner {
                negative: value < 0,
                magnitude: value.unsigned_abs(),
            },
        }
    }

    pub fn get(&self) -> i64 {
        let magnitude = self.inner.magnitude as i64;
        if self.inner.negative {
            magnitude.wrapping_neg()
        } else {
            magnitude
        }
    }
}

impl<const SIGNED: bool, const BITS: u8> Serde for SerdeInteger<SIGNED, BITS> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.inner.ser(writer, SIGNED, BITS);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let inner = SerdeIntegerInner::de(reader, SIGNED, BITS)?;
        Ok(Self { inner })
    }
}
