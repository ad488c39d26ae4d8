mod glam_types;
mod option;
mod primitives;
mod string;
mod vec;

use crate::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

pub(crate) fn write_length(writer: &mut dyn BitWrite, length: usize) {
    UnsignedVariableInteger::<7>::new(length as u64).ser(writer);
}

/// Reads a length prefix, rejecting lengths that could not possibly fit in
/// the rest of the stream at `min_bits_per_item` bits each.
pub(crate) fn read_length(reader: &mut BitReader, min_bits_per_item: u64) -> Result<usize, SerdeErr> {
    let length = UnsignedVariableInteger::<7>::de(reader)?.get();
    let remaining_bits = reader.bits_remaining();
    if length.saturating_mul(min_bits_per_item) > remaining_bits {
        return Err(SerdeErr::LengthOverflow {
            length,
            remaining_bits,
        });
    }
    Ok(length as usize)
}
