use crate::error::SerdeErr;

/// Reads bit-packed data written by a [`crate::BitWriter`].
///
/// Every read is bounds-checked, so truncated or malicious input surfaces as
/// a [`SerdeErr`] instead of a panic.
pub struct BitReader<'b> {
    buffer: &'b [u8],
    byte_index: usize,
    bit_index: u8,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            byte_index: 0,
            bit_index: 0,
        }
    }

    pub fn bits_read(&self) -> u64 {
        self.byte_index as u64 * 8 + self.bit_index as u64
    }

    pub fn bits_remaining(&self) -> u64 {
        (self.buffer.len() as u64 * 8).saturating_sub(self.bits_read())
    }

    fn end_of_stream(&self) -> SerdeErr {
        SerdeErr::UnexpectedEndOfStream {
            bits_read: self.bits_read(),
        }
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        let Some(byte) = self.buffer.get(self.byte_index) else {
            return Err(self.end_of_stream());
        };

        let bit = (byte >> self.bit_index) & 1 != 0;

        self.bit_index += 1;
        if self.bit_index >= 8 {
            self.bit_index = 0;
            self.byte_index += 1;
        }

        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        if self.bit_index == 0 {
            let Some(byte) = self.buffer.get(self.byte_index) else {
                return Err(self.end_of_stream());
            };
            self.byte_index += 1;
            return Ok(*byte);
        }

        // straddles two bytes
        let (Some(low), Some(high)) = (
            self.buffer.get(self.byte_index),
            self.buffer.get(self.byte_index + 1),
        ) else {
            return Err(self.end_of_stream());
        };
        let byte = (low >> self.bit_index) | (high << (8 - self.bit_index));
        self.byte_index += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, SerdeErr> {
        if count as u64 * 8 > self.bits_remaining() {
            return Err(self.end_of_stream());
        }

        if self.bit_index == 0 {
            let start = self.byte_index;
            self.byte_index += count;
            return Ok(self.buffer[start..self.byte_index].to_vec());
        }

        let mut output = Vec::with_capacity(count);
        for _ in 0..count {
            output.push(self.read_byte()?);
        }
        Ok(output)
    }
}
