/// A sink for bit-packed data.
///
/// Bits are packed least-significant first, so a byte written at a byte
/// boundary comes out unchanged.
pub trait BitWrite {
    fn write_bit(&mut self, bit: bool);

    fn write_byte(&mut self, byte: u8) {
        let mut temp = byte;
        for _ in 0..8 {
            self.write_bit(temp & 1 != 0);
            temp >>= 1;
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.write_byte(*byte);
        }
    }
}

/// A BitWrite implementation backed by a growable `Vec<u8>`, so whole
/// scenes with large geometry buffers can be written in one pass.
pub struct BitWriter {
    scratch: u8,
    scratch_index: u8,
    buffer: Vec<u8>,
    bits_written: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            scratch: 0,
            scratch_index: 0,
            buffer: Vec::with_capacity(bytes),
            bits_written: 0,
        }
    }

    fn flush_scratch(&mut self) {
        if self.scratch_index > 0 {
            self.buffer.push(self.scratch);
            self.scratch = 0;
            self.scratch_index = 0;
        }
    }

    /// Consumes the writer, padding the final partial byte with zeros
    pub fn to_bytes(mut self) -> Vec<u8> {
        self.flush_scratch();
        self.buffer
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWrite for BitWriter {
    fn write_bit(&mut self, bit: bool) {
        if bit {
            self.scratch |= 1 << self.scratch_index;
        }

        self.scratch_index += 1;
        self.bits_written += 1;

        if self.scratch_index >= 8 {
            self.buffer.push(self.scratch);
            self.scratch_index = 0;
            self.scratch = 0;
        }
    }

    fn write_byte(&mut self, byte: u8) {
        self.bits_written += 8;

        if self.scratch_index == 0 {
            self.buffer.push(byte);
            return;
        }

        // low bits complete the pending byte, high bits start the next one
        self.buffer.push(self.scratch | (byte << self.scratch_index));
        self.scratch = byte >> (8 - self.scratch_index);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        if self.scratch_index == 0 {
            self.buffer.extend_from_slice(bytes);
            self.bits_written += 8 * bytes.len() as u64;
            return;
        }
        for byte in bytes {
            self.write_byte(*byte);
        }
    }
}
