use crate::BitWrite;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// A BitWrite sink that folds the stream into a 64-bit FNV-1a hash instead
/// of storing it. Serializing a value into a `HashWriter` fingerprints
/// exactly the bits that would go on the wire.
pub struct HashWriter {
    state: u64,
    scratch: u8,
    scratch_index: u8,
}

impl HashWriter {
    pub fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
            scratch: 0,
            scratch_index: 0,
        }
    }

    fn fold(&mut self, byte: u8) {
        self.state ^= byte as u64;
        self.state = self.state.wrapping_mul(FNV_PRIME);
    }

    pub fn finish(mut self) -> u64 {
        if self.scratch_index > 0 {
            let (scratch, index) = (self.scratch, self.scratch_index);
            self.fold(scratch);
            self.fold(index);
        }
        self.state
    }
}

impl Default for HashWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWrite for HashWriter {
    fn write_bit(&mut self, bit: bool) {
        if bit {
            self.scratch |= 1 << self.scratch_index;
        }
        self.scratch_index += 1;
        if self.scratch_index >= 8 {
            let scratch = self.scratch;
            self.fold(scratch);
            self.scratch = 0;
            self.scratch_index = 0;
        }
    }

    fn write_byte(&mut self, byte: u8) {
        if self.scratch_index == 0 {
            self.fold(byte);
            return;
        }
        let combined = self.scratch | (byte << self.scratch_index);
        self.fold(combined);
        self.scratch = byte >> (8 - self.scratch_index);
    }
}
