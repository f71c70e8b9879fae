pub const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
pub const FNV_PRIME: u32 = 16_777_619;

/// FNV-1a over the UTF-16 code units of `text`.
pub fn hash_str(text: &str) -> u32 {
    text.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// 32-bit xorshift (13, 17, 5). Each generation owns its own instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(hash_str(text))
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        s
    }

    /// Next value in `[0, 1]`, normalized by `u32::MAX`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::MAX)
    }

    /// Uniform index into a slice of `len` items.
    pub fn pick_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }
}
