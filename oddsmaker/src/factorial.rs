//! Factorials of small integers, served from a precomputed table.

pub trait Factorial {
    fn get(&self, n: u8) -> u64;
}

/// Largest `n` whose factorial fits in a `u64`.
pub const MAX_N: u8 = 20;

const ENTRIES: usize = MAX_N as usize + 1;

#[derive(Debug, Clone)]
pub struct Lookup {
    entries: [u64; ENTRIES],
}
impl Lookup {
    pub const fn new() -> Self {
        let mut entries = [1u64; ENTRIES];
        let mut i = 2;
        while i < ENTRIES {
            entries[i] = i as u64 * entries[i - 1];
            i += 1;
        }
        Self { entries }
    }
}

impl Default for Lookup {
    fn default() -> Self {
        Self::new()
    }
}

impl Factorial for Lookup {
    #[inline]
    fn get(&self, n: u8) -> u64 {
        assert!(n <= MAX_N, "{n}! overflows");
        self.entries[n as usize]
    }
}

/// Shared table, built at compile time.
pub static LOOKUP: Lookup = Lookup::new();
