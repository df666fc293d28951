//! Registry configuration.

/// Largest supported code length. `10^19` still fits in a `u64`.
const MAX_CODE_DIGITS: u32 = 19;

/// Settings for a [`RoomRegistry`](crate::RoomRegistry).
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Number of decimal digits in a room code. Codes are zero padded,
    /// so with the default of 8, `42` becomes `"00000042"`.
    ///
    /// Values outside `1..=19` are clamped.
    pub code_digits: u32,
}

impl RegistryConfig {
    /// Code length after clamping.
    pub fn digits(&self) -> u32 {
        self.code_digits.clamp(1, MAX_CODE_DIGITS)
    }

    /// How many distinct codes exist: `10^digits`.
    pub fn capacity(&self) -> u64 {
        10u64.pow(self.digits())
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { code_digits: 8 }
    }
}
