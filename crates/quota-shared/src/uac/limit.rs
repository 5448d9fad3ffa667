use std::fmt::Display;

/// A non-negative daily usage quota
///
/// All arithmetic saturates so a value can never go below zero (or wrap past
/// the maximum)
#[derive(
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(transparent)]
pub struct DailyLimit(u32);

impl DailyLimit {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Adds `delta` clamping the result into the valid range
    #[must_use]
    pub fn saturating_add_signed(self, delta: i64) -> Self {
        Self::from_i64_clamped(i64::from(self.0).saturating_add(delta))
    }

    /// Interprets operator input leniently
    ///
    /// Leading whitespace is skipped then an optional sign and as many digits
    /// as are present are read. Anything after the digits is ignored. Input
    /// without any leading digits is treated as zero and negative values are
    /// clamped to zero.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim_start();
        let (is_negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let digits = &rest[..digits_len];
        if digits.is_empty() || is_negative {
            // A negative number (other than -0 which is also zero) clamps to zero
            return Self::ZERO;
        }
        // Only digits remain so failure can only be overflow
        digits.parse::<u32>().map(Self).unwrap_or(Self(u32::MAX))
    }

    fn from_i64_clamped(value: i64) -> Self {
        Self(value.clamp(0, i64::from(u32::MAX)) as u32)
    }
}

impl From<u32> for DailyLimit {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<DailyLimit> for u32 {
    fn from(value: DailyLimit) -> Self {
        value.0
    }
}

impl Display for DailyLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
