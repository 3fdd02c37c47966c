use core::fmt;

/// Integer key identifying a compatibility class of pooled resources.
///
/// Keys are derived from descriptors by [`KeyHasher`]. Equal descriptors always
/// produce equal keys; distinct descriptors may collide.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoolKey(pub u64);

impl fmt::Debug for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoolKey({})", self.0)
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Additive accumulator used to derive a [`PoolKey`] from descriptor fields.
///
/// Every contribution is summed with wrapping arithmetic, so the result does not
/// depend on the order fields are fed in.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyHasher {
    sum: u64,
}

impl KeyHasher {
    /// Creates an empty accumulator.
    pub const fn new() -> Self {
        KeyHasher { sum: 0 }
    }

    /// Adds an integer field.
    #[inline]
    pub fn add(&mut self, value: u64) -> &mut Self {
        self.sum = self.sum.wrapping_add(value);
        self
    }

    /// Adds a boolean flag as 0 or 1.
    #[inline]
    pub fn add_flag(&mut self, flag: bool) -> &mut Self {
        self.add(flag as u64)
    }

    /// Adds a float by bit pattern. `-0.0` and `0.0` contribute the same value.
    #[inline]
    pub fn add_f32(&mut self, value: f32) -> &mut Self {
        self.add(f32_bits(value) as u64)
    }

    /// Returns the accumulated key.
    #[inline]
    pub fn finish(&self) -> PoolKey {
        PoolKey(self.sum)
    }
}

/// Bit pattern of `value` with negative zero folded onto positive zero.
#[inline]
pub(crate) fn f32_bits(value: f32) -> u32 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}
