use std::ops::{BitAnd, Shl, Shr};

use num::Integer;

/// Make an n_bits-long mask (all ones)
pub fn mask<T>(n_bits: T) -> T
where
    T: Integer + Shl<Output = T>,
{
    (T::one() << n_bits) - T::one()
}

/// Obtain value[hi:lo] (verilog notation) from value
pub fn field<T>(value: T, hi: T, lo: T) -> T
where
    T: Copy + Integer + Shl<Output = T> + Shr<Output = T> + BitAnd<Output = T>,
{
    mask(hi - lo + T::one()) & (value >> lo)
}

/// Return bit n of value as a bool
pub fn bit<T>(value: T, n: T) -> bool
where
    T: Copy + Integer + Shl<Output = T> + Shr<Output = T> + BitAnd<Output = T>,
{
    field(value, n, n) == T::one()
}
