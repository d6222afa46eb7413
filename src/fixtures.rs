//! Smoke-test fixtures
//!
//! The three programs run against a vector unit to check that length
//! negotiation and unit-stride loads behave. Two drive vsetvli alone,
//! at group multipliers one and two; the third interleaves a vle32
//! load of a small constant buffer. Element width is 32 bits
//! throughout.

use crate::mem::{MemError, Memory};
use crate::program::VlTest;
use crate::vtype::{Lmul, Sew, Vtype};

/// Words the vle32 fixture loads, in buffer order
pub const LOAD_PATTERN: [u32; 5] = [
    0x1111_1111,
    0x2222_2222,
    0x3333_3333,
    0x4444_4444,
    0x5555_5555,
];

/// Drain five elements at e32/m1
pub fn vsetvli_m1() -> VlTest {
    VlTest::new(5, Vtype::new(Sew::E32, Lmul::M1)).expect("element count is positive")
}

/// Drain ten elements at e32/m2
pub fn vsetvli_m2() -> VlTest {
    VlTest::new(10, Vtype::new(Sew::E32, Lmul::M2)).expect("element count is positive")
}

/// Drain five elements at e32/m1, loading each granted slice into v1
///
/// Writes the load pattern into memory at base first; the program
/// walks it exactly once.
pub fn vle32(mem: &mut Memory, base: u32) -> Result<VlTest, MemError> {
    mem.write_words(base, &LOAD_PATTERN)?;
    Ok(VlTest::with_load(5, Vtype::new(Sew::E32, Lmul::M1), 1, base)
        .expect("element count is positive"))
}
