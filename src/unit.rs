//! Vector-unit interface
//!
//! This file defines a trait VectorUnit which is the seam between the
//! test programs and the vector hardware they exercise. A program
//! never issues a vector instruction directly; it calls through this
//! trait, and the implementation decides what "hardware" means. The
//! implementation provided here, SoftVectorUnit, is a software model
//! of the length-negotiation and unit-stride-load behaviour described
//! in sections 3.4 and 7.4 of the vector specification version 1.0. A
//! test stub that honours the same contract is an equally valid
//! implementation.
//!
//! The contract of the length-setting operation is the part the test
//! programs depend on for termination: for a positive requested count,
//! the granted count is positive, no larger than the request, and no
//! larger than VLMAX under the requested configuration.

use crate::mem::{MemError, Memory, Wordsize};
use crate::vtype::{Sew, Vtype};
use log::debug;
use thiserror::Error;

/// Number of architectural vector registers
pub const VREG_COUNT: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("configuration {0:?} is unsupported at VLEN={1} (VLMAX is zero)")]
    UnsupportedConfig(Vtype, u32),
    #[error("vector load issued before any vector length was set")]
    NoActiveConfig,
    #[error("v{0} is not a vector register")]
    BadRegister(usize),
    #[error("register group at v{0} is not aligned to the group multiplier")]
    MisalignedGroup(usize),
    #[error("vector load fault: {0}")]
    LoadFault(#[from] MemError),
}

/// Vector-unit operations used by the test programs
pub trait VectorUnit {
    /// Install a configuration and negotiate the vector length
    ///
    /// Models vsetvli: the unit adopts vtype, sets vl to the granted
    /// element count and returns it. For requested > 0 the granted
    /// count satisfies 0 < granted <= min(requested, VLMAX). An
    /// unsupported configuration is an error (the vill case).
    fn set_vl(&mut self, requested: u32, vtype: Vtype) -> Result<u32, UnitError>;

    /// The vector length granted by the last set_vl
    fn vl(&self) -> u32;

    /// The configuration installed by the last set_vl, if any
    fn vtype(&self) -> Option<Vtype>;

    /// Load vl() elements of the installed SEW from memory
    ///
    /// Models a unit-stride load (vle32.v and friends): element i is
    /// read from base + i * SEW bytes and written to element i of the
    /// register group rooted at vd. Elements past one register's
    /// capacity continue into the next register of the group.
    fn load_unit_stride(&mut self, vd: usize, mem: &Memory, base: u32) -> Result<(), UnitError>;
}

/// Vector register file: VREG_COUNT registers of vlen bits each
///
/// Registers are stored back to back, so element addressing that runs
/// off the end of one register lands at the start of the next. That is
/// exactly the layout register grouping requires.
#[derive(Debug, Clone)]
pub struct VectorRegFile {
    vlenb: usize,
    data: Vec<u8>,
}

impl VectorRegFile {
    fn new(vlen: u32) -> Self {
        let vlenb = vlen as usize / 8;
        Self {
            vlenb,
            data: vec![0; VREG_COUNT * vlenb],
        }
    }

    /// Read element idx of the group rooted at reg, at the given width
    pub fn read_elem(&self, reg: usize, sew: Sew, idx: usize) -> u64 {
        let off = reg * self.vlenb + idx * sew.bytes() as usize;
        let mut value = 0;
        for n in 0..sew.bytes() as usize {
            value |= u64::from(self.data[off + n]) << (8 * n);
        }
        value
    }

    /// Write element idx of the group rooted at reg, at the given width
    pub fn write_elem(&mut self, reg: usize, sew: Sew, idx: usize, value: u64) {
        let off = reg * self.vlenb + idx * sew.bytes() as usize;
        for n in 0..sew.bytes() as usize {
            self.data[off + n] = (value >> (8 * n)) as u8;
        }
    }
}

/// Software model of the vector unit
///
/// Holds the vl/vtype state that vsetvli negotiates and a register
/// file of configurable VLEN. The granted length is min(requested,
/// VLMAX), the selection every in-order implementation makes.
#[derive(Debug, Clone)]
pub struct SoftVectorUnit {
    vlen: u32,
    vl: u32,
    vtype: Option<Vtype>,
    regs: VectorRegFile,
}

impl Default for SoftVectorUnit {
    /// A unit with the application-profile minimum VLEN of 128
    fn default() -> Self {
        Self::new(128)
    }
}

impl SoftVectorUnit {
    pub fn new(vlen: u32) -> Self {
        Self {
            vlen,
            vl: 0,
            vtype: None,
            regs: VectorRegFile::new(vlen),
        }
    }

    pub fn vlen(&self) -> u32 {
        self.vlen
    }

    /// Inspect the register file (loaded data ends up here)
    pub fn regs(&self) -> &VectorRegFile {
        &self.regs
    }
}

impl VectorUnit for SoftVectorUnit {
    fn set_vl(&mut self, requested: u32, vtype: Vtype) -> Result<u32, UnitError> {
        let vlmax = vtype.vlmax(self.vlen);
        if vlmax == 0 {
            return Err(UnitError::UnsupportedConfig(vtype, self.vlen));
        }
        let granted = requested.min(vlmax);
        self.vtype = Some(vtype);
        self.vl = granted;
        debug!("set_vl: requested={requested} vlmax={vlmax} granted={granted}");
        Ok(granted)
    }

    fn vl(&self) -> u32 {
        self.vl
    }

    fn vtype(&self) -> Option<Vtype> {
        self.vtype
    }

    fn load_unit_stride(&mut self, vd: usize, mem: &Memory, base: u32) -> Result<(), UnitError> {
        let vtype = self.vtype.ok_or(UnitError::NoActiveConfig)?;
        if vd >= VREG_COUNT {
            return Err(UnitError::BadRegister(vd));
        }
        if vd % vtype.lmul.group_len() != 0 {
            return Err(UnitError::MisalignedGroup(vd));
        }
        let word_size = match vtype.sew {
            Sew::E8 => Wordsize::Byte,
            Sew::E16 => Wordsize::Halfword,
            Sew::E32 => Wordsize::Word,
            Sew::E64 => Wordsize::Doubleword,
        };
        for i in 0..self.vl {
            let addr = base + i * vtype.sew.bytes();
            let value = mem.read(addr, word_size)?;
            self.regs.write_elem(vd, vtype.sew, i as usize, value);
        }
        debug!("load_unit_stride: vd={vd} base={base:#010x} count={}", self.vl);
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::vtype::Lmul;

    #[test]
    fn set_vl_clamps_to_vlmax() {
        let mut unit = SoftVectorUnit::default();
        let granted = unit.set_vl(5, Vtype::new(Sew::E32, Lmul::M1)).unwrap();
        assert_eq!(granted, 4);
        assert_eq!(unit.vl(), 4);
        assert_eq!(unit.vtype(), Some(Vtype::new(Sew::E32, Lmul::M1)));
    }

    #[test]
    fn set_vl_grants_request_under_vlmax() {
        let mut unit = SoftVectorUnit::default();
        let granted = unit.set_vl(3, Vtype::new(Sew::E32, Lmul::M1)).unwrap();
        assert_eq!(granted, 3);
    }

    #[test]
    fn set_vl_uses_group_capacity() {
        let mut unit = SoftVectorUnit::default();
        let granted = unit.set_vl(10, Vtype::new(Sew::E32, Lmul::M2)).unwrap();
        assert_eq!(granted, 8);
    }

    #[test]
    fn unsupported_config_is_an_error() {
        let mut unit = SoftVectorUnit::default();
        let vtype = Vtype::new(Sew::E64, Lmul::F8);
        assert_eq!(
            unit.set_vl(1, vtype),
            Err(UnitError::UnsupportedConfig(vtype, 128))
        );
    }

    #[test]
    fn load_needs_a_configuration() {
        let mut unit = SoftVectorUnit::default();
        let mem = Memory::default();
        assert_eq!(
            unit.load_unit_stride(1, &mem, 0),
            Err(UnitError::NoActiveConfig)
        );
    }

    #[test]
    fn load_reads_words_into_register() {
        let mut unit = SoftVectorUnit::new(256);
        let mut mem = Memory::default();
        mem.write_words(0x1000, &[0x11, 0x22, 0x33, 0x44, 0x55])
            .unwrap();
        unit.set_vl(5, Vtype::new(Sew::E32, Lmul::M1)).unwrap();
        unit.load_unit_stride(1, &mem, 0x1000).unwrap();
        for (i, expected) in [0x11, 0x22, 0x33, 0x44, 0x55].iter().enumerate() {
            assert_eq!(unit.regs().read_elem(1, Sew::E32, i), *expected);
        }
        // Elements past vl were not touched
        assert_eq!(unit.regs().read_elem(1, Sew::E32, 5), 0);
    }

    #[test]
    fn load_spills_into_register_group() {
        let mut unit = SoftVectorUnit::default();
        let mut mem = Memory::default();
        let words: Vec<u32> = (1..=8).collect();
        mem.write_words(0, &words).unwrap();
        unit.set_vl(8, Vtype::new(Sew::E32, Lmul::M2)).unwrap();
        unit.load_unit_stride(2, &mem, 0).unwrap();
        // VLEN=128 holds four e32 elements per register, so elements
        // 4..8 of the group land in v3
        assert_eq!(unit.regs().read_elem(2, Sew::E32, 3), 4);
        assert_eq!(unit.regs().read_elem(2, Sew::E32, 4), 5);
        assert_eq!(unit.regs().read_elem(3, Sew::E32, 0), 5);
        assert_eq!(unit.regs().read_elem(3, Sew::E32, 3), 8);
    }

    #[test]
    fn load_checks_group_alignment() {
        let mut unit = SoftVectorUnit::default();
        let mem = Memory::default();
        unit.set_vl(8, Vtype::new(Sew::E32, Lmul::M2)).unwrap();
        assert_eq!(
            unit.load_unit_stride(1, &mem, 0),
            Err(UnitError::MisalignedGroup(1))
        );
    }

    #[test]
    fn load_checks_register_index() {
        let mut unit = SoftVectorUnit::default();
        let mem = Memory::default();
        unit.set_vl(1, Vtype::new(Sew::E32, Lmul::M1)).unwrap();
        assert_eq!(
            unit.load_unit_stride(32, &mem, 0),
            Err(UnitError::BadRegister(32))
        );
    }

    #[test]
    fn load_propagates_memory_faults() {
        let mut unit = SoftVectorUnit::default();
        let mem = Memory::new(0x10);
        unit.set_vl(4, Vtype::new(Sew::E32, Lmul::M1)).unwrap();
        let result = unit.load_unit_stride(1, &mem, 0x8);
        assert!(matches!(result, Err(UnitError::LoadFault(_))));
    }
}
