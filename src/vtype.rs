//! Vector-type configuration
//!
//! The vtype register is described in section 3.4 of the vector
//! specification version 1.0. It selects the element width (SEW) and
//! the register-group multiplier (LMUL) that subsequent vector
//! instructions operate under, together with the tail- and
//! mask-agnostic policy bits. The layout of the register image is:
//!
//! - bits [2:0]: vlmul (group multiplier; 0b100 is reserved)
//! - bits [5:3]: vsew (element width; 0b1xx is reserved)
//! - bit 6: vta (tail agnostic)
//! - bit 7: vma (mask agnostic)
//! - bits [30:8]: reserved, must be zero
//! - bit 31: vill (set when a write attempted an unsupported
//!   configuration; an image with vill set carries no configuration)
//!
//! The largest element count a register group can hold under a
//! configuration is VLMAX = VLEN * LMUL / SEW (section 3.4.2). A
//! configuration whose VLMAX is zero cannot be used.

use crate::utils::{bit, field};
use thiserror::Error;

/// Selected element width (SEW), in bits
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sew {
    E8,
    E16,
    E32,
    E64,
}

impl Sew {
    /// Width of one element in bits
    pub fn bits(&self) -> u32 {
        match self {
            Sew::E8 => 8,
            Sew::E16 => 16,
            Sew::E32 => 32,
            Sew::E64 => 64,
        }
    }

    /// Width of one element in bytes
    pub fn bytes(&self) -> u32 {
        self.bits() / 8
    }

    fn decode(vsew: u32) -> Result<Self, VtypeError> {
        match vsew {
            0b000 => Ok(Sew::E8),
            0b001 => Ok(Sew::E16),
            0b010 => Ok(Sew::E32),
            0b011 => Ok(Sew::E64),
            _ => Err(VtypeError::ReservedSew(vsew)),
        }
    }

    fn encode(&self) -> u32 {
        match self {
            Sew::E8 => 0b000,
            Sew::E16 => 0b001,
            Sew::E32 => 0b010,
            Sew::E64 => 0b011,
        }
    }
}

/// Register-group multiplier (LMUL)
///
/// Integral multipliers gang 2, 4 or 8 registers into one logical
/// group; fractional multipliers dedicate part of a single register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Lmul {
    M1,
    M2,
    M4,
    M8,
    /// 1/2
    F2,
    /// 1/4
    F4,
    /// 1/8
    F8,
}

impl Lmul {
    /// The multiplier as a (numerator, denominator) pair
    pub fn ratio(&self) -> (u32, u32) {
        match self {
            Lmul::M1 => (1, 1),
            Lmul::M2 => (2, 1),
            Lmul::M4 => (4, 1),
            Lmul::M8 => (8, 1),
            Lmul::F2 => (1, 2),
            Lmul::F4 => (1, 4),
            Lmul::F8 => (1, 8),
        }
    }

    /// Number of whole registers occupied by one group
    ///
    /// Fractional multipliers still occupy one register (part of it).
    pub fn group_len(&self) -> usize {
        match self {
            Lmul::M2 => 2,
            Lmul::M4 => 4,
            Lmul::M8 => 8,
            _ => 1,
        }
    }

    fn decode(vlmul: u32) -> Result<Self, VtypeError> {
        match vlmul {
            0b000 => Ok(Lmul::M1),
            0b001 => Ok(Lmul::M2),
            0b010 => Ok(Lmul::M4),
            0b011 => Ok(Lmul::M8),
            0b101 => Ok(Lmul::F8),
            0b110 => Ok(Lmul::F4),
            0b111 => Ok(Lmul::F2),
            _ => Err(VtypeError::ReservedLmul(vlmul)),
        }
    }

    fn encode(&self) -> u32 {
        match self {
            Lmul::M1 => 0b000,
            Lmul::M2 => 0b001,
            Lmul::M4 => 0b010,
            Lmul::M8 => 0b011,
            Lmul::F8 => 0b101,
            Lmul::F4 => 0b110,
            Lmul::F2 => 0b111,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VtypeError {
    #[error("vtype image has vill set and carries no configuration")]
    Vill,
    #[error("reserved element-width encoding {0:#05b}")]
    ReservedSew(u32),
    #[error("reserved group-multiplier encoding {0:#05b}")]
    ReservedLmul(u32),
    #[error("reserved bits [30:8] are nonzero in vtype image {0:#010x}")]
    ReservedBits(u32),
}

/// A legal vector-type configuration
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Vtype {
    pub sew: Sew,
    pub lmul: Lmul,
    pub vta: bool,
    pub vma: bool,
}

impl Vtype {
    /// Configuration with undisturbed tail/mask policy
    pub fn new(sew: Sew, lmul: Lmul) -> Self {
        Self {
            sew,
            lmul,
            vta: false,
            vma: false,
        }
    }

    /// Decode a vtype register image
    pub fn decode(raw: u32) -> Result<Self, VtypeError> {
        if bit(raw, 31) {
            return Err(VtypeError::Vill);
        }
        if field(raw, 30, 8) != 0 {
            return Err(VtypeError::ReservedBits(raw));
        }
        Ok(Self {
            sew: Sew::decode(field(raw, 5, 3))?,
            lmul: Lmul::decode(field(raw, 2, 0))?,
            vta: bit(raw, 6),
            vma: bit(raw, 7),
        })
    }

    /// Encode as a vtype register image (vill clear)
    pub fn encode(&self) -> u32 {
        self.lmul.encode()
            | (self.sew.encode() << 3)
            | (u32::from(self.vta) << 6)
            | (u32::from(self.vma) << 7)
    }

    /// Element capacity of one register group at the given VLEN
    ///
    /// Zero means the configuration is unsupported at that VLEN.
    pub fn vlmax(&self, vlen: u32) -> u32 {
        let (num, den) = self.lmul.ratio();
        (vlen * num) / (self.sew.bits() * den)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn decode_e32_m1() {
        let vtype = Vtype::decode(0b010_000).unwrap();
        assert_eq!(vtype.sew, Sew::E32);
        assert_eq!(vtype.lmul, Lmul::M1);
        assert!(!vtype.vta);
        assert!(!vtype.vma);
        assert_eq!(vtype.vlmax(128), 4);
    }

    #[test]
    fn decode_e32_m2() {
        let vtype = Vtype::decode(0b010_001).unwrap();
        assert_eq!(vtype.sew, Sew::E32);
        assert_eq!(vtype.lmul, Lmul::M2);
        assert_eq!(vtype.vlmax(128), 8);
    }

    #[test]
    fn decode_fractional_lmul() {
        let vtype = Vtype::decode(0b000_111).unwrap();
        assert_eq!(vtype.sew, Sew::E8);
        assert_eq!(vtype.lmul, Lmul::F2);
        assert_eq!(vtype.vlmax(128), 8);
    }

    #[test]
    fn decode_policy_bits() {
        let vtype = Vtype::decode(0b11_010_001).unwrap();
        assert!(vtype.vta);
        assert!(vtype.vma);
    }

    #[test]
    fn vill_image_is_an_error() {
        assert_eq!(Vtype::decode(1 << 31), Err(VtypeError::Vill));
    }

    #[test]
    fn reserved_sew_is_an_error() {
        assert_eq!(
            Vtype::decode(0b100_000),
            Err(VtypeError::ReservedSew(0b100))
        );
    }

    #[test]
    fn reserved_lmul_is_an_error() {
        assert_eq!(
            Vtype::decode(0b000_100),
            Err(VtypeError::ReservedLmul(0b100))
        );
    }

    #[test]
    fn reserved_bits_are_an_error() {
        assert_eq!(
            Vtype::decode(0x400 | 0b010_000),
            Err(VtypeError::ReservedBits(0x410))
        );
    }

    #[test]
    fn encode_matches_decode() {
        let vtype = Vtype {
            sew: Sew::E32,
            lmul: Lmul::M2,
            vta: true,
            vma: true,
        };
        assert_eq!(vtype.encode(), 0b11_010_001);
        assert_eq!(Vtype::decode(vtype.encode()).unwrap(), vtype);
    }

    #[test]
    fn vlmax_zero_when_group_too_narrow() {
        // One eighth of a 128-bit register cannot hold a 64-bit element
        let vtype = Vtype::new(Sew::E64, Lmul::F8);
        assert_eq!(vtype.vlmax(128), 0);
    }
}
