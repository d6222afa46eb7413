//! Vector-length test program
//!
//! This is the one component the fixtures instantiate. A program holds
//! a count of elements still to be processed and, each step, asks the
//! vector unit to set a vector length for that count, then retires the
//! granted number of elements. The load variant also issues a
//! unit-stride vector load for the granted elements and walks a cursor
//! through its data buffer. When the count reaches zero the program
//! reports completion to the harness and stays in the Done state.
//!
//! Termination rests on the unit contract: a positive request is
//! granted a positive count no larger than the request, so the
//! remaining count strictly decreases every step. A unit that breaks
//! the contract is reported as an error rather than looped on, since
//! in software that bug would otherwise hang the run.

use crate::harness::{Harness, TestEvent};
use crate::mem::Memory;
use crate::unit::{UnitError, VectorUnit};
use crate::vtype::Vtype;
use log::debug;
use thiserror::Error;

/// Whether the program still has elements to process
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Running,
    Done,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgramError {
    #[error("initial element count must be positive")]
    ZeroElementCount,
    #[error("vector unit granted {granted} of {requested} requested elements")]
    ContractViolation { requested: u32, granted: u32 },
    #[error("vector unit error: {0}")]
    Unit(#[from] UnitError),
}

#[derive(Debug)]
struct LoadState {
    vd: usize,
    base: u32,
    /// Elements consumed so far; the next load starts here
    cursor: u32,
}

/// A vector-length test program
///
/// Created with the total element count and the configuration to
/// request. step() performs one negotiation iteration against a
/// VectorUnit, reporting observable events to a Harness; run() steps
/// until the Done state. Stepping a Done program has no effect.
#[derive(Debug)]
pub struct VlTest {
    vtype: Vtype,
    remaining: u32,
    load: Option<LoadState>,
    status: Status,
    iterations: u32,
}

impl VlTest {
    pub fn new(total: u32, vtype: Vtype) -> Result<Self, ProgramError> {
        if total == 0 {
            return Err(ProgramError::ZeroElementCount);
        }
        Ok(Self {
            vtype,
            remaining: total,
            load: None,
            status: Status::Running,
            iterations: 0,
        })
    }

    /// A program that also loads its elements from memory
    ///
    /// Each iteration issues a unit-stride load of the granted
    /// elements into the register group rooted at vd, reading from
    /// base plus the elements already consumed.
    pub fn with_load(total: u32, vtype: Vtype, vd: usize, base: u32) -> Result<Self, ProgramError> {
        let mut program = Self::new(total, vtype)?;
        program.load = Some(LoadState {
            vd,
            base,
            cursor: 0,
        });
        Ok(program)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn vtype(&self) -> Vtype {
        self.vtype
    }

    /// Elements consumed by the load variant so far
    pub fn cursor(&self) -> Option<u32> {
        self.load.as_ref().map(|load| load.cursor)
    }

    /// Perform one negotiation iteration
    ///
    /// Requests a vector length for the remaining count, retires the
    /// granted elements and, in the load variant, loads them. On the
    /// iteration that empties the count, reports completion and moves
    /// to Done.
    pub fn step<U, H>(
        &mut self,
        unit: &mut U,
        mem: &Memory,
        harness: &mut H,
    ) -> Result<Status, ProgramError>
    where
        U: VectorUnit,
        H: Harness,
    {
        if self.status == Status::Done {
            return Ok(Status::Done);
        }
        let requested = self.remaining;
        let granted = unit.set_vl(requested, self.vtype)?;
        if granted == 0 || granted > requested {
            return Err(ProgramError::ContractViolation { requested, granted });
        }
        self.remaining -= granted;
        harness.record(TestEvent::SetVl { requested, granted });
        debug!(
            "iteration {}: requested={requested} granted={granted} remaining={}",
            self.iterations + 1,
            self.remaining
        );
        if let Some(load) = &mut self.load {
            let base = load.base + load.cursor * self.vtype.sew.bytes();
            unit.load_unit_stride(load.vd, mem, base)?;
            harness.record(TestEvent::VectorLoad {
                base,
                count: granted,
            });
            load.cursor += granted;
        }
        self.iterations += 1;
        if self.remaining == 0 {
            self.status = Status::Done;
            harness.record(TestEvent::Complete);
        }
        Ok(self.status)
    }

    /// Step until Done, returning the number of iterations taken
    pub fn run<U, H>(
        &mut self,
        unit: &mut U,
        mem: &Memory,
        harness: &mut H,
    ) -> Result<u32, ProgramError>
    where
        U: VectorUnit,
        H: Harness,
    {
        while self.step(unit, mem, harness)? == Status::Running {}
        Ok(self.iterations)
    }
}
