//! End-of-test signalling
//!
//! On the hardware target the programs these fixtures model end in a
//! trap instruction that the surrounding verification environment
//! intercepts. Here that environment is the Harness trait: the program
//! reports each observable event to it, and completion is itself an
//! event, delivered exactly once. EventLog is the provided harness; it
//! buffers events in a FIFO which the runner drains after the program
//! finishes, in the same way a simulator drains buffered UART output.

use queues::*;
use std::fmt;

/// An externally observable step of a fixture run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestEvent {
    /// A vector length was negotiated
    SetVl { requested: u32, granted: u32 },
    /// A unit-stride vector load was issued
    VectorLoad { base: u32, count: u32 },
    /// The program finished normally
    Complete,
}

impl fmt::Display for TestEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TestEvent::SetVl { requested, granted } => {
                write!(f, "vsetvli requested={requested} granted={granted}")
            }
            TestEvent::VectorLoad { base, count } => {
                write!(f, "vle base={base:#010x} count={count}")
            }
            TestEvent::Complete => write!(f, "complete"),
        }
    }
}

/// Receiver for the events a running fixture produces
pub trait Harness {
    fn record(&mut self, event: TestEvent);
}

/// Harness that buffers events for later inspection
#[derive(Debug, Default)]
pub struct EventLog {
    events: Queue<TestEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return all buffered events in record order, emptying the buffer
    pub fn drain(&mut self) -> Vec<TestEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.remove() {
            drained.push(event);
        }
        drained
    }

    pub fn len(&self) -> usize {
        self.events.size()
    }

    pub fn is_empty(&self) -> bool {
        self.events.size() == 0
    }
}

impl Harness for EventLog {
    fn record(&mut self, event: TestEvent) {
        self.events
            .add(event)
            .expect("insert into queue should work");
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn drain_preserves_record_order() {
        let mut log = EventLog::new();
        log.record(TestEvent::SetVl {
            requested: 5,
            granted: 4,
        });
        log.record(TestEvent::Complete);
        assert_eq!(log.len(), 2);
        assert_eq!(
            log.drain(),
            vec![
                TestEvent::SetVl {
                    requested: 5,
                    granted: 4
                },
                TestEvent::Complete
            ]
        );
        assert!(log.is_empty());
    }

    #[test]
    fn events_format_for_the_trace() {
        let event = TestEvent::VectorLoad {
            base: 0x1000,
            count: 2,
        };
        assert_eq!(event.to_string(), "vle base=0x00001000 count=2");
    }
}
