//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod clock;
pub mod force;
pub mod interlock;
pub mod stepper;

pub use clock::Clock;
pub use force::{BusError, ForceBus};
pub use interlock::Interlocks;
pub use stepper::StepperDriver;
