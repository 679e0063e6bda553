//! Force reads with retry and reset

use crate::traits::ForceBus;

use super::retry::{Attempt, AttemptPlan};
use super::sample::ForceSample;

/// A read failed after the whole attempt plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorFault {
    /// Every attempt timed out or returned an out-of-range count
    RetriesExhausted,
    /// The sensor stopped answering after its power cycle
    BusAbsent,
}

/// Side events of a read, distinct from the sample itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorEvent {
    /// A power-cycle reset was started
    ResetIssued,
    /// The presence check after a power cycle got no answer
    BusAbsent,
}

/// Force sensor with the bounded retry/reset policy
#[derive(Debug)]
pub struct ForceSensor<B> {
    bus: B,
}

impl<B: ForceBus> ForceSensor<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Access the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Power the sensor up and confirm it answers
    pub fn power_up(&mut self) -> Result<(), crate::traits::BusError> {
        self.bus.power_cycle()
    }

    /// Read the force, walking the attempt plan until a valid count arrives
    ///
    /// `observe` is called for each reset and absent-bus condition as it
    /// happens.
    pub fn read_force(
        &mut self,
        mut observe: impl FnMut(SensorEvent),
    ) -> Result<ForceSample, SensorFault> {
        let mut bus_absent = false;

        for attempt in AttemptPlan::new() {
            match attempt {
                Attempt::Read => {
                    let sample = self.bus.read_raw().ok().and_then(ForceSample::from_raw);
                    if let Some(sample) = sample {
                        return Ok(sample);
                    }
                }
                Attempt::Reset => {
                    observe(SensorEvent::ResetIssued);
                    bus_absent = self.bus.power_cycle().is_err();
                    if bus_absent {
                        observe(SensorEvent::BusAbsent);
                    }
                }
            }
        }

        if bus_absent {
            Err(SensorFault::BusAbsent)
        } else {
            Err(SensorFault::RetriesExhausted)
        }
    }
}
