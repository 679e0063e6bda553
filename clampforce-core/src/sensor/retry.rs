//! Bounded attempt plan for sensor reads
//!
//! Two blocks of six read attempts, with one power-cycle reset between them.
//! The plan is a finite iterator so the budget cannot be exceeded by a
//! caller.

/// Read attempts in one block
pub const ATTEMPTS_PER_BLOCK: u8 = 6;

/// Blocks in a full plan; a reset separates consecutive blocks
pub const ATTEMPT_BLOCKS: u8 = 2;

/// Next action in the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Attempt {
    /// Try one bus read
    Read,
    /// Power-cycle the sensor before the next block
    Reset,
}

/// Iterator over the attempts of one `read_force` call
#[derive(Debug, Clone)]
pub struct AttemptPlan {
    block: u8,
    attempt: u8,
}

impl Default for AttemptPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl AttemptPlan {
    pub const fn new() -> Self {
        Self {
            block: 0,
            attempt: 0,
        }
    }
}

impl Iterator for AttemptPlan {
    type Item = Attempt;

    fn next(&mut self) -> Option<Attempt> {
        if self.block >= ATTEMPT_BLOCKS {
            return None;
        }
        if self.attempt < ATTEMPTS_PER_BLOCK {
            self.attempt += 1;
            return Some(Attempt::Read);
        }
        self.block += 1;
        self.attempt = 0;
        if self.block >= ATTEMPT_BLOCKS {
            return None;
        }
        Some(Attempt::Reset)
    }
}
