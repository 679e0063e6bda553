//! Safety interlock inputs

/// The two mechanical switches guarding clamp travel
///
/// Each method returns `true` when the switch is triggered. Implementations
/// must report a triggered switch when the input cannot be read.
pub trait Interlocks {
    /// Soft endstop at the end of retract travel
    fn soft_endstop(&mut self) -> bool;

    /// Hard kill-stop (operator or mechanical overtravel)
    fn kill_stop(&mut self) -> bool;

    /// Either switch triggered
    fn any_triggered(&mut self) -> bool {
        // Both inputs are sampled every time
        let soft = self.soft_endstop();
        let kill = self.kill_stop();
        soft || kill
    }
}
