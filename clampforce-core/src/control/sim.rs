//! Simulated clamp rig for controller tests
//!
//! One shared [`Rig`] backs every mock peripheral. The specimen is modelled
//! as a linear spring: force rises with closing travel past the contact
//! point. Time only moves when a test advances it (or, optionally, on every
//! clock read).

use std::cell::RefCell;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_io::ErrorKind;

use crate::config::ClampConfig;
use crate::motion::StepMode;
use crate::sensor::{NEWTONS_PER_COUNT, RAW_ZERO_OFFSET};
use crate::state::{Event, RunState};
use crate::traits::{BusError, Clock, ForceBus, Interlocks, StepperDriver};

use super::Controller;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusMode {
    Healthy,
    /// Every read times out
    Failing,
}

pub struct Rig {
    pub now_us: u64,
    /// Added to `now_us` on every clock read
    pub clock_advance_per_read_us: u64,

    /// Motor position in steps, independent of the controller's zero
    pub physical: i32,
    /// `physical - offset` is the position the driver reports
    pub offset: i32,
    pub target: i32,
    pub speed: f32,
    pub enabled: bool,
    pub step_mode: StepMode,
    pub last_step_us: u64,
    /// Position mode never arrives
    pub stall_position_mode: bool,

    /// Physical position at which the soft endstop closes (retract side)
    pub endstop_at: i32,
    pub kill_stop: bool,

    /// Physical position where the clamp touches the specimen
    pub contact_at: i32,
    /// Newtons per step of closing travel past contact
    pub stiffness: f32,

    pub bus_mode: BusMode,
    pub bus_present: bool,
    pub reads: u32,
    pub power_cycles: u32,

    pub output: String,
    pub link_broken: bool,
}

pub type Shared = Rc<RefCell<Rig>>;

impl Rig {
    pub fn shared() -> Shared {
        Rc::new(RefCell::new(Rig {
            now_us: 0,
            clock_advance_per_read_us: 0,
            physical: 0,
            offset: 0,
            target: 0,
            speed: 0.0,
            enabled: false,
            step_mode: StepMode::Sixteenth,
            last_step_us: 0,
            stall_position_mode: false,
            endstop_at: 1000,
            kill_stop: false,
            contact_at: 0,
            stiffness: 0.02,
            bus_mode: BusMode::Healthy,
            bus_present: true,
            reads: 0,
            power_cycles: 0,
            output: String::new(),
            link_broken: false,
        }))
    }

    fn position(&self) -> i32 {
        self.physical - self.offset
    }

    fn force(&self) -> f32 {
        let travel = (self.contact_at - self.physical).max(0);
        travel as f32 * self.stiffness
    }
}

pub struct SimClock(Shared);

impl Clock for SimClock {
    fn now_us(&self) -> u64 {
        let mut rig = self.0.borrow_mut();
        rig.now_us += rig.clock_advance_per_read_us;
        rig.now_us
    }
}

pub struct SimDelay(Shared);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().now_us += u64::from(ns) / 1000;
    }
}

pub struct SimBus(Shared);

impl ForceBus for SimBus {
    fn read_raw(&mut self) -> Result<u16, BusError> {
        let mut rig = self.0.borrow_mut();
        rig.reads += 1;
        if rig.bus_mode == BusMode::Failing {
            return Err(BusError::Timeout);
        }
        let counts = rig.force() / NEWTONS_PER_COUNT + RAW_ZERO_OFFSET as f32;
        Ok((counts + 0.5).clamp(0.0, 16383.0) as u16)
    }

    fn power_cycle(&mut self) -> Result<(), BusError> {
        let mut rig = self.0.borrow_mut();
        rig.power_cycles += 1;
        if rig.bus_present {
            Ok(())
        } else {
            Err(BusError::NoAcknowledge)
        }
    }
}

pub struct SimInterlocks(Shared);

impl Interlocks for SimInterlocks {
    fn soft_endstop(&mut self) -> bool {
        let rig = self.0.borrow();
        rig.physical >= rig.endstop_at
    }

    fn kill_stop(&mut self) -> bool {
        self.0.borrow().kill_stop
    }
}

pub struct SimStepper(Shared);

impl StepperDriver for SimStepper {
    fn enable(&mut self) {
        self.0.borrow_mut().enabled = true;
    }

    fn disable(&mut self) {
        self.0.borrow_mut().enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.0.borrow().enabled
    }

    fn set_step_mode(&mut self, mode: StepMode) {
        self.0.borrow_mut().step_mode = mode;
    }

    fn set_speed(&mut self, steps_per_s: f32) {
        self.0.borrow_mut().speed = steps_per_s;
    }

    fn speed(&self) -> f32 {
        self.0.borrow().speed
    }

    fn run_speed(&mut self) -> bool {
        let mut rig = self.0.borrow_mut();
        if !rig.enabled || rig.speed == 0.0 {
            return false;
        }
        let interval_us = (1_000_000.0 / rig.speed.abs()) as u64;
        if rig.now_us.saturating_sub(rig.last_step_us) < interval_us {
            return false;
        }
        rig.last_step_us = rig.now_us;
        rig.physical += if rig.speed > 0.0 { 1 } else { -1 };
        true
    }

    fn move_to(&mut self, position: i32) {
        self.0.borrow_mut().target = position;
    }

    fn run(&mut self) -> bool {
        let mut rig = self.0.borrow_mut();
        if rig.stall_position_mode {
            return true;
        }
        let to_go = rig.target - rig.position();
        if to_go == 0 {
            return false;
        }
        rig.physical += to_go.signum();
        rig.target != rig.position()
    }

    fn distance_to_go(&self) -> i32 {
        let rig = self.0.borrow();
        rig.target - rig.position()
    }

    fn current_position(&self) -> i32 {
        self.0.borrow().position()
    }

    fn set_current_position(&mut self, position: i32) {
        let mut rig = self.0.borrow_mut();
        rig.offset = rig.physical - position;
        rig.target = position;
        rig.speed = 0.0;
    }
}

pub struct SimLink(Shared);

impl embedded_io::ErrorType for SimLink {
    type Error = ErrorKind;
}

impl embedded_io::Write for SimLink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
        let mut rig = self.0.borrow_mut();
        if rig.link_broken {
            return Err(ErrorKind::BrokenPipe);
        }
        rig.output.push_str(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), ErrorKind> {
        Ok(())
    }
}

pub type SimController = Controller<SimBus, SimStepper, SimInterlocks, SimLink, SimClock, SimDelay>;

/// Controller wired to the rig with the default configuration
pub fn controller(rig: &Shared) -> SimController {
    Controller::new(
        ClampConfig::default(),
        SimBus(rig.clone()),
        SimStepper(rig.clone()),
        SimInterlocks(rig.clone()),
        SimLink(rig.clone()),
        SimClock(rig.clone()),
        SimDelay(rig.clone()),
    )
}

/// Advance time in 1 ms passes until `done` holds or `max_ms` elapses
///
/// Returns every event reported on the way.
pub fn run_until(
    ctrl: &mut SimController,
    rig: &Shared,
    max_ms: u64,
    done: impl Fn(&SimController) -> bool,
) -> Vec<Event> {
    let mut log = Vec::new();
    for _ in 0..max_ms {
        rig.borrow_mut().now_us += 1000;
        let events = ctrl.poll(&[]).expect("link write");
        log.extend(events);
        if done(ctrl) {
            return log;
        }
    }
    panic!("condition not reached within {max_ms} ms, state {:?}", ctrl.state());
}

/// Advance time in 1 ms passes for `ms` milliseconds
pub fn run_for(ctrl: &mut SimController, rig: &Shared, ms: u64) -> Vec<Event> {
    let mut log = Vec::new();
    for _ in 0..ms {
        rig.borrow_mut().now_us += 1000;
        log.extend(ctrl.poll(&[]).expect("link write"));
    }
    log
}

/// A rig and controller that have booted and finished homing
pub fn homed() -> (Shared, SimController) {
    let rig = Rig::shared();
    let mut ctrl = controller(&rig);
    ctrl.startup().expect("link write");
    run_until(&mut ctrl, &rig, 10_000, |c| c.state() == RunState::AwaitCommand);
    (rig, ctrl)
}
