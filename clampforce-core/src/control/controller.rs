//! Clamp controller
//!
//! One call to [`Controller::poll`] is one loop pass: drain the host input,
//! re-arm velocity stepping, and run the current state's tick when the
//! 10 ms cadence gate opens. Nothing blocks except the homing offset move,
//! the sensor reset sequence and the pause after a safety stop.

use clampforce_protocol::{CommandInterpreter, ControlCommand, InterlockReadout, ParseError, StatusCode};
use embedded_hal::delay::DelayNs;
use embedded_io::Write;
use heapless::Vec;

use crate::config::ClampConfig;
use crate::motion::{StepMode, HOME_OFFSET_STEPS};
use crate::safety::{AbortReason, SafetyInputs, SafetyMonitor};
use crate::sensor::{ForceSensor, SensorEvent};
use crate::state::{Event, RunState};
use crate::telemetry::Telemetry;
use crate::traits::{Clock, ForceBus, Interlocks, StepperDriver};

use super::policy::{evaluate_force, MoveOutcome, SpeedTier, SAMPLE_INTERVAL_MS};

/// Upper bound on events reported by a single call
pub const MAX_EVENTS_PER_POLL: usize = 8;

/// Events produced by one `startup` or `poll` call, in order
pub type Events = Vec<Event, MAX_EVENTS_PER_POLL>;

/// Record an event; past capacity only the report is truncated
fn record(events: &mut Events, event: Event) {
    let _ = events.push(event);
}

/// Force-controlled clamp orchestrator
pub struct Controller<B, M, L, W, C, D> {
    config: ClampConfig,
    sensor: ForceSensor<B>,
    stepper: M,
    interlocks: L,
    telemetry: Telemetry<W>,
    clock: C,
    delay: D,
    interpreter: CommandInterpreter,
    safety: SafetyMonitor,
    state: RunState,
    /// Clock reading when the current state was entered (ms)
    state_entered_ms: u64,
    /// Clock reading of the last cadence tick (ms)
    last_tick_ms: u64,
    /// Last valid force reading, kept across faults for telemetry
    last_force: Option<f32>,
    /// Sticky sensor fault; reads are skipped while set
    sensor_fault: bool,
}

impl<B, M, L, W, C, D> Controller<B, M, L, W, C, D>
where
    B: ForceBus,
    M: StepperDriver,
    L: Interlocks,
    W: Write,
    C: Clock,
    D: DelayNs,
{
    pub fn new(
        config: ClampConfig,
        bus: B,
        stepper: M,
        interlocks: L,
        writer: W,
        clock: C,
        delay: D,
    ) -> Self {
        let now = clock.now_ms();
        Self {
            config,
            sensor: ForceSensor::new(bus),
            stepper,
            interlocks,
            telemetry: Telemetry::new(writer),
            clock,
            delay,
            interpreter: CommandInterpreter::new(),
            safety: SafetyMonitor::new(),
            state: RunState::Boot,
            state_entered_ms: now,
            last_tick_ms: now,
            last_force: None,
            sensor_fault: false,
        }
    }

    /// Current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Check if the sticky sensor fault is set
    pub fn sensor_fault(&self) -> bool {
        self.sensor_fault
    }

    /// Last valid force reading in newtons
    pub fn last_force(&self) -> Option<f32> {
        self.last_force
    }

    /// Access the stepper driver
    pub fn stepper(&self) -> &M {
        &self.stepper
    }

    /// Access the telemetry link
    pub fn telemetry(&self) -> &Telemetry<W> {
        &self.telemetry
    }

    /// Run the boot sequence and enter Homing
    ///
    /// Announces start-up, selects full stepping, powers the sensor, reports
    /// both interlocks and announces readiness.
    pub fn startup(&mut self) -> Result<Events, W::Error> {
        let mut events = Events::new();

        self.telemetry.status(StatusCode::Startup)?;
        self.stepper.disable();
        self.stepper.set_step_mode(StepMode::Full);

        if self.sensor.power_up().is_err() {
            record(&mut events, Event::SensorBusAbsent);
            self.telemetry.status(StatusCode::SensorBusAbsent)?;
        }

        let readout = InterlockReadout {
            soft_endstop: self.interlocks.soft_endstop(),
            kill_stop: self.interlocks.kill_stop(),
        };
        self.telemetry.interlocks(readout)?;
        self.telemetry.status(StatusCode::Ready)?;

        self.apply(Event::SetupComplete, &mut events)?;
        Ok(events)
    }

    /// Run one loop pass
    ///
    /// `input` is whatever the host link received since the previous pass;
    /// every byte is consumed.
    pub fn poll(&mut self, input: &[u8]) -> Result<Events, W::Error> {
        let mut events = Events::new();

        for &byte in input {
            if let Some(result) = self.interpreter.feed_byte(byte) {
                self.handle_command(result, &mut events)?;
            }
        }

        match self.state {
            RunState::Boot | RunState::AwaitCommand => {}
            RunState::Homing => self.homing_tick(&mut events)?,
            RunState::MovingToForce(command) => match self.move_tick(&command, &mut events)? {
                MoveOutcome::Continue => {}
                MoveOutcome::Converged => self.apply(Event::Converged, &mut events)?,
                MoveOutcome::Aborted(reason) => self.abort(reason, &mut events)?,
            },
            RunState::Holding { hold_ms } => self.holding_tick(hold_ms, &mut events)?,
        }

        Ok(events)
    }

    fn handle_command(
        &mut self,
        result: Result<ControlCommand, ParseError>,
        events: &mut Events,
    ) -> Result<(), W::Error> {
        match result {
            Ok(command) if self.state.accepts_commands() => {
                self.telemetry.status(StatusCode::Accepted)?;
                self.apply(Event::CommandAccepted(command), events)
            }
            Ok(_) => {
                record(events, Event::CommandBusy);
                self.telemetry.status(StatusCode::Busy)
            }
            Err(err) => {
                record(events, Event::CommandRejected(err));
                self.telemetry.status(StatusCode::ParseError)
            }
        }
    }

    /// Feed an event to the state machine and run entry actions on change
    fn apply(&mut self, event: Event, events: &mut Events) -> Result<(), W::Error> {
        record(events, event);
        let next = self.state.transition(event);
        if next == self.state {
            return Ok(());
        }
        self.state = next;
        self.enter(events)
    }

    fn enter(&mut self, events: &mut Events) -> Result<(), W::Error> {
        let now = self.clock.now_ms();
        self.state_entered_ms = now;
        self.last_tick_ms = now;

        match self.state {
            RunState::Homing => {
                self.stepper.enable();
                self.stepper.set_speed(self.config.stepper.homing_speed);
            }
            RunState::MovingToForce(_) => {
                self.stepper.enable();
                self.stepper.set_speed(0.0);
                // Attempted even with the sticky fault set; this is where it clears
                self.sample_force(events)?;
            }
            RunState::Holding { .. } => self.stepper.set_speed(0.0),
            RunState::Boot | RunState::AwaitCommand => {}
        }
        Ok(())
    }

    /// Open the cadence gate at most once per sample interval
    fn tick_due(&mut self) -> bool {
        let now = self.clock.now_ms();
        if now.saturating_sub(self.last_tick_ms) < SAMPLE_INTERVAL_MS {
            return false;
        }
        self.last_tick_ms = now;
        true
    }

    fn homing_tick(&mut self, events: &mut Events) -> Result<(), W::Error> {
        self.stepper.run_speed();
        // Switches are read every pass so the zero lands on the step that closed them
        if self.interlocks.any_triggered() {
            return self.finish_homing(events);
        }
        if !self.tick_due() {
            return Ok(());
        }

        if !self.sensor_fault {
            self.sample_force(events)?;
        }
        self.send_sample()
    }

    /// Zero at the switch, back off by the home offset, release the motor
    fn finish_homing(&mut self, events: &mut Events) -> Result<(), W::Error> {
        self.stepper.set_speed(0.0);
        self.stepper.set_current_position(0);
        self.stepper.move_to(-HOME_OFFSET_STEPS);

        // Neither interlocks nor host input are looked at until this returns
        let timeout_ms = u64::from(self.config.motion.offset_timeout_ms);
        let offset_error = self.stepper.run_to_position(&self.clock, timeout_ms).err();
        self.stepper.disable();

        self.send_sample()?;
        self.apply(Event::Homed { offset_error }, events)
    }

    /// One pass of MovingToForce
    fn move_tick(
        &mut self,
        command: &ControlCommand,
        events: &mut Events,
    ) -> Result<MoveOutcome, W::Error> {
        self.stepper.run_speed();
        if !self.tick_due() {
            return Ok(MoveOutcome::Continue);
        }

        let inputs = SafetyInputs {
            soft_endstop: self.interlocks.soft_endstop(),
            kill_stop: self.interlocks.kill_stop(),
            force_newtons: self.last_force,
            sensor_fault: self.sensor_fault,
        };
        if let Some(reason) = self.safety.check(&inputs).reason() {
            return Ok(MoveOutcome::Aborted(reason));
        }

        let reading = self.sample_force(events)?;
        self.send_sample()?;

        // A failed read leaves the speed alone; the next tick aborts on the fault
        let Some(force) = reading else {
            return Ok(MoveOutcome::Continue);
        };

        let Some(tier) = evaluate_force(command.target_force_newtons, force) else {
            self.stepper.set_speed(0.0);
            return Ok(MoveOutcome::Converged);
        };

        let speed = match tier {
            SpeedTier::Medium => self.config.stepper.medium_speed,
            SpeedTier::Slow => self.config.stepper.slow_speed,
        };
        // Closing is toward negative positions
        self.stepper.set_speed(-speed);
        Ok(MoveOutcome::Continue)
    }

    fn abort(&mut self, reason: AbortReason, events: &mut Events) -> Result<(), W::Error> {
        self.stepper.set_speed(0.0);
        self.telemetry.status(StatusCode::SafetyStop)?;
        self.delay.delay_ms(self.config.motion.abort_pause_ms);
        self.stepper.disable();
        self.apply(Event::Aborted(reason), events)
    }

    fn holding_tick(&mut self, hold_ms: u64, events: &mut Events) -> Result<(), W::Error> {
        let held = self.clock.now_ms().saturating_sub(self.state_entered_ms);
        if held >= hold_ms {
            return self.apply(Event::HoldExpired, events);
        }
        if !self.tick_due() {
            return Ok(());
        }

        if !self.sensor_fault {
            self.sample_force(events)?;
        }
        self.send_sample()
    }

    /// Read the sensor through the retry plan and update the sticky fault
    ///
    /// Returns the force on success. Resets and failures are reported to the
    /// host after the flags are updated.
    fn sample_force(&mut self, events: &mut Events) -> Result<Option<f32>, W::Error> {
        let mut side_events: Vec<SensorEvent, 2> = Vec::new();
        let result = self.sensor.read_force(|event| {
            let _ = side_events.push(event);
        });

        let reading = match result {
            Ok(sample) => {
                self.sensor_fault = false;
                self.last_force = Some(sample.newtons);
                Some(sample.newtons)
            }
            Err(_) => {
                self.sensor_fault = true;
                None
            }
        };

        for event in side_events {
            match event {
                SensorEvent::ResetIssued => {
                    record(events, Event::SensorReset);
                    self.telemetry.status(StatusCode::SensorReset)?;
                }
                SensorEvent::BusAbsent => {
                    record(events, Event::SensorBusAbsent);
                    self.telemetry.status(StatusCode::SensorBusAbsent)?;
                }
            }
        }
        if let Err(fault) = result {
            record(events, Event::SensorFault(fault));
            self.telemetry.status(StatusCode::SensorFault)?;
        }

        Ok(reading)
    }

    /// Stream one sample in the states that report telemetry
    ///
    /// Nothing is sent while the sticky sensor fault is set; the host has
    /// already been told `FORCEERROR` and the last force would be stale.
    fn send_sample(&mut self) -> Result<(), W::Error> {
        if !self.state.streams_telemetry() || self.sensor_fault {
            return Ok(());
        }
        let force = self.last_force.unwrap_or(0.0);
        let motion = self.stepper.motion_state();
        self.telemetry.sample(force, motion.position)
    }
}
