//! Clamp control task
//!
//! Drains whatever the host has sent, hands it to the controller together
//! with one control step, and yields. Step timing in velocity mode depends
//! on this loop running far faster than the step rate, so nothing in here
//! awaits a timer.

use defmt::*;
use embassy_futures::yield_now;
use embassy_rp::gpio::{Input, Output};
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::Delay;
use embedded_io::{Read, ReadReady};

use clampforce_core::control::Controller;
use clampforce_core::state::{Event, RunState};
use clampforce_drivers::interlock::PulledUpInterlocks;
use clampforce_drivers::sensor::FmaForceSensor;
use clampforce_drivers::stepper::StepDirStepper;

use crate::clock::EmbassyClock;

/// Bytes taken from the UART per pass
const RX_CHUNK: usize = 16;

/// Controller wired to the RP2040 peripherals
pub type ClampController = Controller<
    FmaForceSensor<I2c<'static, I2C0, Blocking>, Output<'static>, Delay>,
    StepDirStepper<Output<'static>, EmbassyClock, Delay>,
    PulledUpInterlocks<Input<'static>, Input<'static>>,
    BufferedUartTx,
    EmbassyClock,
    Delay,
>;

/// Control task - runs the boot sequence, then the control loop forever
#[embassy_executor::task]
pub async fn control_task(mut controller: ClampController, mut rx: BufferedUartRx) {
    info!("Control task started");

    match controller.startup() {
        Ok(events) => log_events(&events, controller.state()),
        Err(e) => error!("Serial write failed during startup: {:?}", e),
    }

    let mut buf = [0u8; RX_CHUNK];

    loop {
        let n = match rx.read_ready() {
            Ok(true) => rx.read(&mut buf).unwrap_or_else(|e| {
                warn!("UART read error: {:?}", e);
                0
            }),
            Ok(false) => 0,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                0
            }
        };

        match controller.poll(&buf[..n]) {
            Ok(events) => log_events(&events, controller.state()),
            Err(e) => warn!("Serial write failed: {:?}", e),
        }

        yield_now().await;
    }
}

fn log_events(events: &[Event], state: RunState) {
    let mut transitioned = false;
    for event in events {
        if event.is_fault() {
            warn!("{:?}", event);
        } else {
            debug!("{:?}", event);
        }
        transitioned |= event.is_transition();
    }
    if transitioned {
        info!("State: {:?}", state);
    }
}
