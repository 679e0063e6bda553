//! ClampForce - Force-Controlled Specimen Clamp Firmware
//!
//! Main firmware binary for RP2040-based clamp controllers. A stepper closes
//! the clamp until the force sensor reads the commanded force, holds it, and
//! re-homes, streaming force/position samples to the host over UART0.
//!
//! Pin assignments (Pico-style board):
//!
//! | Function            | GPIO        |
//! |---------------------|-------------|
//! | Host UART TX / RX   | 0 / 1       |
//! | Sensor I2C SDA / SCL| 4 / 5       |
//! | Sensor supply       | 6           |
//! | Stepper DIR / STEP  | 10 / 11     |
//! | Stepper EN          | 12          |
//! | Stepper MS1..MS3    | 13, 14, 15  |
//! | Soft endstop        | 16          |
//! | Kill-stop           | 17          |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use clampforce_core::control::Controller;
use clampforce_drivers::interlock::PulledUpInterlocks;
use clampforce_drivers::sensor::FmaForceSensor;
use clampforce_drivers::stepper::{StepDirConfig, StepDirPins, StepDirStepper};

use crate::clock::EmbassyClock;
use crate::config::CLAMP_CONFIG;

mod clock;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ClampForce firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = CLAMP_CONFIG;

    // Host link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.serial.baud;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", config.serial.baud);

    // Force sensor; supply starts off and is brought up by the boot sequence
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = config.sensor.bus_frequency_hz;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let sensor_power = Output::new(p.PIN_6, Level::Low);
    let sensor = FmaForceSensor::from_config(i2c, sensor_power, Delay, &config.sensor);

    info!("Force sensor at {:#x}", config.sensor.address);

    // Stepper driver
    let pins = StepDirPins {
        step: Output::new(p.PIN_11, Level::Low),
        dir: Output::new(p.PIN_10, Level::Low),
        enable: Output::new(p.PIN_12, Level::from(config.stepper.enable_active_low)),
        microstep: Some([
            Output::new(p.PIN_13, Level::Low),
            Output::new(p.PIN_14, Level::Low),
            Output::new(p.PIN_15, Level::Low),
        ]),
    };
    let stepper = StepDirStepper::new(
        pins,
        EmbassyClock,
        Delay,
        StepDirConfig::from(&config.stepper),
    );

    // Interlocks: normally-open switches to ground
    let interlocks = PulledUpInterlocks::new(
        Input::new(p.PIN_16, Pull::Up),
        Input::new(p.PIN_17, Pull::Up),
    );

    let controller = Controller::new(config, sensor, stepper, interlocks, tx, EmbassyClock, Delay);

    spawner.spawn(tasks::control_task(controller, rx)).unwrap();

    info!("Control task spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
