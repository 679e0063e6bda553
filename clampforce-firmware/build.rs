//! Build script for clampforce-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates clamp.toml and generates the compiled-in configuration

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clampforce_core::config::{ClampConfig, ConfigError};

fn main() {
    setup_linker();
    let config = load_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read, parse and validate clamp.toml
fn load_config() -> ClampConfig {
    println!("cargo:rerun-if-changed=clamp.toml");

    let config_path = Path::new("clamp.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: clamp.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a clamp.toml configuration file.          ║\n\
            ║  Please create one in the clampforce-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read clamp.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Unknown keys and wrong types are rejected here
    let config: ClampConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid clamp.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid clamp configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format!("║  • {:<62} ║", describe(e))
        );
    }

    println!("cargo:warning=clamp.toml validated successfully");
    config
}

/// Human-readable reason for a validation failure
fn describe(error: ConfigError) -> &'static str {
    match error {
        ConfigError::InvalidBaud => "[serial] baud must be non-zero",
        ConfigError::InvalidSensorAddress => "[sensor] address must be a 7-bit address",
        ConfigError::InvalidBusFrequency => "[sensor] bus_frequency_hz must be 1..=1000000",
        ConfigError::InvalidSpeed => "[stepper] speeds and acceleration must be > 0",
        ConfigError::SpeedTiersInverted => "[stepper] slow_speed must be below medium_speed",
        ConfigError::SpeedAboveMax => "[stepper] homing/medium speed exceed max_speed",
        ConfigError::InvalidPulseWidth => "[stepper] step_pulse_us must be non-zero",
        ConfigError::InvalidOffsetTimeout => "[motion] offset_timeout_ms must be non-zero",
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `CLAMP_CONFIG` as Rust source into OUT_DIR
fn generate_config(config: &ClampConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let serial = &config.serial;
    let sensor = &config.sensor;
    let stepper = &config.stepper;
    let motion = &config.motion;

    let source = format!(
        "/// Machine configuration generated from clamp.toml\n\
        pub const CLAMP_CONFIG: ClampConfig = ClampConfig {{\n\
        \x20   serial: SerialConfig {{ baud: {} }},\n\
        \x20   sensor: SensorConfig {{\n\
        \x20       address: {:#04x},\n\
        \x20       bus_frequency_hz: {},\n\
        \x20       power_off_ms: {},\n\
        \x20       power_on_settle_ms: {},\n\
        \x20       conversion_settle_ms: {},\n\
        \x20   }},\n\
        \x20   stepper: StepperConfig {{\n\
        \x20       homing_speed: {:?},\n\
        \x20       medium_speed: {:?},\n\
        \x20       slow_speed: {:?},\n\
        \x20       max_speed: {:?},\n\
        \x20       acceleration: {:?},\n\
        \x20       step_pulse_us: {},\n\
        \x20       enable_active_low: {},\n\
        \x20   }},\n\
        \x20   motion: MotionConfig {{\n\
        \x20       offset_timeout_ms: {},\n\
        \x20       abort_pause_ms: {},\n\
        \x20   }},\n\
        }};\n",
        serial.baud,
        sensor.address,
        sensor.bus_frequency_hz,
        sensor.power_off_ms,
        sensor.power_on_settle_ms,
        sensor.conversion_settle_ms,
        stepper.homing_speed,
        stepper.medium_speed,
        stepper.slow_speed,
        stepper.max_speed,
        stepper.acceleration,
        stepper.step_pulse_us,
        stepper.enable_active_low,
        motion.offset_timeout_ms,
        motion.abort_pause_ms,
    );

    fs::write(out_dir.join("clamp_config.rs"), source).unwrap();
}
