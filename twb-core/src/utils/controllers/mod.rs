//! Controller Exports
//!
//! This file exports the device controllers that make up the robot's
//! control system.
//!
//! - `i2c`: Drives the expansion board's PWM controller (motors and
//!   headlights) over the shared I2C bus.
//! - `leds`: Drives the two addressable navigation lamps.
//! - `sonar`: Reads the ultrasonic range finder.

pub mod i2c;
pub mod leds;
pub mod sonar;

use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::i2c::I2c;
use serde::{Deserialize, Serialize};
use smart_leds_trait::{SmartLedsWrite, RGB8};

use sonar::RangingError;

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "ct", rename_all = "snake_case")] // ct = command type
pub enum SystemCommand {
    D(i2c::DriveCommand),
    L(leds::LampCommand),
    /// Measure the distance ahead in centimeters.
    Ping,
    /// Enable or disable logging of executed commands.
    Log { on: bool },
}

/// Startup settings for a `SystemController`.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Initial wheel power cap in percent.
    pub speed_limit: f32,
    /// Whether executed commands are logged.
    pub log_commands: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            speed_limit: 100.0,
            log_commands: false,
        }
    }
}

/// Failure modes of `SystemController::execute`, one per subsystem.
#[derive(Debug)]
pub enum ControlError<EB, EL, EP> {
    /// The I2C write to the PWM controller failed.
    Bus(EB),
    /// The navigation lamp driver failed.
    Lamps(EL),
    /// The ranging attempt failed.
    Ranger(RangingError<EP>),
}

/// Top-level controller owning every device on the expansion board.
///
/// Bundles the PWM controller, the navigation lamps and the range
/// finder behind one `execute` entry point, together with the settings
/// that used to live in global toggles. The individual controllers stay
/// public for direct use.
pub struct SystemController<'a, I2C, LEDS, TRIG, ECHO, D> {
    pub pwm: i2c::PwmController<'a, I2C>,
    pub lamps: leds::NavLights<LEDS>,
    pub sonar: sonar::Sonar<TRIG, ECHO, D>,
    log_commands: bool,
}

impl<'a, I2C, LEDS, TRIG, ECHO, D, EB, EL, EP> SystemController<'a, I2C, LEDS, TRIG, ECHO, D>
where
    I2C: I2c<Error = EB>,
    LEDS: SmartLedsWrite<Color = RGB8, Error = EL>,
    TRIG: OutputPin<Error = EP>,
    ECHO: InputPin<Error = EP>,
    D: DelayNs,
    EB: core::fmt::Debug,
    EL: core::fmt::Debug,
    EP: core::fmt::Debug,
{
    /// Assemble the controllers over their buses and pins.
    pub fn new(
        i2c_bus: &'a RefCell<I2C>,
        lamp_driver: LEDS,
        trigger: TRIG,
        echo: ECHO,
        delay: D,
        config: Config,
    ) -> Self {
        let mut pwm = i2c::PwmController::new(i2c_bus);
        pwm.set_speed_limit(config.speed_limit);

        SystemController {
            pwm,
            lamps: leds::NavLights::new(lamp_driver),
            sonar: sonar::Sonar::new(trigger, echo, delay),
            log_commands: config.log_commands,
        }
    }

    /// Execute an incoming `SystemCommand` on the owning subsystem.
    ///
    /// `Ping` yields the measured distance in centimeters; every other
    /// command yields `None`.
    pub fn execute(
        &mut self,
        command: SystemCommand,
    ) -> Result<Option<f32>, ControlError<EB, EL, EP>> {
        if self.log_commands {
            tracing::info!("executing command: {:?}", command);
        }
        match command {
            SystemCommand::D(dc) => {
                self.pwm.execute_command(dc).map_err(ControlError::Bus)?;
                Ok(None)
            }
            SystemCommand::L(lc) => {
                self.lamps.ex_command(lc).map_err(ControlError::Lamps)?;
                Ok(None)
            }
            SystemCommand::Ping => {
                let cm = self.sonar.measure_cm().map_err(ControlError::Ranger)?;
                Ok(Some(cm))
            }
            SystemCommand::Log { on } => {
                self.set_command_logging(on);
                Ok(None)
            }
        }
    }

    /// Enable or disable logging of executed commands.
    pub fn set_command_logging(
        &mut self,
        on: bool,
    ) {
        self.log_commands = on;
    }
}
