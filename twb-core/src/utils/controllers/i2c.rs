//! I2C device management for the Two-Wheel Bot expansion board.
//!
//! The board's PWM controller sits at a fixed bus address and is driven
//! by short block-tagged frames: the first byte selects the peripheral
//! block (motors or headlights), the remaining bytes carry unsigned PWM
//! magnitudes. Motor frames are produced from signed per-wheel percents,
//! either given directly or mixed from a steering vector; headlight
//! frames carry one byte per color channel. Commands arrive as
//! `DriveCommand` messages.

use core::cell::RefCell;

use embedded_hal::i2c::I2c;
use embedded_hal_bus::i2c::RefCellDevice;
use serde::{Deserialize, Serialize};

use crate::utils::color::{self, Color};
use crate::utils::math::mixer;

/// Bus address of the expansion board's PWM controller.
pub const PWM_CONTROLLER_ADDRESS: u8 = 0x01;
/// Block id selecting the headlight PWM bank.
pub const HEADLIGHT_BLOCK: u8 = 0x01;
/// Block id selecting the motor PWM bank.
pub const MOTOR_BLOCK: u8 = 0x02;

/// Maximum wheel power in percent.
const MAX_POWER: f32 = 100.0;

/// Drive command variants for motion control and drive configuration.
///
/// Serialized as JSON with tag `"dc"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(tag = "dc", rename_all = "snake_case")]
pub enum DriveCommand {
    // Motion Variants
    /// Mixed drive from a steering vector (rotation `x`, forward `y`).
    V { x: f32, y: f32 },
    /// Direct tank drive with signed per-wheel percents.
    T { l: f32, r: f32 },
    /// Cut power to both motors.
    Halt,

    // Light and Configuration Variants
    /// Set the headlights to a packed color.
    H { c: Color },
    /// Cap wheel power at the given percent.
    Limit { p: f32 },
}

/// Driver for the PWM controller on the expansion board.
///
/// Motors and headlights share the controller; the bus itself is shared
/// with the host board's own peripherals, so the driver holds a
/// `RefCellDevice` view of it, created once at construction. The speed
/// limit is part of the driver state and scales every wheel power before
/// framing.
pub struct PwmController<'a, I2C> {
    dev: RefCellDevice<'a, I2C>,
    speed_limit: f32,
}

impl<'a, I2C, E> PwmController<'a, I2C>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
{
    /// Create a driver over a shared bus, with no speed limit applied.
    pub fn new(i2c_bus: &'a RefCell<I2C>) -> Self {
        PwmController {
            dev: RefCellDevice::new(i2c_bus),
            speed_limit: MAX_POWER,
        }
    }

    /// Execute a high-level `DriveCommand`.
    pub fn execute_command(
        &mut self,
        command: DriveCommand,
    ) -> Result<(), E> {
        match command {
            DriveCommand::V { x, y } => self.set_motor_vector(x, y),
            DriveCommand::T { l, r } => self.drive(l, r),
            DriveCommand::Halt => self.stop(),
            DriveCommand::H { c } => self.set_headlights(c),
            DriveCommand::Limit { p } => {
                self.set_speed_limit(p);
                Ok(())
            }
        }
    }

    /// Mix a steering vector into wheel powers and drive them.
    ///
    /// `x` and `y` follow the mixer's conventions: rotation and forward
    /// intent in `[-100, 100]`.
    pub fn set_motor_vector(
        &mut self,
        x: f32,
        y: f32,
    ) -> Result<(), E> {
        let (left, right) = mixer::mix(x, y);
        self.drive(left, right)
    }

    /// Drive the wheels directly with signed percents (tank drive).
    ///
    /// Each wheel power splits into a forward and a reverse magnitude on
    /// the wire; the hardware expects the right pair before the left.
    pub fn drive(
        &mut self,
        left: f32,
        right: f32,
    ) -> Result<(), E> {
        let scale = self.speed_limit / MAX_POWER;
        let (l, r) = (left * scale, right * scale);
        let frame = [
            MOTOR_BLOCK,
            duty_byte(r),
            duty_byte(-r),
            duty_byte(l),
            duty_byte(-l),
        ];
        tracing::trace!("motor frame: {:02X?}", frame);
        self.dev.write(PWM_CONTROLLER_ADDRESS, &frame)
    }

    /// Drive straight forward at the given percent.
    pub fn forward(
        &mut self,
        speed: f32,
    ) -> Result<(), E> {
        self.drive(speed, speed)
    }

    /// Drive straight backward at the given percent.
    pub fn backward(
        &mut self,
        speed: f32,
    ) -> Result<(), E> {
        self.drive(-speed, -speed)
    }

    /// Spin in place; positive turns right (clockwise).
    pub fn spin(
        &mut self,
        speed: f32,
    ) -> Result<(), E> {
        self.drive(speed, -speed)
    }

    /// Cut power to both motors.
    pub fn stop(&mut self) -> Result<(), E> {
        self.dev
            .write(PWM_CONTROLLER_ADDRESS, &[MOTOR_BLOCK, 0, 0, 0, 0])
    }

    /// Set the headlights to the given color.
    pub fn set_headlights(
        &mut self,
        color: Color,
    ) -> Result<(), E> {
        let (red, green, blue) = color.channels();
        self.dev
            .write(PWM_CONTROLLER_ADDRESS, &[HEADLIGHT_BLOCK, red, green, blue])
    }

    /// Turn the headlights off.
    pub fn headlights_off(&mut self) -> Result<(), E> {
        self.set_headlights(color::OFF)
    }

    /// Cap wheel power at `pct` of full scale (clamped to `[0, 100]`).
    pub fn set_speed_limit(
        &mut self,
        pct: f32,
    ) {
        self.speed_limit = pct.clamp(0.0, MAX_POWER);
    }

    /// The currently applied speed limit in percent.
    pub fn speed_limit(&self) -> f32 {
        self.speed_limit
    }
}

/// One direction's share of a signed wheel percent as a PWM byte.
///
/// Negative values contribute nothing to this direction; magnitudes above
/// 100% saturate at 255.
fn duty_byte(power: f32) -> u8 {
    libm::roundf(power.clamp(0.0, MAX_POWER) * 2.55) as u8
}
