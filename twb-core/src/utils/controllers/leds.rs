//! Navigation lamp control for the Two-Wheel Bot.
//!
//! Drives the two addressable lamps on the board's tail edge via
//! `SmartLedsWrite` and dispatches `LampCommand` messages. Lamp colors
//! are buffered so switching off and back on restores the last shown
//! pattern.

use serde::{Deserialize, Serialize};
use smart_leds_trait::{SmartLedsWrite, RGB8};

use crate::utils::color::Color;

/// Number of lamps in the attached chain.
const LAMP_COUNT: usize = 2;

/// An unlit lamp on the wire.
const DARK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Position of a lamp in the chain, as seen from behind the car.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Lamp {
    Left,
    Right,
}

impl Lamp {
    /// Index of this lamp in the chain.
    fn index(self) -> usize {
        match self {
            Lamp::Left => 0,
            Lamp::Right => 1,
        }
    }
}

/// Lamp command variants for switching on/off or setting colors.
///
/// Serialized as JSON with tag `"lc"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(tag = "lc", rename_all = "snake_case")]
pub enum LampCommand {
    /// Turn the lamps on (buffered colors or white).
    On,
    /// Turn all lamps off (set to black).
    Off,
    /// Set every lamp to the given color.
    #[serde(rename = "sc")]
    SC { c: Color },
    /// Set a single lamp to the given color.
    #[serde(rename = "sl")]
    SL { i: Lamp, c: Color },
}

/// High-level controller for the board's navigation lamps.
///
/// Maintains the on/off state and a color buffer with one entry per
/// lamp. Color changes made while the lamps are off are buffered and
/// shown on the next `On`.
pub struct NavLights<Driver> {
    driver: Driver,
    is_on: bool,
    lamps: [RGB8; LAMP_COUNT],
}

impl<Driver, E> NavLights<Driver>
where
    Driver: SmartLedsWrite<Color = RGB8, Error = E>,
{
    /// Create a new `NavLights` over the given lamp driver.
    ///
    /// The lamps are initially off with an all-dark buffer.
    pub fn new(driver: Driver) -> Self {
        Self {
            driver,
            is_on: false,
            lamps: [DARK; LAMP_COUNT],
        }
    }

    /// Execute an incoming `LampCommand`, updating internal state and lamps.
    ///
    /// - `On`: enable the lamps with the buffered colors or white.
    /// - `Off`: disable the lamps (all black), keeping the buffer.
    /// - `SC {c}`: buffer a color for every lamp, applied if lamps are on.
    /// - `SL {i,c}`: buffer a color for one lamp, applied if lamps are on.
    pub fn ex_command(
        &mut self,
        cmd: LampCommand,
    ) -> Result<(), E> {
        match cmd {
            LampCommand::On => self.on(),
            LampCommand::Off => self.off(),
            LampCommand::SC { c } => self.set_all(c),
            LampCommand::SL { i, c } => self.set_lamp(i, c),
        }
    }

    /// Turn the lamps on, restoring the buffered colors.
    ///
    /// An all-dark buffer would make `On` invisible, so it lights up
    /// white instead.
    pub fn on(&mut self) -> Result<(), E> {
        self.is_on = true;
        if self.lamps.iter().all(|c| *c == DARK) {
            self.lamps = [RGB8 {
                r: 255,
                g: 255,
                b: 255,
            }; LAMP_COUNT];
        }
        self.flush()
    }

    /// Turn the lamps off without touching the color buffer.
    pub fn off(&mut self) -> Result<(), E> {
        self.is_on = false;
        let data = core::iter::repeat(DARK).take(LAMP_COUNT);
        self.driver.write(data)
    }

    /// Buffer a color for every lamp, showing it if the lamps are on.
    pub fn set_all(
        &mut self,
        color: Color,
    ) -> Result<(), E> {
        self.lamps = [color.into(); LAMP_COUNT];
        if self.is_on {
            self.flush()?;
        }
        Ok(())
    }

    /// Buffer a color for one lamp, showing it if the lamps are on.
    pub fn set_lamp(
        &mut self,
        lamp: Lamp,
        color: Color,
    ) -> Result<(), E> {
        self.lamps[lamp.index()] = color.into();
        if self.is_on {
            self.flush()?;
        }
        Ok(())
    }

    /// Push the color buffer out to the lamps.
    fn flush(&mut self) -> Result<(), E> {
        let frame = self.lamps;
        self.driver.write(frame.iter().copied())
    }
}
