//! Ultrasonic range finder for the Two-Wheel Bot.
//!
//! Drives an HC-SR04 compatible sensor over two GPIO lines: a trigger
//! pulse starts a measurement and the sensor answers with a high pulse
//! on the echo line whose width encodes the round-trip time of flight.
//! The driver polls the echo line in 1 us steps, so the measured width
//! is a count of polling intervals rather than a hardware capture.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Longest echo pulse treated as a valid measurement, in microseconds.
///
/// Matches the sensor's rated range of roughly four meters; past that
/// the sensor is not going to answer at all.
pub const ECHO_TIMEOUT_US: u32 = 23_200;

/// Width of the trigger pulse, in microseconds.
const TRIGGER_PULSE_US: u32 = 10;

/// Idle time on the trigger line before the pulse, in microseconds.
const SETTLE_US: u32 = 2;

/// Echo microseconds per centimeter of target distance.
///
/// Sound travels out and back, so one centimeter of distance costs two
/// centimeters of travel at roughly 29 us each.
const US_PER_CM: f32 = 58.0;

/// Failure modes of a ranging attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangingError<E> {
    /// A GPIO operation on the trigger or echo line failed.
    Pin(E),
    /// No echo pulse completed within `ECHO_TIMEOUT_US`.
    EchoTimeout,
}

/// Driver for the ultrasonic range finder.
pub struct Sonar<TRIG, ECHO, D> {
    trigger: TRIG,
    echo: ECHO,
    delay: D,
}

impl<TRIG, ECHO, D, E> Sonar<TRIG, ECHO, D>
where
    TRIG: OutputPin<Error = E>,
    ECHO: InputPin<Error = E>,
    D: DelayNs,
    E: core::fmt::Debug,
{
    /// Create a driver over the sensor's trigger and echo lines.
    pub fn new(
        trigger: TRIG,
        echo: ECHO,
        delay: D,
    ) -> Self {
        Sonar {
            trigger,
            echo,
            delay,
        }
    }

    /// Measure the distance to the nearest target in centimeters.
    pub fn measure_cm(&mut self) -> Result<f32, RangingError<E>> {
        let width = self.measure_pulse_us()?;
        Ok(width as f32 / US_PER_CM)
    }

    /// Fire a trigger pulse and measure the echo pulse width in microseconds.
    ///
    /// Both the wait for the echo to start and the pulse itself are
    /// bounded by `ECHO_TIMEOUT_US`; exceeding either bound reports
    /// `RangingError::EchoTimeout` rather than a bogus distance.
    pub fn measure_pulse_us(&mut self) -> Result<u32, RangingError<E>> {
        self.trigger.set_low().map_err(RangingError::Pin)?;
        self.delay.delay_us(SETTLE_US);
        self.trigger.set_high().map_err(RangingError::Pin)?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().map_err(RangingError::Pin)?;

        let mut waited = 0;
        while self.echo.is_low().map_err(RangingError::Pin)? {
            if waited >= ECHO_TIMEOUT_US {
                return Err(RangingError::EchoTimeout);
            }
            self.delay.delay_us(1);
            waited += 1;
        }

        let mut width = 0;
        while self.echo.is_high().map_err(RangingError::Pin)? {
            if width >= ECHO_TIMEOUT_US {
                return Err(RangingError::EchoTimeout);
            }
            self.delay.delay_us(1);
            width += 1;
        }

        tracing::trace!("echo width: {} us", width);
        Ok(width)
    }
}
