use clap::Parser;
use core::cell::RefCell;
use core::convert::Infallible;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::i2c::{self, I2c, Operation};
use embedded_hal_mock::eh1::delay::NoopDelay;
use smart_leds_trait::{SmartLedsWrite, RGB8};
use std::io::{self, BufRead};
use tracing::{error, info};
use tracing_subscriber;
use twb_core::utils::color;
use twb_core::utils::controllers::i2c::{HEADLIGHT_BLOCK, MOTOR_BLOCK};
use twb_core::utils::controllers::leds::Lamp;
use twb_core::utils::controllers::sonar::ECHO_TIMEOUT_US;
use twb_core::utils::{Config, SystemCommand, SystemController};

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts
{
    /// initial wheel power cap in percent
    #[clap(long, default_value = "100.0")]
    speed_limit: f32,
    /// log each executed command
    #[clap(long)]
    log_commands: bool,
    /// run the scripted demo instead of reading commands from stdin
    #[clap(long)]
    demo: bool,
    /// distance the simulated range finder reports, in centimeters
    #[clap(long, default_value = "35.0")]
    target_cm: f32,
}

/// I2C bus that prints every frame instead of talking to hardware.
struct ConsoleBus;

impl i2c::ErrorType for ConsoleBus {
    type Error = Infallible;
}

impl I2c for ConsoleBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(bytes) => match bytes.first() {
                    Some(&MOTOR_BLOCK) => info!("motor frame: {:?}", &bytes[1..]),
                    Some(&HEADLIGHT_BLOCK) => info!("headlight frame: {:?}", &bytes[1..]),
                    _ => info!("i2c write @{:#04x}: {:02X?}", address, bytes),
                },
                Operation::Read(buffer) => buffer.fill(0),
            }
        }
        Ok(())
    }
}

/// Lamp driver that prints colors to the console.
struct ConsoleLeds;

impl SmartLedsWrite for ConsoleLeds {
    type Error = Infallible;
    type Color = RGB8;

    fn write<T, I>(
        &mut self,
        iterator: T,
    ) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        for (i, c) in iterator.into_iter().enumerate() {
            let c: RGB8 = c.into();
            info!("lamp {}: #{:02X}{:02X}{:02X}", i, c.r, c.g, c.b);
        }
        Ok(())
    }
}

/// Trigger line that accepts pulses and does nothing with them.
struct FakeTrigger;

impl digital::ErrorType for FakeTrigger {
    type Error = Infallible;
}

impl OutputPin for FakeTrigger {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Echo line that replays the pulse a target at `target_cm` would produce.
///
/// The driver polls once per simulated microsecond, so each level read
/// advances the phase by one: low for the lead-in, high for the pulse,
/// then the cycle resets for the next measurement.
struct FakeEcho {
    lead_us: u32,
    width_us: u32,
    phase: u32,
}

impl FakeEcho {
    fn new(target_cm: f32) -> Self {
        // Capped at the driver's timeout window; keeps the phase
        // arithmetic inside u32 for any target
        let width_us = ((target_cm * 58.0).round() as u32).min(ECHO_TIMEOUT_US);
        FakeEcho {
            lead_us: 200,
            width_us,
            phase: 0,
        }
    }

    fn level_is_high(&mut self) -> bool {
        let high = self.phase >= self.lead_us && self.phase < self.lead_us + self.width_us;
        self.phase += 1;
        if self.phase > self.lead_us + self.width_us {
            self.phase = 0;
        }
        high
    }
}

impl digital::ErrorType for FakeEcho {
    type Error = Infallible;
}

impl InputPin for FakeEcho {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level_is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level_is_high())
    }
}

type MockSystem<'a> =
    SystemController<'a, ConsoleBus, ConsoleLeds, FakeTrigger, FakeEcho, NoopDelay>;

/// Scripted tour across the whole board surface.
fn run_demo(system: &mut MockSystem<'_>) {
    info!("nav lights on");
    system.lamps.on().unwrap();
    system.lamps.set_lamp(Lamp::Left, color::RED).unwrap();
    system.lamps.set_lamp(Lamp::Right, color::GREEN).unwrap();

    info!("headlights white");
    system.pwm.set_headlights(color::WHITE).unwrap();

    info!("driving an s-curve");
    for (x, y) in [
        (0.0, 60.0),
        (40.0, 60.0),
        (0.0, 80.0),
        (-40.0, 60.0),
        (0.0, 60.0),
    ] {
        system.pwm.set_motor_vector(x, y).unwrap();
    }

    info!("spinning in place");
    system.pwm.spin(30.0).unwrap();
    system.pwm.stop().unwrap();

    match system.sonar.measure_cm() {
        Ok(cm) => info!("distance ahead: {:.1} cm", cm),
        Err(e) => error!("ranging failed: {:?}", e),
    }

    info!("lights out");
    system.pwm.headlights_off().unwrap();
    system.lamps.off().unwrap();
}

/// Reads commands from stdin, one JSON object per line.
fn run_stdin(system: &mut MockSystem<'_>) {
    info!("reading commands from stdin, one JSON object per line");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("stdin read failed: {}", e);
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let cmd: SystemCommand = match serde_json::from_str(trimmed) {
            Ok(cmd) => cmd,
            Err(e) => {
                error!("bad command {:?}: {}", trimmed, e);
                continue;
            }
        };
        match system.execute(cmd) {
            Ok(Some(cm)) => info!("distance ahead: {:.1} cm", cm),
            Ok(None) => {}
            Err(e) => error!("command failed: {:?}", e),
        }
    }
    // Motors off when the operator goes away
    let _ = system.pwm.stop();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts: Opts = Opts::parse();

    let i2c_bus = RefCell::new(ConsoleBus);
    let mut system = SystemController::new(
        &i2c_bus,
        ConsoleLeds,
        FakeTrigger,
        FakeEcho::new(opts.target_cm),
        NoopDelay::new(),
        Config {
            speed_limit: opts.speed_limit,
            log_commands: opts.log_commands,
        },
    );

    if opts.demo {
        run_demo(&mut system);
    } else {
        run_stdin(&mut system);
    }
}
