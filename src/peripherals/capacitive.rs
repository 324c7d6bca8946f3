//! capacitive.rs — turns a touch sensor reading into a digital input line
use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};

/// Default touch threshold; readings below it count as touched.
pub const DEFAULT_TOUCH_THRESHOLD: u16 = 35;

/// Raw capacitive sensor reading. Lower values mean a stronger touch.
pub trait TouchSensor {
    fn touch_read(&mut self) -> u16;
}

impl<F> TouchSensor for F
where
    F: FnMut() -> u16,
{
    fn touch_read(&mut self) -> u16 {
        self()
    }
}

/// Digital input over a touch sensor. Reads low while touched, so it
/// pairs with [`Polarity::ActiveLow`](crate::Polarity::ActiveLow).
pub struct CapacitiveInput<S> {
    sensor: S,
    threshold: u16,
}

impl<S> CapacitiveInput<S>
where
    S: TouchSensor,
{
    pub fn new(sensor: S, threshold: u16) -> Self {
        Self { sensor, threshold }
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn release(self) -> S {
        self.sensor
    }
}

impl<S> ErrorType for CapacitiveInput<S> {
    type Error = Infallible;
}

impl<S> InputPin for CapacitiveInput<S>
where
    S: TouchSensor,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_low()?)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.sensor.touch_read() < self.threshold)
    }
}
