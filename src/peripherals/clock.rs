//! clock.rs — monotonic millisecond time source for button polling

use super::Millis;

/// Monotonic millisecond counter. Wrapping is tolerated by the classifier.
pub trait Clock {
    fn now_millis(&mut self) -> Millis;
}

impl<F> Clock for F
where
    F: FnMut() -> Millis,
{
    fn now_millis(&mut self) -> Millis {
        self()
    }
}

/// Clock backed by the embassy-time driver.
#[cfg(feature = "embassy-time")]
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    fn now_millis(&mut self) -> Millis {
        // Truncation keeps the counter wrapping.
        embassy_time::Instant::now().as_millis() as Millis
    }
}
