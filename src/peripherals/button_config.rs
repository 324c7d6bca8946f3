//! button_config.rs — timing and polarity configuration for the gesture classifier

/// Milliseconds on a wrapping, monotonic counter.
pub type Millis = u32;

/// Default debounce interval.
pub const DEFAULT_DEBOUNCE_MS: Millis = 50;
/// Default long-press threshold (and retrigger period).
pub const DEFAULT_LONG_PRESS_MS: Millis = 200;
/// Default multi-click coalescing window.
pub const DEFAULT_MULTI_CLICK_MS: Millis = 300;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Button configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("No input bound to the button")]
    MissingInput,
    #[error("No clock bound to the button")]
    MissingClock,
    #[error("Retriggerable long press needs a non-zero long press interval")]
    ZeroRetriggerInterval,
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Which electrical level counts as "pressed".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Pull-up wiring, button connects to GND.
    #[default]
    ActiveLow,
    /// Pull-down wiring, button connects to VCC.
    ActiveHigh,
}

impl Polarity {
    /// Returns true if `level_high` is the pressed level.
    pub fn is_active(self, level_high: bool) -> bool {
        match self {
            Polarity::ActiveLow => !level_high,
            Polarity::ActiveHigh => level_high,
        }
    }
}

/// Gesture classifier configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// Pressed level of the input line.
    pub polarity: Polarity,

    /// Presses shorter than this are treated as noise.
    pub debounce_ms: Millis,

    /// Hold time before a press counts as long.
    /// Also the period of retriggered long-press events.
    pub long_press_ms: Millis,

    /// Idle time after the last press start before clicks are classified.
    pub multi_click_ms: Millis,

    /// Fire the long-press-held event once per `long_press_ms` while held,
    /// instead of once per press.
    pub long_press_retriggerable: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            polarity: Polarity::ActiveLow,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            multi_click_ms: DEFAULT_MULTI_CLICK_MS,
            long_press_retriggerable: false,
        }
    }
}

impl ButtonConfig {
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_debounce_ms(mut self, ms: Millis) -> Self {
        self.debounce_ms = ms;
        self
    }

    pub fn with_long_press_ms(mut self, ms: Millis) -> Self {
        self.long_press_ms = ms;
        self
    }

    pub fn with_multi_click_ms(mut self, ms: Millis) -> Self {
        self.multi_click_ms = ms;
        self
    }

    pub fn with_long_press_retriggerable(mut self, retriggerable: bool) -> Self {
        self.long_press_retriggerable = retriggerable;
        self
    }

    /// Reject combinations the classifier cannot run with.
    ///
    /// A zero long-press interval with retriggering would fire the
    /// long-press-held event on every update.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.long_press_retriggerable && self.long_press_ms == 0 {
            return Err(ConfigError::ZeroRetriggerInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_timings() {
        let config = ButtonConfig::default();
        assert_eq!(config.polarity, Polarity::ActiveLow);
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.long_press_ms, 200);
        assert_eq!(config.multi_click_ms, 300);
        assert!(!config.long_press_retriggerable);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn polarity_maps_levels() {
        assert!(Polarity::ActiveLow.is_active(false));
        assert!(!Polarity::ActiveLow.is_active(true));
        assert!(Polarity::ActiveHigh.is_active(true));
        assert!(!Polarity::ActiveHigh.is_active(false));
    }

    #[test]
    fn zero_interval_only_rejected_when_retriggering() {
        let once = ButtonConfig::default().with_long_press_ms(0);
        assert_eq!(once.validate(), Ok(()));

        let repeating = once.with_long_press_retriggerable(true);
        assert_eq!(repeating.validate(), Err(ConfigError::ZeroRetriggerInterval));
    }
}
