//! button.rs — polled GPIO button with click, multi-click and long-press detection

use embedded_hal::digital::InputPin;

use super::{
    ButtonConfig, ButtonEvent, ButtonState, CapacitiveInput, ClickType, Clock, ConfigError,
    Events, GestureClassifier, Handler, Millis, TouchSensor,
};

/// Button driver: a gesture classifier bound to an input pin and a clock.
/// Call [`Button::poll`] on every iteration of the main loop.
pub struct Button<'a, P, C> {
    pin: P,
    clock: C,
    classifier: GestureClassifier<'a>,
}

impl<'a, P, C> Button<'a, P, C>
where
    P: InputPin,
    C: Clock,
{
    /// Create a new button wrapper.
    /// Caller must configure the pin's pull (matching `config.polarity`) before calling this.
    pub fn new(pin: P, clock: C, config: ButtonConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            pin,
            clock,
            classifier: GestureClassifier::new(config)?,
        })
    }

    /// Sample the pin and the clock, then advance the classifier.
    pub fn poll(&mut self) -> Result<Events, P::Error> {
        let level = self.pin.is_high()?;
        let now = self.clock.now_millis();
        Ok(self.classifier.update(level, now))
    }

    /// Returns true if the pin is at the pressed level right now, bypassing debounce.
    pub fn is_pressed_raw(&mut self) -> Result<bool, P::Error> {
        let level = self.pin.is_high()?;
        Ok(self.classifier.config().polarity.is_active(level))
    }

    /// Returns true if the button is pressed, debounced.
    pub fn is_pressed(&self) -> bool {
        self.classifier.is_pressed()
    }

    /// Returns true if the button is NOT pressed, debounced.
    pub fn is_released(&self) -> bool {
        !self.is_pressed()
    }

    pub fn was_pressed_for(&self) -> Millis {
        self.classifier.was_pressed_for()
    }

    pub fn number_of_clicks(&self) -> u8 {
        self.classifier.number_of_clicks()
    }

    pub fn click_type(&self) -> ClickType {
        self.classifier.click_type()
    }

    pub fn state(&self) -> &ButtonState {
        self.classifier.state()
    }

    pub fn set_debounce_time(&mut self, ms: Millis) {
        self.classifier.set_debounce_time(ms);
    }

    pub fn set_long_click_retriggerable(&mut self, retriggerable: bool) -> Result<(), ConfigError> {
        self.classifier.set_long_click_retriggerable(retriggerable)
    }

    /// Replace the handler for `event`. `None` unregisters it.
    pub fn set_handler(&mut self, event: ButtonEvent, handler: Option<Handler<'a>>) {
        self.classifier.set_handler(event, handler);
    }

    /// Access the classifier, e.g. for the per-event handler setters.
    pub fn classifier_mut(&mut self) -> &mut GestureClassifier<'a> {
        &mut self.classifier
    }

    /// Clear transient state and unregister all handlers.
    pub fn reset(&mut self) {
        self.classifier.reset();
    }

    /// Give back the pin and the clock.
    pub fn release(self) -> (P, C) {
        (self.pin, self.clock)
    }
}

impl<'a, S, C> Button<'a, CapacitiveInput<S>, C>
where
    S: TouchSensor,
    C: Clock,
{
    /// Button over a touch sensor; readings below `threshold` count as touched.
    /// Use with the default active-low polarity.
    pub fn new_capacitive(
        sensor: S,
        threshold: u16,
        clock: C,
        config: ButtonConfig,
    ) -> Result<Self, ConfigError> {
        Self::new(CapacitiveInput::new(sensor, threshold), clock, config)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Step-by-step construction; `build` fails if the input or clock is missing.
pub struct ButtonBuilder<P, C> {
    pin: Option<P>,
    clock: Option<C>,
    config: ButtonConfig,
}

impl<P, C> Default for ButtonBuilder<P, C> {
    fn default() -> Self {
        Self {
            pin: None,
            clock: None,
            config: ButtonConfig::default(),
        }
    }
}

impl<P, C> ButtonBuilder<P, C>
where
    P: InputPin,
    C: Clock,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, pin: P) -> Self {
        self.pin = Some(pin);
        self
    }

    pub fn clock(mut self, clock: C) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn config(mut self, config: ButtonConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build<'a>(self) -> Result<Button<'a, P, C>, ConfigError> {
        let pin = self.pin.ok_or(ConfigError::MissingInput)?;
        let clock = self.clock.ok_or(ConfigError::MissingClock)?;
        Button::new(pin, clock, self.config)
    }
}
