//! gesture.rs — debounce and click/long-press classification for one input line
//!
//! The classifier owns no pin and no clock. The host feeds it the raw level and
//! the current time on every loop iteration:
//!
//! ```ignore
//! let on_double = |state: &ButtonState| info!("double, {} ms", state.was_pressed_for());
//! let mut classifier = GestureClassifier::default();
//! classifier.set_double_click_handler(Some(&on_double));
//!
//! loop {
//!     for event in classifier.update(pin.is_high()?, now_ms()) {
//!         // same events, in handler order
//!     }
//! }
//! ```

use super::{ButtonConfig, ConfigError, Millis};

/// Maximum number of events a single `update` call can fire.
pub const MAX_EVENTS_PER_UPDATE: usize = 3;

/// Events fired during one `update`, in the order handlers were invoked.
pub type Events = heapless::Vec<ButtonEvent, MAX_EVENTS_PER_UPDATE>;

/// Handler invoked synchronously from `update`.
pub type Handler<'a> = &'a dyn Fn(&ButtonState);

// ============================================================================
// TYPES
// ============================================================================

/// Event kinds, one handler slot each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Debounced press or qualifying release.
    Changed,
    Pressed,
    Released,
    /// Every qualifying release, before classification.
    Tap,
    Click,
    DoubleClick,
    TripleClick,
    /// Window closed with a single press that reached the long-press threshold.
    LongClick,
    /// Still held after the long-press threshold (repeatedly if retriggerable).
    LongClickDetected,
}

/// Gesture of the most recently classified window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClickType {
    #[default]
    None,
    Single,
    Double,
    Triple,
    Long,
}

/// Logical phase of the current press.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressPhase {
    /// Line at the released level.
    #[default]
    Idle,
    /// Line at the pressed level, debounce interval not yet elapsed.
    Debouncing,
    /// Debounced press, `Pressed` has fired.
    Held,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum LongPress {
    #[default]
    Inactive,
    /// A long press belongs to the current click window.
    /// `repeats` counts retriggered intervals; `reported` blocks a second
    /// non-retriggerable report.
    Active { repeats: u16, reported: bool },
}

impl LongPress {
    fn progress(self) -> (u16, bool) {
        match self {
            LongPress::Inactive => (0, false),
            LongPress::Active { repeats, reported } => (repeats, reported),
        }
    }

    fn activate(&mut self) {
        if *self == LongPress::Inactive {
            *self = LongPress::Active {
                repeats: 0,
                reported: false,
            };
        }
    }
}

/// Classifier state, as seen by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonState {
    config: ButtonConfig,
    phase: PressPhase,
    press_start: Millis,
    press_duration: Millis,
    click_window_start: Option<Millis>,
    click_count: u8,
    last_click_count: u8,
    last_click_type: ClickType,
    long_press: LongPress,
    long_press_detected_at: Option<Millis>,
}

impl ButtonState {
    fn new(config: ButtonConfig) -> Self {
        Self {
            config,
            phase: PressPhase::Idle,
            press_start: 0,
            press_duration: 0,
            click_window_start: None,
            click_count: 0,
            last_click_count: 0,
            last_click_type: ClickType::None,
            long_press: LongPress::Inactive,
            long_press_detected_at: None,
        }
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    pub fn phase(&self) -> PressPhase {
        self.phase
    }

    /// Debounced logical state.
    pub fn is_pressed(&self) -> bool {
        self.phase == PressPhase::Held
    }

    /// Duration of the last completed press, 0 before the first release.
    pub fn was_pressed_for(&self) -> Millis {
        self.press_duration
    }

    /// Clicks counted in the most recently closed window.
    ///
    /// Inside click handlers this is the count being classified.
    pub fn number_of_clicks(&self) -> u8 {
        self.last_click_count
    }

    /// Clicks counted so far in the open window.
    pub fn pending_clicks(&self) -> u8 {
        self.click_count
    }

    pub fn click_type(&self) -> ClickType {
        self.last_click_type
    }

    /// Time of the most recent long-press-held event.
    pub fn long_press_detected_at(&self) -> Option<Millis> {
        self.long_press_detected_at
    }

    /// Retriggered long-press intervals in the current window.
    pub fn long_press_repeats(&self) -> u16 {
        self.long_press.progress().0
    }
}

#[derive(Default, Clone, Copy)]
struct Handlers<'a> {
    changed: Option<Handler<'a>>,
    pressed: Option<Handler<'a>>,
    released: Option<Handler<'a>>,
    tap: Option<Handler<'a>>,
    click: Option<Handler<'a>>,
    double_click: Option<Handler<'a>>,
    triple_click: Option<Handler<'a>>,
    long_click: Option<Handler<'a>>,
    long_click_detected: Option<Handler<'a>>,
}

impl<'a> Handlers<'a> {
    fn slot(&mut self, event: ButtonEvent) -> &mut Option<Handler<'a>> {
        match event {
            ButtonEvent::Changed => &mut self.changed,
            ButtonEvent::Pressed => &mut self.pressed,
            ButtonEvent::Released => &mut self.released,
            ButtonEvent::Tap => &mut self.tap,
            ButtonEvent::Click => &mut self.click,
            ButtonEvent::DoubleClick => &mut self.double_click,
            ButtonEvent::TripleClick => &mut self.triple_click,
            ButtonEvent::LongClick => &mut self.long_click,
            ButtonEvent::LongClickDetected => &mut self.long_click_detected,
        }
    }

    fn get(mut self, event: ButtonEvent) -> Option<Handler<'a>> {
        *self.slot(event)
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Polling gesture classifier
pub struct GestureClassifier<'a> {
    state: ButtonState,
    handlers: Handlers<'a>,
}

impl Default for GestureClassifier<'_> {
    fn default() -> Self {
        Self {
            state: ButtonState::new(ButtonConfig::default()),
            handlers: Handlers::default(),
        }
    }
}

impl<'a> GestureClassifier<'a> {
    pub fn new(config: ButtonConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: ButtonState::new(config),
            handlers: Handlers::default(),
        })
    }

    pub fn state(&self) -> &ButtonState {
        &self.state
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.state.config
    }

    pub fn is_pressed(&self) -> bool {
        self.state.is_pressed()
    }

    pub fn was_pressed_for(&self) -> Millis {
        self.state.was_pressed_for()
    }

    pub fn number_of_clicks(&self) -> u8 {
        self.state.number_of_clicks()
    }

    pub fn click_type(&self) -> ClickType {
        self.state.click_type()
    }

    pub fn set_debounce_time(&mut self, ms: Millis) {
        self.state.config.debounce_ms = ms;
    }

    pub fn set_long_click_retriggerable(&mut self, retriggerable: bool) -> Result<(), ConfigError> {
        let config = self.state.config.with_long_press_retriggerable(retriggerable);
        config.validate()?;
        self.state.config = config;
        Ok(())
    }

    /// Clear all transient state and unregister every handler.
    /// Configuration is kept.
    pub fn reset(&mut self) {
        self.state = ButtonState::new(self.state.config);
        self.handlers = Handlers::default();
    }

    /// Advance the state machine with the raw line level (`true` = high) at `now`.
    ///
    /// Handlers run before this returns; a panicking handler unwinds through here.
    pub fn update(&mut self, raw_level: bool, now: Millis) -> Events {
        let mut events = Events::new();
        let active = self.state.config.polarity.is_active(raw_level);
        let was_active = self.state.phase != PressPhase::Idle;

        if active && !was_active {
            trace!("button: press edge at {}", now);
            self.state.phase = PressPhase::Debouncing;
            self.state.press_start = now;
            self.state.click_window_start = Some(now);
        } else if !active && was_active {
            self.state.phase = PressPhase::Idle;
            self.state.press_duration = now.wrapping_sub(self.state.press_start);
            trace!("button: release edge after {} ms", self.state.press_duration);

            if self.state.press_duration >= self.state.config.debounce_ms {
                self.fire(&mut events, ButtonEvent::Changed);
                self.fire(&mut events, ButtonEvent::Released);
                self.fire(&mut events, ButtonEvent::Tap);
                if self.state.press_duration >= self.state.config.long_press_ms {
                    self.state.long_press.activate();
                }
            }
        } else if self.state.phase == PressPhase::Debouncing
            && now.wrapping_sub(self.state.press_start) >= self.state.config.debounce_ms
        {
            self.state.phase = PressPhase::Held;
            self.state.click_count = self.state.click_count.saturating_add(1);
            self.fire(&mut events, ButtonEvent::Changed);
            self.fire(&mut events, ButtonEvent::Pressed);
        } else if !active {
            if let Some(start) = self.state.click_window_start {
                if now.wrapping_sub(start) > self.state.config.multi_click_ms {
                    self.close_click_window(&mut events);
                }
            }
        }

        self.detect_long_press(now, &mut events);
        events
    }

    fn close_click_window(&mut self, events: &mut Events) {
        let count = self.state.click_count;
        self.state.last_click_count = count;

        if self.state.long_press != LongPress::Inactive {
            // A long press swallows any other clicks in the same window.
            if count == 1 {
                debug!("button: long click");
                self.state.last_click_type = ClickType::Long;
                self.fire(events, ButtonEvent::LongClick);
            }
            self.state.long_press = LongPress::Inactive;
        } else {
            let classified = match count {
                1 => Some((ClickType::Single, ButtonEvent::Click)),
                2 => Some((ClickType::Double, ButtonEvent::DoubleClick)),
                3 => Some((ClickType::Triple, ButtonEvent::TripleClick)),
                _ => None,
            };
            if let Some((click_type, event)) = classified {
                debug!("button: {} click(s)", count);
                self.state.last_click_type = click_type;
                self.fire(events, event);
            }
        }

        self.state.click_count = 0;
        self.state.click_window_start = None;
    }

    fn detect_long_press(&mut self, now: Millis, events: &mut Events) {
        if self.state.phase == PressPhase::Idle {
            return;
        }

        let (repeats, reported) = self.state.long_press.progress();
        let held = u64::from(now.wrapping_sub(self.state.press_start));
        let threshold = u64::from(self.state.config.long_press_ms) * (u64::from(repeats) + 1);
        if reported || held < threshold {
            return;
        }

        self.state.long_press = if self.state.config.long_press_retriggerable {
            LongPress::Active {
                repeats: repeats.saturating_add(1),
                reported: false,
            }
        } else {
            LongPress::Active {
                repeats,
                reported: true,
            }
        };
        self.state.long_press_detected_at = Some(now);
        debug!("button: long press held at {}", now);
        self.fire(events, ButtonEvent::LongClickDetected);
    }

    fn fire(&self, events: &mut Events, event: ButtonEvent) {
        // Never more than MAX_EVENTS_PER_UPDATE per call.
        let _ = events.push(event);
        if let Some(handler) = self.handlers.get(event) {
            handler(&self.state);
        }
    }

    // ========================================================================
    // HANDLER REGISTRATION
    // ========================================================================

    /// Replace the handler for `event`. `None` unregisters it.
    pub fn set_handler(&mut self, event: ButtonEvent, handler: Option<Handler<'a>>) {
        *self.handlers.slot(event) = handler;
    }

    pub fn set_changed_handler(&mut self, handler: Option<Handler<'a>>) {
        self.set_handler(ButtonEvent::Changed, handler);
    }

    pub fn set_pressed_handler(&mut self, handler: Option<Handler<'a>>) {
        self.set_handler(ButtonEvent::Pressed, handler);
    }

    pub fn set_released_handler(&mut self, handler: Option<Handler<'a>>) {
        self.set_handler(ButtonEvent::Released, handler);
    }

    pub fn set_tap_handler(&mut self, handler: Option<Handler<'a>>) {
        self.set_handler(ButtonEvent::Tap, handler);
    }

    pub fn set_click_handler(&mut self, handler: Option<Handler<'a>>) {
        self.set_handler(ButtonEvent::Click, handler);
    }

    pub fn set_double_click_handler(&mut self, handler: Option<Handler<'a>>) {
        self.set_handler(ButtonEvent::DoubleClick, handler);
    }

    pub fn set_triple_click_handler(&mut self, handler: Option<Handler<'a>>) {
        self.set_handler(ButtonEvent::TripleClick, handler);
    }

    pub fn set_long_click_handler(&mut self, handler: Option<Handler<'a>>) {
        self.set_handler(ButtonEvent::LongClick, handler);
    }

    pub fn set_long_click_detected_handler(&mut self, handler: Option<Handler<'a>>) {
        self.set_handler(ButtonEvent::LongClickDetected, handler);
    }
}
