mod button;
mod button_config;
mod capacitive;
mod clock;
mod gesture;

pub use button::*;
pub use button_config::*;
pub use capacitive::*;
pub use clock::*;
pub use gesture::*;
