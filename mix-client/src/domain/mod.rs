mod charging_window;
mod daily_mix;
mod generation_interval;

pub use charging_window::OptimalChargingWindow;
pub use daily_mix::DailyMix;
pub use generation_interval::{FuelShare, GenerationInterval};
