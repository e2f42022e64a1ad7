pub mod reaper;
pub mod registry;

pub use reaper::spawn_idle_reaper;
pub use registry::{GameEvent, GameRegistry};
