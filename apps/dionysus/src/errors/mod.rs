//! Error handling for the Dionysus game engine.

pub mod domain;
pub mod error_code;


pub use domain::GameError;
pub use error_code::ErrorCode;
