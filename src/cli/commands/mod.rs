//! CLI command implementations.

mod doctor;
mod serve;
mod transcribe;

pub use doctor::run_doctor;
pub use serve::run_serve;
pub use transcribe::run_transcribe;
