//! Input handling module
//!
//! Classifies ground taps into intents and queues commands for the
//! navigation core.

mod command;
mod intent;

pub use command::{CommandQueue, NavCommand};
pub use intent::{BuildMode, BuildModeSource, Intent, IntentResolver};
