//! Game sequencing: turning server commands into committed moves

pub mod record;
pub mod sequencer;

pub use record::{GameRecord, Outcome, Ply};
pub use sequencer::{Agent, Phase, Reply};
