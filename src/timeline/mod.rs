//! # Timeline
//!
//! Orders placed clips, pairs each neighbour with a crossfade and works out
//! when titles appear.

pub mod sequencer;
pub mod types;

pub use sequencer::Sequencer;
pub use types::{Segment, Timeline, TimelineEntry, TitleCue, TransitionDirective};
