//! Shared data types for the TFT video pipeline: the bounded queue that
//! connects pipeline stages, the presentation clock, the atomic control
//! surface, and the display-area geometry math. Nothing in this crate
//! touches a decoder or a panel — those live in `tftvid-media` and
//! `tftvid-display` respectively.

pub mod blit;
pub mod display_area;
pub mod helpers;
pub mod queue;
pub mod state;
pub mod time_sync;
pub mod types;

pub use blit::DisplayBlit;
pub use display_area::{DisplayArea, Orientation};
pub use queue::Queue;
pub use state::{ControlState, PlayerLifecycle};
pub use time_sync::TimeSync;
pub use types::DecodedFrame;
