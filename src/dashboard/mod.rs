//! # Dashboard
//!
//! Everything between a loaded profile and a painted screen:
//!
//! - [`layout`] - region tree planning and module binding
//! - [`header`] - the animated top band
//! - [`scheduler`] - fast tick and slow rebuild clocks

pub mod header;
pub mod layout;
pub mod scheduler;

pub use header::{FrameState, HEADER_HEIGHT};
pub use layout::{bind, build_body, plan, LayoutNode, Slot, SplitDirection};
pub use scheduler::{DisplaySurface, Scheduler, SchedulerState, Screen, DEFAULT_TICK};
