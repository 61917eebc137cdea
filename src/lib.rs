//! mirrordash - a modular terminal dashboard
//!
//! This library loads dashboard profiles, composes their modules into a
//! region tree, and drives the animated header and periodic body rebuilds
//! that the `mirrordash` binary paints with ratatui.

pub mod dashboard;
pub mod logging;
pub mod modules;
pub mod profile;
pub mod ui;
