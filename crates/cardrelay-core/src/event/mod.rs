//! Push-channel events.

pub mod model;
