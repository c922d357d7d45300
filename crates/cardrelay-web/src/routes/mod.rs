//! Route handlers.

pub mod design;
pub mod status;
