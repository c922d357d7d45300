//! CardRelay Core Library
//!
//! Domain models for the card-design notification relay: the events pushed
//! to connected channels, the frames clients send back, and the record
//! produced for each processed design submission.

pub mod client;
pub mod config;
pub mod design;
pub mod error;
pub mod event;

pub use config::RelayConfig;
pub use design::model::{DesignStatus, DesignSubmission};
pub use error::{RelayError, RelayResult};
pub use event::model::{ClientCommand, ClientFrame, RelayEvent};

/// Current UTC time as an RFC 3339 timestamp with millisecond precision.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
