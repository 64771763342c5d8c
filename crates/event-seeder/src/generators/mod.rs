//! Entity generators for seed data.
//!
//! - [`EventGenerator`]: random titles and date/time windows for the `events` table

pub mod event;

pub use event::{EventGenConfig, EventGenerator, GeneratedEvent};
