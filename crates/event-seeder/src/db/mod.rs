//! Database integration for seeding events.
//!
//! [`Seeder`] drives the slot/attempt loop against any [`EventStore`];
//! [`PgEventStore`] is the Postgres implementation over a single connection.

mod seeder;
pub mod store;

pub use seeder::{SeedError, SeedReport, Seeder, SlotOutcome};
pub use store::{EventStore, InsertOutcome, PgEventStore, classify_sqlstate};
