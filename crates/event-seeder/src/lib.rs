//! Random event seeding for the `events` table.
//!
//! This crate generates event rows (a title built from corpus words plus a
//! number, a date and a start/end time window) and inserts them one slot at a
//! time, retrying rejected rows until the database accepts one or the
//! attempt budget for the slot runs out.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use event_seeder::prelude::*;
//!
//! let store = PgEventStore::connect(&DatabaseConfig::default()).await?;
//! let mut seeder = Seeder::new(store, LoremWords, SeedConfig::default())?;
//! let report = seeder.run(&mut rand::thread_rng()).await?;
//! ```

pub mod config;
pub mod corpus;
pub mod db;
pub mod generators;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{AppConfig, DatabaseConfig, SeedConfig};
    pub use crate::corpus::{Corpus, LoremWords, WordList, WordSource};
    pub use crate::db::{
        EventStore, InsertOutcome, PgEventStore, SeedError, SeedReport, Seeder, SlotOutcome,
    };
    pub use crate::generators::{EventGenConfig, EventGenerator, GeneratedEvent};
}
