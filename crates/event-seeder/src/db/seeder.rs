//! Slot/attempt seeding loop.

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use super::store::{EventStore, InsertOutcome};
use crate::config::{ConfigError, SeedConfig};
use crate::corpus::{CorpusError, WordSource};
use crate::generators::EventGenerator;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Database connection already closed")]
    ConnectionClosed,
}

/// How a slot ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    /// An event was committed on the given attempt (1-based).
    Filled { attempts: usize },
    /// Every attempt was rejected; the slot stays empty.
    Exhausted,
}

/// Counters for a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub slots_filled: usize,
    pub slots_exhausted: usize,
    pub attempts: usize,
    pub unique_violations: usize,
    pub aborted_transactions: usize,
    pub raised_exceptions: usize,
    pub check_violations: usize,
}

impl SeedReport {
    fn record(&mut self, outcome: InsertOutcome) {
        self.attempts += 1;
        match outcome {
            InsertOutcome::Inserted => {}
            InsertOutcome::UniqueViolation => self.unique_violations += 1,
            InsertOutcome::AbortedTransaction => self.aborted_transactions += 1,
            InsertOutcome::RaisedException => self.raised_exceptions += 1,
            InsertOutcome::CheckViolation => self.check_violations += 1,
        }
    }

    /// Attempts that did not produce a row.
    pub fn rejections(&self) -> usize {
        self.unique_violations
            + self.aborted_transactions
            + self.raised_exceptions
            + self.check_violations
    }
}

/// Fills event slots through an [`EventStore`].
pub struct Seeder<S, W> {
    store: S,
    generator: EventGenerator<W>,
    config: SeedConfig,
    report: SeedReport,
}

impl<S: EventStore, W: WordSource> Seeder<S, W> {
    /// Creates a seeder; fails if the event ranges are invalid.
    pub fn new(store: S, words: W, config: SeedConfig) -> Result<Self, SeedError> {
        let generator = EventGenerator::new(config.events.clone(), words)?;
        Ok(Self {
            store,
            generator,
            config,
            report: SeedReport::default(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn report(&self) -> &SeedReport {
        &self.report
    }

    /// Fills every slot, then closes the store.
    ///
    /// Exhausted slots are skipped silently. A fatal store error aborts the
    /// run immediately; rows committed so far stay and the store is left open.
    pub async fn run<R: Rng>(&mut self, rng: &mut R) -> Result<SeedReport, SeedError> {
        info!(
            slots = self.config.slots,
            attempts_per_slot = self.config.attempts_per_slot,
            "Seeding events..."
        );

        for slot in 0..self.config.slots {
            match self.fill_slot(rng).await? {
                SlotOutcome::Filled { .. } => self.report.slots_filled += 1,
                SlotOutcome::Exhausted => {
                    self.report.slots_exhausted += 1;
                    debug!(slot, "attempt budget exhausted, slot left empty");
                }
            }

            let done = slot + 1;
            if self.config.progress_every > 0 && done % self.config.progress_every == 0 {
                info!(
                    "  Processed {}/{} slots ({} filled)",
                    done, self.config.slots, self.report.slots_filled
                );
            }
        }

        self.store.close().await?;
        info!(
            "Seeded {} events ({} slots exhausted)",
            self.report.slots_filled, self.report.slots_exhausted
        );
        Ok(self.report.clone())
    }

    /// Tries up to `attempts_per_slot` fresh rows until one is committed.
    pub async fn fill_slot<R: Rng>(&mut self, rng: &mut R) -> Result<SlotOutcome, SeedError> {
        for attempt in 1..=self.config.attempts_per_slot {
            let event = self.generator.generate(rng);
            let outcome = self.store.insert(&event).await?;
            self.report.record(outcome);

            match outcome {
                InsertOutcome::Inserted => {
                    self.store.commit().await?;
                    return Ok(SlotOutcome::Filled { attempts: attempt });
                }
                InsertOutcome::UniqueViolation => {
                    // No rollback unless configured: the next attempt observes
                    // the aborted transaction and rolls back then.
                    if self.config.rollback_on_conflict {
                        self.store.rollback().await?;
                    }
                }
                InsertOutcome::AbortedTransaction
                | InsertOutcome::RaisedException
                | InsertOutcome::CheckViolation => {
                    self.store.rollback().await?;
                }
            }
        }

        Ok(SlotOutcome::Exhausted)
    }
}
