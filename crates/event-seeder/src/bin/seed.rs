//! Event seed script - fills the `events` table with random events
//!
//! Run with:
//! ```
//! cargo run -p event-seeder --bin seed
//! ```

use event_seeder::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let mut store = PgEventStore::connect(&config.database).await?;
    tracing::info!("Connected to database");

    if config.migrate {
        store.migrate().await?;
    }

    let words = match &config.words_file {
        Some(path) => {
            let list = WordList::load(path)?;
            tracing::info!("Loaded {} words from {}", list.words().len(), path.display());
            Corpus::List(list)
        }
        None => Corpus::Lorem(LoremWords),
    };

    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut seeder = Seeder::new(store, words, config.seed)?;
    let report = seeder.run(&mut rng).await?;

    // Summary output
    tracing::info!("Seed completed!");
    tracing::info!("  Slots filled: {}", report.slots_filled);
    tracing::info!("  Slots exhausted: {}", report.slots_exhausted);
    tracing::info!("  Attempts: {}", report.attempts);
    tracing::info!("  Unique violations: {}", report.unique_violations);
    tracing::info!("  Aborted transactions: {}", report.aborted_transactions);
    tracing::info!("  Raised exceptions: {}", report.raised_exceptions);
    tracing::info!("  Check violations: {}", report.check_violations);

    Ok(())
}
