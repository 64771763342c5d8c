//! Random event rows: title, date and time window.

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::macros::date;
use time::{Date, Duration, Time};

use crate::config::ConfigError;
use crate::corpus::WordSource;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Generated event data ready for database insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEvent {
    pub title: String,
    pub event_date: Date,
    pub start_time: Time,
    pub end_time: Time,
}

impl GeneratedEvent {
    /// Length of the time window in minutes, ignoring midnight rollover.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time)
            .whole_minutes()
            .rem_euclid(MINUTES_PER_DAY)
    }

    /// Whether the window wrapped past midnight when the duration was added.
    pub fn wraps_midnight(&self) -> bool {
        self.end_time <= self.start_time
    }
}

/// Configuration for event generation. All ranges are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventGenConfig {
    /// Earliest event date.
    pub min_date: Date,
    /// Latest event date.
    pub max_date: Date,
    /// Lowest start hour.
    pub min_hour: u8,
    /// Highest start hour.
    pub max_hour: u8,
    /// Highest start minute. Minutes are uniform in `0..=max_minute`, not rounded.
    pub max_minute: u8,
    /// Event length in minutes.
    pub duration_minutes: (i64, i64),
    /// Number of corpus words in a title.
    pub title_words: (usize, usize),
    /// Numeric title suffix.
    pub title_number: (u32, u32),
}

impl Default for EventGenConfig {
    fn default() -> Self {
        Self {
            min_date: date!(2010 - 01 - 01),
            max_date: date!(2040 - 12 - 31),
            min_hour: 1,
            max_hour: 20,
            max_minute: 55,
            duration_minutes: (40, 300),
            title_words: (2, 4),
            title_number: (1, 999),
        }
    }
}

impl EventGenConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_date > self.max_date {
            return Err(ConfigError::InvalidRange("min_date is after max_date"));
        }
        if self.min_hour > self.max_hour || self.max_hour > 23 {
            return Err(ConfigError::InvalidRange("start hours must satisfy min <= max <= 23"));
        }
        if self.max_minute > 59 {
            return Err(ConfigError::InvalidRange("max_minute must be at most 59"));
        }
        let (min_len, max_len) = self.duration_minutes;
        if min_len < 1 || min_len > max_len || max_len >= MINUTES_PER_DAY {
            return Err(ConfigError::InvalidRange(
                "duration must satisfy 1 <= min <= max < 1440 minutes",
            ));
        }
        let (min_words, max_words) = self.title_words;
        if min_words == 0 || min_words > max_words {
            return Err(ConfigError::InvalidRange("title words must satisfy 1 <= min <= max"));
        }
        if self.title_number.0 > self.title_number.1 {
            return Err(ConfigError::InvalidRange("title number min is above max"));
        }
        Ok(())
    }
}

/// Generates random event rows from a word source.
pub struct EventGenerator<W> {
    config: EventGenConfig,
    words: W,
}

impl<W: WordSource> EventGenerator<W> {
    /// Creates a generator, rejecting inverted or out-of-range bounds.
    pub fn new(config: EventGenConfig, words: W) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, words })
    }

    /// Generates a single event.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> GeneratedEvent {
        let title = self.generate_title(rng);
        let event_date = self.generate_date(rng);
        let start_time = self.generate_start_time(rng);
        let (min_len, max_len) = self.config.duration_minutes;
        // Time + Duration wraps at midnight; the date part is dropped.
        let end_time = start_time + Duration::minutes(rng.gen_range(min_len..=max_len));

        GeneratedEvent {
            title,
            event_date,
            start_time,
            end_time,
        }
    }

    /// Generates multiple events.
    pub fn generate_batch<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<GeneratedEvent> {
        (0..count).map(|_| self.generate(rng)).collect()
    }

    /// Joins 2-4 corpus words and appends a number, e.g. `"grand jury said 417"`.
    fn generate_title<R: Rng>(&self, rng: &mut R) -> String {
        let (min_words, max_words) = self.config.title_words;
        let count = rng.gen_range(min_words..=max_words);
        let words: Vec<String> = (0..count).map(|_| self.words.pick_word(rng)).collect();

        let (min_number, max_number) = self.config.title_number;
        let number = rng.gen_range(min_number..=max_number);

        format!("{} {number}", words.join(" "))
    }

    fn generate_date<R: Rng>(&self, rng: &mut R) -> Date {
        let span = (self.config.max_date - self.config.min_date).whole_days();
        self.config.min_date + Duration::days(rng.gen_range(0..=span))
    }

    fn generate_start_time<R: Rng>(&self, rng: &mut R) -> Time {
        let hour = i64::from(rng.gen_range(self.config.min_hour..=self.config.max_hour));
        let minute = i64::from(rng.gen_range(0..=self.config.max_minute));
        Time::MIDNIGHT + Duration::minutes(hour * 60 + minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{LoremWords, WordList};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use time::macros::time;

    const SAMPLES: usize = 5_000;

    fn generator() -> EventGenerator<LoremWords> {
        EventGenerator::new(EventGenConfig::default(), LoremWords).unwrap()
    }

    #[test]
    fn test_dates_within_range() {
        let event_gen = generator();
        let mut rng = StdRng::seed_from_u64(11);

        for event in event_gen.generate_batch(SAMPLES, &mut rng) {
            assert!(event.event_date >= date!(2010 - 01 - 01), "{event:?}");
            assert!(event.event_date <= date!(2040 - 12 - 31), "{event:?}");
        }
    }

    #[test]
    fn test_date_range_bounds_are_reachable() {
        let config = EventGenConfig {
            min_date: date!(2024 - 02 - 28),
            max_date: date!(2024 - 03 - 01),
            ..EventGenConfig::default()
        };
        let event_gen = EventGenerator::new(config, LoremWords).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let dates: std::collections::HashSet<_> = event_gen
            .generate_batch(500, &mut rng)
            .into_iter()
            .map(|e| e.event_date)
            .collect();
        assert_eq!(dates.len(), 3);
        assert!(dates.contains(&date!(2024 - 02 - 29)));
    }

    #[test]
    fn test_start_hours_and_minutes_within_range() {
        let event_gen = generator();
        let mut rng = StdRng::seed_from_u64(12);

        for event in event_gen.generate_batch(SAMPLES, &mut rng) {
            assert!((1..=20).contains(&event.start_time.hour()), "{event:?}");
            assert!(event.start_time.minute() <= 55, "{event:?}");
            assert_eq!(event.start_time.second(), 0);
        }
    }

    #[test]
    fn test_duration_within_range_ignoring_rollover() {
        let event_gen = generator();
        let mut rng = StdRng::seed_from_u64(13);

        let mut wrapped = 0;
        for event in event_gen.generate_batch(SAMPLES, &mut rng) {
            let minutes = event.duration_minutes();
            assert!((40..=300).contains(&minutes), "{event:?} lasted {minutes}");
            if event.wraps_midnight() {
                wrapped += 1;
            }
        }
        // Starts up to 20:55 plus up to 300 minutes regularly cross midnight.
        assert!(wrapped > 0);
    }

    #[test]
    fn test_duration_across_midnight() {
        let event = GeneratedEvent {
            title: "late show 1".to_string(),
            event_date: date!(2020 - 01 - 01),
            start_time: time!(20:30),
            end_time: time!(1:30),
        };
        assert_eq!(event.duration_minutes(), 300);
        assert!(event.wraps_midnight());
    }

    #[test]
    fn test_title_shape() {
        let event_gen = generator();
        let mut rng = StdRng::seed_from_u64(14);

        for event in event_gen.generate_batch(SAMPLES, &mut rng) {
            let tokens: Vec<&str> = event.title.split_whitespace().collect();
            assert!((3..=5).contains(&tokens.len()), "{}", event.title);

            let number: u32 = tokens.last().unwrap().parse().unwrap();
            assert!((1..=999).contains(&number), "{}", event.title);

            let (head, tail) = event.title.rsplit_once(' ').unwrap();
            assert_eq!(tail, number.to_string());
            assert!(!head.ends_with(' '));
        }
    }

    #[test]
    fn test_title_uses_word_list() {
        let words = WordList::from_text("alpha beta").unwrap();
        let event_gen = EventGenerator::new(EventGenConfig::default(), words).unwrap();
        let mut rng = StdRng::seed_from_u64(15);

        for _ in 0..100 {
            let event = event_gen.generate(&mut rng);
            let tokens: Vec<&str> = event.title.split_whitespace().collect();
            let (_, words) = tokens.split_last().unwrap();
            assert!(words.iter().all(|w| *w == "alpha" || *w == "beta"));
        }
    }

    #[test]
    fn test_same_seed_same_events() {
        let event_gen = generator();
        let a = event_gen.generate_batch(20, &mut StdRng::seed_from_u64(99));
        let b = event_gen.generate_batch(20, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let inverted_dates = EventGenConfig {
            min_date: date!(2041 - 01 - 01),
            ..EventGenConfig::default()
        };
        assert!(EventGenerator::new(inverted_dates, LoremWords).is_err());

        let bad_hour = EventGenConfig {
            max_hour: 24,
            ..EventGenConfig::default()
        };
        assert!(bad_hour.validate().is_err());

        let full_day = EventGenConfig {
            duration_minutes: (40, 1440),
            ..EventGenConfig::default()
        };
        assert!(full_day.validate().is_err());

        let no_words = EventGenConfig {
            title_words: (0, 2),
            ..EventGenConfig::default()
        };
        assert!(no_words.validate().is_err());

        assert!(EventGenConfig::default().validate().is_ok());
    }
}
