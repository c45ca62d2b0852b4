//! Release names ("Energetic Eagle") and the release pull request title.
use chrono::NaiveDate;
use rand::{Rng, seq::SliceRandom};
use regex::Regex;

use crate::{Result, error::StewardError};

const ADJECTIVES: &[&str] = &[
    "Agile", "Amber", "Bold", "Brave", "Bright", "Calm", "Clever", "Cosmic",
    "Daring", "Dapper", "Eager", "Energetic", "Fearless", "Fuzzy", "Gentle",
    "Golden", "Happy", "Humble", "Icy", "Jolly", "Jazzy", "Keen", "Kind",
    "Lively", "Lucky", "Mighty", "Mellow", "Nimble", "Noble", "Odd", "Plucky",
    "Proud", "Quick", "Quiet", "Rapid", "Rustic", "Swift", "Sunny", "Tidy",
    "Tough", "Upbeat", "Vivid", "Valiant", "Witty", "Wild", "Young", "Zesty",
];

const ANIMALS: &[&str] = &[
    "Alpaca", "Antelope", "Badger", "Bison", "Cheetah", "Crane", "Dingo",
    "Dolphin", "Eagle", "Elk", "Falcon", "Ferret", "Gazelle", "Gecko",
    "Heron", "Hedgehog", "Ibis", "Impala", "Jackal", "Jaguar", "Koala",
    "Kestrel", "Lemur", "Lynx", "Marmot", "Moose", "Narwhal", "Newt",
    "Otter", "Ocelot", "Panda", "Puffin", "Quail", "Raven", "Reindeer",
    "Salmon", "Stork", "Tapir", "Toucan", "Urchin", "Vulture", "Walrus",
    "Wombat", "Yak", "Zebra",
];

const TITLE_PATTERN: &str =
    r"^Release (?<date>\d{4}-\d{2}-\d{2}): (?<name>\S.*)$";

/// Picks a random letter, then an adjective and an animal that both start
/// with it. Letters missing from either list are re-drawn.
pub struct ReleaseNameGenerator<'a> {
    adjectives: &'a [&'a str],
    animals: &'a [&'a str],
}

impl Default for ReleaseNameGenerator<'static> {
    fn default() -> Self {
        Self::new(ADJECTIVES, ANIMALS)
    }
}

impl<'a> ReleaseNameGenerator<'a> {
    pub fn new(adjectives: &'a [&'a str], animals: &'a [&'a str]) -> Self {
        Self {
            adjectives,
            animals,
        }
    }

    fn starting_with(words: &'a [&'a str], letter: char) -> Vec<&'a str> {
        words
            .iter()
            .filter(|w| {
                w.chars()
                    .next()
                    .is_some_and(|c| c.eq_ignore_ascii_case(&letter))
            })
            .copied()
            .collect()
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<String> {
        let has_shared_letter = ('a'..='z').any(|letter| {
            !Self::starting_with(self.adjectives, letter).is_empty()
                && !Self::starting_with(self.animals, letter).is_empty()
        });

        if !has_shared_letter {
            return Err(StewardError::invalid_config(
                "release name word lists share no starting letter",
            ));
        }

        loop {
            let letter = rng.gen_range(b'a'..=b'z') as char;
            let adjectives = Self::starting_with(self.adjectives, letter);
            let animals = Self::starting_with(self.animals, letter);

            if let (Some(adjective), Some(animal)) =
                (adjectives.choose(&mut *rng), animals.choose(&mut *rng))
            {
                return Ok(format!("{adjective} {animal}"));
            }
        }
    }
}

/// Date stamp and release name encoded in a release pull request title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTitle {
    pub date: NaiveDate,
    pub name: String,
}

impl ReleaseTitle {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }

    /// Parse a title produced by [`ReleaseTitle::render`].
    pub fn parse(title: &str) -> Option<Self> {
        let title_re = Regex::new(TITLE_PATTERN).ok()?;
        let captures = title_re.captures(title.trim())?;
        let date = NaiveDate::parse_from_str(&captures["date"], "%Y-%m-%d").ok()?;
        Some(Self::new(date, captures["name"].trim()))
    }

    pub fn render(&self) -> String {
        format!("Release {}: {}", self.date.format("%Y-%m-%d"), self.name)
    }

    /// Version string derived from the date stamp, e.g. `2026.10.17`.
    pub fn version(&self) -> String {
        self.date.format("%Y.%m.%d").to_string()
    }

    /// Name shared by the GitHub release and the Jira version.
    pub fn full_release_name(&self) -> String {
        format!("{} ({})", self.version(), self.name)
    }
}
