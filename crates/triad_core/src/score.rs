//! Pillar scoring and zone classification.
//!
//! # Responsibility
//! - Validate pillar ratings and derive the composite total score.
//! - Classify totals into zones and resolve the dominant pillar.
//!
//! # Invariants
//! - Every pillar rating is an integer in `[1, 5]`.
//! - Zone bands partition `[3, 15]` with no gap and no overlap.
//! - Dominant-pillar ties resolve `consequence > pride > construction`.

use crate::model::task::Task;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest accepted pillar rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted pillar rating.
pub const MAX_RATING: u8 = 5;
/// Lowest total classified as `Zone::Critical`.
pub const CRITICAL_THRESHOLD: u8 = 12;
/// Lowest total classified as `Zone::Important`.
pub const IMPORTANT_THRESHOLD: u8 = 8;

/// One of the three independent rating axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    Consequence,
    Pride,
    Construction,
}

impl Pillar {
    /// All pillars in tie-break precedence order.
    pub const ALL: [Pillar; 3] = [Pillar::Consequence, Pillar::Pride, Pillar::Construction];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Consequence => "consequence",
            Self::Pride => "pride",
            Self::Construction => "construction",
        }
    }
}

impl Display for Pillar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority tier derived from a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Total `>= 12`.
    Critical,
    /// Total in `8..=11`.
    Important,
    /// Total `< 8`.
    Moderate,
}

impl Zone {
    /// All zones from highest to lowest priority.
    pub const ALL: [Zone; 3] = [Zone::Critical, Zone::Important, Zone::Moderate];

    /// Returns whether `total` falls inside this zone's band.
    pub fn contains(self, total: u8) -> bool {
        classify_zone(total) == self
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Moderate => "moderate",
        }
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring input error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreError {
    /// A pillar rating is outside `[1, 5]`.
    InvalidRating { pillar: Pillar, value: i64 },
}

impl Display for ScoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRating { pillar, value } => write!(
                f,
                "invalid {pillar} rating {value}; expected {MIN_RATING}..={MAX_RATING}"
            ),
        }
    }
}

impl Error for ScoreError {}

/// Validated triple of pillar ratings.
///
/// Construction is the only way to obtain a value, so every instance holds
/// in-range ratings and `total()` never needs re-validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PillarRatings {
    consequence: u8,
    pride: u8,
    construction: u8,
}

impl PillarRatings {
    /// Validates and builds a rating triple.
    ///
    /// # Errors
    /// - `ScoreError::InvalidRating` for the first pillar outside `[1, 5]`,
    ///   checked in precedence order.
    pub fn new(consequence: i64, pride: i64, construction: i64) -> Result<Self, ScoreError> {
        Ok(Self {
            consequence: checked_rating(Pillar::Consequence, consequence)?,
            pride: checked_rating(Pillar::Pride, pride)?,
            construction: checked_rating(Pillar::Construction, construction)?,
        })
    }

    pub fn consequence(&self) -> u8 {
        self.consequence
    }

    pub fn pride(&self) -> u8 {
        self.pride
    }

    pub fn construction(&self) -> u8 {
        self.construction
    }

    /// Returns the rating for one pillar.
    pub fn get(&self, pillar: Pillar) -> u8 {
        match pillar {
            Pillar::Consequence => self.consequence,
            Pillar::Pride => self.pride,
            Pillar::Construction => self.construction,
        }
    }

    /// Sum of the three ratings, always in `[3, 15]`.
    pub fn total(&self) -> u8 {
        self.consequence + self.pride + self.construction
    }

    /// Pillar with the strictly highest rating.
    ///
    /// Iterates in precedence order and only replaces the leader on a strict
    /// improvement, so earlier pillars win ties.
    pub fn dominant(&self) -> Pillar {
        let mut leader = Pillar::Consequence;
        for pillar in Pillar::ALL {
            if self.get(pillar) > self.get(leader) {
                leader = pillar;
            }
        }
        leader
    }
}

/// Computes the composite score of three pillar ratings.
///
/// # Errors
/// - `ScoreError::InvalidRating` when any input is outside `[1, 5]`.
pub fn compute_total(consequence: i64, pride: i64, construction: i64) -> Result<u8, ScoreError> {
    PillarRatings::new(consequence, pride, construction).map(|ratings| ratings.total())
}

/// Classifies a total score into its zone.
///
/// Bands are inclusive on their lower bound: `< 8` moderate, `8..=11`
/// important, `>= 12` critical.
pub fn classify_zone(total: u8) -> Zone {
    if total >= CRITICAL_THRESHOLD {
        Zone::Critical
    } else if total >= IMPORTANT_THRESHOLD {
        Zone::Important
    } else {
        Zone::Moderate
    }
}

/// Returns the task's dominant pillar.
pub fn dominant_pillar(task: &Task) -> Pillar {
    task.ratings().dominant()
}

fn checked_rating(pillar: Pillar, value: i64) -> Result<u8, ScoreError> {
    u8::try_from(value)
        .ok()
        .filter(|rating| (MIN_RATING..=MAX_RATING).contains(rating))
        .ok_or(ScoreError::InvalidRating { pillar, value })
}
