//! Zone analytics for strategic review of completed work.
//!
//! # Responsibility
//! - Aggregate a task set into zone, pillar and feedback distributions.
//!
//! # Invariants
//! - Empty input yields an explicit all-zero result, never NaN.
//! - Zone counts always sum to `total_count`.

use crate::model::task::{Feedback, Task};
use crate::score::{self, Pillar, Zone};
use log::info;
use serde::Serialize;

/// Per-zone task counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ZoneCounts {
    pub critical: usize,
    pub important: usize,
    pub moderate: usize,
}

impl ZoneCounts {
    pub fn get(&self, zone: Zone) -> usize {
        match zone {
            Zone::Critical => self.critical,
            Zone::Important => self.important,
            Zone::Moderate => self.moderate,
        }
    }

    fn increment(&mut self, zone: Zone) {
        match zone {
            Zone::Critical => self.critical += 1,
            Zone::Important => self.important += 1,
            Zone::Moderate => self.moderate += 1,
        }
    }
}

/// Mean rating per pillar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PillarAverages {
    pub consequence: f64,
    pub pride: f64,
    pub construction: f64,
}

/// Count of tasks dominated by each pillar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PillarCounts {
    pub consequence: usize,
    pub pride: usize,
    pub construction: usize,
}

/// Count of tasks per recorded feedback; `none` counts tasks without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FeedbackCounts {
    pub transformed: usize,
    pub relief: usize,
    pub obligation: usize,
    pub none: usize,
}

/// Summary of one analyzed task set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ZoneAnalysis {
    pub zone_counts: ZoneCounts,
    pub average_score: f64,
    pub critical_count: usize,
    /// `critical_count / total_count * 100`, or 0 for an empty set.
    pub critical_percentage: f64,
    pub total_count: usize,
    pub pillar_averages: PillarAverages,
    pub dominant_pillar_counts: PillarCounts,
    pub feedback_counts: FeedbackCounts,
}

impl ZoneAnalysis {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

/// Analyzes a completed-task set.
pub fn analyze<'a, I>(tasks: I) -> ZoneAnalysis
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut analysis = ZoneAnalysis::default();
    let mut score_sum = 0u64;
    let mut pillar_sums = [0u64; 3];

    for task in tasks {
        let ratings = task.ratings();
        analysis.total_count += 1;
        score_sum += u64::from(task.total_score());
        analysis
            .zone_counts
            .increment(score::classify_zone(task.total_score()));
        for (sum, pillar) in pillar_sums.iter_mut().zip(Pillar::ALL) {
            *sum += u64::from(ratings.get(pillar));
        }
        match ratings.dominant() {
            Pillar::Consequence => analysis.dominant_pillar_counts.consequence += 1,
            Pillar::Pride => analysis.dominant_pillar_counts.pride += 1,
            Pillar::Construction => analysis.dominant_pillar_counts.construction += 1,
        }
        match task.feedback {
            Some(Feedback::Transformed) => analysis.feedback_counts.transformed += 1,
            Some(Feedback::Relief) => analysis.feedback_counts.relief += 1,
            Some(Feedback::Obligation) => analysis.feedback_counts.obligation += 1,
            None => analysis.feedback_counts.none += 1,
        }
    }

    analysis.critical_count = analysis.zone_counts.critical;
    if analysis.total_count > 0 {
        let total = analysis.total_count as f64;
        analysis.average_score = score_sum as f64 / total;
        analysis.critical_percentage = analysis.critical_count as f64 / total * 100.0;
        analysis.pillar_averages = PillarAverages {
            consequence: pillar_sums[0] as f64 / total,
            pride: pillar_sums[1] as f64 / total,
            construction: pillar_sums[2] as f64 / total,
        };
    }

    info!(
        "event=zone_analysis module=analysis status=ok total={} critical={} important={} moderate={}",
        analysis.total_count,
        analysis.zone_counts.critical,
        analysis.zone_counts.important,
        analysis.zone_counts.moderate
    );
    analysis
}
