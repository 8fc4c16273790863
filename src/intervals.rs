//! Producer award-interval calculation
//!
//! Takes the flat list of winning rows and computes, per producer, the gaps
//! between consecutive wins, then reduces to the producers holding the
//! smallest and largest gap. All ties at either extreme are reported.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One winning movie row as delivered by the store: the raw comma-joined
/// producer credit string and the award year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinRecord {
    pub producers: String,
    pub year: i32,
}

/// A gap between two consecutive wins of the same producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub producer: String,
    pub interval: i32,
    pub previous_win: i32,
    pub following_win: i32,
}

/// The producers at both extremes. `min` holds every interval equal to the
/// global minimum, `max` every interval equal to the global maximum. Both
/// are empty when no producer has two or more wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IntervalResult {
    pub min: Vec<Interval>,
    pub max: Vec<Interval>,
}

/// Compute the min/max award intervals over the given winning rows.
///
/// Co-production credits ("X, Y") expand to one win per producer, each with
/// the row's year. Producers with a single win contribute no interval. The
/// result preserves discovery order: producers in first-seen order over the
/// input, pairs in chronological order within a producer.
pub fn compute_intervals(wins: &[WinRecord]) -> IntervalResult {
    // Group win years per producer, keeping first-seen producer order so the
    // output is deterministic regardless of hash ordering.
    let mut histories: Vec<(String, Vec<i32>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in wins {
        for name in record.producers.split(',') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            match index.get(name) {
                Some(&i) => histories[i].1.push(record.year),
                None => {
                    index.insert(name.to_string(), histories.len());
                    histories.push((name.to_string(), vec![record.year]));
                }
            }
        }
    }

    let mut intervals: Vec<Interval> = Vec::new();
    for (producer, years) in &mut histories {
        // The store delivers rows ordered by year, but the calculation must
        // not depend on that.
        years.sort_unstable();
        for pair in years.windows(2) {
            intervals.push(Interval {
                producer: producer.clone(),
                interval: pair[1] - pair[0],
                previous_win: pair[0],
                following_win: pair[1],
            });
        }
    }

    let Some(global_min) = intervals.iter().map(|i| i.interval).min() else {
        return IntervalResult::default();
    };
    let global_max = intervals
        .iter()
        .map(|i| i.interval)
        .max()
        .unwrap_or(global_min);

    IntervalResult {
        min: intervals
            .iter()
            .filter(|i| i.interval == global_min)
            .cloned()
            .collect(),
        max: intervals
            .into_iter()
            .filter(|i| i.interval == global_max)
            .collect(),
    }
}
