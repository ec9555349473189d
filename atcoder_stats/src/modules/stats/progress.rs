use super::first_accepted;
use atcoder_stats_libs::model::Submission;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub accepted_count: usize,
}

/// Cumulative number of distinct solved problems, one point per day with a new AC.
pub fn cumulative_accepted(submissions: &[&Submission]) -> Vec<ProgressPoint> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for submission in first_accepted(submissions).values() {
        if let Some(date) = submission.date() {
            *per_day.entry(date).or_insert(0) += 1;
        }
    }

    let mut total = 0;
    per_day
        .into_iter()
        .map(|(date, count)| {
            total += count;
            ProgressPoint {
                date,
                accepted_count: total,
            }
        })
        .collect()
}
