use super::first_accepted;
use atcoder_stats_libs::model::{ContestMap, RatingInfo, Submission};
use chrono::NaiveDate;
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::collections::BTreeSet;

#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AchievementSummary {
    pub accepted_count: usize,
    pub rated_point_sum: f64,
    pub longest_streak: u32,
    pub current_streak: u32,
    pub last_accepted_date: Option<NaiveDate>,
    pub rating: i32,
    pub participation_count: u32,
}

pub fn summarize(
    submissions: &[&Submission],
    contests: &ContestMap,
    rating_info: &RatingInfo,
    today: NaiveDate,
) -> AchievementSummary {
    let first = first_accepted(submissions);

    let rated_point_sum: f64 = first
        .values()
        .filter(|submission| {
            contests
                .get(&submission.contest_id)
                .map(|contest| contest.is_rated())
                .unwrap_or(false)
        })
        .map(|submission| submission.point)
        .sum();

    let dates: BTreeSet<NaiveDate> = first.values().filter_map(|s| s.date()).collect();
    let (longest_streak, current_streak) = streaks(&dates, today);

    AchievementSummary {
        accepted_count: first.len(),
        rated_point_sum,
        longest_streak,
        current_streak,
        last_accepted_date: dates.iter().next_back().copied(),
        rating: rating_info.rating,
        participation_count: rating_info.participation_count,
    }
}

/// Longest run of consecutive days, and the run still alive at `today`.
///
/// A run is alive when its last day is today or yesterday.
pub fn streaks(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> (u32, u32) {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &date in dates {
        run = match previous.and_then(|p| p.succ_opt()) {
            Some(next) if next == date => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }

    let current = match previous {
        Some(last) if last == today || last.succ_opt() == Some(today) => run,
        _ => 0,
    };

    (longest, current)
}
