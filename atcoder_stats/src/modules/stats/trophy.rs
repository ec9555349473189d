use super::{achievement::AchievementSummary, pie::ContestPie};
use serde::Serialize;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrophyGroup {
    AcceptedCount,
    Streak,
    Completion,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Trophy {
    pub group: TrophyGroup,
    pub title: String,
    pub reason: String,
}

pub const ACCEPTED_COUNT_MILESTONES: [usize; 7] = [100, 500, 1000, 2000, 3000, 4000, 5000];
pub const STREAK_MILESTONES: [u32; 5] = [7, 30, 100, 200, 365];

pub fn achieved_trophies(summary: &AchievementSummary, pies: &[ContestPie]) -> Vec<Trophy> {
    let mut trophies = Vec::new();

    for &milestone in ACCEPTED_COUNT_MILESTONES
        .iter()
        .filter(|&&m| summary.accepted_count >= m)
    {
        trophies.push(Trophy {
            group: TrophyGroup::AcceptedCount,
            title: format!("{} Accepted", milestone),
            reason: format!("Solved {} or more problems", milestone),
        });
    }

    for &milestone in STREAK_MILESTONES
        .iter()
        .filter(|&&m| summary.longest_streak >= m)
    {
        trophies.push(Trophy {
            group: TrophyGroup::Streak,
            title: format!("{} Days Streak", milestone),
            reason: format!("Solved new problems {} days in a row", milestone),
        });
    }

    for pie in pies {
        for slice in pie
            .slices
            .iter()
            .filter(|s| s.total() > 0 && s.solved == s.total())
        {
            trophies.push(Trophy {
                group: TrophyGroup::Completion,
                title: format!("{} {} Complete", pie.series, slice.label),
                reason: format!(
                    "Solved all {} problems of {} {}",
                    slice.total(),
                    pie.series,
                    slice.label
                ),
            });
        }
    }

    trophies
}
