use crate::modules::utils::{clip_difficulty, rate_to_color};
use atcoder_stats_libs::model::{ProblemMap, ProblemModelMap, Submission};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PieSlice {
    pub label: String,
    pub solved: usize,
    pub rejected: usize,
    pub untried: usize,
}

impl PieSlice {
    pub fn total(&self) -> usize {
        self.solved + self.rejected + self.untried
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ContestPie {
    pub series: String,
    pub slices: Vec<PieSlice>,
}

pub const CONTEST_SERIES: [&str; 3] = ["ABC", "ARC", "AGC"];

fn series_of(contest_id: &str) -> Option<&'static str> {
    CONTEST_SERIES.into_iter().find(|series| {
        let prefix = series.to_lowercase();
        contest_id
            .strip_prefix(prefix.as_str())
            .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    })
}

/// Letters sort by length first so `Ex` comes after `H`.
fn letter_key(label: &str) -> (usize, String) {
    (label.len(), label.to_string())
}

/// Solved/rejected/untried counts per problem letter of each regular contest series.
pub fn contest_pies(submissions: &[&Submission], problems: &ProblemMap) -> Vec<ContestPie> {
    let solved: HashSet<&str> = super::solved_problem_ids(submissions);
    let tried: HashSet<&str> = submissions.iter().map(|s| s.problem_id.as_str()).collect();

    CONTEST_SERIES
        .iter()
        .map(|series| {
            let mut slices: BTreeMap<(usize, String), PieSlice> = BTreeMap::new();
            for problem in problems
                .values()
                .filter(|problem| series_of(&problem.contest_id) == Some(*series))
            {
                let label = problem.index();
                let slice = slices
                    .entry(letter_key(&label))
                    .or_insert_with(|| PieSlice {
                        label,
                        solved: 0,
                        rejected: 0,
                        untried: 0,
                    });
                if solved.contains(problem.id.as_str()) {
                    slice.solved += 1;
                } else if tried.contains(problem.id.as_str()) {
                    slice.rejected += 1;
                } else {
                    slice.untried += 1;
                }
            }

            ContestPie {
                series: series.to_string(),
                slices: slices.into_values().collect(),
            }
        })
        .collect()
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DifficultyPie {
    pub color: String,
    pub solved: usize,
    pub total: usize,
}

pub const DIFFICULTY_COLORS: [&str; 8] = [
    "gray", "brown", "green", "cyan", "blue", "yellow", "orange", "red",
];

/// Solved and total problem counts per difficulty color. Everything from 2800 up is red.
pub fn difficulty_pies(
    submissions: &[&Submission],
    problems: &ProblemMap,
    models: &ProblemModelMap,
) -> Vec<DifficultyPie> {
    let solved: HashSet<&str> = super::solved_problem_ids(submissions);
    let mut pies: Vec<DifficultyPie> = DIFFICULTY_COLORS
        .iter()
        .map(|color| DifficultyPie {
            color: color.to_string(),
            solved: 0,
            total: 0,
        })
        .collect();

    for problem in problems.values() {
        let difficulty = match models.get(&problem.id).and_then(|model| model.difficulty) {
            Some(difficulty) => clip_difficulty(difficulty),
            None => continue,
        };
        let color = rate_to_color(difficulty);
        let index = DIFFICULTY_COLORS
            .iter()
            .position(|c| *c == color)
            .unwrap_or(DIFFICULTY_COLORS.len() - 1);

        pies[index].total += 1;
        if solved.contains(problem.id.as_str()) {
            pies[index].solved += 1;
        }
    }

    pies
}
