use atcoder_stats_libs::model::{ProblemMap, ProblemModel, ProblemModelMap, RatingInfo};
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::collections::HashSet;

/// Recommendations aim at problems the user solves about half of the time.
pub const TARGET_SOLVE_PROBABILITY: f64 = 0.5;
pub const RECOMMENDATION_LIMIT: usize = 10;

#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RecommendedProblem {
    pub id: String,
    pub contest_id: String,
    pub title: String,
    pub difficulty: Option<i32>,
    pub solve_probability: f64,
    pub is_experimental: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Recommendations {
    pub problems: Vec<RecommendedProblem>,
    pub can_create_virtual_contest: bool,
}

pub fn predict_solve_probability(model: &ProblemModel, internal_rating: f64) -> Option<f64> {
    let difficulty = model.difficulty? as f64;
    let discrimination = model.discrimination?;
    Some(1.0 / (1.0 + (-discrimination * (internal_rating - difficulty)).exp()))
}

pub fn recommend(
    solved: &HashSet<&str>,
    problems: &ProblemMap,
    models: &ProblemModelMap,
    rating_info: &RatingInfo,
    is_logged_in: bool,
    limit: usize,
) -> Recommendations {
    let mut candidates: Vec<RecommendedProblem> = match rating_info.internal_rating {
        Some(internal_rating) => problems
            .values()
            .filter(|problem| !solved.contains(problem.id.as_str()))
            .filter_map(|problem| {
                let model = models.get(&problem.id)?;
                let solve_probability = predict_solve_probability(model, internal_rating)?;
                Some(RecommendedProblem {
                    id: problem.id.clone(),
                    contest_id: problem.contest_id.clone(),
                    title: problem.title.clone(),
                    difficulty: model.difficulty,
                    solve_probability,
                    is_experimental: model.is_experimental,
                })
            })
            .collect(),
        None => Vec::new(),
    };

    candidates.sort_by(|a, b| {
        let da = (a.solve_probability - TARGET_SOLVE_PROBABILITY).abs();
        let db = (b.solve_probability - TARGET_SOLVE_PROBABILITY).abs();
        da.total_cmp(&db).then_with(|| a.id.cmp(&b.id))
    });
    candidates.truncate(limit);

    Recommendations {
        problems: candidates,
        can_create_virtual_contest: is_logged_in,
    }
}
