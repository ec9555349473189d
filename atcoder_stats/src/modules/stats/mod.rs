pub mod achievement;
pub mod language;
pub mod pie;
pub mod progress;
pub mod recommend;
pub mod trophy;

use atcoder_stats_libs::model::{ProblemMap, Submission, SubmissionMap};
use chrono::NaiveDate;
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::collections::{BTreeMap, HashSet};

/// Submissions in `map` made by `user_id`, compared case-insensitively.
pub fn user_submissions<'a>(map: &'a SubmissionMap, user_id: &str) -> Vec<&'a Submission> {
    let user_id = user_id.to_lowercase();
    map.values()
        .flatten()
        .filter(|submission| submission.user_id.to_lowercase() == user_id)
        .collect()
}

/// Earliest accepted submission of every solved problem.
pub fn first_accepted<'a>(submissions: &[&'a Submission]) -> BTreeMap<&'a str, &'a Submission> {
    let mut first: BTreeMap<&str, &Submission> = BTreeMap::new();
    for submission in submissions.iter().copied().filter(|s| s.is_accepted()) {
        first
            .entry(submission.problem_id.as_str())
            .and_modify(|current| {
                if submission.epoch_second < current.epoch_second {
                    *current = submission;
                }
            })
            .or_insert(submission);
    }
    first
}

pub fn solved_problem_ids<'a>(submissions: &[&'a Submission]) -> HashSet<&'a str> {
    submissions
        .iter()
        .copied()
        .filter(|s| s.is_accepted())
        .map(|s| s.problem_id.as_str())
        .collect()
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SubmissionRow {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub problem_id: String,
    pub problem_title: Option<String>,
    pub contest_id: String,
    pub language: String,
    pub result: String,
    pub point: f64,
    pub length: i64,
    pub execution_time: Option<i64>,
}

pub const SUBMISSION_LIST_LIMIT: usize = 100;

/// Newest submissions first.
pub fn recent_submissions(
    submissions: &[&Submission],
    problems: &ProblemMap,
    limit: usize,
) -> Vec<SubmissionRow> {
    let mut sorted: Vec<&Submission> = submissions.to_vec();
    sorted.sort_by(|a, b| b.epoch_second.cmp(&a.epoch_second).then(b.id.cmp(&a.id)));

    sorted
        .into_iter()
        .take(limit)
        .map(|submission| SubmissionRow {
            id: submission.id,
            date: submission.date(),
            problem_id: submission.problem_id.clone(),
            problem_title: problems
                .get(&submission.problem_id)
                .map(|problem| problem.title.clone()),
            contest_id: submission.contest_id.clone(),
            language: submission.language.clone(),
            result: submission.result.clone(),
            point: submission.point,
            length: submission.length,
            execution_time: submission.execution_time,
        })
        .collect()
}


#[cfg(test)]
mod test {
    use super::test_util::submission;
    use super::*;
    use atcoder_stats_libs::model::group_by_problem;

    #[test]
    fn test_user_submissions_ignore_case() {
        let map = group_by_problem(vec![
            submission(1, "Foo", "abc100_a", 100, "AC"),
            submission(2, "bar", "abc100_a", 200, "AC"),
            submission(3, "FOO", "abc100_b", 300, "WA"),
        ]);

        let ids: Vec<i64> = user_submissions(&map, "foo").iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_first_accepted_keeps_earliest() {
        let a = submission(1, "foo", "abc100_a", 300, "AC");
        let b = submission(2, "foo", "abc100_a", 100, "AC");
        let c = submission(3, "foo", "abc100_a", 50, "WA");
        let submissions = vec![&a, &b, &c];

        let first = first_accepted(&submissions);
        assert_eq!(first.len(), 1);
        assert_eq!(first["abc100_a"].id, 2);
    }

    #[test]
    fn test_recent_submissions_newest_first() {
        let a = submission(1, "foo", "abc100_a", 100, "AC");
        let b = submission(2, "foo", "abc100_b", 300, "WA");
        let c = submission(3, "foo", "abc100_c", 200, "AC");
        let submissions = vec![&a, &b, &c];

        let rows = recent_submissions(&submissions, &ProblemMap::new(), 2);
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
