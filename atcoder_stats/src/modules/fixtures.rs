use crate::modules::user_page::reconcile::UserPageData;
use async_trait::async_trait;
use atcoder_stats_libs::{
    client::{ApiClientError, AtCoderProblemsApi, Result},
    model::*,
};
use chrono::DateTime;
use reqwest::StatusCode;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio::time::{self, Duration};

/// In-memory stand-in for AtCoder Problems.
#[derive(Default, Clone)]
pub struct FakeApi {
    pub submissions: Vec<Submission>,
    pub submissions_delay: Duration,
    pub contests_delay: Duration,
    pub fail_submissions: bool,
    pub fail_problem_models: bool,
    pub login_user: Option<LoginUser>,
    pub submission_calls: Arc<AtomicUsize>,
}

impl FakeApi {
    pub fn with_submissions(submissions: Vec<Submission>) -> Self {
        Self {
            submissions,
            ..Default::default()
        }
    }
}

async fn delay(duration: Duration) {
    if !duration.is_zero() {
        time::sleep(duration).await;
    }
}

#[async_trait]
impl AtCoderProblemsApi for FakeApi {
    async fn submissions(&self, user_id: &str) -> Result<Vec<Submission>> {
        self.submission_calls.fetch_add(1, Ordering::SeqCst);
        delay(self.submissions_delay).await;
        if self.fail_submissions {
            return Err(ApiClientError::UnexpectedStatus(
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("submissions"),
            ));
        }
        let user_id = user_id.to_lowercase();
        Ok(self
            .submissions
            .iter()
            .filter(|s| s.user_id.to_lowercase() == user_id)
            .cloned()
            .collect())
    }

    async fn merged_problems(&self) -> Result<Vec<MergedProblem>> {
        Ok(sample_problems().into_values().collect())
    }

    async fn contests(&self) -> Result<Vec<Contest>> {
        delay(self.contests_delay).await;
        Ok(sample_contests().into_values().collect())
    }

    async fn problem_models(&self) -> Result<ProblemModelMap> {
        if self.fail_problem_models {
            return Err(ApiClientError::UnexpectedStatus(
                StatusCode::BAD_GATEWAY,
                String::from("problem models"),
            ));
        }
        Ok(sample_problem_models())
    }

    async fn rating_history(&self, _user_id: &str) -> Result<Vec<RatingHistoryEntry>> {
        Ok(sample_rating_history())
    }

    async fn login_state(&self, cookie: Option<&str>) -> Result<Option<LoginUser>> {
        Ok(cookie.and(self.login_user.clone()))
    }
}

fn submission(id: i64, problem_id: &str, epoch_second: i64, result: &str) -> Submission {
    Submission {
        id,
        epoch_second,
        problem_id: problem_id.to_string(),
        contest_id: problem_id
            .rsplit_once('_')
            .map(|(contest, _)| contest.to_string())
            .unwrap_or_default(),
        user_id: String::from("ABC"),
        language: String::from("Rust (1.42.0)"),
        point: 100.0,
        length: 512,
        result: result.to_string(),
        execution_time: Some(5),
    }
}

/// Three problems solved by `ABC` on consecutive JST days, one rejected.
pub fn sample_submissions() -> Vec<Submission> {
    vec![
        submission(1, "abc100_a", 1599966000, "AC"),
        submission(2, "abc100_b", 1600052400, "WA"),
        submission(3, "abc100_b", 1600052500, "AC"),
        submission(4, "abc101_a", 1600138800, "AC"),
        submission(5, "abc101_b", 1600138900, "TLE"),
    ]
}

fn problem(id: &str, index: &str) -> MergedProblem {
    MergedProblem {
        id: id.to_string(),
        contest_id: id.rsplit_once('_').unwrap().0.to_string(),
        problem_index: Some(index.to_string()),
        name: Some(format!("Problem {}", id)),
        title: format!("{}. Problem {}", index, id),
        point: Some(100.0),
        solver_count: Some(1000),
    }
}

pub fn sample_problems() -> ProblemMap {
    [
        ("abc100_a", "A"),
        ("abc100_b", "B"),
        ("abc101_a", "A"),
        ("abc101_b", "B"),
        ("abc102_a", "A"),
    ]
    .iter()
    .map(|(id, index)| (id.to_string(), problem(id, index)))
    .collect()
}

pub fn sample_contests() -> ContestMap {
    ["abc100", "abc101", "abc102"]
        .iter()
        .enumerate()
        .map(|(i, id)| {
            (
                id.to_string(),
                Contest {
                    id: id.to_string(),
                    start_epoch_second: 1529143200 + 604800 * i as i64,
                    duration_second: 6000,
                    title: format!("AtCoder Beginner Contest {}", 100 + i),
                    rate_change: String::from(" ~ 1999"),
                },
            )
        })
        .collect()
}

pub fn sample_problem_models() -> ProblemModelMap {
    [
        ("abc100_a", -800),
        ("abc100_b", 200),
        ("abc101_a", -500),
        ("abc101_b", 900),
        ("abc102_a", 1500),
    ]
    .iter()
    .map(|(id, difficulty)| {
        (
            id.to_string(),
            ProblemModel {
                slope: None,
                intercept: None,
                variance: None,
                difficulty: Some(*difficulty),
                discrimination: Some(0.004),
                is_experimental: false,
            },
        )
    })
    .collect()
}

pub fn sample_rating_history() -> Vec<RatingHistoryEntry> {
    (0..10)
        .map(|i| RatingHistoryEntry {
            is_rated: true,
            place: 100,
            old_rating: 100 * i,
            new_rating: 100 * (i + 1) + 200,
            performance: 1200,
            contest_name: format!("AtCoder Beginner Contest {}", 100 + i),
            end_time: DateTime::parse_from_rfc3339("2018-06-16T22:40:00+09:00").unwrap(),
        })
        .collect()
}

pub fn sample_data() -> UserPageData {
    UserPageData {
        submissions: Arc::new(group_by_problem(sample_submissions())),
        rating_info: Arc::new(RatingInfo::from_history(&sample_rating_history())),
        merged_problems: Arc::new(sample_problems()),
        contests: Arc::new(sample_contests()),
        problem_models: Arc::new(sample_problem_models()),
        login_user: None,
    }
}
