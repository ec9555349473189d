use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::{BTreeMap, HashMap};

pub type ProblemId = String;
pub type ContestId = String;

/// Submissions grouped by problem id.
pub type SubmissionMap = BTreeMap<ProblemId, Vec<Submission>>;
pub type ProblemMap = BTreeMap<ProblemId, MergedProblem>;
pub type ContestMap = BTreeMap<ContestId, Contest>;
pub type ProblemModelMap = HashMap<ProblemId, ProblemModel>;

/// Start of AGC001. Contests before this are never counted as rated.
pub const RATED_SINCE_EPOCH_SECOND: i64 = 1468670400;

/// AtCoder reports dates in JST.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

pub fn to_jst_date(epoch_second: i64) -> Option<NaiveDate> {
    jst()
        .timestamp_opt(epoch_second, 0)
        .single()
        .map(|datetime| datetime.date_naive())
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Submission {
    pub id: i64,
    pub epoch_second: i64,
    pub problem_id: ProblemId,
    pub contest_id: ContestId,
    pub user_id: String,
    pub language: String,
    pub point: f64,
    pub length: i64,
    pub result: String,
    pub execution_time: Option<i64>,
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        self.result == "AC"
    }

    pub fn date(&self) -> Option<NaiveDate> {
        to_jst_date(self.epoch_second)
    }
}

/// Groups a flat submission list by problem id, keeping upstream order inside each group.
pub fn group_by_problem(submissions: Vec<Submission>) -> SubmissionMap {
    let mut map = SubmissionMap::new();
    for submission in submissions {
        map.entry(submission.problem_id.clone())
            .or_insert_with(Vec::new)
            .push(submission);
    }
    map
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MergedProblem {
    pub id: ProblemId,
    pub contest_id: ContestId,
    #[serde(default)]
    pub problem_index: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub title: String,
    #[serde(default)]
    pub point: Option<f64>,
    #[serde(default)]
    pub solver_count: Option<u32>,
}

impl MergedProblem {
    /// Problem letter such as `A` or `Ex`. Old catalog entries carry it only as a title prefix.
    pub fn index(&self) -> String {
        match &self.problem_index {
            Some(index) => index.clone(),
            None => self
                .title
                .split_once(". ")
                .map(|(index, _)| index.to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Contest {
    pub id: ContestId,
    pub start_epoch_second: i64,
    pub duration_second: i64,
    pub title: String,
    pub rate_change: String,
}

impl Contest {
    pub fn is_rated(&self) -> bool {
        self.rate_change != "-" && self.start_epoch_second >= RATED_SINCE_EPOCH_SECOND
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ProblemModel {
    pub slope: Option<f64>,
    pub intercept: Option<f64>,
    pub variance: Option<f64>,
    pub difficulty: Option<i32>,
    pub discrimination: Option<f64>,
    #[serde(default)]
    pub is_experimental: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RatingHistoryEntry {
    #[serde(alias = "IsRated")]
    pub is_rated: bool,
    #[serde(alias = "Place")]
    pub place: u32,
    #[serde(alias = "OldRating")]
    pub old_rating: i32,
    #[serde(alias = "NewRating")]
    pub new_rating: i32,
    #[serde(alias = "Performance")]
    pub performance: i32,
    #[serde(alias = "ContestName")]
    pub contest_name: String,
    #[serde(alias = "EndTime")]
    pub end_time: DateTime<FixedOffset>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RatingInfo {
    pub rating: i32,
    pub participation_count: u32,
    pub internal_rating: Option<f64>,
}

impl RatingInfo {
    pub fn from_history(history: &[RatingHistoryEntry]) -> Self {
        let rated: Vec<&RatingHistoryEntry> = history.iter().filter(|h| h.is_rated).collect();
        let rating = rated.last().map(|h| h.new_rating).unwrap_or(0);
        let participation_count = rated.len() as u32;

        Self {
            rating,
            participation_count,
            internal_rating: internal_rating(rating, participation_count),
        }
    }
}

impl Default for RatingInfo {
    fn default() -> Self {
        Self::from_history(&[])
    }
}

/// Undoes the low-rating compression and the participation penalty of the displayed rating.
pub fn internal_rating(rating: i32, participation_count: u32) -> Option<f64> {
    if rating <= 0 || participation_count == 0 {
        return None;
    }

    let rating = rating as f64;
    let base = if rating <= 400.0 {
        400.0 * (1.0 - (400.0 / rating).ln())
    } else {
        rating
    };

    let n = participation_count as i32;
    let adjustment = ((1.0 - 0.81f64.powi(n)).sqrt() / (1.0 - 0.9f64.powi(n)) - 1.0)
        / (19.0f64.sqrt() - 1.0)
        * 1200.0;

    Some(base + adjustment)
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LoginUser {
    pub internal_user_id: String,
    pub atcoder_user_id: Option<String>,
}
