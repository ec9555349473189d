use atcoder_stats_libs::{model::*, settle_until, CachedApiClient, FetchState, FetchStatus};
use serde::Serialize;
use std::sync::Arc;
use tokio::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    /// Bound for the submissions fetch. Past it the page shows the loading view.
    pub submissions: Duration,
    /// Bound for every other source. Past it the source renders as its empty default.
    pub sources: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            submissions: Duration::from_millis(10000),
            sources: Duration::from_millis(3000),
        }
    }
}

/// Every source of a user page as it stood when the deadlines passed.
#[derive(Debug)]
pub struct UserPageSources {
    pub submissions: FetchState<Arc<SubmissionMap>>,
    pub rating_info: FetchState<Arc<RatingInfo>>,
    pub merged_problems: FetchState<Arc<ProblemMap>>,
    pub contests: FetchState<Arc<ContestMap>>,
    pub problem_models: FetchState<Arc<ProblemModelMap>>,
    pub login_state: FetchState<Option<LoginUser>>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct SourceStatuses {
    pub submissions: FetchStatus,
    pub rating_info: FetchStatus,
    pub merged_problems: FetchStatus,
    pub contests: FetchStatus,
    pub problem_models: FetchStatus,
    pub login_state: FetchStatus,
}

/// Sources with every unresolved secondary value replaced by its default.
#[derive(Debug, Clone, Default)]
pub struct UserPageData {
    pub submissions: Arc<SubmissionMap>,
    pub rating_info: Arc<RatingInfo>,
    pub merged_problems: Arc<ProblemMap>,
    pub contests: Arc<ContestMap>,
    pub problem_models: Arc<ProblemModelMap>,
    pub login_user: Option<LoginUser>,
}

#[derive(Debug)]
pub enum Reconciled {
    /// The submissions are still being fetched.
    Loading,
    Ready(UserPageData),
}

impl UserPageSources {
    /// Starts all fetches at once and waits for each until its deadline.
    pub async fn fetch(
        client: Arc<CachedApiClient>,
        user_id: &str,
        cookie: Option<String>,
        deadlines: Deadlines,
    ) -> Self {
        let start = Instant::now();
        let submissions_deadline = start + deadlines.submissions;
        let sources_deadline = start + deadlines.sources;

        let (submissions, rating_info, merged_problems, contests, problem_models, login_state) = futures::join!(
            settle_until(
                {
                    let client = client.clone();
                    let user_id = user_id.to_string();
                    async move { client.submission_map(&user_id).await }
                },
                submissions_deadline,
            ),
            settle_until(
                {
                    let client = client.clone();
                    let user_id = user_id.to_string();
                    async move { client.rating_info(&user_id).await }
                },
                sources_deadline,
            ),
            settle_until(
                {
                    let client = client.clone();
                    async move { client.merged_problem_map().await }
                },
                sources_deadline,
            ),
            settle_until(
                {
                    let client = client.clone();
                    async move { client.contest_map().await }
                },
                sources_deadline,
            ),
            settle_until(
                {
                    let client = client.clone();
                    async move { client.problem_model_map().await }
                },
                sources_deadline,
            ),
            settle_until(
                {
                    let client = client.clone();
                    async move { client.login_state(cookie.as_deref()).await }
                },
                sources_deadline,
            ),
        );

        Self {
            submissions,
            rating_info,
            merged_problems,
            contests,
            problem_models,
            login_state,
        }
    }

    pub fn statuses(&self) -> SourceStatuses {
        SourceStatuses {
            submissions: self.submissions.status(),
            rating_info: self.rating_info.status(),
            merged_problems: self.merged_problems.status(),
            contests: self.contests.status(),
            problem_models: self.problem_models.status(),
            login_state: self.login_state.status(),
        }
    }

    /// Collapses the sources into page data. Only pending submissions hold the page back.
    pub fn reconcile(self) -> Reconciled {
        if self.submissions.is_pending() {
            return Reconciled::Loading;
        }

        Reconciled::Ready(UserPageData {
            submissions: resolved_or_default("submissions", self.submissions),
            rating_info: resolved_or_default("rating info", self.rating_info),
            merged_problems: resolved_or_default("merged problems", self.merged_problems),
            contests: resolved_or_default("contests", self.contests),
            problem_models: resolved_or_default("problem models", self.problem_models),
            login_user: resolved_or_default("login state", self.login_state),
        })
    }
}

fn resolved_or_default<T: Default>(source: &str, state: FetchState<T>) -> T {
    match &state {
        FetchState::Pending => {
            tracing::warn!("{} not resolved in time, using empty default", source)
        }
        FetchState::Failed(reason) => {
            tracing::warn!("failed to fetch {}, using empty default: {}", source, reason)
        }
        FetchState::Resolved(_) => {}
    }
    state.resolved_or_default()
}
