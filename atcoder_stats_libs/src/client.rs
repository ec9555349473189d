use crate::model::*;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{self, header::COOKIE, Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiClientError>;

/// The v3 submissions API returns at most this many rows per request.
pub const SUBMISSION_PAGE_SIZE: usize = 500;

pub const DEFAULT_BASE_URL: &str = "https://kenkoooo.com/atcoder/";

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("failed to request to AtCoder Problems")]
    RequestError(#[from] reqwest::Error),
    #[error("failed to deserialize JSON data")]
    DeserializeError(#[from] serde_json::Error),
    #[error("invalid AtCoder Problems url given")]
    InvalidUrlError(#[from] url::ParseError),
    #[error("unexpected status {0} from {1}")]
    UnexpectedStatus(StatusCode, String),
}

/// Raw access to the AtCoder Problems endpoints a user page depends on.
#[async_trait]
pub trait AtCoderProblemsApi: Send + Sync {
    async fn submissions(&self, user_id: &str) -> Result<Vec<Submission>>;
    async fn merged_problems(&self) -> Result<Vec<MergedProblem>>;
    async fn contests(&self) -> Result<Vec<Contest>>;
    async fn problem_models(&self) -> Result<ProblemModelMap>;
    async fn rating_history(&self, user_id: &str) -> Result<Vec<RatingHistoryEntry>>;
    /// Resolves the session carried by `cookie`. `None` means not logged in.
    async fn login_state(&self, cookie: Option<&str>) -> Result<Option<LoginUser>>;
}

pub struct KenkooooClient {
    submissions_url: Url,
    merged_problems_url: Url,
    contests_url: Url,
    problem_models_url: Url,
    login_url: Url,
    base_url: Url,
    client: Client,
}

impl KenkooooClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let submissions_url = base_url.join("atcoder-api/v3/user/submissions")?;
        let merged_problems_url = base_url.join("resources/merged-problems.json")?;
        let contests_url = base_url.join("resources/contests.json")?;
        let problem_models_url = base_url.join("resources/problem-models.json")?;
        let login_url = base_url.join("internal-api/user/get")?;

        let client = Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(KenkooooClient {
            submissions_url,
            merged_problems_url,
            contests_url,
            problem_models_url,
            login_url,
            base_url,
            client,
        })
    }

    fn rating_history_url(&self, user_id: &str) -> Result<Url> {
        let user = utf8_percent_encode(user_id, NON_ALPHANUMERIC).to_string();
        let url = self
            .base_url
            .join(&format!("proxy/users/{}/history/json", user))?;
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let res = self.client.get(url.clone()).send().await?;
        match res.error_for_status_ref() {
            Ok(_) => {
                let bytes = res.bytes().await?;
                let body: T = serde_json::from_slice(&bytes)?;
                Ok(body)
            }
            Err(_) => Err(ApiClientError::UnexpectedStatus(
                res.status(),
                url.to_string(),
            )),
        }
    }
}

#[async_trait]
impl AtCoderProblemsApi for KenkooooClient {
    async fn submissions(&self, user_id: &str) -> Result<Vec<Submission>> {
        let mut submissions: Vec<Submission> = Vec::new();
        let mut from_second: i64 = 0;

        loop {
            let mut url = self.submissions_url.clone();
            url.query_pairs_mut()
                .append_pair("user", user_id)
                .append_pair("from_second", &from_second.to_string());

            let page: Vec<Submission> = self.get_json(url).await?;
            let count = page.len();
            if let Some(last) = page.iter().map(|s| s.epoch_second).max() {
                from_second = last + 1;
            }
            submissions.extend(page);

            if count < SUBMISSION_PAGE_SIZE {
                break;
            }
            tracing::debug!(
                "{} submissions of {} retrieved so far",
                submissions.len(),
                user_id
            );
        }

        Ok(submissions)
    }

    async fn merged_problems(&self) -> Result<Vec<MergedProblem>> {
        self.get_json(self.merged_problems_url.clone()).await
    }

    async fn contests(&self) -> Result<Vec<Contest>> {
        self.get_json(self.contests_url.clone()).await
    }

    async fn problem_models(&self) -> Result<ProblemModelMap> {
        self.get_json(self.problem_models_url.clone()).await
    }

    async fn rating_history(&self, user_id: &str) -> Result<Vec<RatingHistoryEntry>> {
        let url = self.rating_history_url(user_id)?;
        self.get_json(url).await
    }

    async fn login_state(&self, cookie: Option<&str>) -> Result<Option<LoginUser>> {
        let cookie = match cookie {
            Some(cookie) if !cookie.is_empty() => cookie,
            _ => return Ok(None),
        };

        let res = self
            .client
            .get(self.login_url.clone())
            .header(COOKIE, cookie)
            .send()
            .await?;
        match res.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let bytes = res.bytes().await?;
                let user: LoginUser = serde_json::from_slice(&bytes)?;
                Ok(Some(user))
            }
            status => Err(ApiClientError::UnexpectedStatus(
                status,
                self.login_url.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn create_new_client() {
        let client = KenkooooClient::new("https://kenkoooo.com/atcoder").unwrap();

        assert_eq!(
            client.submissions_url,
            Url::parse("https://kenkoooo.com/atcoder/atcoder-api/v3/user/submissions").unwrap()
        );
        assert_eq!(
            client.merged_problems_url,
            Url::parse("https://kenkoooo.com/atcoder/resources/merged-problems.json").unwrap()
        );
        assert_eq!(
            client.problem_models_url,
            Url::parse("https://kenkoooo.com/atcoder/resources/problem-models.json").unwrap()
        );
        assert_eq!(
            client.login_url,
            Url::parse("https://kenkoooo.com/atcoder/internal-api/user/get").unwrap()
        );
    }

    #[test]
    fn test_rating_history_url_encodes_user() {
        let client = KenkooooClient::new(DEFAULT_BASE_URL).unwrap();
        let url = client.rating_history_url("a/b").unwrap();

        assert_eq!(
            url.as_str(),
            "https://kenkoooo.com/atcoder/proxy/users/a%2Fb/history/json"
        );
    }

    #[tokio::test]
    async fn test_login_state_without_cookie() {
        let client = KenkooooClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(client.login_state(None).await.unwrap(), None);
        assert_eq!(client.login_state(Some("")).await.unwrap(), None);
    }

    /// Normal system test against the public AtCoder Problems API.
    ///
    /// Needs network access.
    #[tokio::test]
    #[ignore]
    async fn test_fetch_contests() {
        let client = KenkooooClient::new(DEFAULT_BASE_URL).unwrap();
        let contests = client.contests().await.unwrap();

        assert!(contests.iter().any(|contest| contest.id == "abc001"));
    }

    /// Normal system test against the public AtCoder Problems API.
    ///
    /// Needs network access.
    #[tokio::test]
    #[ignore]
    async fn test_fetch_submissions() {
        let client = KenkooooClient::new(DEFAULT_BASE_URL).unwrap();
        let submissions = client.submissions("chokudai").await.unwrap();

        assert!(!submissions.is_empty());
        assert!(submissions
            .iter()
            .all(|s| s.user_id.eq_ignore_ascii_case("chokudai")));
    }
}
