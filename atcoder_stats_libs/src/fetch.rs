use serde::Serialize;
use std::{fmt::Display, future::Future};
use tokio::time::{self, Instant};

/// Outcome of one asynchronous data source at the moment the page is assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Pending,
    Resolved(T),
    Failed(String),
}

/// Serializable label of a [`FetchState`], used for logging and the JSON view.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Pending,
    Resolved,
    Failed,
}

impl<T> FetchState<T> {
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => FetchState::Resolved(value),
            Err(e) => FetchState::Failed(e.to_string()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FetchState::Pending)
    }

    pub fn status(&self) -> FetchStatus {
        match self {
            FetchState::Pending => FetchStatus::Pending,
            FetchState::Resolved(_) => FetchStatus::Resolved,
            FetchState::Failed(_) => FetchStatus::Failed,
        }
    }

    pub fn resolved_or_else(self, default: impl FnOnce() -> T) -> T {
        match self {
            FetchState::Resolved(value) => value,
            FetchState::Pending | FetchState::Failed(_) => default(),
        }
    }

    pub fn resolved_or_default(self) -> T
    where
        T: Default,
    {
        self.resolved_or_else(T::default)
    }
}

/// Runs `future` on its own task and waits for it until `deadline`.
///
/// A future still running at the deadline is left detached: it keeps running to completion
/// (so it can still fill caches) but its output is discarded and the state is `Pending`.
pub async fn settle_until<F, T, E>(future: F, deadline: Instant) -> FetchState<T>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    let handle = tokio::spawn(future);
    match time::timeout_at(deadline, handle).await {
        Ok(Ok(result)) => FetchState::from_result(result),
        Ok(Err(e)) => FetchState::Failed(format!("fetch task aborted: {}", e)),
        Err(_) => FetchState::Pending,
    }
}
