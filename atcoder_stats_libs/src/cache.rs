use crate::{
    client::{ApiClientError, AtCoderProblemsApi, Result},
    model::*,
};
use std::{collections::HashMap, future::Future, hash::Hash, sync::Arc};
use tokio::{
    sync::{OnceCell, RwLock},
    time::{Duration, Instant},
};

type Slot<V> = Arc<OnceCell<(Instant, Arc<V>)>>;

/// Map of values that expire `ttl` after they were stored.
///
/// Each key owns one slot. A slot that is still being filled is shared, so callers arriving
/// while a fetch runs wait for that fetch instead of starting their own.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Slot<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn is_expired(&self, slot: &Slot<V>) -> bool {
        slot.get()
            .map(|(stored_at, _)| stored_at.elapsed() >= self.ttl)
            .unwrap_or(false)
    }

    /// Live slot for `key`, replacing an expired one.
    async fn slot(&self, key: &K) -> Slot<V> {
        {
            let entries = self.entries.read().await;
            if let Some(slot) = entries.get(key) {
                if !self.is_expired(slot) {
                    return slot.clone();
                }
            }
        }

        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(slot) if !self.is_expired(slot) => slot.clone(),
            _ => {
                let slot: Slot<V> = Arc::new(OnceCell::new());
                entries.insert(key.clone(), slot.clone());
                slot
            }
        }
    }

    pub async fn get(&self, key: &K) -> Option<Arc<V>> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|slot| !self.is_expired(slot))
            .and_then(|slot| slot.get())
            .map(|(_, value)| value.clone())
    }

    pub async fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        let slot = Arc::new(OnceCell::new_with(Some((Instant::now(), value.clone()))));
        let mut entries = self.entries.write().await;
        entries.insert(key, slot);
        value
    }

    /// Returns the cached value or runs `fetch` and stores its output.
    ///
    /// Only one `fetch` per key runs at a time; concurrent callers wait for it. Errors are not
    /// cached: the slot stays empty and the next caller fetches again.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: K,
        fetch: F,
    ) -> std::result::Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        let slot = self.slot(&key).await;
        let (_, value) = slot
            .get_or_try_init(|| async move {
                let value = fetch().await?;
                Ok::<_, E>((Instant::now(), Arc::new(value)))
            })
            .await?;
        Ok(value.clone())
    }

    /// Drops expired values and empty slots nobody is waiting on.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, slot| {
            if slot.initialized() {
                !self.is_expired(slot)
            } else {
                Arc::strong_count(slot) > 1
            }
        });
        before - entries.len()
    }

    /// Number of stored values.
    pub async fn len(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }
}

/// Caching facade over an [`AtCoderProblemsApi`], handing out keyed maps of each source.
///
/// Catalog sources are shared between users; submissions and rating info are cached per
/// requested user id. The login state depends on the caller's session and is never cached.
pub struct CachedApiClient {
    api: Arc<dyn AtCoderProblemsApi>,
    submissions: TtlCache<String, SubmissionMap>,
    rating_info: TtlCache<String, RatingInfo>,
    merged_problems: TtlCache<(), ProblemMap>,
    contests: TtlCache<(), ContestMap>,
    problem_models: TtlCache<(), ProblemModelMap>,
}

impl CachedApiClient {
    pub fn new(api: Arc<dyn AtCoderProblemsApi>, ttl: Duration) -> Self {
        Self {
            api,
            submissions: TtlCache::new(ttl),
            rating_info: TtlCache::new(ttl),
            merged_problems: TtlCache::new(ttl),
            contests: TtlCache::new(ttl),
            problem_models: TtlCache::new(ttl),
        }
    }

    pub async fn submission_map(&self, user_id: &str) -> Result<Arc<SubmissionMap>> {
        self.submissions
            .get_or_try_insert_with(user_id.to_string(), || async {
                let submissions = self.api.submissions(user_id).await?;
                tracing::info!(
                    "{} submissions of {} retrieved.",
                    submissions.len(),
                    user_id
                );
                Ok::<_, ApiClientError>(group_by_problem(submissions))
            })
            .await
    }

    pub async fn rating_info(&self, user_id: &str) -> Result<Arc<RatingInfo>> {
        self.rating_info
            .get_or_try_insert_with(user_id.to_string(), || async {
                let history = self.api.rating_history(user_id).await?;
                Ok::<_, ApiClientError>(RatingInfo::from_history(&history))
            })
            .await
    }

    pub async fn merged_problem_map(&self) -> Result<Arc<ProblemMap>> {
        self.merged_problems
            .get_or_try_insert_with((), || async {
                let problems = self.api.merged_problems().await?;
                tracing::info!("{} problems retrieved.", problems.len());
                Ok::<_, ApiClientError>(
                    problems
                        .into_iter()
                        .map(|problem| (problem.id.clone(), problem))
                        .collect(),
                )
            })
            .await
    }

    pub async fn contest_map(&self) -> Result<Arc<ContestMap>> {
        self.contests
            .get_or_try_insert_with((), || async {
                let contests = self.api.contests().await?;
                tracing::info!("{} contests retrieved.", contests.len());
                Ok::<_, ApiClientError>(
                    contests
                        .into_iter()
                        .map(|contest| (contest.id.clone(), contest))
                        .collect(),
                )
            })
            .await
    }

    pub async fn problem_model_map(&self) -> Result<Arc<ProblemModelMap>> {
        self.problem_models
            .get_or_try_insert_with((), || async { self.api.problem_models().await })
            .await
    }

    pub async fn login_state(&self, cookie: Option<&str>) -> Result<Option<LoginUser>> {
        self.api.login_state(cookie).await
    }

    pub async fn purge_expired(&self) -> usize {
        self.submissions.purge_expired().await
            + self.rating_info.purge_expired().await
            + self.merged_problems.purge_expired().await
            + self.contests.purge_expired().await
            + self.problem_models.purge_expired().await
    }
}
