pub mod dispatch;
pub mod identity;
pub mod reconcile;
pub mod render;
pub mod tab;

use self::{
    dispatch::{blocks_for, nav_links, Block, NavLink},
    identity::{canonical_user_id, is_user_found},
    reconcile::{Deadlines, Reconciled, SourceStatuses, UserPageData, UserPageSources},
    tab::UserPageTab,
};
use crate::modules::stats::{
    self,
    achievement::{self, AchievementSummary},
    language::{self, LanguageCount},
    pie::{self, ContestPie, DifficultyPie},
    progress::{self, ProgressPoint},
    recommend::{self, Recommendations, RECOMMENDATION_LIMIT},
    trophy::{self, Trophy},
    SubmissionRow, SUBMISSION_LIST_LIMIT,
};
use atcoder_stats_libs::{
    model::{jst, RatingInfo, Submission},
    CachedApiClient,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::time::Instant;

/// Rendered content of one block.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "block", content = "data", rename_all = "snake_case")]
pub enum BlockView {
    Achievement(AchievementSummary),
    AtCoderPieCharts(Vec<ContestPie>),
    DifficultyPies(Vec<DifficultyPie>),
    ProgressCharts(Vec<ProgressPoint>),
    Submissions(Vec<SubmissionRow>),
    Languages(Vec<LanguageCount>),
    Trophy(Vec<Trophy>),
    Recommendation(Recommendations),
}

impl BlockView {
    pub fn block(&self) -> Block {
        match self {
            BlockView::Achievement(_) => Block::Achievement,
            BlockView::AtCoderPieCharts(_) => Block::AtCoderPieCharts,
            BlockView::DifficultyPies(_) => Block::DifficultyPies,
            BlockView::ProgressCharts(_) => Block::ProgressCharts,
            BlockView::Submissions(_) => Block::Submissions,
            BlockView::Languages(_) => Block::Languages,
            BlockView::Trophy(_) => Block::Trophy,
            BlockView::Recommendation(_) => Block::Recommendation,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Dashboard {
    pub user_id: String,
    pub requested_user_id: String,
    pub rating: RatingInfo,
    pub active_tab: UserPageTab,
    pub nav: Vec<NavLink>,
    pub blocks: Vec<BlockView>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UserPage {
    Loading { user_id: String },
    NotFound { user_id: String },
    Dashboard(Dashboard),
}

/// Where the page was requested from. Navigation links are built relative to it.
#[derive(Debug, Clone)]
pub struct PageLocation<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
}

/// Assembles the page from reconciled data. Pure apart from the `today` input.
pub fn build_page(
    user_id: &str,
    data: &UserPageData,
    location: &PageLocation,
    today: NaiveDate,
) -> UserPage {
    if !is_user_found(&data.submissions, user_id) {
        return UserPage::NotFound {
            user_id: user_id.to_string(),
        };
    }

    let active_tab = UserPageTab::from_query(location.query);
    let user_submissions = stats::user_submissions(&data.submissions, user_id);

    let blocks = blocks_for(active_tab)
        .into_iter()
        .map(|block| build_block(block, &user_submissions, data, today))
        .collect();

    UserPage::Dashboard(Dashboard {
        user_id: canonical_user_id(&data.submissions, user_id).to_string(),
        requested_user_id: user_id.to_string(),
        rating: (*data.rating_info).clone(),
        active_tab,
        nav: nav_links(location.path, location.query, active_tab),
        blocks,
    })
}

fn build_block(
    block: Block,
    submissions: &[&Submission],
    data: &UserPageData,
    today: NaiveDate,
) -> BlockView {
    match block {
        Block::Achievement => BlockView::Achievement(achievement::summarize(
            submissions,
            &data.contests,
            &data.rating_info,
            today,
        )),
        Block::AtCoderPieCharts => {
            BlockView::AtCoderPieCharts(pie::contest_pies(submissions, &data.merged_problems))
        }
        Block::DifficultyPies => BlockView::DifficultyPies(pie::difficulty_pies(
            submissions,
            &data.merged_problems,
            &data.problem_models,
        )),
        Block::ProgressCharts => {
            BlockView::ProgressCharts(progress::cumulative_accepted(submissions))
        }
        Block::Submissions => BlockView::Submissions(stats::recent_submissions(
            submissions,
            &data.merged_problems,
            SUBMISSION_LIST_LIMIT,
        )),
        Block::Languages => BlockView::Languages(language::count_by_language(submissions)),
        Block::Trophy => {
            let summary =
                achievement::summarize(submissions, &data.contests, &data.rating_info, today);
            let pies = pie::contest_pies(submissions, &data.merged_problems);
            BlockView::Trophy(trophy::achieved_trophies(&summary, &pies))
        }
        Block::Recommendation => BlockView::Recommendation(recommend::recommend(
            &stats::solved_problem_ids(submissions),
            &data.merged_problems,
            &data.problem_models,
            &data.rating_info,
            data.login_user.is_some(),
            RECOMMENDATION_LIMIT,
        )),
    }
}

pub struct UserPageService {
    client: Arc<CachedApiClient>,
    deadlines: Deadlines,
}

impl UserPageService {
    pub fn new(client: Arc<CachedApiClient>, deadlines: Deadlines) -> Self {
        Self { client, deadlines }
    }

    pub fn client(&self) -> &Arc<CachedApiClient> {
        &self.client
    }

    pub async fn build(
        &self,
        user_id: &str,
        location: &PageLocation<'_>,
        cookie: Option<String>,
    ) -> UserPage {
        let start_process = Instant::now();

        let sources =
            UserPageSources::fetch(self.client.clone(), user_id, cookie, self.deadlines).await;
        let statuses: SourceStatuses = sources.statuses();

        let page = match sources.reconcile() {
            Reconciled::Loading => UserPage::Loading {
                user_id: user_id.to_string(),
            },
            Reconciled::Ready(data) => {
                let today = Utc::now().with_timezone(&jst()).date_naive();
                build_page(user_id, &data, location, today)
            }
        };

        let time: u32 = Instant::now().duration_since(start_process).as_millis() as u32;
        tracing::info!(
            target: "pagelog",
            "elapsed_time={} user={} query={} sources={}",
            time,
            user_id,
            location.query.unwrap_or(""),
            serde_json::to_string(&statuses).unwrap_or(String::from(""))
        );

        page
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::modules::fixtures::{sample_data, sample_submissions};
    use atcoder_stats_libs::model::{group_by_problem, LoginUser, SubmissionMap};

    fn location(query: Option<&str>) -> PageLocation {
        PageLocation {
            path: "/user/abc",
            query,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 9, 20).unwrap()
    }

    fn dashboard(page: UserPage) -> Dashboard {
        match page {
            UserPage::Dashboard(dashboard) => dashboard,
            other => panic!("expected dashboard, got {:?}", other),
        }
    }

    #[test]
    fn test_canonical_id_is_displayed() {
        let data = sample_data();
        let page = dashboard(build_page("abc", &data, &location(None), today()));

        assert_eq!(page.user_id, "ABC");
        assert_eq!(page.requested_user_id, "abc");
    }

    #[test]
    fn test_default_tab_renders_only_achievement() {
        let data = sample_data();
        let page = dashboard(build_page("abc", &data, &location(None), today()));

        assert_eq!(page.active_tab, UserPageTab::Achievement);
        assert_eq!(page.blocks.len(), 1);
        match &page.blocks[0] {
            BlockView::Achievement(summary) => assert_eq!(summary.accepted_count, 3),
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tab_falls_back_to_achievement() {
        let data = sample_data();
        let page = dashboard(build_page(
            "abc",
            &data,
            &location(Some("userPageTab=Nope")),
            today(),
        ));

        assert_eq!(page.active_tab, UserPageTab::Achievement);
        assert_eq!(page.blocks[0].block(), Block::Achievement);
    }

    #[test]
    fn test_all_tab_renders_every_block_in_order() {
        let data = sample_data();
        let page = dashboard(build_page(
            "abc",
            &data,
            &location(Some("userPageTab=All")),
            today(),
        ));

        let blocks: Vec<Block> = page.blocks.iter().map(|b| b.block()).collect();
        assert_eq!(blocks, Block::ORDER.to_vec());
    }

    #[test]
    fn test_empty_submissions_is_not_found() {
        let data = UserPageData::default();
        let page = build_page("abc", &data, &location(Some("userPageTab=All")), today());

        assert_eq!(
            page,
            UserPage::NotFound {
                user_id: String::from("abc")
            }
        );
    }

    #[test]
    fn test_empty_user_id_is_not_found() {
        let data = sample_data();
        let page = build_page("", &data, &location(None), today());

        assert!(matches!(page, UserPage::NotFound { .. }));
    }

    #[test]
    fn test_missing_secondary_sources_render_empty_blocks() {
        let data = UserPageData {
            submissions: Arc::new(group_by_problem(sample_submissions())),
            ..Default::default()
        };
        let page = dashboard(build_page(
            "abc",
            &data,
            &location(Some("userPageTab=All")),
            today(),
        ));

        assert_eq!(page.blocks.len(), Block::ORDER.len());
        match &page.blocks[7] {
            BlockView::Recommendation(recommendations) => {
                assert!(recommendations.problems.is_empty());
                assert!(!recommendations.can_create_virtual_contest);
            }
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_login_enables_virtual_contest() {
        let data = UserPageData {
            login_user: Some(LoginUser {
                internal_user_id: String::from("1"),
                atcoder_user_id: Some(String::from("ABC")),
            }),
            ..sample_data()
        };
        let page = dashboard(build_page(
            "abc",
            &data,
            &location(Some("userPageTab=Recommendation")),
            today(),
        ));

        match &page.blocks[0] {
            BlockView::Recommendation(recommendations) => {
                assert!(recommendations.can_create_virtual_contest);
                assert!(!recommendations.problems.is_empty());
                assert!(recommendations
                    .problems
                    .iter()
                    .all(|p| p.id != "abc100_a"));
            }
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_serialize_page() {
        let page = build_page(
            "abc",
            &UserPageData {
                submissions: Arc::new(SubmissionMap::new()),
                ..Default::default()
            },
            &location(None),
            today(),
        );
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["status"], "not_found");
        assert_eq!(json["user_id"], "abc");
    }
}
