use serde::Serialize;

/// Query parameter selecting the active tab.
pub const TAB_PARAM: &str = "userPageTab";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserPageTab {
    #[default]
    Achievement,
    #[serde(rename = "AtCoder Pie Charts")]
    AtCoderPieCharts,
    #[serde(rename = "Difficulty Pies")]
    DifficultyPies,
    #[serde(rename = "Progress Charts")]
    ProgressCharts,
    Submissions,
    Recommendation,
    Languages,
    Trophy,
    All,
}

impl UserPageTab {
    /// Tabs in navigation order.
    pub const TABS: [UserPageTab; 9] = [
        UserPageTab::Achievement,
        UserPageTab::AtCoderPieCharts,
        UserPageTab::DifficultyPies,
        UserPageTab::ProgressCharts,
        UserPageTab::Submissions,
        UserPageTab::Recommendation,
        UserPageTab::Languages,
        UserPageTab::Trophy,
        UserPageTab::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UserPageTab::Achievement => "Achievement",
            UserPageTab::AtCoderPieCharts => "AtCoder Pie Charts",
            UserPageTab::DifficultyPies => "Difficulty Pies",
            UserPageTab::ProgressCharts => "Progress Charts",
            UserPageTab::Submissions => "Submissions",
            UserPageTab::Recommendation => "Recommendation",
            UserPageTab::Languages => "Languages",
            UserPageTab::Trophy => "Trophy",
            UserPageTab::All => "All",
        }
    }

    /// Exact, case-sensitive match against the tab labels.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::TABS.into_iter().find(|tab| tab.label() == label)
    }

    /// Active tab for a raw query string. Missing, malformed or unknown values select the default.
    pub fn from_query(query: Option<&str>) -> Self {
        let pairs: Vec<(String, String)> = match query {
            Some(query) => serde_urlencoded::from_str(query).unwrap_or_else(|e| {
                tracing::debug!("ignoring malformed query string [{}]: {}", query, e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        pairs
            .iter()
            .find(|(key, _)| key == TAB_PARAM)
            .and_then(|(_, value)| Self::from_label(value))
            .unwrap_or_default()
    }
}
