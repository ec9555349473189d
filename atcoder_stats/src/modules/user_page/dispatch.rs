use super::tab::{UserPageTab, TAB_PARAM};
use serde::Serialize;

/// Content blocks of the user page.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    Achievement,
    AtCoderPieCharts,
    DifficultyPies,
    ProgressCharts,
    Submissions,
    Languages,
    Trophy,
    Recommendation,
}

impl Block {
    /// Order used when every block is shown.
    pub const ORDER: [Block; 8] = [
        Block::Achievement,
        Block::AtCoderPieCharts,
        Block::DifficultyPies,
        Block::ProgressCharts,
        Block::Submissions,
        Block::Languages,
        Block::Trophy,
        Block::Recommendation,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            Block::Achievement => "Achievement",
            Block::AtCoderPieCharts => "AtCoder Pie Charts",
            Block::DifficultyPies => "Difficulty Pies",
            Block::ProgressCharts => "Progress Charts",
            Block::Submissions => "Submissions",
            Block::Languages => "Languages",
            Block::Trophy => "Trophy [beta]",
            Block::Recommendation => "Recommendation",
        }
    }
}

impl UserPageTab {
    /// The single block behind a tab. `All` has none of its own.
    pub fn block(&self) -> Option<Block> {
        match self {
            UserPageTab::Achievement => Some(Block::Achievement),
            UserPageTab::AtCoderPieCharts => Some(Block::AtCoderPieCharts),
            UserPageTab::DifficultyPies => Some(Block::DifficultyPies),
            UserPageTab::ProgressCharts => Some(Block::ProgressCharts),
            UserPageTab::Submissions => Some(Block::Submissions),
            UserPageTab::Recommendation => Some(Block::Recommendation),
            UserPageTab::Languages => Some(Block::Languages),
            UserPageTab::Trophy => Some(Block::Trophy),
            UserPageTab::All => None,
        }
    }
}

pub fn blocks_for(tab: UserPageTab) -> Vec<Block> {
    match tab.block() {
        Some(block) => vec![block],
        None => Block::ORDER.to_vec(),
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub tab: UserPageTab,
    pub href: String,
    pub active: bool,
}

/// `path` with its query string changed only in the tab parameter.
///
/// The first existing tab parameter is replaced in place and any repeats are dropped;
/// otherwise the parameter is appended. Every other parameter keeps its position.
pub fn path_with_tab(path: &str, query: Option<&str>, tab: UserPageTab) -> String {
    let pairs: Vec<(String, String)> = query
        .and_then(|query| serde_urlencoded::from_str(query).ok())
        .unwrap_or_default();

    let mut replaced = false;
    let mut updated: Vec<(String, String)> = Vec::with_capacity(pairs.len() + 1);
    for (key, value) in pairs {
        if key == TAB_PARAM {
            if !replaced {
                updated.push((key, tab.label().to_string()));
                replaced = true;
            }
        } else {
            updated.push((key, value));
        }
    }
    if !replaced {
        updated.push((TAB_PARAM.to_string(), tab.label().to_string()));
    }

    let query = serde_urlencoded::to_string(&updated).unwrap_or_else(|e| {
        tracing::warn!("failed to encode query string: {}", e);
        String::new()
    });
    format!("{}?{}", path, query)
}

pub fn nav_links(path: &str, query: Option<&str>, active: UserPageTab) -> Vec<NavLink> {
    UserPageTab::TABS
        .iter()
        .map(|&tab| NavLink {
            tab,
            href: path_with_tab(path, query, tab),
            active: tab == active,
        })
        .collect()
}
