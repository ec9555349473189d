use super::{dispatch::NavLink, BlockView, Dashboard, UserPage};
use crate::modules::{
    stats::{
        achievement::AchievementSummary,
        language::LanguageCount,
        pie::{ContestPie, DifficultyPie},
        progress::ProgressPoint,
        recommend::Recommendations,
        trophy::Trophy,
        SubmissionRow,
    },
    utils::rate_to_color,
};
use atcoder_stats_libs::model::RatingInfo;
use html_escape::{encode_double_quoted_attribute, encode_text};
use minify_html::{minify, Cfg};

/// Seconds before the loading page asks the browser to retry.
pub const LOADING_REFRESH_SECONDS: u32 = 2;

pub fn render_page(page: &UserPage) -> String {
    match page {
        UserPage::Loading { user_id } => DOCUMENT_HTML
            .replace("{{HEAD}}", &format!(
                r#"<meta http-equiv="refresh" content="{}">"#,
                LOADING_REFRESH_SECONDS
            ))
            .replace("{{TITLE}}", &encode_text(user_id))
            .replace("{{BODY}}", LOADING_HTML),
        UserPage::NotFound { user_id } => DOCUMENT_HTML
            .replace("{{HEAD}}", "")
            .replace("{{TITLE}}", &encode_text(user_id))
            .replace("{{BODY}}", NOT_FOUND_HTML),
        UserPage::Dashboard(dashboard) => DOCUMENT_HTML
            .replace("{{HEAD}}", "")
            .replace("{{TITLE}}", &encode_text(&dashboard.user_id))
            .replace("{{BODY}}", &render_dashboard(dashboard)),
    }
}

pub fn minify_page(html: &str) -> String {
    let config = Cfg {
        do_not_minify_doctype: true,
        ensure_spec_compliant_unquoted_attribute_values: false,
        keep_closing_tags: true,
        keep_html_and_head_opening_tags: false,
        keep_spaces_between_attributes: false,
        keep_comments: false,
        minify_css: true,
        minify_js: true,
        remove_bangs: false,
        remove_processing_instructions: false,
        minify_css_level_1: true,
        minify_css_level_2: false,
        minify_css_level_3: false,
    };

    match String::from_utf8(minify(html.as_bytes(), &config)) {
        Ok(minified) => minified,
        Err(e) => {
            tracing::warn!("minified page is not valid UTF-8, serving it as is: {}", e);
            html.to_string()
        }
    }
}

fn render_dashboard(dashboard: &Dashboard) -> String {
    let blocks: String = dashboard
        .blocks
        .iter()
        .map(|block| {
            let heading = block.block().heading();
            BLOCK_HTML
                .replace("{{HEADING}}", &encode_text(heading))
                .replace("{{CONTENT}}", &render_block(block))
        })
        .collect();

    DASHBOARD_HTML
        .replace("{{USER}}", &render_user_label(&dashboard.user_id, &dashboard.rating))
        .replace("{{NAV}}", &render_nav(&dashboard.nav))
        .replace("{{BLOCKS}}", &blocks)
}

fn render_user_label(user_id: &str, rating: &RatingInfo) -> String {
    let color = if rating.participation_count == 0 {
        String::from("black")
    } else {
        rate_to_color(rating.rating)
    };
    format!(
        r#"<h1 class="user-{}">{}</h1><p>Rating: {}</p>"#,
        color,
        encode_text(user_id),
        rating.rating
    )
}

fn render_nav(links: &[NavLink]) -> String {
    links
        .iter()
        .map(|link| {
            format!(
                r#"<li class="nav-item"><a class="{}" href="{}">{}</a></li>"#,
                if link.active {
                    "nav-link active"
                } else {
                    "nav-link"
                },
                encode_double_quoted_attribute(&link.href),
                encode_text(link.tab.label())
            )
        })
        .collect()
}

fn render_block(block: &BlockView) -> String {
    match block {
        BlockView::Achievement(summary) => render_achievement(summary),
        BlockView::AtCoderPieCharts(pies) => render_contest_pies(pies),
        BlockView::DifficultyPies(pies) => render_difficulty_pies(pies),
        BlockView::ProgressCharts(points) => render_progress(points),
        BlockView::Submissions(rows) => render_submissions(rows),
        BlockView::Languages(counts) => render_languages(counts),
        BlockView::Trophy(trophies) => render_trophies(trophies),
        BlockView::Recommendation(recommendations) => render_recommendations(recommendations),
    }
}

fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let head: String = headers
        .iter()
        .map(|header| format!("<th>{}</th>", encode_text(header)))
        .collect();
    let body: String = rows
        .into_iter()
        .map(|row| {
            let cells: String = row.iter().map(|cell| format!("<td>{}</td>", cell)).collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();
    format!(
        r#"<table class="table table-sm"><thead><tr>{}</tr></thead><tbody>{}</tbody></table>"#,
        head, body
    )
}

fn problem_link(contest_id: &str, problem_id: &str, text: &str) -> String {
    let url = format!(
        "https://atcoder.jp/contests/{}/tasks/{}",
        contest_id, problem_id
    );
    format!(
        r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
        encode_double_quoted_attribute(&url),
        encode_text(text)
    )
}

fn render_achievement(summary: &AchievementSummary) -> String {
    let last = summary
        .last_accepted_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| String::from("-"));
    table(
        &["Statistic", "Value"],
        vec![
            vec![String::from("Accepted"), summary.accepted_count.to_string()],
            vec![
                String::from("Rated Point Sum"),
                format!("{}", summary.rated_point_sum),
            ],
            vec![
                String::from("Longest Streak"),
                format!("{} days", summary.longest_streak),
            ],
            vec![
                String::from("Current Streak"),
                format!("{} days", summary.current_streak),
            ],
            vec![String::from("Last AC"), last],
            vec![
                String::from("Rated Matches"),
                summary.participation_count.to_string(),
            ],
        ],
    )
}

fn render_contest_pies(pies: &[ContestPie]) -> String {
    pies.iter()
        .map(|pie| {
            let rows = pie
                .slices
                .iter()
                .map(|slice| {
                    vec![
                        encode_text(&slice.label).to_string(),
                        slice.solved.to_string(),
                        slice.rejected.to_string(),
                        slice.untried.to_string(),
                    ]
                })
                .collect();
            format!(
                "<h2>{}</h2>{}",
                encode_text(&pie.series),
                table(&["Problem", "Accepted", "Trying", "Untried"], rows)
            )
        })
        .collect()
}

fn render_difficulty_pies(pies: &[DifficultyPie]) -> String {
    let rows = pies
        .iter()
        .map(|pie| {
            vec![
                format!(r#"<span class="difficulty-{}">{}</span>"#, pie.color, pie.color),
                pie.solved.to_string(),
                pie.total.to_string(),
            ]
        })
        .collect();
    table(&["Color", "Solved", "Total"], rows)
}

fn render_progress(points: &[ProgressPoint]) -> String {
    let rows = points
        .iter()
        .map(|point| vec![point.date.to_string(), point.accepted_count.to_string()])
        .collect();
    table(&["Date", "Accepted"], rows)
}

fn render_submissions(rows: &[SubmissionRow]) -> String {
    let rows = rows
        .iter()
        .map(|row| {
            let title = row.problem_title.as_deref().unwrap_or(&row.problem_id);
            vec![
                row.date.map(|date| date.to_string()).unwrap_or_default(),
                problem_link(&row.contest_id, &row.problem_id, title),
                encode_text(&row.language).to_string(),
                encode_text(&row.result).to_string(),
                format!("{}", row.point),
                row.length.to_string(),
                row.execution_time
                    .map(|time| format!("{} ms", time))
                    .unwrap_or_default(),
            ]
        })
        .collect();
    table(
        &["Date", "Problem", "Language", "Result", "Score", "Length", "Time"],
        rows,
    )
}

fn render_languages(counts: &[LanguageCount]) -> String {
    let rows = counts
        .iter()
        .map(|count| {
            vec![
                encode_text(&count.language).to_string(),
                count.accepted_count.to_string(),
                count
                    .last_accepted_date
                    .map(|date| date.to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    table(&["Language", "Accepted", "Last AC"], rows)
}

fn render_trophies(trophies: &[Trophy]) -> String {
    if trophies.is_empty() {
        return String::from("<p>No trophies yet.</p>");
    }
    let items: String = trophies
        .iter()
        .map(|trophy| {
            format!(
                "<li><strong>{}</strong> {}</li>",
                encode_text(&trophy.title),
                encode_text(&trophy.reason)
            )
        })
        .collect();
    format!(r#"<ul class="trophies">{}</ul>"#, items)
}

fn render_recommendations(recommendations: &Recommendations) -> String {
    let rows = recommendations
        .problems
        .iter()
        .map(|problem| {
            vec![
                problem_link(&problem.contest_id, &problem.id, &problem.title),
                problem
                    .difficulty
                    .map(|difficulty| difficulty.to_string())
                    .unwrap_or_default(),
                format!("{:.1}%", problem.solve_probability * 100.0),
            ]
        })
        .collect();

    let create_link = if recommendations.can_create_virtual_contest {
        r#"<p><a class="btn btn-secondary" href="/contest/create">Create Virtual Contest</a></p>"#
    } else {
        ""
    };
    format!(
        "{}{}",
        table(&["Problem", "Difficulty", "Solve Probability"], rows),
        create_link
    )
}

const DOCUMENT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  {{HEAD}}
  <title>{{TITLE}} - AtCoder Stats</title>
  <style>
    body { font-family: sans-serif; margin: 0 auto; max-width: 1140px; padding: 0 16px; }
    .nav-tabs { display: flex; flex-wrap: wrap; list-style: none; padding: 0; border-bottom: 1px solid #dee2e6; }
    .nav-link { display: block; padding: 8px 16px; text-decoration: none; }
    .nav-link.active { border: 1px solid #dee2e6; border-bottom-color: #fff; }
    .border-bottom { border-bottom: 1px solid #dee2e6; }
    .alert-danger { color: #721c24; background-color: #f8d7da; padding: 12px 20px; }
    .spinner { width: 3rem; height: 3rem; border: 0.25em solid currentColor; border-right-color: transparent; border-radius: 50%; animation: spin 0.75s linear infinite; }
    @keyframes spin { to { transform: rotate(360deg); } }
    .table td, .table th { padding: 4px 8px; border-top: 1px solid #dee2e6; }
    .user-gray { color: #808080; } .user-brown { color: #804000; } .user-green { color: #008000; }
    .user-cyan { color: #00c0c0; } .user-blue { color: #0000ff; } .user-yellow { color: #c0c000; }
    .user-orange { color: #ff8000; } .user-red, .user-silver, .user-gold { color: #ff0000; }
  </style>
</head>
<body>
{{BODY}}
</body>
</html>
"#;

const LOADING_HTML: &str = r#"<div class="spinner" role="status"><span class="sr-only">Loading...</span></div>"#;

const NOT_FOUND_HTML: &str = r#"<div class="alert alert-danger" role="alert">User not found!</div>"#;

const DASHBOARD_HTML: &str = r#"<div>
  <div class="row my-2 border-bottom">{{USER}}</div>
  <ul class="nav nav-tabs">{{NAV}}</ul>
  {{BLOCKS}}
</div>"#;

const BLOCK_HTML: &str = r#"<section class="block">
  <div class="row my-2 border-bottom"><h1>{{HEADING}}</h1></div>
  {{CONTENT}}
</section>
"#;

#[cfg(test)]
mod test {
    use super::*;
    use crate::modules::{
        fixtures::sample_data,
        user_page::{build_page, dispatch::Block, PageLocation},
    };
    use chrono::NaiveDate;

    fn page(query: Option<&str>) -> UserPage {
        build_page(
            "abc",
            &sample_data(),
            &PageLocation {
                path: "/user/abc",
                query,
            },
            NaiveDate::from_ymd_opt(2020, 9, 20).unwrap(),
        )
    }

    #[test]
    fn test_not_found_renders_only_alert() {
        let html = render_page(&UserPage::NotFound {
            user_id: String::from("abc"),
        });

        assert!(html.contains("User not found!"));
        assert!(!html.contains("nav-tabs\">"));
        assert!(!html.contains("<h1>"));
    }

    #[test]
    fn test_loading_renders_spinner_and_refresh() {
        let html = render_page(&UserPage::Loading {
            user_id: String::from("abc"),
        });

        assert!(html.contains(r#"class="spinner""#));
        assert!(html.contains(r#"http-equiv="refresh""#));
        assert!(!html.contains("User not found!"));
    }

    #[test]
    fn test_dashboard_shows_canonical_user_and_nav() {
        let html = render_page(&page(None));

        assert!(html.contains(">ABC</h1>"));
        assert!(html.contains(r#"<a class="nav-link active" href="/user/abc?userPageTab=Achievement">Achievement</a>"#));
        assert!(html.contains(r#"href="/user/abc?userPageTab=AtCoder+Pie+Charts""#));
        assert!(html.contains("<h1>Achievement</h1>"));
        assert!(!html.contains("<h1>Languages</h1>"));
    }

    #[test]
    fn test_all_renders_headings_in_order() {
        let html = render_page(&page(Some("userPageTab=All")));

        let positions: Vec<usize> = Block::ORDER
            .iter()
            .map(|block| {
                html.find(&format!("<h1>{}</h1>", encode_text(block.heading())))
                    .unwrap()
            })
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render_page(&UserPage::NotFound {
            user_id: String::from("<script>"),
        });
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_minify_keeps_content() {
        let html = minify_page(&render_page(&UserPage::NotFound {
            user_id: String::from("abc"),
        }));
        assert!(html.contains("User not found!"));
        assert!(html.len() < render_page(&UserPage::NotFound {
            user_id: String::from("abc"),
        })
        .len());
    }
}
