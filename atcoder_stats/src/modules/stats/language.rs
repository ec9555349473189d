use super::first_accepted;
use atcoder_stats_libs::model::Submission;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;

static VERSION_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d* \(.*\)$").unwrap());

/// Strips the compiler/version suffix: `C++14 (GCC 5.4.1)` becomes `C++`.
pub fn normalize_language(language: &str) -> String {
    if language.starts_with("Perl6") {
        return String::from("Raku");
    }
    VERSION_SUFFIX.replace(language, "").trim().to_string()
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct LanguageCount {
    pub language: String,
    pub accepted_count: usize,
    pub last_accepted_date: Option<NaiveDate>,
}

/// Distinct solved problems per language, most used first.
pub fn count_by_language(submissions: &[&Submission]) -> Vec<LanguageCount> {
    let mut per_language: BTreeMap<String, Vec<&Submission>> = BTreeMap::new();
    for submission in submissions.iter().copied() {
        per_language
            .entry(normalize_language(&submission.language))
            .or_insert_with(Vec::new)
            .push(submission);
    }

    let mut counts: Vec<LanguageCount> = per_language
        .into_iter()
        .map(|(language, submissions)| {
            let first = first_accepted(&submissions);
            let last_accepted_date = submissions
                .iter()
                .filter(|s| s.is_accepted())
                .filter_map(|s| s.date())
                .max();
            LanguageCount {
                language,
                accepted_count: first.len(),
                last_accepted_date,
            }
        })
        .collect();

    counts.sort_by(|a, b| {
        b.accepted_count
            .cmp(&a.accepted_count)
            .then_with(|| a.language.cmp(&b.language))
    });
    counts
}

#[cfg(test)]
mod test {
    use super::super::test_util::submission;
    use super::*;

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language("C++14 (GCC 5.4.1)"), "C++");
        assert_eq!(normalize_language("Python3 (3.4.3)"), "Python");
        assert_eq!(normalize_language("Rust (1.42.0)"), "Rust");
        assert_eq!(normalize_language("Perl6 (rakudo-star 2016.01)"), "Raku");
        assert_eq!(normalize_language("Bash"), "Bash");
    }

    #[test]
    fn test_count_by_language() {
        let mut a = submission(1, "foo", "abc100_a", 100, "AC");
        a.language = String::from("Rust (1.42.0)");
        let b = submission(2, "foo", "abc100_a", 200, "AC");
        let c = submission(3, "foo", "abc100_b", 300, "AC");
        let d = submission(4, "foo", "abc100_c", 400, "WA");
        let submissions = vec![&a, &b, &c, &d];

        let counts = count_by_language(&submissions);
        let summary: Vec<(&str, usize)> = counts
            .iter()
            .map(|c| (c.language.as_str(), c.accepted_count))
            .collect();

        assert_eq!(summary, vec![("C++", 2), ("Rust", 1)]);
    }
}
