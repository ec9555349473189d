use atcoder_stats_libs::model::SubmissionMap;

/// Exact-case user id as stored in the submissions, or `requested` when no submission matches.
///
/// The first case-insensitive match in scan order wins.
pub fn canonical_user_id<'a>(submissions: &'a SubmissionMap, requested: &'a str) -> &'a str {
    let lowered = requested.to_lowercase();
    submissions
        .values()
        .flatten()
        .find(|submission| submission.user_id.to_lowercase() == lowered)
        .map(|submission| submission.user_id.as_str())
        .unwrap_or(requested)
}

/// A page exists only for a non-empty id with at least one submission.
pub fn is_user_found(submissions: &SubmissionMap, requested: &str) -> bool {
    !requested.is_empty() && !submissions.is_empty()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::modules::stats::test_util::submission;
    use atcoder_stats_libs::model::group_by_problem;

    #[test]
    fn test_returns_stored_case() {
        let submissions = group_by_problem(vec![submission(1, "ABC", "abc100_a", 1, "AC")]);
        assert_eq!(canonical_user_id(&submissions, "abc"), "ABC");
        assert_eq!(canonical_user_id(&submissions, "aBc"), "ABC");
    }

    #[test]
    fn test_first_match_wins() {
        let submissions = group_by_problem(vec![
            submission(1, "other", "abc100_a", 1, "AC"),
            submission(2, "TaRo", "abc100_b", 2, "AC"),
            submission(3, "taro", "abc100_c", 3, "AC"),
        ]);
        assert_eq!(canonical_user_id(&submissions, "TARO"), "TaRo");
    }

    #[test]
    fn test_falls_back_to_requested_id() {
        let submissions = group_by_problem(vec![submission(1, "other", "abc100_a", 1, "AC")]);
        assert_eq!(canonical_user_id(&submissions, "Nobody"), "Nobody");
        assert_eq!(canonical_user_id(&SubmissionMap::new(), "Nobody"), "Nobody");
    }

    #[test]
    fn test_is_user_found() {
        let submissions = group_by_problem(vec![submission(1, "foo", "abc100_a", 1, "AC")]);
        assert!(is_user_found(&submissions, "foo"));
        assert!(!is_user_found(&submissions, ""));
        assert!(!is_user_found(&SubmissionMap::new(), "foo"));
    }
}
