use nucleo_matcher::{
    pattern::{CaseMatching, Normalization, Pattern},
    Matcher,
};

use crate::data::PullRequest;

/// Filter pull requests using fuzzy matching.
/// Returns the indices of matching PRs, sorted by match score (best first).
pub fn filter_prs(prs: &[&PullRequest], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..prs.len()).collect();
    }

    let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);
    let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);

    let haystacks: Vec<String> = prs
        .iter()
        .map(|pr| {
            let labels: Vec<&str> = pr.labels.iter().map(|l| l.name.as_str()).collect();
            format!(
                "#{} {} {} {} {}",
                pr.number,
                pr.repo,
                pr.author,
                pr.title,
                labels.join(" ")
            )
        })
        .collect();

    let mut scored: Vec<(usize, u32)> = haystacks
        .iter()
        .enumerate()
        .filter_map(|(idx, haystack)| {
            let mut buf = Vec::new();
            let utf32 = nucleo_matcher::Utf32Str::new(haystack, &mut buf);
            pattern.score(utf32, &mut matcher).map(|score| (idx, score))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.into_iter().map(|(idx, _)| idx).collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::{Label, RepositoryId};

    fn pr(number: u64, title: &str, label: &str) -> PullRequest {
        PullRequest {
            number,
            title: title.to_string(),
            url: String::new(),
            author: "octocat".to_string(),
            repo: RepositoryId::new("octo", "widgets"),
            comment_count: 0,
            labels: vec![Label {
                name: label.to_string(),
                color: "ededed".to_string(),
            }],
            updated_at: Utc::now(),
            statuses: BTreeMap::new(),
            check_runs: Vec::new(),
        }
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let (a, b) = (pr(1, "Add parser", "feature"), pr(2, "Fix crash", "bug"));

        assert_eq!(filter_prs(&[&a, &b], ""), vec![0, 1]);
    }

    #[test]
    fn matches_titles_and_labels() {
        let (a, b) = (pr(1, "Add parser", "feature"), pr(2, "Fix crash", "bug"));

        assert_eq!(filter_prs(&[&a, &b], "crash"), vec![1]);
        assert_eq!(filter_prs(&[&a, &b], "feature"), vec![0]);
        assert!(filter_prs(&[&a, &b], "zzzz").is_empty());
    }
}
