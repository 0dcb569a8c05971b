use crate::models::Repository;

/// One bucket of the per-language repository distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCount {
    pub label: String,
    pub value: u32,
}

/// Counts repositories per primary language.
///
/// Repositories without a language are skipped entirely; they neither
/// count toward a bucket nor produce an "unknown" bucket. Buckets keep
/// the order in which their language first appears in the input.
pub fn aggregate_languages(repos: &[Repository]) -> Vec<LanguageCount> {
    let mut counts: Vec<LanguageCount> = Vec::new();

    for repo in repos {
        let Some(language) = repo.language.as_deref() else {
            continue;
        };
        match counts.iter_mut().find(|c| c.label == language) {
            Some(bucket) => bucket.value += 1,
            None => counts.push(LanguageCount {
                label: language.to_string(),
                value: 1,
            }),
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(language: Option<&str>) -> Repository {
        Repository {
            language: language.map(str::to_string),
        }
    }

    #[test]
    fn counts_repositories_per_language() {
        let repos = vec![repo(Some("JS")), repo(Some("Python")), repo(Some("JS"))];
        let counts = aggregate_languages(&repos);

        assert_eq!(
            counts,
            vec![
                LanguageCount { label: "JS".to_string(), value: 2 },
                LanguageCount { label: "Python".to_string(), value: 1 },
            ]
        );
    }

    #[test]
    fn count_sum_matches_repositories_with_language() {
        let repos = vec![
            repo(Some("Rust")),
            repo(None),
            repo(Some("Go")),
            repo(Some("Rust")),
            repo(None),
        ];
        let counts = aggregate_languages(&repos);

        let sum: u32 = counts.iter().map(|c| c.value).sum();
        assert_eq!(sum, 3);
    }

    #[test]
    fn all_null_languages_yield_empty_distribution() {
        let repos = vec![repo(None), repo(None)];
        assert!(aggregate_languages(&repos).is_empty());
    }

    #[test]
    fn empty_input_yields_empty_distribution() {
        assert!(aggregate_languages(&[]).is_empty());
    }

    #[test]
    fn first_seen_language_stays_first_regardless_of_count() {
        let repos = vec![
            repo(Some("Python")),
            repo(Some("JS")),
            repo(Some("JS")),
            repo(Some("JS")),
        ];
        let counts = aggregate_languages(&repos);

        assert_eq!(counts[0].label, "Python");
        assert_eq!(counts[1].label, "JS");
        assert_eq!(counts[1].value, 3);
    }
}
