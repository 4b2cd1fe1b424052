use crate::core::types::{RunResult, Summary};

/// Count working (status code "200") and not-working entries.
///
/// Blank inputs and unreachable URLs count as not working.
pub fn summarize(results: &RunResult) -> Summary {
    let working_count = results.iter().filter(|r| r.is_working()).count();
    Summary {
        working_count,
        not_working_count: results.len() - working_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ProbeResult, ProbeStatus};

    #[test]
    fn test_summarize_mixed_results() {
        let results = RunResult::new(vec![
            ProbeResult::new("https://a.com", ProbeStatus::Working),
            ProbeResult::new("https://b.com", ProbeStatus::NotWorking(404)),
            ProbeResult::could_not_connect("https://c.com"),
        ]);

        let summary = summarize(&results);

        assert_eq!(summary.working_count, 1);
        assert_eq!(summary.not_working_count, 2);
    }

    #[test]
    fn test_summarize_counts_empty_as_not_working() {
        let results = RunResult::new(vec![ProbeResult::empty(), ProbeResult::empty()]);

        let summary = summarize(&results);

        assert_eq!(summary.working_count, 0);
        assert_eq!(summary.not_working_count, 2);
    }

    #[test]
    fn test_summarize_empty_run() {
        assert_eq!(summarize(&RunResult::default()), Summary::default());
    }
}
