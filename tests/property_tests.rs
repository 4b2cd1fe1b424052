//! Property-based tests for urlpulse using proptest
//!
//! These tests generate random inputs to check the input cleaning rules and
//! make sure the CLI handles arbitrary URL lists without crashing.

use assert_cmd::prelude::*;
use proptest::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

use urlpulse::probing::{ensure_scheme, normalize};
use urlpulse::source::read_url_list;
use urlpulse::ui::output::render_csv;
use urlpulse::{ProbeResult, ProbeStatus, RunResult, summarize};

const NAME: &str = "urlpulse";

/// Raw input lines as they show up in pasted lists
fn raw_line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Plain hosts and paths without a scheme
        (r"[a-z]{3,10}", r"[a-z]{0,8}")
            .prop_map(|(host, path)| format!("{host}.com/{path}")),
        // With a scheme in any case
        (prop_oneof![Just("http"), Just("https"), Just("HTTP"), Just("Https")], r"[a-z]{3,10}")
            .prop_map(|(scheme, host)| format!("{scheme}://{host}.org")),
        // Surrounding whitespace and carriage returns
        (r"[ \t]{0,3}", r"[a-z]{3,10}", r"[ \t\r]{0,3}")
            .prop_map(|(pre, host, post)| format!("{pre}{host}.net{post}")),
        // Blank lines
        r"[ \t\r]{0,4}",
        // Anything printable
        r"[ -~]{0,40}",
    ]
}

/// Lines that can never produce a working URL and fail fast
fn unreachable_line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        r"[a-z]{1,8}".prop_map(|path| format!("http://127.0.0.1:1/{path}")),
        Just("http:// invalid spaces".to_string()),
        Just("https://[invalid".to_string()),
        Just("".to_string()),
        Just("   ".to_string()),
        Just("127.0.0.1:1/no-scheme".to_string()),
    ]
}

proptest! {
    #[test]
    fn test_normalize_is_idempotent(raw in raw_line_strategy()) {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert!(!once.contains('\r'));
        prop_assert_eq!(once.trim(), once.as_str());
    }

    #[test]
    fn test_ensure_scheme_always_yields_http_scheme(raw in raw_line_strategy()) {
        let url = ensure_scheme(&normalize(&raw));
        if !url.is_empty() {
            let lower = url.to_ascii_lowercase();
            prop_assert!(lower.starts_with("http://") || lower.starts_with("https://"));
        }
        prop_assert_eq!(ensure_scheme(&url), url);
    }

    #[test]
    fn test_ensure_scheme_keeps_existing_scheme(host in r"[a-z]{3,10}", secure in any::<bool>()) {
        let url = if secure { format!("https://{host}.io") } else { format!("http://{host}.io") };
        prop_assert_eq!(ensure_scheme(&url), url);
    }

    #[test]
    fn test_read_url_list_yields_clean_nonblank_lines(
        lines in prop::collection::vec(raw_line_strategy(), 0..30)
    ) {
        let text = lines.join("\n");
        let urls = read_url_list(&text);

        prop_assert!(urls.len() <= lines.len());
        for url in &urls {
            prop_assert!(!url.is_empty());
            prop_assert!(!url.contains('\r'));
            prop_assert_eq!(url.trim(), url.as_str());
        }
    }

    #[test]
    fn test_summary_partitions_results(
        statuses in prop::collection::vec(
            prop_oneof![
                Just(ProbeStatus::Working),
                (100u16..600).prop_map(ProbeStatus::from_status_code),
                Just(ProbeStatus::CouldNotConnect),
                Just(ProbeStatus::EmptyUrl),
            ],
            0..40,
        )
    ) {
        let results = RunResult::new(
            statuses
                .iter()
                .enumerate()
                .map(|(i, status)| ProbeResult::new(format!("https://u{i}.test"), *status))
                .collect(),
        );

        let summary = summarize(&results);

        prop_assert_eq!(summary.total(), results.len());
        prop_assert_eq!(
            summary.working_count,
            statuses.iter().filter(|s| s.is_working()).count()
        );
        prop_assert_eq!(render_csv(&results).unwrap().lines().count(), results.len() + 1);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn test_cli_reports_one_row_per_nonblank_line(
        lines in prop::collection::vec(unreachable_line_strategy(), 1..8)
    ) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(lines.join("\n").as_bytes()).unwrap();
        let expected_rows = lines.iter().filter(|l| !l.trim().is_empty()).count();

        let mut cmd = Command::cargo_bin(NAME).unwrap();
        cmd.arg(file.path())
            .arg("--no-config")
            .arg("--format")
            .arg("csv")
            .arg("--retries")
            .arg("0")
            .arg("--connect-timeout")
            .arg("500")
            .arg("--read-timeout")
            .arg("500");

        let output = cmd.output().unwrap();
        let code = output.status.code();
        prop_assert!(code == Some(0) || code == Some(1));

        let stdout = String::from_utf8(output.stdout).unwrap();
        prop_assert_eq!(stdout.lines().count(), expected_rows + 1);
        // none of these can answer 200
        if expected_rows > 0 {
            prop_assert_eq!(code, Some(1));
        }
    }

    #[test]
    fn test_cli_accepts_valid_configuration_combinations(
        workers in 1usize..64,
        retries in 0u32..3,
        backoff in 1u64..20,
        threshold in 0.0f64..100.0,
    ) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"http://127.0.0.1:1/a\n\nhttp://127.0.0.1:1/b").unwrap();

        let mut cmd = Command::cargo_bin(NAME).unwrap();
        cmd.arg(file.path())
            .arg("--no-config")
            .arg("--format")
            .arg("minimal")
            .arg("--workers")
            .arg(workers.to_string())
            .arg("--retries")
            .arg(retries.to_string())
            .arg("--backoff")
            .arg(backoff.to_string())
            .arg("--failure-threshold")
            .arg(threshold.to_string());

        // every URL fails, so the failure rate is 100% and above any threshold below it
        let output = cmd.output().unwrap();
        prop_assert_eq!(output.status.code(), Some(1));
        let stdout = String::from_utf8(output.stdout).unwrap();
        prop_assert_eq!(stdout.lines().count(), 2);
    }
}
