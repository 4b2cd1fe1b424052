//! Output formatting and export for urlpulse

use serde_json::json;
use std::io;
use std::path::Path;

use crate::core::constants::{labels, output_formats};
use crate::core::error::{Result, UrlPulseError};
use crate::core::types::{ProbeResult, ProbeStatus, RunResult, Summary};
use crate::ui::color::{Colors, colorize, heading, status_color};

/// Print run results to stdout in the requested format
pub fn display_results(
    results: &RunResult,
    summary: &Summary,
    output_format: &str,
    quiet: bool,
    failure_threshold: Option<f64>,
) -> Result<()> {
    match output_format {
        output_formats::MINIMAL => print!("{}", render_minimal(results)),
        output_formats::JSON => println!("{}", render_json(results, summary)?),
        output_formats::CSV => print!("{}", render_csv(results)?),
        _ => {
            if !quiet {
                print!("{}", render_text(results, summary));
            }
            if let Some(info) = failure_threshold_info(summary, failure_threshold) {
                println!("\n{info}");
            }
        }
    }
    Ok(())
}

/// `<code> <url>` for every result that is not working
pub fn render_minimal(results: &RunResult) -> String {
    results
        .iter()
        .filter(|r| !r.is_working())
        .map(|r| format!("{} {}\n", r.status_code(), r.url()))
        .collect()
}

/// Summary plus every result, in input order
pub fn render_json(results: &RunResult, summary: &Summary) -> Result<String> {
    let status = if summary.not_working_count == 0 {
        "success"
    } else {
        "failure"
    };
    let report = json!({
        "summary": {
            "total": summary.total(),
            "working": summary.working_count,
            "not_working": summary.not_working_count,
            "success_rate": (summary.success_rate() * 10.0).round() / 10.0,
        },
        "status": status,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "results": results,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

/// CSV export with header `URL,Status Code,Status`, one row per input
pub fn render_csv(results: &RunResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_csv_records(&mut writer, results)?;
    let bytes = writer
        .into_inner()
        .map_err(|err| UrlPulseError::Io(err.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|err| UrlPulseError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

/// Write the CSV export to a file
pub fn write_csv_export<P: AsRef<Path>>(path: P, results: &RunResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    write_csv_records(&mut writer, results)?;
    writer.flush()?;
    Ok(())
}

fn write_csv_records<W: io::Write>(writer: &mut csv::Writer<W>, results: &RunResult) -> Result<()> {
    writer.write_record(labels::CSV_HEADER)?;
    for result in results {
        writer.write_record([result.url(), result.status_code(), result.status().label()])?;
    }
    Ok(())
}

/// Summary line and issues grouped by class
pub fn render_text(results: &RunResult, summary: &Summary) -> String {
    let mut out = String::new();

    if summary.not_working_count == 0 {
        out.push_str(&format!(
            "{} {} ({} URLs checked)\n",
            colorize("✅", Colors::BRIGHT_GREEN),
            heading("All URLs working", Colors::BRIGHT_GREEN),
            summary.total()
        ));
        return out;
    }

    out.push_str(&format!(
        "{} {}\n",
        colorize("⚠️", Colors::BRIGHT_RED),
        heading("Issues", Colors::BRIGHT_RED)
    ));

    let groups: [(&str, &str, fn(ProbeStatus) -> bool); 6] = [
        ("🔌", "Could Not Connect", |s| s == ProbeStatus::CouldNotConnect),
        ("🚫", "Client Errors (4xx)", |s| status_in(s, 400..500)),
        ("💥", "Server Errors (5xx)", |s| status_in(s, 500..600)),
        ("🔄", "Redirects (3xx)", |s| status_in(s, 300..400)),
        ("❓", "Other HTTP Responses", |s| {
            matches!(s, ProbeStatus::NotWorking(code) if !(300..600).contains(&code))
        }),
        ("∅", "Empty URLs", |s| s == ProbeStatus::EmptyUrl),
    ];

    for (icon, title, belongs) in groups {
        let members: Vec<(usize, &ProbeResult)> = results
            .iter()
            .enumerate()
            .filter(|(_, r)| belongs(r.status()))
            .collect();
        if members.is_empty() {
            continue;
        }

        out.push_str(&format!("\n   {icon} {}:\n", heading(title, Colors::WHITE)));
        for (index, result) in members {
            out.push_str(&format!(
                "      {}. {} {}\n",
                colorize(&format!("{}", index + 1), Colors::DIM),
                colorize(result.status_code(), status_color(result.status())),
                colorize(result.url(), Colors::CYAN)
            ));
        }
    }

    out.push_str(&format!(
        "\n{}: {}/{} working ({:.1}%), {} not working\n",
        heading("Summary", Colors::BRIGHT_CYAN),
        summary.working_count,
        summary.total(),
        summary.success_rate(),
        summary.not_working_count
    ));

    out
}

fn status_in(status: ProbeStatus, range: std::ops::Range<u16>) -> bool {
    matches!(status, ProbeStatus::NotWorking(code) if range.contains(&code))
}

/// Line describing how the failure rate compares to the threshold, if one is set
pub fn failure_threshold_info(summary: &Summary, threshold: Option<f64>) -> Option<String> {
    let threshold = threshold?;
    if summary.not_working_count == 0 {
        return None;
    }

    let failure_rate = summary.failure_rate();
    let line = if failure_rate > threshold {
        format!(
            "{} Failure rate {:.1}% exceeds threshold {:.1}% ({}/{} URLs not working)",
            colorize("❌", Colors::BRIGHT_RED),
            failure_rate,
            threshold,
            summary.not_working_count,
            summary.total()
        )
    } else {
        format!(
            "{} Failure rate {:.1}% is within threshold {:.1}% ({}/{} URLs not working)",
            colorize("✅", Colors::BRIGHT_GREEN),
            failure_rate,
            threshold,
            summary.not_working_count,
            summary.total()
        )
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample() -> (RunResult, Summary) {
        let results = RunResult::new(vec![
            ProbeResult::new("https://a.com", ProbeStatus::Working),
            ProbeResult::new("https://b.com/missing", ProbeStatus::NotWorking(404)),
            ProbeResult::could_not_connect("https://down.test"),
            ProbeResult::empty(),
            ProbeResult::new("https://c.com", ProbeStatus::NotWorking(503)),
        ]);
        let summary = Summary {
            working_count: 1,
            not_working_count: 4,
        };
        (results, summary)
    }

    #[test]
    fn test_render_minimal_lists_only_not_working() {
        let (results, _) = sample();

        let output = render_minimal(&results);

        assert_eq!(
            output,
            "404 https://b.com/missing\n000 https://down.test\n000 \n503 https://c.com\n"
        );
    }

    #[test]
    fn test_render_csv_header_and_input_order() -> Result<()> {
        let (results, _) = sample();

        let output = render_csv(&results)?;
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "URL,Status Code,Status");
        assert_eq!(lines[1], "https://a.com,200,Working");
        assert_eq!(lines[2], "https://b.com/missing,404,Not Working");
        assert_eq!(lines[3], "https://down.test,000,Could Not Connect");
        assert_eq!(lines[4], ",000,Empty URL");
        assert_eq!(lines[5], "https://c.com,503,Not Working");
        assert_eq!(lines.len(), 6);

        Ok(())
    }

    #[test]
    fn test_render_csv_empty_run_is_header_only() -> Result<()> {
        assert_eq!(render_csv(&RunResult::default())?, "URL,Status Code,Status\n");
        Ok(())
    }

    #[test]
    fn test_render_csv_quotes_urls_with_separators() -> Result<()> {
        let results = RunResult::new(vec![
            ProbeResult::new("https://a.com/?q=1,2", ProbeStatus::Working),
            ProbeResult::new("https://b.com/say\"hi\"", ProbeStatus::NotWorking(404)),
        ]);

        let output = render_csv(&results)?;

        assert_eq!(
            output,
            "URL,Status Code,Status\n\"https://a.com/?q=1,2\",200,Working\n\"https://b.com/say\"\"hi\"\"\",404,Not Working\n"
        );

        Ok(())
    }

    #[test]
    fn test_render_json_structure() -> Result<()> {
        let (results, summary) = sample();

        let output = render_json(&results, &summary)?;
        let value: serde_json::Value = serde_json::from_str(&output)?;

        assert_eq!(value["summary"]["total"], 5);
        assert_eq!(value["summary"]["working"], 1);
        assert_eq!(value["summary"]["not_working"], 4);
        assert_eq!(value["summary"]["success_rate"], 20.0);
        assert_eq!(value["status"], "failure");
        assert!(value["generated_at"].is_string());
        assert_eq!(value["results"][1]["url"], "https://b.com/missing");
        assert_eq!(value["results"][1]["status_code"], "404");
        assert_eq!(value["results"][1]["status"], "Not Working");
        assert_eq!(value["results"][3]["status"], "Empty URL");

        Ok(())
    }

    #[test]
    fn test_render_json_all_working() -> Result<()> {
        let results = RunResult::new(vec![ProbeResult::new("https://a.com", ProbeStatus::Working)]);
        let summary = Summary {
            working_count: 1,
            not_working_count: 0,
        };

        let value: serde_json::Value = serde_json::from_str(&render_json(&results, &summary)?)?;

        assert_eq!(value["status"], "success");
        assert_eq!(value["summary"]["success_rate"], 100.0);

        Ok(())
    }

    #[test]
    fn test_render_text_groups_issues() {
        let (results, summary) = sample();

        let output = render_text(&results, &summary);

        assert!(output.contains("Issues"));
        assert!(output.contains("Could Not Connect:"));
        assert!(output.contains("Client Errors (4xx):"));
        assert!(output.contains("Server Errors (5xx):"));
        assert!(output.contains("Empty URLs:"));
        assert!(!output.contains("Redirects (3xx):"));
        // numbering follows input position
        assert!(output.contains("2. 404 https://b.com/missing"));
        assert!(output.contains("5. 503 https://c.com"));
        assert!(output.contains("1/5 working (20.0%), 4 not working"));
    }

    #[test]
    fn test_render_text_all_working() {
        let results = RunResult::new(vec![ProbeResult::new("https://a.com", ProbeStatus::Working)]);
        let summary = Summary {
            working_count: 1,
            not_working_count: 0,
        };

        let output = render_text(&results, &summary);

        assert!(output.contains("All URLs working (1 URLs checked)"));
        assert!(!output.contains("Issues"));
    }

    #[test]
    fn test_write_csv_export() -> Result<()> {
        let (results, _) = sample();
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("report.csv");

        write_csv_export(&path, &results)?;

        let content = fs::read_to_string(&path)?;
        assert!(content.starts_with("URL,Status Code,Status\n"));
        assert_eq!(content.lines().count(), 6);

        Ok(())
    }

    #[test]
    fn test_failure_threshold_info() {
        let summary = Summary {
            working_count: 7,
            not_working_count: 3,
        };

        assert!(failure_threshold_info(&summary, None).is_none());

        let exceeded = failure_threshold_info(&summary, Some(20.0)).unwrap();
        assert!(exceeded.contains("exceeds threshold 20.0%"));

        let within = failure_threshold_info(&summary, Some(50.0)).unwrap();
        assert!(within.contains("is within threshold 50.0%"));

        let clean = Summary {
            working_count: 3,
            not_working_count: 0,
        };
        assert!(failure_threshold_info(&clean, Some(10.0)).is_none());
    }
}
