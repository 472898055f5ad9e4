use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::{AnalysisReport, Distributions};
use crate::models::{BoundaryMode, Histogram, UpperBound};
use crate::relations::RelationReport;
use crate::stats::MeetingStats;

impl AnalysisReport {
    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Plain text rendering of an analysis report
pub struct HumanReport<'a> {
    report: &'a AnalysisReport,
}

impl<'a> HumanReport<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self { report }
    }

    /// Relations per meeting
    pub fn format_relations(&self) -> String {
        let mut output = String::new();

        for meeting in &self.report.meetings {
            let _ = writeln!(
                output,
                "Meeting {} ({} participants, {} utterances)",
                meeting.meeting_id, meeting.participant_count, meeting.utterance_count
            );
            format_relation_report(&mut output, &meeting.affirmations);
            format_relation_report(&mut output, &meeting.interruptions);
            output.push('\n');
        }

        output
    }

    /// Batch histograms
    pub fn format_distributions(&self) -> String {
        format_distributions(&self.report.distributions)
    }

    /// Relations followed by distributions
    pub fn format(&self) -> String {
        let mut output = format!("Generated {}\n\n", self.report.generated_at);
        output.push_str(&self.format_relations());
        output.push_str(&self.format_distributions());
        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Meeting counts and histograms as text
pub fn format_distributions(distributions: &Distributions) -> String {
    let mut output = String::new();

    format_meeting_stats(&mut output, &distributions.meeting_stats);
    output.push('\n');

    output.push_str("Utterance durations:\n");
    format_buckets(&mut output, &distributions.utterance_durations_ms, format_timestamp);
    output.push('\n');

    output.push_str("Gaps between a participant's utterances:\n");
    format_buckets(&mut output, &distributions.utterance_gaps_ms, format_timestamp);
    output.push('\n');

    let slots = distributions.zero_length_by_meeting_part.len();
    if slots > 0 {
        output.push_str("Zero-length utterances by percent of meeting:\n");
        for (i, count) in distributions.zero_length_by_meeting_part.iter().enumerate() {
            let percent = (i + 1) as f64 * 100.0 / slots as f64;
            let _ = writeln!(output, "  {:>5.1}%: {:4}", percent, count);
        }
        output.push('\n');
    }

    output.push_str("Meetings grouped by length in minutes:\n");
    format_buckets(&mut output, &distributions.meeting_lengths_min, |m| format!("{}", m));

    output
}

fn format_relation_report(output: &mut String, report: &RelationReport) {
    if report.edges.is_empty() {
        let _ = writeln!(output, "  no {}s", report.kind);
        return;
    }
    let _ = writeln!(output, "  {}s ({}):", report.kind, report.events.len());
    for edge in &report.edges {
        let _ = writeln!(output, "    {} -> {}: {}", edge.key2, edge.key1, edge.count);
    }
}

fn format_meeting_stats(output: &mut String, stats: &MeetingStats) {
    let _ = writeln!(output, "Meetings: {}", stats.total_meetings);
    let _ = writeln!(
        output,
        "Meetings with more than one participant: {}",
        stats.real_meetings
    );
    let _ = writeln!(output, "Participants in those meetings: {}", stats.total_num_participants);
    let _ = writeln!(
        output,
        "Average meeting length: {:.1} min",
        stats.avg_meeting_length_min
    );
    if let Some(longest) = &stats.longest_meeting {
        let _ = writeln!(
            output,
            "Longest meeting: {} ({:.1} min, {} participants)",
            longest.meeting_id, longest.length_min, longest.num_participants
        );
    }
    output.push_str("Meetings by number of participants:\n");
    for (participants, meetings) in &stats.count_by_participants {
        let _ = writeln!(output, "  {:>4}: {:4}", participants, meetings);
    }
}

/// One line per bucket, labelled with the range it covers.
///
/// Range ends follow the histogram's boundary mode: `<=`/`>` when a value
/// equal to a bound counts below it, `<`/`>=` when it counts above.
fn format_buckets<F>(output: &mut String, histogram: &Histogram, label: F)
where
    F: Fn(i64) -> String,
{
    let (below, above) = match histogram.mode {
        BoundaryMode::Inclusive => ("<=", ">"),
        BoundaryMode::Exclusive => ("<", ">="),
    };
    let mut prev: Option<f64> = None;
    for bucket in &histogram.buckets {
        let range = match (prev, bucket.upper_bound) {
            (None, UpperBound::Value(b)) => format!("{:>10}   {:>10}", below, label(b as i64)),
            (Some(p), UpperBound::Value(b)) => {
                format!("{:>10} - {:>10}", label(p as i64), label(b as i64))
            }
            (Some(p), UpperBound::Unbounded) => format!("{:>10}   {:>10}", above, label(p as i64)),
            (None, UpperBound::Unbounded) => format!("{:>23}", "all"),
        };
        let _ = writeln!(output, "  {}: {:6}", range, bucket.count);
        if let UpperBound::Value(b) = bucket.upper_bound {
            prev = Some(b);
        }
    }
}

/// Format milliseconds as MM:SS.mmm
fn format_timestamp(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.unsigned_abs();
    let seconds = ms / 1000;
    let millis = ms % 1000;
    let minutes = seconds / 60;
    let secs = seconds % 60;
    format!("{}{:02}:{:02}.{:03}", sign, minutes, secs, millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{compute_distributions, execute_analysis};
    use crate::config::AnalysisConfig;
    use crate::models::{Bucket, MeetingUtterances, Utterance};
    use crate::stats::meeting_length_distribution;

    fn sample_report() -> AnalysisReport {
        let uts = vec![
            Utterance::new("alice", 0, 5_000).unwrap(),
            Utterance::new("bob", 1_000, 1_800).unwrap(),
        ];
        let meetings = vec![MeetingUtterances::from_utterances("m1", uts)];
        execute_analysis(&meetings, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "00:00.000");
        assert_eq!(format_timestamp(1500), "00:01.500");
        assert_eq!(format_timestamp(65_000), "01:05.000");
        assert_eq!(format_timestamp(-250), "-00:00.250");
    }

    #[test]
    fn test_format_relations() {
        let report = sample_report();
        let text = HumanReport::new(&report).format_relations();

        assert!(text.contains("Meeting m1 (2 participants, 2 utterances)"));
        assert!(text.contains("affirmations (1):"));
        assert!(text.contains("bob -> alice: 1"));
        assert!(text.contains("no interruptions"));
    }

    #[test]
    fn test_format_buckets() {
        let histogram = Histogram {
            mode: BoundaryMode::Inclusive,
            buckets: vec![
                Bucket { upper_bound: UpperBound::Value(5.0), count: 2 },
                Bucket { upper_bound: UpperBound::Value(10.0), count: 0 },
                Bucket { upper_bound: UpperBound::Unbounded, count: 1 },
            ],
        };
        let mut output = String::new();
        format_buckets(&mut output, &histogram, |m| m.to_string());

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with("<= "));
        assert!(lines[1].contains("5 -"));
        assert!(lines[2].trim_start().starts_with("> "));
        assert!(lines[2].trim_end().ends_with('1'));
    }

    #[test]
    fn test_format_exclusive_buckets() {
        // a 5 minute meeting is counted in the 5 - 10 bucket
        let histogram = meeting_length_distribution(&[5.0]).unwrap().histogram();
        let mut output = String::new();
        format_buckets(&mut output, &histogram, |m| m.to_string());

        let lines: Vec<&str> = output.lines().collect();
        let count = |line: &str| line.rsplit(':').next().unwrap().trim().to_string();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].trim_start().starts_with("< "));
        assert_eq!(count(lines[0]), "0");
        assert!(lines[1].contains("5 -"));
        assert_eq!(count(lines[1]), "1");
        assert!(lines[8].trim_start().starts_with(">= "));
    }

    #[test]
    fn test_format_meeting_stats() {
        let report = sample_report();
        let text = HumanReport::new(&report).format_distributions();

        assert!(text.contains("Meetings: 1"));
        assert!(text.contains("Meetings with more than one participant: 1"));
        assert!(text.contains("Longest meeting: m1 (0.1 min, 2 participants)"));
    }

    #[test]
    fn test_format_distributions_without_relations() {
        let meetings = vec![MeetingUtterances::from_utterances(
            "m1",
            vec![
                Utterance::new("alice", 0, 0).unwrap(),
                Utterance::new("bob", 0, 90_000).unwrap(),
            ],
        )];
        let distributions = compute_distributions(&meetings, &AnalysisConfig::default()).unwrap();

        let text = format_distributions(&distributions);

        assert!(text.contains("Meetings: 1"));
        assert!(text.contains("Zero-length utterances by percent of meeting:"));
        assert!(text.contains("Meetings grouped by length in minutes:"));
    }

    #[test]
    fn test_write_outputs() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("report.json");
        report.write_json(&json_path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["meetings"][0]["affirmations"]["edges"][0]["count"], 1);
        assert_eq!(value["meetings"][0]["affirmations"]["kind"], "affirmation");
        assert_eq!(value["distributions"]["meeting_lengths_min"]["mode"], "exclusive");
        assert_eq!(value["distributions"]["meeting_stats"]["real_meetings"], 1);

        let text_path = dir.path().join("report.txt");
        HumanReport::new(&report).write_file(&text_path).unwrap();
        assert!(std::fs::read_to_string(&text_path).unwrap().contains("Utterance durations"));
    }
}
