//! Report formatting.
//!
//! Pure functions that turn an [`AnalysisReport`] into presentation-ready
//! values: letter grade, severity bands, progress ratios, roadmap and
//! compliance rows, and the exported JSON blob. Nothing here performs I/O.
//!
//! The letter grade and the score color band use different breakpoints.
//! They are separate tables and must stay that way.

use std::fmt;

use repotrace_models::{AnalysisReport, RepoDetails};

/// Maximum value of a single category score.
pub const CATEGORY_MAX: u32 = 25;

/// Prefix of exported report file names.
pub const EXPORT_PREFIX: &str = "gitgrade_report";

/// Shown instead of the roadmap when it has no items.
pub const EMPTY_ROADMAP_MESSAGE: &str = "🎉 Outstanding work! Your repository is in top shape.";

/// Letter grade. Variants are ordered best first, so `A < F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Returns the letter.
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    /// Returns true if `self` is a strictly better grade than `other`.
    pub fn is_better_than(self, other: Grade) -> bool {
        self < other
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual severity of an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreBand {
    /// 90 and above.
    Excellent,
    /// 70 to 89.
    Good,
    /// 50 to 69.
    Fair,
    /// Below 50.
    Poor,
}

impl ScoreBand {
    /// Tier number, 1 (best) through 4 (worst).
    pub fn tier(self) -> u8 {
        match self {
            ScoreBand::Excellent => 1,
            ScoreBand::Good => 2,
            ScoreBand::Fair => 3,
            ScoreBand::Poor => 4,
        }
    }

    /// Color name used by renderers.
    pub fn color_name(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "emerald",
            ScoreBand::Good => "amber",
            ScoreBand::Fair => "orange",
            ScoreBand::Poor => "rose",
        }
    }
}

/// Pass/warn/fail tier of a category score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryBand {
    Pass,
    Warn,
    Fail,
}

impl CategoryBand {
    /// Color name used by renderers.
    pub fn color_name(self) -> &'static str {
        match self {
            CategoryBand::Pass => "emerald",
            CategoryBand::Warn => "amber",
            CategoryBand::Fail => "rose",
        }
    }
}

/// Maps an overall score to a letter grade.
pub fn grade_of(score: u32) -> Grade {
    match score {
        90.. => Grade::A,
        80.. => Grade::B,
        60.. => Grade::C,
        40.. => Grade::D,
        _ => Grade::F,
    }
}

/// Maps an overall score to its color band.
pub fn color_band_of(score: u32) -> ScoreBand {
    match score {
        90.. => ScoreBand::Excellent,
        70.. => ScoreBand::Good,
        50.. => ScoreBand::Fair,
        _ => ScoreBand::Poor,
    }
}

/// Maps a category score (0..=25) to its band.
pub fn category_band_of(category_score: u32) -> CategoryBand {
    match category_score {
        20.. => CategoryBand::Pass,
        10.. => CategoryBand::Warn,
        _ => CategoryBand::Fail,
    }
}

/// Fraction of a category's maximum, clamped to `[0, 1]`.
pub fn progress_ratio(category_score: u32) -> f64 {
    (f64::from(category_score) / f64::from(CATEGORY_MAX)).clamp(0.0, 1.0)
}

/// Returns the message shown for an empty roadmap.
pub fn empty_roadmap_message() -> &'static str {
    EMPTY_ROADMAP_MESSAGE
}

/// How the roadmap section should be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoadmapView {
    /// No recommendations left; show the message.
    Complete(&'static str),
    /// Numbered recommendations, never empty.
    Steps(Vec<RoadmapStep>),
}

/// One numbered roadmap recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapStep {
    /// 1-based position.
    pub number: usize,
    /// Recommendation text.
    pub text: String,
}

/// Builds the roadmap view for a report.
pub fn roadmap_view(report: &AnalysisReport) -> RoadmapView {
    if report.roadmap.is_empty() {
        return RoadmapView::Complete(empty_roadmap_message());
    }
    RoadmapView::Steps(
        report
            .roadmap
            .iter()
            .enumerate()
            .map(|(idx, text)| RoadmapStep {
                number: idx + 1,
                text: text.clone(),
            })
            .collect(),
    )
}

/// A boolean compliance row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceCheck {
    /// Row label.
    pub label: &'static str,
    /// Whether the repository satisfies the check.
    pub passed: bool,
}

impl ComplianceCheck {
    /// Status text for the row.
    pub fn status(&self) -> &'static str {
        if self.passed {
            "Pass"
        } else {
            "Missing"
        }
    }
}

/// Compliance rows in display order.
pub fn compliance_checks(details: &RepoDetails) -> [ComplianceCheck; 4] {
    [
        ComplianceCheck {
            label: "Documentation",
            passed: details.has_readme,
        },
        ComplianceCheck {
            label: "License",
            passed: details.has_license,
        },
        ComplianceCheck {
            label: "CI/CD Workflows",
            passed: details.has_workflows,
        },
        ComplianceCheck {
            label: "Test Suite",
            passed: details.has_tests,
        },
    ]
}

/// Headline counters in display order: stars, forks, issues.
pub fn key_metrics(details: &RepoDetails) -> [(&'static str, u64); 3] {
    [
        ("Stars", details.stars),
        ("Forks", details.forks),
        ("Issues", details.open_issues),
    ]
}

/// A category row with its derived values.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    /// Category name.
    pub name: String,
    /// Raw score.
    pub score: u32,
    /// Severity band.
    pub band: CategoryBand,
    /// Fill fraction for the progress indicator.
    pub ratio: f64,
}

/// Category rows in report order.
pub fn category_rows(report: &AnalysisReport) -> Vec<CategoryRow> {
    report
        .category_scores
        .iter()
        .map(|(name, &score)| CategoryRow {
            name: name.clone(),
            score,
            band: category_band_of(score),
            ratio: progress_ratio(score),
        })
        .collect()
}

/// A report serialized for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportExport {
    /// Suggested file name.
    pub filename: String,
    /// Pretty-printed JSON of the full report.
    pub contents: String,
}

/// Replaces every path separator in `name` with `_`.
pub fn sanitize_repo_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

/// Serializes `report` and names the file
/// `gitgrade_report_<repo>_<timestamp_millis>.json`.
pub fn export_blob(
    report: &AnalysisReport,
    timestamp_millis: i64,
) -> Result<ReportExport, serde_json::Error> {
    Ok(ReportExport {
        filename: format!(
            "{}_{}_{}.json",
            EXPORT_PREFIX,
            sanitize_repo_name(&report.repo_name),
            timestamp_millis
        ),
        contents: serde_json::to_string_pretty(report)?,
    })
}

/// [`export_blob`] stamped with the current time.
pub fn export_blob_now(report: &AnalysisReport) -> Result<ReportExport, serde_json::Error> {
    export_blob(report, chrono::Utc::now().timestamp_millis())
}

/// Renders a plain-text version of the report.
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let band = color_band_of(report.score);

    out.push_str(&format!("{}\n", report.repo_name));
    if let Some(description) = &report.description {
        out.push_str(&format!("{}\n", description));
    }
    out.push_str(&format!(
        "Score: {}/100  Grade {}  ({})\n",
        report.score,
        grade_of(report.score),
        band.color_name()
    ));
    out.push_str(&format!("{}\n", report.summary));

    let metrics: Vec<String> = key_metrics(&report.details)
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect();
    out.push_str(&format!("{}\n", metrics.join("  ")));

    if !report.tech_stack.is_empty() {
        out.push_str(&format!("Tech stack: {}\n", report.tech_stack.join(", ")));
    }

    let rows = category_rows(report);
    if !rows.is_empty() {
        out.push_str("\nCategories\n");
        for row in rows {
            out.push_str(&format!(
                "  {:<20} {:>2}/{}  {:?}\n",
                row.name, row.score, CATEGORY_MAX, row.band
            ));
        }
    }

    out.push_str("\nRoadmap\n");
    match roadmap_view(report) {
        RoadmapView::Complete(message) => out.push_str(&format!("  {}\n", message)),
        RoadmapView::Steps(steps) => {
            for step in steps {
                out.push_str(&format!("  {}. {}\n", step.number, step.text));
            }
        }
    }

    out.push_str("\nDeep Dive\n");
    for check in compliance_checks(&report.details) {
        out.push_str(&format!("  {:<20} {}\n", check.label, check.status()));
    }
    out.push_str(&format!(
        "  {:<20} {}\n",
        "Recent Commits", report.details.recent_commits
    ));

    out
}
