//! Analysis report types.
//!
//! These mirror the JSON body returned by `GET /api/analyze`. Field names
//! follow the wire format exactly, including the snake_case `open_issues`.
//! Keys the client does not model are kept in `extra` so an exported report
//! carries everything the service sent.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Highest score the service assigns to a repository.
pub const MAX_SCORE: u32 = 100;

/// Repository metrics and compliance flags.
///
/// The service omits a flag when the check fails, so every flag defaults to
/// false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDetails {
    /// Stargazer count.
    pub stars: u64,

    /// Fork count.
    pub forks: u64,

    /// Open issue count.
    pub open_issues: u64,

    /// Whether a README was found.
    #[serde(rename = "hasReadme", default)]
    pub has_readme: bool,

    /// Whether a license was found.
    #[serde(rename = "hasLicense", default)]
    pub has_license: bool,

    /// Whether CI workflows were found.
    #[serde(rename = "hasWorkflows", default)]
    pub has_workflows: bool,

    /// Whether a test suite was found.
    #[serde(rename = "hasTests", default)]
    pub has_tests: bool,

    /// Number of commits in the recent activity window.
    #[serde(rename = "recentCommits", default)]
    pub recent_commits: u64,

    /// Unmodeled keys, such as `prs`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The structured result of analyzing one repository.
///
/// Immutable once stored by the session controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Repository name, usually `owner/name`.
    pub repo_name: String,

    /// Free-form repository description, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Overall health score in `0..=100`.
    pub score: u32,

    /// One-line summary of the analysis.
    pub summary: String,

    /// Per-category scores in `0..=25`, in the order the service sent them.
    #[serde(default)]
    pub category_scores: IndexMap<String, u32>,

    /// Detected languages and frameworks.
    #[serde(default)]
    pub tech_stack: Vec<String>,

    /// Metrics and compliance flags.
    pub details: RepoDetails,

    /// Ordered improvement recommendations. Empty means nothing left to do.
    pub roadmap: Vec<String>,

    /// Unmodeled top-level keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Why a response body is not a usable report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The body is not JSON of the report shape.
    #[error("invalid report JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// `repoName` was empty or whitespace.
    #[error("report has an empty repoName")]
    EmptyRepoName,

    /// `score` exceeded [`MAX_SCORE`].
    #[error("report score {0} exceeds {max}", max = MAX_SCORE)]
    ScoreOutOfRange(u32),
}

impl AnalysisReport {
    /// Parses a report from a JSON body and checks the report contract.
    pub fn from_json(body: &str) -> Result<Self, ReportError> {
        let report: AnalysisReport = serde_json::from_str(body)?;
        report.validate()?;
        Ok(report)
    }

    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.repo_name.trim().is_empty() {
            return Err(ReportError::EmptyRepoName);
        }
        if self.score > MAX_SCORE {
            return Err(ReportError::ScoreOutOfRange(self.score));
        }
        Ok(())
    }

    /// Returns true if the roadmap has no remaining recommendations.
    pub fn is_roadmap_complete(&self) -> bool {
        self.roadmap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "repoName": "octocat/Hello-World",
        "score": 85,
        "summary": "Solid project",
        "roadmap": ["Add CI"],
        "details": {
            "stars": 10, "forks": 2, "open_issues": 1,
            "hasReadme": true, "hasLicense": false,
            "hasWorkflows": false, "hasTests": true, "recentCommits": 3
        }
    }"#;

    #[test]
    fn test_parse_minimal_report() {
        let report = AnalysisReport::from_json(SAMPLE).unwrap();
        assert_eq!(report.repo_name, "octocat/Hello-World");
        assert_eq!(report.score, 85);
        assert_eq!(report.details.open_issues, 1);
        assert!(report.details.has_readme);
        assert!(!report.details.has_license);
        assert_eq!(report.details.recent_commits, 3);
        assert!(report.category_scores.is_empty());
        assert!(report.tech_stack.is_empty());
        assert!(report.description.is_none());
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let report = AnalysisReport::from_json(SAMPLE).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["repoName"], "octocat/Hello-World");
        assert_eq!(value["details"]["hasTests"], true);
        assert_eq!(value["details"]["open_issues"], 1);
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_missing_details_is_rejected() {
        let body = r#"{"repoName":"a/b","score":50,"summary":"x","roadmap":[]}"#;
        let err = AnalysisReport::from_json(body).unwrap_err();
        assert!(matches!(err, ReportError::Json(_)));
    }

    #[test]
    fn test_empty_repo_name_is_rejected() {
        let body = SAMPLE.replace("octocat/Hello-World", " ");
        let err = AnalysisReport::from_json(&body).unwrap_err();
        assert!(matches!(err, ReportError::EmptyRepoName));
        assert!(err.to_string().contains("repoName"));
    }

    #[test]
    fn test_score_above_max_is_rejected() {
        let body = SAMPLE.replace("85", "140");
        let err = AnalysisReport::from_json(&body).unwrap_err();
        assert!(matches!(err, ReportError::ScoreOutOfRange(140)));
        assert_eq!(err.to_string(), "report score 140 exceeds 100");
    }

    #[test]
    fn test_omitted_flags_default_to_false() {
        let body = r#"{
            "repoName": "octocat/unlicensed", "score": 40, "summary": "s", "roadmap": [],
            "details": {"stars": 1, "forks": 0, "open_issues": 0, "prs": 3}
        }"#;
        let report = AnalysisReport::from_json(body).unwrap();
        assert!(!report.details.has_readme);
        assert!(!report.details.has_license);
        assert!(!report.details.has_workflows);
        assert!(!report.details.has_tests);
    }

    #[test]
    fn test_unknown_keys_survive_serialization() {
        let body = r#"{
            "repoName": "a/b", "score": 70, "summary": "s", "roadmap": [],
            "lastAnalyzed": "2024-05-01",
            "details": {"stars": 1, "forks": 0, "open_issues": 0, "hasLicense": true, "prs": 3}
        }"#;
        let report = AnalysisReport::from_json(body).unwrap();
        assert_eq!(report.details.extra["prs"], 3);
        assert_eq!(report.extra["lastAnalyzed"], "2024-05-01");

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["details"]["prs"], 3);
        assert_eq!(value["lastAnalyzed"], "2024-05-01");
        assert!(value["details"].get("extra").is_none());
    }

    #[test]
    fn test_category_scores_keep_wire_order() {
        let body = SAMPLE.replace(
            r#""roadmap""#,
            r#""categoryScores": {"Testing": 5, "Documentation": 20, "CI/CD": 12}, "roadmap""#,
        );
        let report = AnalysisReport::from_json(&body).unwrap();
        let names: Vec<_> = report.category_scores.keys().map(String::as_str).collect();
        assert_eq!(names, ["Testing", "Documentation", "CI/CD"]);

        let json = serde_json::to_string(&report).unwrap();
        let testing = json.find("Testing").unwrap();
        let ci = json.find("CI/CD").unwrap();
        assert!(testing < ci);
    }

    #[test]
    fn test_empty_roadmap_is_complete() {
        let body = SAMPLE.replace(r#"["Add CI"]"#, "[]");
        let report = AnalysisReport::from_json(&body).unwrap();
        assert!(report.is_roadmap_complete());
    }
}
