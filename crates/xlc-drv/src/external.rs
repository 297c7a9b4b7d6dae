//! Wire shapes for the two remote collaborators (spec.md §6).
//!
//! Both are documented here only as serde request/response records —
//! no HTTP client lives in this crate. Issuing the request, awaiting
//! the response, and deciding what to do with it (substituting
//! corrected code, surfacing a sandbox failure) is the host
//! application's job; this crate only fixes the shape the wire is
//! expected to carry so a host can serialize/deserialize against it
//! without re-deriving the contract.

use serde::{Deserialize, Serialize};

/// `language_id`/`version` pair the sandbox collaborator expects for a
/// given target tag (spec.md §6: "a fixed mapping").
pub fn sandbox_language(tag: &str) -> Option<(&'static str, &'static str)> {
    match tag {
        "scripting" => Some(("python", "3.x")),
        "c-family" => Some(("c", "10.x")),
        "cpp-family" => Some(("c++", "10.x")),
        "class-based" => Some(("java", "15.x")),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxFile {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxRequest {
    pub language_id: String,
    pub version: String,
    pub files: Vec<SandboxFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxRunResult {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxCompileResult {
    pub stderr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxResponse {
    pub run: SandboxRunResult,
    pub compile: SandboxCompileResult,
}

/// Per-target outcome the host reports after awaiting all sandbox
/// requests in parallel. Exit code -1 denotes a transport failure
/// rather than anything the executed program itself produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub target: String,
    pub output: String,
    pub error: String,
    pub exit_code: i32,
}

impl ExecutionOutcome {
    pub fn transport_failure(target: impl Into<String>, error: impl Into<String>) -> Self {
        Self { target: target.into(), output: String::new(), error: error.into(), exit_code: -1 }
    }
}

/// One per-target request to the review collaborator: the original
/// source, the translated text, and both language tags, issued
/// sequentially with a small inter-request delay to respect rate
/// limits (spec.md §6) — pacing is the host's concern, not this
/// struct's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub source_text: String,
    pub translated_text: String,
    pub source_tag: String,
    pub target_tag: String,
}

/// The JSON object a host extracts from the review collaborator's free
/// text response by matching the first brace-balanced substring. On
/// parse failure the host keeps `corrected_code` equal to the
/// untouched translated text and `issues` empty — never re-entering
/// the parser with the correction (spec.md §5, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub corrected_code: String,
    #[serde(default)]
    pub issues: Vec<String>,
}

impl ReviewResponse {
    pub fn unreviewed(translated_text: impl Into<String>) -> Self {
        Self { corrected_code: translated_text.into(), issues: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_language_mapping_matches_fixed_table() {
        assert_eq!(sandbox_language("scripting"), Some(("python", "3.x")));
        assert_eq!(sandbox_language("c-family"), Some(("c", "10.x")));
        assert_eq!(sandbox_language("cpp-family"), Some(("c++", "10.x")));
        assert_eq!(sandbox_language("class-based"), Some(("java", "15.x")));
        assert_eq!(sandbox_language("unknown"), None);
    }

    #[test]
    fn review_response_round_trips_through_json() {
        let resp = ReviewResponse { corrected_code: "x = 1".into(), issues: vec!["unused var".into()] };
        let text = serde_json::to_string(&resp).unwrap();
        let back: ReviewResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(back.corrected_code, "x = 1");
        assert_eq!(back.issues, vec!["unused var".to_string()]);
    }

    #[test]
    fn review_response_defaults_issues_when_absent() {
        let back: ReviewResponse = serde_json::from_str("{\"corrected_code\":\"y = 2\"}").unwrap();
        assert!(back.issues.is_empty());
    }
}
