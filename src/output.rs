//! Structured JSON output for scripting and piping.
//!
//! When `--json` is passed, these structures are serialized to stdout as a
//! single JSON object, replacing all human-readable output.

use std::path::Path;

use serde::Serialize;

use crate::cleaner::{ClearPlan, ClearResult};
use crate::config::DisplayOptions;
use crate::utils::DiskUsage;

/// Output of the `du` command.
#[derive(Debug, Serialize)]
pub struct JsonUsage {
    /// The measured directory.
    pub path: String,

    /// Raw totals.
    #[serde(flatten)]
    pub usage: DiskUsage,

    /// Human-readable allocated size (e.g. `"1 MiB"`).
    pub allocated_formatted: String,
}

/// One parsed size in the output of `parse-size`.
#[derive(Debug, Serialize)]
pub struct JsonParsedSize {
    /// The literal as given.
    pub text: String,

    /// Parsed byte count, absent on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,

    /// Error message, absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Output of the `clear` command.
#[derive(Debug, Serialize)]
pub struct JsonClear {
    /// `"dry_run"` or `"cleanup"`.
    pub mode: String,

    /// What was (or would be) removed.
    pub plan: ClearPlan,

    /// Human-readable planned size.
    pub total_size_formatted: String,

    /// Present only when something was actually removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<ClearResult>,
}

/// Output of the `mark` command.
#[derive(Debug, Serialize)]
pub struct JsonMark {
    /// Path of the marker file.
    pub path: String,

    /// Whether the marker was written; `false` if a `.gitignore` already existed.
    pub written: bool,
}

impl JsonUsage {
    /// Build the `du` output for `path`.
    #[must_use]
    pub fn new(path: &Path, usage: DiskUsage, display: &DisplayOptions) -> Self {
        Self {
            path: path.display().to_string(),
            usage,
            allocated_formatted: display.render(usage.allocated),
        }
    }
}

impl JsonMark {
    /// Build the `mark` output for the cache directory `dir`.
    #[must_use]
    pub fn new(dir: &Path, written: bool) -> Self {
        Self {
            path: crate::marker::marker_path(dir).display().to_string(),
            written,
        }
    }
}

impl JsonParsedSize {
    /// Build an entry from a parse outcome.
    #[must_use]
    pub fn from_result(text: &str, result: &crate::Result<u64>) -> Self {
        match result {
            Ok(bytes) => Self {
                text: text.to_string(),
                bytes: Some(*bytes),
                error: None,
            },
            Err(e) => Self {
                text: text.to_string(),
                bytes: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl JsonClear {
    /// Output for a dry run.
    #[must_use]
    pub fn dry_run(plan: ClearPlan, display: &DisplayOptions) -> Self {
        Self {
            mode: "dry_run".to_string(),
            total_size_formatted: display.render(plan.total_size()),
            plan,
            cleanup: None,
        }
    }

    /// Output after the plan was executed.
    #[must_use]
    pub fn cleanup(plan: ClearPlan, result: ClearResult, display: &DisplayOptions) -> Self {
        Self {
            mode: "cleanup".to_string(),
            total_size_formatted: display.render(plan.total_size()),
            plan,
            cleanup: Some(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::PlannedRemoval;
    use crate::error::DiskError;
    use std::path::PathBuf;

    fn sample_plan() -> ClearPlan {
        ClearPlan {
            root: PathBuf::from("/cache"),
            subdirs: vec![PlannedRemoval {
                path: PathBuf::from("/cache/func"),
                size: 4096,
            }],
            marker: None,
        }
    }

    #[test]
    fn test_usage_json_is_flat() {
        let usage = DiskUsage {
            allocated: 2048,
            apparent: 1000,
            files: 1,
            dirs: 1,
        };
        let out = JsonUsage::new(Path::new("/cache"), usage, &DisplayOptions::default());
        let value = serde_json::to_value(&out).unwrap();

        assert_eq!(value["path"], "/cache");
        assert_eq!(value["allocated"], 2048);
        assert_eq!(value["files"], 1);
        assert_eq!(value["allocated_formatted"], "2 KiB");
    }

    #[test]
    fn test_parsed_size_json() {
        let ok = JsonParsedSize::from_result("53K", &Ok(54_272));
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value["bytes"], 54_272);
        assert!(value.get("error").is_none());

        let err = JsonParsedSize::from_result(
            "fooG",
            &Err(DiskError::InvalidSize {
                text: "fooG".to_string(),
            }),
        );
        let value = serde_json::to_value(&err).unwrap();
        assert!(value.get("bytes").is_none());
        assert!(value["error"].as_str().unwrap().contains("fooG"));
    }

    #[test]
    fn test_mark_json() {
        let value = serde_json::to_value(JsonMark::new(Path::new("/cache"), true)).unwrap();

        assert_eq!(value["path"], "/cache/.gitignore");
        assert_eq!(value["written"], true);
    }

    #[test]
    fn test_clear_json_modes() {
        let display = DisplayOptions::default();

        let dry = serde_json::to_value(JsonClear::dry_run(sample_plan(), &display)).unwrap();
        assert_eq!(dry["mode"], "dry_run");
        assert!(dry.get("cleanup").is_none());
        assert_eq!(dry["plan"]["subdirs"][0]["size"], 4096);

        let result = ClearResult {
            removed_count: 1,
            total_freed: 4096,
            marker_removed: false,
        };
        let done =
            serde_json::to_value(JsonClear::cleanup(sample_plan(), result, &display)).unwrap();
        assert_eq!(done["mode"], "cleanup");
        assert_eq!(done["cleanup"]["removed_count"], 1);
        assert_eq!(done["total_size_formatted"], "4 KiB");
    }
}
