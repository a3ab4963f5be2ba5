//! Benchmark dataset → evaluation image list
//!
//! Reads a dataset JSONL (one task instance per line), applies the
//! task type / language / scenario filters and resolves every instance to
//! the Docker image its evaluation runs in.

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;
use tracing::{info, warn};

use crate::error::DatasetError;
use crate::image::ImageRef;

/// Filter value that disables a filter
pub const FILTER_ALL: &str = "ALL";

const FIELD_TASK_TYPES: &str = "task_types";
const FIELD_LANGUAGES: &str = "programming_languages";
const FIELD_SCENARIOS: &str = "programming_scenarios";

/// Field filters. `None` accepts every value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetFilter {
    pub task_types: Option<HashSet<String>>,
    pub programming_languages: Option<HashSet<String>>,
    pub programming_scenarios: Option<HashSet<String>>,
}

impl DatasetFilter {
    pub fn new(task_types: &str, programming_languages: &str, programming_scenarios: &str) -> Self {
        Self {
            task_types: parse_filter(task_types),
            programming_languages: parse_filter(programming_languages),
            programming_scenarios: parse_filter(programming_scenarios),
        }
    }

    pub fn matches(&self, item: &Value) -> bool {
        field_matches(item, FIELD_TASK_TYPES, &self.task_types)
            && field_matches(item, FIELD_LANGUAGES, &self.programming_languages)
            && field_matches(item, FIELD_SCENARIOS, &self.programming_scenarios)
    }
}

/// Parse a comma-separated filter; empty or `ALL` (any case) means no filter
pub fn parse_filter(value: &str) -> Option<HashSet<String>> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(FILTER_ALL) {
        return None;
    }
    Some(
        value.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

fn field_matches(item: &Value, field: &str, allowed: &Option<HashSet<String>>) -> bool {
    match allowed {
        None => true,
        Some(set) => field_text(item, field).is_some_and(|v| set.contains(&v)),
    }
}

fn field_text(item: &Value, field: &str) -> Option<String> {
    match item.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Where an instance's evaluation image comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// SWE-bench style per-instance image under the given Docker Hub namespace
    SweBench { namespace: &'static str },
    /// Shared per-repository SWE-Compass image
    SweCompass,
}

impl ImageSource {
    pub fn from_source(source: Option<&str>) -> Self {
        match source {
            Some("swe-bench-verified") | Some("swe-bench-multilingual") => Self::SweBench {
                namespace: "swebench",
            },
            Some("swe-bench-live") => Self::SweBench {
                namespace: "starryzhang",
            },
            Some("swe-Rebench") => Self::SweBench {
                namespace: "swerebench",
            },
            _ => Self::SweCompass,
        }
    }
}

/// Resolve the evaluation image of one dataset instance
pub fn resolve_image(item: &Value) -> Result<ImageRef, String> {
    let source = item.get("source").and_then(Value::as_str);

    let reference = match ImageSource::from_source(source) {
        ImageSource::SweBench { namespace } => {
            let instance_id = item
                .get("instance_id")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| "missing instance_id".to_string())?;
            format!(
                "{}/sweb.eval.x86_64.{}:latest",
                namespace,
                instance_id.replace("__", "_1776_").to_lowercase()
            )
        }
        ImageSource::SweCompass => {
            let repo_key = item
                .get("repo_key")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| "missing repo_key".to_string())?;
            format!("swecompass/eval:{}", repo_key)
        }
    };

    ImageRef::parse(&reference)
}

/// Result of scanning a dataset
#[derive(Debug, Clone, Default)]
pub struct ImageListReport {
    /// Non-blank instances read
    pub total: usize,
    /// Instances that passed the filters
    pub matched: usize,
    /// Matched instances whose image could not be resolved
    pub unresolved: usize,
    /// Unique images, in first-seen order
    pub images: Vec<ImageRef>,
    pub by_language: IndexMap<String, usize>,
    pub by_scenario: IndexMap<String, usize>,
    pub by_task_type: IndexMap<String, usize>,
}

impl ImageListReport {
    fn count(&mut self, item: &Value) {
        for (field, counter) in [
            (FIELD_LANGUAGES, &mut self.by_language),
            (FIELD_SCENARIOS, &mut self.by_scenario),
            (FIELD_TASK_TYPES, &mut self.by_task_type),
        ] {
            let key = field_text(item, field).unwrap_or_else(|| "unknown".to_string());
            *counter.entry(key).or_default() += 1;
        }
    }

    /// Log the scan result
    pub fn log(&self) {
        if self.matched == 0 {
            warn!("No instances passed the filter criteria ({} read)", self.total);
            return;
        }

        info!(
            "Dataset scan: {} instances, {} matched, {} unresolved, {} unique images",
            self.total,
            self.matched,
            self.unresolved,
            self.images.len()
        );
        for (title, counter) in [
            ("language", &self.by_language),
            ("scenario", &self.by_scenario),
            ("task type", &self.by_task_type),
        ] {
            for (key, count) in counter {
                info!("  {} {}: {}", title, key, count);
            }
        }
    }
}

/// Scan a dataset file
pub fn collect_images(path: &Path, filter: &DatasetFilter) -> Result<ImageListReport, DatasetError> {
    if !path.is_file() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    collect_images_from_reader(std::io::BufReader::new(file), filter)
}

/// Scan dataset JSONL from any reader
pub fn collect_images_from_reader<R: BufRead>(
    reader: R,
    filter: &DatasetFilter,
) -> Result<ImageListReport, DatasetError> {
    let mut report = ImageListReport::default();
    let mut seen = HashSet::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item: Value = serde_json::from_str(&line).map_err(|source| DatasetError::Parse {
            line: idx + 1,
            source,
        })?;
        report.total += 1;

        if !filter.matches(&item) {
            continue;
        }
        report.matched += 1;
        report.count(&item);

        match resolve_image(&item) {
            Ok(image) => {
                if seen.insert(image.clone()) {
                    report.images.push(image);
                }
            }
            Err(reason) => {
                let id = item
                    .get("instance_id")
                    .and_then(Value::as_str)
                    .unwrap_or("<unknown>");
                warn!("Skipping instance {} (line {}): {}", id, idx + 1, reason);
                report.unresolved += 1;
            }
        }
    }

    Ok(report)
}
