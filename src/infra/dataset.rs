//! Filepath: src/infra/dataset.rs
//! JSON dataset loading: one file per category, each an array of records.
//!
//! Parsing is per record so a single malformed object becomes one
//! `Violation::Malformed` instead of sinking the whole file; the validator
//! surfaces those alongside its own findings.

use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::core::model::{Category, Entry};
use crate::core::text::date_or_epoch;
use crate::core::validate::Violation;

/// Records that parsed plus the per-record parse failures
pub struct LoadedDataset
{
    pub entries: Vec<Entry>,
    pub violations: Vec<Violation>,
}

/// Load `<dir>/<category>.json`.
pub fn load_category(
    dir: &Path,
    category: Category,
) -> Result<LoadedDataset>
{
    let path = dir.join(category.dataset_file());
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;

    let items: Vec<serde_json::Value> = serde_json::from_str(&raw)
        .with_context(|| format!("Dataset {} is not a JSON array", path.display()))?;

    let mut entries = Vec::with_capacity(items.len());
    let mut violations = Vec::new();

    for (index, item) in items.into_iter().enumerate()
    {
        match serde_json::from_value::<Entry>(item)
        {
            Ok(entry) => entries.push(entry),
            Err(err) => violations.push(Violation::Malformed {
                dataset: category.as_str().to_string(),
                index,
                detail: err.to_string(),
            }),
        }
    }

    tracing::debug!(
        category = %category,
        records = entries.len(),
        malformed = violations.len(),
        "loaded dataset"
    );

    Ok(LoadedDataset { entries, violations })
}

/// Keep only published records.
pub fn published(entries: Vec<Entry>) -> Vec<Entry>
{
    entries
        .into_iter()
        .filter(Entry::is_published)
        .collect()
}

pub fn find_by_slug<'a>(
    entries: &'a [Entry],
    slug: &str,
) -> Option<&'a Entry>
{
    entries
        .iter()
        .find(|e| e.slug == slug)
}

/// Newest `limit` records by publication date, merged across categories.
pub fn latest_entries(
    entries: Vec<Entry>,
    limit: usize,
) -> Vec<Entry>
{
    entries
        .into_iter()
        .sorted_by(|a, b| {
            date_or_epoch(Some(&b.published_at))
                .cmp(&date_or_epoch(Some(&a.published_at)))
                .then_with(|| a.slug.cmp(&b.slug))
        })
        .take(limit)
        .collect()
}
