//! Filepath: src/core/filter.rs
//! Client-side filter engine: an explicit criteria bundle AND-composed over
//! the dataset. All dimensions are pure predicates; the output is a stable
//! subset of the input order.

use serde::Serialize;

use crate::core::model::Entry;
use crate::core::text::haystack_contains;

/// One exact-match dimension. `All` is the "no constraint" sentinel the
/// original UI spells as the string "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum Selection
{
    #[default]
    All,
    Value(String),
}

impl Selection
{
    /// Parse a CLI/URL value; `None`, empty, and `"all"` mean no constraint.
    pub fn parse(raw: Option<&str>) -> Self
    {
        match raw
        {
            None => Selection::All,
            Some(s) if s.is_empty() || s == "all" => Selection::All,
            Some(s) => Selection::Value(s.to_string()),
        }
    }

    fn matches(
        &self,
        field: Option<&str>,
    ) -> bool
    {
        match self
        {
            Selection::All => true,
            // A record with the field absent never matches a concrete value.
            Selection::Value(want) => field == Some(want.as_str()),
        }
    }
}

/// Danger-level policy. A selected level 1..=4 means "at least", while 5
/// means exactly 5; both behaviors were live in the original UI and are kept
/// as explicit variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum DangerFilter
{
    #[default]
    All,
    AtLeast(u8),
    Exactly5,
}

impl DangerFilter
{
    pub fn parse(raw: Option<&str>) -> Self
    {
        match raw
        {
            None => DangerFilter::All,
            Some(s) if s.is_empty() || s == "all" => DangerFilter::All,
            Some("5") => DangerFilter::Exactly5,
            Some(s) => match s.parse::<u8>()
            {
                Ok(n @ 1..=4) => DangerFilter::AtLeast(n),
                _ =>
                {
                    tracing::warn!(value = s, "unrecognized danger filter, treating as all");
                    DangerFilter::All
                }
            },
        }
    }

    fn matches(
        &self,
        danger: Option<u8>,
    ) -> bool
    {
        let level = danger.unwrap_or(0);

        match self
        {
            DangerFilter::All => true,
            DangerFilter::AtLeast(n) => level >= *n,
            DangerFilter::Exactly5 => level == 5,
        }
    }
}

/// Immutable criteria bundle; every dimension defaults to "no constraint".
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterCriteria
{
    pub query: String,
    pub pref: Selection,
    pub region: Selection,
    pub kind: Selection,
    pub tags: Vec<String>,
    pub danger: DangerFilter,
    pub credibility: Selection,
    pub existence_rank: Selection,
    pub evidence_rank: Selection,
}

impl FilterCriteria
{
    pub fn is_unfiltered(&self) -> bool
    {
        self.query.trim().is_empty()
            && self.pref == Selection::All
            && self.region == Selection::All
            && self.kind == Selection::All
            && self.tags.is_empty()
            && self.danger == DangerFilter::All
            && self.credibility == Selection::All
            && self.existence_rank == Selection::All
            && self.evidence_rank == Selection::All
    }
}

/// Whether one record survives every dimension of the criteria.
pub fn matches_entry(
    entry: &Entry,
    criteria: &FilterCriteria,
) -> bool
{
    let mut fields: Vec<&str> = vec![entry.title.as_str(), entry.summary.as_str()];
    fields.extend(entry.pref.as_deref());
    fields.extend(entry.region.as_deref());
    fields.extend(entry.kind.as_deref());
    fields.extend(entry.tags.iter().map(String::as_str));

    if !haystack_contains(&fields, &criteria.query)
    {
        return false;
    }

    if !criteria.pref.matches(entry.pref.as_deref())
    {
        return false;
    }

    if !criteria.region.matches(entry.region.as_deref())
    {
        return false;
    }

    if !criteria.kind.matches(entry.kind.as_deref())
    {
        return false;
    }

    // AND-subset: every selected tag must be on the record.
    if !criteria
        .tags
        .iter()
        .all(|t| entry.tags.iter().any(|have| have == t))
    {
        return false;
    }

    if !criteria.danger.matches(entry.danger)
    {
        return false;
    }

    criteria.credibility.matches(entry.credibility.as_deref())
        && criteria
            .existence_rank
            .matches(entry.existence_rank.as_deref())
        && criteria
            .evidence_rank
            .matches(entry.evidence_rank.as_deref())
}

/// Filter a dataset, cloning the survivors in input order.
pub fn filter_entries(
    entries: &[Entry],
    criteria: &FilterCriteria,
) -> Vec<Entry>
{
    entries
        .iter()
        .filter(|e| matches_entry(e, criteria))
        .cloned()
        .collect()
}
