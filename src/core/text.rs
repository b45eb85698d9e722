//! Filepath: src/core/text.rs
//! Small text helpers shared by the engines: collation keys for Japanese
//! titles, tolerant date parsing, and the query haystack predicate.

use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;

/// Collation key: NFKC normalization followed by lowercasing.
///
/// Folds full-width/compatibility variants so that ＡＢＣ and abc compare
/// equal, which covers the variants that actually occur in the datasets.
pub fn collation_key(s: &str) -> String
{
    s.nfkc()
        .collect::<String>()
        .to_lowercase()
}

/// Total order over titles: normalized key first, raw string as the
/// tie-break so distinct strings never compare equal.
pub fn compare_titles(
    a: &str,
    b: &str,
) -> std::cmp::Ordering
{
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Parse an ISO `YYYY-MM-DD` date, degrading to the epoch on absence or
/// malformed input so sort paths stay total.
pub fn date_or_epoch(raw: Option<&str>) -> NaiveDate
{
    raw.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default())
}

/// Case-insensitive substring match of `needle` against the joined fields.
/// An empty or whitespace-only needle matches everything.
pub fn haystack_contains(
    fields: &[&str],
    needle: &str,
) -> bool
{
    let needle = needle.trim().to_lowercase();

    if needle.is_empty()
    {
        return true;
    }

    fields
        .join(" ")
        .to_lowercase()
        .contains(&needle)
}
