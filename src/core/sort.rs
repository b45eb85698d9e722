//! Filepath: src/core/sort.rs
//! Multi-key sort and the weighted recommend score.
//!
//! Every comparator is total, so the sort can never panic or produce an
//! order that depends on the input permutation beyond documented ties.
//! Scores and derived keys are computed once per invocation against a single
//! reference date (decorate-sort-undecorate), so a sort that spans midnight
//! cannot interleave two freshness baselines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::model::Entry;
use crate::core::text::compare_titles;

/// Days during which a record still earns freshness weight
pub const FRESH_WINDOW_DAYS: i64 = 30;

/// Both rank axes must reach this score for the synergy bonus
pub const BONUS_THRESHOLD: u8 = 4;

/// Available sort orders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey
{
    #[default]
    Recommend,
    Danger,
    Credibility,
    Pref,
    ExistenceRank,
    EvidenceRank,
    Newest,
}

impl SortKey
{
    /// Parse a CLI/config value; unknown values degrade to the default with
    /// a warning instead of failing the command.
    pub fn parse(raw: Option<&str>) -> Self
    {
        match raw
        {
            None => SortKey::Recommend,
            Some(s) => match s
            {
                "" | "recommend" => SortKey::Recommend,
                "danger" => SortKey::Danger,
                "credibility" => SortKey::Credibility,
                "pref" | "region" => SortKey::Pref,
                "existence_rank" | "existence" => SortKey::ExistenceRank,
                "evidence_rank" | "evidence" => SortKey::EvidenceRank,
                "newest" => SortKey::Newest,
                other =>
                {
                    tracing::warn!(value = other, "unknown sort key, using recommend");
                    SortKey::Recommend
                }
            },
        }
    }
}

/// Weighted recommend score for a rank-carrying record.
///
/// existence*0.35 + evidence*0.25 + danger*0.20 + log10(views+1)*0.10
/// + freshness*0.10 + 0.3 synergy bonus when both rank axes are >= 4.
pub fn recommend_score(
    entry: &Entry,
    today: NaiveDate,
) -> f64
{
    let existence = entry.existence_score();
    let evidence = entry.evidence_score();

    let base = f64::from(existence) * 0.35
        + f64::from(evidence) * 0.25
        + f64::from(entry.danger_level()) * 0.20;

    let views = entry.views.unwrap_or(0) as f64;
    let view_score = (views + 1.0).log10() * 0.10;

    let fresh = entry
        .created_at
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .map(|created| {
            let days = today.signed_duration_since(created).num_days();
            (FRESH_WINDOW_DAYS - days).max(0) as f64 / FRESH_WINDOW_DAYS as f64 * 0.10
        })
        .unwrap_or(0.0);

    let bonus = if existence >= BONUS_THRESHOLD && evidence >= BONUS_THRESHOLD
    {
        0.3
    }
    else
    {
        0.0
    };

    base + view_score + fresh + bonus
}

/// Precomputed sort keys for one record
struct SortMeta
{
    recommend: Option<f64>,
    credibility: u8,
    existence: u8,
    evidence: u8,
    danger: u8,
    place: String,
    created: String,
}

impl SortMeta
{
    fn build(
        entry: &Entry,
        today: NaiveDate,
    ) -> Self
    {
        SortMeta {
            recommend: entry
                .has_rank_axes()
                .then(|| recommend_score(entry, today)),
            credibility: entry.credibility_score(),
            existence: entry.existence_score(),
            evidence: entry.evidence_score(),
            danger: entry.danger_level(),
            place: entry
                .place()
                .unwrap_or("未設定")
                .to_string(),
            created: entry
                .created_at
                .clone()
                .unwrap_or_default(),
        }
    }
}

fn by_newest(
    a: &SortMeta,
    b: &SortMeta,
) -> std::cmp::Ordering
{
    // Lexicographic on ISO dates; missing created_at is the empty string and
    // therefore sorts last under descending order.
    b.created.cmp(&a.created)
}

fn compare(
    key: SortKey,
    a: (&Entry, &SortMeta),
    b: (&Entry, &SortMeta),
) -> std::cmp::Ordering
{
    let (ea, ma) = a;
    let (eb, mb) = b;

    match key
    {
        SortKey::Danger => mb
            .danger
            .cmp(&ma.danger)
            .then_with(|| compare_titles(&ea.title, &eb.title)),

        SortKey::Credibility => mb
            .credibility
            .cmp(&ma.credibility)
            .then_with(|| mb.danger.cmp(&ma.danger))
            .then_with(|| compare_titles(&ea.title, &eb.title)),

        SortKey::Pref => compare_titles(&ma.place, &mb.place)
            .then_with(|| compare_titles(&ea.title, &eb.title)),

        SortKey::ExistenceRank => mb
            .existence
            .cmp(&ma.existence)
            .then_with(|| by_newest(ma, mb))
            .then_with(|| compare_titles(&ea.title, &eb.title)),

        SortKey::EvidenceRank => mb
            .evidence
            .cmp(&ma.evidence)
            .then_with(|| by_newest(ma, mb))
            .then_with(|| compare_titles(&ea.title, &eb.title)),

        SortKey::Newest => by_newest(ma, mb)
            .then_with(|| compare_titles(&ea.title, &eb.title)),

        SortKey::Recommend => match (ma.recommend, mb.recommend)
        {
            (Some(sa), Some(sb)) => sb
                .total_cmp(&sa)
                .then_with(|| by_newest(ma, mb))
                .then_with(|| compare_titles(&ea.title, &eb.title)),
            // Rank carriers rank ahead of composite-fallback records.
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => mb
                .credibility
                .cmp(&ma.credibility)
                .then_with(|| mb.danger.cmp(&ma.danger))
                .then_with(|| compare_titles(&ea.title, &eb.title)),
        },
    }
}

/// Sort a dataset in place by the given key, computing every derived score
/// once against `today`.
pub fn sort_entries(
    entries: &mut Vec<Entry>,
    key: SortKey,
    today: NaiveDate,
)
{
    let mut decorated: Vec<(Entry, SortMeta)> = entries
        .drain(..)
        .map(|e| {
            let meta = SortMeta::build(&e, today);
            (e, meta)
        })
        .collect();

    decorated.sort_by(|(ea, ma), (eb, mb)| compare(key, (ea, ma), (eb, mb)));

    entries.extend(decorated.into_iter().map(|(e, _)| e));
}
