//! Filepath: src/core/related.rs
//! Related-item scorer: tag overlap weighted by category, plus small
//! attribute bonuses, with a fixed exclusion threshold and display cap.

use serde::Serialize;

use crate::core::model::{Category, Entry};
use crate::core::text::compare_titles;

/// Default cap on the related list
pub const DEFAULT_RELATED_LIMIT: usize = 6;

/// Display-only strength label derived from the raw score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Affinity
{
    High,
    Medium,
    Low,
}

impl Affinity
{
    pub fn from_score(score: u32) -> Self
    {
        if score >= 6
        {
            Affinity::High
        }
        else if score >= 3
        {
            Affinity::Medium
        }
        else
        {
            Affinity::Low
        }
    }

    pub fn as_str(&self) -> &'static str
    {
        match self
        {
            Affinity::High => "high",
            Affinity::Medium => "medium",
            Affinity::Low => "low",
        }
    }
}

/// One related candidate with its scoring breakdown
#[derive(Debug, Clone, Serialize)]
pub struct RelatedEntry
{
    pub entry: Entry,
    pub score: u32,
    pub tag_matches: usize,
    pub affinity: Affinity,
}

/// Tag weight per category: spots lean hardest on shared tags.
fn tag_weight(category: Category) -> u32
{
    match category
    {
        Category::Spots => 3,
        Category::Stories | Category::Uma => 2,
    }
}

/// Raw similarity score and tag-match count for one candidate.
fn score_candidate(
    focal: &Entry,
    candidate: &Entry,
) -> (u32, usize)
{
    let tag_matches = candidate
        .tags
        .iter()
        .filter(|t| focal.tags.contains(t))
        .count();

    let mut score = tag_matches as u32 * tag_weight(focal.category);

    if focal.kind.is_some() && focal.kind == candidate.kind
    {
        score += 2;
    }

    if focal.place().is_some() && focal.place() == candidate.place()
    {
        score += 1;
    }

    if let (Some(a), Some(b)) = (focal.danger, candidate.danger)
        && a.abs_diff(b) <= 1
    {
        score += 1;
    }

    // Spots and stories compare credibility; uma compares evidence strength.
    let rank_match = match focal.category
    {
        Category::Spots | Category::Stories =>
        {
            focal.credibility.is_some() && focal.credibility == candidate.credibility
        }
        Category::Uma =>
        {
            focal.evidence_rank.is_some() && focal.evidence_rank == candidate.evidence_rank
        }
    };
    if rank_match
    {
        score += 1;
    }

    (score, tag_matches)
}

/// Related items for `focal` drawn from `candidates`, best first.
///
/// Candidates scoring below 1 and the focal record itself are dropped; the
/// result is capped at `limit`.
pub fn related_entries(
    focal: &Entry,
    candidates: &[Entry],
    limit: usize,
) -> Vec<RelatedEntry>
{
    let mut scored: Vec<RelatedEntry> = candidates
        .iter()
        .filter(|c| c.slug != focal.slug)
        .filter_map(|c| {
            let (score, tag_matches) = score_candidate(focal, c);
            (score >= 1).then(|| RelatedEntry {
                entry: c.clone(),
                score,
                tag_matches,
                affinity: Affinity::from_score(score),
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| (b.tag_matches >= 1).cmp(&(a.tag_matches >= 1)))
            .then_with(|| b.tag_matches.cmp(&a.tag_matches))
            .then_with(|| b.entry.danger_level().cmp(&a.entry.danger_level()))
            .then_with(|| compare_titles(&a.entry.title, &b.entry.title))
    });

    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::core::model::Status;

    fn entry(
        slug: &str,
        category: Category,
        tags: &[&str],
        kind: Option<&str>,
        place: Option<&str>,
        danger: Option<u8>,
    ) -> Entry
    {
        Entry {
            id: format!("{category}-{slug}"),
            slug: slug.to_string(),
            title: format!("{slug} の記録"),
            summary: "概要".to_string(),
            body: "本文".to_string(),
            content: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            published_at: "2026-01-01".to_string(),
            updated_at: None,
            status: Status::Published,
            category,
            cover_image: None,
            images: None,
            embeds: None,
            video_urls: None,
            pref: (category == Category::Spots)
                .then(|| place.map(str::to_string))
                .flatten(),
            region: (category != Category::Spots)
                .then(|| place.map(str::to_string))
                .flatten(),
            kind: kind.map(str::to_string),
            credibility: None,
            existence_rank: None,
            evidence_rank: None,
            danger,
            views: None,
            created_at: None,
            source: None,
            caution: None,
        }
    }

    #[test]
    fn focal_record_is_excluded()
    {
        let focal = entry("same", Category::Spots, &["廃墟"], None, None, None);
        let pool = vec![focal.clone()];

        assert!(related_entries(&focal, &pool, DEFAULT_RELATED_LIMIT).is_empty());
    }

    #[test]
    fn zero_overlap_candidates_are_dropped()
    {
        let focal = entry("focal", Category::Spots, &["廃墟"], Some("廃墟"), Some("群馬県"), Some(3));
        let unrelated = entry("other", Category::Spots, &["湖"], Some("湖沼"), Some("沖縄県"), None);

        assert!(related_entries(&focal, &[unrelated], DEFAULT_RELATED_LIMIT).is_empty());
    }

    #[test]
    fn attribute_only_candidate_scores_exactly_one_and_survives()
    {
        let focal = entry("focal", Category::Spots, &["廃墟"], None, Some("群馬県"), None);
        // No shared tags, no type, no danger: only the shared prefecture.
        let near = entry("near", Category::Spots, &["湖"], None, Some("群馬県"), None);

        let related = related_entries(&focal, &[near], DEFAULT_RELATED_LIMIT);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].score, 1);
        assert_eq!(related[0].affinity, Affinity::Low);
    }

    #[test]
    fn danger_within_one_adds_a_point()
    {
        let focal = entry("focal", Category::Spots, &["廃墟"], None, None, Some(3));
        let close = entry("close", Category::Spots, &["廃墟"], None, None, Some(4));
        let far = entry("far", Category::Spots, &["廃墟"], None, None, Some(5));

        let related = related_entries(&focal, &[close.clone(), far], DEFAULT_RELATED_LIMIT);
        assert_eq!(related[0].entry.slug, "close");
        assert_eq!(related[0].score, related[1].score + 1);
    }

    #[test]
    fn spots_weigh_tags_at_three()
    {
        let focal = entry("focal", Category::Spots, &["廃墟", "病院"], None, None, None);
        let twin = entry("twin", Category::Spots, &["廃墟", "病院"], None, None, None);

        let related = related_entries(&focal, &[twin], DEFAULT_RELATED_LIMIT);
        assert_eq!(related[0].score, 6);
        assert_eq!(related[0].affinity, Affinity::High);
    }

    #[test]
    fn uma_rank_axis_is_evidence_strength()
    {
        let mut focal = entry("focal", Category::Uma, &["目撃"], None, None, None);
        focal.evidence_rank = Some("B".to_string());
        let mut peer = entry("peer", Category::Uma, &["目撃"], None, None, None);
        peer.evidence_rank = Some("B".to_string());

        let related = related_entries(&focal, &[peer], DEFAULT_RELATED_LIMIT);
        // 1 tag * 2 + 1 rank match + ... = 3, still below high.
        assert_eq!(related[0].score, 3);
        assert_eq!(related[0].affinity, Affinity::Medium);
    }

    #[test]
    fn tag_backed_match_outranks_attribute_pile_on_ties()
    {
        let focal = entry("focal", Category::Uma, &["目撃"], Some("獣型"), Some("東北"), None);
        // 1 tag * 2 = 2.
        let tagged = entry("tagged", Category::Uma, &["目撃"], None, None, None);
        // Type match alone = 2, same raw score but no tag backing.
        let piled = entry("piled", Category::Uma, &["湖"], Some("獣型"), None, None);

        let related = related_entries(&focal, &[piled, tagged], DEFAULT_RELATED_LIMIT);
        assert_eq!(related[0].entry.slug, "tagged");
    }

    #[test]
    fn list_is_capped_at_limit()
    {
        let focal = entry("focal", Category::Spots, &["廃墟"], None, None, None);
        let pool: Vec<Entry> = (0..10)
            .map(|i| entry(&format!("c{i}"), Category::Spots, &["廃墟"], None, None, None))
            .collect();

        assert_eq!(related_entries(&focal, &pool, DEFAULT_RELATED_LIMIT).len(), 6);
        assert_eq!(related_entries(&focal, &pool, 3).len(), 3);
    }

    #[test]
    fn tagless_focal_yields_attribute_matches_or_nothing()
    {
        let focal = entry("focal", Category::Stories, &[], Some("儀式"), None, None);
        let by_type = entry("by-type", Category::Stories, &["鏡"], Some("儀式"), None, None);
        let nothing = entry("nothing", Category::Stories, &["鏡"], Some("人形"), None, None);

        let related = related_entries(&focal, &[by_type, nothing], DEFAULT_RELATED_LIMIT);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].entry.slug, "by-type");
    }
}
