//! Filepath: src/core/model.rs
//! Typed record model for the three content categories (spots, stories, uma)
//! plus the fixed letter-grade score maps used by the ranking engines.
//!
//! Records are read-only at runtime: the loader builds them once from static
//! JSON/Markdown sources and the engines only ever borrow them. Rank fields
//! stay as raw strings so an out-of-vocabulary letter degrades to score 0 in
//! ranking instead of failing the whole parse; the validation gate is where
//! bad letters get reported.

use serde::{Deserialize, Serialize};

/// Content category discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category
{
    Spots,
    Stories,
    Uma,
}

impl Category
{
    pub fn as_str(&self) -> &'static str
    {
        match self
        {
            Category::Spots => "spots",
            Category::Stories => "stories",
            Category::Uma => "uma",
        }
    }

    /// Dataset file name inside the data directory
    pub fn dataset_file(&self) -> &'static str
    {
        match self
        {
            Category::Spots => "spots.json",
            Category::Stories => "stories.json",
            Category::Uma => "uma.json",
        }
    }

    pub const ALL: [Category; 3] = [Category::Spots, Category::Stories, Category::Uma];
}

impl std::fmt::Display for Category
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result
    {
        f.write_str(self.as_str())
    }
}

/// Publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status
{
    Draft,
    Published,
}

/// Attribution for a claim or sighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem
{
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Cover or gallery image descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMedia
{
    pub src: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Embedded third-party media
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EmbedMedia
{
    Youtube
    {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Tiktok
    {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

impl EmbedMedia
{
    pub fn url(&self) -> &str
    {
        match self
        {
            EmbedMedia::Youtube { url, .. } | EmbedMedia::Tiktok { url, .. } => url,
        }
    }
}

/// One catalog record. All three categories share this shape; the
/// category-specific fields are optional and the `category` discriminant
/// says which of them are meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry
{
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub tags: Vec<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub status: Status,
    pub category: Category,

    #[serde(rename = "coverImage", default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<ImageMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageMedia>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<EmbedMedia>>,
    #[serde(rename = "videoUrls", default, skip_serializing_if = "Option::is_none")]
    pub video_urls: Option<Vec<String>>,

    // Spots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pref: Option<String>,
    // Uma (required there, checked by the validator)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existence_rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub danger: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<SourceItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caution: Option<Vec<String>>,
}

// Letter-grade score maps. Fixed by the content schema; unknown or absent
// grades map to 0 so ranking stays total.

/// Credibility S..D -> 5..1
pub fn credibility_score(grade: Option<&str>) -> u8
{
    match grade
    {
        Some("S") => 5,
        Some("A") => 4,
        Some("B") => 3,
        Some("C") => 2,
        Some("D") => 1,
        _ => 0,
    }
}

/// Existence (scientific plausibility) S..D -> 5..1
pub fn existence_score(grade: Option<&str>) -> u8
{
    match grade
    {
        Some("S") => 5,
        Some("A") => 4,
        Some("B") => 3,
        Some("C") => 2,
        Some("D") => 1,
        _ => 0,
    }
}

/// Evidence strength A..E -> 5..1
pub fn evidence_score(grade: Option<&str>) -> u8
{
    match grade
    {
        Some("A") => 5,
        Some("B") => 4,
        Some("C") => 3,
        Some("D") => 2,
        Some("E") => 1,
        _ => 0,
    }
}

/// Valid letters for credibility and existence rank
pub const CREDIBILITY_GRADES: [&str; 5] = ["S", "A", "B", "C", "D"];

/// Valid letters for evidence rank
pub const EVIDENCE_GRADES: [&str; 5] = ["A", "B", "C", "D", "E"];

impl Entry
{
    pub fn credibility_score(&self) -> u8
    {
        credibility_score(self.credibility.as_deref())
    }

    pub fn existence_score(&self) -> u8
    {
        existence_score(self.existence_rank.as_deref())
    }

    pub fn evidence_score(&self) -> u8
    {
        evidence_score(self.evidence_rank.as_deref())
    }

    /// Danger level with absent treated as 0
    pub fn danger_level(&self) -> u8
    {
        self.danger.unwrap_or(0)
    }

    /// Geographic key: prefecture for spots, region for uma
    pub fn place(&self) -> Option<&str>
    {
        self.pref
            .as_deref()
            .or(self.region.as_deref())
    }

    pub fn is_published(&self) -> bool
    {
        self.status == Status::Published
    }

    /// Whether this record carries the uma rank axes (drives the full
    /// recommend formula vs. the credibility/danger fallback)
    pub fn has_rank_axes(&self) -> bool
    {
        self.existence_rank.is_some() || self.evidence_rank.is_some()
    }
}
