//! Filepath: src/infra/article.rs
//! Markdown article loading for haunted spots.
//!
//! Each article lives at `<articles_dir>/<slug>/index.md` as YAML
//! frontmatter followed by a Markdown body. Missing metadata falls back to
//! derivations from the body: the first `# heading` becomes the title, the
//! first paragraph (markdown-stripped, truncated) becomes the summary.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use crate::core::model::{CREDIBILITY_GRADES, Category, Entry, ImageMedia, Status};
use crate::infra::walk::FileWalker;

const SUMMARY_MAX_LENGTH: usize = 140;

/// Frontmatter as authored; everything is optional and tolerant.
#[derive(Debug, Default, Deserialize)]
struct Frontmatter
{
    title: Option<String>,
    summary: Option<String>,
    category: Option<String>,
    prefecture: Option<String>,
    pref: Option<String>,
    credibility: Option<String>,
    danger: Option<i64>,
    cover: Option<String>,
    youtube: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    date: Option<String>,
    #[serde(rename = "updatedAt")]
    updated_at: Option<String>,
    #[serde(default)]
    tags: Tags,
}

/// Tags may be a YAML list or a comma-separated string.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum Tags
{
    #[default]
    None,
    List(Vec<String>),
    Csv(String),
}

impl Tags
{
    fn into_vec(self) -> Vec<String>
    {
        match self
        {
            Tags::None => Vec::new(),
            Tags::List(tags) => tags,
            Tags::Csv(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

fn frontmatter_pattern() -> &'static Regex
{
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\A---\s*\r?\n(.*?)\r?\n---\s*\r?\n?").unwrap())
}

fn heading_pattern() -> &'static Regex
{
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap())
}

/// Split a raw article into frontmatter and body. A file without a
/// frontmatter block is all body.
fn split_frontmatter(raw: &str) -> (Frontmatter, &str)
{
    match frontmatter_pattern().captures(raw)
    {
        Some(caps) =>
        {
            let yaml = caps
                .get(1)
                .map_or("", |m| m.as_str());
            let body = &raw[caps
                .get(0)
                .map_or(0, |m| m.end())..];

            match serde_yaml::from_str::<Frontmatter>(yaml)
            {
                Ok(fm) => (fm, body),
                Err(err) =>
                {
                    tracing::warn!(error = %err, "unparseable frontmatter, using body only");
                    (Frontmatter::default(), body)
                }
            }
        }
        None => (Frontmatter::default(), raw),
    }
}

/// Remove markdown syntax so the remainder reads as plain text.
fn strip_markdown(text: &str) -> String
{
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    let rules = RULES.get_or_init(|| {
        vec![
            (Regex::new(r"(?s)```.*?```").unwrap(), " "),
            (Regex::new(r"`[^`]*`").unwrap(), " "),
            (Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap(), " "),
            (Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap(), "$1"),
            (Regex::new(r"(?m)^\s{0,3}#{1,6}\s+").unwrap(), ""),
            (Regex::new(r"(?m)^\s{0,3}[-*+]\s+").unwrap(), ""),
            (Regex::new(r"(?m)^\s{0,3}\d+\.\s+").unwrap(), ""),
            (Regex::new(r"(?m)^\s*>\s?").unwrap(), ""),
            (Regex::new(r"<[^>]+>").unwrap(), " "),
            (Regex::new(r"\r?\n+").unwrap(), " "),
            (Regex::new(r"\s{2,}").unwrap(), " "),
        ]
    });

    let mut out = text.to_string();
    for (re, replacement) in rules
    {
        out = re
            .replace_all(&out, *replacement)
            .into_owned();
    }
    out.trim().to_string()
}

/// Truncate at a char boundary, ending in an ellipsis.
fn truncate_text(
    text: &str,
    max_chars: usize,
) -> String
{
    if text.chars().count() <= max_chars
    {
        return text.to_string();
    }

    let head: String = text
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect();
    format!("{}…", head.trim_end())
}

fn extract_title_from_content(content: &str) -> Option<String>
{
    heading_pattern()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Drop the leading `# title` line when it repeats the resolved title.
fn strip_leading_title<'a>(
    content: &'a str,
    title: &str,
) -> &'a str
{
    let normalized = content.trim_start();
    let title_line = format!("# {title}");

    if normalized.starts_with(&title_line)
    {
        normalized[title_line.len()..].trim_start()
    }
    else
    {
        content.trim()
    }
}

fn build_summary(
    summary_raw: Option<&str>,
    content: &str,
    title: &str,
) -> String
{
    let first_paragraph = content
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty());

    let source = summary_raw
        .filter(|s| !s.trim().is_empty())
        .or(first_paragraph)
        .unwrap_or(title);

    let plain = strip_markdown(source);
    let plain = if plain.is_empty() { title } else { &plain };
    truncate_text(plain, SUMMARY_MAX_LENGTH)
}

/// Normalize a frontmatter date to `YYYY-MM-DD`, dropping anything that
/// does not parse.
fn normalize_date(raw: Option<&str>) -> Option<String>
{
    let raw = raw?.trim();
    if raw.is_empty()
    {
        return None;
    }

    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Frontmatter categories accepted as spot articles
fn is_spot_category(value: &str) -> bool
{
    matches!(value, "" | "心霊スポット" | "心霊・噂" | "spots")
}

/// Build one spot record from an article file. `None` means the article
/// belongs to another category.
fn build_entry(
    slug: &str,
    raw: &str,
) -> Option<Entry>
{
    let (frontmatter, body) = split_frontmatter(raw);

    let category_value = frontmatter
        .category
        .as_deref()
        .unwrap_or("")
        .trim();
    if !is_spot_category(category_value)
    {
        return None;
    }

    let content_title = extract_title_from_content(body);
    let title = frontmatter
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or(content_title)
        .unwrap_or_else(|| slug.to_string());

    let content = strip_leading_title(body, &title).to_string();
    let summary = build_summary(frontmatter.summary.as_deref(), &content, &title);

    let pref = frontmatter
        .prefecture
        .or(frontmatter.pref)
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    let kind = Some(category_value)
        .filter(|c| !c.is_empty())
        .unwrap_or("心霊スポット")
        .to_string();

    let credibility = frontmatter
        .credibility
        .map(|c| c.trim().to_string())
        .filter(|c| CREDIBILITY_GRADES.contains(&c.as_str()));

    let danger = frontmatter
        .danger
        .and_then(|d| u8::try_from(d).ok())
        .filter(|d| (1..=5).contains(d));

    let youtube = frontmatter
        .youtube
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    let published_at = normalize_date(frontmatter.published_at.as_deref())
        .or_else(|| normalize_date(frontmatter.date.as_deref()))
        .unwrap_or_else(|| "1970-01-01".to_string());
    let updated_at = normalize_date(frontmatter.updated_at.as_deref());

    let cover_image = frontmatter
        .cover
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .map(|src| ImageMedia {
            src,
            alt: format!("{title}の外観"),
            credit: Some("User Provided".to_string()),
            license: None,
            width: None,
            height: None,
        });

    Some(Entry {
        id: format!("article-{slug}"),
        slug: slug.to_string(),
        title,
        summary: summary.clone(),
        body: summary,
        content: Some(content),
        tags: frontmatter.tags.into_vec(),
        published_at,
        updated_at,
        status: Status::Published,
        category: Category::Spots,
        cover_image,
        images: None,
        embeds: None,
        video_urls: youtube.map(|u| vec![u]),
        pref,
        region: None,
        kind: Some(kind),
        credibility,
        existence_rank: None,
        evidence_rank: None,
        danger,
        views: None,
        created_at: None,
        source: None,
        caution: None,
    })
}

/// Load every spot article under `dir`, newest publication first.
pub fn load_articles(dir: &Path) -> Result<Vec<Entry>>
{
    if !dir.exists()
    {
        tracing::debug!(dir = %dir.display(), "articles directory absent, skipping");
        return Ok(Vec::new());
    }

    let walker = FileWalker::new(&[])?;
    let files = walker.walk_with_filter(dir, |p| {
        p.file_name()
            .is_some_and(|n| n == "index.md")
    });

    let mut entries = Vec::new();

    for path in files
    {
        // The parent directory name is the slug.
        let Some(slug) = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
        else
        {
            continue;
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read article {}", path.display()))?;

        if let Some(entry) = build_entry(slug, &raw)
        {
            entries.push(entry);
        }
    }

    entries.sort_by(|a, b| {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| a.slug.cmp(&b.slug))
    });

    Ok(entries)
}
