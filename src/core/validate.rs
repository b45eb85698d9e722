//! Filepath: src/core/validate.rs
//! Dataset validation gate.
//!
//! The checker collects every violation across every dataset before failing,
//! so one broken record cannot mask the rest of the report. Structural
//! checks (field shapes, slug pattern, grade letters, media URLs) run per
//! record; slug uniqueness runs per dataset.

use std::collections::HashSet;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use regex::Regex;

use crate::cli::{AppContext, ValidateArgs};
use crate::core::model::{
    CREDIBILITY_GRADES, Category, EVIDENCE_GRADES, EmbedMedia, Entry, ImageMedia,
};
use crate::infra::article;
use crate::infra::config::load_config;
use crate::infra::dataset;

fn slug_pattern() -> &'static Regex
{
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap())
}

fn date_pattern() -> &'static Regex
{
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap())
}

fn url_pattern() -> &'static Regex
{
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://\S+$").unwrap())
}

/// One dataset violation, rendered one per line in the report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation
{
    #[error("[{dataset}#{index}] record is malformed: {detail}")]
    Malformed
    {
        dataset: String,
        index: usize,
        detail: String,
    },

    #[error("[{dataset}] {slug}: missing or empty required field `{field}`")]
    MissingField
    {
        dataset: String,
        slug: String,
        field: &'static str,
    },

    #[error("[{dataset}] {slug}: slug is not URL-safe (lowercase alphanumerics and hyphens)")]
    BadSlug
    {
        dataset: String, slug: String
    },

    #[error("[{dataset}] {slug}: duplicate slug")]
    DuplicateSlug
    {
        dataset: String, slug: String
    },

    #[error("[{dataset}] {slug}: tags must not be empty")]
    EmptyTags
    {
        dataset: String, slug: String
    },

    #[error("[{dataset}] {slug}: tag `{tag}` is not in the controlled vocabulary")]
    UnknownTag
    {
        dataset: String,
        slug: String,
        tag: String,
    },

    #[error("[{dataset}] {slug}: `{field}` is not a valid YYYY-MM-DD date: `{value}`")]
    BadDate
    {
        dataset: String,
        slug: String,
        field: &'static str,
        value: String,
    },

    #[error("[{dataset}] {slug}: danger must be between 1 and 5, got {value}")]
    BadDanger
    {
        dataset: String,
        slug: String,
        value: u8,
    },

    #[error("[{dataset}] {slug}: `{field}` has an unknown grade letter `{value}`")]
    BadGrade
    {
        dataset: String,
        slug: String,
        field: &'static str,
        value: String,
    },

    #[error("[{dataset}] {slug}: category is `{found}` but the dataset expects `{expected}`")]
    CategoryMismatch
    {
        dataset: String,
        slug: String,
        expected: Category,
        found: Category,
    },

    #[error("[{dataset}] {slug}: {detail}")]
    BadMedia
    {
        dataset: String,
        slug: String,
        detail: String,
    },
}

fn is_valid_date(value: &str) -> bool
{
    date_pattern().is_match(value)
        && chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn check_image(
    image: &ImageMedia,
    what: &str,
    dataset: &str,
    slug: &str,
    out: &mut Vec<Violation>,
)
{
    if image.src.trim().is_empty()
    {
        out.push(Violation::BadMedia {
            dataset: dataset.to_string(),
            slug: slug.to_string(),
            detail: format!("{what} has an empty src"),
        });
    }
}

/// Structural checks for one record.
pub fn check_entry(
    dataset: &str,
    expected: Category,
    entry: &Entry,
    vocabulary: &indexmap::IndexSet<String>,
    out: &mut Vec<Violation>,
)
{
    let slug = entry.slug.clone();
    let required: [(&'static str, &str); 5] = [
        ("id", &entry.id),
        ("slug", &entry.slug),
        ("title", &entry.title),
        ("summary", &entry.summary),
        ("body", &entry.body),
    ];

    for (field, value) in required
    {
        if value.trim().is_empty()
        {
            out.push(Violation::MissingField {
                dataset: dataset.to_string(),
                slug: slug.clone(),
                field,
            });
        }
    }

    if !entry.slug.is_empty() && !slug_pattern().is_match(&entry.slug)
    {
        out.push(Violation::BadSlug {
            dataset: dataset.to_string(),
            slug: slug.clone(),
        });
    }

    if entry.category != expected
    {
        out.push(Violation::CategoryMismatch {
            dataset: dataset.to_string(),
            slug: slug.clone(),
            expected,
            found: entry.category,
        });
    }

    if entry.tags.is_empty()
    {
        out.push(Violation::EmptyTags {
            dataset: dataset.to_string(),
            slug: slug.clone(),
        });
    }
    for tag in &entry.tags
    {
        if !vocabulary.contains(tag)
        {
            out.push(Violation::UnknownTag {
                dataset: dataset.to_string(),
                slug: slug.clone(),
                tag: tag.clone(),
            });
        }
    }

    let dates: [(&'static str, Option<&str>); 3] = [
        ("publishedAt", Some(entry.published_at.as_str())),
        ("updatedAt", entry.updated_at.as_deref()),
        ("createdAt", entry.created_at.as_deref()),
    ];
    for (field, value) in dates
    {
        if let Some(value) = value
            && !is_valid_date(value)
        {
            out.push(Violation::BadDate {
                dataset: dataset.to_string(),
                slug: slug.clone(),
                field,
                value: value.to_string(),
            });
        }
    }

    if let Some(danger) = entry.danger
        && !(1..=5).contains(&danger)
    {
        out.push(Violation::BadDanger {
            dataset: dataset.to_string(),
            slug: slug.clone(),
            value: danger,
        });
    }

    let grades: [(&'static str, Option<&str>, &[&str]); 3] = [
        ("credibility", entry.credibility.as_deref(), &CREDIBILITY_GRADES),
        ("existence_rank", entry.existence_rank.as_deref(), &CREDIBILITY_GRADES),
        ("evidence_rank", entry.evidence_rank.as_deref(), &EVIDENCE_GRADES),
    ];
    for (field, value, allowed) in grades
    {
        if let Some(value) = value
            && !allowed.contains(&value)
        {
            out.push(Violation::BadGrade {
                dataset: dataset.to_string(),
                slug: slug.clone(),
                field,
                value: value.to_string(),
            });
        }
    }

    if expected == Category::Uma
    {
        let uma_required: [(&'static str, bool); 4] = [
            ("region", entry.region.is_some()),
            ("existence_rank", entry.existence_rank.is_some()),
            ("evidence_rank", entry.evidence_rank.is_some()),
            ("views", entry.views.is_some()),
        ];
        for (field, present) in uma_required
        {
            if !present
            {
                out.push(Violation::MissingField {
                    dataset: dataset.to_string(),
                    slug: slug.clone(),
                    field,
                });
            }
        }
    }

    if let Some(cover) = &entry.cover_image
    {
        check_image(cover, "coverImage", dataset, &slug, out);
    }
    if let Some(images) = &entry.images
    {
        for (i, image) in images.iter().enumerate()
        {
            check_image(image, &format!("images[{i}]"), dataset, &slug, out);
        }
    }
    if let Some(embeds) = &entry.embeds
    {
        for embed in embeds
        {
            let url = match embed
            {
                EmbedMedia::Youtube { url, .. } | EmbedMedia::Tiktok { url, .. } => url,
            };
            if !url_pattern().is_match(url)
            {
                out.push(Violation::BadMedia {
                    dataset: dataset.to_string(),
                    slug: slug.clone(),
                    detail: format!("embed url is not http(s): `{url}`"),
                });
            }
        }
    }
    if let Some(urls) = &entry.video_urls
    {
        for url in urls
        {
            if !url_pattern().is_match(url)
            {
                out.push(Violation::BadMedia {
                    dataset: dataset.to_string(),
                    slug: slug.clone(),
                    detail: format!("video url is not http(s): `{url}`"),
                });
            }
        }
    }
}

/// Validate one dataset, collecting every violation.
pub fn validate_dataset(
    dataset: &str,
    expected: Category,
    entries: &[Entry],
    vocabulary: &indexmap::IndexSet<String>,
) -> Vec<Violation>
{
    let mut out = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for entry in entries
    {
        if !entry.slug.is_empty() && !seen.insert(entry.slug.as_str())
        {
            out.push(Violation::DuplicateSlug {
                dataset: dataset.to_string(),
                slug: entry.slug.clone(),
            });
        }

        check_entry(dataset, expected, entry, vocabulary, &mut out);
    }

    out
}

/// `kdx validate`: run the gate over every category and optional articles.
pub fn run(
    args: ValidateArgs,
    ctx: &AppContext,
) -> anyhow::Result<()>
{
    let config = load_config().unwrap_or_default();
    let data_dir = args
        .data_dir
        .unwrap_or_else(|| config.data_dir.clone());
    let vocabulary: indexmap::IndexSet<String> = config.tags.iter().cloned().collect();

    let mut violations = Vec::new();
    let mut total = 0usize;

    for category in Category::ALL
    {
        let loaded = dataset::load_category(&data_dir, category)?;
        total += loaded.entries.len();
        violations.extend(loaded.violations);
        violations.extend(validate_dataset(
            category.as_str(),
            category,
            &loaded.entries,
            &vocabulary,
        ));
    }

    if let Some(articles_dir) = args.articles_dir.or(config.articles_dir.clone())
    {
        let articles = article::load_articles(&articles_dir)?;
        total += articles.len();
        violations.extend(validate_dataset(
            "articles",
            Category::Spots,
            &articles,
            &vocabulary,
        ));
    }

    if violations.is_empty()
    {
        if !ctx.quiet
        {
            let msg = format!(
                "OK: {total} record(s) across {} dataset(s)",
                Category::ALL.len()
            );
            if ctx.no_color
            {
                println!("{msg}");
            }
            else
            {
                println!("{}", msg.green());
            }
        }
        return Ok(());
    }

    for violation in &violations
    {
        if ctx.no_color
        {
            eprintln!("{violation}");
        }
        else
        {
            eprintln!("{}", violation.to_string().red());
        }
    }
    anyhow::bail!("validation failed with {} violation(s)", violations.len())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::core::model::Status;
    use indexmap::IndexSet;

    fn vocabulary() -> IndexSet<String>
    {
        ["廃墟", "トンネル", "目撃", "飛行"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn valid_uma(slug: &str) -> Entry
    {
        Entry {
            id: format!("uma-{slug}"),
            slug: slug.to_string(),
            title: "霧羽の巨鳥".to_string(),
            summary: "概要".to_string(),
            body: "本文".to_string(),
            content: None,
            tags: vec!["目撃".to_string(), "飛行".to_string()],
            published_at: "2026-01-22".to_string(),
            updated_at: None,
            status: Status::Published,
            category: Category::Uma,
            cover_image: None,
            images: None,
            embeds: None,
            video_urls: None,
            pref: None,
            region: Some("東北".to_string()),
            kind: Some("飛行型".to_string()),
            credibility: None,
            existence_rank: Some("B".to_string()),
            evidence_rank: Some("C".to_string()),
            danger: Some(2),
            views: Some(120),
            created_at: Some("2026-01-20".to_string()),
            source: None,
            caution: None,
        }
    }

    #[test]
    fn clean_dataset_passes()
    {
        let entries = vec![valid_uma("kiriba-bird"), valid_uma("mizube-thing")];
        assert!(validate_dataset("uma", Category::Uma, &entries, &vocabulary()).is_empty());
    }

    #[test]
    fn collects_all_violations_instead_of_stopping_at_first()
    {
        let mut bad = valid_uma("Bad_Slug");
        bad.title = String::new();
        bad.tags = vec!["未知タグ".to_string()];
        bad.danger = Some(7);

        let violations = validate_dataset("uma", Category::Uma, &[bad], &vocabulary());
        // Bad slug, empty title, unknown tag, out-of-range danger.
        assert_eq!(violations.len(), 4);
    }

    #[test]
    fn duplicate_slugs_are_reported_once_per_duplicate()
    {
        let entries = vec![valid_uma("twin"), valid_uma("twin"), valid_uma("twin")];
        let violations = validate_dataset("uma", Category::Uma, &entries, &vocabulary());

        let dupes = violations
            .iter()
            .filter(|v| matches!(v, Violation::DuplicateSlug { .. }))
            .count();
        assert_eq!(dupes, 2);
    }

    #[test]
    fn uma_requires_its_extension_fields()
    {
        let mut bare = valid_uma("bare");
        bare.region = None;
        bare.existence_rank = None;
        bare.evidence_rank = None;
        bare.views = None;

        let violations = validate_dataset("uma", Category::Uma, &[bare], &vocabulary());
        let missing: Vec<&str> = violations
            .iter()
            .filter_map(|v| match v
            {
                Violation::MissingField { field, .. } => Some(*field),
                _ => None,
            })
            .collect();
        assert_eq!(missing, ["region", "existence_rank", "evidence_rank", "views"]);
    }

    #[test]
    fn calendar_invalid_date_fails_even_if_shaped_right()
    {
        let mut bad = valid_uma("bad-date");
        bad.published_at = "2026-02-30".to_string();

        let violations = validate_dataset("uma", Category::Uma, &[bad], &vocabulary());
        assert!(matches!(
            violations.as_slice(),
            [Violation::BadDate { field: "publishedAt", .. }]
        ));
    }

    #[test]
    fn grade_letters_are_checked_per_field()
    {
        let mut bad = valid_uma("bad-grades");
        // "E" exists for evidence only; "S" for credibility/existence only.
        bad.credibility = Some("E".to_string());
        bad.evidence_rank = Some("S".to_string());

        let violations = validate_dataset("uma", Category::Uma, &[bad], &vocabulary());
        let grade_errors = violations
            .iter()
            .filter(|v| matches!(v, Violation::BadGrade { .. }))
            .count();
        assert_eq!(grade_errors, 2);
    }

    #[test]
    fn media_urls_are_pattern_checked()
    {
        let mut bad = valid_uma("bad-media");
        bad.video_urls = Some(vec!["ftp://example.com/clip.mp4".to_string()]);
        bad.cover_image = Some(ImageMedia {
            src: "  ".to_string(),
            alt: "alt".to_string(),
            credit: None,
            license: None,
            width: None,
            height: None,
        });

        let violations = validate_dataset("uma", Category::Uma, &[bad], &vocabulary());
        let media_errors = violations
            .iter()
            .filter(|v| matches!(v, Violation::BadMedia { .. }))
            .count();
        assert_eq!(media_errors, 2);
    }

    #[test]
    fn category_mismatch_is_flagged()
    {
        let stray = valid_uma("stray");
        let violations = validate_dataset("spots", Category::Spots, &[stray], &vocabulary());

        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::CategoryMismatch { .. })));
    }
}
