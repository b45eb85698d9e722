//! Filepath: src/core/query.rs
//! Query subcommands: list, related, show, latest. These wire the pure
//! engines to dataset loading and terminal output; all reporting lives
//! here so the engines stay output-free.

use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::{AppContext, LatestArgs, ListArgs, RelatedArgs, ShowArgs};
use crate::core::filter::{DangerFilter, FilterCriteria, Selection, filter_entries};
use crate::core::model::{Category, Entry};
use crate::core::related::related_entries;
use crate::core::sort::{SortKey, sort_entries};
use crate::infra::config::{Config, load_config};
use crate::infra::{article, dataset};

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "slug")]
    slug: String,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "place")]
    place: String,
    #[tabled(rename = "type")]
    kind: String,
    #[tabled(rename = "danger")]
    danger: String,
    #[tabled(rename = "rank")]
    rank: String,
    #[tabled(rename = "tags")]
    tags: String,
}

impl ListRow {
    fn from_entry(entry: &Entry) -> Self {
        let rank = match entry.category {
            Category::Uma => format!(
                "存在{}/証拠{}",
                entry.existence_rank.as_deref().unwrap_or("-"),
                entry.evidence_rank.as_deref().unwrap_or("-")
            ),
            _ => entry.credibility.clone().unwrap_or_else(|| "-".to_string()),
        };

        ListRow {
            slug: entry.slug.clone(),
            title: entry.title.clone(),
            place: entry.place().unwrap_or("-").to_string(),
            kind: entry.kind.clone().unwrap_or_else(|| "-".to_string()),
            danger: entry
                .danger
                .map(|d| "★".repeat(usize::from(d)))
                .unwrap_or_else(|| "-".to_string()),
            rank,
            tags: entry.tags.join(", "),
        }
    }
}

#[derive(Tabled)]
struct RelatedRow {
    #[tabled(rename = "slug")]
    slug: String,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "score")]
    score: u32,
    #[tabled(rename = "shared tags")]
    tag_matches: usize,
    #[tabled(rename = "affinity")]
    affinity: &'static str,
}

/// Load one category's pool, honoring published_only and the optional
/// articles merge for spots.
fn load_pool(
    config: &Config,
    data_dir: &PathBuf,
    category: Category,
    include_articles: bool,
) -> Result<Vec<Entry>> {
    let loaded = dataset::load_category(data_dir, category)?;
    let mut entries = if config.published_only {
        dataset::published(loaded.entries)
    } else {
        loaded.entries
    };

    if include_articles && category == Category::Spots {
        if let Some(articles_dir) = &config.articles_dir {
            let articles = article::load_articles(articles_dir)?;
            // Dataset records win on slug collisions.
            for article in articles {
                if dataset::find_by_slug(&entries, &article.slug).is_none() {
                    entries.push(article);
                }
            }
        } else {
            tracing::warn!("--include-articles set but no articles_dir configured");
        }
    }

    Ok(entries)
}

fn print_table<R: Tabled>(rows: Vec<R>) {
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
}

fn print_json_lines(entries: &[Entry]) -> Result<()> {
    for entry in entries {
        println!(
            "{}",
            serde_json::to_string(entry).context("serialize record")?
        );
    }
    Ok(())
}

/// `kdx list`: filter, sort, print.
pub fn list(args: ListArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config().unwrap_or_default();
    let data_dir = args.data_dir.unwrap_or_else(|| config.data_dir.clone());
    let category: Category = args.category.into();

    let pool = load_pool(&config, &data_dir, category, args.include_articles)?;

    let criteria = FilterCriteria {
        query: args.query.unwrap_or_default(),
        pref: Selection::parse(args.pref.as_deref()),
        region: Selection::parse(args.region.as_deref()),
        kind: Selection::parse(args.kind.as_deref()),
        tags: args.tag,
        danger: DangerFilter::parse(args.danger.as_deref()),
        credibility: Selection::parse(args.credibility.as_deref()),
        existence_rank: Selection::parse(args.existence.as_deref()),
        evidence_rank: Selection::parse(args.evidence.as_deref()),
    };

    let mut hits = filter_entries(&pool, &criteria);

    let key = args
        .sort
        .map(SortKey::from)
        .unwrap_or_else(|| SortKey::parse(Some(config.list.sort.as_str())));
    sort_entries(&mut hits, key, chrono::Local::now().date_naive());

    if let Some(limit) = args.limit.or(config.list.limit) {
        hits.truncate(limit);
    }

    if args.json {
        return print_json_lines(&hits);
    }

    if hits.is_empty() {
        if !ctx.quiet {
            println!("No records matched.");
        }
        return Ok(());
    }

    print_table(hits.iter().map(ListRow::from_entry).collect());
    if !ctx.quiet {
        println!("{} record(s)", hits.len());
    }
    Ok(())
}

/// `kdx related`: related items for one slug.
pub fn related(args: RelatedArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config().unwrap_or_default();
    let data_dir = args.data_dir.unwrap_or_else(|| config.data_dir.clone());
    let category: Category = args.category.into();

    let pool = load_pool(&config, &data_dir, category, false)?;
    let focal = dataset::find_by_slug(&pool, &args.slug)
        .with_context(|| format!("no {category} record with slug `{}`", args.slug))?;

    let limit = args.limit.unwrap_or(config.related_limit);
    let related = related_entries(focal, &pool, limit);

    if args.json {
        for item in &related {
            println!(
                "{}",
                serde_json::to_string(item).context("serialize related item")?
            );
        }
        return Ok(());
    }

    if related.is_empty() {
        if !ctx.quiet {
            println!("No related records for `{}`.", args.slug);
        }
        return Ok(());
    }

    let rows: Vec<RelatedRow> = related
        .iter()
        .map(|item| RelatedRow {
            slug: item.entry.slug.clone(),
            title: item.entry.title.clone(),
            score: item.score,
            tag_matches: item.tag_matches,
            affinity: item.affinity.as_str(),
        })
        .collect();
    print_table(rows);
    Ok(())
}

/// `kdx show`: one record in full.
pub fn show(args: ShowArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config().unwrap_or_default();
    let data_dir = args.data_dir.unwrap_or_else(|| config.data_dir.clone());
    let category: Category = args.category.into();

    let pool = load_pool(&config, &data_dir, category, false)?;
    let entry = dataset::find_by_slug(&pool, &args.slug)
        .with_context(|| format!("no {category} record with slug `{}`", args.slug))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(entry).context("serialize record")?
        );
        return Ok(());
    }

    if ctx.no_color {
        println!("{}", entry.title);
    } else {
        println!("{}", entry.title.bold());
    }
    println!("  slug:      {}", entry.slug);
    println!("  category:  {}", entry.category);
    if let Some(place) = entry.place() {
        println!("  place:     {place}");
    }
    if let Some(kind) = &entry.kind {
        println!("  type:      {kind}");
    }
    if let Some(danger) = entry.danger {
        println!("  danger:    {}", "★".repeat(usize::from(danger)));
    }
    if let Some(credibility) = &entry.credibility {
        println!("  credibility: {credibility}");
    }
    if let Some(existence) = &entry.existence_rank {
        println!("  existence: {existence}");
    }
    if let Some(evidence) = &entry.evidence_rank {
        println!("  evidence:  {evidence}");
    }
    if let Some(views) = entry.views {
        println!("  views:     {views}");
    }
    println!("  published: {}", entry.published_at);
    if !entry.tags.is_empty() {
        println!("  tags:      {}", entry.tags.join(", "));
    }
    println!();
    println!("{}", entry.summary);
    if let Some(caution) = &entry.caution {
        println!();
        for line in caution {
            if ctx.no_color {
                println!("! {line}");
            } else {
                println!("{} {line}", "!".red());
            }
        }
    }
    Ok(())
}

/// `kdx latest`: newest records across every category.
pub fn latest(args: LatestArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config().unwrap_or_default();
    let data_dir = args.data_dir.unwrap_or_else(|| config.data_dir.clone());

    let mut merged = Vec::new();
    for category in Category::ALL {
        merged.extend(load_pool(&config, &data_dir, category, false)?);
    }

    let limit = args.limit.unwrap_or(config.latest_limit);
    let newest = dataset::latest_entries(merged, limit);

    if args.json {
        return print_json_lines(&newest);
    }

    if newest.is_empty() {
        if !ctx.quiet {
            println!("No records found.");
        }
        return Ok(());
    }

    print_table(newest.iter().map(ListRow::from_entry).collect());
    Ok(())
}
