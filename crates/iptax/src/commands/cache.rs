//! `iptax cache` — judgment learning cache inspection and updates.

use std::path::Path;

use anyhow::{Context, Result, bail};
use iptax_core::{Judgment, JudgmentCache, SelectionSettings, UserDecision, select_history};

use crate::commands::{CmdContext, print_json};

/// Print aggregate statistics, optionally scoped to one product.
pub fn stats(ctx: &CmdContext, product: Option<&str>) -> Result<()> {
    let cache = JudgmentCache::open(&ctx.cache_path)?;
    let stats = cache.stats(product);

    if ctx.json {
        return print_json(&stats);
    }
    println!("judgments:       {}", stats.total_judgments);
    println!("corrected:       {}", stats.corrected_count);
    println!("confirmed:       {}", stats.correct_count);
    println!("correction rate: {:.1}%", stats.correction_rate * 100.0);
    if !stats.products.is_empty() {
        println!("products:        {}", stats.products.join(", "));
    }
    if let (Some(oldest), Some(newest)) = (stats.oldest_judgment, stats.newest_judgment) {
        println!(
            "span:            {} .. {}",
            oldest.format("%Y-%m-%d"),
            newest.format("%Y-%m-%d")
        );
    }
    Ok(())
}

/// Print a single judgment in full.
pub fn show(ctx: &CmdContext, change_id: &str) -> Result<()> {
    let cache = JudgmentCache::open(&ctx.cache_path)?;
    let Some(judgment) = cache.get(change_id) else {
        bail!("no judgment for {change_id}");
    };

    if ctx.json {
        return print_json(judgment);
    }
    // Human mode prints the record as stored; the fields are
    // self-describing.
    println!("{}", serde_json::to_string_pretty(judgment)?);
    Ok(())
}

/// Drop every judgment scoped to `product`.
pub fn clear(ctx: &CmdContext, product: &str) -> Result<()> {
    let mut cache = JudgmentCache::open(&ctx.cache_path)?;
    let removed = cache.clear_product(product);
    cache.save()?;

    if ctx.json {
        return print_json(&removed);
    }
    println!("removed {removed} judgments for {product}");
    Ok(())
}

/// Record the reviewer's final decision for an existing judgment.
pub fn override_decision(
    ctx: &CmdContext,
    change_id: &str,
    decision: UserDecision,
    reasoning: Option<String>,
) -> Result<()> {
    let mut cache = JudgmentCache::open(&ctx.cache_path)?;
    cache.record_user_decision(change_id, decision, reasoning)?;
    cache.save()?;

    // record_user_decision succeeded, so the judgment exists.
    let judgment = cache.get(change_id).cloned();
    if ctx.json {
        return print_json(&judgment);
    }
    println!("recorded {decision:?} for {change_id}");
    Ok(())
}

/// Ingest a JSON array of automated judgments, merging over existing ones.
pub fn import(ctx: &CmdContext, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let judgments: Vec<Judgment> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of judgments", file.display()))?;

    let mut cache = JudgmentCache::open(&ctx.cache_path)?;
    let count = judgments.len();
    for judgment in judgments {
        cache.upsert(judgment);
    }
    cache.save()?;

    if ctx.json {
        return print_json(&count);
    }
    println!("imported {count} judgments");
    Ok(())
}

/// Print the learning context the selector would hand to the judge.
pub fn history(
    ctx: &CmdContext,
    product: Option<String>,
    max: Option<usize>,
    ratio: Option<f64>,
) -> Result<()> {
    let settings = iptax_settings::get_settings();
    let product = match product {
        Some(p) => p,
        None if settings.product.name.is_empty() => {
            bail!("no product configured; pass --product or set product.name in settings")
        }
        None => settings.product.name.clone(),
    };
    let selection = SelectionSettings {
        max_entries: max.unwrap_or(settings.ai.max_learnings),
        correction_ratio: ratio.unwrap_or(settings.ai.correction_ratio),
    };

    let cache = JudgmentCache::open(&ctx.cache_path)?;
    let selected = select_history(&cache, &product, &selection);

    if ctx.json {
        return print_json(&selected);
    }
    for judgment in &selected {
        let marker = if judgment.was_corrected() {
            "corrected"
        } else {
            "confirmed"
        };
        let reasoning = judgment
            .user_reasoning
            .as_deref()
            .unwrap_or(&judgment.reasoning);
        println!(
            "{}\t{:?}\t{}\t{}",
            judgment.change_id,
            judgment.final_decision(),
            marker,
            reasoning
        );
    }
    Ok(())
}
