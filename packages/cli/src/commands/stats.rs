use super::{load_file, resolve};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mindmap_tree::HierarchicalStructure;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Document in any supported format
    pub input: String,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub elements: usize,
    pub max_depth: u32,
    pub leaves: usize,
    pub hidden: usize,
    pub tentative: usize,
    pub with_marker: usize,
}

impl DocumentStats {
    pub fn collect(tree: &HierarchicalStructure) -> Self {
        let elements = tree.elements();
        Self {
            elements: elements.len(),
            max_depth: tree.max_depth(),
            leaves: elements.iter().filter(|e| e.child_count == 0).count(),
            hidden: elements.iter().filter(|e| !e.visible).count(),
            tentative: elements.iter().filter(|e| e.tentative).count(),
            with_marker: elements.iter().filter(|e| e.marker.is_some()).count(),
        }
    }
}

pub fn stats(args: StatsArgs, cwd: &str) -> Result<()> {
    let input = resolve(cwd, &args.input);
    let loaded = load_file(&input)?;
    let stats = DocumentStats::collect(&loaded.structure);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", format!("📊 {}", input.display()).bright_blue().bold());
    println!("  Format:      {:?}", loaded.format);
    println!("  Elements:    {}", stats.elements);
    println!("  Max depth:   {}", stats.max_depth);
    println!("  Leaves:      {}", stats.leaves);
    println!("  Hidden:      {}", stats.hidden);
    println!("  Tentative:   {}", stats.tentative);
    println!("  With marker: {}", stats.with_marker);
    if loaded.dropped > 0 {
        println!("  {} {} elements dropped on load", "⚠️".yellow(), loaded.dropped);
    }
    Ok(())
}
