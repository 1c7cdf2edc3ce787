use super::resolve;
use crate::config::DEFAULT_CONFIG_NAME;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use mindmap_tree::{
    detect_format, flat_to_hierarchical, load_document, DocumentFormat, FlatElement, FlatMap,
    HierarchicalStructure, ValidationError,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Document file, or a directory of .json documents
    #[arg(default_value = ".")]
    pub path: String,
}

/// Findings for one document
#[derive(Debug)]
pub struct Report {
    pub format: DocumentFormat,
    pub elements: usize,
    pub dropped: usize,
    pub violations: Vec<ValidationError>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.dropped == 0 && self.violations.is_empty()
    }
}

pub fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    let root = resolve(cwd, &args.path);
    let files = find_documents(&root)?;

    if files.is_empty() {
        println!("{}", "⚠️  No documents found".yellow());
        return Ok(());
    }

    println!("{}", "🔍 Validating mind maps...".bright_blue().bold());

    let mut clean = 0;
    let mut failed = 0;

    for file in &files {
        let relative = file.strip_prefix(&root).unwrap_or(file);
        match check_file(file) {
            Ok(report) if report.is_clean() => {
                clean += 1;
                println!(
                    "  {} {} ({} elements, {:?})",
                    "✓".green(),
                    relative.display(),
                    report.elements,
                    report.format
                );
            }
            Ok(report) => {
                failed += 1;
                println!("  {} {}", "✗".red(), relative.display());
                if report.dropped > 0 {
                    println!("      {} elements dropped on load", report.dropped);
                }
                for violation in &report.violations {
                    println!("      {}", violation.to_string().yellow());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("  {} {} - {}", "✗".red(), relative.display(), format!("{:#}", e).red());
            }
        }
    }

    println!();
    if failed == 0 {
        println!("{} {} documents valid", "✅".green(), clean);
        Ok(())
    } else {
        Err(anyhow::anyhow!("{} of {} documents have problems", failed, files.len()))
    }
}

/// Inspect a document as stored, before the loader repairs it
pub fn check_file(path: &Path) -> Result<Report> {
    let source = fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    let value: Value = serde_json::from_str(&source)?;

    let format = detect_format(&value)?;
    let loaded = load_document(&value)?;

    let violations = match raw_structure(&value, format) {
        Some(raw) => mindmap_tree::validate(&raw),
        None => Vec::new(),
    };
    debug!(path = %path.display(), violations = violations.len(), "document checked");

    Ok(Report {
        format,
        elements: loaded.structure.element_count(),
        dropped: loaded.dropped,
        violations,
    })
}

/// The document's own tree, without normalization
fn raw_structure(value: &Value, format: DocumentFormat) -> Option<HierarchicalStructure> {
    let records: Vec<&Value> = match format {
        DocumentFormat::Hierarchical => return serde_json::from_value(value.clone()).ok(),
        DocumentFormat::FlatArray => value.as_array()?.iter().collect(),
        DocumentFormat::ElementsWrapper => value.get("elements")?.as_array()?.iter().collect(),
        DocumentFormat::LegacyMap => value.as_object()?.values().collect(),
    };

    let map: FlatMap = records
        .into_iter()
        .filter_map(|r| serde_json::from_value::<FlatElement>(r.clone()).ok())
        .map(|r| (r.element.id.clone(), r))
        .collect();
    flat_to_hierarchical(&map)
}

fn find_documents(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.exists() {
        return Err(anyhow::anyhow!("Path does not exist: {}", path.display()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_json = path.extension().and_then(|s| s.to_str()) == Some("json");
        let is_config = path.file_name().and_then(|s| s.to_str()) == Some(DEFAULT_CONFIG_NAME);
        if is_json && !is_config {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
