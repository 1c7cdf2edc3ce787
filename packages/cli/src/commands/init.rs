use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mindmap_editor::{EditorConfig, EditorState};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Text of the root element in the starter document
    #[arg(short, long, default_value = "Central Topic")]
    pub root: String,

    /// Starter document file name
    #[arg(short, long, default_value = "mindmap.json")]
    pub document: String,

    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing mind map...".bright_blue().bold());

    let config = Config::default();
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let document_path = PathBuf::from(cwd).join(&args.document);
    if !document_path.exists() || args.force {
        let state = EditorState::with_root_text(args.root.clone(), &EditorConfig::default());
        fs::write(&document_path, state.tree().to_json_pretty()?)?;
        println!("  {} Created {}", "✓".green(), args.document);
    }

    println!();
    println!("{}", "✅ Mind map initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: mindmap outline {}", args.document);
    println!("  2. Run: mindmap apply {} actions.json", args.document);

    Ok(())
}
