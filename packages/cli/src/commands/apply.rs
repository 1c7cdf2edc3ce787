use super::{load_file, resolve, write_output};
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use mindmap_editor::{Action, Editor, TidyLayout};
use std::fs;
use tracing::warn;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Document in any supported format
    pub input: String,

    /// JSON array of actions to replay
    pub actions: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<String>,

    /// Recompute positions after structural changes
    #[arg(long)]
    pub layout: bool,

    /// Report rejected actions and continue instead of stopping
    #[arg(short, long)]
    pub keep_going: bool,
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let loaded = load_file(&resolve(cwd, &args.input))?;

    let actions_path = resolve(cwd, &args.actions);
    let source = fs::read_to_string(&actions_path)
        .with_context(|| format!("Cannot read {}", actions_path.display()))?;
    let actions: Vec<Action> = serde_json::from_str(&source)
        .with_context(|| format!("Invalid actions in {}", actions_path.display()))?;

    let mut editor = Editor::new(loaded.structure, config.editor);
    if args.layout || config.auto_layout {
        editor = editor.with_layout(TidyLayout::default());
    }

    let mut rejected = 0;
    for (index, action) in actions.iter().enumerate() {
        if let Err(err) = editor.dispatch(action) {
            if !args.keep_going {
                return Err(anyhow!("Action #{} ({}) rejected: {}", index, action.name(), err));
            }
            warn!(index, action = action.name(), error = %err, "action rejected");
            eprintln!("  {} #{} {} - {}", "✗".red(), index, action.name(), err.to_string().red());
            rejected += 1;
        }
    }

    let out = args.out.as_deref().map(|o| resolve(cwd, o));
    write_output(out.as_deref(), &editor.to_json()?)?;

    if out.is_some() {
        println!(
            "{} Applied {} actions ({} rejected), version {}",
            "✅".green(),
            actions.len() - rejected,
            rejected,
            editor.version()
        );
    }
    Ok(())
}
