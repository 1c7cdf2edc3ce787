use super::{load_file, resolve, write_output};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mindmap_tree::hierarchical_to_flat;

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Document in any supported format
    pub input: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<String>,

    /// Write the flat id → element map instead of the tree
    #[arg(long)]
    pub flat: bool,
}

pub fn convert(args: ConvertArgs, cwd: &str) -> Result<()> {
    let input = resolve(cwd, &args.input);
    let loaded = load_file(&input)?;

    let content = if args.flat {
        serde_json::to_string_pretty(&hierarchical_to_flat(&loaded.structure))?
    } else {
        loaded.structure.to_json_pretty()?
    };

    let out = args.out.as_deref().map(|o| resolve(cwd, o));
    write_output(out.as_deref(), &content)?;

    if let Some(out) = &out {
        println!(
            "  {} {} ({:?}) → {}",
            "✓".green(),
            input.display(),
            loaded.format,
            out.display()
        );
        if loaded.dropped > 0 {
            println!(
                "  {} {} elements were dropped on load",
                "⚠️".yellow(),
                loaded.dropped
            );
        }
    }
    Ok(())
}
