use super::{load_file, resolve};
use anyhow::Result;
use clap::Args;
use mindmap_tree::{HierarchicalNode, HierarchicalStructure};

#[derive(Debug, Args)]
pub struct OutlineArgs {
    /// Document in any supported format
    pub input: String,

    /// Include collapsed (hidden) elements
    #[arg(short, long)]
    pub all: bool,

    /// Stop below this depth
    #[arg(short, long)]
    pub depth: Option<u32>,
}

pub fn outline(args: OutlineArgs, cwd: &str) -> Result<()> {
    let loaded = load_file(&resolve(cwd, &args.input))?;
    print!("{}", render(&loaded.structure, args.all, args.depth));
    Ok(())
}

/// Indented text outline, one element per line
pub fn render(tree: &HierarchicalStructure, include_hidden: bool, max_depth: Option<u32>) -> String {
    let mut out = String::new();
    render_node(&tree.root, 0, include_hidden, max_depth, &mut out);
    out
}

fn render_node(
    node: &HierarchicalNode,
    level: u32,
    include_hidden: bool,
    max_depth: Option<u32>,
    out: &mut String,
) {
    if max_depth.is_some_and(|max| level > max) {
        return;
    }

    let data = &node.data;
    let bullet = if level == 0 { "#" } else { "-" };
    out.push_str(&"  ".repeat(level.saturating_sub(1) as usize));
    out.push_str(bullet);
    out.push(' ');
    out.push_str(&data.texts.join(" / "));
    if let Some(marker) = &data.marker {
        out.push_str(&format!(" [{}]", marker));
    }
    if data.tentative {
        out.push_str(" (tentative)");
    }
    out.push('\n');

    for child in &node.children {
        if child.data.visible || include_hidden {
            render_node(child, level + 1, include_hidden, max_depth, out);
        }
    }
}
