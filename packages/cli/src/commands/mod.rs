pub mod apply;
pub mod convert;
pub mod init;
pub mod outline;
pub mod stats;
pub mod validate;

pub use apply::{apply, ApplyArgs};
pub use convert::{convert, ConvertArgs};
pub use init::{init, InitArgs};
pub use outline::{outline, OutlineArgs};
pub use stats::{stats, StatsArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::{Context, Result};
use mindmap_tree::{parse_document, LoadedDocument};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve `path` against the working directory
pub(crate) fn resolve(cwd: &str, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        PathBuf::from(cwd).join(path)
    }
}

/// Read and load a document in any supported format
pub(crate) fn load_file(path: &Path) -> Result<LoadedDocument> {
    let source = fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    parse_document(&source).with_context(|| format!("Cannot load {}", path.display()))
}

/// Write to `out`, or to stdout when no path is given
pub(crate) fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Cannot write {}", path.display()))?;
        }
        None => println!("{}", content),
    }
    Ok(())
}
