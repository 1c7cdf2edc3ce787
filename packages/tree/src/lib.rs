//! # Mind-Map Tree
//!
//! Hierarchical document model for the mind-map editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ load: current / legacy JSON → tree          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ node: HierarchicalStructure (canonical)     │
//! │  - query: find / parent / depth / search    │
//! │  - validate: invariant report               │
//! │  - id_allocator: fresh unique ids           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ flat: id → element read model               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mindmap_tree::{flat_to_hierarchical, hierarchical_to_flat, parse_document};
//!
//! let loaded = parse_document(r#"[
//!     { "id": "1", "texts": ["Root"], "parentId": null },
//!     { "id": "2", "texts": ["Idea"], "parentId": "1" }
//! ]"#).unwrap();
//!
//! let flat = hierarchical_to_flat(&loaded.structure);
//! assert_eq!(flat["2"].parent_id.as_deref(), Some("1"));
//!
//! let tree = flat_to_hierarchical(&flat).unwrap();
//! assert_eq!(tree, loaded.structure);
//! ```

mod element;
mod error;
mod flat;
mod id_allocator;
mod load;
mod node;
mod query;
mod validate;

pub use element::{Direction, Element, ROOT_DEPTH};
pub use error::{LoadError, LoadResult};
pub use flat::{flat_to_hierarchical, hierarchical_to_flat, FlatElement, FlatMap};
pub use id_allocator::IdAllocator;
pub use load::{detect_format, load_document, parse_document, DocumentFormat, LoadedDocument};
pub use node::{HierarchicalNode, HierarchicalStructure, FORMAT_VERSION};
pub use validate::{validate, ValidationError};
