//! Synchronization Index Module
//!
//! Each page keeps its boxes as an arena-backed tree; a second map indexes
//! every node by the `(input tag, line)` it was recorded for.
//!
//! ## Architecture
//!
//! ```text
//! SyncIndex
//! ├── header: StreamHeader           # version, output, Scale
//! ├── inputs: InputTable             # tag -> normalized name
//! ├── pages: BTreeMap<u32, PageTree> # arena of SyncNode + roots
//! └── friends: (tag, line) -> [NodeRef]
//! ```
//!
//! Parent links and child lists are arena indices, so walking up for an
//! enclosing box or down for a containing child never touches a pointer.

pub mod builder;
pub mod inputs;
pub mod node;
pub mod page;
pub mod sync_index;

// Re-export what's needed externally
pub use inputs::InputTable;
pub use node::{NodeId, NodeKind, SyncNode};
pub use page::PageTree;
pub use sync_index::{NodeRef, StreamHeader, SyncIndex};
