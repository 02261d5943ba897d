//! ResourceArc Wrappers
//!
//! Persistent state for parsed synchronization indexes.

use crate::index::SyncIndex;
use rustler::ResourceArc;

/// Wrapper for SyncIndex that can be stored in a ResourceArc.
/// The index is never mutated after parsing, so lookups share it without a
/// lock, including from the Rayon pool.
pub struct SyncIndexResource {
    pub index: SyncIndex,
}

impl SyncIndexResource {
    pub fn new(index: SyncIndex) -> Self {
        SyncIndexResource { index }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for SyncIndexResource {}

/// Type alias for the ResourceArc
pub type SyncIndexRef = ResourceArc<SyncIndexResource>;
