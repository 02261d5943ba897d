//! Synchronization Index - main index structure
//!
//! Built once per compile by [`IndexBuilder`](super::builder::IndexBuilder)
//! and read-only afterwards. A new compile produces a new index; nothing is
//! ever patched in place, so an index can be shared freely across threads.

use std::collections::{BTreeMap, HashMap};

use super::builder::build_index;
use super::inputs::InputTable;
use super::node::{NodeId, SyncNode};
use super::page::PageTree;
use crate::config::ParseOptions;
use crate::core::decompress::decompress;
use crate::core::units::Scale;
use crate::error::Result;

/// Location of a node: page plus arena index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub page: u32,
    pub id: NodeId,
}

/// Header values read before `Content:`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    /// `SyncTeX Version:`
    pub version: Option<i64>,
    /// `Output:` file name
    pub output: Option<String>,
    /// Unit, magnification and offsets used during conversion
    pub scale: Scale,
}

/// The parsed synchronization data of one compiled document
#[derive(Debug, Default)]
pub struct SyncIndex {
    pub header: StreamHeader,
    pub inputs: InputTable,
    pages: BTreeMap<u32, PageTree>,
    /// `(input tag, source line)` to every node recorded there, in record order
    friends: HashMap<(u32, u32), Vec<NodeRef>>,
}

impl SyncIndex {
    /// Decompress if needed and parse with default options
    ///
    /// # Errors
    ///
    /// Fails only when compressed input cannot be decompressed.
    pub fn parse(input: &[u8]) -> Result<Self> {
        Self::parse_with(input, &ParseOptions::default())
    }

    /// Decompress if needed and parse
    ///
    /// # Errors
    ///
    /// Fails only when compressed input cannot be decompressed.
    pub fn parse_with(input: &[u8], options: &ParseOptions) -> Result<Self> {
        let bytes = decompress(input)?;
        Ok(build_index(&bytes, options))
    }

    /// Parse already-decompressed stream text
    pub fn parse_text(text: &str) -> Self {
        build_index(text.as_bytes(), &ParseOptions::default())
    }

    /// Parse already-decompressed stream text with explicit options
    pub fn parse_text_with(text: &str, options: &ParseOptions) -> Self {
        build_index(text.as_bytes(), options)
    }

    #[inline]
    pub fn magnification(&self) -> i64 {
        self.header.scale.magnification
    }

    #[inline]
    pub fn unit(&self) -> i64 {
        self.header.scale.unit
    }

    #[inline]
    pub fn x_offset(&self) -> i64 {
        self.header.scale.x_offset
    }

    #[inline]
    pub fn y_offset(&self) -> i64 {
        self.header.scale.y_offset
    }

    /// Nodes of a page
    #[inline]
    pub fn page(&self, page: u32) -> Option<&PageTree> {
        self.pages.get(&page)
    }

    /// Page numbers in ascending order
    pub fn page_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.keys().copied()
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of nodes over all pages
    pub fn node_count(&self) -> usize {
        self.pages.values().map(PageTree::len).sum()
    }

    /// Resolve a node reference
    #[inline]
    pub fn node(&self, node: NodeRef) -> Option<&SyncNode> {
        self.page(node.page)?.get(node.id)
    }

    /// Nodes recorded at exactly `(tag, line)`
    #[inline]
    pub fn friends(&self, tag: u32, line: u32) -> &[NodeRef] {
        self.friends
            .get(&(tag, line))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct `(tag, line)` keys
    #[inline]
    pub fn friend_key_count(&self) -> usize {
        self.friends.len()
    }

    // === Builder methods (used by IndexBuilder) ===

    /// Get or create a page
    pub(crate) fn page_entry(&mut self, page: u32) -> &mut PageTree {
        self.pages.entry(page).or_default()
    }

    pub(crate) fn add_friend(&mut self, tag: u32, line: u32, node: NodeRef) {
        self.friends.entry((tag, line)).or_default().push(node);
    }

    /// Release over-allocated capacity after building
    pub(crate) fn shrink_to_fit(&mut self) {
        for page in self.pages.values_mut() {
            page.shrink_to_fit();
        }
        for refs in self.friends.values_mut() {
            refs.shrink_to_fit();
        }
        self.friends.shrink_to_fit();
    }
}
