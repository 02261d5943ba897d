//! Index Builder
//!
//! Builds a SyncIndex from stream events.
//! Implements the StreamHandler trait for use with StreamScanner.
//!
//! The open containers of the current page are tracked on an explicit
//! stack; the tree needs no recursion to build. A closing bracket pops
//! unconditionally without checking which kind of box it closes.

use tracing::{debug, trace};

use super::node::{NodeId, SyncNode};
use super::sync_index::{NodeRef, SyncIndex};
use crate::config::ParseOptions;
use crate::core::stream::{HeaderField, Record, StreamHandler, StreamScanner};
use crate::index::NodeKind;

/// Builder state for constructing a SyncIndex
pub struct IndexBuilder<'o> {
    /// The index being built
    index: SyncIndex,
    options: &'o ParseOptions,
    /// Page context opened by the last `{`, cleared by `}`
    page: Option<u32>,
    /// Open containers. `None` marks a malformed opener whose closer is
    /// still expected.
    stack: Vec<Option<NodeId>>,
    /// Lines that could not be interpreted
    skipped: usize,
}

impl<'o> IndexBuilder<'o> {
    /// Create a new builder
    pub fn new(options: &'o ParseOptions) -> Self {
        Self {
            index: SyncIndex::default(),
            options,
            page: None,
            stack: Vec::with_capacity(32),
            skipped: 0,
        }
    }

    /// Finish building and return the index
    pub fn finish(mut self) -> SyncIndex {
        self.index.shrink_to_fit();

        debug!(
            pages = self.index.page_count(),
            nodes = self.index.node_count(),
            inputs = self.index.inputs.len(),
            lines = self.index.friend_key_count(),
            skipped = self.skipped,
            "built synchronization index"
        );

        self.index
    }

    /// Innermost open container that was recorded successfully
    #[inline]
    fn current_parent(&self) -> Option<NodeId> {
        self.stack.iter().rev().find_map(|slot| *slot)
    }

    fn to_node(&self, record: &Record, page: u32) -> SyncNode {
        let scale = &self.index.header.scale;
        let (width, height, depth, reversed) = match record.extent {
            Some(extent) => (
                scale.extent(extent.width),
                extent.height.map(|h| scale.extent(h)).unwrap_or(0.0),
                extent.depth.map(|d| scale.extent(d)).unwrap_or(0.0),
                extent.width < 0,
            ),
            None => (0.0, 0.0, 0.0, false),
        };

        SyncNode {
            kind: record.kind,
            input: record.input,
            line: record.line,
            column: record.column,
            page,
            h: scale.h(record.h),
            v: scale.v(record.v),
            width,
            height,
            depth,
            reversed,
            parent: None,
            children: Vec::new(),
        }
    }
}

// ============================================================================
// StreamHandler Implementation
// ============================================================================

impl StreamHandler for IndexBuilder<'_> {
    fn header(&mut self, field: HeaderField<'_>) {
        let header = &mut self.index.header;
        match field {
            HeaderField::Version(v) => header.version = Some(v),
            HeaderField::Output(name) => {
                header.output = Some(String::from_utf8_lossy(name).trim().to_string())
            }
            HeaderField::Magnification(m) => header.scale.magnification = m,
            HeaderField::Unit(u) => header.scale.unit = u,
            HeaderField::XOffset(x) => header.scale.x_offset = x,
            HeaderField::YOffset(y) => header.scale.y_offset = y,
        }
    }

    fn input(&mut self, tag: u32, path: &[u8]) {
        let path = String::from_utf8_lossy(path);
        self.index
            .inputs
            .insert(tag, &path, self.options.sandbox_root.as_deref());
    }

    fn page_start(&mut self, page: u32) {
        self.page = Some(page);
        self.stack.clear();
        self.index.page_entry(page);
    }

    fn page_end(&mut self, _page: u32) {
        self.page = None;
        self.stack.clear();
    }

    fn record(&mut self, record: &Record) {
        let Some(page) = self.page else {
            self.skipped += 1;
            trace!(kind = record.kind.as_str(), line = record.line, "record outside page");
            return;
        };

        let node = self.to_node(record, page);
        let parent = self.current_parent();
        let id = self.index.page_entry(page).push(node, parent);

        if record.line > 0 {
            self.index
                .add_friend(record.input, record.line, NodeRef { page, id });
        }
        if record.kind.is_container() {
            self.stack.push(Some(id));
        }
    }

    fn malformed_record(&mut self, kind: NodeKind) {
        if self.page.is_some() && kind.is_container() {
            self.stack.push(None);
        }
    }

    fn box_end(&mut self) {
        self.stack.pop();
    }

    fn skipped(&mut self, line: &[u8]) {
        self.skipped += 1;
        trace!(line = %String::from_utf8_lossy(line), "skipped synctex line");
    }
}

// ============================================================================
// Build Functions
// ============================================================================

/// Build a SyncIndex from decompressed stream bytes
pub fn build_index(input: &[u8], options: &ParseOptions) -> SyncIndex {
    let mut builder = IndexBuilder::new(options);
    StreamScanner::new(input).scan(&mut builder);
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::index::page::PageTree;

    const SP_TO_PDF: f64 = (1.0 / 65536.0) * (72.0 / 72.27);

    fn parse(text: &str) -> SyncIndex {
        build_index(text.as_bytes(), &ParseOptions::default())
    }

    fn find<'a>(page: &'a PageTree, kind: NodeKind, line: u32) -> &'a SyncNode {
        page.nodes
            .iter()
            .find(|n| n.kind == kind && n.line == line)
            .unwrap()
    }

    #[test]
    fn test_parse_preamble() {
        let index = parse(FIXTURE_BASIC);
        assert_eq!(index.magnification(), 1000);
        assert_eq!(index.unit(), 1);
        assert_eq!(index.x_offset(), 0);
        assert_eq!(index.y_offset(), 0);
    }

    #[test]
    fn test_input_names_normalized() {
        let index = parse(FIXTURE_BASIC);
        assert_eq!(index.inputs.len(), 2);
        assert_eq!(index.inputs.name(1), Some("main.tex"));
        assert_eq!(index.inputs.name(2), Some("chapter.tex"));
    }

    #[test]
    fn test_sandbox_prefix_stripped() {
        let text = FIXTURE_BASIC.replace(
            "Input:2:./chapter.tex",
            "Input:2:/work/sections/chapter.tex",
        );
        let index = parse(&text);
        assert_eq!(index.inputs.name(2), Some("sections/chapter.tex"));

        let raw = build_index(text.as_bytes(), &ParseOptions::without_sandbox());
        assert_eq!(raw.inputs.name(2), Some("/work/sections/chapter.tex"));
    }

    #[test]
    fn test_tree_structure() {
        let index = parse(FIXTURE_BASIC);
        let page = index.page(1).unwrap();

        assert_eq!(page.len(), 6);
        assert_eq!(page.roots.len(), 1);
        let root = page.get(page.roots[0]).unwrap();
        assert_eq!(root.kind, NodeKind::VBox);
        assert_eq!(root.children.len(), 2);

        let hbox = page.get(root.children[0]).unwrap();
        assert_eq!(hbox.kind, NodeKind::HBox);
        assert_eq!(hbox.line, 3);
        assert_eq!(hbox.parent, Some(page.roots[0]));
        let kinds: Vec<_> = hbox
            .children
            .iter()
            .map(|&c| page.get(c).unwrap().kind)
            .collect();
        assert_eq!(kinds, vec![NodeKind::Kern, NodeKind::VoidHBox]);

        let chapter = page.get(root.children[1]).unwrap();
        assert_eq!(chapter.input, 2);
        assert_eq!(chapter.line, 10);
    }

    #[test]
    fn test_coordinates_converted() {
        let index = parse(FIXTURE_BASIC);
        let page = index.page(1).unwrap();
        let hbox = find(page, NodeKind::HBox, 3);

        assert!((hbox.h - 4736286.0 * SP_TO_PDF).abs() < 0.1);
        assert!((hbox.v - 3670016.0 * SP_TO_PDF).abs() < 0.1);
        assert!((hbox.width - 25137278.0 * SP_TO_PDF).abs() < 0.1);
        assert!((hbox.height - 655360.0 * SP_TO_PDF).abs() < 0.1);
        assert_eq!(hbox.depth, 0.0);
    }

    #[test]
    fn test_void_hbox_example_coordinates() {
        // Unit:1, Magnification:1000
        let index = parse(FIXTURE_BASIC);
        let page = index.page(1).unwrap();
        let void = find(page, NodeKind::VoidHBox, 3);
        let expected = 4736286.0 * (1.0 / 65536.0) * (72.0 / 72.27);
        assert!((void.h - expected).abs() < 0.1);
        assert!((void.width - 3078103.0 * SP_TO_PDF).abs() < 0.1);
    }

    #[test]
    fn test_columns_parsed() {
        let index = parse(FIXTURE_WITH_COLUMNS);
        let page = index.page(1).unwrap();

        let hbox = find(page, NodeKind::HBox, 7);
        assert_eq!(hbox.column, Some(5));
        let math = page.nodes.iter().find(|n| n.kind == NodeKind::Math).unwrap();
        assert_eq!(math.column, Some(10));
        assert_eq!(math.width, 0.0);

        let basic = parse(FIXTURE_BASIC);
        assert_eq!(find(basic.page(1).unwrap(), NodeKind::HBox, 3).column, None);
    }

    #[test]
    fn test_kern_width_only() {
        let index = parse(FIXTURE_WITH_COLUMNS);
        let page = index.page(1).unwrap();
        let kern = page.nodes.iter().find(|n| n.kind == NodeKind::Kern).unwrap();
        assert!((kern.width - 100000.0 * SP_TO_PDF).abs() < 0.1);
        assert_eq!(kern.height, 0.0);
        assert_eq!(kern.depth, 0.0);
        assert!(!kern.reversed);
    }

    #[test]
    fn test_negative_width_flags_reversed() {
        let text = "Content:\n{1\n(1,1:0,0:100,10,0\nk1,1:50,0:-65536\n)\n}1\n";
        let index = parse(text);
        let kern = find(index.page(1).unwrap(), NodeKind::Kern, 1);
        assert!(kern.reversed);
        assert!(kern.width > 0.0);
    }

    #[test]
    fn test_scaled_magnification_and_unit() {
        let index = parse(FIXTURE_SCALED);
        let hbox = find(index.page(1).unwrap(), NodeKind::HBox, 3);
        let factor = (2.0 * 2000.0) / (1000.0 * 65536.0) * (72.0 / 72.27);
        assert!((hbox.h - 4736286.0 * factor).abs() < 0.1);
    }

    #[test]
    fn test_scaling_law_against_baseline() {
        let body = "Content:\n{1\n(1,1:4736286,3670016:25137278,655360,196608\n)\n}1\n";
        let base = parse(&format!("Magnification:1000\nUnit:1000\n{}", body));
        let scaled = parse(&format!("Magnification:3000\nUnit:7\n{}", body));
        let b = find(base.page(1).unwrap(), NodeKind::HBox, 1);
        let s = find(scaled.page(1).unwrap(), NodeKind::HBox, 1);
        let factor = (7.0 * 3000.0) / (1000.0 * 1000.0);
        for (bv, sv) in [(b.h, s.h), (b.v, s.v), (b.width, s.width), (b.depth, s.depth)] {
            assert!((sv - bv * factor).abs() < 1e-6);
        }
    }

    #[test]
    fn test_offsets_added_before_conversion() {
        let text = "X Offset:65536\nY Offset:131072\nContent:\n{1\n(1,1:0,0:10,10,0\n)\n}1\n";
        let index = parse(text);
        let hbox = find(index.page(1).unwrap(), NodeKind::HBox, 1);
        assert!((hbox.h - 72.0 / 72.27).abs() < 1e-9);
        assert!((hbox.v - 2.0 * 72.0 / 72.27).abs() < 1e-9);
    }

    #[test]
    fn test_multiple_pages() {
        let index = parse(FIXTURE_MULTI_PAGE);
        assert_eq!(index.page_count(), 2);
        assert!(index.page(1).unwrap().nodes.iter().any(|n| n.line == 5));
        assert!(index.page(2).unwrap().nodes.iter().any(|n| n.line == 15));
        assert!(index.page(2).unwrap().nodes.iter().all(|n| n.page == 2));
    }

    #[test]
    fn test_empty_content() {
        let index = parse(FIXTURE_EMPTY);
        assert_eq!(index.page_count(), 0);
        assert_eq!(index.inputs.len(), 1);
    }

    #[test]
    fn test_records_outside_page_skipped() {
        let text = "Content:\n(1,1:0,0:10,10,0\n)\n{1\n}1\nh1,2:0,0:1,1,1\n";
        let index = parse(text);
        assert_eq!(index.page_count(), 1);
        assert!(index.page(1).unwrap().is_empty());
        assert!(index.friends(1, 1).is_empty());
        assert!(index.friends(1, 2).is_empty());
    }

    #[test]
    fn test_line_zero_not_indexed() {
        let text = "Content:\n{1\n(1,0:0,0:10,10,0\ng1,0:5,0\n)\n}1\n";
        let index = parse(text);
        assert_eq!(index.page(1).unwrap().len(), 2);
        assert!(index.friends(1, 0).is_empty());
        assert_eq!(index.friend_key_count(), 0);
    }

    #[test]
    fn test_malformed_lines_do_not_abort() {
        let text = "Content:\n{1\n[1,1:0,0:100,100,0\n(garbage\nh1,2:0,0:1,1,1\n)\n\
                    (1,3:0,0:10,10,0\n)\n]\n}1\n";
        let index = parse(text);
        let page = index.page(1).unwrap();
        // The broken opener still owns a stack slot, so the void box stays
        // under the vbox and the later hbox is a sibling, not a child.
        assert_eq!(page.roots.len(), 1);
        let root = page.get(page.roots[0]).unwrap();
        assert_eq!(root.children.len(), 2);
        assert_eq!(page.get(root.children[1]).unwrap().line, 3);
    }

    #[test]
    fn test_input_declared_mid_content() {
        let text = "Input:1:./main.tex\nContent:\n{1\nInput:2:./late.tex\n\
                    (2,4:0,0:10,10,0\n)\n}1\n";
        let index = parse(text);
        assert_eq!(index.inputs.name(2), Some("late.tex"));
        assert_eq!(index.friends(2, 4).len(), 1);
    }

    #[test]
    fn test_page_open_resets_stack() {
        // Unbalanced page 1: its open box must not become page 2's parent
        let text = "Content:\n{1\n(1,1:0,0:10,10,0\n}1\n{2\n(1,2:0,0:10,10,0\n)\n}2\n";
        let index = parse(text);
        let page = index.page(2).unwrap();
        assert_eq!(page.roots.len(), 1);
        assert_eq!(page.get(page.roots[0]).unwrap().parent, None);
    }

    #[test]
    fn test_postamble_stops_parsing() {
        let text = "Content:\n{1\n(1,1:0,0:10,10,0\n)\n}1\n\
                    Postamble:\n{2\n(1,2:0,0:10,10,0\n)\n}2\n";
        let index = parse(text);
        assert_eq!(index.page_count(), 1);
    }
}
