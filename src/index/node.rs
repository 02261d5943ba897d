//! Synchronization node types
//!
//! One [`SyncNode`] per record of the stream. Nodes live in a per-page arena
//! and refer to each other by [`NodeId`], so the parent link is a plain
//! index and never an owning reference.

/// Index of a node inside its page arena
pub type NodeId = u32;

/// Record kind, selected by the first byte of a record line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `(` horizontal box, a container
    HBox,
    /// `[` vertical box, a container
    VBox,
    /// `h` horizontal box without recorded children
    VoidHBox,
    /// `v` vertical box without recorded children
    VoidVBox,
    /// `k` or `x`, positioned after its horizontal move
    Kern,
    /// `g`
    Glue,
    /// `$`
    Math,
}

impl NodeKind {
    /// Map a record prefix byte to its kind
    #[inline]
    pub fn from_prefix(byte: u8) -> Option<Self> {
        match byte {
            b'[' => Some(NodeKind::VBox),
            b'(' => Some(NodeKind::HBox),
            b'v' => Some(NodeKind::VoidVBox),
            b'h' => Some(NodeKind::VoidHBox),
            b'x' | b'k' => Some(NodeKind::Kern),
            b'g' => Some(NodeKind::Glue),
            b'$' => Some(NodeKind::Math),
            _ => None,
        }
    }

    /// Record opens a container that is pushed on the stack
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::HBox | NodeKind::VBox)
    }

    /// Any of the four box kinds, void or not
    #[inline]
    pub fn is_box(self) -> bool {
        matches!(
            self,
            NodeKind::HBox | NodeKind::VBox | NodeKind::VoidHBox | NodeKind::VoidVBox
        )
    }

    /// Horizontal box, void or not
    #[inline]
    pub fn is_horizontal_box(self) -> bool {
        matches!(self, NodeKind::HBox | NodeKind::VoidHBox)
    }

    /// Short name used in log fields
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::HBox => "hbox",
            NodeKind::VBox => "vbox",
            NodeKind::VoidHBox => "void_hbox",
            NodeKind::VoidVBox => "void_vbox",
            NodeKind::Kern => "kern",
            NodeKind::Glue => "glue",
            NodeKind::Math => "math",
        }
    }
}

/// A recorded node, coordinates already in page points
#[derive(Debug, Clone, PartialEq)]
pub struct SyncNode {
    pub kind: NodeKind,
    /// Input tag resolved through the index's input table
    pub input: u32,
    /// Source line, 0 when the record has no source location
    pub line: u32,
    /// Source column, only written by format versions 1.2 and later
    pub column: Option<u32>,
    pub page: u32,
    /// Left edge
    pub h: f64,
    /// Baseline, measured downward from the top of the page
    pub v: f64,
    pub width: f64,
    /// Extent above the baseline
    pub height: f64,
    /// Extent below the baseline
    pub depth: f64,
    /// Raw width was negative (right-to-left drawing)
    pub reversed: bool,
    /// Enclosing container (`None` for page roots)
    pub parent: Option<NodeId>,
    /// Children in record order, empty for leaves
    pub children: Vec<NodeId>,
}

impl SyncNode {
    /// Top edge
    #[inline]
    pub fn top(&self) -> f64 {
        self.v - self.height
    }

    /// Bottom edge
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.v + self.depth
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f64 {
        self.h + self.width
    }

    /// Vertical extent
    #[inline]
    pub fn total_height(&self) -> f64 {
        self.height + self.depth
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.total_height()
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Source location key used by the friend index
    #[inline]
    pub fn location(&self) -> (u32, u32) {
        (self.input, self.line)
    }
}
