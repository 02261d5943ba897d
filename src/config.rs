//! Parse and search configuration
//!
//! Both structs carry defaults that reproduce the stock behaviour; callers
//! only construct them to override a single knob.

/// Working directory of the compile sandbox, stripped from input names.
pub const DEFAULT_SANDBOX_ROOT: &str = "/work";

/// Options applied while building a [`SyncIndex`](crate::index::SyncIndex)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Directory prefix removed from `Input:` paths so that names are
    /// project-relative. `None` keeps absolute paths untouched.
    pub sandbox_root: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            sandbox_root: Some(DEFAULT_SANDBOX_ROOT.to_string()),
        }
    }
}

impl ParseOptions {
    /// Options that only strip the leading `./`
    pub fn without_sandbox() -> Self {
        Self { sandbox_root: None }
    }
}

/// Tuning constants for the inverse and forward resolvers (page points)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Largest line offset probed by the forward zigzag search
    pub max_line_offset: u32,
    /// Floor applied to the returned highlight width and height
    pub min_extent: f64,
    /// Vertical extent below which a forward region counts as collapsed
    pub degenerate_height: f64,
    /// Span above the baseline used for a collapsed region
    pub default_ascent: f64,
    /// Span below the baseline used for a collapsed region
    pub default_descent: f64,
    /// Penalty added to kern distances so boxes win ties
    pub kern_bias: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_line_offset: 3,
            min_extent: 10.0,
            degenerate_height: 2.0,
            default_ascent: 12.0,
            default_descent: 3.0,
            kern_bias: 0.001,
        }
    }
}
