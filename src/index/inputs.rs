//! Input table: tag to normalized source filename
//!
//! Names are stored project-relative: a leading `./` is stripped, and so is
//! the compile sandbox's working directory. Consumers match against these
//! names, never against the raw compiler paths.

use std::collections::BTreeMap;

/// Mapping from input tag to normalized filename
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputTable {
    names: BTreeMap<u32, String>,
}

impl InputTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a tag. Later declarations win.
    pub fn insert(&mut self, tag: u32, raw_path: &str, sandbox_root: Option<&str>) {
        self.names
            .insert(tag, normalize_name(raw_path, sandbox_root).to_string());
    }

    /// Normalized name for a tag
    #[inline]
    pub fn name(&self, tag: u32) -> Option<&str> {
        self.names.get(&tag).map(String::as_str)
    }

    /// Resolve a filename to its tag: exact name first, then a `/`-bounded
    /// suffix match. Ties go to the lowest tag.
    pub fn resolve(&self, file: &str) -> Option<u32> {
        let file = normalize_name(file, None);
        if file.is_empty() {
            return None;
        }
        self.names
            .iter()
            .find(|(_, name)| name.as_str() == file)
            .or_else(|| {
                self.names.iter().find(|(_, name)| {
                    name.len() > file.len()
                        && name.ends_with(file)
                        && name.as_bytes()[name.len() - file.len() - 1] == b'/'
                })
            })
            .map(|(&tag, _)| tag)
    }

    /// Iterate `(tag, name)` in tag order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.names.iter().map(|(&tag, name)| (tag, name.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Strip `./` and the sandbox root from a compiler-reported path
pub fn normalize_name<'a>(raw: &'a str, sandbox_root: Option<&str>) -> &'a str {
    let mut name = raw.trim();
    if let Some(root) = sandbox_root.map(|r| r.trim_end_matches('/')) {
        if !root.is_empty() {
            if let Some(rest) = name.strip_prefix(root) {
                if let Some(rest) = rest.strip_prefix('/') {
                    name = rest;
                }
            }
        }
    }
    while let Some(rest) = name.strip_prefix("./") {
        name = rest;
    }
    name
}
