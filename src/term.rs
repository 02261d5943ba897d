//! Elixir Term Conversion Utilities
//!
//! Converts lookup results and index metadata to Elixir terms.

use rustler::{Encoder, Env, NewBinary, NifResult, Term};

use crate::config::ParseOptions;
use crate::index::{InputTable, StreamHeader};
use crate::search::{PageRegion, SourceLocation};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    file,
    line,
    page,
    x,
    y,
    width,
    height,
    version,
    output,
    magnification,
    unit,
    x_offset,
    y_offset,
    sandbox_root,
}

#[inline]
fn nil_term(env: Env<'_>) -> Term<'_> {
    rustler::types::atom::nil().encode(env)
}

/// `%{file: binary, line: integer}` or `nil`
pub fn location_to_term<'a>(
    env: Env<'a>,
    location: Option<&SourceLocation>,
) -> NifResult<Term<'a>> {
    let Some(location) = location else {
        return Ok(nil_term(env));
    };
    Term::map_from_pairs(
        env,
        &[
            (file().encode(env), str_to_binary(env, &location.file)),
            (line().encode(env), location.line.encode(env)),
        ],
    )
}

/// `%{page, x, y, width, height}` or `nil`
pub fn region_to_term<'a>(env: Env<'a>, region: Option<&PageRegion>) -> NifResult<Term<'a>> {
    let Some(region) = region else {
        return Ok(nil_term(env));
    };
    Term::map_from_pairs(
        env,
        &[
            (page().encode(env), region.page.encode(env)),
            (x().encode(env), region.x.encode(env)),
            (y().encode(env), region.y.encode(env)),
            (width().encode(env), region.width.encode(env)),
            (height().encode(env), region.height.encode(env)),
        ],
    )
}

/// Build a list from already-converted items, preserving order
pub fn list_to_term<'a>(env: Env<'a>, items: Vec<Term<'a>>) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for item in items.into_iter().rev() {
        list = list.list_prepend(item);
    }
    list
}

/// `[{tag, name}]` in tag order
pub fn inputs_to_term<'a>(env: Env<'a>, inputs: &InputTable) -> Term<'a> {
    let items = inputs
        .iter()
        .map(|(tag, name)| (tag, str_to_binary(env, name)).encode(env))
        .collect();
    list_to_term(env, items)
}

/// Header map; absent `version`/`output` become `nil`
pub fn header_to_term<'a>(env: Env<'a>, header: &StreamHeader) -> NifResult<Term<'a>> {
    let version_term = match header.version {
        Some(v) => v.encode(env),
        None => nil_term(env),
    };
    let output_term = match header.output.as_deref() {
        Some(name) => str_to_binary(env, name),
        None => nil_term(env),
    };
    let scale = &header.scale;
    Term::map_from_pairs(
        env,
        &[
            (version().encode(env), version_term),
            (output().encode(env), output_term),
            (magnification().encode(env), scale.magnification.encode(env)),
            (unit().encode(env), scale.unit.encode(env)),
            (x_offset().encode(env), scale.x_offset.encode(env)),
            (y_offset().encode(env), scale.y_offset.encode(env)),
        ],
    )
}

/// Read `%{sandbox_root: binary | nil}`. A missing key keeps the default root.
pub fn term_to_parse_options<'a>(env: Env<'a>, options: Term<'a>) -> NifResult<ParseOptions> {
    let mut parsed = ParseOptions::default();
    if let Ok(root) = options.map_get(sandbox_root().encode(env)) {
        parsed.sandbox_root = root.decode::<Option<String>>()?;
    }
    Ok(parsed)
}

/// `{:error, message}`
pub fn error_to_term<'a>(env: Env<'a>, message: &str) -> Term<'a> {
    (error(), str_to_binary(env, message)).encode(env)
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
