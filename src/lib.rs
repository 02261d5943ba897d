//! RustySyncTeX - SyncTeX parsing and source/PDF position lookups
//!
//! Pipeline:
//! 1. Decompress (gzip or plain text)
//! 2. Stream scan into a per-page box tree plus a (file, line) index
//! 3. Inverse lookup: page point to source line
//! 4. Forward lookup: source line to page rectangle
//!
//! Batch lookups run on Rayon over the shared, immutable index.

// Library items are also reachable outside the NIF layer
#![allow(dead_code)]

use rustler::{Binary, Encoder, Env, NifResult, Term};

mod config;
mod core;
mod error;
mod index;
mod resource;
mod search;
mod term;

#[cfg(test)]
mod fixtures;

use config::{ParseOptions, SearchConfig};
use index::SyncIndex;
use resource::{SyncIndexRef, SyncIndexResource};
use search::PagePoint;
use term::{
    error_to_term, header_to_term, inputs_to_term, list_to_term, location_to_term,
    region_to_term, term_to_parse_options,
};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    fn record_peak(current: usize) {
        let mut peak = PEAK_ALLOCATED.load(Ordering::Relaxed);
        while current > peak {
            match PEAK_ALLOCATED.compare_exchange_weak(
                peak,
                current,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }
    }

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                let size = layout.size();
                record_peak(ALLOCATED.fetch_add(size, Ordering::Relaxed) + size);
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }
    }

    /// `(current, peak)` in bytes
    pub fn snapshot() -> (usize, usize) {
        (
            ALLOCATED.load(Ordering::SeqCst),
            PEAK_ALLOCATED.load(Ordering::SeqCst),
        )
    }

    /// Reset the peak to the current usage, returning the previous values
    pub fn reset() -> (usize, usize) {
        let current = ALLOCATED.load(Ordering::SeqCst);
        let peak = PEAK_ALLOCATED.swap(current, Ordering::SeqCst);
        (current, peak)
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::TrackingAllocator = tracking::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Memory Tracking NIFs
// ============================================================================

/// Bytes allocated by the native side: `{current, peak}`
#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn memory_stats() -> (usize, usize) {
    tracking::snapshot()
}

#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn reset_memory_stats() -> (usize, usize) {
    tracking::reset()
}

#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn memory_stats() -> (usize, usize) {
    (0, 0)
}

#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn reset_memory_stats() -> (usize, usize) {
    (0, 0)
}

// ============================================================================
// Parsing
// ============================================================================

fn parse_to_term<'a>(env: Env<'a>, input: &[u8], options: &ParseOptions) -> Term<'a> {
    match SyncIndex::parse_with(input, options) {
        Ok(index) => {
            let arc = SyncIndexRef::new(SyncIndexResource::new(index));
            (term::ok(), arc).encode(env)
        }
        Err(e) => error_to_term(env, &e.to_string()),
    }
}

/// Parse a (possibly gzipped) SyncTeX stream
/// Returns {:ok, index} or {:error, reason}
#[rustler::nif(schedule = "DirtyCpu")]
fn parse<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    Ok(parse_to_term(env, input.as_slice(), &ParseOptions::default()))
}

/// Parse with `%{sandbox_root: binary | nil}`
#[rustler::nif(schedule = "DirtyCpu")]
fn parse_with_options<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    options: Term<'a>,
) -> NifResult<Term<'a>> {
    let options = term_to_parse_options(env, options)?;
    Ok(parse_to_term(env, input.as_slice(), &options))
}

// ============================================================================
// Lookups
// ============================================================================

/// Accept integers as well as floats for coordinates
fn decode_coordinate(term: Term<'_>) -> NifResult<f64> {
    match term.decode::<f64>() {
        Ok(value) => Ok(value),
        Err(_) => term.decode::<i64>().map(|value| value as f64),
    }
}

/// Page point to `%{file, line}` or nil
#[rustler::nif]
fn inverse_lookup<'a>(
    env: Env<'a>,
    index_ref: SyncIndexRef,
    page: u32,
    x: Term<'a>,
    y: Term<'a>,
) -> NifResult<Term<'a>> {
    let (x, y) = (decode_coordinate(x)?, decode_coordinate(y)?);
    let location = index_ref.index.inverse_lookup(page, x, y);
    location_to_term(env, location.as_ref())
}

/// Source line to `%{page, x, y, width, height}` or nil
#[rustler::nif]
fn forward_lookup<'a>(
    env: Env<'a>,
    index_ref: SyncIndexRef,
    file: &str,
    line: u32,
) -> NifResult<Term<'a>> {
    let region = index_ref.index.forward_lookup(file, line);
    region_to_term(env, region.as_ref())
}

/// Many page points at once, evaluated in parallel
#[rustler::nif(schedule = "DirtyCpu")]
fn inverse_lookup_many<'a>(
    env: Env<'a>,
    index_ref: SyncIndexRef,
    points: Vec<(u32, Term<'a>, Term<'a>)>,
) -> NifResult<Term<'a>> {
    let points = points
        .into_iter()
        .map(|(page, x, y)| {
            Ok(PagePoint {
                page,
                x: decode_coordinate(x)?,
                y: decode_coordinate(y)?,
            })
        })
        .collect::<NifResult<Vec<_>>>()?;

    let results =
        search::inverse_lookup_many(&index_ref.index, &points, &SearchConfig::default());
    let items = results
        .iter()
        .map(|location| location_to_term(env, location.as_ref()))
        .collect::<NifResult<Vec<_>>>()?;
    Ok(list_to_term(env, items))
}

/// Many `{file, line}` pairs at once, evaluated in parallel
#[rustler::nif(schedule = "DirtyCpu")]
fn forward_lookup_many<'a>(
    env: Env<'a>,
    index_ref: SyncIndexRef,
    queries: Vec<(String, u32)>,
) -> NifResult<Term<'a>> {
    let results =
        search::forward_lookup_many(&index_ref.index, &queries, &SearchConfig::default());
    let items = results
        .iter()
        .map(|region| region_to_term(env, region.as_ref()))
        .collect::<NifResult<Vec<_>>>()?;
    Ok(list_to_term(env, items))
}

// ============================================================================
// Index Metadata
// ============================================================================

/// `[{tag, name}]`
#[rustler::nif]
fn inputs<'a>(env: Env<'a>, index_ref: SyncIndexRef) -> Term<'a> {
    inputs_to_term(env, &index_ref.index.inputs)
}

/// Page numbers that have records, ascending
#[rustler::nif]
fn pages(index_ref: SyncIndexRef) -> Vec<u32> {
    index_ref.index.page_numbers().collect()
}

/// `%{version, output, magnification, unit, x_offset, y_offset}`
#[rustler::nif]
fn header<'a>(env: Env<'a>, index_ref: SyncIndexRef) -> NifResult<Term<'a>> {
    header_to_term(env, &index_ref.index.header)
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.RustySyncTeX.Native");
