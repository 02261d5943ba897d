//! Synchronization stream scanner with StreamHandler trait
//!
//! Splits the decompressed stream into lines, classifies each line and
//! dispatches typed events to a [`StreamHandler`]. The scanner holds no tree
//! state of its own; building the index is the handler's job.
//!
//! ```text
//! SyncTeX Version:1          header (until "Content:")
//! Input:1:./main.tex         also legal inside content
//! Magnification:1000
//! Unit:1
//! X Offset:0
//! Y Offset:0
//! Content:
//! {1                         page open
//! [1,1:0,0:34611850,49825690,0
//! (1,3:4736286,3670016:25137278,655360,0
//! k1,3,5:4736286,3670016:100000
//! )                          close, pops the stack
//! ]
//! }1                         page close
//! Postamble:                 end of parsing
//! ```

use super::scanner::{lines, parse_int, Scanner};
use crate::index::NodeKind;

/// Raw `W,H,D` triple. Only the width is guaranteed once the `:` separator
/// is present; kern records commonly carry the width alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawExtent {
    pub width: i64,
    pub height: Option<i64>,
    pub depth: Option<i64>,
}

/// A parsed node record, values still in raw stream units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub kind: NodeKind,
    pub input: u32,
    pub line: u32,
    pub column: Option<u32>,
    pub h: i64,
    pub v: i64,
    pub extent: Option<RawExtent>,
}

/// Header field recognized before `Content:`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField<'a> {
    Version(i64),
    Output(&'a [u8]),
    Magnification(i64),
    Unit(i64),
    XOffset(i64),
    YOffset(i64),
}

/// Trait for handling stream events
///
/// The scanner calls these methods in stream order. Lines that cannot be
/// interpreted are reported through [`StreamHandler::skipped`] and never
/// abort the scan.
pub trait StreamHandler {
    /// Called for each recognized header field
    fn header(&mut self, field: HeaderField<'_>);

    /// Called for `Input:<tag>:<path>`, in the header or mid-content
    fn input(&mut self, tag: u32, path: &[u8]);

    /// Called for `{<page>`
    fn page_start(&mut self, page: u32);

    /// Called for `}<page>`
    fn page_end(&mut self, page: u32);

    /// Called for each well-formed node record
    fn record(&mut self, record: &Record);

    /// Called for a record line of a known kind whose fields did not parse.
    /// Containers still have to occupy a stack slot so that their closer
    /// pops the right level.
    fn malformed_record(&mut self, _kind: NodeKind) {}

    /// Called for `]` and `)`
    fn box_end(&mut self);

    /// Called for lines with no interpretation (optional, default does nothing)
    fn skipped(&mut self, _line: &[u8]) {}
}

const CONTENT: &[u8] = b"Content:";
const POSTAMBLE: &[u8] = b"Postamble:";
const INPUT: &[u8] = b"Input:";

/// Line-oriented scanner that drives a [`StreamHandler`]
pub struct StreamScanner<'a> {
    input: &'a [u8],
    in_content: bool,
}

impl<'a> StreamScanner<'a> {
    /// Create a scanner over decompressed stream bytes
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            in_content: false,
        }
    }

    /// Scan until `Postamble:` or the end of input
    pub fn scan<H: StreamHandler>(&mut self, handler: &mut H) {
        for line in lines(self.input) {
            if line.is_empty() {
                continue;
            }
            if !self.in_content {
                if line == CONTENT {
                    self.in_content = true;
                } else {
                    scan_header_line(line, handler);
                }
                continue;
            }
            if line.starts_with(POSTAMBLE) {
                break;
            }
            scan_content_line(line, handler);
        }
    }
}

fn scan_header_line<H: StreamHandler>(line: &[u8], handler: &mut H) {
    if let Some(rest) = line.strip_prefix(INPUT) {
        scan_input(line, rest, handler);
        return;
    }
    if let Some(rest) = line.strip_prefix(b"Output:") {
        handler.header(HeaderField::Output(rest));
        return;
    }

    let field = if let Some(rest) = line.strip_prefix(b"SyncTeX Version:") {
        parse_int(rest).map(HeaderField::Version)
    } else if let Some(rest) = line.strip_prefix(b"Magnification:") {
        parse_int(rest).map(HeaderField::Magnification)
    } else if let Some(rest) = line.strip_prefix(b"Unit:") {
        parse_int(rest).map(HeaderField::Unit)
    } else if let Some(rest) = line.strip_prefix(b"X Offset:") {
        parse_int(rest).map(HeaderField::XOffset)
    } else if let Some(rest) = line.strip_prefix(b"Y Offset:") {
        parse_int(rest).map(HeaderField::YOffset)
    } else {
        None
    };

    match field {
        Some(field) => handler.header(field),
        None => handler.skipped(line),
    }
}

fn scan_content_line<H: StreamHandler>(line: &[u8], handler: &mut H) {
    let first = line[0];
    let rest = &line[1..];

    match first {
        b'{' => match parse_int(rest).and_then(|n| u32::try_from(n).ok()) {
            Some(page) => handler.page_start(page),
            None => handler.skipped(line),
        },
        // A malformed closer still ends the page
        b'}' => handler.page_end(
            parse_int(rest)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0),
        ),
        b']' | b')' => handler.box_end(),
        // Anchors carry byte offsets into the output file only
        b'!' => {}
        _ if line.starts_with(INPUT) => scan_input(line, &line[INPUT.len()..], handler),
        _ => match NodeKind::from_prefix(first) {
            Some(kind) => match parse_record(kind, rest) {
                Some(record) => handler.record(&record),
                None => {
                    handler.malformed_record(kind);
                    handler.skipped(line);
                }
            },
            None => handler.skipped(line),
        },
    }
}

fn scan_input<H: StreamHandler>(line: &[u8], rest: &[u8], handler: &mut H) {
    // Paths may themselves contain ':', only the first one separates the tag
    let mut scanner = Scanner::new(rest);
    match scanner.read_int() {
        Some((tag, Some(b':'))) => match u32::try_from(tag) {
            Ok(tag) => handler.input(tag, scanner.remaining()),
            Err(_) => handler.skipped(line),
        },
        _ => handler.skipped(line),
    }
}

/// Parse the body of a record line: `tag,line[,column]:h,v[:W,H,D]`
pub fn parse_record(kind: NodeKind, body: &[u8]) -> Option<Record> {
    let mut scanner = Scanner::new(body);

    let (input, delim) = scanner.read_int()?;
    if delim != Some(b',') {
        return None;
    }
    let (line, mut delim) = scanner.read_int()?;
    let mut column = None;
    if delim == Some(b',') {
        let (col, d) = scanner.read_int()?;
        column = Some(u32::try_from(col).ok()?);
        delim = d;
    }
    if delim != Some(b':') {
        return None;
    }

    let (h, delim) = scanner.read_int()?;
    if delim != Some(b',') {
        return None;
    }
    let (v, delim) = scanner.read_int()?;

    let extent = match delim {
        None => None,
        Some(b':') => Some(parse_extent(&mut scanner)?),
        Some(_) => return None,
    };

    Some(Record {
        kind,
        input: u32::try_from(input).ok()?,
        line: u32::try_from(line).ok()?,
        column,
        h,
        v,
        extent,
    })
}

fn parse_extent(scanner: &mut Scanner<'_>) -> Option<RawExtent> {
    let (width, delim) = scanner.read_int()?;
    let mut extent = RawExtent {
        width,
        height: None,
        depth: None,
    };
    if delim == Some(b',') {
        let (height, delim) = scanner.read_int()?;
        extent.height = Some(height);
        if delim == Some(b',') {
            extent.depth = Some(scanner.read_int()?.0);
        }
    }
    Some(extent)
}
