//! Scaled-point to page-point conversion
//!
//! The typesetting engine writes coordinates as fixed-point integers whose
//! meaning depends on the `Unit:` and `Magnification:` header fields:
//!
//! ```text
//! page_pt = raw * unit * magnification / (1000 * 65536) * (72 / 72.27)
//! ```
//!
//! Offsets are added to raw `h`/`v` values before conversion. Extents are
//! converted from their absolute value.

/// Scaled points per TeX point
pub const SCALED_POINTS_PER_POINT: f64 = 65536.0;

/// TeX points (1/72.27 in) to page points (1/72 in)
pub const TEX_TO_PAGE: f64 = 72.0 / 72.27;

/// Magnification that leaves coordinates unscaled
pub const UNIT_MAGNIFICATION: i64 = 1000;

/// Convert a raw coordinate to page points
#[inline]
pub fn to_page_points(raw: i64, unit: i64, magnification: i64) -> f64 {
    raw as f64 * unit as f64 * magnification as f64
        / (UNIT_MAGNIFICATION as f64 * SCALED_POINTS_PER_POINT)
        * TEX_TO_PAGE
}

/// Conversion parameters collected from the stream header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub unit: i64,
    pub magnification: i64,
    pub x_offset: i64,
    pub y_offset: i64,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            unit: 1,
            magnification: UNIT_MAGNIFICATION,
            x_offset: 0,
            y_offset: 0,
        }
    }
}

impl Scale {
    /// Horizontal position in page points
    #[inline]
    pub fn h(&self, raw: i64) -> f64 {
        to_page_points(raw.saturating_add(self.x_offset), self.unit, self.magnification)
    }

    /// Vertical position in page points (top-left origin, downward)
    #[inline]
    pub fn v(&self, raw: i64) -> f64 {
        to_page_points(raw.saturating_add(self.y_offset), self.unit, self.magnification)
    }

    /// Width, height or depth in page points. The sign of the raw value
    /// encodes drawing direction only.
    #[inline]
    pub fn extent(&self, raw: i64) -> f64 {
        to_page_points(raw.saturating_abs(), self.unit, self.magnification)
    }
}
