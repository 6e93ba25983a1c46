//! Proportional scroll mapping from the editor viewport onto the minimap
//!
//! The editor reports where it is scrolled as a [`ScrollInfo`]; the minimap
//! container reports its own [`ContainerExtent`]. The editor position becomes
//! a ratio in `[0, 1]` of its scrollable range, and the same ratio is applied
//! to the minimap's scrollable range.
//!
//! All inputs are sanitized: NaN, infinite and negative values count as 0.
//! A viewport whose content fits without scrolling maps to ratio 0.

/// Denominators at or below this are treated as "nothing to scroll".
pub const SCROLL_EPSILON: f32 = 1e-3;

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Scroll geometry of the primary (editor) viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollInfo {
    /// Current vertical scroll offset
    pub top: f32,
    /// Total height of the scrollable content
    pub height: f32,
    /// Height of the visible part of the content
    pub client_height: f32,
}

impl ScrollInfo {
    pub fn new(top: f32, height: f32, client_height: f32) -> Self {
        Self {
            top,
            height,
            client_height,
        }
    }

    /// How far the content can scroll. Zero when it fits in the viewport.
    pub fn max_scroll(&self) -> f32 {
        (sanitize(self.height) - sanitize(self.client_height)).max(0.0)
    }

    /// Position as a fraction of the scrollable range, clamped to `[0, 1]`.
    pub fn ratio(&self) -> f32 {
        scroll_ratio(self.top, self.height, self.client_height)
    }
}

/// Size of the secondary (minimap) container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerExtent {
    /// Total height of the rendered minimap rows
    pub content_height: f32,
    /// Height of the visible part of the minimap
    pub viewport_height: f32,
}

impl ContainerExtent {
    pub fn new(content_height: f32, viewport_height: f32) -> Self {
        Self {
            content_height,
            viewport_height,
        }
    }

    /// Largest valid scroll offset for this container.
    pub fn max_scroll(&self) -> f32 {
        (sanitize(self.content_height) - sanitize(self.viewport_height)).max(0.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mapping
// ─────────────────────────────────────────────────────────────────────────────

/// Fraction of the scrollable range that `scroll_top` represents.
///
/// Returns 0 when the content fits inside the viewport.
pub fn scroll_ratio(scroll_top: f32, content_height: f32, viewport_height: f32) -> f32 {
    let range = sanitize(content_height) - sanitize(viewport_height);
    if range <= SCROLL_EPSILON {
        return 0.0;
    }
    (sanitize(scroll_top) / range).clamp(0.0, 1.0)
}

/// Map the primary scroll position onto the secondary container.
///
/// The result always lies in `[0, secondary.max_scroll()]`.
pub fn map_scroll(primary: ScrollInfo, secondary: ContainerExtent) -> f32 {
    let max = secondary.max_scroll();
    (primary.ratio() * max).clamp(0.0, max)
}

/// Part of the minimap content that corresponds to the editor's visible
/// region, as `(top, bottom)` in minimap content coordinates.
///
/// Returns `None` when the editor reports no content.
pub fn visible_band(primary: ScrollInfo, minimap_content_height: f32) -> Option<(f32, f32)> {
    let height = sanitize(primary.height);
    let content = sanitize(minimap_content_height);
    if height <= SCROLL_EPSILON || content <= 0.0 {
        return None;
    }
    let scale = content / height;
    let top = (sanitize(primary.top).min(height) * scale).min(content);
    let bottom = (top + sanitize(primary.client_height) * scale).min(content);
    Some((top, bottom))
}

/// Replace values that cannot describe a geometry with 0.
fn sanitize(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
