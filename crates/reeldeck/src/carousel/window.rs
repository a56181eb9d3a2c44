use std::ops::Range;

use crate::config::DEFAULT_PRELOAD_RADIUS;

/// What the renderer should put in a slot.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SlotKind {
    /// a real player is mounted
    Player,
    /// outside the preload window
    Placeholder,
    /// inside the window but without a playable source
    Invalid,
}

/// Items within `radius` of the current index get a mounted player.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PreloadWindow {
    pub radius: usize,
}

impl Default for PreloadWindow {
    fn default() -> Self {
        Self {
            radius: DEFAULT_PRELOAD_RADIUS,
        }
    }
}

impl PreloadWindow {
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    pub fn range(&self, index: usize, total: usize) -> Range<usize> {
        if total == 0 {
            return 0..0;
        }

        let start = index.saturating_sub(self.radius);
        let end = index.saturating_add(self.radius).saturating_add(1).min(total);
        start.min(end)..end
    }

    pub fn contains(&self, index: usize, candidate: usize) -> bool {
        candidate.abs_diff(index) <= self.radius
    }

    pub fn slot(&self, index: usize, candidate: usize, playable: bool) -> SlotKind {
        match (self.contains(index, candidate), playable) {
            (false, _) => SlotKind::Placeholder,
            (true, true) => SlotKind::Player,
            (true, false) => SlotKind::Invalid,
        }
    }
}

/// Fraction of slot `slot` inside a viewport of `page_height` when the
/// track sits at `offset_y`.
pub fn visible_ratio(slot: usize, offset_y: f32, page_height: f32) -> f32 {
    if page_height <= 0.0 {
        return 0.0;
    }

    let top = slot as f32 * page_height + offset_y;
    let bottom = top + page_height;
    let overlap = bottom.min(page_height) - top.max(0.0);
    (overlap / page_height).clamp(0.0, 1.0)
}
