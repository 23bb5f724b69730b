//! Reverse index from canvas regions to interaction indices.
//!
//! Built by each render pass and installed into the session, so hit testing
//! always matches what was last drawn.

use kurbo::{Point, Rect};

/// A clickable region belonging to one interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    pub rect: Rect,
    pub index: usize,
}

/// Regions in draw order. Later regions sit on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitIndex {
    regions: Vec<HitRegion>,
}

impl HitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a region for the interaction at `index`.
    pub fn push(&mut self, rect: Rect, index: usize) {
        self.regions.push(HitRegion { rect, index });
    }

    /// Topmost interaction whose region contains the point (edges inclusive).
    pub fn interaction_at(&self, point: Point) -> Option<usize> {
        self.regions
            .iter()
            .rev()
            .find(|r| {
                point.x >= r.rect.x0
                    && point.x <= r.rect.x1
                    && point.y >= r.rect.y0
                    && point.y <= r.rect.y1
            })
            .map(|r| r.index)
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
