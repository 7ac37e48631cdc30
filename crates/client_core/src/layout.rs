//! Video sizing for narrow viewports.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 800)
    }
}

/// Measured heights of the page regions that sit around the video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedRegions {
    pub header: u32,
    pub game_info: u32,
    pub instructions: u32,
    pub controls: u32,
}

impl FixedRegions {
    pub fn total(&self) -> u64 {
        u64::from(self.header)
            + u64::from(self.game_info)
            + u64::from(self.instructions)
            + u64::from(self.controls)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VideoHeightCap {
    #[default]
    None,
    Max(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutRules {
    /// Widths at or below this are treated as mobile.
    pub breakpoint: u32,
    /// Vertical space reserved for margins and padding.
    pub margin: u32,
    /// Smallest height worth capping the video to.
    pub min_video_height: u32,
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self {
            breakpoint: 768,
            margin: 100,
            min_video_height: 200,
        }
    }
}

impl LayoutRules {
    pub fn video_height_cap(&self, viewport: Viewport, regions: &FixedRegions) -> VideoHeightCap {
        if viewport.width > self.breakpoint {
            return VideoHeightCap::None;
        }

        let available =
            i64::from(viewport.height) - regions.total() as i64 - i64::from(self.margin);
        if viewport.is_portrait() && available > i64::from(self.min_video_height) {
            // `available` is bounded above by the viewport height.
            VideoHeightCap::Max(available as u32)
        } else {
            VideoHeightCap::None
        }
    }
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;
