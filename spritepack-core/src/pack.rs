//! One-call packing: heuristic width, shelf layout, flatten.

use serde::{Deserialize, Serialize};

use crate::canvas::{self, CanvasStats, PackPreference};
use crate::error::{PackError, Result};
use crate::frame::{Frame, Placement};
use crate::layout;

/// A packed sheet: canvas size plus every frame's absolute placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub width: u32,
    pub height: u32,
    /// Row width the layout was asked to respect.
    pub max_width: u64,
    pub preference: PackPreference,
    pub stats: CanvasStats,
    /// Pre-order placements, one per input frame.
    pub placements: Vec<Placement>,
}

impl SpriteSheet {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Canvas pixels not covered by any frame.
    pub fn wasted_area(&self) -> u64 {
        let used: u64 = self.placements.iter().map(Placement::area).sum();
        self.area().saturating_sub(used)
    }
}

/// Pack `frames` at the width chosen by [`canvas::estimate`].
pub fn pack(frames: Vec<Frame>) -> Result<SpriteSheet> {
    let estimate = canvas::estimate(&frames);
    build(frames, estimate.width, estimate.stats, estimate.preference)
}

/// Pack `frames` at a caller-chosen row width.
pub fn pack_with_width(frames: Vec<Frame>, max_width: u64) -> Result<SpriteSheet> {
    if max_width == 0 {
        return Err(PackError::InvalidArgument("max width must be positive".into()));
    }
    let stats = CanvasStats::collect(&frames);
    build(frames, max_width, stats, stats.preference())
}

fn build(
    frames: Vec<Frame>,
    max_width: u64,
    stats: CanvasStats,
    preference: PackPreference,
) -> Result<SpriteSheet> {
    let root = layout::lay_frames(frames, max_width)?;
    let placements = root.flatten();
    let sheet = SpriteSheet {
        width: root.width(),
        height: root.height(),
        max_width,
        preference,
        stats,
        placements,
    };
    tracing::info!(
        "packed {} frames into {}x{} (target width {}, {} px wasted)",
        sheet.placements.len(),
        sheet.width,
        sheet.height,
        max_width,
        sheet.wasted_area()
    );
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_uses_heuristic_width() {
        let frames = vec![
            Frame::leaf("A", 100, 50),
            Frame::leaf("B", 60, 80),
            Frame::leaf("C", 40, 40),
        ];
        let sheet = pack(frames).unwrap();
        // heuristic picks 128: A alone, then B|C (100 wide)
        assert_eq!(sheet.max_width, 128);
        assert_eq!((sheet.width, sheet.height), (100, 130));
        assert_eq!(sheet.placements.len(), 3);
        assert_eq!(sheet.stats.total_area, 11_400);
        assert_eq!(sheet.wasted_area(), 100 * 130 - 11_400);
    }

    #[test]
    fn explicit_width_matches_layout() {
        let frames = vec![
            Frame::leaf("A", 100, 50),
            Frame::leaf("B", 60, 80),
            Frame::leaf("C", 40, 40),
        ];
        let sheet = pack_with_width(frames, 160).unwrap();
        assert_eq!((sheet.width, sheet.height), (160, 120));
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = pack_with_width(vec![Frame::leaf("a", 1, 1)], 0).unwrap_err();
        assert!(matches!(err, PackError::InvalidArgument(_)));
    }

    #[test]
    fn empty_batch_is_missing_input() {
        assert_eq!(pack(Vec::new()).unwrap_err(), PackError::MissingInput);
    }

    #[test]
    fn all_frames_wider_than_target_stack_in_one_column() {
        let frames = vec![Frame::leaf("a", 90, 10), Frame::leaf("b", 120, 10), Frame::leaf("c", 70, 10)];
        let sheet = pack_with_width(frames, 50).unwrap();
        assert_eq!(sheet.width, 120);
        assert_eq!(sheet.height, 30);
    }

    #[test]
    fn many_zero_width_frames_share_one_row() {
        let frames = (0..200_000).map(|i| Frame::leaf(format!("z{i}"), 0, 1)).collect();
        let sheet = pack(frames).unwrap();
        assert_eq!(sheet.max_width, 1);
        assert_eq!((sheet.width, sheet.height), (0, 1));
        assert_eq!(sheet.placements.len(), 200_000);
        assert!(sheet.placements.iter().all(|p| p.x == 0 && p.y == 0));
    }

    #[test]
    fn oversized_canvas_is_an_error() {
        let frames = vec![Frame::leaf("a", 10, 3_000_000_000), Frame::leaf("b", 10, 3_000_000_000)];
        assert!(matches!(pack_with_width(frames, 10), Err(PackError::Overflow(_))));
    }
}
