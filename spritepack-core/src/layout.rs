//! Greedy shelf packing.
//!
//! Frames are sorted, laid left to right into rows no wider than the target
//! width, and the rows are stacked top to bottom into a single root [`Frame`].

use std::cmp::Reverse;

use crate::error::{PackError, Result};
use crate::frame::{CombineMode, Frame};

/// Pack `frames` into one tree whose rows respect `max_width`.
///
/// A single frame is returned as is. A frame wider than `max_width` still
/// gets a row of its own; it is never split. The input order is not kept.
pub fn lay_frames(frames: Vec<Frame>, max_width: u64) -> Result<Frame> {
    if frames.len() == 1 {
        return frames.into_iter().next().ok_or(PackError::MissingInput);
    }
    let rows = shelves(frames, max_width)?;
    tracing::debug!("stacking {} rows", rows.len());
    Frame::combine_all(rows, CombineMode::StackVertically)
}

/// Sort and assemble rows without stacking them.
///
/// Each returned frame is one closed row (a single leaf, or a side-by-side
/// composite), in creation order.
pub fn shelves(mut frames: Vec<Frame>, max_width: u64) -> Result<Vec<Frame>> {
    if frames.is_empty() {
        return Err(PackError::MissingInput);
    }
    sort_frames(&mut frames);
    tracing::debug!("row loops: {}", frames.len() - 1);

    let mut rows = Vec::new();
    let mut row: Vec<Frame> = Vec::new();
    let mut row_width = 0u64;

    for f in frames {
        let w = f.width() as u64;
        if !row.is_empty() && row_width + w > max_width {
            tracing::debug!("sealing row at {}px width", row_width);
            rows.push(Frame::combine_all(std::mem::take(&mut row), CombineMode::SideBySide)?);
            row_width = 0;
            tracing::debug!(
                "next row starting with {}x{}: {}",
                f.width(),
                f.height(),
                f.short_id().unwrap_or("")
            );
        } else {
            tracing::trace!("adding to row {}x{}: {}", f.width(), f.height(), f.short_id().unwrap_or(""));
        }
        row_width += w;
        row.push(f);
    }
    rows.push(Frame::combine_all(row, CombineMode::SideBySide)?);
    Ok(rows)
}

/// Height descending, then (stably) width descending. The second pass decides
/// the order; the first only breaks ties between equal widths.
pub fn sort_frames(frames: &mut [Frame]) {
    frames.sort_by_key(|f| Reverse(f.height()));
    frames.sort_by_key(|f| Reverse(f.width()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Placement;

    fn leaves(dims: &[(&str, u32, u32)]) -> Vec<Frame> {
        dims.iter().map(|&(id, w, h)| Frame::leaf(id, w, h)).collect()
    }

    fn position(flat: &[Placement], id: &str) -> (u32, u32) {
        let p = flat.iter().find(|p| p.id == id).unwrap();
        (p.x, p.y)
    }

    #[test]
    fn empty_input_is_missing() {
        assert_eq!(lay_frames(Vec::new(), 100).unwrap_err(), PackError::MissingInput);
        assert_eq!(shelves(Vec::new(), 100).unwrap_err(), PackError::MissingInput);
    }

    #[test]
    fn single_frame_is_returned_verbatim() {
        let root = lay_frames(leaves(&[("x", 30, 30)]), 1).unwrap();
        assert_eq!(root, Frame::leaf("x", 30, 30));
        assert_eq!(root.offset(), (0, 0));
    }

    #[test]
    fn sort_is_width_first_with_height_ties() {
        let mut fs = leaves(&[("a", 10, 5), ("b", 20, 1), ("c", 10, 9), ("d", 10, 5), ("e", 20, 3)]);
        sort_frames(&mut fs);
        let ids: Vec<&str> = fs.iter().map(|f| f.id().unwrap()).collect();
        // widths 20 first (taller first), then 10s: c (9), then a/d keep input order
        assert_eq!(ids, vec!["e", "b", "c", "a", "d"]);
    }

    #[test]
    fn three_frame_scenario() {
        let root = lay_frames(leaves(&[("A", 100, 50), ("B", 60, 80), ("C", 40, 40)]), 160).unwrap();
        assert_eq!((root.width(), root.height()), (160, 120));

        let flat = root.flatten();
        let ids: Vec<&str> = flat.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(position(&flat, "A"), (0, 0));
        assert_eq!(position(&flat, "B"), (100, 0));
        assert_eq!(position(&flat, "C"), (0, 80));
    }

    #[test]
    fn rows_close_when_width_would_overflow() {
        let rows = shelves(leaves(&[("A", 100, 50), ("B", 60, 80), ("C", 40, 40)]), 160).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].width(), rows[0].height()), (160, 80));
        assert_eq!((rows[1].width(), rows[1].height()), (40, 40));
    }

    #[test]
    fn oversized_frames_get_their_own_rows() {
        let root = lay_frames(leaves(&[("a", 50, 10), ("b", 70, 20), ("c", 60, 5)]), 40).unwrap();
        assert_eq!(root.width(), 70);
        assert_eq!(root.height(), 35);
        let flat = root.flatten();
        assert!(flat.iter().all(|p| p.x == 0));
        assert_eq!(position(&flat, "b"), (0, 0));
        assert_eq!(position(&flat, "c"), (0, 20));
        assert_eq!(position(&flat, "a"), (0, 25));
    }

    #[test]
    fn exact_fit_stays_on_one_row() {
        let root = lay_frames(leaves(&[("a", 32, 32), ("b", 32, 32), ("c", 32, 32), ("d", 32, 32)]), 128).unwrap();
        assert_eq!((root.width(), root.height()), (128, 32));
        assert_eq!(root.area(), 4 * 32 * 32);
    }

    #[test]
    fn zero_area_frames_are_placed() {
        let root = lay_frames(leaves(&[("a", 0, 0), ("b", 4, 4)]), 8).unwrap();
        let flat = root.flatten();
        assert_eq!(flat.len(), 2);
        assert_eq!(position(&flat, "a"), (4, 0));
    }

    fn pseudo_random_batch(seed: &mut u32, n: usize) -> Vec<Frame> {
        (0..n)
            .map(|i| {
                *seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let w = 1 + (*seed >> 16) % 120;
                *seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let h = 1 + (*seed >> 16) % 120;
                Frame::leaf(format!("img{i}"), w, h)
            })
            .collect()
    }

    #[test]
    fn invariants_hold_on_mixed_batches() {
        let mut seed = 42u32;
        for n in [2usize, 3, 7, 20, 64] {
            for max_width in [16u64, 100, 256] {
                let input = pseudo_random_batch(&mut seed, n);
                let leaf_area: u64 = input.iter().map(Frame::area).sum();

                let rows = shelves(input.clone(), max_width).unwrap();
                for row in &rows {
                    assert!(row.width() as u64 <= max_width || row.is_leaf());
                }

                let root = lay_frames(input.clone(), max_width).unwrap();
                assert!(root.area() >= leaf_area);

                let flat = root.flatten();
                assert_eq!(flat.len(), n);
                let mut ids: Vec<&str> = flat.iter().map(|p| p.id.as_str()).collect();
                ids.sort_unstable();
                ids.dedup();
                assert_eq!(ids.len(), n);

                for p in &flat {
                    assert!(p.x + p.width <= root.width());
                    assert!(p.y + p.height <= root.height());
                }
                // no two placements overlap
                for (i, a) in flat.iter().enumerate() {
                    for b in &flat[i + 1..] {
                        let apart = a.x + a.width <= b.x
                            || b.x + b.width <= a.x
                            || a.y + a.height <= b.y
                            || b.y + b.height <= a.y;
                        assert!(apart, "{a:?} overlaps {b:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn wide_batches_keep_the_tree_shallow() {
        let n = 50_000u32;
        let input: Vec<Frame> = (0..n).map(|i| Frame::leaf(format!("p{i}"), 1, 1)).collect();
        let root = lay_frames(input, u64::MAX).unwrap();
        assert_eq!((root.width(), root.height()), (n, 1));
        assert_eq!(root.leaf_count(), n as usize);

        let flat = root.flatten();
        assert_eq!(flat.len(), n as usize);
        assert!(flat.iter().enumerate().all(|(i, p)| p.x == i as u32 && p.y == 0));
        let clone = root.clone();
        assert_eq!(clone, root);
    }

    #[test]
    fn tall_columns_keep_the_tree_shallow() {
        // every frame overflows a 1px row, so each gets its own
        let input: Vec<Frame> = (0..60_000).map(|i| Frame::leaf(format!("r{i}"), 2, 1)).collect();
        let root = lay_frames(input, 1).unwrap();
        assert_eq!((root.width(), root.height()), (2, 60_000));
        assert_eq!(root.flatten().last().map(|p| p.y), Some(59_999));
    }

    #[test]
    fn overflowing_canvas_is_an_error() {
        let input = leaves(&[("a", 10, 3_000_000_000), ("b", 10, 3_000_000_000)]);
        assert!(matches!(lay_frames(input, 10), Err(PackError::Overflow(_))));
    }
}
