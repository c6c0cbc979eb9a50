//! Canvas-width heuristic.
//!
//! Picks the row width used by the shelf packer: the smallest power of two
//! that is at least the square root of the area to cover and never narrower
//! than the widest frame. This keeps the sheet roughly square while
//! guaranteeing every frame fits on some row.

use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// Power-of-two table used for rounding. Values beyond the last entry keep
/// doubling from it.
pub const POWERS_OF_TWO: [u64; 21] = [
    1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768, 65536,
    131072, 262144, 524288, 1048576,
];

/// Which dimension dominates the batch. Diagnostic only; it does not change
/// the computed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackPreference {
    ByWidth,
    ByHeight,
}

/// Aggregate figures the width is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CanvasStats {
    pub frame_count: usize,
    pub widest: u32,
    pub tallest: u32,
    pub total_area: u64,
    /// `max(total_area, widest * tallest)`
    pub min_area: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasEstimate {
    pub width: u64,
    pub stats: CanvasStats,
    pub preference: PackPreference,
}

impl CanvasStats {
    pub fn collect(frames: &[Frame]) -> Self {
        let mut stats = CanvasStats { frame_count: frames.len(), ..Default::default() };
        for f in frames {
            stats.widest = stats.widest.max(f.width());
            stats.tallest = stats.tallest.max(f.height());
            stats.total_area = stats.total_area.saturating_add(f.area());
        }
        stats.min_area = stats.total_area.max(stats.widest as u64 * stats.tallest as u64);
        stats
    }

    pub fn preference(&self) -> PackPreference {
        if self.widest > self.tallest {
            PackPreference::ByWidth
        } else {
            PackPreference::ByHeight
        }
    }
}

/// Row width target for `frames`. Always a power of two and at least as wide
/// as the widest frame; 1 for empty or zero-area input.
pub fn canvas_width(frames: &[Frame]) -> u64 {
    estimate(frames).width
}

/// Width target together with the statistics that produced it.
pub fn estimate(frames: &[Frame]) -> CanvasEstimate {
    let stats = CanvasStats::collect(frames);
    let candidate = ceil_sqrt(stats.min_area).max(stats.widest as u64);
    let estimate = CanvasEstimate {
        width: next_power_of_two(candidate, false),
        stats,
        preference: stats.preference(),
    };
    tracing::debug!(
        frames = stats.frame_count,
        widest = stats.widest,
        tallest = stats.tallest,
        total_area = stats.total_area,
        min_area = stats.min_area,
        width = estimate.width,
        preference = ?estimate.preference,
        "canvas width estimated"
    );
    estimate
}

/// Round `n` up to a power of two from [`POWERS_OF_TWO`], doubling past the
/// table when needed. An exact hit returns that power unless
/// `jump_on_exact_hit` asks for the next one.
pub fn next_power_of_two(n: u64, jump_on_exact_hit: bool) -> u64 {
    for (i, &pow) in POWERS_OF_TWO.iter().enumerate() {
        if n < pow {
            return pow;
        }
        if n == pow {
            if !jump_on_exact_hit {
                return pow;
            }
            return POWERS_OF_TWO.get(i + 1).copied().unwrap_or(pow * 2);
        }
    }
    let mut p = POWERS_OF_TWO[POWERS_OF_TWO.len() - 1];
    loop {
        p = p.saturating_mul(2);
        if n < p || p == u64::MAX {
            return p;
        }
        if n == p {
            return if jump_on_exact_hit { p.saturating_mul(2) } else { p };
        }
    }
}

/// Smallest `r` with `r * r >= n`.
fn ceil_sqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut r = (n as f64).sqrt() as u64;
    while r.saturating_mul(r) > n {
        r -= 1;
    }
    while r.saturating_mul(r) < n {
        r += 1;
    }
    r
}
