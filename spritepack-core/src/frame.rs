//! Frame tree: the packing plan as a binary tree of rectangles.
//!
//! A [`Frame`] is either a leaf standing for one source image, or a composite
//! holding exactly two previously placed frames. Every frame stores its offset
//! relative to its immediate parent; [`Frame::flatten`] turns the tree into
//! root-relative [`Placement`]s.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};

/// How two frames are joined into a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombineMode {
    /// Second frame to the right of the first.
    SideBySide,
    /// Second frame below the first.
    StackVertically,
}

impl FromStr for CombineMode {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "side-by-side" | "sidebyside" | "horizontal" => Ok(Self::SideBySide),
            "stack-vertically" | "stackvertically" | "onebelowother" | "vertical" => {
                Ok(Self::StackVertically)
            }
            _ => Err(PackError::InvalidArgument(format!("invalid combine mode: {s:?}"))),
        }
    }
}

/// Leaf or composite payload of a [`Frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameKind {
    Leaf { id: String },
    Composite(Box<(Frame, Frame)>),
}

/// A rectangle in the packing plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    offset_x: u32,
    offset_y: u32,
    kind: FrameKind,
}

/// A leaf frame resolved to its absolute position on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl Placement {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl Frame {
    /// Create a leaf for one source rectangle, positioned at the origin.
    pub fn leaf(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            offset_x: 0,
            offset_y: 0,
            kind: FrameKind::Leaf { id: id.into() },
        }
    }

    /// Join two frames into a new composite.
    ///
    /// Both children are taken by value and repositioned inside the result:
    /// side by side puts `a` at x=0 and `b` at x=`a.width`; stacking puts `a`
    /// at y=0 and `b` at y=`a.height`. The other axis is left untouched.
    /// Fails with [`PackError::Overflow`] when the joined axis does not fit
    /// in a `u32`.
    pub fn combine(mut a: Frame, mut b: Frame, mode: CombineMode) -> Result<Frame> {
        let (width, height) = match mode {
            CombineMode::SideBySide => {
                a.offset_x = 0;
                b.offset_x = a.width;
                (checked_sum(a.width, b.width)?, a.height.max(b.height))
            }
            CombineMode::StackVertically => {
                a.offset_y = 0;
                b.offset_y = a.height;
                (a.width.max(b.width), checked_sum(a.height, b.height)?)
            }
        };
        tracing::trace!(
            "combined {}x{} from {}x{} and {}x{} ({:?})",
            width, height, a.width, a.height, b.width, b.height, mode
        );
        Ok(Frame {
            width,
            height,
            offset_x: 0,
            offset_y: 0,
            kind: FrameKind::Composite(Box::new((a, b))),
        })
    }

    /// Join `frames` in order along one axis.
    ///
    /// Geometry and flatten order are the same as folding them one by one
    /// with [`Frame::combine`], but adjacent pairs are merged level by level
    /// so the tree stays `O(log n)` deep.
    pub fn combine_all(frames: Vec<Frame>, mode: CombineMode) -> Result<Frame> {
        let mut level = frames;
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len() / 2 + 1);
            let mut iter = level.into_iter();
            while let Some(a) = iter.next() {
                match iter.next() {
                    Some(b) => next.push(Self::combine(a, b, mode)?),
                    None => next.push(a),
                }
            }
            level = next;
        }
        level.pop().ok_or(PackError::MissingInput)
    }

    /// Same as [`Frame::combine`] with the mode given by name.
    pub fn combine_named(a: Frame, b: Frame, mode: &str) -> Result<Frame> {
        let mode = mode.parse::<CombineMode>()?;
        Self::combine(a, b, mode)
    }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    /// Offset within the immediate parent; `(0, 0)` for a root.
    pub fn offset(&self) -> (u32, u32) { (self.offset_x, self.offset_y) }

    pub fn kind(&self) -> &FrameKind { &self.kind }

    /// Source identifier, present only on leaves.
    pub fn id(&self) -> Option<&str> {
        match &self.kind {
            FrameKind::Leaf { id } => Some(id),
            FrameKind::Composite(_) => None,
        }
    }

    /// The identifier with any directory prefix trimmed. Handy for log lines.
    pub fn short_id(&self) -> Option<&str> {
        self.id().map(|id| id.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(id))
    }

    /// Both children, present only on composites.
    pub fn children(&self) -> Option<(&Frame, &Frame)> {
        match &self.kind {
            FrameKind::Leaf { .. } => None,
            FrameKind::Composite(pair) => Some((&pair.0, &pair.1)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, FrameKind::Leaf { .. })
    }

    /// Number of leaves under (and including) this frame.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(f) = stack.pop() {
            match &f.kind {
                FrameKind::Leaf { .. } => count += 1,
                FrameKind::Composite(pair) => {
                    stack.push(&pair.1);
                    stack.push(&pair.0);
                }
            }
        }
        count
    }

    pub fn semi_perimeter(&self) -> u64 {
        self.width as u64 + self.height as u64
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Every leaf with its root-relative offset, in pre-order (left child
    /// first). Composites produce no entry of their own.
    pub fn flatten(&self) -> Vec<Placement> {
        let mut out = Vec::new();
        // (frame, accumulated parent offset); right pushed first so left pops first
        let mut stack = vec![(self, 0u32, 0u32)];
        while let Some((f, parent_x, parent_y)) = stack.pop() {
            // bounded by the root size, which combine keeps within u32
            let x = parent_x + f.offset_x;
            let y = parent_y + f.offset_y;
            match &f.kind {
                FrameKind::Leaf { id } => out.push(Placement {
                    id: id.clone(),
                    width: f.width,
                    height: f.height,
                    x,
                    y,
                }),
                FrameKind::Composite(pair) => {
                    stack.push((&pair.1, x, y));
                    stack.push((&pair.0, x, y));
                }
            }
        }
        out
    }
}

fn checked_sum(a: u32, b: u32) -> Result<u32> {
    a.checked_add(b).ok_or(PackError::Overflow(a as u64 + b as u64))
}

impl Drop for Frame {
    // Unlink composites onto a heap stack so dropping a deep chain does not
    // recurse once per level.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        if let FrameKind::Composite(_) = self.kind {
            pending.push(std::mem::replace(&mut self.kind, FrameKind::Leaf { id: String::new() }));
        }
        while let Some(kind) = pending.pop() {
            if let FrameKind::Composite(pair) = kind {
                let (mut a, mut b) = *pair;
                for child in [&mut a, &mut b] {
                    if let FrameKind::Composite(_) = child.kind {
                        pending.push(std::mem::replace(&mut child.kind, FrameKind::Leaf { id: String::new() }));
                    }
                }
            }
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = x:{} y:{} w:{} h:{}",
            self.id().unwrap_or("<composite>"),
            self.offset_x,
            self.offset_y,
            self.width,
            self.height
        )
    }
}
