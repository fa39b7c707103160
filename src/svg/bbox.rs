//! Bounding-box accumulation.
//!
//! A layer's box is the union of its direct children's boxes. The fold starts
//! from "unset" (`None`), so a legitimate coordinate of zero is never
//! mistaken for the empty accumulator.

use serde::Serialize;

use super::transform::{Translate, round2};

/// Axis-aligned box. Invariant: `right >= left`, `bottom >= top`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BBox {
    /// Build from edges, normalizing swapped edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    pub fn from_rect(rect: usvg::Rect) -> Self {
        Self::from_edges(
            f64::from(rect.left()),
            f64::from(rect.top()),
            f64::from(rect.right()),
            f64::from(rect.bottom()),
        )
    }

    /// Smallest box containing both.
    pub fn union(self, other: BBox) -> BBox {
        BBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Every edge rounded to two decimals.
    pub fn rounded(self) -> BBox {
        BBox {
            left: round2(self.left),
            top: round2(self.top),
            right: round2(self.right),
            bottom: round2(self.bottom),
        }
    }

    pub fn translated(self, offset: Translate) -> BBox {
        BBox {
            left: self.left + offset.x,
            top: self.top + offset.y,
            right: self.right + offset.x,
            bottom: self.bottom + offset.y,
        }
    }
}

/// Merge an optional accumulator with one more box.
#[inline]
pub fn merge(acc: Option<BBox>, next: BBox) -> Option<BBox> {
    Some(match acc {
        Some(existing) => existing.union(next),
        None => next,
    })
}

/// Fold child boxes into one; `None` when no child contributed.
pub fn accumulate<I>(boxes: I) -> Option<BBox>
where
    I: IntoIterator<Item = Option<BBox>>,
{
    boxes.into_iter().flatten().fold(None, merge)
}
