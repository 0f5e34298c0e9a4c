//! Geometric primitives: points, labeled halfsegments, and the predicates
//! that drive the sweep.

use crate::num::CheapOrderedFloat;

/// A two-dimensional point.
///
/// Points are ordered lexicographically by `x` and then `y`, for the
/// convenience of our sweep-line algorithm (which moves in increasing `x`).
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            CheapOrderedFloat::from(self.x),
            CheapOrderedFloat::from(self.y),
        )
            .cmp(&(
                CheapOrderedFloat::from(other.x),
                CheapOrderedFloat::from(other.y),
            ))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        debug_assert!(x.is_finite());
        debug_assert!(y.is_finite());
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Walking `p1 -> p2`, do we have to turn left at `p2` to continue to `p3`?
///
/// This is the sign of the usual cross-product expression; colinear triples
/// return `false`.
#[inline]
pub fn left_hand_turn(p1: Point, p2: Point, p3: Point) -> bool {
    (p3.y - p1.y) * (p2.x - p1.x) - (p2.y - p1.y) * (p3.x - p1.x) > 0.0
}

/// A face identifier.
///
/// Throughout this library, faces of the two input regions are named by
/// small integers chosen by the caller. The labels on a halfsegment record
/// which faces touch it; [`FaceId::NONE`] marks the absence of a face (the
/// outside, or a label not yet computed).
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceId(pub i32);

impl FaceId {
    /// The "no face here" marker, also used to invalidate halfsegments
    /// during recombination.
    pub const NONE: FaceId = FaceId(-1);
}

impl std::fmt::Debug for FaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "f_{}", self.0)
    }
}

/// Which of the two input regions a halfsegment belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegionId {
    /// The first input region.
    First,
    /// The second input region.
    Second,
}

/// An oriented segment between a *dominating* and a *submissive* endpoint.
///
/// Every geometric segment is represented twice: as a *left* halfsegment
/// (the dominating point is the lexicographically smaller endpoint) and as
/// its [brother](Halfsegment::brother) with the roles swapped. The labels
/// record the faces of the owning region above and below the segment
/// (`la`, `lb`) and, after an overlay, the faces of the opposing region
/// (`ola`, `olb`).
///
/// For a vertical halfsegment, "above" means the face to the left (west)
/// and "below" the face to the right (east).
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Halfsegment {
    /// The dominating endpoint.
    pub dom: Point,
    /// The submissive endpoint.
    pub sub: Point,
    /// Label above: the owning region's face above the segment.
    pub la: FaceId,
    /// Label below: the owning region's face below the segment.
    pub lb: FaceId,
    /// Overlap label above: the opposing region's face above the segment.
    pub ola: FaceId,
    /// Overlap label below: the opposing region's face below the segment.
    pub olb: FaceId,
    /// The input region this halfsegment originated in.
    pub region: RegionId,
    /// The strip this halfsegment was assigned to during partitioning.
    pub strip: usize,
}

impl Halfsegment {
    /// Create a halfsegment with the given endpoints and owner labels.
    ///
    /// The overlap labels start out as [`FaceId::NONE`] and the strip
    /// assignment as zero.
    pub fn new(dom: Point, sub: Point, la: FaceId, lb: FaceId, region: RegionId) -> Self {
        Halfsegment {
            dom,
            sub,
            la,
            lb,
            ola: FaceId::NONE,
            olb: FaceId::NONE,
            region,
            strip: 0,
        }
    }

    /// Is this a left halfsegment (dominating endpoint lexicographically
    /// smaller than the submissive one)?
    #[inline]
    pub fn is_left(&self) -> bool {
        self.dom < self.sub
    }

    /// Is this halfsegment vertical?
    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.dom.x == self.sub.x
    }

    /// The twin halfsegment: same endpoints and labels, roles swapped.
    pub fn brother(&self) -> Self {
        Halfsegment {
            dom: self.sub,
            sub: self.dom,
            ..*self
        }
    }

    /// Do both of `other`'s endpoints lie on the infinite line through
    /// `self`?
    ///
    /// Exact floating-point test; near-degenerate inputs are the caller's
    /// problem (see the crate docs on numeric robustness).
    #[inline]
    pub fn colinear(&self, other: &Halfsegment) -> bool {
        (other.dom.y - self.dom.y) * (self.sub.x - self.dom.x)
            - (self.sub.y - self.dom.y) * (other.dom.x - self.dom.x)
            == 0.0
            && (other.sub.y - self.dom.y) * (self.sub.x - self.dom.x)
                - (self.sub.y - self.dom.y) * (other.sub.x - self.dom.x)
                == 0.0
    }

    /// The y value of this halfsegment's supporting line at `x`.
    ///
    /// Exact at the two endpoints. The caller is responsible for keeping
    /// `x` within the segment's span; outside it, this is still just the
    /// line equation. Vertical segments divide by zero away from their
    /// endpoints.
    pub fn y_at_x(&self, x: f64) -> f64 {
        if x == self.dom.x {
            self.dom.y
        } else if x == self.sub.x {
            self.sub.y
        } else {
            (self.sub.y * x - self.sub.y * self.dom.x - self.dom.y * x
                + self.dom.y * self.dom.x)
                / (self.sub.x - self.dom.x)
                + self.dom.y
        }
    }
}

/// Equality considers endpoints only, never labels; two halfsegments over
/// the same points with different labels are "the same segment" to the
/// sweep.
impl PartialEq for Halfsegment {
    fn eq(&self, other: &Self) -> bool {
        self.dom == other.dom && self.sub == other.sub
    }
}

impl Eq for Halfsegment {}

/// Halfsegment order.
///
/// Dominating points compare lexicographically first. At a shared
/// dominating point a right halfsegment precedes a left one; among
/// halfsegments of the same handedness, colinear pairs order by their
/// submissive points, and everything else by the left-hand-turn test
/// (the one lying clockwise of the other comes first).
impl Ord for Halfsegment {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        let dom = self.dom.cmp(&other.dom);
        if dom != Ordering::Equal {
            return dom;
        }
        match (self.is_left(), other.is_left()) {
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            _ => {}
        }
        if self.colinear(other) {
            self.sub.cmp(&other.sub)
        } else if left_hand_turn(self.dom, self.sub, other.sub) {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

impl PartialOrd for Halfsegment {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Debug for Halfsegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:?}-{:?} {:?}/{:?} {:?} <{:?},{:?}>]",
            self.dom, self.sub, self.la, self.lb, self.region, self.ola, self.olb
        )
    }
}
