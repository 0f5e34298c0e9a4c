//! Partitioning the input plane into vertical strips.
//!
//! A strip plan places vertical boundaries so that no boundary passes
//! through a halfsegment endpoint; each input region is then split along
//! the boundaries into self-contained strips that can be swept
//! independently.

use std::num::NonZeroUsize;
use std::thread;
use std::time::Instant;

use crate::geom::{Halfsegment, Point};
use crate::num::CheapOrderedFloat;

/// An ordered sequence of vertical strip boundaries.
///
/// The first boundary is `-∞` and the last `+∞`; strip `i` is the open
/// slab between boundaries `i` and `i + 1`. Interior boundaries avoid
/// every endpoint x-coordinate of the planned-for inputs, except when no
/// separating coordinate exists at all (in which case recombination
/// tolerates the extra breaks).
#[derive(Clone, Debug)]
pub struct StripPlan {
    bounds: Vec<f64>,
}

impl StripPlan {
    /// The number of strips in this plan.
    pub fn strip_count(&self) -> usize {
        self.bounds.len() - 1
    }

    /// All boundaries, including the infinite outer pair.
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }
}

/// A region split along strip boundaries.
///
/// `segs` is sorted by strip and then halfsegment order; `stop[i]` is one
/// past the last position belonging to strip `i`, with empty strips
/// inheriting the previous stop so that every strip is a contiguous
/// (possibly empty) range.
#[derive(Clone, Debug)]
pub struct Strips {
    /// The strip-tagged halfsegments of the region.
    pub segs: Vec<Halfsegment>,
    /// One-past-last index per strip.
    pub stop: Vec<usize>,
}

impl Strips {
    /// The halfsegments assigned to strip `i`.
    pub fn strip(&self, i: usize) -> &[Halfsegment] {
        let start = if i == 0 { 0 } else { self.stop[i - 1] };
        &self.segs[start..self.stop[i]]
    }
}

/// Is some endpoint of `region` at exactly `x`?
///
/// Looks only at dominating points, which covers every endpoint because
/// the input is closed under taking brothers.
fn endpoint_at(region: &[Halfsegment], x: f64) -> bool {
    region
        .binary_search_by(|h| CheapOrderedFloat::from(h.dom.x).cmp(&CheapOrderedFloat::from(x)))
        .is_ok()
}

/// The smallest dominating x strictly greater than `x`.
fn next_greater_dom_x(region: &[Halfsegment], x: f64) -> Option<f64> {
    let idx = region.partition_point(|h| h.dom.x <= x);
    region.get(idx).map(|h| h.dom.x)
}

/// Plan `num_strips` strips over the common x-extent of two regions.
///
/// Interior boundaries start out evenly spaced. A boundary that lands on
/// an endpoint x of either input (both must be sorted in halfsegment
/// order) moves to the midpoint between itself and the next-greater
/// endpoint x, capped by the next boundary; a single adjustment pass is
/// made. If even that fails the boundary stays put and a warning is
/// logged; the overlay still comes out right, at the cost of extra
/// invalidation work during recombination.
pub fn find_iso_boundaries(
    r1: &[Halfsegment],
    r2: &[Halfsegment],
    num_strips: usize,
) -> StripPlan {
    let num_strips = num_strips.max(1);
    let mut bounds = vec![0.0; num_strips + 1];
    let last = num_strips;
    bounds[0] = f64::NEG_INFINITY;
    bounds[last] = f64::INFINITY;
    if num_strips == 1 {
        return StripPlan { bounds };
    }

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for h in r1.iter().chain(r2) {
        min_x = min_x.min(h.dom.x).min(h.sub.x);
        max_x = max_x.max(h.dom.x).max(h.sub.x);
    }
    if min_x > max_x {
        // No endpoints at all; any plan partitions nothing.
        return StripPlan { bounds };
    }

    let width = (max_x - min_x) / num_strips as f64;
    let mut prev = min_x;
    for b in &mut bounds[1..last] {
        prev += width;
        *b = prev;
    }

    for i in 1..last {
        if !endpoint_at(r1, bounds[i]) && !endpoint_at(r2, bounds[i]) {
            continue;
        }
        let mut x_val = bounds[i + 1];
        if let Some(x) = next_greater_dom_x(r1, bounds[i]) {
            if x < x_val {
                x_val = x;
            }
        }
        if let Some(x) = next_greater_dom_x(r2, bounds[i]) {
            if x < x_val {
                x_val = x;
            }
        }
        if x_val == f64::INFINITY {
            log::warn!(
                "strip boundary at {} cannot be separated from an endpoint",
                bounds[i]
            );
            continue;
        }
        bounds[i] = (bounds[i] + x_val) / 2.0;
    }

    StripPlan { bounds }
}

/// Split the left halfsegments of `segs` at every interior boundary they
/// cross, emitting strip-tagged left/right pairs into `out`.
///
/// The running lower strip index only ever advances across halfsegments,
/// which is sound because the input is sorted in halfsegment order.
fn split_range(segs: &[Halfsegment], bounds: &[f64], out: &mut Vec<Halfsegment>) {
    let mut start_bound = 0;
    for h in segs {
        if !h.is_left() {
            continue;
        }
        let mut work = *h;
        for j in start_bound..bounds.len() - 1 {
            if work.dom.x > bounds[j + 1] {
                start_bound += 1;
                continue;
            }
            if work.dom.x >= bounds[j] && work.sub.x < bounds[j + 1] {
                work.strip = j;
                out.push(work);
                out.push(work.brother());
                break;
            }
            // The segment reaches past this strip: cut it at the boundary
            // and keep walking with the remainder.
            let cut = Point::new(bounds[j + 1], work.y_at_x(bounds[j + 1]));
            let mut lhs = work;
            lhs.sub = cut;
            lhs.strip = j;
            work.dom = cut;
            out.push(lhs);
            out.push(lhs.brother());
        }
    }
}

/// Partition a region into the strips of `plan`.
///
/// The input must be sorted in halfsegment order. The index range is
/// divided over the available worker threads, each filling a private
/// buffer; the buffers are concatenated and sorted by strip and then
/// halfsegment order.
pub fn create_strips(region: &[Halfsegment], plan: &StripPlan) -> Strips {
    let started = Instant::now();
    let bounds = plan.bounds();
    let strip_count = plan.strip_count();

    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .clamp(1, region.len().max(1));
    let per_worker = region.len() / workers;
    let mut buffers: Vec<Vec<Halfsegment>> = vec![Vec::new(); workers];
    thread::scope(|scope| {
        for (w, buf) in buffers.iter_mut().enumerate() {
            let lo = w * per_worker;
            let hi = if w == workers - 1 {
                region.len()
            } else {
                lo + per_worker
            };
            let range = &region[lo..hi];
            scope.spawn(move || split_range(range, bounds, buf));
        }
    });

    let mut segs: Vec<Halfsegment> = buffers.into_iter().flatten().collect();
    segs.sort_by(|a, b| a.strip.cmp(&b.strip).then_with(|| a.cmp(b)));

    let mut stop: Vec<Option<usize>> = vec![None; strip_count];
    for (i, h) in segs.iter().enumerate() {
        stop[h.strip] = Some(i + 1);
    }
    let mut prev = 0;
    let stop = stop
        .into_iter()
        .map(|s| {
            if let Some(s) = s {
                prev = s;
            }
            prev
        })
        .collect();

    log::debug!(
        "partitioned {} halfsegments into {} strips in {:.6}s",
        region.len(),
        strip_count,
        started.elapsed().as_secs_f64()
    );
    Strips { segs, stop }
}
