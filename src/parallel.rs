//! The parallel overlay driver: strip partition, per-strip sweeps, and
//! recombination of the strip outputs.

use std::num::NonZeroUsize;
use std::thread;

use crate::geom::{FaceId, Halfsegment};
use crate::strips::{create_strips, find_iso_boundaries};
use crate::sweep::overlay_plane_sweep;

/// Compute the overlay of two regions with `num_strips` parallel sweeps.
///
/// Both inputs must be sorted in halfsegment order and closed under taking
/// brothers. The regions are cut into vertical strips, each strip pair is
/// swept independently on its own thread, and the per-strip outputs are
/// stitched back together so that cuts introduced by the strip boundaries
/// do not survive into the result. For any strip count the output equals
/// [`overlay_plane_sweep`] on the same inputs.
pub fn parallel_overlay(
    r1: &[Halfsegment],
    r2: &[Halfsegment],
    num_strips: usize,
) -> Vec<Halfsegment> {
    let num_strips = num_strips.max(1);
    let plan = find_iso_boundaries(r1, r2, num_strips);

    let (r1_strips, r2_strips) = thread::scope(|scope| {
        let first = scope.spawn(|| create_strips(r1, &plan));
        let second = create_strips(r2, &plan);
        (first.join().expect("strip partition panicked"), second)
    });

    let mut result_strips: Vec<Vec<Halfsegment>> = vec![Vec::new(); num_strips];
    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .min(num_strips);
    let chunk = num_strips.div_ceil(workers);
    thread::scope(|scope| {
        for (ci, out_chunk) in result_strips.chunks_mut(chunk).enumerate() {
            let r1s = &r1_strips;
            let r2s = &r2_strips;
            scope.spawn(move || {
                for (j, out) in out_chunk.iter_mut().enumerate() {
                    let strip = ci * chunk + j;
                    *out = overlay_plane_sweep(r1s.strip(strip), r2s.strip(strip));
                }
            });
        }
    });

    let mut result = create_final_overlay(&mut result_strips, plan.bounds());
    result.sort();
    result
}

fn invalidate(h: &mut Halfsegment) {
    h.la = FaceId::NONE;
    h.lb = FaceId::NONE;
}

fn search(strip: &[Halfsegment], h: &Halfsegment) -> Result<usize, usize> {
    strip.binary_search_by(|e| e.cmp(h))
}

/// Stitch per-strip sweep outputs into one overlay.
///
/// Strip outputs contain artificial cuts along the interior boundaries.
/// Every valid left halfsegment that ends exactly on its strip's right
/// boundary, and is the only segment through that point, is extended with
/// its continuation from the next strip (repeatedly, if the continuation
/// ends on the next boundary again); the swallowed pieces are invalidated
/// in place so the outer walk skips them. Each surviving left halfsegment
/// is emitted together with its brother.
///
/// # Panics
///
/// Panics if a boundary-terminated segment has no brother in its own strip
/// or no continuation in the next one; both mean a strip sweep broke its
/// output invariant.
fn create_final_overlay(
    result_strips: &mut [Vec<Halfsegment>],
    bounds: &[f64],
) -> Vec<Halfsegment> {
    let mut final_result = Vec::new();
    for i in 0..result_strips.len() {
        for j in 0..result_strips[i].len() {
            let mut curr = result_strips[i][j];
            if !curr.is_left() || curr.la == curr.lb {
                continue;
            }
            let mut curr_index = j;
            let mut curr_strip = i;
            let mut curr_bound = i + 1;
            let mut bro_index = 0;
            if curr.sub.x == bounds[curr_bound] {
                bro_index = search(&result_strips[curr_strip], &curr.brother())
                    .unwrap_or_else(|_| {
                        panic!("recombination: no brother for boundary segment {curr:?}")
                    });
            }
            let mut invalidate_last = false;
            while curr.sub.x == bounds[curr_bound] {
                let strip = &result_strips[curr_strip];
                let shared_after =
                    bro_index + 1 < strip.len() && strip[bro_index + 1].dom == curr.sub;
                let shared_before = bro_index > 0 && strip[bro_index - 1].dom == curr.sub;
                if shared_after || shared_before {
                    // Other segments pass through this boundary point, so
                    // the endpoint is real. Keep the cut.
                    break;
                }
                invalidate_last = true;
                let bro = result_strips[curr_strip][bro_index];
                invalidate(&mut result_strips[curr_strip][bro_index]);
                invalidate(&mut result_strips[curr_strip][curr_index]);

                let next = &result_strips[curr_strip + 1];
                curr_index = search(next, &bro).unwrap_or_else(|idx| idx);
                let cont = *next.get(curr_index).unwrap_or_else(|| {
                    panic!("recombination: no continuation for boundary segment {curr:?}")
                });
                bro_index = search(next, &cont.brother()).unwrap_or_else(|idx| idx);
                curr.sub = cont.sub;
                curr_strip += 1;
                curr_bound += 1;
            }
            if invalidate_last {
                invalidate(&mut result_strips[curr_strip][bro_index]);
                invalidate(&mut result_strips[curr_strip][curr_index]);
            }
            final_result.push(curr);
            final_result.push(curr.brother());
        }
    }
    final_result
}
