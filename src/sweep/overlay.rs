//! The serial plane sweep over two halfsegment sequences.

use arrayvec::ArrayVec;

use crate::geom::{FaceId, Halfsegment, Point};

use super::{ActiveList, EventQueue, Inserted};

/// A single event can shed at most 14 pieces (two neighbor breaks of up to
/// seven pieces each), so the buffer never spills.
type Broken = ArrayVec<Halfsegment, 16>;

#[derive(Clone, Copy, Debug)]
enum Source {
    R1,
    R2,
    Queue,
}

/// Where two halfsegments meet.
enum Intersection {
    /// Both endpoints of one lie on the other's supporting line.
    Colinear,
    /// A single crossing point, possibly an endpoint of one of the two.
    At(Point),
}

/// Compute the overlay of two regions by a plane sweep.
///
/// Both inputs must be sorted in halfsegment order, closed under taking
/// brothers, and labeled with their [`RegionId`](crate::RegionId). The
/// output contains every input segment, broken at intersections with the
/// other region and at colinear overlaps, with the overlap labels `ola` and
/// `olb` describing the opposing region above and below each piece. The
/// result is sorted in halfsegment order.
pub fn overlay_plane_sweep(r1: &[Halfsegment], r2: &[Halfsegment]) -> Vec<Halfsegment> {
    let mut result = Vec::with_capacity(r1.len() + r2.len());
    let mut active = ActiveList::new();
    let mut queue = EventQueue::new();
    let mut r1_pos = 0;
    let mut r2_pos = 0;

    loop {
        // The next event is the least of the two input fronts and the
        // queue head. The queue wins ties so that discovered pieces drain
        // before their originals; r2 must be strictly smaller than r1 to
        // win.
        let mut next = None;
        if r1_pos < r1.len() {
            next = Some((r1[r1_pos], Source::R1));
        }
        if r2_pos < r2.len() && next.map_or(true, |(c, _)| r2[r2_pos] < c) {
            next = Some((r2[r2_pos], Source::R2));
        }
        if let Some(tmp) = queue.peek() {
            if next.map_or(true, |(c, _)| *tmp <= c) {
                next = Some((*tmp, Source::Queue));
            }
        }
        let Some((mut curr, source)) = next else {
            break;
        };
        match source {
            Source::Queue => {
                queue.pop();
            }
            Source::R2 => r2_pos += 1,
            Source::R1 => r1_pos += 1,
        }

        let event_x = curr.dom.x;
        let event_y = curr.dom.y;
        active.sweep_x = event_x;
        log::trace!("event {curr:?} from {source:?}");

        if curr.is_left() {
            curr.ola = FaceId::NONE;
            curr.olb = FaceId::NONE;
            match active.insert(curr) {
                Inserted::Duplicate { mut copy, index } => {
                    // A structurally equal entry is already in the list:
                    // the two segments overlap exactly. Record the
                    // newcomer's faces as the stored entry's overlap
                    // labels; there is nothing to break.
                    copy.ola = curr.la;
                    copy.olb = curr.lb;
                    active.replace_at(&copy, copy, index);
                }
                Inserted::Fresh { mut index } => {
                    let stored = curr;
                    let below = active.below(index);
                    let above = active.above(index);
                    let mut broken = Broken::new();

                    // The below neighbor determines curr's overlap labels,
                    // so it must be handled before the above neighbor;
                    // from there the labels carry over.
                    if let Some(below) = below {
                        if curr.region != below.region {
                            // A vertical below neighbor only touches the
                            // sweep line at one x; what lies above its
                            // dominating point is its label to the right.
                            let face = if !below.is_vertical() {
                                below.la
                            } else {
                                below.lb
                            };
                            curr.ola = face;
                            curr.olb = face;
                        } else {
                            curr.ola = below.ola;
                            curr.olb = below.ola;
                        }
                        if break_hsegs(&below, &mut curr, &mut broken, false) {
                            active.erase_at(&below, index - 1);
                            index -= 1;
                        }
                    }
                    if let Some(above) = above {
                        if break_hsegs(&above, &mut curr, &mut broken, false) {
                            active.erase_at(&above, index + 1);
                        }
                    }

                    // curr accumulated labels and possibly shrank; sync the
                    // stored copy.
                    active.replace_at(&stored, curr, index);
                    dispatch_broken(&broken, &mut result, &mut queue, &mut active, event_x, event_y);
                }
            }
        } else {
            // A right halfsegment ends the left entry found via its
            // brother. The entry can be legitimately absent: the brother
            // may have been broken and replaced by shorter pieces.
            let left = curr.brother();
            if let Some((stored, index)) = active.exists(&left) {
                result.push(stored);
                result.push(stored.brother());
                let below = active.below(index);
                let above = active.above(index);
                match (below, above) {
                    (Some(below), Some(mut above)) => {
                        // With the middle segment gone, its neighbors meet;
                        // break them against each other even now.
                        let orig_above = above;
                        let mut broken = Broken::new();
                        if break_hsegs(&below, &mut above, &mut broken, true) {
                            active.erase_at(&below, index - 1);
                            let index = index - 1;
                            active.erase_at(&orig_above, index + 1);
                            active.erase_at(&stored, index);
                            dispatch_broken(
                                &broken, &mut result, &mut queue, &mut active, event_x, event_y,
                            );
                        } else {
                            active.erase_at(&stored, index);
                        }
                    }
                    _ => active.erase_at(&stored, index),
                }
            }
        }
    }

    result.sort();
    result
}

/// Break two left halfsegments at their intersection.
///
/// `al_seg` is the active-list neighbor, `curr` the segment being
/// processed; when `curr` is shortened it is rewritten in place so the
/// caller's labels stay current. The resulting left/right pieces are
/// appended to `broken`; `curr`'s own surviving head is included only when
/// `include_curr` is set, since a left-event caller keeps it in the active
/// list anyway. Returns whether the two segments intersected at all.
fn break_hsegs(
    al_seg: &Halfsegment,
    curr: &mut Halfsegment,
    broken: &mut Broken,
    include_curr: bool,
) -> bool {
    let orig = *curr;
    let h2 = *al_seg;
    let Some(hit) = find_intersection_point(&h2, &orig) else {
        return false;
    };
    match hit {
        Intersection::Colinear => {
            // A colinear overlap has up to three parts: the lead-in owned
            // by the active-list segment, the shared middle, and the tail
            // of whichever segment reaches further.
            if h2.dom.x < orig.dom.x || h2.dom.y < orig.dom.y {
                let mut lead = h2;
                lead.sub = orig.dom;
                broken.push(lead);
                broken.push(lead.brother());
            }

            let mut middle = orig;
            if orig.sub > h2.sub {
                middle.sub = h2.sub;
            }
            middle.ola = h2.la;
            middle.olb = h2.lb;
            broken.push(middle.brother());
            if include_curr {
                broken.push(middle);
            }
            *curr = middle;

            if orig.sub != h2.sub {
                let mut tail = if orig.sub > h2.sub { orig } else { h2 };
                tail.dom = if orig.sub > h2.sub { h2.sub } else { orig.sub };
                broken.push(tail);
                broken.push(tail.brother());
            }
            true
        }
        Intersection::At(p) => {
            if p != orig.dom && p != orig.sub {
                // Interior crossing of curr: split it and keep the head.
                let mut head = orig;
                head.sub = p;
                broken.push(head.brother());
                if include_curr {
                    broken.push(head);
                }
                *curr = head;
                let mut rest = orig;
                rest.dom = p;
                broken.push(rest);
                broken.push(rest.brother());
            }
            // Endpoint hit on curr: nothing to split, and the active-list
            // entry is synced by the caller afterwards.

            if p == h2.dom || p == h2.sub {
                // Endpoint hit on the neighbor: the caller removes it from
                // the active list regardless, so push it whole for
                // reinsertion.
                broken.push(h2);
            } else {
                let mut head = h2;
                head.sub = p;
                broken.push(head);
                broken.push(head.brother());
                let mut rest = h2;
                rest.dom = p;
                broken.push(rest);
                broken.push(rest.brother());
            }
            true
        }
    }
}

/// Find where `h1` and `h2` meet, if anywhere.
///
/// Colinear pairs report [`Intersection::Colinear`]; segments that share a
/// dominating or a submissive endpoint do not intersect at all. Everything
/// else is the parametric line intersection, accepted when both parameters
/// land in `[0, 1]` inclusive.
fn find_intersection_point(h1: &Halfsegment, h2: &Halfsegment) -> Option<Intersection> {
    if h1.colinear(h2) {
        return Some(Intersection::Colinear);
    }
    if h1.dom == h2.dom || h1.sub == h2.sub {
        return None;
    }

    let (x1, y1) = (h1.dom.x, h1.dom.y);
    let (x2, y2) = (h1.sub.x, h1.sub.y);
    let (x3, y3) = (h2.dom.x, h2.dom.y);
    let (x4, y4) = (h2.sub.x, h2.sub.y);

    // Parallel segments leave denom at zero; the quotients then fall
    // outside [0, 1] (or are NaN) and the range check rejects them.
    let denom = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
    let ua = ((x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3)) / denom;
    let ub = ((x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3)) / denom;
    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(Intersection::At(Point {
            x: x1 + ua * (x2 - x1),
            y: y1 + ua * (y2 - y1),
        }))
    } else {
        None
    }
}

/// Route freshly broken pieces to the output, the event queue, or the
/// active list, depending on where they lie relative to the sweep line.
fn dispatch_broken(
    broken: &[Halfsegment],
    result: &mut Vec<Halfsegment>,
    queue: &mut EventQueue,
    active: &mut ActiveList,
    event_x: f64,
    event_y: f64,
) {
    for p in broken {
        let behind = if !p.is_vertical() {
            p.dom.x <= event_x && p.sub.x <= event_x
        } else {
            p.dom.y <= event_y && p.sub.y <= event_y
        };
        if behind {
            // Entirely behind the sweep line: it can never produce another
            // event.
            result.push(*p);
        } else if !p.is_left() || p.dom.x > event_x || (p.dom.x == event_x && p.dom.y > event_y) {
            // A right halfsegment, or a left one whose event is still
            // ahead.
            queue.insert(*p);
        } else {
            // A left halfsegment straddling the sweep line goes back into
            // the active list.
            let _ = active.insert(*p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::RegionId;

    fn hseg(dom: (f64, f64), sub: (f64, f64), region: RegionId) -> Halfsegment {
        Halfsegment::new(dom.into(), sub.into(), FaceId(1), FaceId(0), region)
    }

    #[test]
    fn shared_endpoint_is_not_an_intersection() {
        let a = hseg((0.0, 0.0), (1.0, 1.0), RegionId::First);
        let b = hseg((0.0, 0.0), (1.0, -1.0), RegionId::Second);
        assert!(find_intersection_point(&a, &b).is_none());
    }

    #[test]
    fn interior_crossing_is_found() {
        let a = hseg((0.0, 0.0), (2.0, 2.0), RegionId::First);
        let b = hseg((0.0, 2.0), (2.0, 0.0), RegionId::Second);
        match find_intersection_point(&a, &b) {
            Some(Intersection::At(p)) => assert_eq!(p, Point::new(1.0, 1.0)),
            _ => panic!("expected a crossing"),
        }
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let a = hseg((0.0, 0.0), (2.0, 0.0), RegionId::First);
        let b = hseg((0.0, 1.0), (2.0, 1.0), RegionId::Second);
        assert!(find_intersection_point(&a, &b).is_none());
    }

    #[test]
    fn colinear_overlap_is_reported() {
        let a = hseg((0.0, 0.0), (2.0, 0.0), RegionId::First);
        let b = hseg((1.0, 0.0), (3.0, 0.0), RegionId::Second);
        assert!(matches!(
            find_intersection_point(&a, &b),
            Some(Intersection::Colinear)
        ));
    }

    #[test]
    fn touching_tip_to_interior_is_an_endpoint_hit() {
        let a = hseg((0.0, 0.0), (2.0, 0.0), RegionId::First);
        let b = hseg((1.0, 0.0), (1.0, 2.0), RegionId::Second);
        match find_intersection_point(&a, &b) {
            Some(Intersection::At(p)) => assert_eq!(p, Point::new(1.0, 0.0)),
            _ => panic!("expected a crossing"),
        }
    }

    #[test]
    fn break_at_interior_crossing_splits_both() {
        let al_seg = hseg((0.0, 0.0), (2.0, 2.0), RegionId::First);
        let mut curr = hseg((0.0, 2.0), (2.0, 0.0), RegionId::Second);
        let mut broken = Broken::new();
        assert!(break_hsegs(&al_seg, &mut curr, &mut broken, false));
        // curr shrank to its head.
        assert_eq!(curr.sub, Point::new(1.0, 1.0));
        // head brother + curr tail pair + four neighbor pieces.
        assert_eq!(broken.len(), 7);
        let lefts = broken.iter().filter(|h| h.is_left()).count();
        assert_eq!(lefts, 3);
    }

    #[test]
    fn break_colinear_marks_overlap_labels() {
        let mut al_seg = hseg((0.0, 0.0), (2.0, 0.0), RegionId::First);
        al_seg.la = FaceId(4);
        al_seg.lb = FaceId(2);
        let mut curr = hseg((1.0, 0.0), (3.0, 0.0), RegionId::Second);
        let mut broken = Broken::new();
        assert!(break_hsegs(&al_seg, &mut curr, &mut broken, false));
        // curr is rewritten to the shared middle with merged labels.
        assert_eq!(curr.dom, Point::new(1.0, 0.0));
        assert_eq!(curr.sub, Point::new(2.0, 0.0));
        assert_eq!(curr.ola, FaceId(4));
        assert_eq!(curr.olb, FaceId(2));
        // lead-in pair + middle brother + tail pair.
        assert_eq!(broken.len(), 5);
    }

    #[test]
    fn sweep_of_single_region_returns_it_unchanged() {
        let mut r: Vec<Halfsegment> = Vec::new();
        let edges = [
            ((0.0, 0.0), (1.0, 0.0), FaceId(1), FaceId(0)),
            ((1.0, 0.0), (1.0, 1.0), FaceId(1), FaceId(0)),
            ((0.0, 1.0), (1.0, 1.0), FaceId(0), FaceId(1)),
            ((0.0, 0.0), (0.0, 1.0), FaceId(0), FaceId(1)),
        ];
        for (dom, sub, la, lb) in edges {
            let h = Halfsegment::new(dom.into(), sub.into(), la, lb, RegionId::First);
            r.push(h);
            r.push(h.brother());
        }
        r.sort();
        let out = overlay_plane_sweep(&r, &[]);
        assert_eq!(out.len(), r.len());
        for (got, want) in out.iter().zip(&r) {
            assert_eq!(got, want);
            assert_eq!(got.la, want.la);
            assert_eq!(got.lb, want.lb);
            assert_eq!(got.ola, FaceId::NONE);
            assert_eq!(got.olb, FaceId::NONE);
        }
    }
}
