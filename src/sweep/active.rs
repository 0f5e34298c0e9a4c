//! The active list: the vertical order of segments crossed by the sweep
//! line.

use crate::geom::{Halfsegment, Point};

/// The result of [`ActiveList::insert`].
#[derive(Clone, Copy, Debug)]
pub enum Inserted {
    /// The halfsegment went into the list at `index`.
    Fresh {
        /// Where the new entry landed.
        index: usize,
    },
    /// An entry with the same endpoints was already present; nothing was
    /// inserted.
    Duplicate {
        /// A copy of the existing entry, labels included.
        copy: Halfsegment,
        /// The existing entry's position.
        index: usize,
    },
}

/// The left halfsegments currently intersecting the sweep line, ordered by
/// their y-intercept with it.
///
/// The list stores copies; mutating a stored entry means replacing it, and
/// replacement and removal take the entry's index so that the caller's
/// index arithmetic stays explicit when neighbors shift. Right
/// halfsegments must never be inserted.
///
/// `sweep_x` is the comparison parameter: the sweep sets it to the current
/// event's x-coordinate before touching the list.
#[derive(Clone, Debug, Default)]
pub struct ActiveList {
    entries: Vec<Halfsegment>,
    /// The sweep line's current x position.
    pub sweep_x: f64,
}

/// A halfsegment re-anchored at its sweep-line intercept, pointing at the
/// far endpoint of the original.
fn reduced(h: &Halfsegment, x: f64, y: f64) -> Halfsegment {
    let dom = Point { x, y };
    let sub = if dom == h.sub { h.dom } else { h.sub };
    Halfsegment { dom, sub, ..*h }
}

impl ActiveList {
    /// Create an empty active list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Does `h1` lie strictly below `h2` at the sweep line?
    ///
    /// Structurally equal and colinear pairs compare equal (both
    /// directions return `false`). Ties in the y-intercept are broken by
    /// comparing the halfsegments re-anchored at the intercept: two
    /// segments ending here order by the reverse of halfsegment order, two
    /// beginning here by halfsegment order, and an ending segment sorts
    /// below a beginning one.
    pub fn less(&self, h1: &Halfsegment, h2: &Halfsegment) -> bool {
        if h1 == h2 {
            return false;
        }
        if h1.colinear(h2) {
            return false;
        }
        let y1 = h1.y_at_x(self.sweep_x);
        let y2 = h2.y_at_x(self.sweep_x);
        if y1 != y2 {
            return y1 < y2;
        }
        let r1 = reduced(h1, self.sweep_x, y1);
        let r2 = reduced(h2, self.sweep_x, y2);
        match (r1.is_left(), r2.is_left()) {
            (false, false) => !(r1 < r2),
            (true, true) => r1 < r2,
            (false, true) => true,
            (true, false) => false,
        }
    }

    /// Insert a left halfsegment at its sweep-ordered position.
    ///
    /// If a structurally equal entry is found while scanning for the
    /// position, nothing is inserted and the duplicate is reported. A
    /// halfsegment that belongs at the very end is appended without the
    /// duplicate scan; the colinear-overlap handling in the sweep relies
    /// on this.
    pub fn insert(&mut self, h: Halfsegment) -> Inserted {
        let append = match self.entries.last() {
            None => true,
            Some(last) => !self.less(&h, last),
        };
        if append {
            self.entries.push(h);
            return Inserted::Fresh {
                index: self.entries.len() - 1,
            };
        }
        let mut i = 0;
        loop {
            if self.entries[i] == h {
                return Inserted::Duplicate {
                    copy: self.entries[i],
                    index: i,
                };
            }
            if self.less(&h, &self.entries[i]) {
                self.entries.insert(i, h);
                return Inserted::Fresh { index: i };
            }
            i += 1;
        }
    }

    /// Linear scan for an entry with `h`'s endpoints.
    pub fn find(&self, h: &Halfsegment) -> Option<usize> {
        self.entries.iter().position(|e| e == h)
    }

    /// Like [`find`](Self::find), but also returns a copy of the entry.
    pub fn exists(&self, h: &Halfsegment) -> Option<(Halfsegment, usize)> {
        self.find(h).map(|i| (self.entries[i], i))
    }

    /// Overwrite the entry at `index` with `new`, preserving its position.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the entry there does not match
    /// `old` by endpoints; both signal a broken sweep invariant.
    pub fn replace_at(&mut self, old: &Halfsegment, new: Halfsegment, index: usize) {
        assert!(
            index < self.entries.len(),
            "active list replace: index {index} out of range"
        );
        assert!(
            self.entries[index] == *old,
            "active list replace: entry at {index} does not match {old:?}"
        );
        self.entries[index] = new;
    }

    /// Find `old` and overwrite it with `new`, preserving its position.
    ///
    /// # Panics
    ///
    /// Panics if no entry matches `old`.
    pub fn replace(&mut self, old: &Halfsegment, new: Halfsegment) {
        match self.find(old) {
            Some(index) => self.entries[index] = new,
            None => panic!("active list replace: segment not found: {old:?}"),
        }
    }

    /// A copy of the neighbor directly above the entry at `index`.
    pub fn above(&self, index: usize) -> Option<Halfsegment> {
        self.entries.get(index + 1).copied()
    }

    /// A copy of the neighbor directly below the entry at `index`.
    pub fn below(&self, index: usize) -> Option<Halfsegment> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .copied()
    }

    /// Remove the entry at `index`.
    ///
    /// An out-of-range index is silently ignored.
    ///
    /// # Panics
    ///
    /// Panics if the entry at `index` does not match `h` by endpoints.
    pub fn erase_at(&mut self, h: &Halfsegment, index: usize) {
        if index >= self.entries.len() {
            return;
        }
        assert!(
            self.entries[index] == *h,
            "active list erase: entry at {index} does not match {h:?}"
        );
        self.entries.remove(index);
    }

    /// Find the entry with `h`'s endpoints and remove it; no-op when
    /// absent.
    pub fn erase(&mut self, h: &Halfsegment) {
        if let Some(i) = self.find(h) {
            self.entries.remove(i);
        }
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the list empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{FaceId, RegionId};

    fn hseg(dom: (f64, f64), sub: (f64, f64)) -> Halfsegment {
        Halfsegment::new(
            Point::new(dom.0, dom.1),
            Point::new(sub.0, sub.1),
            FaceId(1),
            FaceId(0),
            RegionId::First,
        )
    }

    #[test]
    fn orders_by_y_intercept() {
        let mut al = ActiveList::new();
        al.sweep_x = 0.5;
        let low = hseg((0.0, 0.0), (1.0, 0.0));
        let high = hseg((0.0, 2.0), (1.0, 0.5));
        assert!(al.less(&low, &high));
        assert!(!al.less(&high, &low));

        al.sweep_x = 0.0;
        let Inserted::Fresh { index } = al.insert(high) else {
            panic!("expected fresh insert");
        };
        assert_eq!(index, 0);
        let Inserted::Fresh { index } = al.insert(low) else {
            panic!("expected fresh insert");
        };
        assert_eq!(index, 0);
        assert_eq!(al.below(1), Some(low));
        assert_eq!(al.above(0), Some(high));
    }

    #[test]
    fn shared_start_orders_by_angle() {
        let mut al = ActiveList::new();
        al.sweep_x = 0.0;
        let flat = hseg((0.0, 0.0), (1.0, 0.0));
        let steep = hseg((0.0, 0.0), (1.0, 1.0));
        assert!(al.less(&flat, &steep));
    }

    #[test]
    fn shared_end_orders_by_reversed_angle() {
        let mut al = ActiveList::new();
        al.sweep_x = 1.0;
        let rising = hseg((0.0, 0.0), (1.0, 1.0));
        let falling = hseg((0.0, 2.0), (1.0, 1.0));
        assert!(al.less(&rising, &falling));
        assert!(!al.less(&falling, &rising));
    }

    #[test]
    fn ending_sorts_below_beginning() {
        let mut al = ActiveList::new();
        al.sweep_x = 1.0;
        let ending = hseg((0.0, 0.0), (1.0, 1.0));
        let beginning = hseg((1.0, 1.0), (2.0, 3.0));
        assert!(al.less(&ending, &beginning));
        assert!(!al.less(&beginning, &ending));
    }

    #[test]
    fn colinear_segments_compare_equal() {
        let al = ActiveList::new();
        let a = hseg((0.0, 0.0), (1.0, 1.0));
        let b = hseg((0.0, 0.0), (2.0, 2.0));
        assert!(!al.less(&a, &b));
        assert!(!al.less(&b, &a));
    }

    #[test]
    fn duplicate_found_mid_list() {
        let mut al = ActiveList::new();
        al.sweep_x = 0.0;
        al.insert(hseg((0.0, 0.0), (1.0, 0.0)));
        al.insert(hseg((0.0, 1.0), (1.0, 1.0)));
        let mut dup = hseg((0.0, 0.0), (1.0, 0.0));
        dup.la = FaceId(9);
        match al.insert(dup) {
            Inserted::Duplicate { copy, index } => {
                assert_eq!(index, 0);
                assert_eq!(copy.la, FaceId(1));
            }
            Inserted::Fresh { .. } => panic!("expected a duplicate"),
        }
        assert_eq!(al.len(), 2);
    }

    #[test]
    fn duplicate_of_last_entry_is_appended() {
        // The append fast path skips duplicate detection on purpose; the
        // sweep's colinear machinery merges the pair afterwards.
        let mut al = ActiveList::new();
        al.sweep_x = 0.0;
        al.insert(hseg((0.0, 0.0), (1.0, 0.0)));
        match al.insert(hseg((0.0, 0.0), (1.0, 0.0))) {
            Inserted::Fresh { index } => assert_eq!(index, 1),
            Inserted::Duplicate { .. } => panic!("append path must not report duplicates"),
        }
        assert_eq!(al.len(), 2);
    }

    #[test]
    fn erase_at_out_of_range_is_silent() {
        let mut al = ActiveList::new();
        al.erase_at(&hseg((0.0, 0.0), (1.0, 0.0)), 3);
        assert!(al.is_empty());
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn erase_at_mismatch_panics() {
        let mut al = ActiveList::new();
        al.sweep_x = 0.0;
        al.insert(hseg((0.0, 0.0), (1.0, 0.0)));
        al.erase_at(&hseg((0.0, 1.0), (1.0, 1.0)), 0);
    }

    #[test]
    fn replace_preserves_position() {
        let mut al = ActiveList::new();
        al.sweep_x = 0.0;
        al.insert(hseg((0.0, 0.0), (1.0, 0.0)));
        al.insert(hseg((0.0, 1.0), (1.0, 1.0)));
        let old = hseg((0.0, 0.0), (1.0, 0.0));
        let mut new = old;
        new.ola = FaceId(5);
        al.replace_at(&old, new, 0);
        assert_eq!(al.exists(&old).unwrap().0.ola, FaceId(5));
    }
}
