use crate::model::Segment;

/// A physical seat and the segments it is occupied on.
/// Occupied segments never overlap each other.
#[derive(Debug, Default, Clone)]
pub struct Seat {
    occupied: Vec<Segment>,
}

impl Seat {
    pub fn is_free_for(&self, segment: &Segment) -> bool {
        !self.occupied.iter().any(|s| s.overlaps(segment))
    }

    /// Occupy the seat on `segment`. Returns `false`, leaving the seat
    /// untouched, when the segment overlaps an existing occupation.
    pub fn occupy(&mut self, segment: Segment) -> bool {
        if !self.is_free_for(&segment) {
            return false;
        }
        self.occupied.push(segment);
        true
    }

    /// Release the occupation matching `segment` exactly.
    pub fn release(&mut self, segment: &Segment) -> bool {
        match self.occupied.iter().position(|s| s == segment) {
            Some(idx) => {
                self.occupied.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    /// Whether someone sits here for the whole stretch from station `i` to `j`.
    pub fn covers(&self, i: usize, j: usize) -> bool {
        self.occupied.iter().any(|s| s.covers(i, j))
    }

    pub fn occupied(&self) -> &[Segment] {
        &self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }
}
