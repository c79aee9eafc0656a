//! Core domain types for the seat allocation engine.

/// Booking identifier (Passenger Name Record).
pub type Pnr = u32;

/// Physical seat number, 1-based.
pub type SeatNo = u16;

/// A command representing the possible inputs of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reserve seats for `passengers` between two stations.
    Book {
        from: String,
        to: String,
        passengers: u32,
    },
    /// Release up to `seats` seats of a confirmed booking.
    Cancel { pnr: Pnr, seats: u32 },
}

/// Half-open range of station indices `[from, to)`.
///
/// A segment always spans at least one leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    from: usize,
    to: usize,
}

impl Segment {
    /// Build a segment from two station indices in any order.
    /// Returns `None` when both indices are the same station.
    pub fn between(a: usize, b: usize) -> Option<Self> {
        if a == b {
            return None;
        }
        Some(Self {
            from: a.min(b),
            to: a.max(b),
        })
    }

    pub fn start(&self) -> usize {
        self.from
    }

    pub fn end(&self) -> usize {
        self.to
    }

    /// Two segments overlap when they share at least one leg.
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.from < other.to && other.from < self.to
    }

    /// Whether this segment spans the whole stretch from station `i` to station `j`.
    pub fn covers(&self, i: usize, j: usize) -> bool {
        self.from <= i && self.to >= j
    }
}

/// A booking, either confirmed (holding seats) or waitlisted (holding none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub pnr: Pnr,
    /// Origin code as requested.
    pub from: String,
    /// Destination code as requested.
    pub to: String,
    pub segment: Segment,
    /// Passenger count of the original request.
    pub passengers: u32,
    /// Granted seats, in assignment order.
    pub seats: Vec<SeatNo>,
}

impl Booking {
    /// Create a booking that holds no seats yet.
    pub fn new(pnr: Pnr, from: &str, to: &str, segment: Segment, passengers: u32) -> Self {
        Self {
            pnr,
            from: from.to_string(),
            to: to.to_string(),
            segment,
            passengers,
            seats: Vec::new(),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        !self.seats.is_empty()
    }
}
