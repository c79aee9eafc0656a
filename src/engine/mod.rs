//! Seat allocation engine.
//!
//! The engine owns the seats of a single train and every booking made on it.
//! A seat can be sold several times on one trip as long as the travelled
//! segments do not share a leg. Requests that cannot be seated go to a
//! bounded FIFO waitlist, which is re-examined after each cancellation.
//! Also supports async stream of commands.

use std::collections::{BTreeMap, VecDeque};
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::model::{Booking, Command, Pnr, SeatNo, Segment};
use crate::route::Route;

mod state;
pub use state::Seat;

mod chart;
pub use chart::{ChartSnapshot, LegRow, WaitlistEntry};

mod error;
pub use error::{BookError, CancelError, EngineError};

/// Result of a successful `book`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookOutcome {
    /// Every passenger got a seat.
    Confirmed { pnr: Pnr, seats: Vec<SeatNo> },
    /// Queued on the waitlist; `shortfall` is how many seats were missing.
    Waitlisted { pnr: Pnr, shortfall: u32 },
}

impl BookOutcome {
    pub fn pnr(&self) -> Pnr {
        match self {
            BookOutcome::Confirmed { pnr, .. } | BookOutcome::Waitlisted { pnr, .. } => *pnr,
        }
    }
}

/// A waitlisted booking that got confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    pub pnr: Pnr,
    pub seats: Vec<SeatNo>,
}

/// Result of a successful `cancel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancellation {
    pub pnr: Pnr,
    /// Seats given back, oldest assignment first.
    pub released: Vec<SeatNo>,
    /// Seats the booking still holds.
    pub remaining: usize,
    /// Waitlisted bookings confirmed thanks to the released seats.
    pub promoted: Vec<Promotion>,
}

impl Cancellation {
    pub fn cancelled(&self) -> usize {
        self.released.len()
    }
}

/// Result of [`Engine::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Booked(BookOutcome),
    Cancelled(Cancellation),
}

/// The seat allocation engine.
///
/// Maintains seat occupancy, confirmed bookings and the waitlist of one route.
pub struct Engine {
    route: Route,
    /// Indexed by seat number - 1
    seats: Vec<Seat>,
    confirmed: BTreeMap<Pnr, Booking>,
    /// Oldest first
    waitlist: VecDeque<Booking>,
    next_pnr: Pnr,
}

/// Public API
impl Engine {
    pub fn new(route: Route) -> Self {
        Self {
            seats: vec![Seat::default(); usize::from(route.total_seats())],
            route,
            confirmed: BTreeMap::new(),
            waitlist: VecDeque::new(),
            next_pnr: 1,
        }
    }

    /// Run the engine with the given command stream
    pub async fn run(&mut self, mut stream: impl Stream<Item = Command> + Unpin) {
        while let Some(command) = stream.next().await {
            // a failed command must not stop the engine; outcomes are logged by `apply`
            let _ = self.apply(command);
        }
    }

    /// Apply a single command on top of the current engine state
    pub fn apply(&mut self, command: Command) -> Result<Outcome, EngineError> {
        match command {
            Command::Book {
                from,
                to,
                passengers,
            } => {
                let result = self.book(&from, &to, passengers);
                Self::log_book(&from, &to, passengers, &result);
                Ok(Outcome::Booked(result?))
            }
            Command::Cancel { pnr, seats } => {
                let result = self.cancel(pnr, seats);
                Self::log_cancel(pnr, seats, &result);
                Ok(Outcome::Cancelled(result?))
            }
        }
    }

    /// Book `passengers` seats between two stations:
    /// - Resolve both station codes into a segment
    /// - Confirm on the lowest-numbered free seats if there are enough of them
    /// - Otherwise queue on the waitlist, or reject when it is full
    ///
    /// A rejected request leaves the engine untouched and consumes no PNR.
    pub fn book(&mut self, from: &str, to: &str, passengers: u32) -> Result<BookOutcome, BookError> {
        if passengers == 0 {
            return Err(BookError::NoPassengers);
        }

        let segment = self.route.resolve(from, to)?;
        let available = self.available_seats(&segment);
        let needed = passengers as usize;

        if available.len() >= needed {
            let pnr = self.issue_pnr()?;
            let seats = self.occupy(&available[..needed], segment);
            let mut booking = Booking::new(pnr, from, to, segment, passengers);
            booking.seats = seats.clone();
            self.confirmed.insert(pnr, booking);
            return Ok(BookOutcome::Confirmed { pnr, seats });
        }

        // available < passengers, so this fits in u32
        let available = available.len() as u32;

        if self.waitlist.len() >= self.route.max_waitlist() {
            return Err(BookError::CapacityExhausted {
                requested: passengers,
                available,
            });
        }

        let pnr = self.issue_pnr()?;
        self.waitlist
            .push_back(Booking::new(pnr, from, to, segment, passengers));

        Ok(BookOutcome::Waitlisted {
            pnr,
            shortfall: passengers - available,
        })
    }

    /// Cancel up to `seats` seats of a confirmed booking:
    /// - Release seats in the order they were assigned
    /// - Drop the booking once it holds no seat
    /// - Promote waitlisted bookings that now fit
    ///
    /// Asking for more seats than the booking holds releases all of them.
    pub fn cancel(&mut self, pnr: Pnr, seats: u32) -> Result<Cancellation, CancelError> {
        let booking = self
            .confirmed
            .get_mut(&pnr)
            .ok_or(CancelError::PnrNotFound(pnr))?;

        let count = booking.seats.len().min(seats as usize);
        let released: Vec<SeatNo> = booking.seats.drain(..count).collect();
        let segment = booking.segment;
        let remaining = booking.seats.len();

        if remaining == 0 {
            self.confirmed.remove(&pnr);
        }

        for &seat in &released {
            let freed = self.seats[usize::from(seat) - 1].release(&segment);
            debug_assert!(freed, "seat {seat} was not held on {segment:?}");
        }

        let promoted = self.promote_waitlist();

        Ok(Cancellation {
            pnr,
            released,
            remaining,
            promoted,
        })
    }

    /// Build the seat chart: for every station pair, which seats are taken
    /// for the whole stretch, plus the pending waitlist.
    pub fn chart_snapshot(&self) -> ChartSnapshot {
        let stations = self.route.stations();

        let legs = self
            .route
            .legs()
            .map(|(i, j)| LegRow {
                from: stations[i].clone(),
                to: stations[j].clone(),
                occupied: self.seats.iter().map(|seat| seat.covers(i, j)).collect(),
            })
            .collect();

        let waitlist = self
            .waitlist
            .iter()
            .map(|booking| WaitlistEntry {
                pnr: booking.pnr,
                from: booking.from.clone(),
                to: booking.to.clone(),
                passengers: booking.passengers,
            })
            .collect();

        ChartSnapshot {
            first_station: stations[0].clone(),
            last_station: stations[stations.len() - 1].clone(),
            total_seats: self.route.total_seats(),
            legs,
            waitlist,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Return a booking, confirmed or waitlisted
    pub fn booking(&self, pnr: Pnr) -> Option<&Booking> {
        self.confirmed
            .get(&pnr)
            .or_else(|| self.waitlist.iter().find(|b| b.pnr == pnr))
    }

    /// Confirmed bookings by ascending PNR
    pub fn bookings(&self) -> impl Iterator<Item = &Booking> + '_ {
        self.confirmed.values()
    }

    /// Waitlisted bookings, oldest first
    pub fn waitlist(&self) -> impl Iterator<Item = &Booking> + '_ {
        self.waitlist.iter()
    }

    /// Return one seat by its 1-based number
    pub fn seat(&self, seat: SeatNo) -> Option<&Seat> {
        usize::from(seat)
            .checked_sub(1)
            .and_then(|idx| self.seats.get(idx))
    }

    /// PNR the next accepted booking will receive
    pub fn next_pnr(&self) -> Pnr {
        self.next_pnr
    }
}

/// Private API
impl Engine {
    fn log_book(from: &str, to: &str, passengers: u32, result: &Result<BookOutcome, BookError>) {
        match result {
            Ok(BookOutcome::Confirmed { pnr, seats }) => {
                info!(pnr, from, to, passengers, ?seats, "booking confirmed");
            }
            Ok(BookOutcome::Waitlisted { pnr, shortfall }) => {
                info!(pnr, from, to, passengers, shortfall, "booking waitlisted");
            }
            Err(e) => {
                info!(from, to, passengers, reason = %e, "booking skipped");
            }
        }
    }

    fn log_cancel(pnr: Pnr, seats: u32, result: &Result<Cancellation, CancelError>) {
        match result {
            Ok(cancellation) => {
                if cancellation.cancelled() < seats as usize {
                    warn!(
                        pnr,
                        requested = seats,
                        cancelled = cancellation.cancelled(),
                        "cancellation asked for more seats than the booking holds"
                    );
                }
                info!(
                    pnr,
                    released = ?cancellation.released,
                    remaining = cancellation.remaining,
                    "cancellation applied"
                );
                for promotion in &cancellation.promoted {
                    info!(
                        pnr = promotion.pnr,
                        seats = ?promotion.seats,
                        "waitlisted booking confirmed"
                    );
                }
            }
            Err(e) => {
                info!(pnr, seats, reason = %e, "cancellation skipped");
            }
        }
    }

    fn issue_pnr(&mut self) -> Result<Pnr, BookError> {
        let pnr = self.next_pnr;
        self.next_pnr = pnr.checked_add(1).ok_or(BookError::PnrExhausted)?;
        Ok(pnr)
    }

    /// Indices of the seats free along the whole segment, ascending
    fn available_seats(&self, segment: &Segment) -> Vec<usize> {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, seat)| seat.is_free_for(segment))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Occupy the given seat indices on `segment` and return their seat numbers
    fn occupy(&mut self, indices: &[usize], segment: Segment) -> Vec<SeatNo> {
        indices
            .iter()
            .map(|&idx| {
                let taken = self.seats[idx].occupy(segment);
                assert!(taken, "seat index {idx} is not free on {segment:?}");
                // seat count is bounded by `Route::total_seats: u16`
                (idx + 1) as SeatNo
            })
            .collect()
    }

    /// Confirm waitlisted bookings in FIFO order, stopping at the first one
    /// that cannot be seated in full.
    fn promote_waitlist(&mut self) -> Vec<Promotion> {
        let mut promoted = Vec::new();

        while let Some(front) = self.waitlist.front() {
            let segment = front.segment;
            let needed = front.passengers as usize;

            let available = self.available_seats(&segment);
            if available.len() < needed {
                break;
            }

            let Some(mut booking) = self.waitlist.pop_front() else {
                break;
            };
            booking.seats = self.occupy(&available[..needed], segment);

            promoted.push(Promotion {
                pnr: booking.pnr,
                seats: booking.seats.clone(),
            });
            self.confirmed.insert(booking.pnr, booking);
        }

        promoted
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Route::default())
    }
}
