//! Read-only seat chart built from the engine state.

use std::fmt;

use crate::model::Pnr;

/// Occupancy of every seat for one station pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegRow {
    pub from: String,
    pub to: String,
    /// Indexed by seat number - 1.
    pub occupied: Vec<bool>,
}

/// A booking still waiting for seats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistEntry {
    pub pnr: Pnr,
    pub from: String,
    pub to: String,
    pub passengers: u32,
}

/// Point-in-time view of seat occupancy and the waitlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSnapshot {
    pub first_station: String,
    pub last_station: String,
    pub total_seats: u16,
    pub legs: Vec<LegRow>,
    pub waitlist: Vec<WaitlistEntry>,
}

impl ChartSnapshot {
    /// Look up the row for a station pair.
    pub fn leg(&self, from: &str, to: &str) -> Option<&LegRow> {
        self.legs.iter().find(|row| row.from == from && row.to == to)
    }
}

impl fmt::Display for ChartSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Booking Chart:")?;
        writeln!(
            f,
            "Seats status from {} to {}:",
            self.first_station, self.last_station
        )?;

        write!(f, "Seat No:")?;
        for seat in 1..=self.total_seats {
            write!(f, " {seat}")?;
        }
        writeln!(f)?;

        for row in &self.legs {
            write!(f, "{} to {}:", row.from, row.to)?;
            for &taken in &row.occupied {
                write!(f, " {}", if taken { '*' } else { '_' })?;
            }
            writeln!(f)?;
        }

        for entry in &self.waitlist {
            writeln!(
                f,
                "Waitlisted PNR {} from {} to {}",
                entry.pnr, entry.from, entry.to
            )?;
        }
        Ok(())
    }
}
