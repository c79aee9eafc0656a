use std::collections::HashSet;
use std::env;
use thiserror::Error;

use crate::engine::BookError;
use crate::model::Segment;

const DEFAULT_STATIONS: [&str; 5] = ["A", "B", "C", "D", "E"];
const DEFAULT_TOTAL_SEATS: u16 = 8;
const DEFAULT_MAX_WAITLIST: usize = 2;

pub const STATIONS_VAR: &str = "SEAT_ENG_STATIONS";
pub const SEATS_VAR: &str = "SEAT_ENG_SEATS";
pub const WAITLIST_VAR: &str = "SEAT_ENG_WAITLIST";

/// Errors that can occur when building a route
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("a route needs at least two stations, got {0}")]
    TooFewStations(usize),

    #[error("station code at position {0} is empty")]
    EmptyStation(usize),

    #[error("duplicate station code '{0}'")]
    DuplicateStation(String),

    #[error("a train needs at least one seat")]
    NoSeats,

    #[error("{var}: invalid value '{value}'")]
    InvalidVar { var: &'static str, value: String },
}

/// The single route served by the train, with its fixed capacities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    stations: Vec<String>,
    total_seats: u16,
    max_waitlist: usize,
}

impl Route {
    pub fn new(
        stations: impl IntoIterator<Item = impl Into<String>>,
        total_seats: u16,
        max_waitlist: usize,
    ) -> Result<Self, ConfigError> {
        let stations: Vec<String> = stations.into_iter().map(Into::into).collect();

        if stations.len() < 2 {
            return Err(ConfigError::TooFewStations(stations.len()));
        }

        let mut seen = HashSet::new();
        for (idx, code) in stations.iter().enumerate() {
            if code.is_empty() {
                return Err(ConfigError::EmptyStation(idx));
            }
            if !seen.insert(code.as_str()) {
                return Err(ConfigError::DuplicateStation(code.clone()));
            }
        }

        if total_seats == 0 {
            return Err(ConfigError::NoSeats);
        }

        Ok(Self {
            stations,
            total_seats,
            max_waitlist,
        })
    }

    /// Load the route from `SEAT_ENG_*` environment variables, falling back to
    /// the default route for any variable that is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let stations: Vec<String> = match lookup(STATIONS_VAR) {
            Some(raw) => raw.split(',').map(|s| s.trim().to_string()).collect(),
            None => DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect(),
        };

        let total_seats = match lookup(SEATS_VAR) {
            Some(raw) => parse_var(SEATS_VAR, &raw)?,
            None => DEFAULT_TOTAL_SEATS,
        };

        let max_waitlist = match lookup(WAITLIST_VAR) {
            Some(raw) => parse_var(WAITLIST_VAR, &raw)?,
            None => DEFAULT_MAX_WAITLIST,
        };

        Self::new(stations, total_seats, max_waitlist)
    }

    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn total_seats(&self) -> u16 {
        self.total_seats
    }

    pub fn max_waitlist(&self) -> usize {
        self.max_waitlist
    }

    pub fn index_of(&self, code: &str) -> Option<usize> {
        self.stations.iter().position(|s| s == code)
    }

    /// Resolve two station codes into the segment travelled between them.
    /// Direction is irrelevant: `C -> A` occupies the same legs as `A -> C`.
    pub fn resolve(&self, from: &str, to: &str) -> Result<Segment, BookError> {
        let fi = self
            .index_of(from)
            .ok_or_else(|| BookError::InvalidStation(from.to_string()))?;
        let ti = self
            .index_of(to)
            .ok_or_else(|| BookError::InvalidStation(to.to_string()))?;

        Segment::between(fi, ti).ok_or_else(|| BookError::SameStation(from.to_string()))
    }

    /// Every station pair `(i, j)` with `i < j`, row by row.
    pub fn legs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.stations.len();
        (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
    }
}

impl Default for Route {
    fn default() -> Self {
        Self {
            stations: DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect(),
            total_seats: DEFAULT_TOTAL_SEATS,
            max_waitlist: DEFAULT_MAX_WAITLIST,
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
        var,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn default_route() {
        let route = Route::default();
        assert_eq!(route.stations(), ["A", "B", "C", "D", "E"]);
        assert_eq!(route.total_seats(), 8);
        assert_eq!(route.max_waitlist(), 2);
    }

    #[test]
    fn from_lookup_without_vars_is_default() {
        assert_eq!(Route::from_lookup(lookup(&[])).unwrap(), Route::default());
    }

    #[test]
    fn from_lookup_overrides() {
        let route = Route::from_lookup(lookup(&[
            (STATIONS_VAR, "X, Y ,Z"),
            (SEATS_VAR, "3"),
            (WAITLIST_VAR, "0"),
        ]))
        .unwrap();
        assert_eq!(route.stations(), ["X", "Y", "Z"]);
        assert_eq!(route.total_seats(), 3);
        assert_eq!(route.max_waitlist(), 0);
    }

    #[test]
    fn from_lookup_validates_stations() {
        let err = Route::from_lookup(lookup(&[(STATIONS_VAR, "A,,C")])).unwrap_err();
        assert_eq!(err, ConfigError::EmptyStation(1));
    }

    #[test]
    fn from_lookup_rejects_bad_number() {
        let err = Route::from_lookup(lookup(&[(SEATS_VAR, "many")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidVar {
                var: SEATS_VAR,
                value: "many".to_string()
            }
        );
    }

    #[test]
    fn new_validates_stations() {
        assert_eq!(
            Route::new(["A"], 8, 2).unwrap_err(),
            ConfigError::TooFewStations(1)
        );
        assert_eq!(
            Route::new(["A", ""], 8, 2).unwrap_err(),
            ConfigError::EmptyStation(1)
        );
        assert_eq!(
            Route::new(["A", "B", "A"], 8, 2).unwrap_err(),
            ConfigError::DuplicateStation("A".to_string())
        );
    }

    #[test]
    fn new_rejects_zero_seats() {
        assert_eq!(Route::new(["A", "B"], 0, 2).unwrap_err(), ConfigError::NoSeats);
    }

    #[test]
    fn resolve_orders_indices() {
        let route = Route::default();
        let forward = route.resolve("A", "C").unwrap();
        let backward = route.resolve("C", "A").unwrap();
        assert_eq!(forward, backward);
        assert_eq!((forward.start(), forward.end()), (0, 2));
    }

    #[test]
    fn resolve_errors() {
        let route = Route::default();
        assert_eq!(
            route.resolve("A", "Z").unwrap_err(),
            BookError::InvalidStation("Z".to_string())
        );
        assert_eq!(
            route.resolve("Q", "B").unwrap_err(),
            BookError::InvalidStation("Q".to_string())
        );
        assert_eq!(
            route.resolve("B", "B").unwrap_err(),
            BookError::SameStation("B".to_string())
        );
    }

    #[test]
    fn legs_cover_every_pair() {
        let route = Route::default();
        let legs: Vec<_> = route.legs().collect();
        assert_eq!(legs.len(), 10);
        assert_eq!(legs[0], (0, 1));
        assert_eq!(legs[3], (0, 4));
        assert_eq!(legs[4], (1, 2));
        assert_eq!(legs[9], (3, 4));
    }
}
