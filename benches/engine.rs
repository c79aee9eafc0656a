use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use seat_eng::{Command, Engine, Pnr, Route};

/// Generates booking traffic over a route.
///
/// Pattern (repeating):
/// 1. Book a short hop between neighbouring stations
/// 2. Book a longer stretch
/// 3. Cancel one seat of an earlier booking
///
/// Cancellations keep freeing seats so the waitlist keeps getting promoted.
pub struct CommandGenerator {
    stations: Vec<String>,
    remaining: u32,
    step: u32,
    issued: Pnr,
}

impl CommandGenerator {
    pub fn new(route: &Route, count: u32) -> Self {
        Self {
            stations: route.stations().to_vec(),
            remaining: count,
            step: 0,
            issued: 0,
        }
    }

    fn station(&self, idx: u32) -> String {
        self.stations[idx as usize % self.stations.len()].clone()
    }
}

impl Iterator for CommandGenerator {
    type Item = Command;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let n = self.stations.len() as u32;
        let start = self.step % (n - 1);
        let command = match self.step % 3 {
            0 => {
                self.issued += 1;
                Command::Book {
                    from: self.station(start),
                    to: self.station(start + 1),
                    passengers: 1 + (self.step / 3) % 3,
                }
            }
            1 => {
                self.issued += 1;
                Command::Book {
                    from: self.station(0),
                    to: self.station(start + 1),
                    passengers: 2,
                }
            }
            _ => Command::Cancel {
                // PNRs of rejected bookings simply miss
                pnr: 1 + self.step % self.issued.max(1),
                seats: 1,
            },
        };

        self.step += 1;
        Some(command)
    }
}

fn route(stations: usize, seats: u16, waitlist: usize) -> Route {
    Route::new((0..stations).map(|i| format!("S{i}")), seats, waitlist).unwrap()
}

fn bench_booking_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("bookings");

    for count in [1_000u32, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let route = route(5, 8, 2);
            b.iter(|| {
                let mut engine = Engine::new(route.clone());
                for i in 0..count {
                    let from = &route.stations()[(i % 4) as usize];
                    let to = &route.stations()[(i % 4 + 1) as usize];
                    let _ = black_box(engine.book(from, to, 1));
                }
                engine
            });
        });
    }

    group.finish();
}

fn bench_mixed_commands(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");

    for (stations, seats, waitlist) in [(5, 8, 2), (20, 64, 16), (50, 256, 64)] {
        let label = format!("{stations}st_{seats}seats_{waitlist}wl");
        let route = route(stations, seats, waitlist);
        group.bench_with_input(BenchmarkId::from_parameter(&label), &route, |b, route| {
            b.iter(|| {
                let mut engine = Engine::new(route.clone());
                for command in CommandGenerator::new(route, 10_000) {
                    let _ = black_box(engine.apply(command));
                }
                engine
            });
        });
    }

    group.finish();
}

fn bench_chart(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart");

    let route = route(20, 64, 16);
    let mut engine = Engine::new(route.clone());
    for command in CommandGenerator::new(&route, 5_000) {
        let _ = engine.apply(command);
    }

    group.bench_function("20st_64seats", |b| {
        b.iter(|| black_box(engine.chart_snapshot()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_booking_only,
    bench_mixed_commands,
    bench_chart
);

criterion_main!(benches);
