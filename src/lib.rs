pub mod csv;
pub mod engine;
pub mod model;
pub mod route;

pub use engine::Engine;
pub use model::{Booking, Command, Pnr, SeatNo, Segment};
pub use route::Route;
