//! Core data model shared by every stage of the pipeline: plain structs,
//! one per concept, with no persisted/ORM-mapped state — the kernel keeps
//! everything in memory for the lifetime of a run.

pub mod flight;
pub mod passenger;

pub use flight::{Flight, FlightId, TimeOfDayMin};
pub use passenger::{Passenger, PassengerId, PassengerStamps};
