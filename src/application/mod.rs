//! Application layer containing the back office logic.
//!
//! The `BackOffice` facade ties order intake to the two core services: the
//! `AvailabilityResolver`, which finds restaurants able to cook a whole
//! order, and the `DistanceRanker`, which orders them by distance through the
//! `GeocodeCache`.

pub mod back_office;
pub mod geocode_cache;
pub mod intake;
pub mod ranker;
pub mod resolver;
