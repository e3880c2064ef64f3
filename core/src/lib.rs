//! Shift allocation engine.
//!
//! Distributes a fixed calendar of point-weighted shifts among individuals
//! grouped by institution. Each institution has a point quota; each
//! individual requests points and lists the shifts they want. A seeded
//! greedy allocator runs two preference phases, a donation pass rebalances
//! institutions afterwards, and a seed search keeps the seed with the
//! smallest imbalance.

pub mod commit;
pub mod config;
pub mod consecutive;
pub mod context;
pub mod donation;
pub mod engine;
pub mod error;
pub mod event;
pub mod individual;
pub mod input;
pub mod institution;
pub mod metrics;
pub mod phase;
pub mod priority;
pub mod report;
pub mod rng;
pub mod search;
pub mod selector;
pub mod shift;
pub mod types;
