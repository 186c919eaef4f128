//! Lovens API - HTTP client for the Lovens bike telemetry API.
//!
//! This crate logs in through the Conneq identity service (Cognito plus an
//! OAuth PKCE exchange), keeps the resulting bearer token and the user's
//! timezone, and exposes typed accessors for bikes, rides, locations,
//! battery, statistics and geofences. Time windows accept calendar dates,
//! naive date-times or zoned date-times and are normalized against the
//! user's timezone. Rides can be walked lazily in batches.

pub mod auth;
pub mod client;
pub mod clock;
pub mod dates;
pub mod endpoints;
pub mod pagination;
pub mod session;
pub mod transport;

// Re-export key types
pub use client::LovensClient;
pub use clock::{Clock, FixedClock, SystemClock};
pub use dates::{DateBound, TimeWindow};
pub use pagination::RideIterator;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, RequestBody, Transport};
