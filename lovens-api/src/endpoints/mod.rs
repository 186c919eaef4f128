//! API endpoint modules organized by resource.
//!
//! Each module adds accessors for one group of related endpoints to
//! `LovensClient`.

pub mod battery;
pub mod bikes;
pub mod geofences;
pub mod location;
pub mod rides;
pub mod statistics;
pub mod user;
