//! Record types, one module per resource family.

pub mod battery;
pub mod bike;
pub mod geofence;
pub mod health;
pub mod location;
pub mod ride;
pub mod statistics;
pub mod user;
