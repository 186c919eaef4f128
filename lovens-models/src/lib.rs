//! Lovens Models - Resource records returned by the telemetry API.
//!
//! Every record is an immutable snapshot of server state at fetch time. Each
//! keeps a documented, type-normalized field subset plus an `extra` map with
//! every other field the server sent, so additions on the server side never
//! break decoding.

pub mod models;
pub mod parse;

// Re-export key types
pub use models::battery::{BatterySample, BatteryState};
pub use models::bike::{Bike, BikeState};
pub use models::geofence::{GeoPoint, Geofence, GeofenceStats};
pub use models::health::{HealthItem, HealthKind, HealthValue, HealthValueType};
pub use models::location::LocationPoint;
pub use models::ride::{Ride, RidePage};
pub use models::statistics::{Granularity, StatisticsBin};
pub use models::user::User;
pub use parse::JsonMap;
