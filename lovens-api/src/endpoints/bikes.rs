//! Bike endpoints.

use lovens_core::error::LvResult;
use lovens_models::{Bike, BikeState, HealthItem};

use crate::client::LovensClient;

impl LovensClient {
    /// All bikes the user has access to.
    pub async fn get_bikes(&self) -> LvResult<Vec<Bike>> {
        let tz = self.timezone()?;
        let value = self.get("/bike", &[]).await?;
        Bike::from_server_list(&value, tz)
    }

    /// A single bike.
    pub async fn get_bike(&self, bike_id: i64) -> LvResult<Bike> {
        let tz = self.timezone()?;
        let value = self.get(&format!("/bike/{bike_id}"), &[]).await?;
        Bike::from_server_map(&value, tz)
    }

    /// Live state of a bike: power, lock, charging and battery level.
    pub async fn get_state(&self, bike_id: i64) -> LvResult<BikeState> {
        let tz = self.timezone()?;
        let value = self.get(&format!("/bike/{bike_id}/state"), &[]).await?;
        BikeState::from_server_map(&value, tz)
    }

    /// The four health readings of a bike, always in the same order:
    /// connection, GPS fix, GPS-unit battery, onboard system.
    pub async fn get_health(&self, bike_id: i64) -> LvResult<Vec<HealthItem>> {
        let tz = self.timezone()?;
        let value = self.get(&format!("/bike/{bike_id}/health"), &[]).await?;
        HealthItem::from_server_list(&value, tz)
    }
}
