//! Battery endpoints.

use chrono::TimeDelta;

use lovens_core::constants::BATTERY_STATISTICS_WINDOW_HOURS;
use lovens_core::error::LvResult;
use lovens_models::{BatterySample, BatteryState};

use crate::client::LovensClient;
use crate::dates::{DateBound, Edge, TimeWindow};

impl LovensClient {
    /// Current battery reading of a bike.
    pub async fn get_battery_state(&self, bike_id: i64) -> LvResult<BatteryState> {
        let tz = self.timezone()?;
        let value = self
            .get(&format!("/bike/{bike_id}/battery/current"), &[])
            .await?;
        BatteryState::from_server_map(&value, tz)
    }

    /// Battery level history in 15-minute buckets.
    ///
    /// `end` defaults to now and `start` to 24 hours before `end`. Buckets
    /// recorded while the battery was removed have no percentage.
    pub async fn get_battery_statistics(
        &self,
        bike_id: i64,
        start: Option<DateBound>,
        end: Option<DateBound>,
    ) -> LvResult<Vec<BatterySample>> {
        let tz = self.timezone()?;
        let end = match end {
            Some(bound) => bound.resolve(Edge::End, tz)?,
            None => self.now(tz),
        };
        let start = match start {
            Some(bound) => bound.resolve(Edge::Start, tz)?,
            None => end - TimeDelta::hours(BATTERY_STATISTICS_WINDOW_HOURS),
        };
        let window = TimeWindow::from_instants(start, end)?;
        let value = self
            .get(&format!("/bike/{bike_id}/battery"), &window.query_pairs())
            .await?;
        BatterySample::from_server_list(&value, tz)
    }
}
