//! Geofence endpoints.

use lovens_core::error::{LvError, LvResult};
use lovens_models::{Geofence, GeofenceStats};

use crate::client::LovensClient;
use crate::dates::{DateBound, TimeWindow};

impl LovensClient {
    /// Geofences configured for a bike.
    pub async fn get_geofences(&self, bike_id: i64) -> LvResult<Vec<Geofence>> {
        let value = self.get(&format!("/bike/{bike_id}/geofence"), &[]).await?;
        Geofence::from_server_list(&value)
    }

    /// A single geofence.
    pub async fn get_geofence(&self, geofence_id: i64) -> LvResult<Geofence> {
        let value = self.get(&format!("/geofence/{geofence_id}"), &[]).await?;
        Geofence::from_server_map(&value)
    }

    /// Entry counts of a geofence.
    ///
    /// Without a window only the all-time count is reported. With both
    /// bounds the count inside the window is reported too. Passing exactly
    /// one bound is rejected.
    pub async fn get_geofence_stats(
        &self,
        geofence_id: i64,
        start: Option<DateBound>,
        end: Option<DateBound>,
    ) -> LvResult<GeofenceStats> {
        let tz = self.timezone()?;
        let window = match (start, end) {
            (None, None) => None,
            (Some(start), Some(end)) => Some(TimeWindow::normalize(start, end, tz)?),
            _ => {
                return Err(LvError::InvalidArgument(
                    "geofence stats need both a start and an end, or neither".into(),
                ))
            }
        };
        let query = window.map(|w| w.query_pairs().to_vec()).unwrap_or_default();
        let value = self
            .get(&format!("/geofence/{geofence_id}/stats"), &query)
            .await?;
        GeofenceStats::from_server_map(&value, window.is_some())
    }
}
