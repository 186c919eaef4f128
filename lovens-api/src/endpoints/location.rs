//! Location history endpoint.

use lovens_core::error::LvResult;
use lovens_models::LocationPoint;

use crate::client::LovensClient;
use crate::dates::{DateBound, TimeWindow};

impl LovensClient {
    /// Location history of a bike between `start` and `end`, oldest first.
    ///
    /// Dates widen to whole days and naive times are read in the subject
    /// timezone. The `battery_percentage` of each point is a server
    /// placeholder and always 0.
    pub async fn get_location(
        &self,
        bike_id: i64,
        start: impl Into<DateBound>,
        end: impl Into<DateBound>,
    ) -> LvResult<Vec<LocationPoint>> {
        let tz = self.timezone()?;
        let window = TimeWindow::normalize(start, end, tz)?;
        let value = self
            .get(&format!("/bike/{bike_id}/location"), &window.query_pairs())
            .await?;
        LocationPoint::from_server_list(&value, tz)
    }
}
