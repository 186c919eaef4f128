//! Ride statistics endpoint.

use chrono_tz::Tz;

use lovens_core::error::LvResult;
use lovens_models::{Granularity, StatisticsBin};

use crate::client::LovensClient;
use crate::dates::{DateBound, TimeWindow};

impl LovensClient {
    /// Ride statistics of a bike, binned by `granularity` in the subject
    /// timezone.
    ///
    /// The server treats a timestamp end as inclusive: an end that falls
    /// exactly on a bin start yields one more, empty, bin. Bins are returned
    /// as the server sends them.
    pub async fn get_statistics(
        &self,
        bike_id: i64,
        start: impl Into<DateBound>,
        end: impl Into<DateBound>,
        granularity: Granularity,
    ) -> LvResult<Vec<StatisticsBin>> {
        let tz = self.timezone()?;
        self.get_statistics_in(bike_id, start, end, granularity, tz)
            .await
    }

    /// Like `get_statistics`, but bins (and reads naive bounds) in `tz`.
    pub async fn get_statistics_in(
        &self,
        bike_id: i64,
        start: impl Into<DateBound>,
        end: impl Into<DateBound>,
        granularity: Granularity,
        tz: Tz,
    ) -> LvResult<Vec<StatisticsBin>> {
        let window = TimeWindow::normalize(start, end, tz)?;
        let [from, till] = window.query_pairs();
        let query = [
            from,
            till,
            ("type", granularity.as_str().to_string()),
            ("tz", tz.name().to_string()),
        ];
        let value = self
            .get(&format!("/bike/{bike_id}/stats"), &query)
            .await?;
        StatisticsBin::from_server_list(&value, tz)
    }
}
