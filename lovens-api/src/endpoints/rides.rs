//! Ride endpoints.

use lovens_core::constants::DEFAULT_RIDE_BATCH_SIZE;
use lovens_core::error::{LvError, LvResult};
use lovens_models::{Ride, RidePage};

use crate::client::LovensClient;
use crate::pagination::RideIterator;

/// Value of the `order[]` query parameter.
fn ride_order(newest_first: bool) -> &'static str {
    if newest_first {
        "start_date;desc"
    } else {
        "start_date;asc"
    }
}

impl LovensClient {
    /// Fetch one page of rides starting at `offset`.
    pub async fn fetch_rides_batch(
        &self,
        bike_id: i64,
        newest_first: bool,
        limit: u32,
        offset: u64,
    ) -> LvResult<RidePage> {
        let tz = self.timezone()?;
        let query = [
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
            ("order[]", ride_order(newest_first).to_string()),
        ];
        let value = self
            .get(&format!("/v2/bike/{bike_id}/ride"), &query)
            .await?;
        RidePage::from_server_map(&value, tz)
    }

    /// The first `n` rides of a bike in one request.
    pub async fn get_rides(&self, bike_id: i64, newest_first: bool, n: u32) -> LvResult<Vec<Ride>> {
        if n == 0 {
            return Err(LvError::InvalidArgument("ride count must be positive".into()));
        }
        let page = self.fetch_rides_batch(bike_id, newest_first, n, 0).await?;
        Ok(page.rides)
    }

    /// A single ride.
    pub async fn get_ride(&self, ride_id: i64) -> LvResult<Ride> {
        let tz = self.timezone()?;
        let value = self.get(&format!("/v2/ride/{ride_id}"), &[]).await?;
        let ride = match value.get("data") {
            Some(data) if data.is_object() => data,
            _ => &value,
        };
        Ride::from_server_map(ride, tz)
    }

    /// Lazily walk all rides of a bike, `batch_size` rides per request.
    pub fn iterate_rides(
        &self,
        bike_id: i64,
        newest_first: bool,
        batch_size: u32,
    ) -> LvResult<RideIterator<'_>> {
        RideIterator::new(self, bike_id, newest_first, batch_size)
    }

    /// `iterate_rides` with the default batch size of 50.
    pub fn rides(&self, bike_id: i64, newest_first: bool) -> LvResult<RideIterator<'_>> {
        self.iterate_rides(bike_id, newest_first, DEFAULT_RIDE_BATCH_SIZE)
    }
}
