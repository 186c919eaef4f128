//! Lazy ride pagination.
//!
//! The ride endpoint pages by `limit`/`offset`. `RideIterator` keeps the
//! offset on the client side and fetches one batch at a time, only when the
//! caller asks for more than it has buffered. The sequence ends once the
//! offset reaches the server's reported total. Without a total, a batch
//! shorter than the batch size, or an empty one, ends it.

use std::collections::VecDeque;

use futures::stream::{self, Stream};
use tracing::debug;

use lovens_core::error::{LvError, LvResult};
use lovens_models::Ride;

use crate::client::LovensClient;

/// Restartable lazy sequence over the rides of one bike.
pub struct RideIterator<'a> {
    client: &'a LovensClient,
    bike_id: i64,
    newest_first: bool,
    batch_size: u32,
    offset: u64,
    buffer: VecDeque<Ride>,
    exhausted: bool,
    batches_fetched: usize,
}

impl<'a> RideIterator<'a> {
    pub(crate) fn new(
        client: &'a LovensClient,
        bike_id: i64,
        newest_first: bool,
        batch_size: u32,
    ) -> LvResult<Self> {
        if batch_size == 0 {
            return Err(LvError::InvalidArgument("batch size must be positive".into()));
        }
        Ok(Self {
            client,
            bike_id,
            newest_first,
            batch_size,
            offset: 0,
            buffer: VecDeque::new(),
            exhausted: false,
            batches_fetched: 0,
        })
    }

    /// Offset of the next batch to fetch.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of requests made so far.
    pub fn batches_fetched(&self) -> usize {
        self.batches_fetched
    }

    /// Start over from the first ride. The next pull fetches again.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.buffer.clear();
        self.exhausted = false;
        self.batches_fetched = 0;
    }

    /// Next ride, fetching a batch if the buffer is empty.
    ///
    /// `Ok(None)` marks the end. An error ends the iteration too: every later
    /// call returns `Ok(None)` until `reset`.
    pub async fn try_next(&mut self) -> LvResult<Option<Ride>> {
        if self.buffer.is_empty() {
            self.fill().await?;
        }
        Ok(self.buffer.pop_front())
    }

    /// Remaining rides of the current batch, or the next batch.
    pub async fn next_batch(&mut self) -> LvResult<Option<Vec<Ride>>> {
        if self.buffer.is_empty() {
            self.fill().await?;
        }
        if self.buffer.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.buffer.drain(..).collect()))
    }

    async fn fill(&mut self) -> LvResult<()> {
        if self.exhausted {
            return Ok(());
        }
        let result = self
            .client
            .fetch_rides_batch(self.bike_id, self.newest_first, self.batch_size, self.offset)
            .await;
        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.exhausted = true;
                return Err(e);
            }
        };

        self.batches_fetched += 1;
        let received = page.rides.len();
        debug!(
            "bike {}: fetched {received} rides at offset {}",
            self.bike_id, self.offset
        );
        self.offset += received as u64;
        let reached_total = page
            .total_records
            .is_some_and(|total| self.offset >= total.max(0) as u64);
        if reached_total || received < self.batch_size as usize {
            self.exhausted = true;
        }
        self.buffer.extend(page.rides);
        Ok(())
    }

    /// Adapt into an async `Stream` of rides. The stream ends after the
    /// first error.
    pub fn into_stream(self) -> impl Stream<Item = LvResult<Ride>> + 'a {
        stream::unfold(self, |mut rides| async move {
            match rides.try_next().await {
                Ok(Some(ride)) => Some((Ok(ride), rides)),
                Ok(None) => None,
                Err(e) => Some((Err(e), rides)),
            }
        })
    }
}
