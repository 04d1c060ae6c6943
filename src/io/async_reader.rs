//! Asynchronous CSV reader for transaction request files
//!
//! Provides batch reading over `client,amount,kind,description` rows.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - futures' `AsyncRead`, so tokio files plug in through `tokio_util::compat`
//!
//! Rows are only deserialized here. Checking kind, description and amount
//! is the validator's job, so a row with kind `x` is still returned.

use crate::types::TransactionRequest;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Memory use is bounded by the batch size, not the file size.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    malformed: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            malformed: 0,
        }
    }

    /// Read up to `batch_size` requests
    ///
    /// Rows that fail to deserialize are logged, counted and skipped.
    /// Returns an empty vector at end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<TransactionRequest> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<TransactionRequest>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(request)) => batch.push(request),
                Some(Err(e)) => {
                    self.malformed += 1;
                    warn!(error = %e, "skipping malformed request row");
                }
                None => break,
            }
        }

        batch
    }

    /// Number of rows skipped so far
    pub fn malformed(&self) -> usize {
        self.malformed
    }
}
