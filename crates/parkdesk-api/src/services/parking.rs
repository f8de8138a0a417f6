// Gate-side parking transactions (`/parking-transactions`).

use chrono::NaiveDate;
use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{
    DirectEntryRequest, DirectExitRequest, FeeQuoteDto, ParkingStatsDto, ParkingTransactionDto,
};

const ROOT: &str = "parking-transactions";

impl Client {
    /// `GET /parking-transactions`
    pub async fn list_parking_transactions(&self) -> Result<Vec<ParkingTransactionDto>, Error> {
        let url = self.endpoint(&[ROOT])?;
        self.get(url).await
    }

    /// Record a vehicle entering without a ticket scan.
    ///
    /// `POST /parking-transactions/direct-entry`
    pub async fn direct_entry(
        &self,
        body: &DirectEntryRequest,
    ) -> Result<ParkingTransactionDto, Error> {
        debug!(plate = %body.plate, "direct entry");
        let url = self.endpoint(&[ROOT, "direct-entry"])?;
        self.post(url, body).await
    }

    /// `POST /parking-transactions/direct-exit`
    pub async fn direct_exit(
        &self,
        body: &DirectExitRequest,
    ) -> Result<ParkingTransactionDto, Error> {
        debug!(plate = %body.plate, "direct exit");
        let url = self.endpoint(&[ROOT, "direct-exit"])?;
        self.post(url, body).await
    }

    /// Fee owed if the vehicle left now.
    ///
    /// `GET /parking-transactions/:id/calculate-fee`
    pub async fn calculate_fee(&self, id: &str) -> Result<FeeQuoteDto, Error> {
        let url = self.endpoint(&[ROOT, id, "calculate-fee"])?;
        self.get(url).await
    }

    /// Aggregate counts and revenue, optionally bounded by date.
    ///
    /// `GET /parking-transactions/statistics?from=&to=`
    pub async fn parking_statistics(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<ParkingStatsDto, Error> {
        let url = self.endpoint(&[ROOT, "statistics"])?;
        let mut params = Vec::new();
        if let Some(from) = from {
            params.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = to {
            params.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        self.get_with_params(url, &params).await
    }
}
