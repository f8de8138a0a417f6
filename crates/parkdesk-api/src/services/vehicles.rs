use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{VehicleDto, VehiclePayload, VehicleTypeDto, VehicleTypePayload};

impl Client {
    // ── Vehicles ─────────────────────────────────────────────────────

    /// `GET /vehicles`
    pub async fn list_vehicles(&self) -> Result<Vec<VehicleDto>, Error> {
        let url = self.endpoint(&["vehicles"])?;
        self.get(url).await
    }

    /// `GET /vehicles/:id`
    pub async fn get_vehicle(&self, id: &str) -> Result<VehicleDto, Error> {
        let url = self.endpoint(&["vehicles", id])?;
        self.get(url).await
    }

    /// `POST /vehicles`
    pub async fn create_vehicle(&self, body: &VehiclePayload) -> Result<VehicleDto, Error> {
        debug!(plate = ?body.plate, "creating vehicle");
        let url = self.endpoint(&["vehicles"])?;
        self.post(url, body).await
    }

    /// `PUT /vehicles/:id`
    pub async fn update_vehicle(&self, id: &str, body: &VehiclePayload) -> Result<VehicleDto, Error> {
        let url = self.endpoint(&["vehicles", id])?;
        self.put(url, body).await
    }

    /// `DELETE /vehicles/:id`
    pub async fn delete_vehicle(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting vehicle");
        let url = self.endpoint(&["vehicles", id])?;
        self.delete(url).await
    }

    // ── Vehicle types ────────────────────────────────────────────────

    /// `GET /vehicle-types`
    pub async fn list_vehicle_types(&self) -> Result<Vec<VehicleTypeDto>, Error> {
        let url = self.endpoint(&["vehicle-types"])?;
        self.get(url).await
    }

    /// `GET /vehicle-types/:id`
    pub async fn get_vehicle_type(&self, id: &str) -> Result<VehicleTypeDto, Error> {
        let url = self.endpoint(&["vehicle-types", id])?;
        self.get(url).await
    }

    /// `POST /vehicle-types`
    pub async fn create_vehicle_type(
        &self,
        body: &VehicleTypePayload,
    ) -> Result<VehicleTypeDto, Error> {
        debug!(name = ?body.name, "creating vehicle type");
        let url = self.endpoint(&["vehicle-types"])?;
        self.post(url, body).await
    }

    /// `PUT /vehicle-types/:id`
    pub async fn update_vehicle_type(
        &self,
        id: &str,
        body: &VehicleTypePayload,
    ) -> Result<VehicleTypeDto, Error> {
        let url = self.endpoint(&["vehicle-types", id])?;
        self.put(url, body).await
    }

    /// `DELETE /vehicle-types/:id`
    pub async fn delete_vehicle_type(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint(&["vehicle-types", id])?;
        self.delete(url).await
    }
}
