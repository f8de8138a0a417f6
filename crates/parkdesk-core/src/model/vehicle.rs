use serde::{Deserialize, Serialize};

use super::id::RecordId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: RecordId,
    pub plate: String,
    pub vehicle_type_id: Option<RecordId>,
    pub vehicle_type_name: Option<String>,
    pub owner_id: Option<RecordId>,
    pub color: Option<String>,
}

/// Vehicle category with its tariff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleType {
    pub id: RecordId,
    pub name: String,
    pub monthly_price: Option<f64>,
    pub per_visit_price: Option<f64>,
}
