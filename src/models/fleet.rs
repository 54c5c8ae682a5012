//! Fleet dashboard types

use serde::Serialize;
use utoipa::ToSchema;

use crate::status::ChannelStatus;

/// Dashboard entry for one active vehicle, with independent severity
/// channels for the tractor and its assigned trailer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FleetStatusEntry {
    pub vehicle_id: i32,
    pub plate: String,
    pub trailer_id: Option<i32>,
    pub trailer_plate: Option<String>,
    pub vehicle: ChannelStatus,
    /// Absent when no trailer is assigned
    pub trailer: Option<ChannelStatus>,
}
