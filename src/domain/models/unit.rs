//! Domain model for a unit.
//!
//! Units are owned by the surrounding CRM; this core only references them as
//! allocation and scheduling targets and reads their address for display.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub building_id: String,
    pub address: String,
}
