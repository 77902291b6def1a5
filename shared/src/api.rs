use crate::store::HistoryEntry;
use crate::wheel::WheelOption;
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_ENDPOINT: &str = "/api/snapshot";
pub const FOODS_ENDPOINT: &str = "/api/foods";
pub const HISTORY_ENDPOINT: &str = "/api/history";
pub const HEALTH_ENDPOINT: &str = "/api/health_check";

/// Everything a client needs to redraw. `revision` changes whenever either collection does.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub revision: u64,
    pub foods: Vec<WheelOption>,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewOptionRequest {
    pub label: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorResponse {
    pub error: String,
}
