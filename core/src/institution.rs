use crate::types::Points;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
    pub name:             String,
    /// Target point total, fixed at load.
    pub quota:            Points,
    /// Sum of members' requests. Informational only.
    pub points_requested: Points,
    pub points_assigned:  Points,
}

impl Institution {
    pub fn new(name: String, quota: Points) -> Self {
        Self { name, quota, points_requested: 0, points_assigned: 0 }
    }

    /// quota − assigned. Positive while short of quota.
    pub fn deficit(&self) -> Points {
        self.quota - self.points_assigned
    }

    pub fn surplus(&self) -> Points {
        -self.deficit()
    }
}
