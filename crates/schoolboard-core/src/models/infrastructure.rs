use serde::{Deserialize, Serialize};

/// Facility counts shown on the dashboard's infrastructure panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct InfrastructureStats {
    #[serde(default)]
    pub classrooms: u32,
    #[serde(alias = "smartClassrooms", default)]
    pub smart_classrooms: u32,
    #[serde(alias = "labs", default)]
    pub laboratories: u32,
    #[serde(default)]
    pub libraries: u32,
    #[serde(alias = "sportsFacilities", default)]
    pub sports_facilities: u32,
    #[serde(default)]
    pub computers: u32,
}

impl InfrastructureStats {
    pub fn total_rooms(&self) -> u32 {
        self.classrooms + self.laboratories + self.libraries
    }
}
