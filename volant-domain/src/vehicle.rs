use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub model: String,
    pub build_year: i32,
    pub category: VehicleCategory,
    /// Registration plate, unique per fleet.
    pub plate: String,
    /// Date the next periodic technical inspection is due.
    pub inspection_due: NaiveDate,
    pub price_per_hour_cents: i32,
    pub available: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Driving-school fleet split: dual-control cars for accompanied lessons,
/// classic cars for solo practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCategory {
    DualControl,
    Classic,
}

impl VehicleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::DualControl => "dual_control",
            VehicleCategory::Classic => "classic",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dual_control" => Ok(VehicleCategory::DualControl),
            "classic" => Ok(VehicleCategory::Classic),
            other => Err(format!("unknown vehicle category: {other}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVehicle {
    pub name: String,
    pub model: String,
    pub build_year: i32,
    pub category: VehicleCategory,
    pub plate: String,
    pub inspection_due: NaiveDate,
    #[serde(default = "default_price_per_hour_cents")]
    pub price_per_hour_cents: i32,
    pub image_url: Option<String>,
}

fn default_price_per_hour_cents() -> i32 {
    2000
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleUpdate {
    pub name: Option<String>,
    pub model: Option<String>,
    pub build_year: Option<i32>,
    pub category: Option<VehicleCategory>,
    pub plate: Option<String>,
    pub inspection_due: Option<NaiveDate>,
    pub price_per_hour_cents: Option<i32>,
    pub available: Option<bool>,
    pub image_url: Option<String>,
}
