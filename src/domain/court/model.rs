//! Court entity and the slot catalogue

use serde::{Deserialize, Serialize};

/// First bookable hour of the day
pub const FIRST_SLOT_HOUR: u32 = 8;

/// Number of hourly slots per day (08:00 .. 21:00)
pub const SLOTS_PER_DAY: u32 = 14;

/// A bookable court
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    pub id: String,
    pub name: String,
    pub is_active: bool,
}

impl Court {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_active: true,
        }
    }
}

/// The four courts every fresh installation starts with
pub fn default_courts() -> Vec<Court> {
    (1..=4)
        .map(|n| Court::new(format!("c{}", n), format!("Cancha {}", n)))
        .collect()
}

/// Start times of every 60-minute slot, formatted `HH:00`.
pub fn slot_times() -> Vec<String> {
    (0..SLOTS_PER_DAY)
        .map(|i| format!("{:02}:00", FIRST_SLOT_HOUR + i))
        .collect()
}

/// What a court looks like for a given (date, time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourtAvailability {
    Inactive,
    Maintenance,
    Occupied,
    Available,
}

impl CourtAvailability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "Inactive",
            Self::Maintenance => "Maintenance",
            Self::Occupied => "Occupied",
            Self::Available => "Available",
        }
    }
}

impl std::fmt::Display for CourtAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
