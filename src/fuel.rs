//! Fuel-type catalogue for the regional price provider.
//!
//! The provider identifies fuels by a small integer id. Four of them are
//! tracked in daily snapshots; [`Fuel`] enumerates those and carries the
//! snapshot column name. [`fuel_name`] covers the full catalogue for display
//! purposes, mapping unknown ids to `"Unknown"` rather than failing.

/// A fuel type tracked in daily price snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fuel {
    U91,
    Diesel,
    U95,
    U98,
}

impl Fuel {
    /// The tracked fuels, in snapshot column order.
    pub const TRACKED: [Fuel; 4] = [Fuel::U91, Fuel::U95, Fuel::U98, Fuel::Diesel];

    /// The provider's id for this fuel.
    pub fn id(self) -> u32 {
        match self {
            Fuel::U91 => 2,
            Fuel::Diesel => 3,
            Fuel::U95 => 5,
            Fuel::U98 => 8,
        }
    }

    /// Maps a provider fuel id back to a tracked fuel, if it is one.
    pub fn from_id(id: u32) -> Option<Fuel> {
        match id {
            2 => Some(Fuel::U91),
            3 => Some(Fuel::Diesel),
            5 => Some(Fuel::U95),
            8 => Some(Fuel::U98),
            _ => None,
        }
    }

    /// Snapshot column name in the record store.
    pub fn column(self) -> &'static str {
        match self {
            Fuel::U91 => "u91",
            Fuel::Diesel => "diesel",
            Fuel::U95 => "u95",
            Fuel::U98 => "u98",
        }
    }
}

/// Display name for any fuel id in the provider's catalogue.
pub fn fuel_name(fuel_id: u32) -> &'static str {
    match fuel_id {
        2 => "U91",
        3 => "Diesel",
        4 => "LPG",
        5 => "U95",
        6 => "ULSD",
        8 => "U98",
        11 => "LRP",
        12 => "E10",
        13 => "Premium e5",
        14 => "Premium Diesel",
        16 => "Bio-Diesel 20",
        19 => "e85",
        21 => "OPAL",
        22 => "Compressed natural gas",
        23 => "Liquefied natural gas",
        999 => "e10/Unleaded",
        1000 => "Diesel/Premium Diesel",
        _ => "Unknown",
    }
}
