use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// Server-assigned record identifier. The service emits ids as JSON strings;
/// numeric ids are accepted and kept in their decimal form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl VehicleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for VehicleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Int(value) => Self(value.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VehicleKind {
    #[default]
    Car,
    Bike,
    Truck,
    Motorcycle,
}

impl VehicleKind {
    pub const ALL: [VehicleKind; 4] = [
        VehicleKind::Car,
        VehicleKind::Bike,
        VehicleKind::Truck,
        VehicleKind::Motorcycle,
    ];

    /// Canonical wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleKind::Car => "car",
            VehicleKind::Bike => "bike",
            VehicleKind::Truck => "truck",
            VehicleKind::Motorcycle => "motorcycle",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VehicleKind::Car => "Car",
            VehicleKind::Bike => "Bike",
            VehicleKind::Truck => "Truck",
            VehicleKind::Motorcycle => "Motorcycle",
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        VehicleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownVehicleKind(value.to_string()))
    }
}

pub const DEFAULT_CAR_DOORS: u32 = 4;
pub const DEFAULT_CAR_FUEL: &str = "Petrol";
pub const DEFAULT_BIKE_CATEGORY: &str = "Cruiser";
pub const DEFAULT_TRUCK_PAYLOAD: u32 = 0;
pub const DEFAULT_MOTORCYCLE_CC: u32 = 500;
pub const DEFAULT_MOTORCYCLE_CATEGORY: &str = "Sports";

/// Attributes that only exist for one vehicle type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleSpec {
    Car { doors: u32, fuel: String },
    Bike { sidecar: bool, category: String },
    Truck { payload: u32, trailer: bool },
    Motorcycle { cc: u32, category: String },
}

impl VehicleSpec {
    pub fn kind(&self) -> VehicleKind {
        match self {
            VehicleSpec::Car { .. } => VehicleKind::Car,
            VehicleSpec::Bike { .. } => VehicleKind::Bike,
            VehicleSpec::Truck { .. } => VehicleKind::Truck,
            VehicleSpec::Motorcycle { .. } => VehicleKind::Motorcycle,
        }
    }

    /// Field set shown when the type selector switches to `kind`.
    pub fn defaults_for(kind: VehicleKind) -> Self {
        match kind {
            VehicleKind::Car => VehicleSpec::Car {
                doors: DEFAULT_CAR_DOORS,
                fuel: DEFAULT_CAR_FUEL.to_string(),
            },
            VehicleKind::Bike => VehicleSpec::Bike {
                sidecar: false,
                category: DEFAULT_BIKE_CATEGORY.to_string(),
            },
            VehicleKind::Truck => VehicleSpec::Truck {
                payload: DEFAULT_TRUCK_PAYLOAD,
                trailer: false,
            },
            VehicleKind::Motorcycle => VehicleSpec::Motorcycle {
                cc: DEFAULT_MOTORCYCLE_CC,
                category: DEFAULT_MOTORCYCLE_CATEGORY.to_string(),
            },
        }
    }

    /// Form-encoded `(name, value)` pairs for this field set.
    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            VehicleSpec::Car { doors, fuel } => {
                vec![("doors", doors.to_string()), ("fuel", fuel.clone())]
            }
            VehicleSpec::Bike { sidecar, category } => vec![
                ("sidecar", sidecar.to_string()),
                ("category", category.clone()),
            ],
            VehicleSpec::Truck { payload, trailer } => vec![
                ("payload", payload.to_string()),
                ("trailer", trailer.to_string()),
            ],
            VehicleSpec::Motorcycle { cc, category } => {
                vec![("cc", cc.to_string()), ("category", category.clone())]
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VehicleRecord", into = "VehicleRecord")]
pub struct Vehicle {
    pub id: VehicleId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub details: Option<String>,
    pub spec: VehicleSpec,
}

impl Vehicle {
    pub fn kind(&self) -> VehicleKind {
        self.spec.kind()
    }
}

/// Flat JSON shape used on the wire. The `type` tag is matched
/// case-insensitively; the service answers with capitalized tags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleRecord {
    id: VehicleId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    brand: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    doors: Option<WholeNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fuel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sidecar: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<WholeNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trailer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cc: Option<WholeNumber>,
}

impl TryFrom<VehicleRecord> for Vehicle {
    type Error = DomainError;

    fn try_from(record: VehicleRecord) -> Result<Self, Self::Error> {
        let kind: VehicleKind = record.kind.parse()?;
        let missing = |field| DomainError::MissingField { kind, field };
        let spec = match kind {
            VehicleKind::Car => VehicleSpec::Car {
                doors: record.doors.ok_or_else(|| missing("doors"))?.0,
                fuel: record.fuel.ok_or_else(|| missing("fuel"))?,
            },
            VehicleKind::Bike => VehicleSpec::Bike {
                sidecar: record.sidecar.ok_or_else(|| missing("sidecar"))?,
                category: record.category.ok_or_else(|| missing("category"))?,
            },
            VehicleKind::Truck => VehicleSpec::Truck {
                payload: record.payload.ok_or_else(|| missing("payload"))?.0,
                trailer: record.trailer.ok_or_else(|| missing("trailer"))?,
            },
            VehicleKind::Motorcycle => VehicleSpec::Motorcycle {
                cc: record.cc.ok_or_else(|| missing("cc"))?.0,
                category: record.category.ok_or_else(|| missing("category"))?,
            },
        };

        Ok(Self {
            id: record.id,
            brand: record.brand,
            model: record.model,
            year: record.year,
            details: record.details,
            spec,
        })
    }
}

impl From<Vehicle> for VehicleRecord {
    fn from(vehicle: Vehicle) -> Self {
        let mut record = VehicleRecord {
            id: vehicle.id,
            kind: vehicle.spec.kind().as_str().to_string(),
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            details: vehicle.details,
            ..Default::default()
        };
        match vehicle.spec {
            VehicleSpec::Car { doors, fuel } => {
                record.doors = Some(WholeNumber(doors));
                record.fuel = Some(fuel);
            }
            VehicleSpec::Bike { sidecar, category } => {
                record.sidecar = Some(sidecar);
                record.category = Some(category);
            }
            VehicleSpec::Truck { payload, trailer } => {
                record.payload = Some(WholeNumber(payload));
                record.trailer = Some(trailer);
            }
            VehicleSpec::Motorcycle { cc, category } => {
                record.cc = Some(WholeNumber(cc));
                record.category = Some(category);
            }
        }
        record
    }
}

/// Unsigned integer that also decodes from JSON floats (truncated) and
/// numeric strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
struct WholeNumber(u32);

impl<'de> Deserialize<'de> for WholeNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawNumber {
            Int(u64),
            Float(f64),
            Text(String),
        }

        let value = match RawNumber::deserialize(deserializer)? {
            RawNumber::Int(value) => u32::try_from(value).map_err(D::Error::custom)?,
            RawNumber::Float(value) if value.is_finite() && value >= 0.0 && value <= u32::MAX as f64 => {
                value.trunc() as u32
            }
            RawNumber::Float(value) => {
                return Err(D::Error::custom(format!("{value} is not a whole number")))
            }
            RawNumber::Text(text) => text.trim().parse::<u32>().map_err(D::Error::custom)?,
        };
        Ok(Self(value))
    }
}
