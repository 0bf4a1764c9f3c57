//! Car-wash vehicles
//!
//! A visit lives in `vehicles` while in process and is moved, never
//! copied, into `completed_vehicles` on delivery.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use star_storage::{Collection, Record};

use crate::service::ServicePrice;

pub const EMPLOYEES: &[&str] = &["Juan", "Pedro", "María", "Luis"];

pub const WASH_SERVICES: &[ServicePrice] = &[
    ServicePrice::new("Lavado Simple", 300.0),
    ServicePrice::new("Lavado Completo", 500.0),
    ServicePrice::new("Lavado Premium", 800.0),
    ServicePrice::new("Lavado Motor", 150.0),
    ServicePrice::new("Encerado", 400.0),
    ServicePrice::new("Interior", 350.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleKind {
    Carro,
    Jeepeta,
    Motor,
    #[serde(rename = "Camión")]
    Camion,
}

impl VehicleKind {
    pub const ALL: [VehicleKind; 4] = [
        VehicleKind::Carro,
        VehicleKind::Jeepeta,
        VehicleKind::Motor,
        VehicleKind::Camion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleKind::Carro => "Carro",
            VehicleKind::Jeepeta => "Jeepeta",
            VehicleKind::Motor => "Motor",
            VehicleKind::Camion => "Camión",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleStatus {
    #[default]
    #[serde(rename = "en_proceso")]
    InProcess,
    #[serde(rename = "completado")]
    Completed,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::InProcess => "en_proceso",
            VehicleStatus::Completed => "completado",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Always uppercase
    #[serde(rename = "placa")]
    pub plate: String,
    #[serde(rename = "tipo")]
    pub kind: VehicleKind,
    #[serde(rename = "servicio")]
    pub service: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "empleado")]
    pub employee: String,
    #[serde(rename = "estado")]
    pub status: VehicleStatus,
    /// `HH:MM`
    #[serde(rename = "hora_entrada")]
    pub entry_time: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Vehicle {
    pub fn normalize_plate(plate: &str) -> String {
        plate.trim().to_uppercase()
    }

    pub fn check_in(
        plate: &str,
        kind: VehicleKind,
        service: &ServicePrice,
        employee: String,
        notes: Option<String>,
        date: NaiveDate,
        entry_time: String,
    ) -> Self {
        Self {
            id: None,
            plate: Self::normalize_plate(plate),
            kind,
            service: service.name.to_string(),
            price: service.price,
            employee,
            status: VehicleStatus::InProcess,
            entry_time,
            date,
            notes: notes.filter(|n| !n.trim().is_empty()),
        }
    }

    /// Turn this visit into its delivered form. The result has no key yet;
    /// it gets one when stored in `completed_vehicles`.
    pub fn complete(self, exit_time: String) -> CompletedVehicle {
        CompletedVehicle {
            vehicle: Vehicle {
                id: None,
                status: VehicleStatus::Completed,
                ..self
            },
            exit_time,
        }
    }
}

impl Record for Vehicle {
    const COLLECTION: Collection = Collection::Vehicles;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedVehicle {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    /// `HH:MM`
    #[serde(rename = "hora_salida")]
    pub exit_time: String,
}

impl Record for CompletedVehicle {
    const COLLECTION: Collection = Collection::CompletedVehicles;

    fn id(&self) -> Option<i64> {
        self.vehicle.id
    }

    fn set_id(&mut self, id: i64) {
        self.vehicle.id = Some(id);
    }
}
