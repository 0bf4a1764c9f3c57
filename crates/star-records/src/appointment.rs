//! Barbershop appointments

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use star_storage::{Collection, Record};

use crate::service::ServicePrice;

pub const BARBERS: &[&str] = &["Carlos", "Miguel", "José", "Pedro"];

pub const BARBER_SERVICES: &[ServicePrice] = &[
    ServicePrice::new("Corte Regular", 200.0),
    ServicePrice::new("Corte + Barba", 350.0),
    ServicePrice::new("Barba", 150.0),
    ServicePrice::new("Corte Niño", 150.0),
    ServicePrice::new("Cejas", 50.0),
    ServicePrice::new("Diseño", 250.0),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "completada")]
    Completed,
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pendiente",
            AppointmentStatus::Completed => "completada",
            AppointmentStatus::Cancelled => "cancelada",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pendiente" => Ok(AppointmentStatus::Pending),
            "completada" => Ok(AppointmentStatus::Completed),
            "cancelada" => Ok(AppointmentStatus::Cancelled),
            _ => Err(format!("Unknown appointment status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "cliente")]
    pub client: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "barbero")]
    pub barber: String,
    #[serde(rename = "servicio")]
    pub service: String,
    /// Frozen at booking time; later price-list changes do not apply.
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    /// `HH:MM`
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "estado", default)]
    pub status: AppointmentStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// A new, pending appointment for a service from the price list.
    pub fn book(
        client: String,
        phone: String,
        barber: String,
        service: &ServicePrice,
        date: NaiveDate,
        time: String,
    ) -> Self {
        Self {
            id: None,
            client,
            phone,
            barber,
            service: service.name.to_string(),
            price: service.price,
            date,
            time,
            status: AppointmentStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == AppointmentStatus::Pending
    }
}

impl Record for Appointment {
    const COLLECTION: Collection = Collection::Appointments;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::find_service;

    fn sample() -> Appointment {
        let service = find_service(BARBER_SERVICES, "Corte + Barba").unwrap();
        Appointment::book(
            "Ana".to_string(),
            "809-555-0101".to_string(),
            "Carlos".to_string(),
            service,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            "10:30".to_string(),
        )
    }

    #[test]
    fn test_booking_is_pending_with_list_price() {
        let appointment = sample();
        assert!(appointment.is_pending());
        assert_eq!(appointment.price, 350.0);
        assert!(appointment.id.is_none());
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["cliente"], "Ana");
        assert_eq!(value["barbero"], "Carlos");
        assert_eq!(value["fecha"], "2024-05-01");
        assert_eq!(value["estado"], "pendiente");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "cancelada".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::Cancelled
        );
        assert!("done".parse::<AppointmentStatus>().is_err());
    }
}
