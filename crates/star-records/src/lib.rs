//! STAR Records
//!
//! One type per collection. Field names on the wire are the ones the
//! store indexes and the backup format carries (`cliente`, `placa`, ...).

mod appointment;
mod product;
mod sale;
mod service;
mod user;
mod vehicle;

pub use appointment::{Appointment, AppointmentStatus, BARBERS, BARBER_SERVICES};
pub use product::Product;
pub use sale::{round_cents, PaymentMethod, Sale, SaleLine, DEFAULT_TAX_RATE};
pub use service::{find_service, ServicePrice};
pub use user::{Role, User};
pub use vehicle::{
    CompletedVehicle, Vehicle, VehicleKind, VehicleStatus, EMPLOYEES, WASH_SERVICES,
};
