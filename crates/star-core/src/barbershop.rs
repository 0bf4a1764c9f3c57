//! Barbershop appointments

use chrono::NaiveDate;

use star_records::{find_service, Appointment, AppointmentStatus, ServicePrice, BARBER_SERVICES};
use star_storage::Store;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub client: String,
    pub phone: String,
    pub barber: String,
    /// Must name an entry of the price list
    pub service: String,
    pub date: NaiveDate,
    /// `HH:MM`
    pub time: String,
}

#[derive(Clone)]
pub struct Barbershop {
    store: Store,
}

impl Barbershop {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn services(&self) -> &'static [ServicePrice] {
        BARBER_SERVICES
    }

    /// Book a pending appointment, pricing it from the service list.
    pub async fn book(&self, request: BookingRequest) -> Result<Appointment> {
        if request.client.trim().is_empty() {
            return Err(CoreError::InvalidInput("client name is required".to_string()));
        }
        if request.barber.trim().is_empty() {
            return Err(CoreError::InvalidInput("barber is required".to_string()));
        }
        let service = find_service(BARBER_SERVICES, &request.service)
            .ok_or_else(|| CoreError::UnknownService(request.service.clone()))?;

        let appointment = Appointment::book(
            request.client.trim().to_string(),
            request.phone.trim().to_string(),
            request.barber,
            service,
            request.date,
            request.time,
        );
        let appointment = self.store.insert(appointment).await?;

        tracing::info!(
            appointment_id = ?appointment.id,
            barber = %appointment.barber,
            date = %appointment.date,
            "Booked appointment"
        );

        Ok(appointment)
    }

    pub async fn get(&self, id: i64) -> Result<Appointment> {
        self.store
            .read_by_id(id)
            .await?
            .ok_or(CoreError::NotFound {
                kind: "Appointment",
                id,
            })
    }

    pub async fn set_status(&self, id: i64, status: AppointmentStatus) -> Result<Appointment> {
        let mut appointment = self.get(id).await?;
        appointment.status = status;
        self.store.update(&appointment).await?;

        tracing::info!(appointment_id = id, status = %status, "Appointment status changed");
        Ok(appointment)
    }

    pub async fn complete(&self, id: i64) -> Result<Appointment> {
        self.set_status(id, AppointmentStatus::Completed).await
    }

    pub async fn cancel(&self, id: i64) -> Result<Appointment> {
        self.set_status(id, AppointmentStatus::Cancelled).await
    }

    pub async fn remove(&self, id: i64) -> Result<()> {
        self.store.delete::<Appointment>(id).await?;
        Ok(())
    }

    /// All appointments, newest day first and by time within a day.
    pub async fn list(&self) -> Result<Vec<Appointment>> {
        let mut appointments: Vec<Appointment> = self.store.read_all().await?;
        appointments.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.time.cmp(&b.time)));
        Ok(appointments)
    }

    pub async fn on_date(&self, date: NaiveDate) -> Result<Vec<Appointment>> {
        let mut appointments: Vec<Appointment> = self
            .store
            .find_by_index("fecha", date.to_string())
            .await?;
        appointments.sort_by(|a, b| a.time.cmp(&b.time));
        Ok(appointments)
    }

    pub async fn pending_on(&self, date: NaiveDate) -> Result<Vec<Appointment>> {
        let mut appointments = self.on_date(date).await?;
        appointments.retain(Appointment::is_pending);
        Ok(appointments)
    }

    pub async fn by_barber(&self, barber: &str) -> Result<Vec<Appointment>> {
        Ok(self.store.find_by_index("barbero", barber).await?)
    }
}
