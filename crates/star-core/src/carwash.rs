//! Car wash: check-in and delivery

use chrono::NaiveDate;

use star_records::{
    find_service, CompletedVehicle, ServicePrice, Vehicle, VehicleKind, VehicleStatus,
    WASH_SERVICES,
};
use star_storage::Store;

use crate::clock;
use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone)]
pub struct CheckInRequest {
    pub plate: String,
    pub kind: VehicleKind,
    pub service: String,
    pub employee: String,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct CarWash {
    store: Store,
}

impl CarWash {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn services(&self) -> &'static [ServicePrice] {
        WASH_SERVICES
    }

    /// Register a vehicle as in process, dated now.
    pub async fn check_in(&self, request: CheckInRequest) -> Result<Vehicle> {
        if request.plate.trim().is_empty() {
            return Err(CoreError::InvalidInput("plate is required".to_string()));
        }
        let service = find_service(WASH_SERVICES, &request.service)
            .ok_or_else(|| CoreError::UnknownService(request.service.clone()))?;

        let vehicle = Vehicle::check_in(
            &request.plate,
            request.kind,
            service,
            request.employee,
            request.notes,
            clock::today(),
            clock::current_time(),
        );
        let vehicle = self.store.insert(vehicle).await?;

        tracing::info!(
            vehicle_id = ?vehicle.id,
            plate = %vehicle.plate,
            service = %vehicle.service,
            "Vehicle checked in"
        );

        Ok(vehicle)
    }

    pub async fn get(&self, id: i64) -> Result<Vehicle> {
        self.store
            .read_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { kind: "Vehicle", id })
    }

    /// Deliver a vehicle: in one store transaction, write it to the
    /// completed collection and drop it from the in-process one. A vehicle
    /// already delivered is `NotFound`.
    pub async fn complete(&self, id: i64) -> Result<CompletedVehicle> {
        let exit_time = clock::current_time();

        let completed = self
            .store
            .transaction(move |tx| -> Result<CompletedVehicle> {
                let vehicle: Vehicle = tx
                    .read_by_id(id)?
                    .ok_or(CoreError::NotFound { kind: "Vehicle", id })?;
                let completed = tx.insert(vehicle.complete(exit_time))?;
                tx.delete::<Vehicle>(id)?;
                Ok(completed)
            })
            .await?;

        tracing::info!(
            vehicle_id = id,
            completed_id = ?completed.vehicle.id,
            plate = %completed.vehicle.plate,
            "Vehicle delivered"
        );

        Ok(completed)
    }

    pub async fn remove(&self, id: i64) -> Result<()> {
        self.store.delete::<Vehicle>(id).await?;
        Ok(())
    }

    pub async fn in_process(&self) -> Result<Vec<Vehicle>> {
        Ok(self
            .store
            .find_by_index("estado", VehicleStatus::InProcess.as_str())
            .await?)
    }

    pub async fn completed(&self) -> Result<Vec<CompletedVehicle>> {
        Ok(self.store.read_all().await?)
    }

    pub async fn completed_on(&self, date: NaiveDate) -> Result<Vec<CompletedVehicle>> {
        Ok(self.store.find_by_index("fecha", date.to_string()).await?)
    }

    /// In-process vehicles with this plate, in any letter case.
    pub async fn find_by_plate(&self, plate: &str) -> Result<Vec<Vehicle>> {
        Ok(self
            .store
            .find_by_index("placa", Vehicle::normalize_plate(plate))
            .await?)
    }
}
