//! Per-day activity across the three business areas

use chrono::NaiveDate;
use serde::Serialize;

use star_records::{round_cents, Appointment, CompletedVehicle, Sale, Vehicle};
use star_storage::Store;

use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub appointments: usize,
    pub sales: usize,
    /// Vehicles checked in that day, delivered or not. Counts both the
    /// in-process and completed collections, so it runs higher than the old
    /// dashboard figure, which counted in-process vehicles only.
    pub vehicles: usize,
    /// Sum of sale totals
    pub revenue: f64,
}

pub async fn daily_summary(store: &Store, date: NaiveDate) -> Result<DailySummary> {
    let day = date.to_string();

    let appointments: Vec<Appointment> = store.find_by_index("fecha", day.as_str()).await?;
    let sales: Vec<Sale> = store.find_by_index("fecha", day.as_str()).await?;
    let completed: Vec<CompletedVehicle> = store.find_by_index("fecha", day.as_str()).await?;
    let in_process = store
        .read_all::<Vehicle>()
        .await?
        .into_iter()
        .filter(|v| v.date == date)
        .count();

    let revenue = round_cents(sales.iter().map(|s| s.total).sum());

    Ok(DailySummary {
        date,
        appointments: appointments.len(),
        sales: sales.len(),
        vehicles: in_process + completed.len(),
        revenue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use star_records::{find_service, PaymentMethod, SaleLine, VehicleKind, WASH_SERVICES};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    fn sale(price: f64, date: NaiveDate) -> Sale {
        Sale::new(
            vec![SaleLine::new(1, "Cerveza", 1, price)],
            PaymentMethod::Cash,
            0.18,
            date,
            "20:00".to_string(),
        )
    }

    fn vehicle(plate: &str) -> Vehicle {
        Vehicle::check_in(
            plate,
            VehicleKind::Motor,
            find_service(WASH_SERVICES, "Lavado Motor").unwrap(),
            "Luis".to_string(),
            None,
            day(),
            "09:00".to_string(),
        )
    }

    #[tokio::test]
    async fn test_empty_day() {
        let summary = daily_summary(&Store::in_memory(), day()).await.unwrap();
        assert_eq!(summary.appointments, 0);
        assert_eq!(summary.sales, 0);
        assert_eq!(summary.vehicles, 0);
        assert_eq!(summary.revenue, 0.0);
    }

    #[tokio::test]
    async fn test_counts_only_the_requested_day() {
        let store = Store::in_memory();
        store.create(&sale(80.0, day())).await.unwrap();
        store.create(&sale(100.0, day())).await.unwrap();
        store
            .create(&sale(500.0, day().succ_opt().unwrap()))
            .await
            .unwrap();
        store.create(&vehicle("A1")).await.unwrap();
        store
            .create(&vehicle("B2").complete("10:00".to_string()))
            .await
            .unwrap();

        let summary = daily_summary(&store, day()).await.unwrap();
        assert_eq!(summary.sales, 2);
        assert_eq!(summary.revenue, 212.4);
        assert_eq!(summary.vehicles, 2);
        assert_eq!(summary.appointments, 0);
    }
}
