//! STAR Core
//!
//! Business services for the barbershop, billiards hall and car wash, on
//! top of the shared record store.

mod barbershop;
mod billiards;
mod business;
mod carwash;
mod clock;
mod config;
mod error;
mod seeder;
mod summary;
mod users;

pub use barbershop::{Barbershop, BookingRequest};
pub use billiards::{Billiards, CartLine};
pub use business::Business;
pub use carwash::{CarWash, CheckInRequest};
pub use clock::{current_time, today};
pub use config::{Config, DATABASE_PATH_ENV};
pub use error::CoreError;
pub use seeder::{seed_catalog, starter_catalog};
pub use summary::{daily_summary, DailySummary};
pub use users::{NewUser, UserDirectory};

// Re-export the layers below
pub use star_records::*;
pub use star_storage::{Collection, ImportSummary, StorageError, Store, StoreLocation};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging at `info`, unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Initialize logging with `default_directive` used when `RUST_LOG` is unset.
pub fn init_logging_with_default(default_directive: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt().with_env_filter(filter).with_target(true).init();
}
