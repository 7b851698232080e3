use std::{fs, path::Path, str::FromStr};

use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{BookingRecord, BookingRequest, BookingRow, BookingStatus};

const BOOKING_COLUMNS: &str = "id, service, property_type, property_size, area, date, time, frequency, \
     staff_count, name, email, phone, address, city, postal_code, special_instructions, \
     estimated_price, status, created_at";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("booking not found")]
    NotFound,
    #[error("cannot move a {from} booking to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("booking was changed by another request")]
    Conflict,
    #[error("that time is already booked")]
    SlotTaken,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = if let Some(path) = db_url.strip_prefix("sqlite://") {
        Some(path)
    } else if let Some(path) = db_url.strip_prefix("sqlite:") {
        Some(path)
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    let db_path = Path::new(path);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Opens the pool and brings the schema up to date.
pub async fn connect(db_url: &str) -> Result<SqlitePool, Box<dyn std::error::Error>> {
    ensure_sqlite_dir(db_url)?;
    let connect_options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Booking persistence over the `bookings` table.
#[derive(Clone)]
pub struct BookingStore {
    pool: SqlitePool,
}

impl BookingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Times already taken on `date`, as stored (`HH:MM`).
    pub async fn query_booked_times(&self, date: &str) -> Result<Vec<String>, StoreError> {
        let times = sqlx::query_scalar::<_, String>("SELECT time FROM bookings WHERE date = ?")
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(times)
    }

    pub async fn is_slot_taken(&self, date: &str, time: &str) -> Result<bool, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE date = ? AND time = ?",
        )
        .bind(date)
        .bind(time)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Persists a new booking as pending and returns its id.
    pub async fn create_booking(&self, request: &BookingRequest) -> Result<String, StoreError> {
        let id = new_id();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO bookings
               (id, service, property_type, property_size, area, date, time, frequency,
                staff_count, name, email, phone, address, city, postal_code,
                special_instructions, estimated_price, status, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&request.service_id)
        .bind(&request.property_type)
        .bind(&request.size)
        .bind(request.area.map(|area| area.to_string()))
        .bind(&request.date)
        .bind(&request.time)
        .bind(&request.frequency)
        .bind(i64::from(request.staff_count))
        .bind(&request.contact.name)
        .bind(&request.contact.email)
        .bind(&request.contact.phone)
        .bind(&request.contact.address)
        .bind(&request.contact.city)
        .bind(&request.contact.postal_code)
        .bind(&request.special_instructions)
        .bind(request.estimated_price)
        .bind(BookingStatus::Pending.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            let duplicate = err
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation());
            if duplicate {
                StoreError::SlotTaken
            } else {
                StoreError::Database(err)
            }
        })?;

        Ok(id)
    }

    /// All bookings, or only those in `status`, by date then time.
    pub async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<BookingRecord>, StoreError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY date ASC, time ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        // Status is filtered after decoding so unknown stored values count as pending.
        Ok(rows
            .into_iter()
            .map(BookingRecord::from)
            .filter(|record| status.map_or(true, |wanted| record.status == wanted))
            .collect())
    }

    /// Moves a booking along the status machine.
    ///
    /// The update is conditional on the status read beforehand, so two admins
    /// acting on the same row cannot both succeed.
    pub async fn update_booking_status(
        &self,
        id: &str,
        next: BookingStatus,
    ) -> Result<BookingStatus, StoreError> {
        let stored = sqlx::query_scalar::<_, String>("SELECT status FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        let current = BookingStatus::from_stored(&stored);
        if !current.can_transition_to(next) {
            return Err(StoreError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ? AND status = ?")
            .bind(next.as_str())
            .bind(id)
            .bind(&stored)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict);
        }
        Ok(current)
    }

    pub async fn status_counts(&self) -> Result<Vec<(BookingStatus, usize)>, StoreError> {
        let stored = sqlx::query_scalar::<_, String>("SELECT status FROM bookings")
            .fetch_all(&self.pool)
            .await?;
        Ok(BookingStatus::ALL
            .into_iter()
            .map(|status| {
                let count = stored
                    .iter()
                    .filter(|value| BookingStatus::from_stored(value) == status)
                    .count();
                (status, count)
            })
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::ContactDetails;

    impl BookingStore {
        pub(crate) async fn fetch_booking(&self, id: &str) -> Result<Option<BookingRecord>, StoreError> {
            let row = sqlx::query_as::<_, BookingRow>(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ? LIMIT 1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row.map(BookingRecord::from))
        }
    }

    pub(crate) async fn memory_store() -> BookingStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        BookingStore::new(pool)
    }

    pub(crate) fn request(date: &str, time: &str) -> BookingRequest {
        BookingRequest {
            service_id: "residential-standard".into(),
            property_type: "house".into(),
            size: "medium".into(),
            area: None,
            date: date.into(),
            time: time.into(),
            frequency: "one-time".into(),
            staff_count: 1,
            contact: ContactDetails {
                name: "Jane Doe".into(),
                email: "jane@example.com".into(),
                phone: "613-555-1234".into(),
                address: "123 Main St".into(),
                city: "Ottawa".into(),
                postal_code: "K1A 0B1".into(),
            },
            special_instructions: None,
            estimated_price: Some(160),
        }
    }

    #[actix_web::test]
    async fn created_booking_starts_pending() {
        let store = memory_store().await;
        let id = store.create_booking(&request("2026-11-02", "10:00")).await.unwrap();

        let record = store.fetch_booking(&id).await.unwrap().unwrap();
        assert_eq!(record.status, BookingStatus::Pending);
        assert_eq!(record.request, request("2026-11-02", "10:00"));
        assert!(!record.created_at.is_empty());
    }

    #[actix_web::test]
    async fn booked_times_are_per_date() {
        let store = memory_store().await;
        store.create_booking(&request("2026-11-02", "09:00")).await.unwrap();
        store.create_booking(&request("2026-11-02", "13:00")).await.unwrap();
        store.create_booking(&request("2026-11-03", "11:00")).await.unwrap();

        let mut times = store.query_booked_times("2026-11-02").await.unwrap();
        times.sort();
        assert_eq!(times, ["09:00", "13:00"]);
        assert!(store.query_booked_times("2026-11-05").await.unwrap().is_empty());
        assert!(store.is_slot_taken("2026-11-03", "11:00").await.unwrap());
        assert!(!store.is_slot_taken("2026-11-03", "12:00").await.unwrap());
    }

    #[actix_web::test]
    async fn area_priced_booking_keeps_its_area() {
        let store = memory_store().await;
        let warehouse = BookingRequest {
            service_id: "industrial-warehouse".into(),
            property_type: "warehouse".into(),
            area: Some(Decimal::from(2000)),
            estimated_price: Some(1000),
            ..request("2026-11-02", "14:00")
        };
        let id = store.create_booking(&warehouse).await.unwrap();

        let record = store.fetch_booking(&id).await.unwrap().unwrap();
        assert_eq!(record.request.area, Some(Decimal::from(2000)));
        assert_eq!(record.request, warehouse);
    }

    #[actix_web::test]
    async fn double_booking_a_slot_is_refused() {
        let store = memory_store().await;
        store.create_booking(&request("2026-11-02", "10:00")).await.unwrap();
        let err = store
            .create_booking(&request("2026-11-02", "10:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SlotTaken));
        assert_eq!(store.list_bookings(None).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn list_is_ordered_by_date_then_time() {
        let store = memory_store().await;
        store.create_booking(&request("2026-11-03", "09:00")).await.unwrap();
        store.create_booking(&request("2026-11-02", "15:00")).await.unwrap();
        store.create_booking(&request("2026-11-02", "10:00")).await.unwrap();

        let order: Vec<_> = store
            .list_bookings(None)
            .await
            .unwrap()
            .into_iter()
            .map(|record| (record.request.date, record.request.time))
            .collect();
        assert_eq!(
            order,
            [
                ("2026-11-02".to_string(), "10:00".to_string()),
                ("2026-11-02".to_string(), "15:00".to_string()),
                ("2026-11-03".to_string(), "09:00".to_string()),
            ]
        );
    }

    #[actix_web::test]
    async fn status_walks_the_machine() {
        let store = memory_store().await;
        let id = store.create_booking(&request("2026-11-02", "10:00")).await.unwrap();

        let previous = store
            .update_booking_status(&id, BookingStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(previous, BookingStatus::Pending);
        store
            .update_booking_status(&id, BookingStatus::Completed)
            .await
            .unwrap();

        let err = store
            .update_booking_status(&id, BookingStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidTransition {
                from: BookingStatus::Completed,
                to: BookingStatus::Cancelled
            }
        ));
    }

    #[actix_web::test]
    async fn cancelled_is_terminal() {
        let store = memory_store().await;
        let id = store.create_booking(&request("2026-11-02", "10:00")).await.unwrap();
        store
            .update_booking_status(&id, BookingStatus::Cancelled)
            .await
            .unwrap();

        for next in BookingStatus::ALL {
            assert!(store.update_booking_status(&id, next).await.is_err());
        }
        let record = store.fetch_booking(&id).await.unwrap().unwrap();
        assert_eq!(record.status, BookingStatus::Cancelled);
    }

    #[actix_web::test]
    async fn unknown_booking_is_not_found() {
        let store = memory_store().await;
        let err = store
            .update_booking_status("missing", BookingStatus::Confirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[actix_web::test]
    async fn filter_and_counts_agree() {
        let store = memory_store().await;
        let first = store.create_booking(&request("2026-11-02", "10:00")).await.unwrap();
        store.create_booking(&request("2026-11-02", "11:00")).await.unwrap();
        store
            .update_booking_status(&first, BookingStatus::Confirmed)
            .await
            .unwrap();

        let confirmed = store.list_bookings(Some(BookingStatus::Confirmed)).await.unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].id, first);

        let counts = store.status_counts().await.unwrap();
        assert_eq!(
            counts,
            [
                (BookingStatus::Pending, 1),
                (BookingStatus::Confirmed, 1),
                (BookingStatus::Completed, 0),
                (BookingStatus::Cancelled, 0),
            ]
        );
    }
}
