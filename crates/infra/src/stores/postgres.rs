//! Postgres-backed stores.
//!
//! The booking table carries the no-overlap invariant itself: a GiST
//! exclusion constraint over `(property_id, daterange(check_in, check_out))`
//! rejects the losing side of a check-then-act race at commit time, which the
//! store surfaces as [`StoreError::Conflict`].

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use staybook_bookings::{Booking, BookingStore, StayRange};
use staybook_core::{BookingId, Money, PropertyId, StoreError, UserId};
use staybook_listings::{Property, PropertyStore};

/// Create the tables and the overlap exclusion constraint if missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| StoreError::unavailable(format!("ensure_schema: {e}")))?;
    Ok(())
}

const SCHEMA: &str = r#"
CREATE EXTENSION IF NOT EXISTS btree_gist;

CREATE TABLE IF NOT EXISTS properties (
    id              UUID PRIMARY KEY,
    owner_id        UUID NOT NULL,
    title           TEXT NOT NULL,
    description     TEXT,
    location        TEXT,
    price_per_night BIGINT NOT NULL CHECK (price_per_night >= 0),
    is_active       BOOLEAN NOT NULL DEFAULT TRUE,
    created_at      TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS bookings (
    id          UUID PRIMARY KEY,
    property_id UUID NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    user_id     UUID NOT NULL,
    check_in    DATE NOT NULL,
    check_out   DATE NOT NULL,
    total_price BIGINT NOT NULL CHECK (total_price >= 0),
    created_at  TIMESTAMPTZ NOT NULL,
    CHECK (check_in < check_out),
    CONSTRAINT bookings_no_overlap EXCLUDE USING gist (
        property_id WITH =,
        daterange(check_in, check_out) WITH &&
    )
);
"#;

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        // 23P01 exclusion_violation, 23505 unique_violation
        match db.code().as_deref() {
            Some("23P01") => return StoreError::conflict("overlapping booking exists"),
            Some("23505") => return StoreError::conflict("duplicate id"),
            _ => {}
        }
    }
    StoreError::unavailable(format!("{operation}: {err}"))
}

fn minor_units_to_db(amount: Money) -> Result<i64, StoreError> {
    i64::try_from(amount.minor_units())
        .map_err(|_| StoreError::corrupt("amount exceeds storage range"))
}

fn minor_units_from_db(raw: i64) -> Result<Money, StoreError> {
    u64::try_from(raw)
        .map(Money::from_minor)
        .map_err(|_| StoreError::corrupt("negative amount in storage"))
}

fn property_from_row(row: &PgRow) -> Result<Property, StoreError> {
    let corrupt = |e: sqlx::Error| StoreError::corrupt(format!("properties row: {e}"));
    Ok(Property {
        id: PropertyId::from_uuid(row.try_get("id").map_err(corrupt)?),
        owner_id: UserId::from_uuid(row.try_get("owner_id").map_err(corrupt)?),
        title: row.try_get("title").map_err(corrupt)?,
        description: row.try_get("description").map_err(corrupt)?,
        location: row.try_get("location").map_err(corrupt)?,
        price_per_night: minor_units_from_db(row.try_get("price_per_night").map_err(corrupt)?)?,
        is_active: row.try_get("is_active").map_err(corrupt)?,
        created_at: row.try_get("created_at").map_err(corrupt)?,
    })
}

fn booking_from_row(row: &PgRow) -> Result<Booking, StoreError> {
    let corrupt = |e: sqlx::Error| StoreError::corrupt(format!("bookings row: {e}"));
    let stay = StayRange::new(
        row.try_get("check_in").map_err(corrupt)?,
        row.try_get("check_out").map_err(corrupt)?,
    )
    .map_err(|e| StoreError::corrupt(format!("bookings row: {e}")))?;

    Ok(Booking {
        id: BookingId::from_uuid(row.try_get("id").map_err(corrupt)?),
        property_id: PropertyId::from_uuid(row.try_get("property_id").map_err(corrupt)?),
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(corrupt)?),
        stay,
        total_price: minor_units_from_db(row.try_get("total_price").map_err(corrupt)?)?,
        created_at: row.try_get("created_at").map_err(corrupt)?,
    })
}

/// Postgres property store.
pub struct PostgresPropertyStore {
    pool: PgPool,
}

impl PostgresPropertyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyStore for PostgresPropertyStore {
    async fn insert(&self, property: Property) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO properties \
             (id, owner_id, title, description, location, price_per_night, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(*property.id.as_uuid())
        .bind(*property.owner_id.as_uuid())
        .bind(&property.title)
        .bind(&property.description)
        .bind(&property.location)
        .bind(minor_units_to_db(property.price_per_night)?)
        .bind(property.is_active)
        .bind(property.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert property", e))?;
        Ok(())
    }

    async fn get(&self, id: PropertyId) -> Result<Option<Property>, StoreError> {
        let row = sqlx::query("SELECT * FROM properties WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get property", e))?;
        row.as_ref().map(property_from_row).transpose()
    }

    async fn list_active(&self) -> Result<Vec<Property>, StoreError> {
        let rows = sqlx::query("SELECT * FROM properties WHERE is_active ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list properties", e))?;
        rows.iter().map(property_from_row).collect()
    }

    async fn update(&self, property: Property) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE properties \
             SET title = $2, description = $3, location = $4, price_per_night = $5, is_active = $6 \
             WHERE id = $1",
        )
        .bind(*property.id.as_uuid())
        .bind(&property.title)
        .bind(&property.description)
        .bind(&property.location)
        .bind(minor_units_to_db(property.price_per_night)?)
        .bind(property.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update property", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: PropertyId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete property", e))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Postgres booking store.
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PostgresBookingStore {
    async fn insert(&self, booking: Booking) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO bookings \
             (id, property_id, user_id, check_in, check_out, total_price, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(*booking.id.as_uuid())
        .bind(*booking.property_id.as_uuid())
        .bind(*booking.user_id.as_uuid())
        .bind(booking.stay.check_in())
        .bind(booking.stay.check_out())
        .bind(minor_units_to_db(booking.total_price)?)
        .bind(booking.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert booking", e))?;
        Ok(())
    }

    async fn get(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get booking", e))?;
        row.as_ref().map(booking_from_row).transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Booking>, StoreError> {
        let rows =
            sqlx::query("SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC")
                .bind(*user_id.as_uuid())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("list bookings", e))?;
        rows.iter().map(booking_from_row).collect()
    }

    async fn find_overlapping(
        &self,
        property_id: PropertyId,
        stay: &StayRange,
        exclude: Option<BookingId>,
    ) -> Result<Option<Booking>, StoreError> {
        // Half-open overlap: existing.check_in < new.check_out
        //                AND new.check_in < existing.check_out
        let row = sqlx::query(
            "SELECT * FROM bookings \
             WHERE property_id = $1 \
               AND check_in < $3 \
               AND $2 < check_out \
               AND ($4::uuid IS NULL OR id <> $4) \
             LIMIT 1",
        )
        .bind(*property_id.as_uuid())
        .bind(stay.check_in())
        .bind(stay.check_out())
        .bind(exclude.map(|id| *id.as_uuid()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find overlapping booking", e))?;
        row.as_ref().map(booking_from_row).transpose()
    }

    async fn update(&self, booking: Booking) -> Result<bool, StoreError> {
        // The exclusion constraint re-validates the moved range atomically.
        let result = sqlx::query(
            "UPDATE bookings \
             SET property_id = $2, check_in = $3, check_out = $4, total_price = $5 \
             WHERE id = $1",
        )
        .bind(*booking.id.as_uuid())
        .bind(*booking.property_id.as_uuid())
        .bind(booking.stay.check_in())
        .bind(booking.stay.check_out())
        .bind(minor_units_to_db(booking.total_price)?)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update booking", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: BookingId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete booking", e))?;
        Ok(result.rows_affected() > 0)
    }
}
