//! `staybook-infra` — store implementations behind the domain ports.
//!
//! In-memory stores for dev/tests, Postgres (`sqlx`) for production, and a
//! filesystem-backed media store for uploads.

pub mod media;
pub mod stores;

pub use media::{FsMediaStore, MEDIA_BUCKET, MediaStore, build_object_path};
pub use stores::in_memory::{InMemoryBookingStore, InMemoryPropertyStore};
pub use stores::postgres::{PostgresBookingStore, PostgresPropertyStore, ensure_schema};
