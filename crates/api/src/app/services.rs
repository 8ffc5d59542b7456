use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;

use staybook_auth::{Hs256Sessions, IdentityProvider, InMemoryIdentityProvider};
use staybook_bookings::BookingStore;
use staybook_infra::{
    FsMediaStore, InMemoryBookingStore, InMemoryPropertyStore, MediaStore, PostgresBookingStore,
    PostgresPropertyStore, ensure_schema,
};
use staybook_listings::PropertyStore;

/// Session lifetime for issued tokens.
const SESSION_TTL_HOURS: i64 = 24;

/// Everything the handlers need, behind ports so the in-memory and Postgres
/// wirings are interchangeable.
#[derive(Clone)]
pub struct AppServices {
    pub properties: Arc<dyn PropertyStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub media: Arc<dyn MediaStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: Arc<Hs256Sessions>,
}

/// Wire up stores based on environment: `USE_PERSISTENT_STORES=true` selects
/// Postgres (`DATABASE_URL` required), anything else the in-memory stores.
pub async fn build_services(jwt_secret: String) -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    let (properties, bookings): (Arc<dyn PropertyStore>, Arc<dyn BookingStore>) = if use_persistent
    {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
        let pool = PgPool::connect(&database_url)
            .await
            .expect("failed to connect to Postgres");
        ensure_schema(&pool).await.expect("failed to ensure schema");
        (
            Arc::new(PostgresPropertyStore::new(pool.clone())),
            Arc::new(PostgresBookingStore::new(pool)),
        )
    } else {
        (
            Arc::new(InMemoryPropertyStore::new()),
            Arc::new(InMemoryBookingStore::new()),
        )
    };

    let media_root = std::env::var("MEDIA_ROOT").map(std::path::PathBuf::from).unwrap_or_else(|_| {
        let fallback = std::env::temp_dir().join("staybook-media");
        tracing::warn!("MEDIA_ROOT not set; storing uploads under {}", fallback.display());
        fallback
    });
    let media: Arc<dyn MediaStore> = Arc::new(FsMediaStore::new(media_root));

    // Credential verification is a port; the in-memory provider stands in for
    // a hosted identity service.
    let identity: Arc<dyn IdentityProvider> = Arc::new(InMemoryIdentityProvider::new());

    let sessions = Arc::new(Hs256Sessions::new(
        jwt_secret,
        Duration::hours(SESSION_TTL_HOURS),
    ));

    AppServices {
        properties,
        bookings,
        media,
        identity,
        sessions,
    }
}
