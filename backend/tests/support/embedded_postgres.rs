//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! One cluster serves the whole test binary. Each test receives a fresh
//! database cloned from a template built by [`run_pending_migrations`], so the
//! schema under test is exactly what the server applies at startup.
//!
//! Set `SKIP_TEST_CLUSTER=1` where the cluster cannot start; suites then log a
//! skip marker instead of failing.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use fitfeed::domain::UserId;
use fitfeed::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;
use uuid::Uuid;

const TEMPLATE_PREFIX: &str = "fitfeed_template";
const PROVISION_RETRIES: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);
const STABLE_PASSWORD: &str = "fitfeed_embedded_test";

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// A migrated database private to one test.
///
/// Adapters are async; `runtime` drives them from synchronous rstest bodies.
/// `client` seeds and inspects rows the ports do not expose. Fields drop in
/// order, closing every connection before the database is removed.
pub struct PgContext {
    pub pool: DbPool,
    client: Client,
    pub runtime: Runtime,
    _database: TemporaryDatabase,
}

impl PgContext {
    /// Insert a user row and return its id.
    pub fn add_user(&mut self, name: &str, handle: &str) -> UserId {
        let row = self
            .client
            .query_one(
                "INSERT INTO users (name, handle) VALUES ($1, $2) RETURNING id",
                &[&name, &handle],
            )
            .unwrap_or_else(|err| panic!("insert user {handle}: {}", describe(&err)));
        UserId::new(row.get::<_, i64>(0)).expect("serial ids are positive")
    }

    /// Insert a single directed friendship row.
    pub fn add_friendship(&mut self, user: UserId, friend: UserId) {
        self.client
            .execute(
                "INSERT INTO friendships (user_id, friend_id) VALUES ($1, $2)",
                &[&user.as_i64(), &friend.as_i64()],
            )
            .unwrap_or_else(|err| panic!("insert friendship: {}", describe(&err)));
    }

    /// Rows of `event_reactions` for one event as `(id, user_id, content)`.
    pub fn reaction_rows(&mut self, event_id: i64) -> Vec<(i64, i64, String)> {
        self.client
            .query(
                "SELECT id, user_id, content FROM event_reactions WHERE event_id = $1 ORDER BY id",
                &[&event_id],
            )
            .unwrap_or_else(|err| panic!("select reactions: {}", describe(&err)))
            .into_iter()
            .map(|row| (row.get(0), row.get(1), row.get(2)))
            .collect()
    }
}

/// Render a `postgres` error with its SQLSTATE and server message.
fn describe(error: &postgres::Error) -> String {
    match error.as_db_error() {
        Some(db) => format!("postgres error {:?}: {}", db.code(), db.message()),
        None => error.to_string(),
    }
}

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_PREFIX}_{short}"))
}

/// `postgresql_embedded` picks a random password per process unless one is
/// pinned, which breaks reuse of an existing data directory.
fn pin_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the shared cluster starts; tests racing here
        // all write the same value.
        unsafe {
            std::env::set_var("PG_PASSWORD", STABLE_PASSWORD);
        }
    }
}

fn ensure_template(cluster: &ClusterHandle, runtime: &Runtime) -> Result<String, String> {
    let name = template_name()?;
    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&name);
        runtime
            .block_on(run_pending_migrations(&url))
            .map_err(|err| format!("migrate template: {err}"))?;
    }
    Ok(name)
}

fn provision(cluster: &ClusterHandle, runtime: &Runtime) -> Result<TemporaryDatabase, String> {
    let _guard = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let mut last_error = String::from("no provisioning attempt ran");
    for attempt in 1..=PROVISION_RETRIES {
        let cloned = ensure_template(cluster, runtime).and_then(|template| {
            let name = format!("test_{}", Uuid::new_v4().simple());
            cluster
                .temporary_database_from_template(name.as_str(), template.as_str())
                .map_err(|err| format!("clone template: {err:?}"))
        });
        match cloned {
            Ok(database) => return Ok(database),
            Err(error) => last_error = format!("attempt {attempt}/{PROVISION_RETRIES}: {error}"),
        }
        std::thread::sleep(PROVISION_RETRY_DELAY);
    }
    Err(last_error)
}

fn setup() -> Result<PgContext, String> {
    pin_password();
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| format!("{err:?}"))?;
    let database = provision(cluster, &runtime)?;

    let client = Client::connect(database.url(), NoTls).map_err(|err| describe(&err))?;
    let config = PoolConfig::new(database.url()).with_max_size(2);
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(PgContext {
        pool,
        client,
        runtime,
        _database: database,
    })
}

fn skip_requested() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// A fresh migrated database, or `None` when the cluster is unavailable and
/// `SKIP_TEST_CLUSTER` is set.
///
/// # Panics
/// Panics when setup fails and skipping was not requested, so CI breakage
/// is never masked.
pub fn pg_context() -> Option<PgContext> {
    match setup() {
        Ok(context) => Some(context),
        Err(reason) if skip_requested() => {
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            None
        }
        Err(reason) => {
            panic!("test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.")
        }
    }
}
