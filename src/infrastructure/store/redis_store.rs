//! Redis-backed mapping store.

use crate::domain::entities::{Mapping, NewMapping, StoredMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::{AppError, map_redis_error};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// How [`RedisMappingStore`] claims a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReserveMode {
    /// Single `SET key value NX` command.
    #[default]
    Atomic,
    /// `EXISTS` followed by `SET`.
    ///
    /// Writes from one process are serialized behind a mutex, but another
    /// process writing the same code between the two commands can still
    /// overwrite the mapping. Only for backends without `NX` support.
    CheckThenSet,
}

impl fmt::Display for ReserveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReserveMode::Atomic => write!(f, "atomic"),
            ReserveMode::CheckThenSet => write!(f, "check-then-set"),
        }
    }
}

impl FromStr for ReserveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atomic" => Ok(ReserveMode::Atomic),
            "check-then-set" => Ok(ReserveMode::CheckThenSet),
            other => Err(format!(
                "RESERVE_MODE must be 'atomic' or 'check-then-set', got '{}'",
                other
            )),
        }
    }
}

/// Redis implementation of [`MappingRepository`].
///
/// Uses `ConnectionManager` for automatic reconnection; the manager is cloned
/// per operation. Every mapping is stored under `<key_prefix><code>` with a
/// JSON value (see [`StoredMapping`]). Unlike a cache, errors are propagated.
pub struct RedisMappingStore {
    client: ConnectionManager,
    key_prefix: String,
    reserve_mode: ReserveMode,
    write_lock: Mutex<()>,
}

impl RedisMappingStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(
        redis_url: &str,
        key_prefix: impl Into<String>,
        reserve_mode: ReserveMode,
    ) -> Result<Self, AppError> {
        info!("Connecting to Redis mapping store");

        let client = Client::open(redis_url).map_err(|e| {
            AppError::store_unavailable(
                "Failed to create Redis client",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            AppError::store_unavailable(
                "Failed to connect to Redis",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await.map_err(|e| {
            AppError::store_unavailable("Redis PING failed", json!({ "reason": e.to_string() }))
        })?;

        if reserve_mode == ReserveMode::CheckThenSet {
            warn!(
                "Redis store uses check-then-set reservation; writers in other processes may race"
            );
        }

        info!(%reserve_mode, "✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: key_prefix.into(),
            reserve_mode,
            write_lock: Mutex::new(()),
        })
    }

    pub fn reserve_mode(&self) -> ReserveMode {
        self.reserve_mode
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }

    fn encode_value(new_mapping: &NewMapping) -> Result<String, AppError> {
        serde_json::to_string(&StoredMapping::from(new_mapping)).map_err(|e| {
            AppError::internal(
                "Failed to serialize mapping",
                json!({ "reason": e.to_string() }),
            )
        })
    }

    async fn reserve_atomic(&self, key: &str, value: String) -> Result<bool, AppError> {
        let mut conn = self.client.clone();
        conn.set_nx::<_, _, bool>(key, value)
            .await
            .map_err(map_redis_error)
    }

    async fn reserve_check_then_set(&self, key: &str, value: String) -> Result<bool, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut conn = self.client.clone();

        let taken = conn
            .exists::<_, bool>(key)
            .await
            .map_err(map_redis_error)?;
        if taken {
            return Ok(false);
        }

        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(map_redis_error)?;
        Ok(true)
    }
}

#[async_trait]
impl MappingRepository for RedisMappingStore {
    async fn reserve(&self, new_mapping: &NewMapping) -> Result<bool, AppError> {
        let key = self.build_key(&new_mapping.code);
        let value = Self::encode_value(new_mapping)?;

        let reserved = match self.reserve_mode {
            ReserveMode::Atomic => self.reserve_atomic(&key, value).await?,
            ReserveMode::CheckThenSet => self.reserve_check_then_set(&key, value).await?,
        };

        debug!(code = %new_mapping.code, reserved, "Redis reserve");
        Ok(reserved)
    }

    async fn lookup(&self, code: &str) -> Result<Option<Mapping>, AppError> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        let raw = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(map_redis_error)?;

        Ok(raw
            .filter(|value| !value.is_empty())
            .map(|value| StoredMapping::decode(&value).into_mapping(code)))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
