//! Bounded pool of reusable store connections
//!
//! Lease/release only: a `lease` pops an idle handle or connects a fresh
//! one; `release` pushes the handle back unless the pool is already at its
//! maximum, in which case the handle is closed immediately. Exceeding the
//! maximum is never an error.

use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use tracing::debug;

use super::StoreConnection;
use crate::config::AppConfig;
use crate::errors::Result;

/// Thread-safe pool of idle store connections.
///
/// The mutex guards only the idle vector; it is held for the push/pop and
/// never across a connect, liveness probe, or close.
pub struct ConnectionPool {
    idle: Mutex<Vec<StoreConnection>>,
    max_size: usize,
    url: String,
    connect_timeout: Duration,
}

impl ConnectionPool {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_limits(
            config.database_url(),
            config.max_connections(),
            Duration::from_secs(config.connection_timeout()),
        )
    }

    pub fn with_limits(url: &str, max_size: usize, connect_timeout: Duration) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_size,
            url: url.to_string(),
            connect_timeout,
        }
    }

    /// Check out a connection for exclusive use.
    ///
    /// A pooled handle that fails its liveness probe is reconnected before
    /// reuse; if the reconnect fails the store is unavailable and the error
    /// propagates to the caller.
    pub async fn lease(&self) -> Result<StoreConnection> {
        let reused = self.lock_idle().pop();

        match reused {
            Some(mut conn) => {
                if !conn.is_connected().await {
                    debug!("Pooled connection failed liveness probe, reconnecting");
                    conn.reconnect().await?;
                }
                Ok(conn)
            }
            None => StoreConnection::connect(&self.url, self.connect_timeout).await,
        }
    }

    /// Return a leased connection.
    ///
    /// Infallible: a full pool closes the handle instead of growing, and
    /// close errors are logged, not propagated.
    pub async fn release(&self, conn: StoreConnection) {
        let surplus = {
            let mut idle = self.lock_idle();
            if idle.len() < self.max_size {
                idle.push(conn);
                None
            } else {
                Some(conn)
            }
        };

        if let Some(conn) = surplus {
            debug!("Pool at capacity ({}), closing returned connection", self.max_size);
            conn.close().await;
        }
    }

    /// Number of idle connections currently pooled
    pub fn idle_count(&self) -> usize {
        self.lock_idle().len()
    }

    /// Configured maximum pool size
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn lock_idle(&self) -> std::sync::MutexGuard<'_, Vec<StoreConnection>> {
        // A poisoned lock only means another thread panicked mid-push;
        // the vector itself is still coherent.
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
