//! Process-wide bounded connection pool
//!
//! The pool is created once at startup, shared by every unit of work, and
//! closed at shutdown. Each unit of work or statement read holds one
//! [`PooledConnection`] for its whole duration, which bounds how many run at
//! the same time.

use crate::types::TransientFailure;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Point-in-time pool usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub acquired: usize,
    pub idle: usize,
    pub max: usize,
}

/// Bounded pool of connection slots
#[derive(Debug)]
pub struct ConnectionPool {
    permits: Arc<Semaphore>,
    max_connections: usize,
    acquire_timeout: Duration,
}

/// A checked-out connection slot, returned to the pool on drop
#[derive(Debug)]
pub struct PooledConnection {
    _permit: OwnedSemaphorePermit,
}

impl ConnectionPool {
    /// Create a pool with `max_connections` slots
    ///
    /// A capacity of zero is raised to one.
    pub fn new(max_connections: usize, acquire_timeout: Duration) -> Self {
        let max_connections = max_connections.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_connections)),
            max_connections,
            acquire_timeout,
        }
    }

    /// Check out a connection, waiting at most the configured timeout
    pub async fn acquire(&self) -> Result<PooledConnection, TransientFailure> {
        let permits = Arc::clone(&self.permits);
        match tokio::time::timeout(self.acquire_timeout, permits.acquire_owned()).await {
            Ok(Ok(permit)) => Ok(PooledConnection { _permit: permit }),
            Ok(Err(_)) => Err(TransientFailure::PoolClosed),
            Err(_) => Err(TransientFailure::PoolTimeout),
        }
    }

    /// Stop handing out connections
    ///
    /// Connections already checked out stay valid until dropped; every later
    /// `acquire` fails with [`TransientFailure::PoolClosed`].
    pub fn close(&self) {
        self.permits.close();
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    pub fn stats(&self) -> PoolStats {
        let idle = self.permits.available_permits().min(self.max_connections);
        PoolStats {
            acquired: self.max_connections - idle,
            idle,
            max: self.max_connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_acquire_and_release_updates_stats() {
        let pool = ConnectionPool::new(2, Duration::from_millis(50));

        let first = pool.acquire().await.unwrap();
        assert_eq!(
            pool.stats(),
            PoolStats {
                acquired: 1,
                idle: 1,
                max: 2
            }
        );

        drop(first);
        assert_eq!(pool.stats().acquired, 0);
        assert_eq!(pool.stats().idle, 2);
    }

    #[tokio::test]
    async fn test_acquire_times_out_when_exhausted() {
        let pool = ConnectionPool::new(1, Duration::from_millis(20));
        let _held = pool.acquire().await.unwrap();

        let result = pool.acquire().await;
        assert_eq!(result.unwrap_err(), TransientFailure::PoolTimeout);
    }

    #[tokio::test]
    async fn test_closed_pool_rejects_acquire() {
        let pool = ConnectionPool::new(4, Duration::from_millis(20));
        pool.close();

        assert!(pool.is_closed());
        assert_eq!(pool.acquire().await.unwrap_err(), TransientFailure::PoolClosed);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let pool = ConnectionPool::new(0, Duration::from_millis(20));
        assert_eq!(pool.stats().max, 1);
    }
}
