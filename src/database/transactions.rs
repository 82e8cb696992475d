// ABOUTME: Transaction guard that rolls back automatically unless committed
// ABOUTME: Used by multi-statement workflows such as plan archive-and-replace
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Wraps a `SQLite` transaction; dropping it without [`commit`](Self::commit)
/// rolls every statement back.
pub struct SqliteTransactionGuard {
    tx: Option<Transaction<'static, Sqlite>>,
}

impl SqliteTransactionGuard {
    /// Take ownership of an open transaction
    #[must_use]
    pub const fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Connection to run statements against inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction was already committed
    pub fn executor(&mut self) -> AppResult<&mut SqliteConnection> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| AppError::internal("Transaction already completed"))
    }

    /// Commit all statements
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails or was already performed
    pub async fn commit(mut self) -> AppResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| AppError::internal("Transaction already completed"))?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))
    }
}

impl Drop for SqliteTransactionGuard {
    fn drop(&mut self) {
        if self.tx.is_some() {
            debug!("Transaction dropped without commit, rolling back");
        }
    }
}
