//! Bounded concurrent fan-out of independent update commands.
//!
//! N commands are submitted against a worker pool of at most W concurrent
//! tasks; the dispatcher blocks until every command has completed and
//! collects each outcome individually. One command's fault never prevents
//! the others from completing or being reported. There is no retry,
//! cancellation, or rate limiting.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{instrument, warn};

use crate::client::InventoryClient;
use crate::error::InventoryError;
use crate::types::{AdjustmentOutcome, AdjustmentReason};

/// Worker-pool width [`apply_updates`] falls back to.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Fault captured for a single dispatched item.
#[derive(Debug, Error)]
pub enum DispatchError<E>
where
    E: std::error::Error,
{
    /// The worker returned an error.
    #[error(transparent)]
    Failed(#[from] E),

    /// The worker task panicked or was aborted.
    #[error("worker task died: {0}")]
    Join(String),
}

/// Apply `worker` to every item with at most `max_concurrency` in flight.
///
/// All items are submitted up front and gated by a semaphore; outcomes are
/// returned in submission order once every item has completed (success or
/// failure). A panicking worker is captured as [`DispatchError::Join`].
pub async fn parallel_map<I, T, E, F, Fut>(
    items: Vec<I>,
    max_concurrency: usize,
    worker: F,
) -> Vec<Result<T, DispatchError<E>>>
where
    I: Send + 'static,
    T: Send + 'static,
    E: std::error::Error + Send + 'static,
    F: Fn(I) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let width = max_concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(width));

    let mut handles = Vec::with_capacity(items.len());
    for item in items {
        let semaphore = Arc::clone(&semaphore);
        let worker = worker.clone();
        handles.push(tokio::spawn(async move {
            // The semaphore is never closed, so acquisition only fails if the
            // runtime is shutting down; run unguarded in that case.
            let _permit = semaphore.acquire_owned().await.ok();
            worker(item).await
        }));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = match handle.await {
            Ok(result) => result.map_err(DispatchError::Failed),
            Err(join_error) => {
                warn!(error = %join_error, "dispatch worker died");
                Err(DispatchError::Join(join_error.to_string()))
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

/// Absolute target or explicit delta for one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// Set the available quantity to an absolute value.
    Set(i64),
    /// Adjust the available quantity by a signed delta.
    Adjust(i64),
}

/// A single inventory update to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCommand {
    /// Inventory item id, short or GID form.
    pub inventory_item_id: String,
    /// Location id, short or GID form.
    pub location_id: String,
    /// Desired change.
    pub change: QuantityChange,
    /// Reason code sent with the mutation.
    pub reason: AdjustmentReason,
}

impl UpdateCommand {
    /// Command setting an absolute available quantity, reported as a
    /// correction.
    #[must_use]
    pub fn set(
        inventory_item_id: impl Into<String>,
        location_id: impl Into<String>,
        target: i64,
    ) -> Self {
        Self {
            inventory_item_id: inventory_item_id.into(),
            location_id: location_id.into(),
            change: QuantityChange::Set(target),
            reason: AdjustmentReason::Correction,
        }
    }

    /// Command adjusting the available quantity by a delta.
    #[must_use]
    pub fn adjust(
        inventory_item_id: impl Into<String>,
        location_id: impl Into<String>,
        delta: i64,
        reason: AdjustmentReason,
    ) -> Self {
        Self {
            inventory_item_id: inventory_item_id.into(),
            location_id: location_id.into(),
            change: QuantityChange::Adjust(delta),
            reason,
        }
    }
}

/// Outcome of one dispatched command.
#[derive(Debug)]
pub struct UpdateReport {
    /// The command that was dispatched.
    pub command: UpdateCommand,
    /// Its outcome: the mutation result or the captured fault.
    pub outcome: Result<AdjustmentOutcome, DispatchError<InventoryError>>,
}

impl UpdateReport {
    /// Returns `true` when the command completed and the server accepted it.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(&self.outcome, Ok(outcome) if outcome.success)
    }
}

/// Fan out `commands` against the client with bounded parallelism.
///
/// Every command runs to completion; reports pair each command with its
/// outcome, in submission order. A `None` width falls back to
/// [`DEFAULT_CONCURRENCY`]. Note that a `Set` command's read-then-write is
/// not atomic with respect to concurrent external changes.
#[instrument(skip(client, commands), fields(commands = commands.len()))]
pub async fn apply_updates(
    client: &InventoryClient,
    commands: Vec<UpdateCommand>,
    max_concurrency: Option<usize>,
) -> Vec<UpdateReport> {
    let width = max_concurrency.unwrap_or(DEFAULT_CONCURRENCY);
    let echo = commands.clone();
    let client = client.clone();

    let outcomes = parallel_map(commands, width, move |command: UpdateCommand| {
        let client = client.clone();
        async move {
            match command.change {
                QuantityChange::Set(target) => {
                    client
                        .set_quantity(
                            &command.inventory_item_id,
                            &command.location_id,
                            target,
                            command.reason,
                        )
                        .await
                }
                QuantityChange::Adjust(delta) => {
                    client
                        .adjust_quantity(
                            &command.inventory_item_id,
                            &command.location_id,
                            delta,
                            command.reason,
                        )
                        .await
                }
            }
        }
    })
    .await;

    echo.into_iter()
        .zip(outcomes)
        .map(|(command, outcome)| UpdateReport { command, outcome })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use super::*;

    #[tokio::test]
    async fn all_items_complete_with_faults_isolated() {
        let outcomes = parallel_map(
            (0..50).collect::<Vec<u32>>(),
            10,
            |n| async move {
                if n % 10 == 0 {
                    Err(InventoryError::MissingData(format!("item {n}")))
                } else {
                    Ok(n * 2)
                }
            },
        )
        .await;

        assert_eq!(outcomes.len(), 50);
        let failures = outcomes.iter().filter(|o| o.is_err()).count();
        assert_eq!(failures, 5);
        // Outcomes stay in submission order.
        assert!(matches!(outcomes[1], Ok(2)));
        assert!(matches!(outcomes[49], Ok(98)));
        assert!(outcomes[10].is_err());
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let in_flight_ref = Arc::clone(&in_flight);
        let peak_ref = Arc::clone(&peak);
        let start = Instant::now();
        let outcomes = parallel_map((0..50).collect::<Vec<u32>>(), 10, move |n| {
            let in_flight = Arc::clone(&in_flight_ref);
            let peak = Arc::clone(&peak_ref);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<u32, InventoryError>(n)
            }
        })
        .await;

        assert_eq!(outcomes.len(), 50);
        assert!(outcomes.iter().all(Result::is_ok));
        assert!(peak.load(Ordering::SeqCst) <= 10);
        // ceil(50/10) batches of ~20ms each, far below 50 sequential calls.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn panicking_worker_is_captured() {
        let outcomes = parallel_map(vec![1_u32, 2, 3], 2, |n| async move {
            assert!(n != 2, "boom");
            Ok::<u32, InventoryError>(n)
        })
        .await;

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], Ok(1)));
        assert!(matches!(outcomes[1], Err(DispatchError::Join(_))));
        assert!(matches!(outcomes[2], Ok(3)));
    }

    #[tokio::test]
    async fn zero_width_is_clamped_to_one() {
        let outcomes =
            parallel_map(vec![1_u32, 2], 0, |n| async move {
                Ok::<u32, InventoryError>(n)
            })
            .await;
        assert_eq!(outcomes.len(), 2);
    }
}
