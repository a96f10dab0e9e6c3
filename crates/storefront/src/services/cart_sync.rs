//! Debounced cart quantity commits.
//!
//! Each quantity change for a cart line waits for its commit delay before it
//! reaches Shopify. A change that is overtaken by a newer one for the same
//! line during that wait is dropped, so only the last value is committed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, instrument};

use jolananas_core::debounce::{QuantityInput, commit_delay};

use crate::shopify::{Cart, CartLineUpdateInput, ShopifyError, StorefrontClient};

/// Largest quantity accepted for a single line.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Errors from quantity reconciliation.
#[derive(Debug, Error)]
pub enum CartSyncError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Shopify(#[from] ShopifyError),
}

/// Result of a quantity submission.
#[derive(Debug)]
pub enum Reconciled {
    /// The change reached Shopify; the updated cart.
    Committed(Box<Cart>),
    /// A newer change for the same line arrived first.
    Superseded,
}

type LineKey = (String, String);

/// Per-line debouncer in front of the Storefront cart mutations.
#[derive(Clone)]
pub struct CartQuantityReconciler {
    inner: Arc<ReconcilerInner>,
}

struct ReconcilerInner {
    storefront: StorefrontClient,
    next_generation: AtomicU64,
    pending: Mutex<HashMap<LineKey, u64>>,
}

impl CartQuantityReconciler {
    #[must_use]
    pub fn new(storefront: StorefrontClient) -> Self {
        Self {
            inner: Arc::new(ReconcilerInner {
                storefront,
                next_generation: AtomicU64::new(1),
                pending: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Submit a quantity change for `line_id`.
    ///
    /// Quantity 0 removes the line.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for empty ids or quantities above
    /// [`MAX_LINE_QUANTITY`], and `Shopify` when the commit fails.
    #[instrument(skip(self, input), fields(cart_id = %cart_id, line_id = %line_id, requested = input.requested))]
    pub async fn submit(
        &self,
        cart_id: &str,
        line_id: &str,
        input: QuantityInput,
    ) -> Result<Reconciled, CartSyncError> {
        if cart_id.trim().is_empty() || line_id.trim().is_empty() {
            return Err(CartSyncError::Invalid("Cart line is required".to_string()));
        }
        if input.requested > MAX_LINE_QUANTITY {
            return Err(CartSyncError::Invalid(format!(
                "Quantity must be at most {MAX_LINE_QUANTITY}"
            )));
        }

        let guard = self.begin((cart_id.to_string(), line_id.to_string()));

        tokio::time::sleep(commit_delay(&input)).await;

        if !guard.is_latest() {
            debug!(generation = guard.generation, "Quantity change superseded");
            return Ok(Reconciled::Superseded);
        }

        let result = if input.requested == 0 {
            self.inner
                .storefront
                .remove_from_cart(cart_id, vec![line_id.to_string()])
                .await
        } else {
            self.inner
                .storefront
                .update_cart(
                    cart_id,
                    vec![CartLineUpdateInput {
                        id: line_id.to_string(),
                        quantity: input.requested,
                    }],
                )
                .await
        };

        drop(guard);

        Ok(Reconciled::Committed(Box::new(result?)))
    }

    /// Number of lines with a change in flight.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.pending().len()
    }

    fn begin(&self, key: LineKey) -> PendingGuard {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        self.inner.pending().insert(key.clone(), generation);
        PendingGuard {
            inner: Arc::clone(&self.inner),
            key,
            generation,
        }
    }
}

impl ReconcilerInner {
    fn pending(&self) -> std::sync::MutexGuard<'_, HashMap<LineKey, u64>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Claim on a line's in-flight slot.
///
/// Dropping it clears the slot if no newer change has taken it, including
/// when the submitting future is cancelled mid-wait.
struct PendingGuard {
    inner: Arc<ReconcilerInner>,
    key: LineKey,
    generation: u64,
}

impl PendingGuard {
    fn is_latest(&self) -> bool {
        self.inner.pending().get(&self.key) == Some(&self.generation)
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut pending = self.inner.pending();
        if pending.get(&self.key) == Some(&self.generation) {
            pending.remove(&self.key);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use jolananas_core::debounce::Device;

    use super::*;
    use crate::services::retry::RetryPolicy;

    fn reconciler() -> CartQuantityReconciler {
        let storefront = StorefrontClient::with_endpoint(
            "http://127.0.0.1:9/api/graphql.json",
            "test-token",
            RetryPolicy::NONE,
        );
        CartQuantityReconciler::new(storefront)
    }

    fn typed(previous: u32, requested: u32) -> QuantityInput {
        QuantityInput {
            previous,
            requested,
            input_len: requested.to_string().len(),
            device: Device::Desktop,
            keystroke_interval_ms: None,
        }
    }

    #[tokio::test]
    async fn test_rejects_excessive_quantity() {
        let result = reconciler().submit("cart", "line", typed(1, 150)).await;
        assert!(matches!(result, Err(CartSyncError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_rejects_empty_line_id() {
        let result = reconciler().submit("cart", " ", typed(1, 2)).await;
        assert!(matches!(result, Err(CartSyncError::Invalid(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_change_supersedes_older() {
        let reconciler = reconciler();

        let first = {
            let reconciler = reconciler.clone();
            tokio::spawn(async move { reconciler.submit("cart", "line", typed(1, 1)).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(reconciler.pending_count(), 1);

        let second = {
            let reconciler = reconciler.clone();
            tokio::spawn(async move { reconciler.submit("cart", "line", typed(1, 12)).await })
        };

        let first = first.await.unwrap();
        assert!(matches!(first, Ok(Reconciled::Superseded)));

        // Nothing listens on the endpoint, so the surviving commit fails.
        let second = second.await.unwrap();
        assert!(matches!(second, Err(CartSyncError::Shopify(_))));
        assert_eq!(reconciler.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_lines_are_independent() {
        let reconciler = reconciler();

        let a = {
            let reconciler = reconciler.clone();
            tokio::spawn(async move { reconciler.submit("cart", "line-a", typed(1, 3)).await })
        };
        let b = {
            let reconciler = reconciler.clone();
            tokio::spawn(async move { reconciler.submit("cart", "line-b", typed(1, 4)).await })
        };

        assert!(matches!(a.await.unwrap(), Err(CartSyncError::Shopify(_))));
        assert!(matches!(b.await.unwrap(), Err(CartSyncError::Shopify(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_submits_release_their_lines() {
        let reconciler = reconciler();

        let handles: Vec<_> = (0..100)
            .map(|i| {
                let reconciler = reconciler.clone();
                tokio::spawn(async move {
                    reconciler
                        .submit("cart", &format!("line-{i}"), typed(1, 5))
                        .await
                })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(reconciler.pending_count(), 100);

        for handle in handles {
            handle.abort();
            assert!(handle.await.unwrap_err().is_cancelled());
        }
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(reconciler.pending_count(), 0);
    }
}
