//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::services::address::{AddressAutocomplete, GeocodeError};
use crate::services::cart_sync::CartQuantityReconciler;
use crate::services::checkout::CheckoutService;
use crate::services::retry::RetryPolicy;
use crate::shopify::{AdminClient, AdminError, StorefrontClient};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("admin client: {0}")]
    Admin(#[from] AdminError),
    #[error("address autocomplete: {0}")]
    Geocode(#[from] GeocodeError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    storefront: StorefrontClient,
    admin: AdminClient,
    checkout: CheckoutService,
    autocomplete: AddressAutocomplete,
    reconciler: CartQuantityReconciler,
}

impl AppState {
    /// Build the state and every outbound client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, StateError> {
        let retry = RetryPolicy::from(config.retry);
        let storefront = StorefrontClient::new(&config.shopify, retry);
        let admin = AdminClient::new(&config.shopify, retry)?;
        let autocomplete = AddressAutocomplete::new(config.geocode.clone(), retry)?;

        Ok(Self::from_parts(config, pool, storefront, admin, autocomplete))
    }

    /// Assemble the state from prebuilt clients.
    #[must_use]
    pub fn from_parts(
        config: StorefrontConfig,
        pool: PgPool,
        storefront: StorefrontClient,
        admin: AdminClient,
        autocomplete: AddressAutocomplete,
    ) -> Self {
        let checkout = CheckoutService::new(storefront.clone(), admin.clone());
        let reconciler = CartQuantityReconciler::new(storefront.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                storefront,
                admin,
                checkout,
                autocomplete,
                reconciler,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Shopify Admin API client.
    #[must_use]
    pub fn admin(&self) -> &AdminClient {
        &self.inner.admin
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    #[must_use]
    pub fn autocomplete(&self) -> &AddressAutocomplete {
        &self.inner.autocomplete
    }

    #[must_use]
    pub fn reconciler(&self) -> &CartQuantityReconciler {
        &self.inner.reconciler
    }
}
