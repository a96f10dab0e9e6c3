//! Account dashboard view model.
//!
//! Local records (addresses, activity) must load; Shopify sections (cart,
//! orders) are best effort and come back as `None` when Shopify fails.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{instrument, warn};

use jolananas_core::{Email, Price};

use crate::db::{ActivityRepository, AddressRepository, RepositoryError};
use crate::models::{ActivityEntry, Address, User};
use crate::shopify::admin::{AdminCustomer, AdminOrder};
use crate::shopify::{AdminClient, Cart, ShopifyError, StorefrontClient};

/// Activity entries shown on the dashboard.
pub const RECENT_ACTIVITY: i64 = 10;

/// Orders listed on the dashboard.
pub const RECENT_ORDERS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub profile: ProfileSummary,
    pub addresses: AddressSummary,
    pub activity: Vec<ActivityEntry>,
    /// `None` without a session cart or when Shopify is unavailable.
    pub cart: Option<CartSummary>,
    /// `None` before the first checkout or when Shopify is unavailable.
    pub orders: Option<OrderSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub display_name: String,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub member_since: DateTime<Utc>,
}

impl From<&User> for ProfileSummary {
    fn from(user: &User) -> Self {
        Self {
            display_name: user.display_name(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            member_since: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddressSummary {
    pub count: usize,
    pub default: Option<Address>,
}

impl AddressSummary {
    fn from_list(addresses: Vec<Address>) -> Self {
        let count = addresses.len();
        let default = addresses.into_iter().find(|a| a.is_default);
        Self { count, default }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub cart_id: String,
    pub item_count: u32,
    pub subtotal: Price,
    pub checkout_url: String,
}

impl From<Cart> for CartSummary {
    fn from(cart: Cart) -> Self {
        Self {
            cart_id: cart.id,
            item_count: cart.total_quantity,
            subtotal: cart.cost.subtotal,
            checkout_url: cart.checkout_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    /// Lifetime count from the Shopify customer record.
    pub orders_count: i64,
    /// Lifetime spend from the Shopify customer record.
    pub total_spent: Decimal,
    /// Currency of the most recent order.
    pub currency: Option<String>,
    pub recent: Vec<AdminOrder>,
}

/// Lifetime totals from `customer`, with the newest [`RECENT_ORDERS`] of `orders`.
#[must_use]
pub fn summarize_orders(customer: &AdminCustomer, mut orders: Vec<AdminOrder>) -> OrderSummary {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders.truncate(RECENT_ORDERS);

    OrderSummary {
        orders_count: customer.orders_count,
        total_spent: customer.total_spent.unwrap_or_default(),
        currency: orders.first().map(|o| o.currency.clone()),
        recent: orders,
    }
}

/// Builds the dashboard for a signed-in user.
pub struct DashboardService<'a> {
    pool: &'a PgPool,
    storefront: &'a StorefrontClient,
    admin: &'a AdminClient,
}

impl<'a> DashboardService<'a> {
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        storefront: &'a StorefrontClient,
        admin: &'a AdminClient,
    ) -> Self {
        Self {
            pool,
            storefront,
            admin,
        }
    }

    /// Gather every section concurrently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` when local records cannot be read.
    #[instrument(skip(self, user, cart_id), fields(user_id = %user.id))]
    pub async fn build(
        &self,
        user: &User,
        cart_id: Option<&str>,
    ) -> Result<Dashboard, RepositoryError> {
        let addresses = AddressRepository::new(self.pool);
        let activity = ActivityRepository::new(self.pool);

        let (addresses, activity, cart, orders) = tokio::join!(
            addresses.list(user.id),
            activity.recent(user.id, RECENT_ACTIVITY),
            self.cart_summary(cart_id),
            self.order_summary(user.shopify_customer_id),
        );

        Ok(Dashboard {
            profile: ProfileSummary::from(user),
            addresses: AddressSummary::from_list(addresses?),
            activity: activity?,
            cart,
            orders,
        })
    }

    async fn cart_summary(&self, cart_id: Option<&str>) -> Option<CartSummary> {
        let cart_id = cart_id?;
        match self.storefront.get_cart(cart_id).await {
            Ok(cart) => Some(CartSummary::from(cart)),
            Err(ShopifyError::NotFound(_)) => None,
            Err(e) => {
                warn!(error = %e, "Dashboard cart unavailable");
                None
            }
        }
    }

    async fn order_summary(&self, customer_id: Option<i64>) -> Option<OrderSummary> {
        let customer_id = customer_id?;
        let recent_limit = u32::try_from(RECENT_ORDERS).unwrap_or(u32::MAX);
        let (customer, orders) = tokio::join!(
            self.admin.get_customer(customer_id),
            self.admin.get_customer_orders(customer_id, recent_limit),
        );
        match (customer, orders) {
            (Ok(customer), Ok(orders)) => Some(summarize_orders(&customer, orders)),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "Dashboard orders unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use jolananas_core::UserId;

    use super::*;

    fn order(id: i64, day: u32, total: &str) -> AdminOrder {
        AdminOrder {
            id,
            name: format!("#{id}"),
            created_at: Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0).unwrap(),
            financial_status: Some("paid".to_string()),
            fulfillment_status: None,
            total_price: total.parse().unwrap(),
            currency: "EUR".to_string(),
            line_items: Vec::new(),
        }
    }

    fn customer(orders_count: i64, total_spent: Option<&str>) -> AdminCustomer {
        AdminCustomer {
            id: 77,
            email: Some("ada@jolananas.com".to_string()),
            first_name: None,
            last_name: None,
            phone: None,
            orders_count,
            total_spent: total_spent.map(|t| t.parse().unwrap()),
            tags: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_summarize_orders_uses_lifetime_totals() {
        let orders = (1..=7)
            .map(|i| order(i64::from(i), i, "10.50"))
            .collect::<Vec<_>>();

        // More orders on record than were fetched
        let summary = summarize_orders(&customer(412, Some("5120.75")), orders);
        assert_eq!(summary.orders_count, 412);
        assert_eq!(summary.total_spent, "5120.75".parse::<Decimal>().unwrap());
        assert_eq!(summary.recent.len(), RECENT_ORDERS);
        assert_eq!(summary.recent[0].id, 7);
        assert_eq!(summary.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_summarize_no_orders() {
        let summary = summarize_orders(&customer(0, None), Vec::new());
        assert_eq!(summary.orders_count, 0);
        assert_eq!(summary.total_spent, Decimal::ZERO);
        assert!(summary.currency.is_none());
    }

    #[test]
    fn test_profile_summary_uses_display_name() {
        let user = User {
            id: UserId::new(3),
            email: Email::parse("ada@jolananas.com").unwrap(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            phone: None,
            shopify_customer_id: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap(),
        };

        let profile = ProfileSummary::from(&user);
        assert_eq!(profile.display_name, "Ada");
        assert_eq!(profile.member_since, user.created_at);
    }
}
