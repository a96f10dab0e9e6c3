//! Repository tests against a real Postgres using `#[sqlx::test]`.
//!
//! Each test gets a fresh database with the crate's migrations applied.
//! `DATABASE_URL` must point at a server the test user can create databases on.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use sqlx::PgPool;

use jolananas_core::{AddressId, CountryCode, Email, UserId};
use jolananas_storefront::db::activity::MAX_ACTIVITY_LIMIT;
use jolananas_storefront::db::{
    ActivityRepository, AddressRepository, RepositoryError, UserRepository,
};
use jolananas_storefront::models::address::ValidAddress;
use jolananas_storefront::models::{ActivityKind, ProfileUpdate, User};
use jolananas_storefront::services::dashboard::DashboardService;
use jolananas_storefront::services::retry::RetryPolicy;
use jolananas_storefront::shopify::{AdminClient, StorefrontClient};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_user(pool: &PgPool, email: &str) -> User {
    let profile = ProfileUpdate {
        first_name: Some("Jeanne".to_string()),
        last_name: Some("Baret".to_string()),
        phone: None,
    };
    UserRepository::new(pool)
        .create_with_password(&Email::parse(email).unwrap(), "$argon2id$stub", &profile)
        .await
        .unwrap_or_else(|e| panic!("insert_user failed for '{email}': {e}"))
}

fn address(city: &str, is_default: bool) -> ValidAddress {
    ValidAddress {
        label: Some(city.to_string()),
        first_name: "Jeanne".to_string(),
        last_name: "Baret".to_string(),
        company: None,
        address1: "12 rue des Ananas".to_string(),
        address2: None,
        city: city.to_string(),
        zip: "75011".to_string(),
        province: None,
        country_code: CountryCode::parse("FR").unwrap(),
        phone: None,
        is_default,
    }
}

async fn default_ids(pool: &PgPool, user_id: UserId) -> Vec<AddressId> {
    AddressRepository::new(pool)
        .list(user_id)
        .await
        .unwrap()
        .into_iter()
        .filter(|a| a.is_default)
        .map(|a| a.id)
        .collect()
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_is_conflict(pool: PgPool) {
    insert_user(&pool, "jeanne@jolananas.com").await;

    let err = UserRepository::new(&pool)
        .create_with_password(
            &Email::parse("Jeanne@Jolananas.com").unwrap(),
            "$argon2id$stub",
            &ProfileUpdate::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_password_hash_lookup_and_customer_link(pool: PgPool) {
    let user = insert_user(&pool, "jeanne@jolananas.com").await;
    let users = UserRepository::new(&pool);

    let (found, hash) = users
        .get_password_hash(&Email::parse("JEANNE@jolananas.com").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(hash, "$argon2id$stub");

    users.set_shopify_customer_id(user.id, 77).await.unwrap();
    // Setting the same id again is not a miss
    users.set_shopify_customer_id(user.id, 77).await.unwrap();
    let linked = users.get_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(linked.shopify_customer_id, Some(77));

    let err = users
        .set_shopify_customer_id(UserId::new(9999), 77)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_profile_missing_user_is_not_found(pool: PgPool) {
    let err = UserRepository::new(&pool)
        .update_profile(UserId::new(9999), &ProfileUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_first_address_becomes_default(pool: PgPool) {
    let user = insert_user(&pool, "jeanne@jolananas.com").await;
    let repo = AddressRepository::new(&pool);

    let first = repo.create(user.id, &address("Paris", false)).await.unwrap();
    let second = repo.create(user.id, &address("Lyon", false)).await.unwrap();

    assert!(first.is_default);
    assert!(!second.is_default);
    assert_eq!(default_ids(&pool, user.id).await, vec![first.id]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_set_default_clears_the_others(pool: PgPool) {
    let user = insert_user(&pool, "jeanne@jolananas.com").await;
    let repo = AddressRepository::new(&pool);

    repo.create(user.id, &address("Paris", false)).await.unwrap();
    let lyon = repo.create(user.id, &address("Lyon", false)).await.unwrap();
    let nantes = repo.create(user.id, &address("Nantes", true)).await.unwrap();
    assert_eq!(default_ids(&pool, user.id).await, vec![nantes.id]);

    let updated = repo.set_default(user.id, lyon.id).await.unwrap();
    assert!(updated.is_default);
    assert_eq!(default_ids(&pool, user.id).await, vec![lyon.id]);

    let list = repo.list(user.id).await.unwrap();
    assert_eq!(list[0].id, lyon.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_can_take_over_default(pool: PgPool) {
    let user = insert_user(&pool, "jeanne@jolananas.com").await;
    let repo = AddressRepository::new(&pool);

    let paris = repo.create(user.id, &address("Paris", false)).await.unwrap();
    let lyon = repo.create(user.id, &address("Lyon", false)).await.unwrap();

    let lyon = repo
        .update(user.id, lyon.id, &address("Villeurbanne", true))
        .await
        .unwrap();
    assert_eq!(lyon.city, "Villeurbanne");
    assert_eq!(default_ids(&pool, user.id).await, vec![lyon.id]);

    // Dropping the flag on the default keeps it the default
    let still = repo
        .update(user.id, lyon.id, &address("Villeurbanne", false))
        .await
        .unwrap();
    assert!(still.is_default);
    assert!(!repo.get(user.id, paris.id).await.unwrap().unwrap().is_default);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_default_promotes_most_recently_updated(pool: PgPool) {
    let user = insert_user(&pool, "jeanne@jolananas.com").await;
    let repo = AddressRepository::new(&pool);

    let paris = repo.create(user.id, &address("Paris", false)).await.unwrap();
    let lyon = repo.create(user.id, &address("Lyon", false)).await.unwrap();
    let nantes = repo.create(user.id, &address("Nantes", false)).await.unwrap();

    // Touch Lyon so it is newer than Nantes despite the lower id
    repo.update(user.id, lyon.id, &address("Lyon", false))
        .await
        .unwrap();

    repo.delete(user.id, paris.id).await.unwrap();

    assert_eq!(default_ids(&pool, user.id).await, vec![lyon.id]);
    assert!(!repo.get(user.id, nantes.id).await.unwrap().unwrap().is_default);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_last_address_leaves_none(pool: PgPool) {
    let user = insert_user(&pool, "jeanne@jolananas.com").await;
    let repo = AddressRepository::new(&pool);

    let only = repo.create(user.id, &address("Paris", false)).await.unwrap();
    repo.delete(user.id, only.id).await.unwrap();

    assert!(repo.list(user.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_or_foreign_address_is_not_found(pool: PgPool) {
    let owner = insert_user(&pool, "jeanne@jolananas.com").await;
    let other = insert_user(&pool, "louis@jolananas.com").await;
    let repo = AddressRepository::new(&pool);

    let paris = repo.create(owner.id, &address("Paris", false)).await.unwrap();
    let missing = AddressId::new(9999);

    for id in [paris.id, missing] {
        let err = repo
            .update(other.id, id, &address("Lyon", false))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));

        let err = repo.set_default(other.id, id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));

        let err = repo.delete(other.id, id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    assert!(repo.get(other.id, paris.id).await.unwrap().is_none());
    // The owner's address is untouched
    let kept = repo.get(owner.id, paris.id).await.unwrap().unwrap();
    assert_eq!(kept.city, "Paris");
    assert!(kept.is_default);
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_recent_activity_is_newest_first(pool: PgPool) {
    let user = insert_user(&pool, "jeanne@jolananas.com").await;
    let repo = ActivityRepository::new(&pool);

    repo.record(user.id, ActivityKind::Register, None, Some("203.0.113.7"))
        .await
        .unwrap();
    repo.record(user.id, ActivityKind::Login, None, None)
        .await
        .unwrap();
    repo.record(
        user.id,
        ActivityKind::AddressCreated,
        Some(json!({ "city": "Paris" })),
        None,
    )
    .await
    .unwrap();

    let entries = repo.recent(user.id, 2).await.unwrap();
    let kinds: Vec<_> = entries.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ActivityKind::AddressCreated, ActivityKind::Login]);
    assert_eq!(entries[0].detail, Some(json!({ "city": "Paris" })));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recent_activity_clamps_limit(pool: PgPool) {
    let user = insert_user(&pool, "jeanne@jolananas.com").await;
    let repo = ActivityRepository::new(&pool);

    for _ in 0..(MAX_ACTIVITY_LIMIT + 5) {
        repo.record(user.id, ActivityKind::Login, None, None)
            .await
            .unwrap();
    }

    let too_many = repo.recent(user.id, 10_000).await.unwrap();
    assert_eq!(too_many.len(), usize::try_from(MAX_ACTIVITY_LIMIT).unwrap());

    let too_few = repo.recent(user.id, 0).await.unwrap();
    assert_eq!(too_few.len(), 1);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_dashboard_survives_shopify_outage(pool: PgPool) {
    let user = insert_user(&pool, "jeanne@jolananas.com").await;
    UserRepository::new(&pool)
        .set_shopify_customer_id(user.id, 77)
        .await
        .unwrap();
    let user = UserRepository::new(&pool)
        .get_by_id(user.id)
        .await
        .unwrap()
        .unwrap();
    AddressRepository::new(&pool)
        .create(user.id, &address("Paris", false))
        .await
        .unwrap();
    ActivityRepository::new(&pool)
        .record(user.id, ActivityKind::Login, None, None)
        .await
        .unwrap();

    // Nothing listens on port 9, so every Shopify call fails
    let storefront = StorefrontClient::with_endpoint(
        "http://127.0.0.1:9/api/2026-01/graphql.json",
        "test-token",
        RetryPolicy::NONE,
    );
    let admin = AdminClient::with_base_url(
        "http://127.0.0.1:9/admin/api/2026-01",
        "test-token",
        RetryPolicy::NONE,
    )
    .unwrap();

    let dashboard = DashboardService::new(&pool, &storefront, &admin)
        .build(&user, Some("gid://shopify/Cart/abc"))
        .await
        .unwrap();

    assert!(dashboard.cart.is_none());
    assert!(dashboard.orders.is_none());
    assert_eq!(dashboard.addresses.count, 1);
    assert!(dashboard.addresses.default.is_some());
    assert_eq!(dashboard.activity.len(), 1);
    assert_eq!(dashboard.profile.display_name, "Jeanne Baret");
}
