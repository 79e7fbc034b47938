//! Integration tests for carts, stock movements, order snapshots and wishlists.

use rust_decimal::Decimal;
use sqlx::PgPool;
use storefront_core::roles::CUSTOMER_ROLE_ID;
use storefront_core::status::{OrderStatus, PaymentStatus};
use storefront_db::models::catalog::{CreateCatalog, CreateSubcatalog};
use storefront_db::models::order::{CreateOrder, CreateOrderItem};
use storefront_db::models::product::CreateProduct;
use storefront_db::models::user::CreateUser;
use storefront_db::repositories::{
    CartRepo, CatalogRepo, OrderRepo, ProductRepo, SubcatalogRepo, UserRepo, WishlistRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Shopper".to_string(),
            email: email.to_string(),
            password_hash: Some("not-a-real-hash".to_string()),
            google_id: None,
            avatar: None,
            role_id: CUSTOMER_ROLE_ID,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_product(pool: &PgPool, name: &str, price: Decimal, stock: i32) -> i64 {
    let catalog = match CatalogRepo::find_active_by_slug(pool, "general").await.unwrap() {
        Some(c) => c,
        None => CatalogRepo::create(
            pool,
            &CreateCatalog {
                name_uz: "Umumiy".into(),
                name_ru: "Общее".into(),
                name_eng: "General".into(),
                slug: None,
                description_uz: None,
                description_ru: None,
                description_eng: None,
                image: None,
                is_active: None,
                sort_order: None,
            },
            "general",
        )
        .await
        .unwrap(),
    };
    let sub = match SubcatalogRepo::find_active_by_slug(pool, "misc").await.unwrap() {
        Some(s) => s,
        None => SubcatalogRepo::create(
            pool,
            &CreateSubcatalog {
                catalog_id: catalog.id,
                name_uz: "Turli".into(),
                name_ru: "Разное".into(),
                name_eng: "Misc".into(),
                slug: None,
                description_uz: None,
                description_ru: None,
                description_eng: None,
                image: None,
                is_active: None,
                sort_order: None,
            },
            "misc",
        )
        .await
        .unwrap(),
    };
    let slug = storefront_core::catalog::slugify(name);
    ProductRepo::create(
        pool,
        &CreateProduct {
            subcatalog_id: sub.id,
            name_uz: name.into(),
            name_ru: name.into(),
            name_eng: name.into(),
            slug: None,
            description_uz: None,
            description_ru: None,
            description_eng: None,
            short_description_uz: None,
            short_description_ru: None,
            short_description_eng: None,
            price,
            old_price: None,
            sku: None,
            stock: Some(stock),
            image: None,
            gallery: None,
            is_active: None,
            is_featured: None,
            sort_order: None,
        },
        &slug,
        &format!("SKU-{}", slug.to_uppercase()),
    )
    .await
    .unwrap()
    .id
}

fn new_order(user_id: i64, number: &str) -> CreateOrder {
    CreateOrder {
        order_number: number.to_string(),
        user_id,
        subtotal: Decimal::new(1000, 2),
        shipping_cost: Decimal::ZERO,
        tax: Decimal::ZERO,
        total: Decimal::new(1000, 2),
        payment_method: "cash".to_string(),
        shipping_name: "Ali".to_string(),
        shipping_phone: "+998901234567".to_string(),
        shipping_address: "Amir Temur 1".to_string(),
        shipping_city: "Tashkent".to_string(),
        shipping_region: None,
        shipping_postal_code: None,
        location_lat: None,
        location_lng: None,
        notes: None,
    }
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_cart_created_once_per_user(pool: PgPool) {
    let user = seed_user(&pool, "cart@test.com").await;
    assert!(CartRepo::find_by_user(&pool, user).await.unwrap().is_none());

    let first = CartRepo::get_or_create(&pool, user).await.unwrap();
    let second = CartRepo::get_or_create(&pool, user).await.unwrap();
    assert_eq!(first.id, second.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_quantity_merges_lines(pool: PgPool) {
    let user = seed_user(&pool, "merge@test.com").await;
    let product = seed_product(&pool, "Mug", Decimal::new(500, 2), 10).await;
    let cart = CartRepo::get_or_create(&pool, user).await.unwrap();

    CartRepo::add_quantity(&pool, cart.id, product, 2).await.unwrap();
    let item = CartRepo::add_quantity(&pool, cart.id, product, 3).await.unwrap();
    assert_eq!(item.quantity, 5);

    let lines = CartRepo::lines(&pool, cart.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].item_id, item.id);
    assert_eq!(lines[0].product.id, product);
    assert_eq!(CartRepo::count_lines(&pool, user).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_item_owner_is_reported(pool: PgPool) {
    let owner = seed_user(&pool, "owner@test.com").await;
    let product = seed_product(&pool, "Plate", Decimal::ONE, 10).await;
    let cart = CartRepo::get_or_create(&pool, owner).await.unwrap();
    let item = CartRepo::add_quantity(&pool, cart.id, product, 1).await.unwrap();

    let owned = CartRepo::find_item_with_owner(&pool, item.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(owned.owner_id, owner);
    assert_eq!(owned.item.quantity, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_clear_removes_every_line(pool: PgPool) {
    let user = seed_user(&pool, "clear@test.com").await;
    let a = seed_product(&pool, "Fork", Decimal::ONE, 5).await;
    let b = seed_product(&pool, "Knife", Decimal::ONE, 5).await;
    let cart = CartRepo::get_or_create(&pool, user).await.unwrap();
    CartRepo::add_quantity(&pool, cart.id, a, 1).await.unwrap();
    CartRepo::add_quantity(&pool, cart.id, b, 1).await.unwrap();

    assert_eq!(CartRepo::clear(&pool, cart.id).await.unwrap(), 2);
    assert_eq!(CartRepo::count_lines(&pool, user).await.unwrap(), 0);
    assert_eq!(ProductRepo::stock(&pool, a).await.unwrap(), Some(5));
}

// ---------------------------------------------------------------------------
// Stock
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_conditional_decrement(pool: PgPool) {
    let product = seed_product(&pool, "Lamp", Decimal::ONE, 3).await;
    let mut conn = pool.acquire().await.unwrap();

    assert!(ProductRepo::try_decrement_stock(&mut conn, product, 2).await.unwrap());
    assert!(!ProductRepo::try_decrement_stock(&mut conn, product, 2).await.unwrap());
    assert!(ProductRepo::try_decrement_stock(&mut conn, product, 1).await.unwrap());
    assert_eq!(ProductRepo::stock(&pool, product).await.unwrap(), Some(0));

    assert!(ProductRepo::increment_stock(&mut conn, product, 4).await.unwrap());
    assert_eq!(ProductRepo::stock(&pool, product).await.unwrap(), Some(4));
    assert!(!ProductRepo::increment_stock(&mut conn, product + 1000, 1).await.unwrap());
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_order_defaults_and_sequence(pool: PgPool) {
    let user = seed_user(&pool, "order@test.com").await;
    let mut tx = pool.begin().await.unwrap();
    let first = OrderRepo::next_order_sequence(&mut *tx).await.unwrap();
    let second = OrderRepo::next_order_sequence(&mut *tx).await.unwrap();
    assert!(second > first);

    let order = OrderRepo::create(&mut *tx, &new_order(user, "ORD-20250101-000001"))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.payment_status(), PaymentStatus::Pending);
    assert!(order.paid_at.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_item_snapshot_survives_product_delete(pool: PgPool) {
    let user = seed_user(&pool, "snapshot@test.com").await;
    let product = seed_product(&pool, "Vase", Decimal::new(2500, 2), 5).await;

    let mut conn = pool.acquire().await.unwrap();
    let order = OrderRepo::create(&mut conn, &new_order(user, "ORD-20250101-000002"))
        .await
        .unwrap();
    OrderRepo::add_item(
        &mut conn,
        &CreateOrderItem {
            order_id: order.id,
            product_id: product,
            product_name: "Vase".into(),
            product_sku: Some("SKU-VASE".into()),
            price: Decimal::new(2500, 2),
            quantity: 2,
            subtotal: Decimal::new(5000, 2),
        },
    )
    .await
    .unwrap();
    drop(conn);

    assert!(ProductRepo::delete(&pool, product).await.unwrap());

    let items = OrderRepo::items_for_orders(&pool, &[order.id]).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, None);
    assert_eq!(items[0].product_name, "Vase");
    assert_eq!(items[0].subtotal, Decimal::new(5000, 2));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_status_and_payment_timestamps(pool: PgPool) {
    let user = seed_user(&pool, "stamps@test.com").await;
    let mut conn = pool.acquire().await.unwrap();
    let order = OrderRepo::create(&mut conn, &new_order(user, "ORD-20250101-000003"))
        .await
        .unwrap();

    let confirmed = OrderRepo::update_status(&mut conn, order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    assert!(confirmed.shipped_at.is_none());

    let shipped = OrderRepo::update_status(&mut conn, order.id, OrderStatus::Shipped)
        .await
        .unwrap();
    assert!(shipped.shipped_at.is_some());
    assert!(shipped.delivered_at.is_none());

    let delivered = OrderRepo::update_status(&mut conn, order.id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(delivered.shipped_at, shipped.shipped_at);
    assert!(delivered.delivered_at.is_some());
    drop(conn);

    let paid = OrderRepo::update_payment(&pool, order.id, PaymentStatus::Paid, Some("txn-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(paid.payment_status(), PaymentStatus::Paid);
    assert_eq!(paid.payment_transaction_id.as_deref(), Some("txn-1"));
    assert!(paid.paid_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_orders_scoped_to_owner(pool: PgPool) {
    let alice = seed_user(&pool, "alice@test.com").await;
    let bob = seed_user(&pool, "bob@test.com").await;
    let mut conn = pool.acquire().await.unwrap();
    let order = OrderRepo::create(&mut conn, &new_order(alice, "ORD-20250101-000004"))
        .await
        .unwrap();
    drop(conn);

    assert!(OrderRepo::find_for_user(&pool, order.id, alice)
        .await
        .unwrap()
        .is_some());
    assert!(OrderRepo::find_for_user(&pool, order.id, bob)
        .await
        .unwrap()
        .is_none());
    assert_eq!(OrderRepo::count_for_user(&pool, bob).await.unwrap(), 0);
    assert_eq!(
        OrderRepo::count_all(&pool, Some(OrderStatus::Pending)).await.unwrap(),
        1
    );
    assert_eq!(
        OrderRepo::count_all(&pool, Some(OrderStatus::Cancelled)).await.unwrap(),
        0
    );
}

// ---------------------------------------------------------------------------
// Wishlist
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_wishlist_toggle(pool: PgPool) {
    let user = seed_user(&pool, "wish@test.com").await;
    let product = seed_product(&pool, "Scarf", Decimal::ONE, 1).await;

    assert!(WishlistRepo::toggle(&pool, user, product).await.unwrap());
    assert!(WishlistRepo::exists(&pool, user, product).await.unwrap());
    assert_eq!(WishlistRepo::product_ids(&pool, user).await.unwrap(), vec![product]);

    assert!(!WishlistRepo::toggle(&pool, user, product).await.unwrap());
    assert!(!WishlistRepo::exists(&pool, user, product).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_wishlist_add_is_idempotent(pool: PgPool) {
    let user = seed_user(&pool, "idem@test.com").await;
    let product = seed_product(&pool, "Hat", Decimal::ONE, 1).await;

    assert!(WishlistRepo::add(&pool, user, product).await.unwrap());
    assert!(!WishlistRepo::add(&pool, user, product).await.unwrap());
    assert_eq!(WishlistRepo::products(&pool, user).await.unwrap().len(), 1);
    assert!(WishlistRepo::remove(&pool, user, product).await.unwrap());
    assert!(!WishlistRepo::remove(&pool, user, product).await.unwrap());
}
