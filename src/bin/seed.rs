use petcare_marketplace::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    models::{ROLE_ADMIN, ROLE_USER},
    services::auth_service::hash_password,
};
use uuid::Uuid;

const STORE_EMAIL: &str = "owner@petshop.example.com";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin12345", ROLE_ADMIN).await?;
    let owner_id = ensure_user(&pool, STORE_EMAIL, "owner12345", ROLE_USER).await?;
    let customer_id = ensure_user(&pool, "customer@example.com", "customer123", ROLE_USER).await?;

    let food = ensure_category(&pool, "Food", "Dry and wet food").await?;
    let grooming = ensure_category(&pool, "Grooming", "Bath and grooming services").await?;
    ensure_category(&pool, "Toys", "Toys and accessories").await?;

    let store_id = ensure_store(&pool).await?;
    seed_products(&pool, store_id, food, grooming).await?;

    println!(
        "Seed completed. Admin: {admin_id}, store owner: {owner_id}, customer: {customer_id}, store: {store_id}"
    );
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn ensure_category(
    pool: &sqlx::PgPool,
    name: &str,
    description: &str,
) -> anyhow::Result<Uuid> {
    sqlx::query(
        r#"
        INSERT INTO categories (id, name, description)
        VALUES ($1, $2, $3)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .execute(pool)
    .await?;

    let (id,): (Uuid,) = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn ensure_store(pool: &sqlx::PgPool) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM stores WHERE email = $1")
        .bind(STORE_EMAIL)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO stores (
            id, name, address, description, phone, opening_time, closing_time,
            emergency_service, email, latitude, longitude
        )
        VALUES ($1, $2, $3, $4, $5, '08:00', '20:00', TRUE, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind("Happy Paws")
    .bind("Av. Paulista, 1000 - Sao Paulo")
    .bind("Pet shop with grooming and a 24h vet")
    .bind("(11) 4000-1000")
    .bind(STORE_EMAIL)
    .bind(-23.5614_f64)
    .bind(-46.6559_f64)
    .fetch_one(pool)
    .await?;

    println!("Seeded store {id}");
    Ok(id)
}

async fn seed_products(
    pool: &sqlx::PgPool,
    store_id: Uuid,
    food: Uuid,
    grooming: Uuid,
) -> anyhow::Result<()> {
    let products = vec![
        ("Premium Dog Food 15kg", food, "dog", 18990_i64, 30),
        ("Cat Food 10kg", food, "cat", 12990, 25),
        ("Bath and Grooming", grooming, "all", 7000, 0),
    ];

    for (name, category_id, animal, price, stock) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, store_id, category_id, name, price, stock, animal)
            SELECT $1, $2, $3, $4, $5, $6, $7
            WHERE NOT EXISTS (
                SELECT 1 FROM products WHERE store_id = $2 AND name = $4
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(store_id)
        .bind(category_id)
        .bind(name)
        .bind(price)
        .bind(stock)
        .bind(animal)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
