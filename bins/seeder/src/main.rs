//! Database seeder for Domus development and testing.
//!
//! Seeds an admin, one building with a manager, a resident and a verified
//! business owner, a funded wallet, a monthly subscription and a few FAQ
//! entries. Every seeded account uses the password `password123`.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use domus_core::{
    auth::{AccountRole, hash_password},
    billing::SubscriptionTerms,
    profile::ResidentType,
};
use domus_db::{
    BuildingRepository, FaqRepository, SubscriptionRepository, UserRepository, WalletRepository,
    entities::users,
    repositories::CreateUserInput,
};

const SEED_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = domus_db::connect_url(&database_url)
        .await
        .context("Failed to connect to database")?;

    if UserRepository::new(db.clone())
        .find_by_username("admin")
        .await?
        .is_some()
    {
        println!("Database already seeded, skipping...");
        return Ok(());
    }

    let password_hash = hash_password(SEED_PASSWORD).context("Failed to hash seed password")?;

    println!("Seeding users...");
    let admin = seed_user(&db, "admin", AccountRole::Resident, true, &password_hash).await?;
    let manager = seed_user(&db, "manager", AccountRole::Resident, false, &password_hash).await?;
    let resident = seed_user(&db, "resident", AccountRole::Resident, false, &password_hash).await?;
    let business = seed_user(&db, "business", AccountRole::Business, false, &password_hash).await?;
    println!("  admin id={}", admin.id);

    println!("Seeding building...");
    let buildings = BuildingRepository::new(db.clone());
    let building = buildings.create("Maple Court", "12 Maple Avenue").await?;
    let manager_profile = buildings.register_manager(building.id, manager.id).await?;
    buildings.verify_manager(manager_profile.id).await?;
    buildings
        .add_resident(building.id, resident.id, ResidentType::Tenant)
        .await?;
    let owner = buildings
        .create_business_owner(business.id, "Spotless Cleaning")
        .await?;
    buildings.verify_business_owner(owner.id).await?;

    println!("Seeding wallet and subscription...");
    WalletRepository::new(db.clone())
        .deposit(resident.id, Decimal::from(100))
        .await?;

    let terms = SubscriptionTerms::new(
        Decimal::from(80),
        NaiveDate::from_ymd_opt(2026, 1, 1).context("invalid start date")?,
        NaiveDate::from_ymd_opt(2026, 12, 31).context("invalid end date")?,
    )?;
    SubscriptionRepository::new(db.clone())
        .create(building.id, resident.id, &terms)
        .await?;

    println!("Seeding FAQ...");
    let faqs = FaqRepository::new(db.clone());
    faqs.create(
        "How do I top up my wallet?",
        "Use the wallet page to charge any amount.",
    )
    .await?;
    faqs.create(
        "Who fixes a leaking tap?",
        "Report an issue; your building manager will pick it up.",
    )
    .await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_user(
    db: &DatabaseConnection,
    username: &str,
    role: AccountRole,
    is_admin: bool,
    password_hash: &str,
) -> anyhow::Result<users::Model> {
    let (user, _wallet) = UserRepository::new(db.clone())
        .create_with_wallet(CreateUserInput {
            username: username.to_string(),
            email: Some(format!("{username}@domus.dev")),
            password_hash: password_hash.to_string(),
            role,
            is_admin,
        })
        .await?;
    println!("  {username} created");
    Ok(user)
}
