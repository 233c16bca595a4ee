//! Demo data seeder for Bankly development.
//!
//! Registers a demo customer with a funded checking account and an empty
//! savings account. Running it twice leaves the existing customer alone.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use rust_decimal::Decimal;
use tracing::info;

use bankly_core::Bank;
use bankly_core::auth::Argon2Hasher;
use bankly_core::customer::Registration;
use bankly_core::ledger::AccountType;
use bankly_shared::AppConfig;

const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "demo-password";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bankly=info,seeder=info".into()),
        )
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    anyhow::ensure!(
        !config.database.is_in_memory(),
        "seeding needs a PostgreSQL database.url"
    );

    let db = bankly_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let bank = Bank::new(bankly_db::stores(&db), Arc::new(Argon2Hasher));

    if bank.customers.exists_by_username(DEMO_USERNAME).await? {
        info!(username = DEMO_USERNAME, "demo customer already exists, skipping");
        return Ok(());
    }

    let customer = bank
        .customers
        .register(Registration {
            username: DEMO_USERNAME.to_string(),
            password: DEMO_PASSWORD.to_string(),
            full_name: "Demo Customer".to_string(),
            email: Some("demo@bankly.dev".to_string()),
        })
        .await?;

    let checking = bank
        .accounts
        .open(customer.id, AccountType::Checking)
        .await?;
    let savings = bank.accounts.open(customer.id, AccountType::Savings).await?;

    bank.ledger
        .deposit(
            &checking.account_number,
            Decimal::new(100_000, 2),
            "Opening deposit",
        )
        .await?;
    bank.ledger
        .transfer(
            &checking.account_number,
            &savings.account_number,
            Decimal::new(25_000, 2),
            "Savings",
        )
        .await?;

    info!(
        username = DEMO_USERNAME,
        checking = %checking.account_number,
        savings = %savings.account_number,
        "seeding complete"
    );
    Ok(())
}
