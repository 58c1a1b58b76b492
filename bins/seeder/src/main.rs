//! Database seeder for Tally development and testing.
//!
//! Seeds a demo client with one project, a demo collaborator, and one
//! document of each kind so every ledger has something to show. Re-running
//! skips rows that already exist.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use tally_db::entities::{
    clients, collaborator_payments, collaborators, collections, money_exchanges,
    payroll_payments, projects, proformas,
    sea_orm_active_enums::{DocumentStatus, TransactionType},
    tax_payments, transactions,
};
use tally_shared::AppConfig;
use uuid::Uuid;

/// Demo client ID (consistent for all seeds)
const DEMO_CLIENT_ID: Uuid = Uuid::from_u128(1);
/// Demo project ID
const DEMO_PROJECT_ID: Uuid = Uuid::from_u128(2);
/// Demo collaborator ID
const DEMO_COLLABORATOR_ID: Uuid = Uuid::from_u128(3);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    println!("Connecting to database...");
    let db = tally_db::connect(&config.database).await?;

    println!("Seeding counterparties...");
    seed_counterparties(&db).await?;

    println!("Seeding source documents...");
    seed_documents(&db).await?;

    println!("Seeding complete!");
    println!("  Client ledger:       /api/v1/clients/{DEMO_CLIENT_ID}/ledger?currency=USD");
    println!("  Collaborator ledger: /api/v1/collaborators/{DEMO_COLLABORATOR_ID}/ledger?currency=USD");
    Ok(())
}

fn at(date: NaiveDate, hour: u32) -> anyhow::Result<DateTime<FixedOffset>> {
    date.and_hms_opt(hour, 0, 0)
        .map(|naive| naive.and_utc().fixed_offset())
        .with_context(|| format!("invalid seed time {date} {hour}:00"))
}

fn day(d: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2026, 1, d).with_context(|| format!("invalid seed date 2026-01-{d}"))
}

/// Seeds the demo client, project and collaborator.
async fn seed_counterparties(db: &DatabaseConnection) -> Result<(), DbErr> {
    if clients::Entity::find_by_id(DEMO_CLIENT_ID).one(db).await?.is_some() {
        println!("  Demo counterparties already exist, skipping...");
        return Ok(());
    }

    clients::ActiveModel {
        id: Set(DEMO_CLIENT_ID),
        name: Set("Acme Corp".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    projects::ActiveModel {
        id: Set(DEMO_PROJECT_ID),
        client_id: Set(Some(DEMO_CLIENT_ID)),
        name: Set("Website Redesign".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    collaborators::ActiveModel {
        id: Set(DEMO_COLLABORATOR_ID),
        name: Set("Dana Reyes".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    println!("  Created client, project and collaborator");
    Ok(())
}

/// Seeds one document of each kind, plus a pending transaction that every
/// ledger must ignore.
async fn seed_documents(db: &DatabaseConnection) -> anyhow::Result<()> {
    if transactions::Entity::find_by_id(Uuid::from_u128(100))
        .one(db)
        .await?
        .is_some()
    {
        println!("  Demo documents already exist, skipping...");
        return Ok(());
    }

    transactions::ActiveModel {
        id: Set(Uuid::from_u128(100)),
        status: Set(DocumentStatus::Issued),
        transaction_type: Set(TransactionType::Income),
        description: Set("Bank interest".to_string()),
        currency: Set("USD".to_string()),
        total: Set(dec!(12.35)),
        issued_at: Set(Some(at(day(2)?, 9)?)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    transactions::ActiveModel {
        id: Set(Uuid::from_u128(101)),
        status: Set(DocumentStatus::Pending),
        transaction_type: Set(TransactionType::Outcome),
        description: Set("Office rent (draft)".to_string()),
        currency: Set("USD".to_string()),
        total: Set(dec!(900)),
        issued_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    proformas::ActiveModel {
        id: Set(Uuid::from_u128(200)),
        project_id: Set(Some(DEMO_PROJECT_ID)),
        status: Set(DocumentStatus::Issued),
        currency: Set("USD".to_string()),
        total: Set(dec!(5000)),
        start_date: Set(day(1)?),
        end_date: Set(day(31)?),
        issued_at: Set(Some(day(3)?)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    collections::ActiveModel {
        id: Set(Uuid::from_u128(300)),
        project_id: Set(Some(DEMO_PROJECT_ID)),
        status: Set(DocumentStatus::Confirmed),
        currency: Set("USD".to_string()),
        total: Set(dec!(5000)),
        commission: Set(Some(dec!(150))),
        taxes: Set(Some(dec!(800))),
        confirmed_at: Set(Some(at(day(12)?, 15)?)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    collaborator_payments::ActiveModel {
        id: Set(Uuid::from_u128(400)),
        collaborator_id: Set(Some(DEMO_COLLABORATOR_ID)),
        status: Set(DocumentStatus::Paid),
        currency: Set("USD".to_string()),
        gross_amount: Set(dec!(1200)),
        net_amount: Set(dec!(1080)),
        paid_at: Set(Some(at(day(15)?, 10)?)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    money_exchanges::ActiveModel {
        id: Set(Uuid::from_u128(500)),
        status: Set(DocumentStatus::Confirmed),
        from_currency: Set("USD".to_string()),
        from_amount: Set(dec!(1000)),
        from_taxes: Set(Some(dec!(4.5))),
        to_currency: Set("EUR".to_string()),
        to_amount: Set(dec!(918.40)),
        to_taxes: Set(None),
        confirmed_at: Set(Some(at(day(20)?, 11)?)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    payroll_payments::ActiveModel {
        id: Set(Uuid::from_u128(600)),
        collaborator_id: Set(Some(DEMO_COLLABORATOR_ID)),
        status: Set(DocumentStatus::Paid),
        currency: Set("USD".to_string()),
        net_salary: Set(dec!(2500)),
        taxes: Set(Some(dec!(310.25))),
        commission: Set(Some(dec!(200))),
        pension_amount: Set(Some(dec!(125))),
        paid_at: Set(Some(day(30)?)),
        pension_paid_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tax_payments::ActiveModel {
        id: Set(Uuid::from_u128(700)),
        status: Set(DocumentStatus::Paid),
        year: Set(2025),
        month: Set(12),
        currency: Set("USD".to_string()),
        total: Set(dec!(640)),
        taxes: Set(Some(dec!(12))),
        paid_at: Set(Some(day(17)?)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    println!("  Created 8 documents");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_dates() {
        assert_eq!(day(31).unwrap(), NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
        assert_eq!(at(day(2).unwrap(), 9).unwrap().to_rfc3339(), "2026-01-02T09:00:00+00:00");
    }

    #[test]
    fn test_invalid_seed_date_is_an_error() {
        let err = day(32).unwrap_err();
        assert_eq!(err.to_string(), "invalid seed date 2026-01-32");
        assert!(at(day(1).unwrap(), 24).is_err());
    }
}
