//! Router tests for the ledger endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, NaiveDate};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tally_api::{AppState, create_router};
use tally_core::ledger::{
    CollaboratorPaymentDocument, CollectionDocument, DocumentKind, DocumentStatus, EntryClass,
    FinalizationStamp, InMemorySource, LedgerService, MoneyExchangeDocument, SourceDocument,
    TransactionDocument,
};
use tally_shared::types::{ClientId, CollaboratorId};
use tower::ServiceExt;
use uuid::Uuid;

fn app(source: InMemorySource) -> axum::Router {
    create_router(AppState {
        ledger: Arc::new(LedgerService::new(Arc::new(source), Duration::from_secs(5))),
    })
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn transaction() -> SourceDocument {
    SourceDocument::Transaction(TransactionDocument {
        id: Uuid::new_v4(),
        status: DocumentStatus::Issued,
        direction: EntryClass::Income,
        description: "Consulting fee".to_string(),
        currency: "USD".to_string(),
        total: dec!(150),
        issued_at: Some(FinalizationStamp::DateTime(
            DateTime::parse_from_rfc3339("2024-01-05T12:00:00Z").unwrap(),
        )),
    })
}

fn collection() -> SourceDocument {
    SourceDocument::Collection(CollectionDocument {
        id: Uuid::new_v4(),
        status: DocumentStatus::Confirmed,
        currency: "USD".to_string(),
        total: dec!(200),
        commission: Some(dec!(20)),
        taxes: Some(dec!(5)),
        confirmed_at: Some(FinalizationStamp::Text("2024-01-03T09:15:00.000Z".to_string())),
        client_name: Some("Acme".to_string()),
    })
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(InMemorySource::new()), "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_bank_ledger() {
    let source = InMemorySource::new()
        .with_document(transaction())
        .with_client_document(ClientId::new(), collection());

    let (status, body) = get(
        app(source),
        "/api/v1/ledgers/bank?currency=USD&startDate=2024-01-01&endDate=2024-01-31",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "entries": [
                {
                    "issuedAt": "2024-01-03",
                    "type": "Income",
                    "description": "Collection for Acme",
                    "total": 200.0,
                    "taxes": -5.0,
                    "balance": 195.0
                },
                {
                    "issuedAt": "2024-01-03",
                    "type": "Outcome",
                    "description": "Commission's collection for Acme",
                    "total": -20.0,
                    "taxes": 0.0,
                    "balance": 175.0
                },
                {
                    "issuedAt": "2024-01-05",
                    "type": "Income",
                    "description": "Consulting fee",
                    "total": 150.0,
                    "taxes": 0.0,
                    "balance": 325.0
                }
            ],
            "finalBalance": 325.0
        })
    );
}

#[tokio::test]
async fn test_bank_ledger_per_exchange_leg() {
    let exchange = SourceDocument::MoneyExchange(MoneyExchangeDocument {
        id: Uuid::new_v4(),
        status: DocumentStatus::Confirmed,
        from_currency: "USD".to_string(),
        from_amount: dec!(100),
        from_taxes: None,
        to_currency: "EUR".to_string(),
        to_amount: dec!(90),
        to_taxes: None,
        confirmed_at: Some(FinalizationStamp::Date(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )),
    });
    let source = InMemorySource::new().with_document(exchange);
    let app = app(source);

    let (_, usd) = get(app.clone(), "/api/v1/ledgers/bank?currency=USD").await;
    assert_eq!(usd["entries"][0]["total"], json!(-100.0));
    assert_eq!(usd["entries"][0]["description"], "Exchange from USD");

    let (_, eur) = get(app, "/api/v1/ledgers/bank?currency=EUR").await;
    assert_eq!(eur["entries"][0]["total"], json!(90.0));
    assert_eq!(eur["finalBalance"], json!(90.0));
}

#[tokio::test]
async fn test_empty_ledger() {
    let (status, body) = get(app(InMemorySource::new()), "/api/v1/ledgers/bank?currency=GBP").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "entries": [], "finalBalance": 0.0 }));
}

#[tokio::test]
async fn test_client_ledger_uses_amount() {
    let acme = ClientId::new();
    let source = InMemorySource::new()
        .with_client_document(acme, collection())
        .with_document(transaction());

    let (status, body) = get(
        app(source),
        &format!("/api/v1/clients/{acme}/ledger?currency=USD"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["amount"], json!(200.0));
    assert!(entries[0].get("taxes").is_none());
    assert_eq!(body["finalBalance"], json!(200.0));
}

#[tokio::test]
async fn test_collaborator_ledger() {
    let dana = CollaboratorId::new();
    let payment = SourceDocument::CollaboratorPayment(CollaboratorPaymentDocument {
        id: Uuid::new_v4(),
        status: DocumentStatus::Paid,
        currency: "USD".to_string(),
        gross_amount: dec!(500),
        net_amount: dec!(450),
        paid_at: Some(FinalizationStamp::Date(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        )),
        collaborator_name: None,
    });
    let source = InMemorySource::new().with_collaborator_document(dana, payment);

    let (status, body) = get(
        app(source),
        &format!("/api/v1/collaborators/{dana}/ledger?currency=USD"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entries"][0]["type"], "Outcome");
    assert_eq!(body["entries"][0]["amount"], json!(-450.0));
    assert_eq!(body["finalBalance"], json!(-450.0));
}

#[tokio::test]
async fn test_validation_errors() {
    let cases = [
        "/api/v1/ledgers/bank",
        "/api/v1/ledgers/bank?currency=DOLLARS",
        "/api/v1/ledgers/bank?currency=USD&startDate=yesterday",
        "/api/v1/ledgers/bank?currency=USD&startDate=2024-02-01&endDate=2024-01-01",
        "/api/v1/clients/not-a-uuid/ledger?currency=USD",
        "/api/v1/ledgers/bank?currency=USD&currency=EUR",
        "/api/v1/collaborators/00000000-0000-0000-0000-000000000001/ledger?currency=USD&endDate=2024-01-01&endDate=2024-01-31",
    ];
    for uri in cases {
        let (status, body) = get(app(InMemorySource::new()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "VALIDATION_ERROR", "{uri}");
    }
}

#[tokio::test]
async fn test_failed_read_is_database_error() {
    let source = InMemorySource::new()
        .with_document(transaction())
        .failing_on(DocumentKind::Payroll);

    let (status, body) = get(app(source), "/api/v1/ledgers/bank?currency=USD").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "DATABASE_ERROR");
    assert!(body.get("entries").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_timeout() {
    let source = InMemorySource::new().with_delay(Duration::from_secs(60));
    let app = create_router(AppState {
        ledger: Arc::new(LedgerService::new(Arc::new(source), Duration::from_secs(1))),
    });

    let (status, body) = get(app, "/api/v1/ledgers/bank?currency=USD").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "TIMEOUT");
}
