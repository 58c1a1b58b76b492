//! Source document tables read by the ledger reports.
//!
//! Creates the counterparty tables, the shared status enums and one table per
//! document kind, with partial indexes on the finalization columns.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: COUNTERPARTIES
        // ============================================================
        db.execute_unprepared(COUNTERPARTIES_SQL).await?;

        // ============================================================
        // PART 3: SOURCE DOCUMENTS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(COLLECTIONS_SQL).await?;
        db.execute_unprepared(COLLABORATOR_PAYMENTS_SQL).await?;
        db.execute_unprepared(MONEY_EXCHANGES_SQL).await?;
        db.execute_unprepared(PAYROLL_PAYMENTS_SQL).await?;
        db.execute_unprepared(TAX_PAYMENTS_SQL).await?;
        db.execute_unprepared(PROFORMAS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Lifecycle status shared by every document kind
CREATE TYPE document_status AS ENUM (
    'pending',
    'issued',
    'confirmed',
    'paid',
    'pension_paid',
    'canceled'
);

-- Declared direction of a bank transaction
CREATE TYPE transaction_type AS ENUM ('income', 'outcome');
";

const COUNTERPARTIES_SQL: &str = r"
CREATE TABLE clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE projects (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID REFERENCES clients(id) ON DELETE SET NULL,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_projects_client ON projects(client_id);

CREATE TABLE collaborators (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    status document_status NOT NULL DEFAULT 'pending',
    transaction_type transaction_type NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    currency VARCHAR(3) NOT NULL,
    total NUMERIC(19, 4) NOT NULL,
    issued_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_transactions_issued ON transactions(currency, issued_at)
    WHERE status = 'issued';
";

const COLLECTIONS_SQL: &str = r"
CREATE TABLE collections (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID REFERENCES projects(id) ON DELETE SET NULL,
    status document_status NOT NULL DEFAULT 'pending',
    currency VARCHAR(3) NOT NULL,
    total NUMERIC(19, 4) NOT NULL,
    commission NUMERIC(19, 4),
    taxes NUMERIC(19, 4),
    confirmed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_collections_confirmed ON collections(currency, confirmed_at)
    WHERE status = 'confirmed';
CREATE INDEX idx_collections_project ON collections(project_id);
";

const COLLABORATOR_PAYMENTS_SQL: &str = r"
CREATE TABLE collaborator_payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    collaborator_id UUID REFERENCES collaborators(id) ON DELETE SET NULL,
    status document_status NOT NULL DEFAULT 'pending',
    currency VARCHAR(3) NOT NULL,
    gross_amount NUMERIC(19, 4) NOT NULL,
    net_amount NUMERIC(19, 4) NOT NULL,
    paid_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_collaborator_payments_paid ON collaborator_payments(currency, paid_at)
    WHERE status = 'paid';
CREATE INDEX idx_collaborator_payments_collaborator ON collaborator_payments(collaborator_id);
";

const MONEY_EXCHANGES_SQL: &str = r"
CREATE TABLE money_exchanges (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    status document_status NOT NULL DEFAULT 'pending',
    from_currency VARCHAR(3) NOT NULL,
    from_amount NUMERIC(19, 4) NOT NULL,
    from_taxes NUMERIC(19, 4),
    to_currency VARCHAR(3) NOT NULL,
    to_amount NUMERIC(19, 4) NOT NULL,
    to_taxes NUMERIC(19, 4),
    confirmed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_money_exchanges_confirmed ON money_exchanges(confirmed_at)
    WHERE status = 'confirmed';
";

const PAYROLL_PAYMENTS_SQL: &str = r"
CREATE TABLE payroll_payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    collaborator_id UUID REFERENCES collaborators(id) ON DELETE SET NULL,
    status document_status NOT NULL DEFAULT 'pending',
    currency VARCHAR(3) NOT NULL,
    net_salary NUMERIC(19, 4) NOT NULL,
    taxes NUMERIC(19, 4),
    commission NUMERIC(19, 4),
    pension_amount NUMERIC(19, 4),
    paid_at DATE,
    pension_paid_at DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_payroll_payments_paid ON payroll_payments(currency, paid_at)
    WHERE status = 'paid';
CREATE INDEX idx_payroll_payments_pension ON payroll_payments(currency, pension_paid_at)
    WHERE status = 'pension_paid';
CREATE INDEX idx_payroll_payments_collaborator ON payroll_payments(collaborator_id);
";

const TAX_PAYMENTS_SQL: &str = r"
CREATE TABLE tax_payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    status document_status NOT NULL DEFAULT 'pending',
    year INTEGER NOT NULL,
    month INTEGER NOT NULL,
    currency VARCHAR(3) NOT NULL,
    total NUMERIC(19, 4) NOT NULL,
    taxes NUMERIC(19, 4),
    paid_at DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_tax_payments_month CHECK (month BETWEEN 1 AND 12)
);

CREATE INDEX idx_tax_payments_paid ON tax_payments(currency, paid_at)
    WHERE status = 'paid';
";

const PROFORMAS_SQL: &str = r"
CREATE TABLE proformas (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID REFERENCES projects(id) ON DELETE SET NULL,
    status document_status NOT NULL DEFAULT 'pending',
    currency VARCHAR(3) NOT NULL,
    total NUMERIC(19, 4) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    issued_at DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_proformas_period CHECK (start_date <= end_date)
);

CREATE INDEX idx_proformas_issued ON proformas(currency, issued_at)
    WHERE status = 'issued';
CREATE INDEX idx_proformas_project ON proformas(project_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS proformas CASCADE;
DROP TABLE IF EXISTS tax_payments CASCADE;
DROP TABLE IF EXISTS payroll_payments CASCADE;
DROP TABLE IF EXISTS money_exchanges CASCADE;
DROP TABLE IF EXISTS collaborator_payments CASCADE;
DROP TABLE IF EXISTS collections CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS collaborators CASCADE;
DROP TABLE IF EXISTS projects CASCADE;
DROP TABLE IF EXISTS clients CASCADE;
DROP TYPE IF EXISTS transaction_type;
DROP TYPE IF EXISTS document_status;
";
