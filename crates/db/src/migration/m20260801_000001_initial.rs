//! Initial database migration.
//!
//! Creates the enums, tables, and constraints for the ledger subsystem:
//! companies, contacts, catalog, chart of accounts, analytic accounts and
//! rules, documents, payments, and the journal.

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
        // PART 2: COMPANIES & CONTACTS
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(CONTACTS_SQL).await?;

        // ============================================================
        // PART 3: PRODUCT CATALOG
        // ============================================================
        db.execute_unprepared(CATALOG_SQL).await?;

        // ============================================================
        // PART 4: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(GL_ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 5: ANALYTIC ACCOUNTS & AUTO-ASSIGNMENT RULES
        // ============================================================
        db.execute_unprepared(ANALYTIC_SQL).await?;

        // ============================================================
        // PART 6: DOCUMENTS
        // ============================================================
        db.execute_unprepared(DOCUMENTS_SQL).await?;

        // ============================================================
        // PART 7: PAYMENTS & ALLOCATIONS
        // ============================================================
        db.execute_unprepared(PAYMENTS_SQL).await?;

        // ============================================================
        // PART 8: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_SQL).await?;

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
-- Account classification
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'income',
    'expense'
);

-- Commercial document types
CREATE TYPE doc_type AS ENUM (
    'sales_order',
    'purchase_order',
    'customer_invoice',
    'vendor_bill'
);

-- Document lifecycle
CREATE TYPE document_status AS ENUM ('draft', 'posted', 'cancelled');

-- Derived payment progress
CREATE TYPE payment_state AS ENUM ('not_paid', 'partially_paid', 'paid');

-- Payment direction
CREATE TYPE payment_direction AS ENUM ('inbound', 'outbound');

-- Payment lifecycle
CREATE TYPE payment_status AS ENUM ('draft', 'posted', 'void');

-- Allocation target kind
CREATE TYPE allocation_target_type AS ENUM ('customer_invoice', 'vendor_bill');

-- Journal entry lifecycle
CREATE TYPE journal_status AS ENUM ('draft', 'posted');

-- Journal source document types. Order labels were added after the first
-- release; the poster detects their presence at startup and falls back to
-- 'manual' with a memo prefix on older databases.
CREATE TYPE journal_source_type AS ENUM (
    'manual',
    'customer_invoice',
    'vendor_bill',
    'payment',
    'sales_order',
    'purchase_order'
);
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CONTACTS_SQL: &str = r"
CREATE TABLE contacts (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_contacts_company ON contacts(company_id);

CREATE TABLE contact_tags (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (company_id, name)
);

CREATE TABLE contact_tag_links (
    id UUID PRIMARY KEY,
    contact_id UUID NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
    tag_id UUID NOT NULL REFERENCES contact_tags(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (contact_id, tag_id)
);

CREATE INDEX idx_contact_tag_links_contact ON contact_tag_links(contact_id);
";

const CATALOG_SQL: &str = r"
CREATE TABLE product_categories (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE products (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    category_id UUID REFERENCES product_categories(id) ON DELETE SET NULL,
    name VARCHAR(255) NOT NULL,
    list_price NUMERIC(18, 4) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_products_company ON products(company_id);
";

const GL_ACCOUNTS_SQL: &str = r"
CREATE TABLE gl_accounts (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    -- The resolver's upsert races on this; never read-then-write.
    UNIQUE (company_id, code)
);
";

const ANALYTIC_SQL: &str = r"
CREATE TABLE analytic_accounts (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (company_id, code)
);

CREATE TABLE auto_analytic_models (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    priority SMALLINT NOT NULL DEFAULT 10,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_auto_analytic_models_company
    ON auto_analytic_models(company_id, priority);

CREATE TABLE auto_analytic_rules (
    id UUID PRIMARY KEY,
    model_id UUID NOT NULL REFERENCES auto_analytic_models(id) ON DELETE CASCADE,
    doc_type doc_type NOT NULL,
    match_product_id UUID REFERENCES products(id) ON DELETE CASCADE,
    match_category_id UUID REFERENCES product_categories(id) ON DELETE CASCADE,
    match_contact_id UUID REFERENCES contacts(id) ON DELETE CASCADE,
    match_contact_tag_id UUID REFERENCES contact_tags(id) ON DELETE CASCADE,
    assign_analytic_account_id UUID NOT NULL REFERENCES analytic_accounts(id),
    rule_priority SMALLINT NOT NULL DEFAULT 10,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_auto_analytic_rules_model
    ON auto_analytic_rules(model_id, doc_type, rule_priority);
";

const DOCUMENTS_SQL: &str = r"
CREATE TABLE documents (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    doc_type doc_type NOT NULL,
    contact_id UUID REFERENCES contacts(id),
    currency VARCHAR(3) NOT NULL,
    status document_status NOT NULL DEFAULT 'draft',
    document_date DATE NOT NULL,
    reference VARCHAR(100),
    total_amount NUMERIC(18, 4) NOT NULL DEFAULT 0,
    paid_amount NUMERIC(18, 4) NOT NULL DEFAULT 0,
    payment_state payment_state NOT NULL DEFAULT 'not_paid',
    memo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT documents_paid_within_total CHECK (paid_amount <= total_amount)
);

CREATE INDEX idx_documents_company_type ON documents(company_id, doc_type, status);

CREATE TABLE document_lines (
    id UUID PRIMARY KEY,
    document_id UUID NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    product_id UUID REFERENCES products(id),
    description TEXT,
    qty NUMERIC(18, 4) NOT NULL,
    unit_price NUMERIC(18, 4) NOT NULL,
    tax_rate NUMERIC(5, 2) NOT NULL DEFAULT 0,
    line_total NUMERIC(18, 4) NOT NULL,
    gl_account_id UUID REFERENCES gl_accounts(id),
    analytic_account_id UUID REFERENCES analytic_accounts(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (document_id, line_no)
);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    direction payment_direction NOT NULL,
    contact_id UUID NOT NULL REFERENCES contacts(id),
    amount NUMERIC(18, 4) NOT NULL,
    currency VARCHAR(3) NOT NULL,
    payment_date DATE NOT NULL,
    status payment_status NOT NULL DEFAULT 'draft',
    memo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT payments_amount_positive CHECK (amount > 0)
);

CREATE TABLE payment_allocations (
    id UUID PRIMARY KEY,
    payment_id UUID NOT NULL REFERENCES payments(id) ON DELETE CASCADE,
    target_type allocation_target_type NOT NULL,
    target_id UUID NOT NULL REFERENCES documents(id),
    amount NUMERIC(18, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT payment_allocations_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_payment_allocations_target ON payment_allocations(target_id);
CREATE INDEX idx_payment_allocations_payment ON payment_allocations(payment_id);
";

const JOURNAL_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    entry_date DATE NOT NULL,
    status journal_status NOT NULL DEFAULT 'posted',
    source_type journal_source_type NOT NULL DEFAULT 'manual',
    source_id UUID,
    memo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Idempotent posting: at most one entry per source document.
CREATE UNIQUE INDEX uq_journal_entries_source
    ON journal_entries(company_id, source_type, source_id)
    WHERE source_id IS NOT NULL;

CREATE INDEX idx_journal_entries_company_date
    ON journal_entries(company_id, entry_date);

CREATE TABLE journal_lines (
    id UUID PRIMARY KEY,
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    gl_account_id UUID NOT NULL REFERENCES gl_accounts(id),
    analytic_account_id UUID REFERENCES analytic_accounts(id),
    contact_id UUID REFERENCES contacts(id),
    product_id UUID REFERENCES products(id),
    debit NUMERIC(18, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(18, 4) NOT NULL DEFAULT 0,
    memo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (entry_id, line_no),
    CONSTRAINT journal_lines_amounts_non_negative CHECK (debit >= 0 AND credit >= 0),
    CONSTRAINT journal_lines_one_sided CHECK (NOT (debit > 0 AND credit > 0))
);

CREATE INDEX idx_journal_lines_account ON journal_lines(gl_account_id);
CREATE INDEX idx_journal_lines_analytic ON journal_lines(analytic_account_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS payment_allocations CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS document_lines CASCADE;
DROP TABLE IF EXISTS documents CASCADE;
DROP TABLE IF EXISTS auto_analytic_rules CASCADE;
DROP TABLE IF EXISTS auto_analytic_models CASCADE;
DROP TABLE IF EXISTS analytic_accounts CASCADE;
DROP TABLE IF EXISTS gl_accounts CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS product_categories CASCADE;
DROP TABLE IF EXISTS contact_tag_links CASCADE;
DROP TABLE IF EXISTS contact_tags CASCADE;
DROP TABLE IF EXISTS contacts CASCADE;
DROP TABLE IF EXISTS companies CASCADE;

DROP TYPE IF EXISTS journal_source_type;
DROP TYPE IF EXISTS journal_status;
DROP TYPE IF EXISTS allocation_target_type;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS payment_direction;
DROP TYPE IF EXISTS payment_state;
DROP TYPE IF EXISTS document_status;
DROP TYPE IF EXISTS doc_type;
DROP TYPE IF EXISTS account_type;
";
