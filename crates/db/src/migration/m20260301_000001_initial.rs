//! Initial database migration.
//!
//! Creates the enums, account and building tables, the service catalog, the
//! wallet and payment ledger, and the engagement tables.

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
        // PART 2: ACCOUNTS & BUILDINGS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(BUILDINGS_SQL).await?;
        db.execute_unprepared(PROFILES_SQL).await?;
        db.execute_unprepared(CONTRACTS_SQL).await?;

        // ============================================================
        // PART 3: SERVICE CATALOG
        // ============================================================
        db.execute_unprepared(SERVICES_SQL).await?;

        // ============================================================
        // PART 4: WALLETS & PAYMENTS
        // ============================================================
        db.execute_unprepared(WALLETS_SQL).await?;
        db.execute_unprepared(SUBSCRIPTIONS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;

        // ============================================================
        // PART 5: ENGAGEMENT
        // ============================================================
        db.execute_unprepared(ENGAGEMENT_SQL).await?;
        db.execute_unprepared(FAQS_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL DEFINITIONS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_role AS ENUM ('resident', 'manager', 'business');

CREATE TYPE resident_type AS ENUM ('owner', 'tenant', 'visitor');

CREATE TYPE contract_status AS ENUM ('pending', 'approved');

CREATE TYPE request_status AS ENUM ('pending', 'approved', 'completed', 'cancelled');

CREATE TYPE bill_type AS ENUM ('electricity', 'water', 'gas');

CREATE TYPE audience AS ENUM ('all', 'residents', 'managers', 'businesses');

CREATE TYPE notification_status AS ENUM ('sent', 'failed');

CREATE TYPE issue_status AS ENUM ('open', 'in_progress', 'resolved');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id BIGSERIAL PRIMARY KEY,
    username VARCHAR(150) NOT NULL UNIQUE,
    email VARCHAR(254),
    password_hash VARCHAR(255) NOT NULL,
    role account_role NOT NULL DEFAULT 'resident',
    is_admin BOOLEAN NOT NULL DEFAULT false,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_role ON users(role);
";

const BUILDINGS_SQL: &str = r"
CREATE TABLE buildings (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    address TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PROFILES_SQL: &str = r"
CREATE TABLE residents (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    building_id BIGINT NOT NULL REFERENCES buildings(id) ON DELETE CASCADE,
    resident_type resident_type NOT NULL DEFAULT 'tenant',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_residents_building ON residents(building_id);

CREATE TABLE building_managers (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    building_id BIGINT NOT NULL UNIQUE REFERENCES buildings(id) ON DELETE CASCADE,
    verified BOOLEAN NOT NULL DEFAULT false,
    approved_by_admin BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE management_transfer_requests (
    id BIGSERIAL PRIMARY KEY,
    building_id BIGINT NOT NULL REFERENCES buildings(id) ON DELETE CASCADE,
    new_manager_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    approved BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE business_owners (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    business_name VARCHAR(255) NOT NULL,
    verified BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CONTRACTS_SQL: &str = r"
CREATE TABLE contracts (
    id BIGSERIAL PRIMARY KEY,
    manager_id BIGINT NOT NULL REFERENCES building_managers(id) ON DELETE CASCADE,
    details TEXT NOT NULL,
    verified BOOLEAN NOT NULL DEFAULT false,
    status contract_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const SERVICES_SQL: &str = r"
CREATE TABLE services (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    cost NUMERIC(10, 2) NOT NULL,
    available_from TIMESTAMPTZ NOT NULL,
    available_to TIMESTAMPTZ NOT NULL,
    building_manager_id BIGINT NOT NULL REFERENCES building_managers(id) ON DELETE CASCADE,
    business_owner_id BIGINT NOT NULL REFERENCES business_owners(id) ON DELETE CASCADE,
    is_active BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_services_manager ON services(building_manager_id) WHERE is_active = true;

CREATE TABLE service_requests (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    service_id BIGINT NOT NULL REFERENCES services(id) ON DELETE CASCADE,
    requested_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    status request_status NOT NULL DEFAULT 'pending',
    additional_info TEXT
);

CREATE INDEX idx_service_requests_user ON service_requests(user_id);
";

const WALLETS_SQL: &str = r"
-- balance has no CHECK; only withdraw guards it, in the application.
CREATE TABLE wallets (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    balance NUMERIC(10, 2) NOT NULL DEFAULT 0,
    is_locked BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const SUBSCRIPTIONS_SQL: &str = r"
CREATE TABLE subscriptions (
    id BIGSERIAL PRIMARY KEY,
    building_id BIGINT NOT NULL REFERENCES buildings(id) ON DELETE CASCADE,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    amount NUMERIC(10, 2) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_subscriptions_user ON subscriptions(user_id);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    amount NUMERIC(10, 2) NOT NULL,
    date TIMESTAMPTZ NOT NULL DEFAULT now(),
    receipt_number VARCHAR(100) NOT NULL,
    modified_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_payments_receipt_number UNIQUE (receipt_number)
);

CREATE INDEX idx_payments_user_date ON payments(user_id, date DESC);

CREATE TABLE bill_payments (
    id BIGSERIAL PRIMARY KEY,
    building_id BIGINT NOT NULL REFERENCES buildings(id) ON DELETE CASCADE,
    payment_id BIGINT NOT NULL UNIQUE REFERENCES payments(id) ON DELETE CASCADE,
    amount NUMERIC(10, 2) NOT NULL,
    bill_type bill_type NOT NULL,
    paid_by BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    date TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_bill_payments_building ON bill_payments(building_id, date DESC);
";

const ENGAGEMENT_SQL: &str = r"
CREATE TABLE announcements (
    id BIGSERIAL PRIMARY KEY,
    building_id BIGINT NOT NULL REFERENCES buildings(id) ON DELETE CASCADE,
    title VARCHAR(255) NOT NULL,
    content TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    target_audience audience NOT NULL DEFAULT 'all',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE surveys (
    id BIGSERIAL PRIMARY KEY,
    building_id BIGINT NOT NULL REFERENCES buildings(id) ON DELETE CASCADE,
    title VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE survey_responses (
    id BIGSERIAL PRIMARY KEY,
    survey_id BIGINT NOT NULL REFERENCES surveys(id) ON DELETE CASCADE,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    response TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE issue_reports (
    id BIGSERIAL PRIMARY KEY,
    resident_id BIGINT NOT NULL REFERENCES residents(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    status issue_status NOT NULL DEFAULT 'open',
    notes TEXT,
    reported_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE messages (
    id BIGSERIAL PRIMARY KEY,
    sender_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    receiver_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    is_read BOOLEAN NOT NULL DEFAULT false,
    sent_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_messages_receiver ON messages(receiver_id, sent_at DESC);

CREATE TABLE notifications (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    message TEXT NOT NULL,
    status notification_status NOT NULL DEFAULT 'sent',
    sent_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE reminders (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    message TEXT NOT NULL,
    send_at TIMESTAMPTZ NOT NULL,
    sent BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const FAQS_SQL: &str = r"
CREATE TABLE faqs (
    id BIGSERIAL PRIMARY KEY,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const TRIGGERS_SQL: &str = r"
-- payments.modified_at follows every save
CREATE OR REPLACE FUNCTION touch_payment_modified_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.modified_at := now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_payments_modified_at
    BEFORE UPDATE ON payments
    FOR EACH ROW EXECUTE FUNCTION touch_payment_modified_at();
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_payments_modified_at ON payments;
DROP FUNCTION IF EXISTS touch_payment_modified_at();

DROP TABLE IF EXISTS faqs CASCADE;
DROP TABLE IF EXISTS reminders CASCADE;
DROP TABLE IF EXISTS notifications CASCADE;
DROP TABLE IF EXISTS messages CASCADE;
DROP TABLE IF EXISTS issue_reports CASCADE;
DROP TABLE IF EXISTS survey_responses CASCADE;
DROP TABLE IF EXISTS surveys CASCADE;
DROP TABLE IF EXISTS announcements CASCADE;
DROP TABLE IF EXISTS bill_payments CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS subscriptions CASCADE;
DROP TABLE IF EXISTS wallets CASCADE;
DROP TABLE IF EXISTS service_requests CASCADE;
DROP TABLE IF EXISTS services CASCADE;
DROP TABLE IF EXISTS contracts CASCADE;
DROP TABLE IF EXISTS business_owners CASCADE;
DROP TABLE IF EXISTS management_transfer_requests CASCADE;
DROP TABLE IF EXISTS building_managers CASCADE;
DROP TABLE IF EXISTS residents CASCADE;
DROP TABLE IF EXISTS buildings CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS issue_status CASCADE;
DROP TYPE IF EXISTS notification_status CASCADE;
DROP TYPE IF EXISTS audience CASCADE;
DROP TYPE IF EXISTS bill_type CASCADE;
DROP TYPE IF EXISTS request_status CASCADE;
DROP TYPE IF EXISTS contract_status CASCADE;
DROP TYPE IF EXISTS resident_type CASCADE;
DROP TYPE IF EXISTS account_role CASCADE;
";
