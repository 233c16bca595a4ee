//! Initial schema: customers, accounts and their audit trail.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(TRANSFERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM ('checking', 'savings');

CREATE TYPE transaction_type AS ENUM ('DEPOSIT', 'WITHDRAW', 'TRANSFER');
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id              UUID PRIMARY KEY,
    username        VARCHAR(50) NOT NULL,
    password_hash   VARCHAR(255) NOT NULL,
    full_name       VARCHAR(100) NOT NULL,
    email           VARCHAR(255),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT customers_username_key UNIQUE (username),
    CONSTRAINT customers_username_format CHECK (username ~ '^[A-Za-z0-9_.-]{3,50}$')
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id              UUID PRIMARY KEY,
    account_number  VARCHAR(12) NOT NULL,
    customer_id     UUID NOT NULL REFERENCES customers(id) ON DELETE RESTRICT,
    account_type    account_type NOT NULL,
    balance         NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT accounts_account_number_key UNIQUE (account_number),
    CONSTRAINT accounts_account_number_format CHECK (account_number ~ '^[0-9]{12}$'),
    CONSTRAINT accounts_balance_non_negative CHECK (balance >= 0)
);

CREATE INDEX idx_accounts_customer ON accounts(customer_id, created_at);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id                UUID PRIMARY KEY,
    account_number    VARCHAR(12) NOT NULL
                      REFERENCES accounts(account_number) ON DELETE RESTRICT,
    transaction_type  transaction_type NOT NULL,
    amount            NUMERIC(19, 4) NOT NULL,
    notes             VARCHAR(512) NOT NULL DEFAULT '',
    created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT transactions_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_transactions_account ON transactions(account_number, created_at DESC, id DESC);
";

const TRANSFERS_SQL: &str = r"
CREATE TABLE transfers (
    id                     UUID PRIMARY KEY,
    source_account_number  VARCHAR(12) NOT NULL
                           REFERENCES accounts(account_number) ON DELETE RESTRICT,
    target_account_number  VARCHAR(12) NOT NULL
                           REFERENCES accounts(account_number) ON DELETE RESTRICT,
    amount                 NUMERIC(19, 4) NOT NULL,
    notes                  VARCHAR(255) NOT NULL DEFAULT '',
    created_at             TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT transfers_amount_positive CHECK (amount > 0),
    CONSTRAINT transfers_distinct_accounts CHECK (source_account_number <> target_account_number)
);

CREATE INDEX idx_transfers_source ON transfers(source_account_number, created_at DESC);
CREATE INDEX idx_transfers_target ON transfers(target_account_number, created_at DESC);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS transfers;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS accounts;
DROP TABLE IF EXISTS customers;
DROP TYPE IF EXISTS transaction_type;
DROP TYPE IF EXISTS account_type;
";
