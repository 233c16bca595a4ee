//! `SeaORM` entities, one module per table.

pub mod prelude;

pub mod accounts;
pub mod customers;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod transfers;
