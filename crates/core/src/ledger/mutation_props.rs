//! Property-based tests for mutation planning.

use bankly_shared::types::{AccountId, CustomerId, Money};
use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::mutation::{plan_deposit, plan_transfer, plan_withdraw};
use super::types::{Account, AccountType};
use crate::error::BankError;

/// Amounts from 0.01 to 10,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Balances from 0.00 to 10,000.00.
fn balance() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn account(number: &str, balance: Decimal) -> Account {
    let now = Utc::now();
    Account {
        id: AccountId::new(),
        account_number: number.to_string(),
        customer_id: CustomerId::new(),
        account_type: AccountType::Savings,
        balance: Money::new(balance),
        created_at: now,
        updated_at: now,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_deposit_then_withdraw_is_identity(start in balance(), x in amount()) {
        let acct = account("000000000001", start);
        let x = Money::positive(x).unwrap();
        let now = Utc::now();

        let after_deposit = plan_deposit(&acct, x, "", now).unwrap().account;
        let after_withdraw = plan_withdraw(&after_deposit, x, "", now).unwrap().account;

        prop_assert_eq!(after_withdraw.balance, acct.balance);
    }

    #[test]
    fn prop_withdraw_never_goes_negative(start in balance(), x in amount()) {
        let acct = account("000000000001", start);
        let x = Money::positive(x).unwrap();

        match plan_withdraw(&acct, x, "", Utc::now()) {
            Ok(change) => {
                prop_assert!(x.amount() <= start);
                prop_assert!(!change.account.balance.is_negative());
            }
            Err(BankError::InsufficientFunds { balance, requested, .. }) => {
                prop_assert!(x.amount() > start);
                prop_assert_eq!(balance, acct.balance);
                prop_assert_eq!(requested, x);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn prop_transfer_conserves_total(a in balance(), b in balance(), x in amount()) {
        let source = account("000000000001", a);
        let target = account("000000000002", b);
        let x = Money::positive(x).unwrap();

        if let Ok(plan) = plan_transfer(&source, &target, x, "", Utc::now()) {
            prop_assert_eq!(
                plan.source.balance.amount() + plan.target.balance.amount(),
                a + b
            );
            prop_assert_eq!(plan.target.balance.amount() - b, x.amount());
            prop_assert_eq!(plan.transfer.amount, x);
        } else {
            prop_assert!(x.amount() > a);
        }
    }
}
