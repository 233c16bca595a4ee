//! Pure balance-mutation planning.
//!
//! Each planner takes the current state of the account(s), checks the
//! preconditions and returns the updated accounts together with the audit
//! records to append. Nothing here touches storage, so a failed precondition
//! can never leave a partial write behind.

use bankly_shared::types::Money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::account_number;
use super::types::{Account, NewTransaction, NewTransfer, TransactionType};
use crate::error::{BankError, BankResult};

/// Maximum length of the free-text notes field, in characters.
pub const MAX_NOTES_LEN: usize = 255;

/// Planned single-account mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    /// The account with its new balance.
    pub account: Account,
    /// Audit record to append.
    pub audit: NewTransaction,
}

/// Planned transfer between two accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    /// Source account after the debit.
    pub source: Account,
    /// Target account after the credit.
    pub target: Account,
    /// Audit record attributed to the source account.
    pub audit: NewTransaction,
    /// Two-account transfer record.
    pub transfer: NewTransfer,
}

/// Validates a requested amount.
///
/// # Errors
///
/// Returns `BankError::InvalidArgument` for zero, negative, sub-cent, or
/// out-of-range amounts.
pub fn validate_amount(amount: Decimal) -> BankResult<Money> {
    Ok(Money::positive(amount)?)
}

/// Trims notes and enforces the length limit.
///
/// # Errors
///
/// Returns `BankError::InvalidArgument` if the notes are too long.
pub fn normalize_notes(notes: &str) -> BankResult<String> {
    let trimmed = notes.trim();
    if trimmed.chars().count() > MAX_NOTES_LEN {
        return Err(BankError::InvalidArgument(format!(
            "notes must be at most {MAX_NOTES_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Checks that an account number supplied by a caller is well formed.
///
/// # Errors
///
/// Returns `BankError::InvalidArgument` naming `field` otherwise.
pub fn validate_account_number(field: &str, number: &str) -> BankResult<()> {
    if account_number::is_well_formed(number) {
        Ok(())
    } else {
        Err(BankError::InvalidArgument(format!(
            "{field} must be {} digits",
            account_number::ACCOUNT_NUMBER_LEN
        )))
    }
}

/// Plans a deposit of `amount` into `account`.
///
/// # Errors
///
/// Returns `BankError::InvalidArgument` if the new balance would exceed
/// [`MAX_AMOUNT`](bankly_shared::types::MAX_AMOUNT).
pub fn plan_deposit(
    account: &Account,
    amount: Money,
    notes: &str,
    now: DateTime<Utc>,
) -> BankResult<BalanceChange> {
    let balance = account.balance.checked_add(amount)?;
    Ok(BalanceChange {
        account: with_balance(account, balance, now),
        audit: audit_record(account, TransactionType::Deposit, amount, notes, now),
    })
}

/// Plans a withdrawal of `amount` from `account`.
///
/// # Errors
///
/// Returns `BankError::InsufficientFunds` if the balance is below `amount`.
pub fn plan_withdraw(
    account: &Account,
    amount: Money,
    notes: &str,
    now: DateTime<Utc>,
) -> BankResult<BalanceChange> {
    let balance = debit(account, amount, TransactionType::Withdraw)?;
    Ok(BalanceChange {
        account: with_balance(account, balance, now),
        audit: audit_record(account, TransactionType::Withdraw, amount, notes, now),
    })
}

/// Plans moving `amount` from `source` to `target`.
///
/// # Errors
///
/// Returns `BankError::InvalidArgument` if both sides are the same account
/// or the target balance would exceed the maximum, or
/// `BankError::InsufficientFunds` if the source balance is below `amount`.
pub fn plan_transfer(
    source: &Account,
    target: &Account,
    amount: Money,
    notes: &str,
    now: DateTime<Utc>,
) -> BankResult<TransferPlan> {
    if source.account_number == target.account_number {
        return Err(BankError::InvalidArgument(
            "source and target account must differ".to_string(),
        ));
    }

    let source_balance = debit(source, amount, TransactionType::Transfer)?;
    let target_balance = target.balance.checked_add(amount)?;

    Ok(TransferPlan {
        source: with_balance(source, source_balance, now),
        target: with_balance(target, target_balance, now),
        audit: audit_record(
            source,
            TransactionType::Transfer,
            amount,
            &transfer_notes(&target.account_number, notes),
            now,
        ),
        transfer: NewTransfer {
            source_account_number: source.account_number.clone(),
            target_account_number: target.account_number.clone(),
            amount,
            notes: notes.to_string(),
            created_at: now,
        },
    })
}

/// Subtracts `amount` from the account balance, refusing to go negative.
fn debit(account: &Account, amount: Money, operation: TransactionType) -> BankResult<Money> {
    if account.balance < amount {
        return Err(BankError::InsufficientFunds {
            account_number: account.account_number.clone(),
            operation,
            balance: account.balance,
            requested: amount,
        });
    }
    Ok(account.balance.checked_sub(amount)?)
}

fn with_balance(account: &Account, balance: Money, now: DateTime<Utc>) -> Account {
    Account {
        balance,
        updated_at: now,
        ..account.clone()
    }
}

fn audit_record(
    account: &Account,
    transaction_type: TransactionType,
    amount: Money,
    notes: &str,
    now: DateTime<Utc>,
) -> NewTransaction {
    NewTransaction {
        account_number: account.account_number.clone(),
        transaction_type,
        amount,
        notes: notes.to_string(),
        created_at: now,
    }
}

/// Describes a transfer on the source account's statement.
fn transfer_notes(target_account_number: &str, notes: &str) -> String {
    if notes.is_empty() {
        format!("Transfer to {target_account_number}")
    } else {
        format!("Transfer to {target_account_number}: {notes}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankly_shared::types::{AccountId, CustomerId};
    use rust_decimal_macros::dec;

    use crate::ledger::types::AccountType;

    fn account(number: &str, balance: Decimal) -> Account {
        let created = Utc::now();
        Account {
            id: AccountId::new(),
            account_number: number.to_string(),
            customer_id: CustomerId::new(),
            account_type: AccountType::Checking,
            balance: Money::new(balance),
            created_at: created,
            updated_at: created,
        }
    }

    fn money(amount: Decimal) -> Money {
        Money::positive(amount).unwrap()
    }

    #[test]
    fn test_deposit_increments_and_records() {
        let acct = account("000000000001", dec!(100.00));
        let now = Utc::now();

        let change = plan_deposit(&acct, money(dec!(25.50)), "paycheck", now).unwrap();

        assert_eq!(change.account.balance, Money::new(dec!(125.50)));
        assert_eq!(change.account.updated_at, now);
        assert_eq!(change.audit.transaction_type, TransactionType::Deposit);
        assert_eq!(change.audit.amount, money(dec!(25.50)));
        assert_eq!(change.audit.account_number, "000000000001");
        assert_eq!(change.audit.notes, "paycheck");
    }

    #[test]
    fn test_withdraw_more_than_balance_fails() {
        let acct = account("000000000001", dec!(100.00));

        let err = plan_withdraw(&acct, money(dec!(150.00)), "", Utc::now()).unwrap_err();

        assert_eq!(
            err,
            BankError::InsufficientFunds {
                account_number: "000000000001".into(),
                operation: TransactionType::Withdraw,
                balance: Money::new(dec!(100.00)),
                requested: money(dec!(150.00)),
            }
        );
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let acct = account("000000000001", dec!(100.00));
        let change = plan_withdraw(&acct, money(dec!(100.00)), "", Utc::now()).unwrap();
        assert!(change.account.balance.is_zero());
        assert_eq!(change.audit.transaction_type, TransactionType::Withdraw);
    }

    #[test]
    fn test_transfer_moves_funds() {
        let a = account("000000000001", dec!(100.00));
        let b = account("000000000002", dec!(200.00));

        let plan = plan_transfer(&a, &b, money(dec!(99.00)), "rent", Utc::now()).unwrap();

        assert_eq!(plan.source.balance, Money::new(dec!(1.00)));
        assert_eq!(plan.target.balance, Money::new(dec!(299.00)));
        assert_eq!(plan.audit.account_number, "000000000001");
        assert_eq!(plan.audit.transaction_type, TransactionType::Transfer);
        assert_eq!(plan.audit.notes, "Transfer to 000000000002: rent");
        assert_eq!(plan.transfer.source_account_number, "000000000001");
        assert_eq!(plan.transfer.target_account_number, "000000000002");
        assert_eq!(plan.transfer.notes, "rent");
    }

    #[test]
    fn test_transfer_to_same_account_rejected() {
        let a = account("000000000001", dec!(100.00));
        let err = plan_transfer(&a, &a, money(dec!(1.00)), "", Utc::now()).unwrap_err();
        assert!(matches!(err, BankError::InvalidArgument(_)));
    }

    #[test]
    fn test_transfer_insufficient_funds_reports_transfer() {
        let a = account("000000000001", dec!(10.00));
        let b = account("000000000002", dec!(0));
        let err = plan_transfer(&a, &b, money(dec!(10.01)), "", Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            BankError::InsufficientFunds {
                operation: TransactionType::Transfer,
                ..
            }
        ));
    }

    #[test]
    fn test_credit_past_maximum_balance_rejected() {
        let full = account("000000000001", dec!(999999999999999.00));
        let rich = account("000000000002", dec!(5.00));

        let err = plan_deposit(&full, money(dec!(1.00)), "", Utc::now()).unwrap_err();
        assert!(matches!(err, BankError::InvalidArgument(_)), "{err}");

        let err = plan_transfer(&rich, &full, money(dec!(1.00)), "", Utc::now()).unwrap_err();
        assert!(matches!(err, BankError::InvalidArgument(_)), "{err}");

        assert!(plan_deposit(&full, money(dec!(0.99)), "", Utc::now()).is_ok());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(dec!(0.01)).is_ok());
        assert!(matches!(validate_amount(dec!(0)), Err(BankError::InvalidArgument(_))));
        assert!(matches!(validate_amount(dec!(-1)), Err(BankError::InvalidArgument(_))));
        assert!(matches!(validate_amount(dec!(0.001)), Err(BankError::InvalidArgument(_))));
        assert!(matches!(
            validate_amount(dec!(10000000000000000)),
            Err(BankError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_normalize_notes() {
        assert_eq!(normalize_notes("  lunch  ").unwrap(), "lunch");
        assert_eq!(normalize_notes("").unwrap(), "");
        assert!(normalize_notes(&"x".repeat(MAX_NOTES_LEN + 1)).is_err());
        assert!(normalize_notes(&"é".repeat(MAX_NOTES_LEN)).is_ok());
    }

    #[test]
    fn test_validate_account_number() {
        assert!(validate_account_number("account_number", "123456789012").is_ok());
        assert!(validate_account_number("account_number", "12").is_err());
    }
}
