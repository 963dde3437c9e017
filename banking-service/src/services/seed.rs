//! Fixed startup data.
//!
//! The IDs here are stable so client test suites can rely on them; the
//! remaining fields come from the generator.

use crate::models::{
    Account, AccountType, Beneficiary, CancelOutcome, Payment, PaymentStatus, PaymentType,
    Statement, StatementPeriod, Transaction,
};
use crate::services::generator::{MockDataGenerator, PaymentOrder};

pub const SEEDED_ACCOUNTS: [(&str, AccountType); 5] = [
    ("acc-123456789", AccountType::Checking),
    ("acc-987654321", AccountType::Savings),
    ("acc-111222333", AccountType::Business),
    ("acc-444555666", AccountType::Checking),
    ("acc-777888999", AccountType::Savings),
];

pub const SEEDED_TRANSACTIONS: [(&str, &str); 3] = [
    ("txn-20260109-001", "acc-123456789"),
    ("txn-20260109-002", "acc-987654321"),
    ("txn-20260109-003", "acc-111222333"),
];

/// Random transactions added on top of the fixed ones.
pub const RANDOM_TRANSACTIONS: usize = 17;

pub const SEEDED_BENEFICIARIES: usize = 10;

pub const SEEDED_PAYMENTS: [(&str, PaymentStatus, f64); 4] = [
    ("pmt-20260109-001", PaymentStatus::Pending, 150.0),
    ("pmt-20260109-002", PaymentStatus::Processing, 2450.75),
    ("pmt-20260109-003", PaymentStatus::Completed, 89.99),
    ("pmt-20260109-004", PaymentStatus::Cancelled, 500.0),
];

/// Statement ID, owning account, and the month it covers.
pub const SEEDED_STATEMENTS: [(&str, &str, i32, u32); 5] = [
    ("stmt-202401-001", "acc-123456789", 2024, 1),
    ("stmt-202401-002", "acc-987654321", 2024, 1),
    ("stmt-202312-001", "acc-123456789", 2023, 12),
    ("stmt-202312-002", "acc-987654321", 2023, 12),
    ("stmt-202311-001", "acc-123456789", 2023, 11),
];

#[derive(Debug, Clone)]
pub struct SeedData {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub payments: Vec<Payment>,
    pub beneficiaries: Vec<Beneficiary>,
    pub statements: Vec<Statement>,
}

pub fn beneficiary_id(index: usize) -> String {
    format!("ben-20260109-{:03}", index + 1)
}

pub fn generate(generator: &mut MockDataGenerator) -> SeedData {
    let accounts: Vec<Account> = SEEDED_ACCOUNTS
        .iter()
        .map(|(id, account_type)| generator.account(Some(id), *account_type))
        .collect();

    let mut transactions: Vec<Transaction> = SEEDED_TRANSACTIONS
        .iter()
        .map(|(id, account_id)| generator.transaction(account_id, Some(id)))
        .collect();
    for index in 0..RANDOM_TRANSACTIONS {
        let (account_id, _) = SEEDED_ACCOUNTS[index % SEEDED_ACCOUNTS.len()];
        transactions.push(generator.transaction(account_id, None));
    }

    let beneficiaries: Vec<Beneficiary> = (0..SEEDED_BENEFICIARIES)
        .map(|index| generator.beneficiary(Some(&beneficiary_id(index))))
        .collect();

    let payments = SEEDED_PAYMENTS
        .iter()
        .enumerate()
        .map(|(index, (id, status, amount))| {
            let (from_account_id, _) = SEEDED_ACCOUNTS[index % SEEDED_ACCOUNTS.len()];
            let mut order =
                PaymentOrder::new(from_account_id, &beneficiary_id(index), *amount);
            order.payment_type = if index % 2 == 0 {
                PaymentType::Domestic
            } else {
                PaymentType::International
            };

            if *status == PaymentStatus::Cancelled {
                let mut payment = generator.payment(order, Some(PaymentStatus::Pending), Some(id));
                let at = generator.now();
                let outcome = payment.cancel(Some("Customer request"), at);
                debug_assert_eq!(outcome, Ok(CancelOutcome::Cancelled));
                payment
            } else {
                generator.payment(order, Some(*status), Some(id))
            }
        })
        .collect();

    let statements = SEEDED_STATEMENTS
        .iter()
        .filter_map(|(id, account_id, year, month)| {
            StatementPeriod::month(*year, *month)
                .map(|period| generator.statement(account_id, period, Some(id)))
        })
        .collect();

    tracing::debug!(
        accounts = accounts.len(),
        transactions = transactions.len(),
        beneficiaries = beneficiaries.len(),
        "Generated seed data"
    );

    SeedData {
        accounts,
        transactions,
        payments,
        beneficiaries,
        statements,
    }
}
