//! Request and response bodies.

pub mod accounts;
pub mod beneficiaries;
pub mod payments;

pub use accounts::{
    AccountListResponse, AccountSummary, BalanceResponse, StatementListResponse,
    TransactionListResponse,
};
pub use beneficiaries::{
    BankAddressInput, BeneficiaryListResponse, BeneficiarySummary, CreateBeneficiaryRequest,
    NewBeneficiary, UpdateBeneficiaryRequest,
};
pub use payments::{CancelPaymentRequest, CreatePaymentRequest};
