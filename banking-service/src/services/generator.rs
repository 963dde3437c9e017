//! Synthetic entity generation.
//!
//! Every random choice goes through one seedable [`StdRng`], so a generator
//! built with [`MockDataGenerator::seeded`] and anchored to a fixed instant
//! produces the same entities on every run. The generator never touches a
//! store; callers decide what to keep.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Builder;

use crate::config::MockDataConfig;
use crate::models::{
    round_cents, Account, AccountStatus, AccountType, BankAddress, Beneficiary,
    BeneficiaryStatus, BeneficiaryType, Branch, Channel, Merchant, Payment, PaymentStatus,
    PaymentType, Statement, StatementFormat, StatementPeriod, StatementStatus, Transaction,
    TransactionMetadata, TransactionType, Urgency,
};

pub const CURRENCY: &str = "GBP";

const MERCHANTS: [(&str, &str, &str); 5] = [
    ("Amazon UK", "Shopping", "Online"),
    ("Tesco Superstore", "Groceries", "London, UK"),
    ("Shell Petrol Station", "Fuel", "Manchester, UK"),
    ("Netflix", "Entertainment", "Online"),
    ("Starbucks", "Food & Drink", "Birmingham, UK"),
];

const INDIVIDUAL_NAMES: [&str; 5] = [
    "John Smith",
    "Sarah Johnson",
    "Michael Brown",
    "Emma Wilson",
    "David Taylor",
];

const BUSINESS_NAMES: [&str; 5] = [
    "ABC Ltd",
    "XYZ Corporation",
    "Tech Solutions Inc",
    "Global Services Ltd",
    "Prime Enterprises",
];

/// Statuses a generated payment may start in.
const INITIAL_PAYMENT_STATUSES: [PaymentStatus; 4] = [
    PaymentStatus::Pending,
    PaymentStatus::Processing,
    PaymentStatus::Completed,
    PaymentStatus::Failed,
];

/// Caller-supplied part of a payment. Everything else is generated.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOrder {
    pub from_account_id: String,
    pub to_beneficiary_id: String,
    pub amount: f64,
    pub currency: String,
    pub payment_type: PaymentType,
    /// Defaults to `Payment <first 8 chars of the ID>`.
    pub reference: Option<String>,
    /// Defaults to today.
    pub scheduled_date: Option<NaiveDate>,
    pub urgency: Urgency,
}

impl PaymentOrder {
    pub fn new(from_account_id: &str, to_beneficiary_id: &str, amount: f64) -> Self {
        Self {
            from_account_id: from_account_id.to_string(),
            to_beneficiary_id: to_beneficiary_id.to_string(),
            amount,
            currency: CURRENCY.to_string(),
            payment_type: PaymentType::Domestic,
            reference: None,
            scheduled_date: None,
            urgency: Urgency::Normal,
        }
    }
}

/// One line of a downloadable statement.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementLine {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub balance: f64,
}

#[derive(Debug)]
pub struct MockDataGenerator {
    rng: StdRng,
    anchor: Option<DateTime<Utc>>,
}

impl MockDataGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            anchor: None,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            anchor: None,
        }
    }

    pub fn from_config(config: &MockDataConfig) -> Self {
        match config.seed {
            Some(seed) => {
                tracing::info!(seed, "Using seeded mock data generator");
                Self::seeded(seed)
            }
            None => Self::from_entropy(),
        }
    }

    /// Pin "now" to `now`, making generated dates reproducible too.
    #[cfg(test)]
    pub fn anchored_at(mut self, now: DateTime<Utc>) -> Self {
        self.anchor = Some(now);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.anchor.unwrap_or_else(Utc::now)
    }

    /// `<prefix>-` followed by the first 13 characters of a random UUID.
    pub fn id(&mut self, prefix: &str) -> String {
        let uuid = Builder::from_random_bytes(self.rng.gen()).into_uuid();
        format!("{prefix}-{}", &uuid.to_string()[..13])
    }

    fn id_or(&mut self, prefix: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => id.to_string(),
            None => self.id(prefix),
        }
    }

    fn digits(&mut self, len: u32) -> String {
        let low = 10u64.pow(len - 1);
        self.rng.gen_range(low..low * 10).to_string()
    }

    fn cents(&mut self, low: u64, high: u64) -> f64 {
        self.rng.gen_range(low..high) as f64 / 100.0
    }

    /// A random instant within the last `days` days.
    fn within_days(&mut self, days: i64) -> DateTime<Utc> {
        let back = self.rng.gen_range(0..days * 24 * 60 * 60 * 1000);
        self.now() - Duration::milliseconds(back)
    }

    fn pick<T: Copy>(&mut self, choices: &[T]) -> T {
        choices[self.rng.gen_range(0..choices.len())]
    }

    pub fn account(&mut self, id: Option<&str>, account_type: AccountType) -> Account {
        let account_id = self.id_or("acc", id);
        let branch_id = {
            let token = self.id("br");
            token[..11].to_string()
        };

        Account {
            account_id,
            account_number: format!("****{}", self.digits(4)),
            full_account_number: format!("GB{}{}", self.digits(8), self.digits(8)),
            account_type,
            currency: CURRENCY.to_string(),
            status: AccountStatus::Active,
            nickname: account_type.default_nickname().to_string(),
            opened_date: self.within_days(365).date_naive(),
            branch: Branch {
                branch_id,
                branch_name: "London Main Branch".to_string(),
                branch_code: "LMB001".to_string(),
            },
            available_balance: self.cents(100_000, 5_100_000),
            current_balance: self.cents(100_000, 5_100_000),
            overdraft_limit: account_type.overdraft_limit(),
            interest_rate: account_type.interest_rate(),
            last_transaction_date: self.within_days(7),
        }
    }

    pub fn transaction(&mut self, account_id: &str, id: Option<&str>) -> Transaction {
        let transaction_id = self.id_or("txn", id);
        let transaction_type = self.pick(TransactionType::ALL);
        let magnitude = self.cents(1_000, 51_000);
        let (name, category, location) = self.pick(&MERCHANTS);
        let transaction_date = self.within_days(30);
        let value_date = self.within_days(30);

        Transaction::new(
            transaction_id,
            account_id.to_string(),
            transaction_type,
            magnitude,
            CURRENCY.to_string(),
            transaction_date,
            value_date,
            self.cents(100_000, 1_100_000),
            Merchant {
                name: name.to_string(),
                category: category.to_string(),
                location: location.to_string(),
            },
            TransactionMetadata {
                channel: if self.rng.gen_bool(0.5) {
                    Channel::Online
                } else {
                    Channel::Pos
                },
                card_last4: self.digits(4),
                authorization_code: format!("AUTH{}", self.digits(6)),
            },
        )
    }

    /// Build a payment for `order`. With no explicit `status` one of
    /// PENDING, PROCESSING, COMPLETED or FAILED is drawn at random.
    pub fn payment(
        &mut self,
        order: PaymentOrder,
        status: Option<PaymentStatus>,
        id: Option<&str>,
    ) -> Payment {
        let payment_id = self.id_or("pmt", id);
        let status = status.unwrap_or_else(|| self.pick(&INITIAL_PAYMENT_STATUSES));
        let now = self.now();
        let scheduled_date = order.scheduled_date.unwrap_or_else(|| now.date_naive());
        let reference = order.reference.unwrap_or_else(|| {
            let prefix: String = payment_id.chars().take(8).collect();
            format!("Payment {prefix}")
        });

        let completed = status == PaymentStatus::Completed;
        let transaction_id = completed.then(|| self.id("txn"));

        Payment {
            payment_id,
            status,
            from_account_id: order.from_account_id,
            to_beneficiary_id: order.to_beneficiary_id,
            amount: round_cents(order.amount),
            currency: order.currency,
            payment_type: order.payment_type,
            reference,
            scheduled_date,
            urgency: order.urgency,
            created_at: now,
            completed_at: completed.then_some(now),
            cancelled_at: None,
            estimated_completion_date: scheduled_date + Duration::days(1),
            transaction_id,
            cancellation_reason: None,
        }
    }

    pub fn beneficiary(&mut self, id: Option<&str>) -> Beneficiary {
        let beneficiary_id = self.id_or("ben", id);
        let beneficiary_type = self.pick(BeneficiaryType::ALL);
        let name = match beneficiary_type {
            BeneficiaryType::Individual => self.pick(&INDIVIDUAL_NAMES),
            BeneficiaryType::Business => self.pick(&BUSINESS_NAMES),
        };
        let nickname = name.split_whitespace().next().unwrap_or(name);
        let email_local = name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".");

        Beneficiary {
            beneficiary_id,
            beneficiary_type,
            name: name.to_string(),
            nickname: nickname.to_string(),
            account_number: self.digits(8),
            routing_number: self.digits(6),
            bank_name: "Barclays Bank".to_string(),
            bank_address: default_bank_address(),
            email: format!("{email_local}@example.com"),
            phone: format!("+44{}", self.digits(10)),
            status: BeneficiaryStatus::Active,
            created_at: self.within_days(365),
            last_used: self.within_days(30),
        }
    }

    /// Statement for `period`. Generated the day after the period ends, or
    /// now if that is still in the future.
    pub fn statement(
        &mut self,
        account_id: &str,
        period: StatementPeriod,
        id: Option<&str>,
    ) -> Statement {
        let statement_id = self.id_or("stmt", id);
        let now = self.now();
        let generated_date = period
            .end_date
            .succ_opt()
            .and_then(|day| day.and_hms_opt(6, 0, 0))
            .map(|at| at.and_utc())
            .filter(|at| *at <= now)
            .unwrap_or(now);

        Statement {
            statement_id,
            account_id: account_id.to_string(),
            period,
            generated_date,
            format: StatementFormat::Pdf,
            size: self.rng.gen_range(100_000..1_000_000),
            status: StatementStatus::Available,
        }
    }

    /// Lines of a statement's document. Derived from the statement ID alone,
    /// so repeated downloads of one statement always match.
    pub fn statement_lines(statement: &Statement) -> Vec<StatementLine> {
        let mut rng = StdRng::seed_from_u64(fnv1a(statement.statement_id.as_bytes()));

        let days = (statement.period.end_date - statement.period.start_date).num_days();
        let count = rng.gen_range(6..=12);
        let mut dates: Vec<NaiveDate> = (0..count)
            .map(|_| statement.period.start_date + Duration::days(rng.gen_range(0..=days)))
            .collect();
        dates.sort();

        let mut balance = rng.gen_range(50_000..500_000) as f64 / 100.0;
        dates
            .into_iter()
            .enumerate()
            .map(|(index, date)| {
                let (description, amount) = if index == 0 {
                    ("Salary".to_string(), 2500.0)
                } else {
                    let (name, _, _) = MERCHANTS[rng.gen_range(0..MERCHANTS.len())];
                    (name.to_string(), -(rng.gen_range(100..15_000) as f64 / 100.0))
                };
                balance = round_cents(balance + amount);
                StatementLine {
                    date,
                    description,
                    amount,
                    balance,
                }
            })
            .collect()
    }
}

/// 64-bit FNV-1a hash. Stable across processes and platforms, unlike
/// `std::hash`, so it can seed per-document randomness.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}

pub fn default_bank_address() -> BankAddress {
    BankAddress {
        street: "1 Churchill Place".to_string(),
        city: "London".to_string(),
        state: "Greater London".to_string(),
        postal_code: "E14 5HP".to_string(),
        country: "GB".to_string(),
    }
}
