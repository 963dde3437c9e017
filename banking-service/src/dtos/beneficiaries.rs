use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

use crate::models::{
    BankAddress, Beneficiary, BeneficiaryChanges, BeneficiaryStatus, BeneficiaryType,
};
use crate::services::Pagination;
use crate::utils::{FieldErrors, JsonBody, JsonKind};

static ACCOUNT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{8,17}$").expect("account number pattern is valid"));
static ROUTING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{6,9}$").expect("routing number pattern is valid"));
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+\d{7,15}$").expect("phone pattern is valid"));

const CREATE_FIELD_ORDER: &[&str] = &[
    "beneficiaryType",
    "name",
    "nickname",
    "accountNumber",
    "routingNumber",
    "bankName",
    "bankAddress",
    "email",
    "phone",
];

const UPDATE_FIELD_ORDER: &[&str] = &["nickname", "email", "phone"];

fn check_phone(phone: Option<&str>, errors: &mut FieldErrors) {
    if let Some(phone) = phone {
        if !PHONE.is_match(phone) {
            errors.push("phone", "Phone must be in international format, e.g. +447700900123");
        }
    }
}

/// Bank address as sent by clients. Parts left out keep the generated value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAddressInput {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl BankAddressInput {
    pub fn merge_into(self, address: &mut BankAddress) {
        let parts = [
            (self.street, &mut address.street),
            (self.city, &mut address.city),
            (self.state, &mut address.state),
            (self.postal_code, &mut address.postal_code),
            (self.country, &mut address.country),
        ];
        for (given, current) in parts {
            if let Some(value) = given {
                *current = value;
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBeneficiaryRequest {
    #[validate(required(message = "Beneficiary type is required"))]
    pub beneficiary_type: Option<String>,

    #[validate(
        required(message = "Name is required"),
        length(min = 1, max = 140, message = "Name must be between 1 and 140 characters")
    )]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Nickname must be between 1 and 50 characters"))]
    pub nickname: Option<String>,

    #[validate(required(message = "Account number is required"))]
    pub account_number: Option<String>,

    #[validate(required(message = "Routing number is required"))]
    pub routing_number: Option<String>,

    #[validate(
        required(message = "Bank name is required"),
        length(min = 1, max = 140, message = "Bank name must be between 1 and 140 characters")
    )]
    pub bank_name: Option<String>,

    pub bank_address: Option<BankAddressInput>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub phone: Option<String>,

    #[serde(skip)]
    pub type_errors: FieldErrors,
}

impl JsonBody for CreateBeneficiaryRequest {
    const FIELDS: &'static [(&'static str, JsonKind, &'static str)] = &[
        ("beneficiaryType", JsonKind::String, "Beneficiary type must be a string"),
        ("name", JsonKind::String, "Name must be a string"),
        ("nickname", JsonKind::String, "Nickname must be a string"),
        ("accountNumber", JsonKind::String, "Account number must be a string of digits"),
        ("routingNumber", JsonKind::String, "Routing number must be a string of digits"),
        ("bankName", JsonKind::String, "Bank name must be a string"),
        (
            "bankAddress",
            JsonKind::TextObject,
            "Bank address must be an object of text fields",
        ),
        ("email", JsonKind::String, "Email must be a string"),
        ("phone", JsonKind::String, "Phone must be a string"),
    ];

    fn set_type_errors(&mut self, errors: FieldErrors) {
        self.type_errors = errors;
    }
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBeneficiary {
    pub beneficiary_type: BeneficiaryType,
    pub name: String,
    pub nickname: Option<String>,
    pub account_number: String,
    pub routing_number: String,
    pub bank_name: String,
    pub bank_address: Option<BankAddressInput>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl NewBeneficiary {
    /// Overlay the caller's fields on a generated beneficiary. Omitted
    /// optionals keep the generated value, except nickname, which falls back
    /// to the name.
    pub fn apply_to(self, beneficiary: &mut Beneficiary) {
        beneficiary.beneficiary_type = self.beneficiary_type;
        beneficiary.nickname = self.nickname.unwrap_or_else(|| self.name.clone());
        beneficiary.name = self.name;
        beneficiary.account_number = self.account_number;
        beneficiary.routing_number = self.routing_number;
        beneficiary.bank_name = self.bank_name;
        if let Some(address) = self.bank_address {
            address.merge_into(&mut beneficiary.bank_address);
        }
        if let Some(email) = self.email {
            beneficiary.email = email;
        }
        if let Some(phone) = self.phone {
            beneficiary.phone = phone;
        }
    }
}

impl CreateBeneficiaryRequest {
    pub fn validated(mut self) -> Result<NewBeneficiary, AppError> {
        let mut errors = std::mem::take(&mut self.type_errors);
        errors.merge_derived(self.validate());

        let beneficiary_type = self.beneficiary_type.as_deref().and_then(|raw| {
            let parsed = raw.parse::<BeneficiaryType>().ok();
            if parsed.is_none() {
                errors.push(
                    "beneficiaryType",
                    format!("Beneficiary type must be one of: {}", BeneficiaryType::expected()),
                );
            }
            parsed
        });
        if let Some(number) = &self.account_number {
            if !ACCOUNT_NUMBER.is_match(number) {
                errors.push("accountNumber", "Account number must be 8 to 17 digits");
            }
        }
        if let Some(number) = &self.routing_number {
            if !ROUTING_NUMBER.is_match(number) {
                errors.push("routingNumber", "Routing number must be 6 to 9 digits");
            }
        }
        check_phone(self.phone.as_deref(), &mut errors);

        errors.finish(CREATE_FIELD_ORDER)?;

        let (Some(beneficiary_type), Some(name), Some(account_number), Some(routing_number), Some(bank_name)) = (
            beneficiary_type,
            self.name,
            self.account_number,
            self.routing_number,
            self.bank_name,
        ) else {
            return Err(AppError::InternalError(anyhow::anyhow!(
                "validated beneficiary request is missing a field"
            )));
        };

        Ok(NewBeneficiary {
            beneficiary_type,
            name,
            nickname: self.nickname,
            account_number,
            routing_number,
            bank_name,
            bank_address: self.bank_address,
            email: self.email,
            phone: self.phone,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBeneficiaryRequest {
    #[validate(length(min = 1, max = 50, message = "Nickname must be between 1 and 50 characters"))]
    pub nickname: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub phone: Option<String>,

    #[serde(skip)]
    pub type_errors: FieldErrors,
}

impl JsonBody for UpdateBeneficiaryRequest {
    const FIELDS: &'static [(&'static str, JsonKind, &'static str)] = &[
        ("nickname", JsonKind::String, "Nickname must be a string"),
        ("email", JsonKind::String, "Email must be a string"),
        ("phone", JsonKind::String, "Phone must be a string"),
    ];

    fn set_type_errors(&mut self, errors: FieldErrors) {
        self.type_errors = errors;
    }
}

impl UpdateBeneficiaryRequest {
    pub fn into_changes(mut self) -> Result<BeneficiaryChanges, AppError> {
        let mut errors = std::mem::take(&mut self.type_errors);
        errors.merge_derived(self.validate());
        check_phone(self.phone.as_deref(), &mut errors);
        errors.finish(UPDATE_FIELD_ORDER)?;

        Ok(BeneficiaryChanges {
            nickname: self.nickname,
            email: self.email,
            phone: self.phone,
        })
    }
}

/// Beneficiary as shown in list responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiarySummary {
    pub beneficiary_id: String,
    pub beneficiary_type: BeneficiaryType,
    pub name: String,
    pub nickname: String,
    pub account_number: String,
    pub bank_name: String,
    pub status: BeneficiaryStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Beneficiary> for BeneficiarySummary {
    fn from(beneficiary: Beneficiary) -> Self {
        Self {
            beneficiary_id: beneficiary.beneficiary_id,
            beneficiary_type: beneficiary.beneficiary_type,
            name: beneficiary.name,
            nickname: beneficiary.nickname,
            account_number: beneficiary.account_number,
            bank_name: beneficiary.bank_name,
            status: beneficiary.status,
            created_at: beneficiary.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BeneficiaryListResponse {
    pub beneficiaries: Vec<BeneficiarySummary>,
    pub pagination: Pagination,
}
