use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::{query::Filterable, store::Entity};

code_enum! {
    pub enum BeneficiaryType {
        Individual => "INDIVIDUAL",
        Business => "BUSINESS",
    }
}

code_enum! {
    pub enum BeneficiaryStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    pub beneficiary_id: String,
    pub beneficiary_type: BeneficiaryType,
    pub name: String,
    pub nickname: String,
    pub account_number: String,
    pub routing_number: String,
    pub bank_name: String,
    pub bank_address: BankAddress,
    pub email: String,
    pub phone: String,
    pub status: BeneficiaryStatus,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

/// Contact details that may be changed after creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeneficiaryChanges {
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Beneficiary {
    /// Apply the provided changes; absent fields keep their current value.
    pub fn apply(&mut self, changes: BeneficiaryChanges) {
        if let Some(nickname) = changes.nickname {
            self.nickname = nickname;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
    }
}

impl Entity for Beneficiary {
    const KIND: &'static str = "beneficiary";

    fn id(&self) -> &str {
        &self.beneficiary_id
    }
}

impl Filterable for Beneficiary {
    fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "beneficiaryType" => Some(self.beneficiary_type.as_str()),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}
