use serde::{Deserialize, Serialize};

use super::{EntityId, lenient};
use crate::error::CoreError;
use crate::resource::{FormMode, Resource, ResourceForm, optional_date};

fn default_currency() -> String {
    "USD".into()
}

fn default_status() -> String {
    "completed".into()
}

/// Recorded gift, online or entered by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub donor_name: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub purpose: String,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub payment_method: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub donated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationForm {
    pub donor_name: String,
    pub email: String,
    pub amount: f64,
    pub currency: String,
    pub purpose: String,
    pub payment_method: String,
    pub status: String,
    pub donated_at: String,
}

impl Default for DonationForm {
    fn default() -> Self {
        Self {
            donor_name: String::new(),
            email: String::new(),
            amount: 0.0,
            currency: default_currency(),
            purpose: String::new(),
            payment_method: "cash".into(),
            status: default_status(),
            donated_at: String::new(),
        }
    }
}

impl ResourceForm for DonationForm {
    fn validate(&self, _mode: FormMode) -> Result<(), CoreError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(CoreError::validation("Amount must be greater than zero"));
        }
        if self.currency.len() != 3 {
            return Err(CoreError::validation("Currency must be a 3-letter code"));
        }
        optional_date("Donation date", &self.donated_at)?;
        Ok(())
    }
}

impl Resource for Donation {
    type Form = DonationForm;

    const COLLECTION: &'static str = "donations";
    const LABEL: &'static str = "Donation";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        let donor = if self.donor_name.is_empty() {
            "Anonymous"
        } else {
            &self.donor_name
        };
        format!("{donor} ({:.2} {})", self.amount, self.currency)
    }

    fn to_form(&self) -> DonationForm {
        DonationForm {
            donor_name: self.donor_name.clone(),
            email: self.email.clone(),
            amount: self.amount,
            currency: self.currency.clone(),
            purpose: self.purpose.clone(),
            payment_method: self.payment_method.clone(),
            status: self.status.clone(),
            donated_at: self.donated_at.clone().unwrap_or_default(),
        }
    }
}
