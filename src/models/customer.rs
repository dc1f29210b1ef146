use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{FieldError, LendingError, Result};
use crate::types::{CityId, CustomerId, EmployeeId};
use crate::validation::{self, Validator};

/// borrower record as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub guardian_name: Option<String>,
    pub mobile: String,
    #[serde(default)]
    pub alternate_mobile: Option<String>,
    pub aadhaar: String,
    #[serde(default)]
    pub pan: Option<String>,
    pub address: String,
    pub city_id: CityId,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub created_by: Option<EmployeeId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// raw customer form input
#[derive(Debug, Clone, Default)]
pub struct CustomerForm {
    pub name: String,
    pub guardian_name: String,
    pub mobile: String,
    pub alternate_mobile: String,
    pub aadhaar: String,
    pub pan: String,
    pub address: String,
    pub city_id: Option<CityId>,
    pub pincode: String,
}

/// validated customer ready for submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCustomer {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<String>,
    pub mobile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_mobile: Option<String>,
    pub aadhaar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
    pub address: String,
    pub city_id: CityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

fn optional(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl CustomerForm {
    pub fn validate(&self) -> Result<NewCustomer> {
        let mut v = Validator::new();
        let name = v.check(validation::require("name", &self.name));
        let mobile = v.check(validation::validate_mobile("mobile", &self.mobile));
        let alternate_mobile = optional(&self.alternate_mobile)
            .and_then(|m| v.check(validation::validate_mobile("alternate_mobile", m)));
        let aadhaar = v.check(validation::validate_aadhaar(&self.aadhaar));
        let pan = optional(&self.pan).and_then(|p| v.check(validation::validate_pan(p)));
        let address = v.check(validation::require("address", &self.address));
        let pincode = optional(&self.pincode).and_then(|p| v.check(validation::validate_pincode(p)));
        if self.city_id.is_none() {
            v.push(FieldError::new("city", "select a city"));
        }
        if let (Some(m), Some(alt)) = (&mobile, &alternate_mobile) {
            if m == alt {
                v.push(FieldError::new("alternate_mobile", "must differ from mobile"));
            }
        }

        v.finish()?;
        let (Some(name), Some(mobile), Some(aadhaar), Some(address), Some(city_id)) =
            (name, mobile, aadhaar, address, self.city_id)
        else {
            return Err(LendingError::InvalidState {
                current: "incomplete customer form".to_string(),
                expected: "validated customer".to_string(),
            });
        };

        Ok(NewCustomer {
            name,
            guardian_name: optional(&self.guardian_name).map(str::to_string),
            mobile,
            alternate_mobile,
            aadhaar,
            pan,
            address,
            city_id,
            pincode,
        })
    }
}
