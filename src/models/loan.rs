use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculator::{self, LoanQuote, LoanTerms};
use crate::decimal::{Money, Rate};
use crate::errors::{FieldError, LendingError, Result};
use crate::types::{CustomerId, EmployeeId, LoanId, LoanStatus};
use crate::validation::{self, Validator};

/// vehicle pledged against a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub number: String,
    #[serde(default)]
    pub make_model: Option<String>,
    #[serde(default)]
    pub year: Option<u16>,
}

/// loan record as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    #[serde(default)]
    pub loan_number: Option<String>,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    pub principal: Money,
    /// annual flat rate in percent
    pub interest_rate: Decimal,
    pub tenure_months: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub close_date: Option<NaiveDate>,
    pub status: LoanStatus,
    #[serde(default)]
    pub vehicle: Option<Vehicle>,
    #[serde(default)]
    pub document_charge: Option<Money>,
    #[serde(default)]
    pub monthly_installment: Option<Money>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn rate(&self) -> Rate {
        Rate::from_percentage_decimal(self.interest_rate)
    }

    pub fn terms(&self) -> Result<LoanTerms> {
        LoanTerms::new(self.principal, self.rate(), self.tenure_months)
    }

    /// close date from the backend, or derived from start and tenure
    pub fn effective_close_date(&self) -> Result<NaiveDate> {
        match self.close_date {
            Some(date) => Ok(date),
            None => calculator::close_date(self.start_date, self.tenure_months),
        }
    }

    /// settlement and collection only apply to open loans
    pub fn ensure_open(&self) -> Result<()> {
        if self.status.is_open() {
            Ok(())
        } else {
            Err(LendingError::LoanNotOpen { status: self.status })
        }
    }

    pub fn display_number(&self) -> String {
        self.loan_number
            .clone()
            .unwrap_or_else(|| format!("LN{:05}", self.id))
    }
}

/// raw loan form input
#[derive(Debug, Clone, Default)]
pub struct LoanForm {
    pub customer_id: Option<CustomerId>,
    pub principal: String,
    pub interest_rate: String,
    pub tenure_months: String,
    pub start_date: Option<NaiveDate>,
    pub vehicle_number: String,
    pub vehicle_make_model: String,
    pub vehicle_year: String,
    pub document_charge: String,
}

/// validated loan ready for submission, with the quote the operator saw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLoan {
    pub customer_id: CustomerId,
    pub principal: Money,
    pub interest_rate: Decimal,
    pub tenure_months: u32,
    pub start_date: NaiveDate,
    pub close_date: NaiveDate,
    pub interest_amount: Money,
    pub total_payable: Money,
    pub monthly_installment: Money,
    pub vehicle: Vehicle,
    pub document_charge: Money,
}

impl LoanForm {
    pub fn validate(&self) -> Result<NewLoan> {
        let mut v = Validator::new();
        if self.customer_id.is_none() {
            v.push(FieldError::new("customer", "select a customer"));
        }
        let principal = v.check(validation::parse_positive_whole("principal", &self.principal));
        let rate = v.check(validation::parse_positive_rate("interest_rate", &self.interest_rate));
        let tenure = v.check(validation::parse_positive_months("tenure", &self.tenure_months));
        if self.start_date.is_none() {
            v.push(FieldError::new("start_date", "is required"));
        }
        let vehicle_number = v.check(validation::validate_vehicle_number(&self.vehicle_number));
        let year = match self.vehicle_year.trim() {
            "" => None,
            raw => v.check(
                raw.parse::<u16>()
                    .ok()
                    .filter(|y| (1980..=2100).contains(y))
                    .ok_or_else(|| FieldError::new("vehicle_year", "must be a year like 2019")),
            ),
        };
        let document_charge =
            v.check(validation::parse_optional_amount("document_charge", &self.document_charge));

        v.finish()?;
        let (Some(customer_id), Some(principal), Some(rate), Some(tenure), Some(start_date), Some(number), Some(document_charge)) = (
            self.customer_id,
            principal,
            rate,
            tenure,
            self.start_date,
            vehicle_number,
            document_charge,
        ) else {
            return Err(LendingError::InvalidState {
                current: "incomplete loan form".to_string(),
                expected: "validated loan".to_string(),
            });
        };

        let quote: LoanQuote = LoanTerms::new(principal, rate, tenure)?.quote()?;
        let make_model = self.vehicle_make_model.trim();

        Ok(NewLoan {
            customer_id,
            principal,
            interest_rate: rate.as_percentage(),
            tenure_months: tenure,
            start_date,
            close_date: calculator::close_date(start_date, tenure)?,
            interest_amount: quote.interest,
            total_payable: quote.total_payable,
            monthly_installment: quote.monthly_installment,
            vehicle: Vehicle {
                number,
                make_model: (!make_model.is_empty()).then(|| make_model.to_string()),
                year,
            },
            document_charge,
        })
    }
}
