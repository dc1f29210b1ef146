pub mod schedule;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::{Money, Rate};
use crate::errors::{FieldError, LendingError, Result};
use crate::validation::{self, Validator};

pub use schedule::{Installment, RepaymentPlan};

/// principal, flat annual rate and tenure for a loan quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub rate: Rate,
    pub tenure_months: u32,
}

impl LoanTerms {
    pub fn new(principal: Money, rate: Rate, tenure_months: u32) -> Result<Self> {
        if !principal.is_positive() {
            return Err(FieldError::new("principal", "must be greater than zero").into());
        }
        if rate.as_decimal() <= Decimal::ZERO {
            return Err(FieldError::new("rate", "must be greater than zero").into());
        }
        if tenure_months == 0 {
            return Err(FieldError::new("tenure", "must be greater than zero").into());
        }
        Ok(Self { principal, rate, tenure_months })
    }

    /// parse raw form input; every missing or invalid field is reported at once
    pub fn parse(principal: &str, rate: &str, tenure_months: &str) -> Result<Self> {
        let mut v = Validator::new();
        let principal = v.check(validation::parse_positive_whole("principal", principal));
        let rate = v.check(validation::parse_positive_rate("rate", rate));
        let tenure = v.check(validation::parse_positive_months("tenure", tenure_months));

        v.finish()?;
        let (Some(principal), Some(rate), Some(tenure_months)) = (principal, rate, tenure) else {
            return Err(LendingError::InvalidState {
                current: "incomplete loan terms".to_string(),
                expected: "validated loan terms".to_string(),
            });
        };
        Ok(Self { principal, rate, tenure_months })
    }

    /// flat interest quote.
    ///
    /// interest is floored to whole rupees while the installment is ceiled, so
    /// `monthly * tenure` can exceed `total` by up to `tenure - 1` rupees. The
    /// backend uses the same rounding; keep both in step.
    /// fails with a principal field error when the figures leave the decimal range.
    pub fn quote(&self) -> Result<LoanQuote> {
        let out_of_range = || FieldError::new("principal", "is too large to quote");
        let tenure = Decimal::from(self.tenure_months);
        let interest = self
            .principal
            .as_decimal()
            .checked_mul(self.rate.as_decimal())
            .and_then(|d| d.checked_mul(tenure))
            .and_then(|d| d.checked_div(dec!(12)))
            .map(|d| Money::from_decimal(d.floor()))
            .ok_or_else(out_of_range)?;
        let total_payable = self.principal.checked_add(interest).ok_or_else(out_of_range)?;
        let monthly_installment =
            Money::from_decimal((total_payable.as_decimal() / tenure).ceil());

        debug!(
            principal = %self.principal,
            rate = %self.rate,
            tenure = self.tenure_months,
            %interest,
            %monthly_installment,
            "loan quote"
        );

        Ok(LoanQuote {
            terms: *self,
            interest,
            total_payable,
            monthly_installment,
        })
    }
}

/// result of the interest/EMI calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub terms: LoanTerms,
    pub interest: Money,
    pub total_payable: Money,
    pub monthly_installment: Money,
}

impl LoanQuote {
    pub fn formatted(&self, currency_symbol: &str) -> FormattedQuote {
        FormattedQuote {
            interest: self.interest.format_with_symbol(currency_symbol),
            total_payable: self.total_payable.format_with_symbol(currency_symbol),
            monthly_installment: self.monthly_installment.format_with_symbol(currency_symbol),
        }
    }
}

/// display strings for a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedQuote {
    pub interest: String,
    pub total_payable: String,
    pub monthly_installment: String,
}

/// parse and quote in one step, as the calculator form does
pub fn calculate(principal: &str, rate: &str, tenure_months: &str) -> Result<LoanQuote> {
    LoanTerms::parse(principal, rate, tenure_months)?.quote()
}

/// loan close date: start plus tenure months, day clamped to the month's end
pub fn close_date(start: NaiveDate, tenure_months: u32) -> Result<NaiveDate> {
    start
        .checked_add_months(Months::new(tenure_months))
        .ok_or_else(|| LendingError::InvalidField {
            field: "start_date",
            message: format!("{start} plus {tenure_months} months is out of range"),
        })
}
