use chrono::NaiveDate;

use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::models::{SettlementRequest, SettlementSummary};
use crate::types::LoanId;
use crate::validation;

/// editable fields of one settlement attempt, kept as typed by the operator
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementForm {
    loan_id: LoanId,
    summary: SettlementSummary,
    /// blank means "pay the final amount"
    pub paid_amount: String,
    pub settlement_date: Option<NaiveDate>,
    pub additional_charge: String,
    pub adjustment: String,
    /// last validation or submission failure, shown as an alert
    pub alert: Option<String>,
}

impl SettlementForm {
    pub fn new(loan_id: LoanId, summary: SettlementSummary, today: NaiveDate) -> Self {
        Self {
            loan_id,
            summary,
            paid_amount: String::new(),
            settlement_date: Some(today),
            additional_charge: String::new(),
            adjustment: String::new(),
            alert: None,
        }
    }

    pub fn loan_id(&self) -> LoanId {
        self.loan_id
    }

    pub fn summary(&self) -> &SettlementSummary {
        &self.summary
    }

    pub fn late_days(&self) -> u32 {
        self.summary.late_days
    }

    /// `balance_due + additional_charge - adjustment`, recomputed on every call;
    /// `None` while either input is not a number or the result is out of range
    pub fn final_settle_amount(&self) -> Option<Money> {
        let charge = parse_loose(&self.additional_charge)?;
        let adjustment = parse_loose(&self.adjustment)?;
        self.summary.balance_due.checked_add(charge)?.checked_sub(adjustment)
    }

    /// validated request body; nothing here touches the network
    pub fn request(&self) -> Result<SettlementRequest> {
        let additional_charge =
            validation::parse_optional_amount("additional_charge", &self.additional_charge)?;
        let adjustment = validation::parse_optional_amount("adjustment", &self.adjustment)?;
        let final_amount = self
            .summary
            .balance_due
            .checked_add(additional_charge)
            .and_then(|m| m.checked_sub(adjustment))
            .ok_or(LendingError::InvalidField {
                field: "additional_charge",
                message: "is too large".to_string(),
            })?;
        if !final_amount.is_positive() {
            return Err(LendingError::InvalidAmount { amount: final_amount });
        }
        let settlement_paid_date = self.settlement_date.ok_or(LendingError::MissingSettlementDate)?;
        let paid_amount = if self.paid_amount.trim().is_empty() {
            final_amount
        } else {
            validation::parse_positive_amount("paid_amount", &self.paid_amount)?
        };
        Ok(SettlementRequest {
            paid_amount,
            settlement_paid_date,
            additional_charge,
            adjustment,
        })
    }
}

fn parse_loose(raw: &str) -> Option<Money> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(Money::ZERO);
    }
    Money::from_str_exact(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::summary;

    fn form(balance: i64) -> SettlementForm {
        SettlementForm::new(7, summary(balance), NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
    }

    #[test]
    fn test_final_amount_follows_edits() {
        let mut f = form(5000);
        assert_eq!(f.final_settle_amount(), Some(Money::from_major(5000)));
        f.additional_charge = "200".into();
        assert_eq!(f.final_settle_amount(), Some(Money::from_major(5200)));
        f.adjustment = "100".into();
        assert_eq!(f.final_settle_amount(), Some(Money::from_major(5100)));
        f.adjustment = "abc".into();
        assert_eq!(f.final_settle_amount(), None);
        f.adjustment = String::new();
        assert_eq!(f.final_settle_amount(), Some(Money::from_major(5200)));
    }

    #[test]
    fn test_request_defaults_paid_to_final() {
        let mut f = form(5000);
        f.additional_charge = "200".into();
        f.adjustment = "100".into();
        let req = f.request().unwrap();
        assert_eq!(req.paid_amount, Money::from_major(5100));
        assert_eq!(req.additional_charge, Money::from_major(200));
        assert_eq!(req.adjustment, Money::from_major(100));

        f.paid_amount = "5000".into();
        assert_eq!(f.request().unwrap().paid_amount, Money::from_major(5000));
    }

    #[test]
    fn test_request_rejects_non_positive_and_missing_date() {
        let mut f = form(100);
        f.adjustment = "100".into();
        assert!(matches!(f.request(), Err(LendingError::InvalidAmount { .. })));

        let mut f = form(100);
        f.additional_charge = "x".into();
        assert!(matches!(f.request(), Err(LendingError::InvalidField { field: "additional_charge", .. })));

        let mut f = form(100);
        f.settlement_date = None;
        assert!(matches!(f.request(), Err(LendingError::MissingSettlementDate)));
    }

    #[test]
    fn test_huge_charge_is_rejected_not_overflowed() {
        let mut f = form(5000);
        f.additional_charge = "79228162514264337593543950335".into();
        assert_eq!(f.final_settle_amount(), None);
        assert!(matches!(
            f.request(),
            Err(LendingError::InvalidField { field: "additional_charge", .. })
        ));

        f.adjustment = "79228162514264337593543950335".into();
        f.additional_charge = String::new();
        assert!(matches!(f.request(), Err(LendingError::InvalidAmount { .. })));
    }
}
