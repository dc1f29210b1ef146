use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calculator::LoanQuote;
use crate::decimal::Money;
use crate::errors::{LendingError, Result};

/// one scheduled installment of a repayment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub number: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub balance_before: Money,
    pub balance_after: Money,
}

/// client-side preview of the dues the backend will generate for a loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentPlan {
    pub quote: LoanQuote,
    pub start_date: NaiveDate,
    pub close_date: NaiveDate,
    pub installments: Vec<Installment>,
}

impl RepaymentPlan {
    /// first due falls one month after `start_date`.
    ///
    /// every installment is the rounded-up monthly amount except the last, which
    /// collects only what remains of `total_payable`. For very small loans the
    /// ceiling can clear the balance early, so the plan may hold fewer rows
    /// than the tenure.
    pub fn generate(quote: LoanQuote, start_date: NaiveDate) -> Result<Self> {
        let tenure = quote.terms.tenure_months;
        let mut installments = Vec::with_capacity(tenure as usize);
        let mut balance = quote.total_payable;

        for number in 1..=tenure {
            if !balance.is_positive() {
                break;
            }
            let due_date = add_months(start_date, number)?;
            let amount = if number == tenure {
                balance
            } else {
                quote.monthly_installment.min(balance)
            };
            let balance_after = balance - amount;

            installments.push(Installment {
                number,
                due_date,
                amount,
                balance_before: balance,
                balance_after,
            });

            balance = balance_after;
        }

        Ok(Self {
            quote,
            start_date,
            close_date: add_months(start_date, tenure)?,
            installments,
        })
    }

    pub fn get_installment(&self, number: u32) -> Option<&Installment> {
        if number == 0 {
            return None;
        }
        self.installments.get((number - 1) as usize)
    }

    /// remaining balance after the given installment is collected
    pub fn balance_after(&self, number: u32) -> Money {
        self.get_installment(number)
            .map(|i| i.balance_after)
            .unwrap_or(self.quote.total_payable)
    }

    pub fn total_scheduled(&self) -> Money {
        self.installments.iter().map(|i| i.amount).sum()
    }

    /// installments falling due on or before `date`
    pub fn due_by(&self, date: NaiveDate) -> impl Iterator<Item = &Installment> {
        self.installments.iter().filter(move |i| i.due_date <= date)
    }
}

fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| LendingError::InvalidField {
            field: "start_date",
            message: format!("{date} plus {months} months is out of range"),
        })
}
