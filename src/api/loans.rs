use chrono::NaiveDate;
use reqwest::Method;
use serde::Serialize;
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::errors::Result;
use crate::models::{Loan, LoanReport, NewLoan, ReceiptPayload, SettlementRequest, SettlementSummary};
use crate::types::{CustomerId, LoanId, LoanStatus};

#[derive(Serialize)]
struct StatusChange {
    status: LoanStatus,
}

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn loans(
        &self,
        status: Option<LoanStatus>,
        customer_id: Option<CustomerId>,
    ) -> Result<Vec<Loan>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(status) = status {
            // serialized form of the enum, e.g. "in_progress"
            let value = serde_json::to_value(status)?;
            if let Some(s) = value.as_str() {
                query.push(("status", s.to_string()));
            }
        }
        if let Some(customer) = customer_id {
            query.push(("customer_id", customer.to_string()));
        }
        let request = self.authed(Method::GET, "loans")?.query(&query);
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn loan(&self, id: LoanId) -> Result<Loan> {
        let request = self.authed(Method::GET, &format!("loans/{id}"))?;
        self.send_json(request).await
    }

    #[instrument(skip(self, loan), fields(customer_id = loan.customer_id, principal = %loan.principal))]
    pub async fn create_loan(&self, loan: &NewLoan) -> Result<Loan> {
        let request = self.authed(Method::POST, "loans")?.json(loan);
        let created: Loan = self.send_json(request).await?;
        info!(loan_id = created.id, "loan created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update_loan_status(&self, id: LoanId, status: LoanStatus) -> Result<Loan> {
        let request = self
            .authed(Method::PATCH, &format!("loans/{id}/status"))?
            .json(&StatusChange { status });
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn delete_loan(&self, id: LoanId) -> Result<()> {
        let request = self.authed(Method::DELETE, &format!("loans/{id}"))?;
        self.send_empty(request).await
    }

    #[instrument(skip(self))]
    pub async fn loan_report(&self, id: LoanId) -> Result<LoanReport> {
        let request = self.authed(Method::GET, &format!("loans/{id}/report"))?;
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn settlement_summary(&self, loan_id: LoanId) -> Result<SettlementSummary> {
        let request = self.authed(Method::GET, &format!("loans/{loan_id}/settlement"))?;
        self.send_json(request).await
    }

    #[instrument(skip(self, request), fields(paid_amount = %request.paid_amount))]
    pub async fn settle(&self, loan_id: LoanId, request: &SettlementRequest) -> Result<()> {
        let http = self
            .authed(Method::POST, &format!("loans/{loan_id}/settle"))?
            .json(request);
        self.send_empty(http).await?;
        info!(loan_id, "loan settled");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn receipt_data(
        &self,
        loan_id: LoanId,
        due_date: Option<NaiveDate>,
    ) -> Result<ReceiptPayload> {
        let mut request = self.authed(Method::GET, &format!("loans/{loan_id}/receipt"))?;
        if let Some(date) = due_date {
            request = request.query(&[("due_date", date.format("%Y-%m-%d").to_string())]);
        }
        self.send_json(request).await
    }
}
