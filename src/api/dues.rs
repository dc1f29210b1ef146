use chrono::NaiveDate;
use reqwest::Method;
use serde::Serialize;
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::models::{Due, DueFilter, DueUpdate, Page};
use crate::types::{DueId, LoanId, PaymentMode};

/// body of a collection against one due
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    pub paid_amount: Money,
    pub paid_date: NaiveDate,
    pub payment_mode: PaymentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl ApiClient {
    /// one page of the dues falling on `date`
    #[instrument(skip(self, filter), fields(city_id = ?filter.city_id, customer_id = ?filter.customer_id))]
    pub async fn dues_by_date(
        &self,
        date: NaiveDate,
        page: u32,
        limit: u32,
        filter: &DueFilter,
    ) -> Result<Page<Due>> {
        let mut query: Vec<(&str, String)> = vec![
            ("date", date.format("%Y-%m-%d").to_string()),
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(city) = filter.city_id {
            query.push(("city_id", city.to_string()));
        }
        if let Some(customer) = filter.customer_id {
            query.push(("customer_id", customer.to_string()));
        }
        let request = self.authed(Method::GET, "dues")?.query(&query);
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn loan_dues(&self, loan_id: LoanId) -> Result<Vec<Due>> {
        let request = self.authed(Method::GET, &format!("loans/{loan_id}/dues"))?;
        self.send_json(request).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_due(&self, id: DueId, update: &DueUpdate) -> Result<Due> {
        if update.is_empty() {
            return Err(LendingError::InvalidField {
                field: "due",
                message: "nothing to update".to_string(),
            });
        }
        let request = self.authed(Method::PUT, &format!("dues/{id}"))?.json(update);
        self.send_json(request).await
    }

    #[instrument(skip(self, collection), fields(paid_amount = %collection.paid_amount))]
    pub async fn collect_due(&self, id: DueId, collection: &Collection) -> Result<Due> {
        let request = self
            .authed(Method::POST, &format!("dues/{id}/collect"))?
            .json(collection);
        let due: Due = self.send_json(request).await?;
        info!(due_id = id, status = ?due.status, "due collected");
        Ok(due)
    }
}
