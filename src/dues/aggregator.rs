use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::api::LendingBackend;
use crate::config::ClientConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::models::{Due, DueFilter};

/// sums over the rows loaded so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueTotals {
    pub count: usize,
    pub due: Money,
    pub paid: Money,
    pub pending: Money,
}

/// Paginated list of dues for one date.
///
/// Page 1 replaces the rows, later pages append. Nothing is fetched once
/// `page >= total_pages`. A failed fetch leaves the rows and page untouched
/// and records a message in [`error`](Self::error); calling
/// [`load_more`](Self::load_more) again retries the same page, page 1 included.
#[derive(Debug, Clone)]
pub struct DueListAggregator {
    date: NaiveDate,
    filter: DueFilter,
    limit: u32,
    page: u32,
    total_pages: u32,
    total: u64,
    items: Vec<Due>,
    error: Option<String>,
}

impl DueListAggregator {
    pub fn new(date: NaiveDate, limit: u32) -> Self {
        Self {
            date,
            filter: DueFilter::default(),
            limit: limit.max(1),
            page: 0,
            total_pages: 0,
            total: 0,
            items: Vec::new(),
            error: None,
        }
    }

    pub fn from_config(config: &ClientConfig, date: NaiveDate) -> Self {
        Self::new(date, config.api.due_page_size)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn filter(&self) -> &DueFilter {
        &self.filter
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// total matching rows reported by the backend
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn items(&self) -> &[Due] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// true while a later page exists, or while the first page is still owed after a failure
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages || (self.page == 0 && self.error.is_some())
    }

    /// switch to `date` and fetch its first page
    pub async fn load(&mut self, backend: &dyn LendingBackend, date: NaiveDate) -> Result<()> {
        self.date = date;
        self.reset();
        self.fetch(backend, 1).await
    }

    /// replace the filter and reload page 1 of the current date
    pub async fn set_filter(&mut self, backend: &dyn LendingBackend, filter: DueFilter) -> Result<()> {
        self.filter = filter;
        self.reset();
        self.fetch(backend, 1).await
    }

    /// fetch the next page; `Ok(false)` when everything is already loaded
    pub async fn load_more(&mut self, backend: &dyn LendingBackend) -> Result<bool> {
        if !self.has_more() {
            debug!(page = self.page, total_pages = self.total_pages, "no more dues to load");
            return Ok(false);
        }
        self.fetch(backend, self.page + 1).await?;
        Ok(true)
    }

    pub fn totals(&self) -> DueTotals {
        self.items.iter().fold(DueTotals::default(), |mut acc, due| {
            acc.count += 1;
            acc.due += due.due_amount;
            acc.paid += due.paid_amount;
            acc.pending += due.outstanding();
            acc
        })
    }

    fn reset(&mut self) {
        self.page = 0;
        self.total_pages = 0;
        self.total = 0;
        self.items.clear();
        self.error = None;
    }

    async fn fetch(&mut self, backend: &dyn LendingBackend, page: u32) -> Result<()> {
        match backend.fetch_dues(self.date, page, self.limit, &self.filter).await {
            Ok(result) => {
                self.total = result.total;
                self.total_pages = result.total_pages(self.limit);
                if page == 1 {
                    self.items = result.items;
                } else {
                    self.items.extend(result.items);
                }
                self.page = page;
                self.error = None;
                debug!(
                    date = %self.date,
                    page,
                    total_pages = self.total_pages,
                    loaded = self.items.len(),
                    "dues page loaded"
                );
                Ok(())
            }
            Err(err) => {
                warn!(date = %self.date, page, error = %err, "dues fetch failed");
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{due, FakeBackend};
    use crate::types::DueStatus;

    fn backend(rows: u64) -> FakeBackend {
        FakeBackend {
            dues: (1..=rows).map(|id| due(id, 1000, DueStatus::Unpaid)).collect(),
            ..Default::default()
        }
    }

    fn june_5() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()
    }

    #[tokio::test]
    async fn test_first_page_then_append() {
        let backend = backend(45);
        let mut list = DueListAggregator::new(june_5(), 20);

        list.load(&backend, june_5()).await.unwrap();
        assert_eq!(list.items().len(), 20);
        assert_eq!(list.total_pages(), 3);

        assert!(list.load_more(&backend).await.unwrap());
        assert_eq!(list.items().len(), 40);
        assert!(list.load_more(&backend).await.unwrap());
        assert_eq!(list.items().len(), 45);
        assert_eq!(list.items()[44].id, 45);
    }

    #[tokio::test]
    async fn test_stops_at_last_page() {
        let backend = backend(20);
        let mut list = DueListAggregator::new(june_5(), 20);
        list.load(&backend, june_5()).await.unwrap();

        assert!(!list.load_more(&backend).await.unwrap());
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_reload_replaces() {
        let backend = backend(25);
        let mut list = DueListAggregator::new(june_5(), 20);
        list.load(&backend, june_5()).await.unwrap();
        list.load_more(&backend).await.unwrap();
        assert_eq!(list.items().len(), 25);

        let next_day = june_5().succ_opt().unwrap();
        list.load(&backend, next_day).await.unwrap();
        assert_eq!(list.items().len(), 20);
        assert_eq!(list.page(), 1);
        assert_eq!(list.date(), next_day);
    }

    #[tokio::test]
    async fn test_failure_sets_error_and_keeps_rows() {
        let mut backend = backend(30);
        backend.fail_page = Some(2);
        let mut list = DueListAggregator::new(june_5(), 20);
        list.load(&backend, june_5()).await.unwrap();

        assert!(list.load_more(&backend).await.is_err());
        assert_eq!(list.error(), Some("Server error"));
        assert_eq!(list.items().len(), 20);
        assert_eq!(list.page(), 1);

        backend.fail_page = None;
        assert!(list.load_more(&backend).await.unwrap());
        assert!(list.error().is_none());
        assert_eq!(list.items().len(), 30);
    }

    #[tokio::test]
    async fn test_failed_first_page_is_retried_by_load_more() {
        let mut backend = backend(30);
        backend.fail_page = Some(1);
        let mut list = DueListAggregator::new(june_5(), 20);

        assert!(list.load(&backend, june_5()).await.is_err());
        assert_eq!(list.error(), Some("Server error"));
        assert!(list.items().is_empty());
        assert!(list.has_more());

        backend.fail_page = None;
        assert!(list.load_more(&backend).await.unwrap());
        assert_eq!(list.page(), 1);
        assert_eq!(list.items().len(), 20);
        assert!(list.error().is_none());
        assert_eq!(backend.calls().len(), 2);
        assert!(backend.calls().iter().all(|c| c.contains("page=1")));
    }

    #[tokio::test]
    async fn test_empty_day() {
        let backend = backend(0);
        let mut list = DueListAggregator::new(june_5(), 20);
        list.load(&backend, june_5()).await.unwrap();
        assert!(list.items().is_empty());
        assert!(!list.has_more());
        assert!(!list.load_more(&backend).await.unwrap());
    }

    #[tokio::test]
    async fn test_filter_travels_with_every_page() {
        let backend = backend(25);
        let mut list = DueListAggregator::new(june_5(), 20);
        list.set_filter(&backend, DueFilter { city_id: Some(3), customer_id: None })
            .await
            .unwrap();
        list.load_more(&backend).await.unwrap();
        assert!(backend.calls().iter().all(|c| c.ends_with("city=Some(3)")));
    }

    #[tokio::test]
    async fn test_totals() {
        let backend = FakeBackend {
            dues: vec![due(1, 1000, DueStatus::Paid), due(2, 917, DueStatus::Unpaid)],
            ..Default::default()
        };
        let mut list = DueListAggregator::new(june_5(), 20);
        list.load(&backend, june_5()).await.unwrap();
        let totals = list.totals();
        assert_eq!(totals.count, 2);
        assert_eq!(totals.due, Money::from_major(1917));
        assert_eq!(totals.paid, Money::from_major(1000));
        assert_eq!(totals.pending, Money::from_major(917));
    }
}
