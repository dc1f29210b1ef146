use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::instrument;

use crate::api::ApiClient;
use crate::errors::{LendingError, Result};
use crate::media::CapturedImage;
use crate::models::{City, Customer, Employee, NewCustomer, NewEmployee};
use crate::types::{CityId, CustomerId, EmployeeId};

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn customers(&self, search: Option<&str>, city_id: Option<CityId>) -> Result<Vec<Customer>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            query.push(("search", term.to_string()));
        }
        if let Some(city) = city_id {
            query.push(("city_id", city.to_string()));
        }
        let request = self.authed(Method::GET, "customers")?.query(&query);
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn customer(&self, id: CustomerId) -> Result<Customer> {
        let request = self.authed(Method::GET, &format!("customers/{id}"))?;
        self.send_json(request).await
    }

    #[instrument(skip(self, customer), fields(mobile = %customer.mobile))]
    pub async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer> {
        let request = self.authed(Method::POST, "customers")?.json(customer);
        self.send_json(request).await
    }

    /// multipart submission with the customer's photo; uses the longer upload timeout
    #[instrument(skip(self, customer, photo), fields(mobile = %customer.mobile, photo_bytes = photo.bytes.len()))]
    pub async fn create_customer_with_photo(
        &self,
        customer: &NewCustomer,
        photo: CapturedImage,
    ) -> Result<Customer> {
        let fields = serde_json::to_value(customer)?;
        let mut form = Form::new();
        if let serde_json::Value::Object(map) = fields {
            for (key, value) in map {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                form = form.text(key, text);
            }
        }
        let part = Part::bytes(photo.bytes)
            .file_name(photo.file_name)
            .mime_str(&photo.mime_type)
            .map_err(|e| LendingError::Capture {
                message: format!("unsupported image type: {e}"),
            })?;
        form = form.part("photo", part);

        let request = self
            .authed(Method::POST, "customers")?
            .timeout(self.upload_timeout)
            .multipart(form);
        self.send_json(request).await
    }

    #[instrument(skip(self, customer))]
    pub async fn update_customer(&self, id: CustomerId, customer: &NewCustomer) -> Result<Customer> {
        let request = self.authed(Method::PUT, &format!("customers/{id}"))?.json(customer);
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: CustomerId) -> Result<()> {
        let request = self.authed(Method::DELETE, &format!("customers/{id}"))?;
        self.send_empty(request).await
    }

    #[instrument(skip(self))]
    pub async fn employees(&self) -> Result<Vec<Employee>> {
        let request = self.authed(Method::GET, "employees")?;
        self.send_json(request).await
    }

    #[instrument(skip(self, employee), fields(mobile = %employee.mobile))]
    pub async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee> {
        let request = self.authed(Method::POST, "employees")?.json(employee);
        self.send_json(request).await
    }

    #[instrument(skip(self, employee))]
    pub async fn update_employee(&self, id: EmployeeId, employee: &NewEmployee) -> Result<Employee> {
        let request = self.authed(Method::PUT, &format!("employees/{id}"))?.json(employee);
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn delete_employee(&self, id: EmployeeId) -> Result<()> {
        let request = self.authed(Method::DELETE, &format!("employees/{id}"))?;
        self.send_empty(request).await
    }

    #[instrument(skip(self))]
    pub async fn cities(&self) -> Result<Vec<City>> {
        let request = self.authed(Method::GET, "cities")?;
        self.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support;
    use crate::models::CustomerForm;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn customer_json(id: u64) -> serde_json::Value {
        json!({
            "id": id, "name": "Lakshmi", "mobile": "9876501234", "aadhaar": "123412341234",
            "address": "2 Bazaar Street", "city_id": 5
        })
    }

    #[tokio::test]
    async fn test_customer_search_sends_token_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/customers"))
            .and(query_param("search", "laks"))
            .and(query_param("city_id", "5"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [customer_json(1)]})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_support::client(&server);
        let customers = client.customers(Some(" laks "), Some(5)).await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name, "Lakshmi");
    }

    #[tokio::test]
    async fn test_create_customer_posts_validated_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/customers"))
            .respond_with(ResponseTemplate::new(201).set_body_json(customer_json(9)))
            .expect(1)
            .mount(&server)
            .await;

        let form = CustomerForm {
            name: "Lakshmi".to_string(),
            mobile: "9876501234".to_string(),
            aadhaar: "1234 1234 1234".to_string(),
            address: "2 Bazaar Street".to_string(),
            city_id: Some(5),
            ..Default::default()
        };
        let client = test_support::client(&server);
        let created = client.create_customer(&form.validate().unwrap()).await.unwrap();
        assert_eq!(created.id, 9);

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["aadhaar"], "123412341234");
    }

    #[tokio::test]
    async fn test_delete_reports_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/customers/3"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"error": "Customer has active loans"})),
            )
            .mount(&server)
            .await;

        let client = test_support::client(&server);
        let err = client.delete_customer(3).await.unwrap_err();
        assert_eq!(err.user_message(), "Customer has active loans");
    }

    #[tokio::test]
    async fn test_cities() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cities"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Salem"}, {"id": 2, "name": "Namakkal"}
            ])))
            .mount(&server)
            .await;

        let cities = test_support::client(&server).cities().await.unwrap();
        assert_eq!(cities[1].name, "Namakkal");
    }
}
