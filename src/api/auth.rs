use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::errors::{FieldError, Result};
use crate::session::{Session, SessionStore, UserProfile};
use crate::types::{EmployeeId, Role};
use crate::validation;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    mobile: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    pub role: Role,
    #[serde(alias = "id")]
    pub user_id: EmployeeId,
    #[serde(default, alias = "user")]
    pub profile: Option<UserProfile>,
}

impl From<LoginResponse> for Session {
    fn from(r: LoginResponse) -> Self {
        Session {
            token: r.token,
            role: r.role,
            user_id: r.user_id,
            profile: r.profile,
        }
    }
}

/// self-service sign up
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub mobile: String,
    pub password: String,
    pub role: Role,
}

impl Registration {
    pub fn new(name: &str, mobile: &str, password: &str, role: Role) -> Result<Self> {
        let name = validation::require("name", name)?;
        let mobile = validation::validate_mobile("mobile", mobile)?;
        if password.len() < 6 {
            return Err(FieldError::new("password", "must be at least 6 characters").into());
        }
        Ok(Self {
            name,
            mobile,
            password: password.to_string(),
            role,
        })
    }
}

impl ApiClient {
    /// sign in, keep the session on this client and persist it
    #[instrument(skip(self, password, store))]
    pub async fn login(
        &mut self,
        mobile: &str,
        password: &str,
        store: &dyn SessionStore,
    ) -> Result<Session> {
        let mobile = validation::validate_mobile("mobile", mobile)?;
        let password = validation::require("password", password)?;

        let request = self
            .public(Method::POST, "auth/login")?
            .json(&LoginRequest { mobile: &mobile, password: &password });
        let response: LoginResponse = self.send_json(request).await?;
        let session = Session::from(response);

        store.save(&session)?;
        self.session = Some(session.clone());
        info!(user_id = session.user_id, role = ?session.role, "signed in");
        Ok(session)
    }

    #[instrument(skip(self, registration), fields(mobile = %registration.mobile))]
    pub async fn register(&self, registration: &Registration) -> Result<()> {
        let request = self.public(Method::POST, "auth/register")?.json(registration);
        self.send_empty(request).await
    }

    /// drop the session locally; the token simply stops being sent
    pub fn logout(&mut self, store: &dyn SessionStore) -> Result<()> {
        self.session = None;
        store.clear()
    }
}
