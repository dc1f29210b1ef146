use serde::{Deserialize, Serialize};

use crate::errors::{FieldError, LendingError, Result};
use crate::types::{CityId, EmployeeId, Role};
use crate::validation::{self, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
}

/// staff account: collectors and admins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub city_id: Option<CityId>,
    #[serde(default = "active_default")]
    pub active: bool,
}

fn active_default() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct EmployeeForm {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub role: Role,
    pub city_id: Option<CityId>,
    /// required when creating, blank keeps the current password on update
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEmployee {
    pub name: String,
    pub mobile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_id: Option<CityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl EmployeeForm {
    pub fn validate(&self, creating: bool) -> Result<NewEmployee> {
        let mut v = Validator::new();
        let name = v.check(validation::require("name", &self.name));
        let mobile = v.check(validation::validate_mobile("mobile", &self.mobile));

        let email = self.email.trim();
        if !email.is_empty() && !looks_like_email(email) {
            v.push(FieldError::new("email", "is not a valid email address"));
        }
        let password = self.password.trim();
        if creating && password.len() < 6 {
            v.push(FieldError::new("password", "must be at least 6 characters"));
        }
        if self.role == Role::Employee && self.city_id.is_none() {
            v.push(FieldError::new("city", "employees must be assigned a city"));
        }

        v.finish()?;
        let (Some(name), Some(mobile)) = (name, mobile) else {
            return Err(LendingError::InvalidState {
                current: "incomplete employee form".to_string(),
                expected: "validated employee".to_string(),
            });
        };

        Ok(NewEmployee {
            name,
            mobile,
            email: (!email.is_empty()).then(|| email.to_string()),
            role: self.role,
            city_id: self.city_id,
            password: (!password.is_empty()).then(|| password.to_string()),
        })
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> EmployeeForm {
        EmployeeForm {
            name: "Selvi".to_string(),
            mobile: "9123456780".to_string(),
            email: "selvi@example.com".to_string(),
            role: Role::Employee,
            city_id: Some(1),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_create_requires_password() {
        let mut f = form();
        assert!(f.validate(true).is_ok());
        f.password = String::new();
        assert!(f.validate(true).is_err());
        assert!(f.validate(false).unwrap().password.is_none());
    }

    #[test]
    fn test_employee_needs_city() {
        let mut f = form();
        f.city_id = None;
        assert!(f.validate(true).is_err());
        f.role = Role::Admin;
        assert!(f.validate(true).is_ok());
    }

    #[test]
    fn test_email_shape() {
        let mut f = form();
        f.email = "selvi.example.com".to_string();
        assert!(f.validate(true).is_err());
        f.email = String::new();
        assert!(f.validate(true).unwrap().email.is_none());
    }

    #[test]
    fn test_employee_defaults_active() {
        let e: Employee = serde_json::from_str(
            r#"{"id": 7, "name": "Ravi", "mobile": "9000000001", "role": "admin"}"#,
        )
        .unwrap();
        assert!(e.active);
        assert_eq!(e.role, Role::Admin);
    }
}
