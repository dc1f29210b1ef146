use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::errors::{LendingError, Result};

pub const ENV_API_URL: &str = "SRIVARI_API_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "SRIVARI_API_TIMEOUT_SECS";

/// client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub display: DisplayConfig,
    pub company: CompanyProfile,
    pub receipt: ReceiptConfig,
    /// where the signed-in session is persisted; `None` keeps it in memory
    #[serde(default)]
    pub session_path: Option<PathBuf>,
}

/// backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// longer budget for multipart submissions carrying photos
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub due_page_size: u32,
}

/// formatting for on-screen amounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub currency_symbol: String,
}

/// letterhead printed on every receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub address_lines: Vec<String>,
    pub phone: String,
    pub tagline: Option<String>,
}

/// receipt template assets and output location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptConfig {
    /// directory holding `<font_name>-Regular.ttf` and `<font_name>-Bold.ttf`
    pub font_dir: PathBuf,
    pub font_name: String,
    /// where save-and-share writes generated files
    pub output_dir: PathBuf,
    /// the embedded fonts may lack the rupee glyph, so PDFs use a text label
    pub currency_label: String,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_upload_timeout() -> u64 {
    15
}

fn default_page_size() -> u32 {
    20
}

impl ClientConfig {
    /// configuration for a deployed backend
    pub fn production(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                request_timeout_secs: default_request_timeout(),
                upload_timeout_secs: default_upload_timeout(),
                due_page_size: default_page_size(),
            },
            display: DisplayConfig {
                currency_symbol: "₹".to_string(),
            },
            company: CompanyProfile::sri_vari(),
            receipt: ReceiptConfig {
                font_dir: PathBuf::from("assets/fonts"),
                font_name: "LiberationSans".to_string(),
                output_dir: std::env::temp_dir(),
                currency_label: "Rs. ".to_string(),
            },
            session_path: None,
        }
    }

    /// configuration for a backend running on this machine
    pub fn local() -> Self {
        Self::production("http://127.0.0.1:8000/api/")
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ClientConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| LendingError::io(path.display().to_string(), e))?;
        debug!(path = %path.display(), "loading client config");
        Self::from_json_str(&raw)
    }

    /// apply `SRIVARI_API_URL` / `SRIVARI_API_TIMEOUT_SECS` when set
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
        if let Ok(raw) = std::env::var(ENV_API_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.api.request_timeout_secs = secs,
                Err(_) => warn!(value = %raw, "ignoring non-numeric {}", ENV_API_TIMEOUT_SECS),
            }
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.api.request_timeout_secs == 0 || self.api.upload_timeout_secs == 0 {
            return Err(LendingError::InvalidConfiguration {
                message: "timeouts must be at least one second".to_string(),
            });
        }
        if self.api.due_page_size == 0 {
            return Err(LendingError::InvalidConfiguration {
                message: "due page size must be greater than zero".to_string(),
            });
        }
        if self.company.name.trim().is_empty() {
            return Err(LendingError::InvalidConfiguration {
                message: "company name is required for receipts".to_string(),
            });
        }
        Ok(())
    }

    /// base url normalized with a trailing slash so endpoint joins keep the path prefix
    pub fn base_url(&self) -> Result<Url> {
        let mut raw = self.api.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw).map_err(|e| LendingError::InvalidConfiguration {
            message: format!("invalid api base url {raw:?}: {e}"),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LendingError::InvalidConfiguration {
                message: format!("unsupported scheme {}", url.scheme()),
            });
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.api.upload_timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::local()
    }
}

impl CompanyProfile {
    pub fn sri_vari() -> Self {
        Self {
            name: "SRI VARI FINANCE".to_string(),
            address_lines: vec!["Vehicle Finance".to_string()],
            phone: String::new(),
            tagline: Some("Thank you for your payment".to_string()),
        }
    }
}
