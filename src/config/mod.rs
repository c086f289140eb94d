#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::dimensions::{DEFAULT_VOLUMETRIC_DIVISOR, PACKAGING_ALLOWANCE_KG};
use crate::utils::error::{AdvisorError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;

pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const SUPERFRETE_PRODUCTION_URL: &str = "https://api.superfrete.com/api/v0/calculator";
pub const SUPERFRETE_SANDBOX_URL: &str = "https://sandbox.superfrete.com/api/v0/calculator";

/// Built once at start-up and handed to the clients by reference.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub advisor: AdvisorConfig,
    pub shipping: ShippingConfig,
    pub packaging: PackagingConfig,
}

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: Option<SecretString>,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub language: String,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ShippingConfig {
    pub token: Option<SecretString>,
    pub contact_email: String,
    pub sandbox: bool,
    pub production_url: String,
    pub sandbox_url: String,
    pub services: Vec<String>,
    pub timeout_secs: u64,
    pub strict: bool,
}

#[derive(Debug, Clone)]
pub struct PackagingConfig {
    pub volumetric_divisor: f64,
    pub packaging_allowance_kg: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            advisor: AdvisorConfig {
                api_key: None,
                endpoint: OPENAI_CHAT_URL.to_string(),
                model: "gpt-4o-mini".to_string(),
                temperature: 0.2,
                timeout_secs: 20,
                language: "pt-BR".to_string(),
                retry_backoff_ms: 1000,
            },
            shipping: ShippingConfig {
                token: None,
                contact_email: "contato@example.com".to_string(),
                sandbox: false,
                production_url: SUPERFRETE_PRODUCTION_URL.to_string(),
                sandbox_url: SUPERFRETE_SANDBOX_URL.to_string(),
                services: vec!["1".to_string(), "2".to_string(), "17".to_string()],
                timeout_secs: 15,
                strict: false,
            },
            packaging: PackagingConfig {
                volumetric_divisor: DEFAULT_VOLUMETRIC_DIVISOR,
                packaging_allowance_kg: PACKAGING_ALLOWANCE_KG,
            },
        }
    }
}

impl ShippingConfig {
    pub fn endpoint(&self) -> &str {
        if self.sandbox {
            &self.sandbox_url
        } else {
            &self.production_url
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

// TOML file layout; every key optional so a file only patches what it names.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    advisor: Option<FileAdvisor>,
    shipping: Option<FileShipping>,
    packaging: Option<FilePackaging>,
}

#[derive(Debug, Default, Deserialize)]
struct FileAdvisor {
    api_key: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
    language: Option<String>,
    retry_backoff_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileShipping {
    token: Option<String>,
    contact_email: Option<String>,
    sandbox: Option<bool>,
    production_url: Option<String>,
    sandbox_url: Option<String>,
    services: Option<Vec<String>>,
    timeout_secs: Option<u64>,
    strict: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct FilePackaging {
    volumetric_divisor: Option<f64>,
    packaging_allowance_kg: Option<f64>,
}

impl AppConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Optional TOML file first, then the environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Self::from_env();
        };
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdvisorError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        let file: FileConfig =
            toml::from_str(&processed).map_err(|e| AdvisorError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        let mut config = Self::default();
        config.apply_file(file);
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(a) = file.advisor {
            if let Some(v) = a.api_key {
                self.advisor.api_key = secret_value(v);
            }
            if let Some(v) = a.endpoint {
                self.advisor.endpoint = v;
            }
            if let Some(v) = a.model {
                self.advisor.model = v;
            }
            if let Some(v) = a.temperature {
                self.advisor.temperature = v;
            }
            if let Some(v) = a.timeout_secs {
                self.advisor.timeout_secs = v;
            }
            if let Some(v) = a.language {
                self.advisor.language = v;
            }
            if let Some(v) = a.retry_backoff_ms {
                self.advisor.retry_backoff_ms = v;
            }
        }

        if let Some(s) = file.shipping {
            if let Some(v) = s.token {
                self.shipping.token = secret_value(v);
            }
            if let Some(v) = s.contact_email {
                self.shipping.contact_email = v;
            }
            if let Some(v) = s.sandbox {
                self.shipping.sandbox = v;
            }
            if let Some(v) = s.production_url {
                self.shipping.production_url = v;
            }
            if let Some(v) = s.sandbox_url {
                self.shipping.sandbox_url = v;
            }
            if let Some(v) = s.services {
                self.shipping.services = v;
            }
            if let Some(v) = s.timeout_secs {
                self.shipping.timeout_secs = v;
            }
            if let Some(v) = s.strict {
                self.shipping.strict = v;
            }
        }

        if let Some(p) = file.packaging {
            if let Some(v) = p.volumetric_divisor {
                self.packaging.volumetric_divisor = v;
            }
            if let Some(v) = p.packaging_allowance_kg {
                self.packaging.packaging_allowance_kg = v;
            }
        }
    }

    /// Environment overrides. `lookup` is injected so tests don't mutate the
    /// process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("OPENAI_API_KEY") {
            self.advisor.api_key = secret_value(v);
        }
        if let Some(v) = lookup("OPENAI_BASE_URL") {
            self.advisor.endpoint = v;
        }
        if let Some(v) = lookup("OPENAI_MODEL") {
            self.advisor.model = v;
        }
        if let Some(v) = lookup("SUPERFRETE_TOKEN") {
            self.shipping.token = secret_value(v);
        }
        if let Some(v) = lookup("SUPERFRETE_EMAIL") {
            self.shipping.contact_email = v;
        }
        if let Some(v) = lookup("SUPERFRETE_SANDBOX") {
            self.shipping.sandbox = parse_flag("SUPERFRETE_SANDBOX", &v)?;
        }
        if let Some(v) = lookup("SUPERFRETE_SERVICES") {
            self.shipping.services = split_services(&v);
        }
        if let Some(v) = lookup("SUPERFRETE_STRICT") {
            self.shipping.strict = parse_flag("SUPERFRETE_STRICT", &v)?;
        }
        Ok(())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("advisor.endpoint", &self.advisor.endpoint)?;
        validation::validate_non_empty_string("advisor.model", &self.advisor.model)?;
        validation::validate_non_empty_string("advisor.language", &self.advisor.language)?;
        validation::validate_range("advisor.temperature", self.advisor.temperature, 0.0, 2.0)?;
        validation::validate_range("advisor.timeout_secs", self.advisor.timeout_secs, 1, 120)?;

        validation::validate_url("shipping.production_url", &self.shipping.production_url)?;
        validation::validate_url("shipping.sandbox_url", &self.shipping.sandbox_url)?;
        validation::validate_email("shipping.contact_email", &self.shipping.contact_email)?;
        validation::validate_range("shipping.timeout_secs", self.shipping.timeout_secs, 1, 120)?;
        if self.shipping.services.is_empty() {
            return Err(AdvisorError::InvalidConfigValueError {
                field: "shipping.services".to_string(),
                value: String::new(),
                reason: "At least one carrier service code is required".to_string(),
            });
        }

        validation::validate_positive(
            "packaging.volumetric_divisor",
            self.packaging.volumetric_divisor,
        )?;
        if self.packaging.packaging_allowance_kg < 0.0 {
            return Err(AdvisorError::InvalidConfigValueError {
                field: "packaging.packaging_allowance_kg".to_string(),
                value: self.packaging.packaging_allowance_kg.to_string(),
                reason: "Allowance cannot be negative".to_string(),
            });
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// Replaces `${VAR}` with the environment value; unknown variables stay as written.
fn substitute_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is a valid regex");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}

// Blank values and unresolved placeholders count as "no credential".
fn secret_value(value: String) -> Option<SecretString> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.starts_with("${") {
        None
    } else {
        Some(SecretString::from(trimmed.to_string()))
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(AdvisorError::InvalidConfigValueError {
            field: key.to_string(),
            value: other.to_string(),
            reason: "Expected true/false".to_string(),
        }),
    }
}

fn split_services(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// First and last characters only, for logging which credential is loaded.
pub fn redact(secret: &SecretString) -> String {
    let raw = secret.expose_secret();
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
