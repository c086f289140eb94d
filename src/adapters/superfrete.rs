use crate::adapters::normalize::{normalize_offers, NormalizeMode};
use crate::config::ShippingConfig;
use crate::domain::dimensions::round_kg;
use crate::domain::model::ShippingOffer;
use crate::domain::ports::{QuoteRequest, QuoteService};
use crate::utils::error::{AdvisorError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

const SERVICE: &str = "SuperFrete";

pub struct SuperFreteClient {
    client: Client,
    endpoint: String,
    token: Option<SecretString>,
    user_agent: String,
    services: String,
    mode: NormalizeMode,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CalculatorBody {
    pub from: PostalField,
    pub to: PostalField,
    pub package: PackageField,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PostalField {
    pub postal_code: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PackageField {
    pub length: u32,
    pub width: u32,
    pub height: u32,
    pub weight: f64,
}

impl SuperFreteClient {
    pub fn new(config: &ShippingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
            token: config.token.clone(),
            user_agent: format!("pack-advisor/{} ({})", env!("CARGO_PKG_VERSION"), config.contact_email),
            services: config.services.join(","),
            mode: NormalizeMode::from_strict_flag(config.strict),
        })
    }

    /// Whole centimeters and three-decimal kilograms, as the calculator expects.
    pub fn build_body(&self, request: &QuoteRequest) -> CalculatorBody {
        let (length, width, height) = request.dimensions.rounded();
        CalculatorBody {
            from: PostalField {
                postal_code: request.origin.to_string(),
            },
            to: PostalField {
                postal_code: request.destination.to_string(),
            },
            package: PackageField {
                length,
                width,
                height,
                weight: round_kg(request.weight_kg),
            },
            services: (!self.services.is_empty()).then(|| self.services.clone()),
        }
    }

    fn network_error(e: reqwest::Error) -> AdvisorError {
        let message = if e.is_timeout() {
            format!("request timed out: {}", e)
        } else {
            e.to_string()
        };
        AdvisorError::Network {
            service: SERVICE.to_string(),
            message,
        }
    }
}

#[async_trait]
impl QuoteService for SuperFreteClient {
    async fn quote(&self, request: &QuoteRequest) -> Result<Vec<ShippingOffer>> {
        let token = self.token.as_ref().ok_or_else(|| AdvisorError::MissingCredential {
            service: SERVICE.to_string(),
        })?;

        let body = self.build_body(request);
        tracing::info!(
            "📦 Requesting quote {} -> {} ({}x{}x{} cm, {} kg)",
            body.from.postal_code,
            body.to.postal_code,
            body.package.length,
            body.package.width,
            body.package.height,
            body.package.weight
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token.expose_secret())
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Self::network_error)?;

        let status = response.status();
        tracing::debug!("Quote response status: {}", status);
        let text = response.text().await.map_err(Self::network_error)?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(AdvisorError::Unauthorized {
                service: SERVICE.to_string(),
            });
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(AdvisorError::HttpStatus {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| AdvisorError::UnrecognizedShape {
                message: format!("body is not JSON: {}", e),
            })?;

        normalize_offers(&json, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::domain::model::Dimensions;
    use crate::domain::postal::sanitize_postal_code;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer, token: Option<&str>, strict: bool) -> SuperFreteClient {
        let mut config = AppConfig::default().shipping;
        config.production_url = server.url("/api/v0/calculator");
        config.token = token.map(|t| SecretString::from(t.to_string()));
        config.contact_email = "loja@example.com".to_string();
        config.strict = strict;
        SuperFreteClient::new(&config).unwrap()
    }

    fn request() -> QuoteRequest {
        QuoteRequest {
            origin: sanitize_postal_code("01001-000").unwrap(),
            destination: sanitize_postal_code("20040-020").unwrap(),
            dimensions: Dimensions::new(24.4, 18.0, 6.0).unwrap(),
            weight_kg: 0.35049,
        }
    }

    #[test]
    fn test_body_rounds_dimensions_and_weight() {
        let server = MockServer::start();
        let client = client_for(&server, Some("tok"), false);
        let body = client.build_body(&request());

        assert_eq!(body.from.postal_code, "01001000");
        assert_eq!(body.to.postal_code, "20040020");
        assert_eq!((body.package.length, body.package.width, body.package.height), (24, 18, 6));
        assert_eq!(body.package.weight, 0.35);
        assert_eq!(body.services.as_deref(), Some("1,2,17"));
    }

    #[tokio::test]
    async fn test_quote_success() {
        let server = MockServer::start();
        let user_agent = format!("pack-advisor/{} (loja@example.com)", env!("CARGO_PKG_VERSION"));
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v0/calculator")
                .header("authorization", "Bearer tok")
                .header("user-agent", user_agent.as_str())
                .json_body(serde_json::json!({
                    "from": {"postal_code": "01001000"},
                    "to": {"postal_code": "20040020"},
                    "package": {"length": 24, "width": 18, "height": 6, "weight": 0.35},
                    "services": "1,2,17"
                }));
            then.status(200).json_body(serde_json::json!([
                {"name": "PAC", "price": 19.9, "delivery_time": 8, "company": {"name": "Correios"}},
                {"name": "SEDEX", "price": 31.2, "delivery_time": 2, "company": {"name": "Correios"}}
            ]));
        });

        let client = client_for(&server, Some("tok"), false);
        let offers = client.quote(&request()).await.unwrap();

        api_mock.assert();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[1].service, "SEDEX");
        assert_eq!(offers[1].delivery_days, Some(2));
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_call() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200);
        });

        let client = client_for(&server, None, false);
        let err = client.quote(&request()).await.unwrap_err();

        assert!(matches!(err, AdvisorError::MissingCredential { .. }));
        api_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(401).body(r#"{"message":"Unauthenticated."}"#);
        });

        let client = client_for(&server, Some("expired"), false);
        let err = client.quote(&request()).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_http_error_keeps_status_and_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(422).body(r#"{"message":"CEP de destino inválido"}"#);
        });

        let client = client_for(&server, Some("tok"), false);
        match client.quote(&request()).await.unwrap_err() {
            AdvisorError::HttpStatus { status, body, .. } => {
                assert_eq!(status, 422);
                assert!(body.contains("CEP de destino"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_and_empty_bodies() {
        let server = MockServer::start();
        let mut html_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200).body("<html>maintenance</html>");
        });

        let client = client_for(&server, Some("tok"), false);
        assert!(matches!(
            client.quote(&request()).await.unwrap_err(),
            AdvisorError::UnrecognizedShape { .. }
        ));
        html_mock.delete();

        server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(serde_json::json!({"data": []}));
        });
        assert!(matches!(
            client.quote(&request()).await.unwrap_err(),
            AdvisorError::NoOffers
        ));
    }

    #[tokio::test]
    async fn test_network_failure() {
        let mut config = AppConfig::default().shipping;
        // Nothing listens on port 9 locally.
        config.production_url = "http://127.0.0.1:9/api/v0/calculator".to_string();
        config.token = Some(SecretString::from("tok".to_string()));
        config.timeout_secs = 2;
        let client = SuperFreteClient::new(&config).unwrap();

        let err = client.quote(&request()).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Network { .. }));
    }
}
