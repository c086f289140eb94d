use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid dimensions '{input}': expected LxWxH in centimeters")]
    InvalidDimensions { input: String },

    #[error("Invalid postal code '{input}' for {field}: expected 8 digits")]
    InvalidPostalCode { field: String, input: String },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing credential for {service}")]
    MissingCredential { service: String },

    #[error("{service} is rate limiting requests: {message}")]
    RateLimited { service: String, message: String },

    #[error("{service} quota exhausted: {message}")]
    QuotaExceeded { service: String, message: String },

    #[error("Malformed response from {service}: {message}")]
    MalformedResponse { service: String, message: String },

    #[error("{service} rejected the credential (invalid or expired)")]
    Unauthorized { service: String },

    #[error("{service} returned HTTP {status}: {body}")]
    HttpStatus {
        service: String,
        status: u16,
        body: String,
    },

    #[error("Network failure talking to {service}: {message}")]
    Network { service: String, message: String },

    #[error("No shipping offers returned")]
    NoOffers,

    #[error("Unrecognized quote response shape: {message}")]
    UnrecognizedShape { message: String },

    #[error("Invalid offer at index {index}: {reason}")]
    InvalidOffer { index: usize, reason: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Transient,
    Quota,
    Format,
    Remote,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdvisorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDimensions { .. }
            | Self::InvalidPostalCode { .. }
            | Self::InvalidInput { .. } => ErrorCategory::Input,
            Self::MissingCredential { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::RateLimited { .. } => ErrorCategory::Transient,
            Self::QuotaExceeded { .. } => ErrorCategory::Quota,
            Self::MalformedResponse { .. }
            | Self::SerializationError(_)
            | Self::NoOffers
            | Self::UnrecognizedShape { .. }
            | Self::InvalidOffer { .. } => ErrorCategory::Format,
            Self::Unauthorized { .. } | Self::HttpStatus { .. } => ErrorCategory::Remote,
            Self::Network { .. } | Self::HttpClientError(_) => ErrorCategory::Network,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Transient | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Quota | ErrorCategory::Format | ErrorCategory::Remote => {
                ErrorSeverity::High
            }
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Only a rate-limit signal earns the single automatic retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidDimensions { .. } => {
                "Informe as dimensões no formato CxLxA, por exemplo: 20x15x10".to_string()
            }
            Self::InvalidPostalCode { field, .. } => {
                format!("CEP de {} inválido: use 8 dígitos, por exemplo 01001-000", field)
            }
            Self::InvalidInput { field, reason } => format!("Campo {} inválido: {}", field, reason),
            Self::MissingCredential { service } => {
                format!("Credencial de {} não encontrada.", service)
            }
            Self::RateLimited { .. } => {
                "O serviço de recomendação está sobrecarregado. Tente novamente em instantes."
                    .to_string()
            }
            Self::QuotaExceeded { .. } => {
                "A cota do serviço de recomendação foi esgotada.".to_string()
            }
            Self::MalformedResponse { .. } | Self::SerializationError(_) => {
                "A resposta veio em um formato inesperado.".to_string()
            }
            Self::Unauthorized { service } => {
                format!("Token de {} inválido ou expirado.", service)
            }
            Self::HttpStatus { service, status, .. } => {
                format!("{} respondeu com erro HTTP {}.", service, status)
            }
            Self::Network { service, .. } => {
                format!("Não foi possível conectar a {}.", service)
            }
            Self::HttpClientError(_) => "Falha de comunicação HTTP.".to_string(),
            Self::NoOffers | Self::UnrecognizedShape { .. } | Self::InvalidOffer { .. } => {
                "Nenhuma cotação de frete disponível para esses dados.".to_string()
            }
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                format!("Configuração inválida: {}", self)
            }
            Self::IoError(e) => format!("Erro de sistema: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidDimensions { .. } => {
                "Use três números separados por 'x', por exemplo 20x15x10, ou --unknown-dimensions"
            }
            Self::InvalidPostalCode { .. } => "Informe um CEP de 8 dígitos, como 01001-000",
            Self::InvalidInput { .. } => "Corrija o campo indicado e envie novamente",
            Self::MissingCredential { .. } => {
                "Defina OPENAI_API_KEY / SUPERFRETE_TOKEN no ambiente ou no arquivo de configuração"
            }
            Self::RateLimited { .. } => "Aguarde alguns segundos e envie novamente",
            Self::QuotaExceeded { .. } => "Verifique o faturamento e a cota da conta da API",
            Self::MalformedResponse { .. } | Self::SerializationError(_) => {
                "Envie novamente; o modelo às vezes responde fora do formato JSON"
            }
            Self::Unauthorized { .. } => "Gere um novo token e atualize a configuração",
            Self::HttpStatus { .. } => "Veja no corpo da resposta o motivo informado pelo serviço",
            Self::Network { .. } | Self::HttpClientError(_) => {
                "Verifique a conexão de rede e a URL do serviço"
            }
            Self::NoOffers | Self::UnrecognizedShape { .. } | Self::InvalidOffer { .. } => {
                "Confira os CEPs e os serviços de transportadora configurados"
            }
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                "Corrija o valor na configuração e tente novamente"
            }
            Self::IoError(_) => "Verifique os caminhos de arquivo e as permissões",
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rate_limit_is_retryable() {
        let rate = AdvisorError::RateLimited {
            service: "OpenAI".to_string(),
            message: "slow down".to_string(),
        };
        let quota = AdvisorError::QuotaExceeded {
            service: "OpenAI".to_string(),
            message: "insufficient_quota".to_string(),
        };
        assert!(rate.is_retryable());
        assert!(!quota.is_retryable());
        assert!(!AdvisorError::NoOffers.is_retryable());
    }

    #[test]
    fn test_categories_follow_error_taxonomy() {
        let input = AdvisorError::InvalidDimensions {
            input: "abc".to_string(),
        };
        assert_eq!(input.category(), ErrorCategory::Input);
        assert_eq!(input.severity(), ErrorSeverity::Low);

        let missing = AdvisorError::MissingCredential {
            service: "SuperFrete".to_string(),
        };
        assert_eq!(missing.category(), ErrorCategory::Configuration);
        assert_eq!(missing.severity(), ErrorSeverity::Critical);

        let http = AdvisorError::HttpStatus {
            service: "SuperFrete".to_string(),
            status: 422,
            body: "bad cep".to_string(),
        };
        assert_eq!(http.category(), ErrorCategory::Remote);
        assert!(http.to_string().contains("422"));
    }

    #[test]
    fn test_malformed_response_message_is_generic() {
        let err = AdvisorError::MalformedResponse {
            service: "OpenAI".to_string(),
            message: "expected value at line 1".to_string(),
        };
        assert_eq!(
            err.user_friendly_message(),
            "A resposta veio em um formato inesperado."
        );
    }

    #[test]
    fn test_recovery_suggestions_are_portuguese() {
        let rate = AdvisorError::RateLimited {
            service: "OpenAI".to_string(),
            message: "slow down".to_string(),
        };
        assert_eq!(rate.recovery_suggestion(), "Aguarde alguns segundos e envie novamente");

        let postal = AdvisorError::InvalidPostalCode {
            field: "origem".to_string(),
            input: "123".to_string(),
        };
        assert!(postal.recovery_suggestion().starts_with("Informe um CEP"));
    }
}
