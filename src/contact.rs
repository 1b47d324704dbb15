// ✉️ Contact form - validation and webhook delivery
//
// Validation reports every field problem at once. Delivery is a single POST
// with no retry; the caller only learns success or failure (a toast).

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::OnceLock;
use tracing::{error, info};

const EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$";

pub const SUCCESS_MESSAGE: &str = "Mensagem enviada com sucesso!";
pub const FAILURE_MESSAGE: &str = "Erro ao enviar mensagem. Por favor, tente novamente.";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

// ============================================================================
// FORM
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub assunto: String,
    #[serde(default)]
    pub mensagem: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ContactForm {
    /// All field errors, in form order. Empty means the form can be sent.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.nome.trim().is_empty() {
            errors.push(FieldError { field: "nome", message: "Nome é obrigatório" });
        }

        if self.email.trim().is_empty() {
            errors.push(FieldError { field: "email", message: "Email é obrigatório" });
        } else if !email_regex().is_match(self.email.trim()) {
            errors.push(FieldError { field: "email", message: "Email inválido" });
        }

        if self.assunto.trim().is_empty() {
            errors.push(FieldError { field: "assunto", message: "Assunto é obrigatório" });
        }

        if self.mensagem.trim().is_empty() {
            errors.push(FieldError { field: "mensagem", message: "Mensagem é obrigatória" });
        }

        errors
    }

    /// Stamp the form for sending
    pub fn into_payload(self) -> ContactPayload {
        ContactPayload {
            form: self,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Body POSTed to the webhook: the form fields plus an ISO timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPayload {
    #[serde(flatten)]
    pub form: ContactForm,
    pub timestamp: String,
}

// ============================================================================
// DELIVERY
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("invalid form: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", "))]
    Invalid(Vec<FieldError>),

    #[error("contact webhook is not configured")]
    NotConfigured,

    #[error("webhook answered {0}")]
    Rejected(u16),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Something that can carry a payload to its destination.
pub trait ContactTransport {
    fn deliver(&self, payload: &ContactPayload) -> impl Future<Output = Result<(), ContactError>> + Send;
}

/// What the user sees after submitting
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ContactOutcome {
    /// Nothing was sent
    Invalid { errors: Vec<FieldError> },
    Sent { message: &'static str },
    Failed { message: &'static str },
}

impl ContactOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, ContactOutcome::Sent { .. })
    }
}

/// Validate, then deliver once.
pub async fn submit<T: ContactTransport>(transport: &T, form: ContactForm) -> ContactOutcome {
    let errors = form.validate();
    if !errors.is_empty() {
        return ContactOutcome::Invalid { errors };
    }

    let payload = form.into_payload();
    match transport.deliver(&payload).await {
        Ok(()) => {
            info!(assunto = %payload.form.assunto, "contact message delivered");
            ContactOutcome::Sent { message: SUCCESS_MESSAGE }
        }
        Err(e) => {
            error!(error = %e, "contact message not delivered");
            ContactOutcome::Failed { message: FAILURE_MESSAGE }
        }
    }
}

// ============================================================================
// WEBHOOK (server feature)
// ============================================================================

#[cfg(feature = "server")]
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    url: Option<String>,
}

#[cfg(feature = "server")]
impl WebhookClient {
    pub fn new(url: Option<String>) -> Self {
        WebhookClient {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[cfg(feature = "server")]
impl ContactTransport for WebhookClient {
    fn deliver(&self, payload: &ContactPayload) -> impl Future<Output = Result<(), ContactError>> + Send {
        let request = self
            .url
            .as_ref()
            .map(|url| self.client.post(url).json(payload));

        async move {
            let request = request.ok_or(ContactError::NotConfigured)?;
            let response = request
                .send()
                .await
                .map_err(|e| ContactError::Delivery(e.to_string()))?;

            if response.status().is_success() {
                Ok(())
            } else {
                Err(ContactError::Rejected(response.status().as_u16()))
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
