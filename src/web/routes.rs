use axum::{
    extract::State,
    response::Html,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    core::{
        credentials::{GateStatus, Verification},
        generator::Notice,
    },
    web::{
        page::{render_page, PageView},
        state::AppState,
    },
};

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub humor_api_key: Option<String>,
    /// `clear` when the clear button was pressed
    #[serde(default)]
    pub action: Option<String>,
}

impl CredentialsForm {
    pub fn clears(&self) -> bool {
        self.action.as_deref() == Some("clear")
    }

    /// Browsers post every input; an empty one leaves the stored key as is.
    fn submitted(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub custom_category: Option<String>,
}

impl GenerateForm {
    /// Free text wins over the selector when given
    pub fn category(&self) -> &str {
        match self.custom_category.as_deref().map(str::trim) {
            Some(custom) if !custom.is_empty() => custom,
            _ => self.category.trim(),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let view = PageView::new(state.generator.config().source, state.gate_status().await);
    Html(render_page(&view))
}

pub async fn submit_credentials(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Html<String> {
    let gate = state.generator.gate();
    let mut credentials = state.credentials().write().await;
    let mut notices = Vec::new();

    if form.clears() {
        credentials.clear();
        info!("Session keys cleared");
        notices.push(Notice::success("API keys cleared."));
    } else {
        if let Some(key) = CredentialsForm::submitted(form.openai_api_key) {
            credentials.set_openai_api_key(key);
        }
        if let Some(key) = CredentialsForm::submitted(form.humor_api_key) {
            credentials.set_humor_api_key(key);
        }
    }

    if credentials.openai_api_key().is_some() {
        if gate.requires_probe() && credentials.verification() != &Verification::Accepted {
            credentials.verify_openai_key(state.probe.as_ref()).await;
        }

        match credentials.verification() {
            Verification::Rejected(_) | Verification::Unreachable(_) => {}
            _ => {
                info!("OpenAI API key stored for this session");
                notices.push(Notice::success("API key set successfully!"));
            }
        }
    }

    let status = gate.evaluate(&credentials);
    if let GateStatus::Blocked(reason) = &status {
        notices.push(Notice::from(reason));
    }
    drop(credentials);

    let view = PageView::new(gate.source(), status).with_sidebar_notices(notices);
    Html(render_page(&view))
}

pub async fn generate(
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Html<String> {
    let category = form.category().to_string();
    let credentials = state.credentials().read().await.clone();
    let status = state.generator.gate().evaluate(&credentials);

    info!("Generate requested for category '{}'", category);
    let generation = state.generator.trigger(&credentials, &category).await;

    let view =
        PageView::new(state.generator.config().source, status).with_generation(generation);
    Html(render_page(&view))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
