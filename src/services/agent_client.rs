//! Client for the external agent runtime.
//!
//! One invocation per generation request: the runtime receives the profile
//! document plus the rendered analysis and structuring prompts, runs both
//! phases against its model session, and answers in one of three transport
//! shapes. Retries happen only while no response has been received; a
//! malformed body is the decoder's problem, never grounds for re-invoking.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::AgentConfig;
use crate::models::UserProfile;
use crate::services::errors::PlanError;
use crate::services::prompts::PromptBundle;
use crate::services::response_decoder::{EventStream, RawResponse};

const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Clone)]
pub struct AgentClient {
    client: Client,
    config: AgentConfig,
}

impl AgentClient {
    pub fn new(config: AgentConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Session identifier derived from the user identity, so runtime-side
    /// state correlates with our rows.
    pub(crate) fn session_id(user_id: Uuid) -> String {
        format!("fitness-session-{user_id}")
    }

    pub(crate) fn build_payload(profile: &UserProfile) -> Value {
        let prompts = PromptBundle::for_profile(profile);
        json!({
            "user_profile": profile.agent_document(),
            "system_prompt": prompts.system,
            "prompt": prompts.analysis,
            "structure_prompt": prompts.structuring,
        })
    }

    /// Invoke the runtime for one generation attempt.
    ///
    /// Bounded retry on transport failures (connect errors, timeouts)
    /// only. Once any response arrives, the attempt is committed: bad
    /// status codes and unreadable bodies surface as errors without retry.
    /// No persisted state is touched here.
    pub async fn invoke(
        &self,
        user_id: Uuid,
        profile: &UserProfile,
    ) -> Result<RawResponse, PlanError> {
        let payload = Self::build_payload(profile);
        let session_id = Self::session_id(user_id);

        let mut attempt = 0;
        loop {
            attempt += 1;
            info!(%session_id, attempt, "invoking agent runtime");

            match self
                .client
                .post(&self.config.endpoint)
                .header(SESSION_HEADER, &session_id)
                .json(&payload)
                .send()
                .await
            {
                Ok(response) => return self.classify(response).await,
                Err(err) if is_transient(&err) && attempt < self.config.max_attempts => {
                    warn!(%session_id, attempt, error = %err, "transient transport failure, retrying");
                }
                Err(err) if err.is_timeout() => {
                    error!(%session_id, attempt, "agent runtime timed out");
                    return Err(PlanError::UpstreamTimeout);
                }
                Err(err) => {
                    error!(%session_id, attempt, error = %err, "agent runtime unreachable");
                    return Err(PlanError::UpstreamUnavailable(err.to_string()));
                }
            }
        }
    }

    /// Tag the response with its declared content kind.
    async fn classify(&self, response: reqwest::Response) -> Result<RawResponse, PlanError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "agent runtime returned error status: {body}");
            return Err(PlanError::UpstreamUnavailable(format!(
                "agent runtime returned {status}"
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if content_type.contains("text/event-stream") {
            let body = response
                .text()
                .await
                .map_err(|e| PlanError::UpstreamUnavailable(e.to_string()))?;
            Ok(RawResponse::EventStream(EventStream::from_text(&body)))
        } else if content_type.contains("application/json") {
            let mut chunks = Vec::new();
            let mut response = response;
            while let Some(chunk) = response
                .chunk()
                .await
                .map_err(|e| PlanError::UpstreamUnavailable(e.to_string()))?
            {
                chunks.push(chunk);
            }
            Ok(RawResponse::JsonChunks(chunks))
        } else {
            // Unknown kind: pass the body through, downstream still
            // attempts field extraction.
            let body = response
                .text()
                .await
                .map_err(|e| PlanError::UpstreamUnavailable(e.to_string()))?;
            let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
            Ok(RawResponse::Opaque(json!({
                "content_type": content_type,
                "response": body,
            })))
        }
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}
