use std::future::Future;
use std::pin::Pin;

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, GuardrailConfiguration, Message, SystemContentBlock,
};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::BedrockError;
use crate::prompts::{self, PromptTemplate};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Executes a named prompt template against a model.
///
/// Implementations receive the operation's JSON input and return the
/// model's JSON output, unvalidated. Schema checks happen in
/// [`GenerationClient`](crate::generation::GenerationClient).
pub trait GenerationBackend: Send + Sync {
    fn invoke<'a>(
        &'a self,
        template: &'a PromptTemplate,
        input: &'a Value,
    ) -> BoxFuture<'a, Result<Value, BedrockError>>;
}

/// Bedrock guardrail applied to every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guardrail {
    pub identifier: String,
    pub version: String,
}

/// Token counts reported by the Converse API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCount {
    pub input: i32,
    pub output: i32,
}

/// Amazon Bedrock backend using the Converse API.
pub struct BedrockBackend {
    client: Client,
    model_id: String,
    guardrail: Option<GuardrailConfiguration>,
}

impl BedrockBackend {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            guardrail: None,
        }
    }

    pub fn with_guardrail(mut self, guardrail: &Guardrail) -> Self {
        self.guardrail = Some(
            GuardrailConfiguration::builder()
                .guardrail_identifier(&guardrail.identifier)
                .guardrail_version(&guardrail.version)
                .build(),
        );
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn guardrail(&self) -> Option<&GuardrailConfiguration> {
        self.guardrail.as_ref()
    }

    async fn run(&self, template: &PromptTemplate, input: &Value) -> Result<Value, BedrockError> {
        let invocation_id = Uuid::new_v4();
        let user_message = prompts::render(template, input)?;
        let system_prompt = prompts::system_prompt(template);

        info!(
            invocation_id = %invocation_id,
            template = template.name,
            model = %self.model_id,
            "invoking model"
        );

        let (response_text, usage) = self.converse(&system_prompt, &user_message).await?;

        info!(
            invocation_id = %invocation_id,
            template = template.name,
            input_tokens = usage.input,
            output_tokens = usage.output,
            "model invocation complete"
        );

        serde_json::from_str(prompts::strip_code_fence(&response_text)).map_err(|e| {
            warn!(invocation_id = %invocation_id, template = template.name, "model returned non-JSON output");
            BedrockError::ResponseParse(format!("{e}. Response: {response_text}"))
        })
    }

    /// Returns the response text and token usage.
    async fn converse(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<(String, TokenCount), BedrockError> {
        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(system_prompt.to_string()))
            .messages(
                Message::builder()
                    .role(ConversationRole::User)
                    .content(ContentBlock::Text(user_message.to_string()))
                    .build()
                    .map_err(|e| BedrockError::Invocation(e.to_string()))?,
            )
            .set_guardrail_config(self.guardrail.clone())
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let response_text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let usage = response
            .usage()
            .map(|u| TokenCount {
                input: u.input_tokens(),
                output: u.output_tokens(),
            })
            .unwrap_or_default();

        Ok((response_text, usage))
    }
}

impl GenerationBackend for BedrockBackend {
    fn invoke<'a>(
        &'a self,
        template: &'a PromptTemplate,
        input: &'a Value,
    ) -> BoxFuture<'a, Result<Value, BedrockError>> {
        Box::pin(self.run(template, input))
    }
}
