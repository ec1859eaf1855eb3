use crate::llm::provider::LlmAdapter;
use crate::types::{AppResult, LlmRequest, LlmResponse, TokenUsage};
use async_openai::config::{AzureConfig, OpenAIConfig};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

pub struct OpenAiAdapter {
    client: Client<OpenAIConfig>,
}

impl OpenAiAdapter {
    pub fn new(api_key: &str) -> Self {
        let client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
        Self { client }
    }
}

#[async_trait]
impl LlmAdapter for OpenAiAdapter {
    async fn create_chat_completion(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let openai_request = build_request(request)?;
        let response = self.client.chat().create(openai_request).await?;
        map_response(response)
    }
}

/// Azure hosts chat completions per deployment, so the client carries the
/// endpoint, deployment id, and api-version instead of a bare key.
pub struct AzureOpenAiAdapter {
    client: Client<AzureConfig>,
}

impl AzureOpenAiAdapter {
    pub fn new(endpoint: &str, api_key: &str, deployment: &str, api_version: &str) -> Self {
        let config = AzureConfig::new()
            .with_api_base(endpoint)
            .with_api_key(api_key)
            .with_deployment_id(deployment)
            .with_api_version(api_version);
        Self {
            client: Client::with_config(config),
        }
    }
}

#[async_trait]
impl LlmAdapter for AzureOpenAiAdapter {
    async fn create_chat_completion(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let openai_request = build_request(request)?;
        let response = self.client.chat().create(openai_request).await?;
        map_response(response)
    }
}

fn build_request(
    request: &LlmRequest,
) -> AppResult<async_openai::types::CreateChatCompletionRequest> {
    let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

    if let Some(system) = &request.system_instruction {
        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.as_str())
                .build()?
                .into(),
        );
    }

    for message in &request.messages {
        let mapped: ChatCompletionRequestMessage = match message.role.as_str() {
            "assistant" => ChatCompletionRequestAssistantMessageArgs::default()
                .content(message.content.as_str())
                .build()?
                .into(),
            "system" => ChatCompletionRequestSystemMessageArgs::default()
                .content(message.content.as_str())
                .build()?
                .into(),
            _ => ChatCompletionRequestUserMessageArgs::default()
                .content(message.content.as_str())
                .build()?
                .into(),
        };
        messages.push(mapped);
    }

    let mut args = CreateChatCompletionRequestArgs::default();
    args.model(&request.model).messages(messages);
    if let Some(max_tokens) = request.max_tokens {
        args.max_tokens(max_tokens);
    }
    if let Some(temperature) = request.temperature {
        args.temperature(temperature);
    }

    Ok(args.build()?)
}

fn map_response(
    response: async_openai::types::CreateChatCompletionResponse,
) -> AppResult<LlmResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| crate::types::AppError::LlmApi("Response contained no choices".into()))?;

    let content = choice.message.content.unwrap_or_default();
    let finish_reason = choice
        .finish_reason
        .map(|reason| format!("{reason:?}").to_lowercase())
        .unwrap_or_else(|| "stop".to_string());

    let usage = response
        .usage
        .map(|usage| TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        })
        .unwrap_or_default();

    Ok(LlmResponse {
        content,
        finish_reason,
        usage,
    })
}
