use crate::config::LlmConfig;
use crate::types::{AppError, AppResult, LlmRequest, LlmResponse};
use async_trait::async_trait;

#[async_trait]
pub trait LlmAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LlmRequest) -> AppResult<LlmResponse>;
}

/// Shared model connection. One instance is built at startup and handed to
/// every agent role by reference; it holds no per-request state.
pub struct Llm {
    adapter: Box<dyn LlmAdapter>,
}

impl Llm {
    pub fn from_config(config: &LlmConfig) -> AppResult<Self> {
        let adapter: Box<dyn LlmAdapter> = match config.provider.as_str() {
            "openai" => Box::new(crate::llm::openai::OpenAiAdapter::new(&config.api_key)),
            // Deployment-scoped Azure endpoint; the model name in requests is
            // ignored by Azure in favor of the deployment.
            "azure" | "azure-openai" => Box::new(crate::llm::openai::AzureOpenAiAdapter::new(
                &config.azure_endpoint,
                &config.api_key,
                &config.azure_deployment,
                &config.azure_api_version,
            )),
            other => {
                return Err(AppError::InvalidRequest(format!(
                    "Unsupported LLM provider: {other}"
                )))
            }
        };

        Ok(Self { adapter })
    }

    /// Wrap an existing adapter. Used by tests to substitute a stub model.
    pub fn from_adapter(adapter: Box<dyn LlmAdapter>) -> Self {
        Self { adapter }
    }

    pub async fn create_chat_completion(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.adapter.create_chat_completion(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_provider(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            api_key: "test-key".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.7,
            azure_endpoint: "https://example.openai.azure.com".to_string(),
            azure_deployment: "gpt-4o".to_string(),
            azure_api_version: "2024-06-01".to_string(),
        }
    }

    #[test]
    fn test_known_providers_construct() {
        assert!(Llm::from_config(&config_with_provider("openai")).is_ok());
        assert!(Llm::from_config(&config_with_provider("azure")).is_ok());
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let result = Llm::from_config(&config_with_provider("mainframe"));
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }
}
