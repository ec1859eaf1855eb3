use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub orchestrator: OrchestratorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// "openai" or "azure"
    pub provider: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub azure_endpoint: String,
    pub azure_deployment: String,
    pub azure_api_version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub pubmed_base_url: String,
    pub pubmed_email: String,
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    /// Turn budget for a single coordinator run. Each run_task invocation
    /// gets its own budget; it is never shared across requests.
    pub max_turns: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
                min_connections: env::var("DB_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
            },
            llm: LlmConfig {
                provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "openai".to_string()),
                api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
                temperature: env::var("LLM_TEMPERATURE")
                    .unwrap_or_else(|_| "0.7".to_string())
                    .parse()?,
                azure_endpoint: env::var("AZURE_OPENAI_ENDPOINT").unwrap_or_default(),
                azure_deployment: env::var("AZURE_OPENAI_DEPLOYMENT").unwrap_or_default(),
                azure_api_version: env::var("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|_| "2024-06-01".to_string()),
            },
            search: SearchConfig {
                pubmed_base_url: env::var("PUBMED_BASE_URL")
                    .unwrap_or_else(|_| "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string()),
                pubmed_email: env::var("PUBMED_EMAIL")
                    .unwrap_or_else(|_| "research@colloquium.dev".to_string()),
                max_results: env::var("PUBMED_MAX_RESULTS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
            },
            orchestrator: OrchestratorConfig {
                max_turns: env::var("ORCHESTRATOR_MAX_TURNS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()?,
            },
        })
    }
}
