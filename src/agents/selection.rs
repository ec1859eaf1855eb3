//! Responder Selection
//!
//! Picks which role answers next in a shared conversation. The policy is
//! a trait so the coordinator can run against a deterministic
//! implementation in tests instead of a live model.

use crate::agents::coordinator::ConversationTurn;
use crate::agents::roles::AgentRole;
use crate::llm::Llm;
use crate::types::{AppResult, LlmMessage, LlmRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// How many trailing turns the model sees when choosing a responder
const SELECTION_CONTEXT_TURNS: usize = 6;

#[async_trait]
pub trait SelectionPolicy: Send + Sync {
    /// Choose the next responder by role name, or `None` when the
    /// conversation is complete.
    async fn select_next(
        &self,
        transcript: &[ConversationTurn],
        roles: &[AgentRole],
    ) -> AppResult<Option<String>>;
}

/// Selection driven by the shared model: it sees the role list and the
/// recent transcript and names the next responder, or declares the task
/// done.
pub struct LlmSelectionPolicy {
    llm: Arc<Llm>,
    model: String,
}

impl LlmSelectionPolicy {
    pub fn new(llm: Arc<Llm>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    fn selection_prompt(transcript: &[ConversationTurn], roles: &[AgentRole]) -> String {
        let mut prompt = String::from(
            "You coordinate a panel of research assistant agents. \
             Pick the single agent best suited to respond next.\n\nAgents:\n",
        );
        for role in roles {
            prompt.push_str(&format!(
                "- {}: {}\n",
                role.name,
                role.capabilities.join(", ")
            ));
        }

        prompt.push_str("\nConversation so far:\n");
        let start = transcript.len().saturating_sub(SELECTION_CONTEXT_TURNS);
        for turn in &transcript[start..] {
            prompt.push_str(&format!("[{}] {}\n", turn.source, turn.content));
        }

        prompt.push_str(
            "\nRespond with ONLY the agent name (lowercase, one word). \
             If the task is fully answered, respond with DONE.",
        );
        prompt
    }

    /// Tolerant parse of the model's choice. Handles clean names,
    /// surrounding prose, and punctuation; anything unrecognizable is
    /// treated as done.
    fn parse_selection(output: &str, roles: &[AgentRole]) -> Option<String> {
        let trimmed = output.trim().to_lowercase();

        if trimmed.is_empty() || trimmed.contains("done") {
            return None;
        }

        if let Some(role) = roles.iter().find(|r| r.name == trimmed) {
            return Some(role.name.clone());
        }

        for word in trimmed.split(|c: char| c.is_whitespace() || c == ':' || c == ',' || c == '.') {
            if let Some(role) = roles.iter().find(|r| r.name == word.trim()) {
                return Some(role.name.clone());
            }
        }

        roles
            .iter()
            .find(|r| trimmed.contains(r.name.as_str()))
            .map(|r| r.name.clone())
    }
}

#[async_trait]
impl SelectionPolicy for LlmSelectionPolicy {
    async fn select_next(
        &self,
        transcript: &[ConversationTurn],
        roles: &[AgentRole],
    ) -> AppResult<Option<String>> {
        let prompt = Self::selection_prompt(transcript, roles);
        let request = LlmRequest {
            model: self.model.clone(),
            messages: vec![LlmMessage::user(prompt)],
            max_tokens: Some(16),
            temperature: Some(0.0),
            system_instruction: None,
        };

        let response = self.llm.create_chat_completion(&request).await?;
        let selected = Self::parse_selection(&response.content, roles);
        debug!(raw = %response.content, selected = ?selected, "Responder selection");
        Ok(selected)
    }
}

/// Deterministic fallback policy: scores the task text against each
/// role's capability tags and lets the winner answer exactly once.
pub struct KeywordSelectionPolicy;

impl KeywordSelectionPolicy {
    fn score(task: &str, role: &AgentRole) -> usize {
        let task = task.to_lowercase();
        role.capabilities
            .iter()
            .filter(|tag| task.contains(tag.as_str()))
            .count()
    }
}

#[async_trait]
impl SelectionPolicy for KeywordSelectionPolicy {
    async fn select_next(
        &self,
        transcript: &[ConversationTurn],
        roles: &[AgentRole],
    ) -> AppResult<Option<String>> {
        // one response per task
        if transcript.iter().any(|turn| turn.source != "user") {
            return Ok(None);
        }

        let task = transcript
            .iter()
            .rev()
            .find(|turn| turn.source == "user")
            .map(|turn| turn.content.as_str())
            .unwrap_or_default();

        let best = roles
            .iter()
            .max_by_key(|role| Self::score(task, role))
            .map(|role| role.name.clone());

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::roles::default_roles;
    use crate::llm::provider::LlmAdapter;
    use crate::types::{LlmResponse, TokenUsage};

    struct FixedOutputAdapter(String);

    #[async_trait]
    impl LlmAdapter for FixedOutputAdapter {
        async fn create_chat_completion(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
            Ok(LlmResponse {
                content: self.0.clone(),
                finish_reason: "stop".to_string(),
                usage: TokenUsage::default(),
            })
        }
    }

    #[tokio::test]
    async fn test_llm_policy_selects_named_role() {
        let llm = Arc::new(Llm::from_adapter(Box::new(FixedOutputAdapter(
            "literature_agent".to_string(),
        ))));
        let policy = LlmSelectionPolicy::new(llm, "gpt-4o");

        let transcript = vec![ConversationTurn::user("find papers on CRISPR")];
        let selected = policy
            .select_next(&transcript, &default_roles())
            .await
            .unwrap();
        assert_eq!(selected.as_deref(), Some("literature_agent"));
    }

    #[tokio::test]
    async fn test_llm_policy_stops_on_done() {
        let llm = Arc::new(Llm::from_adapter(Box::new(FixedOutputAdapter(
            "DONE".to_string(),
        ))));
        let policy = LlmSelectionPolicy::new(llm, "gpt-4o");

        let transcript = vec![
            ConversationTurn::user("find papers on CRISPR"),
            ConversationTurn::agent("literature_agent", "here they are"),
        ];
        let selected = policy
            .select_next(&transcript, &default_roles())
            .await
            .unwrap();
        assert_eq!(selected, None);
    }

    #[test]
    fn test_parse_exact_name() {
        let roles = default_roles();
        assert_eq!(
            LlmSelectionPolicy::parse_selection("literature_agent", &roles).as_deref(),
            Some("literature_agent")
        );
    }

    #[test]
    fn test_parse_name_with_surrounding_prose() {
        let roles = default_roles();
        assert_eq!(
            LlmSelectionPolicy::parse_selection(
                "I would pick synthesis_agent for this.",
                &roles
            )
            .as_deref(),
            Some("synthesis_agent")
        );
    }

    #[test]
    fn test_parse_done_terminates() {
        let roles = default_roles();
        assert_eq!(LlmSelectionPolicy::parse_selection("DONE", &roles), None);
        assert_eq!(
            LlmSelectionPolicy::parse_selection("The task is done.", &roles),
            None
        );
    }

    #[test]
    fn test_parse_garbage_terminates() {
        let roles = default_roles();
        assert_eq!(
            LlmSelectionPolicy::parse_selection("no idea what to pick", &roles),
            None
        );
    }

    #[tokio::test]
    async fn test_keyword_policy_picks_matching_role() {
        let roles = default_roles();
        let transcript = vec![ConversationTurn::user(
            "Explain this concept in simple terms: overfitting",
        )];

        let selected = KeywordSelectionPolicy
            .select_next(&transcript, &roles)
            .await
            .expect("selection should not fail");
        assert_eq!(selected.as_deref(), Some("explainer_agent"));
    }

    #[tokio::test]
    async fn test_keyword_policy_answers_once() {
        let roles = default_roles();
        let transcript = vec![
            ConversationTurn::user("Search for papers on CRISPR"),
            ConversationTurn::agent("literature_agent", "Here are two papers."),
        ];

        let selected = KeywordSelectionPolicy
            .select_next(&transcript, &roles)
            .await
            .expect("selection should not fail");
        assert_eq!(selected, None);
    }
}
