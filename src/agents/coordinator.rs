//! Conversation Coordinator
//!
//! Runs one task through the shared multi-role conversation and reduces
//! the resulting turns to a single string. Every invocation gets its own
//! transcript and its own turn budget; nothing is shared across
//! requests, so concurrent workflows cannot starve each other's budget.

use crate::agents::roles::AgentRole;
use crate::agents::selection::SelectionPolicy;
use crate::llm::Llm;
use crate::types::{AppError, AppResult, LlmMessage, LlmRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// One entry in a task's transcript
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    /// Role name, or "user" for the injected task message
    pub source: String,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            source: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn agent(name: &str, content: impl Into<String>) -> Self {
        Self {
            source: name.to_string(),
            content: content.into(),
        }
    }
}

/// Anything that can take a task message to completion and hand back the
/// collected text. The workflow sequencer depends on this seam, not on
/// the concrete coordinator, so stages are testable with a stub.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn run_task(&self, task: &str) -> AppResult<String>;
}

pub struct ConversationCoordinator {
    roles: Vec<AgentRole>,
    llm: Arc<Llm>,
    selector: Box<dyn SelectionPolicy>,
    model: String,
    temperature: f32,
    max_turns: usize,
}

impl ConversationCoordinator {
    pub fn new(
        roles: Vec<AgentRole>,
        llm: Arc<Llm>,
        selector: Box<dyn SelectionPolicy>,
        model: impl Into<String>,
        temperature: f32,
        max_turns: usize,
    ) -> Self {
        Self {
            roles,
            llm,
            selector,
            model: model.into(),
            temperature,
            max_turns,
        }
    }

    /// Render the transcript as chat history for the next responder. The
    /// task stays a user message; prior agent turns become assistant
    /// messages prefixed with the speaker's name so every role can see
    /// who said what.
    fn render_messages(transcript: &[ConversationTurn]) -> Vec<LlmMessage> {
        transcript
            .iter()
            .map(|turn| {
                if turn.source == "user" {
                    LlmMessage::user(&turn.content)
                } else {
                    LlmMessage::assistant(format!("[{}] {}", turn.source, turn.content))
                }
            })
            .collect()
    }
}

#[async_trait]
impl TaskRunner for ConversationCoordinator {
    /// Drive the conversation until the selection policy declares it done
    /// or the turn budget runs out, then join every responder turn with
    /// newlines. Empty turns are skipped. Model failures propagate.
    async fn run_task(&self, task: &str) -> AppResult<String> {
        let mut transcript = vec![ConversationTurn::user(task)];
        let mut collected: Vec<String> = Vec::new();

        for turn_index in 0..self.max_turns {
            let Some(name) = self.selector.select_next(&transcript, &self.roles).await? else {
                debug!(turns = turn_index, "Selection policy ended the conversation");
                break;
            };

            let role = self
                .roles
                .iter()
                .find(|r| r.name == name)
                .ok_or_else(|| AppError::Internal(format!("Selected unknown role: {name}")))?;

            let request = LlmRequest {
                model: self.model.clone(),
                messages: Self::render_messages(&transcript),
                max_tokens: Some(2048),
                temperature: Some(self.temperature),
                system_instruction: Some(role.instruction.clone()),
            };

            let response = self.llm.create_chat_completion(&request).await?;
            debug!(role = %role.name, response_len = response.content.len(), "Turn complete");

            if !response.content.trim().is_empty() {
                collected.push(response.content.clone());
            }
            transcript.push(ConversationTurn::agent(&role.name, response.content));
        }

        info!(
            task_len = task.len(),
            turns = transcript.len() - 1,
            "Conversation run complete"
        );
        Ok(collected.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::roles::default_roles;
    use crate::llm::provider::LlmAdapter;
    use crate::types::{LlmResponse, TokenUsage};
    use std::sync::Mutex;

    /// Adapter returning canned responses in order; fails when exhausted
    /// or when constructed as failing.
    struct ScriptedAdapter {
        responses: Mutex<Vec<String>>,
        should_fail: bool,
    }

    impl ScriptedAdapter {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().rev().map(|s| s.to_string()).collect()),
                should_fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                responses: Mutex::new(vec![]),
                should_fail: true,
            }
        }
    }

    #[async_trait]
    impl LlmAdapter for ScriptedAdapter {
        async fn create_chat_completion(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
            if self.should_fail {
                return Err(AppError::LlmApi("scripted failure".to_string()));
            }
            let content = self
                .responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| "".to_string());
            Ok(LlmResponse {
                content,
                finish_reason: "stop".to_string(),
                usage: TokenUsage::default(),
            })
        }
    }

    /// Policy that always names the same responder for a fixed number of
    /// turns, then stops.
    struct FixedPolicy {
        role: String,
        turns: usize,
    }

    #[async_trait]
    impl crate::agents::selection::SelectionPolicy for FixedPolicy {
        async fn select_next(
            &self,
            transcript: &[ConversationTurn],
            _roles: &[AgentRole],
        ) -> AppResult<Option<String>> {
            let agent_turns = transcript.iter().filter(|t| t.source != "user").count();
            if agent_turns < self.turns {
                Ok(Some(self.role.clone()))
            } else {
                Ok(None)
            }
        }
    }

    fn coordinator(adapter: ScriptedAdapter, policy: FixedPolicy, max_turns: usize) -> ConversationCoordinator {
        ConversationCoordinator::new(
            default_roles(),
            Arc::new(Llm::from_adapter(Box::new(adapter))),
            Box::new(policy),
            "gpt-4o",
            0.7,
            max_turns,
        )
    }

    #[tokio::test]
    async fn test_collects_turns_in_arrival_order() {
        let coordinator = coordinator(
            ScriptedAdapter::new(&["first answer", "second answer"]),
            FixedPolicy {
                role: "literature_agent".to_string(),
                turns: 2,
            },
            20,
        );

        let output = coordinator.run_task("find papers").await.unwrap();
        assert_eq!(output, "first answer\nsecond answer");
    }

    #[tokio::test]
    async fn test_empty_turns_are_skipped() {
        let coordinator = coordinator(
            ScriptedAdapter::new(&["real answer", "   ", "another"]),
            FixedPolicy {
                role: "synthesis_agent".to_string(),
                turns: 3,
            },
            20,
        );

        let output = coordinator.run_task("summarize").await.unwrap();
        assert_eq!(output, "real answer\nanother");
    }

    #[tokio::test]
    async fn test_turn_budget_bounds_the_run() {
        // policy would go forever; the budget stops it at 2
        let coordinator = coordinator(
            ScriptedAdapter::new(&["a", "b", "c", "d"]),
            FixedPolicy {
                role: "literature_agent".to_string(),
                turns: usize::MAX,
            },
            2,
        );

        let output = coordinator.run_task("loop").await.unwrap();
        assert_eq!(output, "a\nb");
    }

    #[tokio::test]
    async fn test_budget_is_fresh_per_invocation() {
        let coordinator = coordinator(
            ScriptedAdapter::new(&["run one a", "run one b", "run two a", "run two b"]),
            FixedPolicy {
                role: "literature_agent".to_string(),
                turns: usize::MAX,
            },
            2,
        );

        let first = coordinator.run_task("first").await.unwrap();
        let second = coordinator.run_task("second").await.unwrap();
        // a shared counter would leave the second run with no budget
        assert_eq!(first, "run one a\nrun one b");
        assert_eq!(second, "run two a\nrun two b");
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let coordinator = coordinator(
            ScriptedAdapter::failing(),
            FixedPolicy {
                role: "literature_agent".to_string(),
                turns: 1,
            },
            20,
        );

        let result = coordinator.run_task("anything").await;
        assert!(matches!(result, Err(AppError::LlmApi(_))));
    }

    #[tokio::test]
    async fn test_unknown_role_is_an_error() {
        let coordinator = coordinator(
            ScriptedAdapter::new(&["never used"]),
            FixedPolicy {
                role: "phantom_agent".to_string(),
                turns: 1,
            },
            20,
        );

        let result = coordinator.run_task("anything").await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_render_messages_prefixes_agent_turns() {
        let transcript = vec![
            ConversationTurn::user("the task"),
            ConversationTurn::agent("literature_agent", "two papers"),
        ];

        let messages = ConversationCoordinator::render_messages(&transcript);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content, "the task");
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[1].content, "[literature_agent] two papers");
    }
}
