//! Agent System
//!
//! The multi-role conversation that powers the research assistant:
//!
//! - **Roles**: five fixed prompt templates sharing one model connection
//! - **Selection**: a pluggable policy that picks the next responder
//! - **Coordinator**: runs one task to completion inside a bounded,
//!   per-invocation conversation and reduces it to text
//! - **Workflow**: sequences coordinator runs into the public operations
//!
//! ## Pipeline Overview
//!
//! ```text
//! Research topic
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Search    │  → PubMed records + literature text
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │ Synthesize  │  → concise summaries with key findings
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Extend    │  → 5 future research proposals
//! └─────────────┘
//! ```
//!
//! Explain-concept and check-paper are single coordinator runs over the
//! same role set.

pub mod coordinator;
pub mod roles;
pub mod selection;
pub mod workflow;

// Re-export main components
pub use coordinator::{ConversationCoordinator, ConversationTurn, TaskRunner};
pub use roles::{default_roles, AgentRole};
pub use selection::{KeywordSelectionPolicy, LlmSelectionPolicy, SelectionPolicy};
pub use workflow::{Orchestrator, PaperReview, WorkflowResult, WorkflowStatus};
