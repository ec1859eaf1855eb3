//! Agent Roles
//!
//! The five fixed conversational roles of the assistant. Each role is a
//! static system instruction plus a set of capability tags; all roles
//! share one model connection. Roles are built once at startup and never
//! mutated.

/// A named role in the shared conversation
#[derive(Debug, Clone)]
pub struct AgentRole {
    /// Unique key, also used by the selection policy
    pub name: String,
    /// System instruction sent with every completion for this role
    pub instruction: String,
    /// Keyword tags describing what this role is good at
    pub capabilities: Vec<String>,
}

impl AgentRole {
    pub fn new(name: &str, instruction: &str, capabilities: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            instruction: instruction.to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// The full role set, in selection-preference order
pub fn default_roles() -> Vec<AgentRole> {
    vec![
        literature_role(),
        synthesis_role(),
        extensions_role(),
        explainer_role(),
        advisor_role(),
    ]
}

fn literature_role() -> AgentRole {
    AgentRole::new(
        "literature_agent",
        r#"You are a Literature Search Agent.

Your job:
1. Search academic indexes for papers on the given topic
2. Extract: DOI, title, authors, abstract, link
3. Return structured results

Be focused and efficient. Only return relevant papers."#,
        &["search", "papers", "literature", "pubmed", "find"],
    )
}

fn synthesis_role() -> AgentRole {
    AgentRole::new(
        "synthesis_agent",
        r#"You are a Reading Synthesis Agent.

Your job:
1. Read and analyze paper abstracts
2. Create concise summaries (2-3 sentences each)
3. Extract key findings
4. Format: "Paper 1: [summary], Paper 2: [summary], ..."

Be clear and concise."#,
        &["summarize", "summaries", "synthesis", "analyze", "findings"],
    )
}

fn extensions_role() -> AgentRole {
    AgentRole::new(
        "extensions_agent",
        r#"You are a Future Research Extensions Agent.

Your job:
1. Analyze paper summaries for gaps
2. Propose future research directions
3. Provide one-line solution approach for each
4. Assess difficulty (Easy/Medium/Hard)

Format each extension with:
- Title
- Description
- Solution approach (one line)
- Difficulty level"#,
        &["extensions", "gaps", "propose", "future", "directions"],
    )
}

fn explainer_role() -> AgentRole {
    AgentRole::new(
        "explainer_agent",
        r#"You are a Concept Explainer Agent.

Your job:
1. Explain complex concepts in simple terms
2. Provide concrete examples
3. Use analogies people can relate to
4. Make research accessible

Be clear, friendly, and avoid jargon."#,
        &["explain", "concept", "simple", "examples", "analogies"],
    )
}

fn advisor_role() -> AgentRole {
    AgentRole::new(
        "advisor_agent",
        r#"You are a Submission Advisor Agent.

Your job:
1. Check paper formatting
2. Validate structure (abstract, intro, methods, results, conclusion)
3. Provide a formatting score (0-100)
4. Give improvement recommendations

Be thorough and constructive."#,
        &["formatting", "check", "submission", "structure", "score"],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_role_names_are_unique() {
        let roles = default_roles();
        let names: HashSet<_> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), roles.len());
    }

    #[test]
    fn test_every_role_has_capabilities() {
        for role in default_roles() {
            assert!(!role.capabilities.is_empty(), "{} has no tags", role.name);
            assert!(!role.instruction.is_empty());
        }
    }
}
