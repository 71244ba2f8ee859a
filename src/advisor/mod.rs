//! AI budgeting suggestions.
//!
//! The rest of the crate only sees [`Advisor`]; the HTTP details live in
//! [`openai`].

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AdvisorError;
use crate::models::expense::ExpenseRecord;

pub mod openai;

pub const SYSTEM_PROMPT: &str = "You are a financial advisor.";

const USER_PROMPT_HEADER: &str =
    "Analyze this expense data and provide budgeting suggestions, potential savings, and financial tips:";

#[async_trait]
pub trait Advisor: Send + Sync {
    async fn suggest(&self, records: &[ExpenseRecord]) -> Result<String, AdvisorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// The user prompt: fixed header followed by the records as a JSON array.
pub fn expense_prompt(records: &[ExpenseRecord]) -> Result<String, AdvisorError> {
    let payload = serde_json::to_string(records)?;
    Ok(format!("{USER_PROMPT_HEADER}\n{payload}"))
}

pub fn build_messages(records: &[ExpenseRecord]) -> Result<Vec<ChatMessage>, AdvisorError> {
    Ok(vec![
        ChatMessage::new(Role::System, SYSTEM_PROMPT),
        ChatMessage::new(Role::User, expense_prompt(records)?),
    ])
}
