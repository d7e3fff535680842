//! Prompt construction
//!
//! The instruction sent to the remote service is a fixed natural-language
//! template with the user's passage interpolated into a `{passage}`
//! placeholder. The template is configurable; validity is checked at
//! construction so a bad template is a startup error, not a per-request one.

use crate::error::{AppError, AppResult};

const PLACEHOLDER: &str = "{passage}";

/// A validated instruction template containing a `{passage}` placeholder
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template; fails if the placeholder is missing
    pub fn new(template: impl Into<String>) -> AppResult<Self> {
        let template = template.into();
        if !template.contains(PLACEHOLDER) {
            return Err(AppError::Config(format!(
                "prompt template must contain the '{}' placeholder",
                PLACEHOLDER
            )));
        }
        Ok(Self { template })
    }

    /// Interpolate the passage into the template
    pub fn render(&self, passage: &str) -> String {
        self.template.replace(PLACEHOLDER, passage)
    }
}
