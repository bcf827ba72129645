// src/core/canned.rs — Static fallback responses
//
// Used only when every provider has failed: a keyword match over the
// lowered user text picks a topic-specific string, otherwise the
// generic one. Static text selection, not generation. All strings are
// product content, overridable in the `[canned]` config section.

use serde::{Deserialize, Serialize};

const CONTACT_KEYWORDS: &[&str] = &["contact", "email", "reach", "hire", "hiring"];
const PROJECT_KEYWORDS: &[&str] = &["project", "portfolio", "built", "demo"];
const SKILL_KEYWORDS: &[&str] = &["skill", "stack", "experience", "technolog"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannedResponses {
    #[serde(default = "default_contact")]
    pub contact: String,
    #[serde(default = "default_projects")]
    pub projects: String,
    #[serde(default = "default_skills")]
    pub skills: String,
    #[serde(default = "default_generic")]
    pub generic: String,
}

impl Default for CannedResponses {
    fn default() -> Self {
        Self {
            contact: default_contact(),
            projects: default_projects(),
            skills: default_skills(),
            generic: default_generic(),
        }
    }
}

fn default_contact() -> String {
    "You can reach the site owner through the contact links on this page — LinkedIn and \
email are the fastest. I'm having trouble reaching my language model right now, but those \
links are always up to date!"
        .into()
}

fn default_projects() -> String {
    "I'm having trouble connecting right now, but you'll find the full project list with \
write-ups right here on the portfolio page. Please try me again in a moment!"
        .into()
}

fn default_skills() -> String {
    "I can't reach my language model at the moment, but the skills section on this page \
covers the full toolbox. Please try again shortly!"
        .into()
}

fn default_generic() -> String {
    "I'm this portfolio's AI assistant! I'd love to chat about the projects and experience \
showcased here, but I'm having trouble connecting right now. Please try again in a moment!"
        .into()
}

impl CannedResponses {
    /// Pick the canned string for a user message. Matching is substring
    /// containment over the lowered text; first matching topic wins.
    pub fn select(&self, user_text: &str) -> &str {
        let lowered = user_text.to_lowercase();
        if CONTACT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            &self.contact
        } else if PROJECT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            &self.projects
        } else if SKILL_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            &self.skills
        } else {
            &self.generic
        }
    }
}
