// Prompt shape shared by every provider.
// Each feature that calls the LLM writes its own prompts.rs and builds a `Prompt`.

/// A prompt split into the fixed instruction and the caller-supplied content.
///
/// Chat-style backends send the halves as separate system and user messages;
/// completion-style backends send [`Prompt::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Single-string form: instruction, blank line, content.
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}
