use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UpstreamRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Text { text: String },
}

impl InputMessage {
    fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart::Text { text: text.into() }],
        }
    }
}

impl UpstreamRequest {
    /// The prompt only ever occupies the user turn.
    pub fn new(model: &str, system_instruction: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            input: vec![
                InputMessage::text(Role::System, system_instruction),
                InputMessage::text(Role::User, prompt),
            ],
        }
    }

    pub fn user_prompt(&self) -> Option<&str> {
        self.input
            .iter()
            .find(|message| message.role == Role::User)
            .and_then(|message| message.content.first())
            .map(|ContentPart::Text { text }| text.as_str())
    }
}
