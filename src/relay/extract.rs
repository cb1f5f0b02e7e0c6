use serde_json::Value;

pub const NO_REPLY_NOTE: &str = "No textual output found. Check model/response shape.";

/// Known places an upstream response may carry generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// `output_text`
    OutputText,
    /// `output[0].content[0].text`
    OutputContent,
    /// `choices[0].message.content`
    ChatChoice,
}

impl ReplyShape {
    /// Priority order; the first non-empty match wins.
    pub const ORDER: [ReplyShape; 3] = [
        ReplyShape::OutputText,
        ReplyShape::OutputContent,
        ReplyShape::ChatChoice,
    ];

    pub fn extract(self, data: &Value) -> Option<&str> {
        let text = match self {
            ReplyShape::OutputText => data.get("output_text"),
            ReplyShape::OutputContent => data
                .get("output")
                .and_then(|output| output.get(0))
                .and_then(|item| item.get("content"))
                .and_then(|content| content.get(0))
                .and_then(|part| part.get("text")),
            ReplyShape::ChatChoice => data
                .get("choices")
                .and_then(|choices| choices.get(0))
                .and_then(|choice| choice.get("message"))
                .and_then(|message| message.get("content")),
        };
        text.and_then(Value::as_str).filter(|text| !text.is_empty())
    }

    pub fn extract_first(data: &Value) -> Option<(ReplyShape, &str)> {
        Self::ORDER
            .into_iter()
            .find_map(|shape| shape.extract(data).map(|text| (shape, text)))
    }
}

/// Field names present at the top level, or nothing when `data` is not an object.
pub fn top_level_keys(data: &Value) -> Vec<String> {
    data.as_object()
        .map(|fields| fields.keys().cloned().collect())
        .unwrap_or_default()
}
