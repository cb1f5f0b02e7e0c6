mod extract;
mod handler;
mod types;

pub use extract::{NO_REPLY_NOTE, ReplyShape, top_level_keys};
pub use handler::{ALLOW_HEADERS, ALLOW_METHODS, PromptRelayHandler, RelayOutcome};
pub use types::{InboundBody, InboundRequest, OutboundResponse, PromptPayload};
