pub mod config;
pub mod error;
pub mod relay;
pub mod server;
pub mod upstream;

pub use config::{AppConfig, RelayConfig};
pub use error::RelayError;
pub use relay::{InboundBody, InboundRequest, OutboundResponse, PromptRelayHandler};
pub use server::{build_router, router_with};
pub use upstream::{OpenAiResponsesClient, UpstreamClient};
