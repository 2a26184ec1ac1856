pub mod config;
pub mod engine;
pub mod http;
pub mod relay;
pub mod telephony;

pub use config::Config;
pub use engine::{ClientEvent, EngineSettings, EngineSink, ServerEvent};
pub use http::{connect_document, create_router, AppState};
pub use relay::{CallSession, CallStats, RelayConfig};
pub use telephony::{TelephonyInbound, TelephonyOutbound, TelephonySink};
