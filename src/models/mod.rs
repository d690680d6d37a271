pub mod trade_event;
pub mod token_facts;
pub mod risk_assessment;
pub mod engine_config;

pub use trade_event::*;
pub use token_facts::*;
pub use risk_assessment::*;
pub use engine_config::*;
