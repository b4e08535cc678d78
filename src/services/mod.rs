//! External collaborator seams and their concrete adapters.

pub mod alpaca;
pub mod broker;
pub mod market_data;

pub use alpaca::AlpacaClient;
pub use broker::BrokerClient;
pub use market_data::PriceHistoryProvider;
