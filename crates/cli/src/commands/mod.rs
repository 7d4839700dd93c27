pub mod gateway;
pub mod onboard;
pub mod query;
