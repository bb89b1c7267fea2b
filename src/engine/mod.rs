pub mod error;
pub mod models;
pub mod throws;
pub mod checkouts;
pub mod visit;
pub mod leg;
pub mod simulator;
pub mod tournament;
pub mod arena;
pub mod config;
pub mod providers;
