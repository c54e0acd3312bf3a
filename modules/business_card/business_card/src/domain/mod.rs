pub mod card;
pub mod error;
pub mod fields;
pub mod intake;
pub mod local_client;
pub mod notifier;
pub mod ports;
pub mod repo;
pub mod service;
