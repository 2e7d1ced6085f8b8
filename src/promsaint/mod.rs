pub mod client;
pub mod config;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{Delivery, PromsaintClient};
pub use config::PromsaintConfig;
