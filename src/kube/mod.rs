pub mod client;
pub mod secret;
