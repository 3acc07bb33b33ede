pub mod capsules;
pub mod config;
pub mod credentials;
pub mod dsig;
pub mod helper;
pub mod telemetry;
pub mod xml;
