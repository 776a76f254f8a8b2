pub(crate) mod aws;
pub(crate) mod config;
pub(crate) mod server;
