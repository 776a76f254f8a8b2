pub mod credential_cache;
pub mod credential_resolver;
pub mod discovery_service;
pub mod error;
pub mod inventory_mapper;
pub mod types;
