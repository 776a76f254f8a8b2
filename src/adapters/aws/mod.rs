pub(crate) mod client_factory;
pub(crate) mod rds_inventory;
