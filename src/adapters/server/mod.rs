pub(crate) mod http_listener;
