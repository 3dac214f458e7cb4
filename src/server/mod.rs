pub mod loader;
pub mod rest_server;
