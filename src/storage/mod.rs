pub mod memory {
    pub mod memory_node_store;
}
pub mod file {
    pub mod file_node_store;
}
pub mod sqlite {
    pub mod sqlite_node_store;
}
pub mod redis {
    pub mod redis_client;
    pub mod redis_node_store;
}
pub mod node_store_impl;
