#![allow(clippy::async_fn_in_trait)]
pub mod common;
pub mod handler;
pub mod query;
pub mod rest;
pub mod server;
pub mod storage;
pub mod traits;

pub use server::rest_server::rest_server_start;
