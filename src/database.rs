pub mod connection;
pub mod dto;
pub mod repository;
pub mod service;
pub mod transaction;

pub use service::*;
