mod account;
mod account_dto;
mod account_repository;
mod account_service;
mod customer_repository;

pub use account::*;
pub use account_dto::*;
pub use account_repository::*;
pub use account_service::*;
pub use customer_repository::*;
