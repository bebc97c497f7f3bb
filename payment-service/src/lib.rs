pub mod api;
pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod repository;
pub mod schema;
pub mod signature;
