pub mod catalog;
pub mod client;
pub mod config;
pub mod matcher;
pub mod models;
pub mod presentation;
pub mod ranking;
