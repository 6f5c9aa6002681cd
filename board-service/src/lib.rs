pub mod config;
pub mod handlers;
pub mod health;
pub mod models;
pub mod services;
pub mod startup;
