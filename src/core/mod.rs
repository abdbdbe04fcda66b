//! Core configuration and domain models shared by both Lambdas.

pub mod config;
pub mod models;
