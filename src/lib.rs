#![allow(non_snake_case)]

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod runtime;
pub mod server;
pub mod service;
pub mod store;
pub mod tasks;
