//! Peer-to-peer lending backend library
//!
//! Exports the services, store adapters and router used by the server binary.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod loan_service;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod websocket;
