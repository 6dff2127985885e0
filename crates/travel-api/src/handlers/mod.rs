//! HTTP request handlers for the gateway API

pub mod routes;
