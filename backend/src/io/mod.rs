//! # IO Module
//!
//! Interface layer exposing the domain to clients. Currently only the REST API.

pub mod rest;
