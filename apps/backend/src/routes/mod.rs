//! HTTP route handlers

pub mod quiz;
