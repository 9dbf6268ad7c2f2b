//! Application services

pub mod quiz;
