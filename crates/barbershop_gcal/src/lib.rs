// --- File: crates/barbershop_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod catalog;
pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;
pub mod service;
pub mod validation;
#[cfg(test)]
mod validation_proptest;
