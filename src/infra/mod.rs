//! Concrete clients for the external collaborators.

pub mod chat;
pub mod fpdapi;
pub mod pushover;
