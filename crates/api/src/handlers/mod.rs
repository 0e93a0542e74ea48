//! API handlers for the Reportwire HTTP surface

pub mod contacts;
pub mod deliveries;
pub mod reports;
