//! Domain types and the ports the application layer talks through.

pub mod payment;
pub mod ports;
pub mod product;
