//! Application layer: the four flows a user can trigger.
//!
//! Each component owns its state and talks to the outside world only
//! through the ports in [`crate::domain::ports`], so hosts can inject real
//! adapters and tests can inject fakes.

pub mod catalog;
pub mod checkout;
pub mod editor;
pub mod product_form;
