//! Dashboard domain: form validators and money handling.

pub mod forms;
pub mod money;
