//! Infrastructure configuration modules.

pub mod contract;
pub mod endpoints;
pub mod logging;
pub mod policy;
pub mod settings;
pub mod wallet;
