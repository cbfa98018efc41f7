//! Foundation module - process-wide utilities
//!
//! Only logging lives here: the facade itself keeps no global state.

pub mod logging;
