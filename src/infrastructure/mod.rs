//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`events`] - Bounded event queue, collector sink and drain worker

pub mod events;
