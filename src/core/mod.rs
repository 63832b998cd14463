//! Dashboard logic independent of the HTTP surface.

pub mod aggregate;
pub mod controller;
pub mod view;
