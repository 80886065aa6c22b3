//! Data transfer types shared between the list distribution server and its clients.
//!
//! Everything in here is plain serde data: no I/O and no validation. The server
//! owns the rules, clients only need the shapes.

pub mod model;
pub mod requests;
pub mod responses;
