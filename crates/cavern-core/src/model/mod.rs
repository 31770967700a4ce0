//! Domain records stored in a [`Graph`](crate::graph::Graph).
//!
//! - [`site`]: a cave: identity, display name, coordinates, resources.
//! - [`link`]: a weighted, directed route between two sites.

pub mod link;
pub mod site;

pub use link::Link;
pub use site::Site;
