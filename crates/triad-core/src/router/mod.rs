//! The hybrid router (C7, spec.md §4.4): hard rules first, then the routing
//! cache, then the online linear classifier.

mod result;
#[allow(clippy::module_inception)]
mod router;

pub use result::RoutingResult;
pub use router::Router;
