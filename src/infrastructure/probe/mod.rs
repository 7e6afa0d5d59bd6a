//! Destination reachability probing.

mod http_probe;

pub use http_probe::HttpTargetProbe;
