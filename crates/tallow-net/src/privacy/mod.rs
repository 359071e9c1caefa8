//! Privacy-preserving network features

pub mod doh;
pub mod socks5;
pub mod traffic_analysis;

pub use doh::DohResolver;
pub use socks5::{ProxyAuth, ProxyConfig, Socks5Connector};
pub use traffic_analysis::TrafficShaper;
