//! Session/token bridge

mod bridge;

pub use bridge::SessionBridge;
