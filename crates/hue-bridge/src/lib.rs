//! Philips Hue bridge client
//!
//! Thin REST client for the bridge's local API. Only the on/off portion of
//! the light state resource is implemented.

pub mod client;

pub use client::{HueClient, HueError};
