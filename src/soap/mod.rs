//! SOAP plumbing: envelope codec, HTTP client and the transport seam.
//!
//! The [`Manager`](crate::manager::Manager) only sees [`SoapTransport`]:
//! "call a method with parameters, get a wire payload back". [`SoapClient`]
//! implements it over HTTPS; [`ScriptedTransport`] replays canned payloads.

mod client;
pub mod envelope;
mod scripted;

pub use client::{SoapClient, SoapClientConfig, DEFAULT_PORT};
pub(crate) use client::http_client;
pub use scripted::{RecordedCall, ScriptedTransport};

use crate::error::Result;
use crate::mapping::WireValue;
use std::sync::Arc;

/// Perform one remote call.
pub trait SoapTransport: Send + Sync {
    /// Call `method` (snake_case) with ordered, already encoded parameters and
    /// return the unwrapped `_return` payload.
    fn call(&self, method: &str, params: &[(&str, WireValue)]) -> Result<WireValue>;
}

impl<T: SoapTransport + ?Sized> SoapTransport for Arc<T> {
    fn call(&self, method: &str, params: &[(&str, WireValue)]) -> Result<WireValue> {
        (**self).call(method, params)
    }
}
