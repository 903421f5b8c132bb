pub mod client;
pub mod endpoints;
pub mod envelope;
#[cfg(test)]
pub mod mock;
pub mod transport;

pub use client::AdminClient;
pub use envelope::{Meta, Page};
pub use transport::{Body, FormPart, HttpTransport, Method, Transport};
