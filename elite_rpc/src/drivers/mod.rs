#[cfg(feature="driver")]
mod transport;
#[cfg(feature="driver")]
pub use transport::*;

#[cfg(feature="driver")]
mod client;
#[cfg(feature="driver")]
pub use client::*;

#[cfg(feature="driver")]
mod robot;
#[cfg(feature="driver")]
pub use robot::*;

mod models;
pub use models::*;

mod driver_config;
pub use driver_config::*;
