/*!
 * Driver Host
 * Configuration and lifecycle of the handoff driver
 */

pub mod config;
mod driver;

pub use config::DriverConfig;
pub use driver::Driver;
