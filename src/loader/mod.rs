/*!
 * Handoff Loader
 *
 * Bootstrap steps for a process that asks the control device to hand it to
 * another syscall provider. Every step goes through the raw primitive; a
 * failure carries the message and raw status for the fail path.
 */

pub mod abi;
mod bootstrap;

pub use bootstrap::{
    announce, bootstrap, enter_root, open_device, request_handoff, BootstrapFailure,
    BootstrapPlan, DEFAULT_PLAN,
};
