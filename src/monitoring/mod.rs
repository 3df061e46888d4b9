/*!
 * Monitoring
 * Structured tracing for the driver host
 */

mod tracer;

pub use tracer::{init_tracing, span_operation, OperationSpan};
