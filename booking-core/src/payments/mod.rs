//! Payment flow
//!
//! [`gateway`] stands in for the external provider; [`processor`] drives
//! the booking/payment status synchronization under the booking row lock.

pub mod gateway;
pub mod processor;

pub use gateway::MockGateway;
pub use processor::PaymentProcessor;
