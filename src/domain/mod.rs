//! Domain layer: order value types, the pricing rules and the ports the
//! application layer talks through.

pub mod attachment;
pub mod order;
pub mod ports;
pub mod pricing;
