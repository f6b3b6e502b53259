//! Identity lookup port.

pub mod lookup;
