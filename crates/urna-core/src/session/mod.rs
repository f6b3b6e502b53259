//! Session lifecycle: the controller that owns login and expiry policy.

pub mod controller;
