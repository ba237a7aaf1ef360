//! Declarative helpers for defining state types.

pub mod macros;
