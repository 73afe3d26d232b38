//! Numeric kernels behind every registered operation.
//!
//! Each kernel is written against its natural signature and lifted into the
//! registry's `fn(&[f64]) -> f64` shape by [`polexpr_macros::operation`].

pub mod aggregate;
pub mod arithmetic;
pub mod trigonometry;

/// Uniform signature every operation kernel is lifted into.
pub type Kernel = fn(&[f64]) -> f64;
