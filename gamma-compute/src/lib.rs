//! Symbolic algebra and the sandboxed evaluator behind Gamma.
//!
//! [`symbolic`] holds the expression tree and everything that manipulates it: canonical
//! construction, simplification, calculus, logic, number theory, printers, and the step-by-step
//! explanations of derivatives and integrals. [`eval`] runs programs written in the expression
//! language against a namespace of those operations.

pub mod approx;
pub mod consts;
pub mod eval;
pub mod primitive;
pub mod symbolic;
