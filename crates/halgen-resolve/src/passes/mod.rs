//! Resolution passes.
//!
//! Every pass runs over the whole declaration list and records its errors
//! instead of stopping at the first one. A pass that reports no errors yields
//! exactly one output entry per declaration, in declaration order.

pub(crate) mod capability;
pub(crate) mod clocks;
pub(crate) mod mode;
pub(crate) mod ownership;
pub(crate) mod params;
