#![deny(elided_lifetimes_in_paths)]

pub mod circuit;
pub mod enumerate;
pub mod error;
pub mod evaluate;
pub mod oracle;
pub mod poly;
pub mod report;

pub use circuit::Circuit;
pub use enumerate::{Property, Report};
pub use error::MaskfaultError;
pub use evaluate::{evaluate, FaultSet};
pub use poly::PolyRing;
