//! Exchange-agnostic domain types.
//!
//! Nothing in here performs I/O. The profit calculator in [`profit`] is a
//! pure function; everything else is data with invariant-checking
//! constructors.

pub mod catalog;
pub mod error;
pub mod id;
pub mod notification;
pub mod opportunity;
pub mod preference;
pub mod price;
pub mod profit;
pub mod scan;
pub mod tier;
