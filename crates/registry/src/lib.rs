//! Routing table and cut engine for the lapis diamond.
//!
//! # Mental model
//!
//! 1. A [`RouteTable`] maps selectors to facets and keeps the reverse index and
//!    ordered facet list in lockstep.
//! 2. A [`CutEngine`] turns `(table, batch)` into a new table or a [`CutError`];
//!    the input table is left untouched.
//! 3. [`DiamondLoupe`] is the read-only query surface, implemented directly on
//!    the table and reused by the diamond's introspection facet.
//!
//! Publication, ownership and initializers are the diamond crate's business.

pub mod cut;
pub mod loupe;
pub mod table;

pub use cut::{CodeLookup, CutEngine, CutError, CutOutcome, CutStats};
pub use loupe::DiamondLoupe;
pub use table::{FacetEntry, FacetSelectors, Inconsistency, Route, RouteTable};

#[cfg(test)]
pub(crate) mod test_fixtures;
