//! Upgradeable diamond: one address routing calls by selector to
//! independently deployed facets over a single shared storage space.
//!
//! # Layers
//!
//! - [`Deployments`] holds facet code at deterministic addresses.
//! - [`Diamond`] owns the committed [`DiamondState`] (routes, owner,
//!   [`StorageArena`]) and runs every outermost call as a transaction over a
//!   private copy, published atomically on success.
//! - Facets implement [`Facet`] and see the diamond only through a
//!   [`CallContext`]: storage slices, events and re-entrant calls.
//! - Routing changes go exclusively through the owner-gated cut path
//!   (`Diamond::diamond_cut` or the routed `diamondCut`), validated by
//!   [`lapis_registry::CutEngine`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use lapis_diamond::facets::{RosterFacet, deploy_standard};
//! use lapis_diamond::{Deployments, Diamond, DiamondArgs};
//! use lapis_primitives::{Address, FacetCut};
//!
//! let owner = Address::from_low_u8(1);
//! let deployments = Arc::new(Deployments::default());
//! let mut cuts = deploy_standard(&deployments).cuts();
//! let roster = RosterFacet::new(1);
//! let selectors = vec![lapis_primitives::Selector::from_signature("getTeamsCount()")];
//! cuts.push(FacetCut::add(deployments.deploy(roster), selectors));
//!
//! let diamond = Diamond::new(deployments, &cuts, DiamondArgs::owned_by(owner)).unwrap();
//! let count: u64 = diamond.call_signature(owner, "getTeamsCount()", &()).unwrap().decode().unwrap();
//! assert_eq!(count, 0);
//! ```

mod context;
mod cut;
mod diamond;
mod dispatch;
pub mod error;
pub mod event;
mod facet;
pub mod facets;
pub mod loupe;
pub mod manifest;
mod ownership;
mod state;
pub mod storage;
mod transaction;

pub use context::CallContext;
pub use diamond::{Diamond, DiamondArgs};
pub use error::{CallError, CallResult, OwnershipError, StorageError};
pub use event::{Event, Receipt};
pub use facet::{CodeTable, Deployments, Facet, FunctionTable, INITIALIZER_PREFIX};
pub use loupe::{LoupeView, SupportedInterfaces};
pub use manifest::{Deployment, Manifest, ManifestError};
pub use state::DiamondState;
pub use storage::{StorageArena, StorageSlice};
pub use transaction::MAX_CALL_DEPTH;
