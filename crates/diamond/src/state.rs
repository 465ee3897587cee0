//! Committed diamond state.

use std::sync::Arc;

use lapis_primitives::Address;
use lapis_registry::RouteTable;

use crate::loupe::SupportedInterfaces;
use crate::storage::{StorageArena, StorageError};

/// Everything a diamond persists between calls: routes, owner and storage.
///
/// Cloning is cheap: the route table is shared and storage slices are
/// copy-on-write. Call frames checkpoint by cloning.
#[derive(Debug, Clone)]
pub struct DiamondState {
	pub(crate) routes: Arc<RouteTable>,
	pub(crate) owner: Address,
	pub(crate) storage: StorageArena,
}

impl DiamondState {
	/// State of a freshly constructed diamond, before its initial cut.
	pub(crate) fn genesis(owner: Address) -> Result<Self, StorageError> {
		let mut storage = StorageArena::new();
		storage.get_mut::<SupportedInterfaces>()?.register_builtin();
		Ok(Self {
			routes: Arc::new(RouteTable::new()),
			owner,
			storage,
		})
	}

	/// Current routing table.
	pub fn routes(&self) -> &RouteTable {
		&self.routes
	}

	/// Current owner.
	pub fn owner(&self) -> Address {
		self.owner
	}

	/// Shared storage.
	pub fn storage(&self) -> &StorageArena {
		&self.storage
	}
}
