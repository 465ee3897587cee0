//! Single-owner access control (ERC-173).

use lapis_primitives::Address;
use thiserror::Error;

use crate::error::CallResult;
use crate::event::Event;
use crate::transaction::Transaction;

/// Ownership operation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnershipError {
	/// Caller is not the current owner.
	#[error("caller {caller} is not the owner {owner}")]
	Unauthorized {
		/// Rejected caller.
		caller: Address,
		/// Current owner.
		owner: Address,
	},
	/// Ownership cannot be given to the null address.
	#[error("new owner is the null address")]
	NullOwner,
}

impl Transaction {
	pub(crate) fn require_owner(&self, caller: Address) -> Result<(), OwnershipError> {
		let owner = self.state.owner;
		if caller == owner {
			Ok(())
		} else {
			Err(OwnershipError::Unauthorized { caller, owner })
		}
	}

	pub(crate) fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> CallResult<()> {
		self.require_owner(caller)?;
		if new_owner.is_zero() {
			return Err(OwnershipError::NullOwner.into());
		}
		let previous_owner = std::mem::replace(&mut self.state.owner, new_owner);
		self.emit(Event::OwnershipTransferred {
			previous_owner,
			new_owner,
		});
		tracing::info!(%previous_owner, %new_owner, "ownership transferred");
		Ok(())
	}
}
