//! What facet code sees while it runs.

use lapis_primitives::{Address, Selector};
use lapis_registry::RouteTable;
use serde::Serialize;

use crate::error::{CallError, CallResult};
use crate::event::Event;
use crate::storage::{StorageArena, StorageSlice};
use crate::transaction::Transaction;

/// Execution context handed to [`Facet::call`](crate::Facet::call).
///
/// Reads and writes land in the diamond's working state, never in the facet.
/// Routes are read-only here; the builtin cut facet is the only code that
/// changes them.
pub struct CallContext<'a> {
	tx: &'a mut Transaction,
	caller: Address,
	code_address: Address,
}

impl<'a> CallContext<'a> {
	pub(crate) fn new(tx: &'a mut Transaction, caller: Address, code_address: Address) -> Self {
		Self {
			tx,
			caller,
			code_address,
		}
	}

	/// Address that made this call. For re-entrant calls this is the diamond itself.
	pub fn caller(&self) -> Address {
		self.caller
	}

	/// Address of the diamond whose state is being executed against.
	pub fn diamond(&self) -> Address {
		self.tx.diamond
	}

	/// Address of the code currently running.
	pub fn code_address(&self) -> Address {
		self.code_address
	}

	/// Frame depth; the outermost call runs at depth 1.
	pub fn depth(&self) -> usize {
		self.tx.depth
	}

	/// Current owner.
	pub fn owner(&self) -> Address {
		self.tx.state.owner
	}

	/// Routing table as of now, including cuts applied earlier in this transaction.
	pub fn routes(&self) -> &RouteTable {
		&self.tx.state.routes
	}

	/// Shared storage.
	pub fn storage(&self) -> &StorageArena {
		&self.tx.state.storage
	}

	/// Mutable shared storage.
	pub fn storage_mut(&mut self) -> &mut StorageArena {
		&mut self.tx.state.storage
	}

	/// Copy of slice `T`, default if never written.
	pub fn slice<T: StorageSlice>(&self) -> CallResult<T> {
		Ok(self.tx.state.storage.read::<T>()?)
	}

	/// Mutable slice `T`.
	pub fn slice_mut<T: StorageSlice>(&mut self) -> CallResult<&mut T> {
		Ok(self.tx.state.storage.get_mut::<T>()?)
	}

	/// Emits a facet log. Logs of a reverted frame are discarded with it.
	pub fn emit<T: Serialize + ?Sized>(&mut self, name: impl Into<String>, data: &T) -> CallResult<()> {
		let data = lapis_primitives::abi::encode_return(data)?;
		let emitter = self.code_address;
		self.tx.emit(Event::Log {
			emitter,
			name: name.into(),
			data,
		});
		Ok(())
	}

	/// Calls back into the diamond, dispatching `calldata` as a fresh inbound
	/// call whose caller is the diamond.
	///
	/// The nested call sees every effect this frame has made so far. If it
	/// fails, its own effects are rolled back and the error is returned; the
	/// caller decides whether to propagate it.
	pub fn reenter(&mut self, calldata: &[u8]) -> CallResult<Vec<u8>> {
		let diamond = self.tx.diamond;
		self.tx.dispatch(diamond, calldata)
	}

	/// Encodes and re-enters a call to `signature`.
	pub fn reenter_signature<A: Serialize + ?Sized>(&mut self, signature: &str, args: &A) -> CallResult<Vec<u8>> {
		let calldata = lapis_primitives::abi::encode_signature_call(signature, args)?;
		self.reenter(&calldata)
	}

	/// Error for a selector this facet does not implement.
	pub fn unsupported(&self, selector: Selector) -> CallError {
		CallError::UnsupportedSelector {
			facet: self.code_address,
			selector,
		}
	}

	pub(crate) fn transaction(&mut self) -> &mut Transaction {
		self.tx
	}
}
