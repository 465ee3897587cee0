//! A call in flight: a private working copy of the diamond state.
//!
//! # Frames
//!
//! Every entry into facet code (the outermost call, each re-entrant call and
//! each initializer) is a frame. A frame records a [`Checkpoint`] on entry
//! and restores it if the frame fails, so a failed nested call leaves the
//! enclosing frame exactly as it was before the nested call started.
//! Effects of frames that succeed are visible to everything that runs after
//! them in the same transaction.
//!
//! Nothing here is published. The [`Diamond`](crate::Diamond) publishes the
//! working state when the outermost frame returns successfully.

use std::sync::Arc;

use lapis_primitives::Address;

use crate::event::Event;
use crate::facet::CodeTable;
use crate::state::DiamondState;

/// Maximum nesting of frames within one transaction.
pub const MAX_CALL_DEPTH: usize = 1024;

/// Saved frame state.
#[derive(Debug)]
pub(crate) struct Checkpoint {
	state: DiamondState,
	events: usize,
}

/// Working state of one outermost call.
#[derive(Debug)]
pub(crate) struct Transaction {
	pub(crate) diamond: Address,
	pub(crate) code: Arc<CodeTable>,
	pub(crate) state: DiamondState,
	pub(crate) events: Vec<Event>,
	pub(crate) depth: usize,
}

impl Transaction {
	pub(crate) fn new(diamond: Address, code: Arc<CodeTable>, state: DiamondState) -> Self {
		Self {
			diamond,
			code,
			state,
			events: Vec::new(),
			depth: 0,
		}
	}

	/// Consumes the transaction, yielding the state to publish and the events it emitted.
	pub(crate) fn finish(self) -> (DiamondState, Vec<Event>) {
		(self.state, self.events)
	}

	pub(crate) fn checkpoint(&self) -> Checkpoint {
		Checkpoint {
			state: self.state.clone(),
			events: self.events.len(),
		}
	}

	pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
		self.state = checkpoint.state;
		self.events.truncate(checkpoint.events);
	}

	pub(crate) fn emit(&mut self, event: Event) {
		tracing::trace!(depth = self.depth, ?event, "event");
		self.events.push(event);
	}
}
