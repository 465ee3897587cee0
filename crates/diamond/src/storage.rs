//! Shared storage arena with namespaced, typed slices.
//!
//! # Purpose
//!
//! Facets own no state. Everything they persist lives in one [`StorageArena`]
//! owned by the diamond, split into *slices*. Each slice type declares a
//! stable namespace string; the arena keys slices by `keccak256(namespace)`.
//! Two facets that agree on a namespace share the slice, which is how an
//! initializer prepares state for the facet it installs.
//!
//! # Copy-on-write
//!
//! Slices sit behind `Arc`. Cloning the arena (done for every call frame
//! checkpoint) clones the key map and bumps reference counts; the first
//! mutable access to a shared slice clones that slice only.
//!
//! # Invariants
//!
//! - A namespace holds at most one slice type. Accessing it as another type
//!   fails with [`StorageError::TypeMismatch`] rather than reinterpreting data.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use lapis_primitives::{Hash32, keccak256};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// A typed storage slice.
pub trait StorageSlice: Any + Clone + Default + fmt::Debug + Send + Sync {
	/// Stable namespace this slice lives under.
	const NAMESPACE: &'static str;
}

/// Storage access failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
	/// The namespace already holds a slice of another type.
	#[error("storage namespace {namespace:?} holds {found}, not {expected}")]
	TypeMismatch {
		/// Namespace string.
		namespace: &'static str,
		/// Requested type.
		expected: &'static str,
		/// Stored type.
		found: &'static str,
	},
}

trait ErasedSlice: Any + fmt::Debug + Send + Sync {
	fn clone_arc(&self) -> Arc<dyn ErasedSlice>;
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
	fn type_name(&self) -> &'static str;
}

impl<T: StorageSlice> ErasedSlice for T {
	fn clone_arc(&self) -> Arc<dyn ErasedSlice> {
		Arc::new(self.clone())
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}

	fn type_name(&self) -> &'static str {
		type_name::<T>()
	}
}

/// Storage key derived from a namespace string.
pub fn namespace_key(namespace: &str) -> Hash32 {
	keccak256(namespace.as_bytes())
}

/// The diamond's storage: namespaced slices, cloned cheaply per frame.
#[derive(Clone, Default, Debug)]
pub struct StorageArena {
	slices: FxHashMap<Hash32, Arc<dyn ErasedSlice>>,
}

impl StorageArena {
	/// Creates an empty arena.
	pub fn new() -> Self {
		Self::default()
	}

	/// Reads slice `T`, or `None` if nothing was ever written under its namespace.
	pub fn get<T: StorageSlice>(&self) -> Result<Option<&T>, StorageError> {
		let Some(slot) = self.slices.get(&namespace_key(T::NAMESPACE)) else {
			return Ok(None);
		};
		(**slot)
			.as_any()
			.downcast_ref::<T>()
			.map(Some)
			.ok_or_else(|| mismatch::<T>((**slot).type_name()))
	}

	/// Reads slice `T`, falling back to its default value.
	pub fn read<T: StorageSlice>(&self) -> Result<T, StorageError> {
		Ok(self.get::<T>()?.cloned().unwrap_or_default())
	}

	/// Mutable access to slice `T`, creating it with its default value if absent.
	pub fn get_mut<T: StorageSlice>(&mut self) -> Result<&mut T, StorageError> {
		let slot = self
			.slices
			.entry(namespace_key(T::NAMESPACE))
			.or_insert_with(|| Arc::new(T::default()) as Arc<dyn ErasedSlice>);
		let found = (**slot).type_name();
		if !(**slot).as_any().is::<T>() {
			return Err(mismatch::<T>(found));
		}
		if Arc::get_mut(slot).is_none() {
			*slot = (**slot).clone_arc();
		}
		Arc::get_mut(slot)
			.and_then(|slice| slice.as_any_mut().downcast_mut::<T>())
			.ok_or_else(|| mismatch::<T>(found))
	}

	/// Number of slices written so far.
	pub fn len(&self) -> usize {
		self.slices.len()
	}

	/// Returns true if nothing has been written.
	pub fn is_empty(&self) -> bool {
		self.slices.is_empty()
	}
}

fn mismatch<T: StorageSlice>(found: &'static str) -> StorageError {
	StorageError::TypeMismatch {
		namespace: T::NAMESPACE,
		expected: type_name::<T>(),
		found,
	}
}
