use lapis_primitives::{Address, Selector};

use crate::cut::{CutEngine, CutError};
use crate::table::RouteTable;

pub(crate) const DIAMOND: Address = Address::from_low_u8(0xd1);
pub(crate) const A: Address = Address::from_low_u8(0xa);
pub(crate) const B: Address = Address::from_low_u8(0xb);
pub(crate) const C: Address = Address::from_low_u8(0xc);
/// Address that never holds code in fixtures.
pub(crate) const EMPTY: Address = Address::from_low_u8(0xee);

pub(crate) fn sel(signature: &str) -> Selector {
	Selector::from_signature(signature)
}

pub(crate) fn deployed(address: Address) -> bool {
	!address.is_zero() && address != EMPTY
}

pub(crate) fn engine() -> CutEngine<'static, fn(Address) -> bool> {
	static LOOKUP: fn(Address) -> bool = deployed;
	CutEngine::new(DIAMOND, &LOOKUP)
}

pub(crate) fn apply(table: &RouteTable, cuts: &[lapis_primitives::FacetCut]) -> Result<RouteTable, CutError> {
	engine().apply(table, cuts).map(|outcome| outcome.table)
}
