//! Invariant proofs for the selector table and call units.

use std::collections::BTreeMap;
use std::sync::Arc;

use diamond_primitives::{Address, FacetHandle, Selector};
use proptest::prelude::*;

use crate::cut::FacetCut;
use crate::table::SelectorTable;
use crate::test_fixtures::{
	INCREMENT, INCREMENT_THEN_FAIL, Incremented, REENTER_AND_SWALLOW, SET_VALUE, VALUE, fixture, owner, sel,
};

#[derive(Debug, Clone)]
enum TableOp {
	Bind(u8, u8),
	Unbind(u8),
	Rebind(u8, u8),
}

fn arb_table_op() -> impl Strategy<Value = TableOp> {
	prop_oneof![
		(0u8..16, 0u8..4).prop_map(|(s, f)| TableOp::Bind(s, f)),
		(0u8..16).prop_map(TableOp::Unbind),
		(0u8..16, 0u8..4).prop_map(|(s, f)| TableOp::Rebind(s, f)),
	]
}

fn selector(i: u8) -> Selector {
	Selector::from_bytes([0xa0, 0, 0, i])
}

fn facet(i: u8) -> FacetHandle {
	FacetHandle::new(Address::from_seed(&format!("facet-{i}")))
}

/// Any sequence of binds, unbinds and rebinds keeps the forward map and the
/// reverse index mutually derivable, and agrees with a plain map model.
#[test]
pub(crate) fn test_table_stays_consistent() {
	proptest!(|(ops in prop::collection::vec(arb_table_op(), 0..64))| {
		let mut table = SelectorTable::default();
		let mut model: BTreeMap<Selector, FacetHandle> = BTreeMap::new();

		for op in ops {
			match op {
				TableOp::Bind(s, f) => {
					let result = table.bind(selector(s), facet(f));
					match model.get(&selector(s)) {
						Some(existing) => {
							prop_assert_eq!(result, Err(*existing));
						}
						None => {
							prop_assert_eq!(result, Ok(()));
							model.insert(selector(s), facet(f));
						}
					}
				}
				TableOp::Unbind(s) => {
					prop_assert_eq!(table.unbind(selector(s)), model.remove(&selector(s)));
				}
				TableOp::Rebind(s, f) => {
					let expected = model.get(&selector(s)).copied();
					prop_assert_eq!(table.rebind(selector(s), facet(f)), expected);
					if expected.is_some() {
						model.insert(selector(s), facet(f));
					}
				}
			}
			prop_assert_eq!(table.verify(), Ok(()));
		}

		prop_assert_eq!(table.len(), model.len());
		for (s, f) in &model {
			prop_assert_eq!(table.facet_of(*s), Some(*f));
		}
	});
}

const CUT_POOL: &[&str] = &[INCREMENT, VALUE, SET_VALUE, "facets()", "owner()", "unknown()"];

#[derive(Debug, Clone)]
enum CutSpec {
	AddV2(Vec<usize>),
	ReplaceV2(Vec<usize>),
	Remove(Vec<usize>),
}

fn arb_indices() -> impl Strategy<Value = Vec<usize>> {
	prop::collection::vec(0..CUT_POOL.len(), 1..4)
}

fn arb_cut() -> impl Strategy<Value = CutSpec> {
	prop_oneof![
		arb_indices().prop_map(CutSpec::AddV2),
		arb_indices().prop_map(CutSpec::ReplaceV2),
		arb_indices().prop_map(CutSpec::Remove),
	]
}

/// A batch containing any invalid cut leaves table, owner and storage
/// exactly as they were; the committed state is not even republished.
#[test]
pub(crate) fn test_failed_batch_is_atomic() {
	let fx = fixture();
	let diamond = fx.diamond();
	let tally_v2 = fx.tally_v2;

	proptest!(|(specs in prop::collection::vec(arb_cut(), 0..6), poison_at in 0usize..6)| {
		let pick = |indices: &[usize]| indices.iter().map(|&i| sel(CUT_POOL[i])).collect::<Vec<_>>();
		let mut cuts: Vec<FacetCut> = specs
			.iter()
			.map(|spec| match spec {
				CutSpec::AddV2(i) => FacetCut::add(tally_v2, pick(i.as_slice())),
				CutSpec::ReplaceV2(i) => FacetCut::replace(tally_v2, pick(i.as_slice())),
				CutSpec::Remove(i) => FacetCut::remove(pick(i.as_slice())),
			})
			.collect();
		let at = poison_at.min(cuts.len());
		cuts.insert(at, FacetCut::remove(vec![sel("neverBound()")]));

		let before = diamond.snapshot();
		let result = diamond.connect(owner()).diamond_cut(cuts, None);
		prop_assert!(result.is_err());

		let after = diamond.snapshot();
		prop_assert!(Arc::ptr_eq(&before, &after));
		prop_assert_eq!(after.table().to_entries(), before.table().to_entries());
		prop_assert_eq!(after.owner(), before.owner());
		prop_assert_eq!(after.storage(), before.storage());
	});
}

/// A re-entrant call that fails restores the caller's working state and
/// event list before the error reaches the calling module.
#[test]
pub(crate) fn test_failed_reentry_restores_frame() {
	let fx = fixture();
	let caller = fx.diamond().connect(owner());

	let receipt = caller.transact(REENTER_AND_SWALLOW, &sel(INCREMENT_THEN_FAIL)).unwrap();
	assert!(!receipt.decode::<bool>().unwrap());
	assert!(!receipt.emitted::<Incremented>());
	assert_eq!(caller.query::<_, u64>(VALUE, &()).unwrap(), 0);

	let receipt = caller.transact(REENTER_AND_SWALLOW, &sel(INCREMENT)).unwrap();
	assert!(receipt.decode::<bool>().unwrap());
	assert_eq!(receipt.find::<Incremented>(), Some(Incremented { value: 1 }));
	assert_eq!(caller.query::<_, u64>(VALUE, &()).unwrap(), 1);
}

/// Replacing the module bound to a selector never changes records written
/// before the replace.
#[test]
pub(crate) fn test_replace_preserves_storage() {
	proptest!(ProptestConfig::with_cases(32), |(value in 0u64..1_000_000)| {
		let fx = fixture();
		let diamond = fx.diamond();
		let caller = diamond.connect(owner());
		caller.transact(SET_VALUE, &value).unwrap();
		let slot_before = diamond.snapshot().storage().clone();

		let bound = diamond.loupe().selectors_of(fx.tally_v1);
		caller.diamond_cut(vec![FacetCut::replace(fx.tally_v2, bound)], None).unwrap();

		let snapshot_after = diamond.snapshot();
		prop_assert_eq!(snapshot_after.storage(), &slot_before);
		prop_assert_eq!(caller.query::<_, u64>(VALUE, &()).unwrap(), value);
		prop_assert_eq!(caller.transact(INCREMENT, &()).unwrap().decode::<u64>().unwrap(), value + 10);
	});
}
