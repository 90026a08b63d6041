//! Property tests for the shift-add pipeline

use cmvm_engine::{process, Engine, EngineConfig, SliceProcessor};
use cmvm_factor::{decompose_into, CoefficientMatrix, FactorEntry, FactorTable, Sign, TableShape, Term};
use cmvm_fixed_point::{BitWidth, WordVector};
use proptest::prelude::*;

const PLANES: usize = 3;
const ROWS: usize = 4;
const COLS: usize = 4;

fn w32() -> BitWidth {
    BitWidth::new(32).unwrap()
}

fn arb_entry(max_shift: u32) -> impl Strategy<Value = Option<FactorEntry>> {
    prop_oneof![
        1 => Just(None),
        2 => (0..max_shift, any::<bool>()).prop_map(|(shift, positive)| Some(FactorEntry {
            shift,
            sign: if positive { Sign::Positive } else { Sign::Negative },
        })),
    ]
}

fn arb_table() -> impl Strategy<Value = FactorTable> {
    proptest::collection::vec(arb_entry(32), PLANES * ROWS * COLS).prop_map(|entries| {
        FactorTable::new(TableShape::new(PLANES, ROWS, COLS), w32(), entries).unwrap()
    })
}

fn arb_vector(len: usize) -> impl Strategy<Value = WordVector> {
    proptest::collection::vec(any::<i32>(), len)
        .prop_map(|v| WordVector::from_raw(v.into_iter().map(i64::from).collect(), w32()))
}

/// Rebuild `table` with plane `d` moved to `order[d]`
fn permute_planes(table: &FactorTable, order: &[usize]) -> FactorTable {
    let terms: Vec<Term> = table
        .terms()
        .map(|t| Term {
            plane: order[t.plane],
            ..t
        })
        .collect();
    FactorTable::from_terms(table.shape(), table.width(), terms).unwrap()
}

proptest! {
    #[test]
    fn prop_single_term_shift_identity(
        v in arb_vector(COLS),
        shift in 0u32..32,
        row in 0..ROWS,
        col in 0..COLS,
    ) {
        let table = FactorTable::from_terms(
            TableShape::new(1, ROWS, COLS),
            w32(),
            [Term { plane: 0, row, col, entry: FactorEntry::positive(shift) }],
        ).unwrap();

        let out = process(&v, &table);
        for r in 0..ROWS {
            let expected = if r == row {
                (v.data[col] as i32).wrapping_shl(shift) as i64
            } else {
                0
            };
            prop_assert_eq!(out.data[r], expected);
        }
    }

    #[test]
    fn prop_zero_input_gives_zero(table in arb_table()) {
        let out = process(&WordVector::zeros(COLS, w32()), &table);
        prop_assert_eq!(out, WordVector::zeros(ROWS, w32()));
    }

    #[test]
    fn prop_plane_order_invariant(
        table in arb_table(),
        v in arb_vector(COLS),
        order in Just((0..PLANES).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let permuted = permute_planes(&table, &order);
        prop_assert_eq!(process(&v, &table), process(&v, &permuted));
    }

    #[test]
    fn prop_shift_saturation(
        v in arb_vector(COLS),
        entries in proptest::collection::vec(
            (32u32..64, any::<bool>()).prop_map(|(shift, positive)| Some(FactorEntry {
                shift,
                sign: if positive { Sign::Positive } else { Sign::Negative },
            })),
            ROWS * COLS,
        ),
    ) {
        // Valid for a 64-bit table, but every shift falls off a 32-bit word
        let table = FactorTable::new(
            TableShape::new(1, ROWS, COLS),
            BitWidth::new(64).unwrap(),
            entries,
        ).unwrap();
        let out = SliceProcessor::new(w32()).process(&v, &table);
        prop_assert_eq!(out, WordVector::zeros(ROWS, w32()));
    }

    #[test]
    fn prop_run_is_deterministic(
        t0 in arb_table(),
        t1 in arb_table(),
        input in arb_vector(4),
    ) {
        let config = EngineConfig { planes: PLANES, ..Default::default() };
        let parallel = Engine::new(config.clone(), vec![t0.clone(), t1.clone()]).unwrap();
        let sequential = Engine::new(
            EngineConfig { parallel: false, ..config },
            vec![t0, t1],
        ).unwrap();

        let first = parallel.run(&input).unwrap();
        for _ in 0..4 {
            prop_assert_eq!(&parallel.run(&input).unwrap(), &first);
        }
        prop_assert_eq!(sequential.run(&input).unwrap(), first);
    }

    #[test]
    fn prop_decomposed_engine_equals_product(
        coeffs in proptest::collection::vec(-(1i64 << 15)..(1i64 << 15), ROWS * 4),
        input in arb_vector(4),
    ) {
        let matrix = CoefficientMatrix::from_raw(coeffs, ROWS, 4).unwrap();
        let planes = 9;
        let tables = matrix
            .slice_columns(&[2, 2])
            .unwrap()
            .iter()
            .map(|m| decompose_into(&m.pad_columns(COLS).unwrap(), w32(), planes).unwrap())
            .collect();

        let engine = Engine::new(EngineConfig { planes, ..Default::default() }, tables).unwrap();
        prop_assert_eq!(engine.run(&input).unwrap(), matrix.mul_vec_wrapping(&input).unwrap());
    }
}
