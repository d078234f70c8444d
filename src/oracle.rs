//! Majority-vote correction decision (§4.4).
//!
//! Whether a faulted output table is recoverable by the duplicated encoding's majority vote,
//! given the per-share correction budget `floor((d - 1) / 2)`. Like [`crate::evaluate`], this
//! module is pure and infallible: it never touches a file, never logs, never fails.

use hashbrown::HashMap;

use crate::circuit::Circuit;
use crate::poly::{PolyRing, Polynomial};

/// `true` iff every share's corrupted-duplicate count stays within `circuit.correction_bound()`.
///
/// `faulted_outputs` and `baseline_outputs` must carry the same key set (every output-duplicate
/// name); a wire present in one and absent in the other is treated as unaffected rather than
/// as a hard error, since the two tables always come from paired [`crate::evaluate::evaluate`]
/// calls against the same circuit.
#[must_use]
pub fn is_correctable(
    ring: &PolyRing,
    circuit: &Circuit,
    faulted_outputs: &HashMap<String, Polynomial>,
    baseline_outputs: &HashMap<String, Polynomial>,
) -> bool {
    let bound = circuit.correction_bound();
    let mut corrupted = vec![0usize; circuit.nb_shares];

    for (name, &share) in &circuit.output_idx_from_duplicate {
        let differs = match (faulted_outputs.get(name), baseline_outputs.get(name)) {
            (Some(f), Some(b)) => !ring.equal(f, b),
            _ => false,
        };
        if differs {
            corrupted[share] += 1;
        }
    }

    corrupted.iter().all(|&k| k <= bound)
}
