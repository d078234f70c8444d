//! Combinatorial driver for the CRP and CRPC properties (§4.5).
//!
//! This module owns the only genuinely expensive loop in the crate: the outer fan-out over
//! fault-cardinality subsets. It stays infallible and pure like its collaborators; the only
//! observable side effect is a `log::debug!` progress line per cardinality pass.

use hashbrown::HashMap;
use itertools::Itertools;

use crate::circuit::Circuit;
use crate::evaluate::{evaluate, FaultSet};
use crate::oracle::is_correctable;
use crate::poly::{PolyRing, Polynomial};

/// Which of the two properties (§1, §4.5) to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Crp,
    Crpc,
}

/// A single uncorrectable fault subset, in the order the enumerator discovered it.
pub type Scenario = Vec<String>;

/// Result of a CRP run: the faultable-wire universe size and every uncorrectable subset.
pub struct CrpReport {
    pub length: usize,
    pub scenarios: Vec<Scenario>,
}

/// Result of a CRPC run: one CRP-shaped sub-report per non-empty input-fault prefix.
pub struct CrpcReport {
    pub length: usize,
    pub prefixes: Vec<Scenario>,
    pub scenarios_by_prefix: Vec<Vec<Scenario>>,
}

pub enum Report {
    Crp(CrpReport),
    Crpc(CrpcReport),
}

/// Runs the enumerator end to end: baseline evaluation, then the chosen property's search.
#[must_use]
pub fn run(circuit: &Circuit, ring: &PolyRing, k: usize, set: bool, property: Property) -> Report {
    let names = circuit.faultable_names();
    let baseline0 = evaluate(circuit, ring, &FaultSet::empty(), set).outputs;

    match property {
        Property::Crp => {
            let scenarios = crp_scenarios(circuit, ring, &names, &baseline0, set, &[], k);
            Report::Crp(CrpReport {
                length: names.len(),
                scenarios,
            })
        }
        Property::Crpc => {
            let prefixes = input_fault_prefixes(circuit);
            log::debug!("CRPC: {} input-fault prefixes", prefixes.len());
            let scenarios_by_prefix =
                crp_scenarios_per_prefix(circuit, ring, &names, &baseline0, set, &prefixes, k);
            Report::Crpc(CrpcReport {
                length: names.len(),
                prefixes,
                scenarios_by_prefix,
            })
        }
    }
}

/// The fault-aware baseline (§4.4's "subtle contract"): recompute against any random wires
/// forced by `faults`, otherwise reuse the cached no-fault baseline.
fn fault_aware_baseline(
    circuit: &Circuit,
    ring: &PolyRing,
    baseline0: &HashMap<String, Polynomial>,
    faults: &FaultSet,
    set: bool,
) -> HashMap<String, Polynomial> {
    let forced_randoms = faults.random_subset(circuit);
    if forced_randoms.is_empty() {
        baseline0.clone()
    } else {
        evaluate(circuit, ring, &forced_randoms, set).outputs
    }
}

/// CRP enumeration (§4.5), with `prefix` prepended to every candidate subset — empty for a
/// plain CRP run, an input-fault prefix when driven from CRPC.
fn crp_scenarios(
    circuit: &Circuit,
    ring: &PolyRing,
    names: &[String],
    baseline0: &HashMap<String, Polynomial>,
    set: bool,
    prefix: &[String],
    k: usize,
) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    for i in 1..=k {
        log::debug!("CRP pass i={i} over {} faultable wires", names.len());
        let combos: Vec<Vec<String>> = names
            .iter()
            .combinations(i)
            .map(|combo| {
                prefix
                    .iter()
                    .cloned()
                    .chain(combo.into_iter().cloned())
                    .collect()
            })
            .collect();
        scenarios.extend(uncorrectable_subsets(circuit, ring, baseline0, set, combos));
    }
    scenarios
}

/// Filters `combos` down to the uncorrectable ones. Split out from [`crp_scenarios`] so the
/// fan-out (§5) can dispatch it through `rayon` under the `parallel` feature without disturbing
/// the single-threaded code path, which must produce the same set of scenarios (§8 property 7).
#[cfg(not(feature = "parallel"))]
fn uncorrectable_subsets(
    circuit: &Circuit,
    ring: &PolyRing,
    baseline0: &HashMap<String, Polynomial>,
    set: bool,
    combos: Vec<Vec<String>>,
) -> Vec<Scenario> {
    combos
        .into_iter()
        .filter(|faults| is_uncorrectable(circuit, ring, baseline0, set, faults))
        .collect()
}

#[cfg(feature = "parallel")]
fn uncorrectable_subsets(
    circuit: &Circuit,
    ring: &PolyRing,
    baseline0: &HashMap<String, Polynomial>,
    set: bool,
    combos: Vec<Vec<String>>,
) -> Vec<Scenario> {
    use rayon::prelude::*;

    combos
        .into_par_iter()
        .filter(|faults| is_uncorrectable(circuit, ring, baseline0, set, faults))
        .collect()
}

fn is_uncorrectable(
    circuit: &Circuit,
    ring: &PolyRing,
    baseline0: &HashMap<String, Polynomial>,
    set: bool,
    faults: &[String],
) -> bool {
    let fault_set = FaultSet::new(faults.iter().cloned());
    let baseline = fault_aware_baseline(circuit, ring, baseline0, &fault_set, set);
    let faulted = evaluate(circuit, ring, &fault_set, set);
    !is_correctable(ring, circuit, &faulted.outputs, &baseline)
}

/// Runs [`crp_scenarios`] once per prefix (§4.5 CRPC mode). The outer prefix loop is the
/// second fan-out point named in §5; gated the same way as `uncorrectable_subsets`.
#[cfg(not(feature = "parallel"))]
fn crp_scenarios_per_prefix(
    circuit: &Circuit,
    ring: &PolyRing,
    names: &[String],
    baseline0: &HashMap<String, Polynomial>,
    set: bool,
    prefixes: &[Scenario],
    k: usize,
) -> Vec<Vec<Scenario>> {
    prefixes
        .iter()
        .map(|prefix| crp_scenarios(circuit, ring, names, baseline0, set, prefix, k))
        .collect()
}

#[cfg(feature = "parallel")]
fn crp_scenarios_per_prefix(
    circuit: &Circuit,
    ring: &PolyRing,
    names: &[String],
    baseline0: &HashMap<String, Polynomial>,
    set: bool,
    prefixes: &[Scenario],
    k: usize,
) -> Vec<Vec<Scenario>> {
    use rayon::prelude::*;

    prefixes
        .par_iter()
        .map(|prefix| crp_scenarios(circuit, ring, names, baseline0, set, prefix, k))
        .collect()
}

/// Every non-empty input-fault prefix (§4.5.1): the Cartesian product, across original
/// input-shares, of that share's duplicate subsets up to the correction bound, minus the
/// all-empty tuple.
fn input_fault_prefixes(circuit: &Circuit) -> Vec<Scenario> {
    let bound = circuit.correction_bound();

    let mut dups_by_share: HashMap<&str, Vec<String>> = HashMap::new();
    for (dup, share) in &circuit.input_name_from_duplicate {
        dups_by_share.entry(share.as_str()).or_default().push(dup.clone());
    }
    for dups in dups_by_share.values_mut() {
        dups.sort_unstable();
    }

    let per_share_subsets: Vec<Vec<Vec<String>>> = circuit
        .inputs
        .iter()
        .map(|share| {
            let dups = dups_by_share.get(share.as_str()).cloned().unwrap_or_default();
            subsets_up_to(&dups, bound)
        })
        .collect();

    if per_share_subsets.is_empty() {
        return Vec::new();
    }

    per_share_subsets
        .into_iter()
        .multi_cartesian_product()
        .map(|choice| choice.into_iter().flatten().collect::<Vec<String>>())
        .filter(|prefix| !prefix.is_empty())
        .collect()
}

/// All subsets of `items` of size `0..=bound`, smallest first.
fn subsets_up_to(items: &[String], bound: usize) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    for size in 0..=bound.min(items.len()) {
        for combo in items.iter().combinations(size) {
            out.push(combo.into_iter().cloned().collect());
        }
    }
    out
}
