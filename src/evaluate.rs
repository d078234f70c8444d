//! Symbolic evaluation of a circuit under a fault set (§4.3).
//!
//! `evaluate` is pure and total: it never fails, never mutates the [`Circuit`], and always
//! returns the same result for the same `(circuit, faults, set)` triple (§8 property 1,
//! "purity"). Fallibility belongs to the boundary collaborators in [`crate::error`], not here.

use hashbrown::HashMap;

use crate::circuit::{BinOp, Circuit, Form};
use crate::poly::{PolyRing, Polynomial};

/// An unordered selection of wire names forced to a constant polarity (§3).
///
/// A thin wrapper around the lookup used during evaluation; construct from any string
/// collection via [`FaultSet::new`].
#[derive(Debug, Clone, Default)]
pub struct FaultSet(hashbrown::HashSet<String>);

impl FaultSet {
    #[must_use]
    pub fn new<I, S>(wires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FaultSet(wires.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn empty() -> Self {
        FaultSet(hashbrown::HashSet::new())
    }

    #[must_use]
    pub fn contains(&self, wire: &str) -> bool {
        self.0.contains(wire)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The subset of this fault set that targets random wires (§4.5's `C_rand`).
    #[must_use]
    pub fn random_subset(&self, circuit: &Circuit) -> FaultSet {
        let randoms = circuit.random_set();
        FaultSet(
            self.0
                .iter()
                .filter(|w| randoms.contains(w.as_str()))
                .cloned()
                .collect(),
        )
    }
}

impl<'a> FromIterator<&'a str> for FaultSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        FaultSet(iter.into_iter().map(str::to_string).collect())
    }
}

/// The result of one evaluation pass: every internal wire's value, and every output
/// wire's value, both keyed by wire name.
pub struct EvalResult {
    pub internal: HashMap<String, Polynomial>,
    pub outputs: HashMap<String, Polynomial>,
}

/// Evaluates `circuit` with `faults` forced to `set` (true = stuck-at-1, false =
/// stuck-at-0), per the algorithm in §4.3.
#[must_use]
pub fn evaluate(circuit: &Circuit, ring: &PolyRing, faults: &FaultSet, set: bool) -> EvalResult {
    log::trace!(
        "evaluate: {} fault(s), polarity={}",
        faults.len(),
        if set { "set" } else { "reset" }
    );

    let forced = ring.constant(set);
    let mut values: HashMap<String, Polynomial> = HashMap::new();

    for random in &circuit.randoms {
        let value = if faults.contains(random) {
            forced.clone()
        } else {
            ring.var(random)
        };
        values.insert(random.clone(), value);
    }
    for constant in ["0", "1"] {
        let value = if faults.contains(constant) {
            forced.clone()
        } else {
            ring.constant(constant == "1")
        };
        values.insert(constant.to_string(), value);
    }

    for (dup_name, share_name) in &circuit.input_name_from_duplicate {
        let value = if faults.contains(dup_name) {
            forced.clone()
        } else {
            ring.var(share_name)
        };
        values.insert(dup_name.clone(), value);
    }

    for eq in &circuit.eqs {
        let value = if faults.contains(&eq.dst) {
            forced.clone()
        } else {
            eval_form(ring, &eq.form, &values)
        };
        values.insert(eq.dst.clone(), value);
    }

    let mut outputs = HashMap::with_capacity(circuit.eqs_outputs.len());
    for eq in &circuit.eqs_outputs {
        let value = if faults.contains(&eq.dst) {
            forced.clone()
        } else {
            eval_form(ring, &eq.form, &values)
        };
        outputs.insert(eq.dst.clone(), value);
    }

    EvalResult {
        internal: values,
        outputs,
    }
}

fn eval_form(ring: &PolyRing, form: &Form, values: &HashMap<String, Polynomial>) -> Polynomial {
    let lookup = |name: &str| {
        values
            .get(name)
            .unwrap_or_else(|| panic!("wire {name:?} evaluated before definition"))
            .clone()
    };
    match form {
        Form::Copy(src) => lookup(src),
        Form::Neg(src) => ring.add(&ring.one(), &lookup(src)),
        Form::BinOp(BinOp::Add, a, b) => ring.add(&lookup(a), &lookup(b)),
        Form::BinOp(BinOp::Mul, a, b) => ring.mul(&lookup(a), &lookup(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;

    #[test]
    fn no_fault_baseline_is_identity_in_shares() {
        let c = Circuit::parse(
            "\
SHARES 1
DUPLICATIONS 1
IN a
RANDOMS
OUT o
o0_0 = a0_0
",
        )
        .unwrap();
        let ring = c.build_ring();
        let result = evaluate(&c, &ring, &FaultSet::empty(), true);
        assert!(ring.equal(&result.outputs["o0_0"], &ring.var("a0")));
    }

    #[test]
    fn masking_cancels_across_two_random_uses() {
        // t = a0_0 + r; u = t + r; o0_0 = u; o1_0 = a1_0 (S4 in the test-scenario catalog)
        let c = Circuit::parse(
            "\
SHARES 2
DUPLICATIONS 1
IN a
RANDOMS r
OUT o
t = a0_0 + r
u = t + r
o0_0 = u
o1_0 = a1_0
",
        )
        .unwrap();
        let ring = c.build_ring();
        let baseline = evaluate(&c, &ring, &FaultSet::empty(), true);
        assert!(ring.equal(&baseline.outputs["o0_0"], &ring.var("a0")));
    }

    #[test]
    fn forcing_a_random_changes_the_recomputed_baseline_consistently() {
        let c = Circuit::parse(
            "\
SHARES 2
DUPLICATIONS 1
IN a
RANDOMS r
OUT o
t = a0_0 + r
u = t + r
o0_0 = u
o1_0 = a1_0
",
        )
        .unwrap();
        let ring = c.build_ring();
        let faults = FaultSet::new(["r"]);
        let forced = evaluate(&c, &ring, &faults, true);
        // With r forced to 1: t = a0 + 1, u = t + 1 = a0 + 1 + 1 = a0. Same as baseline.
        assert!(ring.equal(&forced.outputs["o0_0"], &ring.var("a0")));
    }

    #[test]
    fn neg_evaluates_to_one_plus_source() {
        let c = Circuit::parse(
            "\
SHARES 1
DUPLICATIONS 1
IN a
RANDOMS
OUT o
t = ~a0_0
o0_0 = t
",
        )
        .unwrap();
        let ring = c.build_ring();
        let result = evaluate(&c, &ring, &FaultSet::empty(), true);
        let expected = ring.add(&ring.one(), &ring.var("a0"));
        assert!(ring.equal(&result.outputs["o0_0"], &expected));
    }
}
