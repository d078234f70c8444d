//! In-memory circuit representation (§3) and the text-format parser (§6.1).

mod parser;

use hashbrown::{HashMap, HashSet};

use crate::error::CircuitParseError;
use crate::poly::PolyRing;

/// The right-hand side of an equation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Form {
    /// `dst = src`
    Copy(String),
    /// `dst = ~src`, stored as `add(one(), src)` at evaluation time.
    Neg(String),
    /// `dst = a <op> b`
    BinOp(BinOp, String, String),
}

/// The two supported binary operators (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Mul,
}

/// One equation of the circuit: `dst = form`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    pub dst: String,
    pub form: Form,
}

/// In-memory representation of a parsed circuit (§3).
///
/// Constructed once from a file and never mutated afterwards; every query against it
/// ([`crate::evaluate`], [`crate::enumerate`]) takes `&Circuit`.
#[derive(Debug)]
pub struct Circuit {
    pub nb_shares: usize,
    pub nb_duplications: usize,
    /// Ordered share-level input names, e.g. `a0`, `a1`, `b0`, `b1` for two inputs at 2 shares.
    pub inputs: Vec<String>,
    /// Duplicated-input name (`a0_1`) -> share-level name (`a0`).
    pub input_name_from_duplicate: HashMap<String, String>,
    pub randoms: Vec<String>,
    /// Internal equations, in topological order, with output equations removed.
    pub eqs: Vec<Equation>,
    /// Output equations, in the order they were peeled off during segregation (§4.2).
    pub eqs_outputs: Vec<Equation>,
    /// Output-duplicate name (`o0_1`) -> share index.
    pub output_idx_from_duplicate: HashMap<String, usize>,
}

impl Circuit {
    /// Parses a circuit description in the format of §6.1.
    pub fn parse(text: &str) -> Result<Circuit, CircuitParseError> {
        parser::parse(text)
    }

    /// The correction budget `floor((d - 1) / 2)`: the number of corrupted duplicates per
    /// share that majority vote tolerates.
    #[must_use]
    pub fn correction_bound(&self) -> usize {
        (self.nb_duplications.saturating_sub(1)) / 2
    }

    /// The ring variable universe: share-level inputs followed by randoms, per §4.1.
    ///
    /// Duplicated-input names and internal/output wire names are deliberately excluded;
    /// they are bound to polynomials built from these, never indeterminates themselves.
    #[must_use]
    pub fn build_ring(&self) -> PolyRing {
        PolyRing::new(
            self.inputs
                .iter()
                .cloned()
                .chain(self.randoms.iter().cloned()),
        )
    }

    /// All wire names that can be individually targeted by a fault, in the fixed order
    /// used throughout the enumerator (internal equations, then randoms, then outputs).
    #[must_use]
    pub fn faultable_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.eqs.len() + self.randoms.len() + self.eqs_outputs.len());
        names.extend(self.eqs.iter().map(|e| e.dst.clone()));
        names.extend(self.randoms.iter().cloned());
        names.extend(self.eqs_outputs.iter().map(|e| e.dst.clone()));
        names
    }

    /// The set of randoms, for quick `contains` checks during enumeration.
    #[must_use]
    pub fn random_set(&self) -> HashSet<&str> {
        self.randoms.iter().map(String::as_str).collect()
    }
}
