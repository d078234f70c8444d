//! Boolean polynomial ring: GF(2)[x_1, ..., x_n] / (x_i^2 - x_i).
//!
//! Polynomials are kept in a canonical sum-of-monomials form so that structural equality
//! (`==`) coincides with ring equality — this is what lets [`crate::oracle`] tell a truly
//! unchanged random-masked wire apart from one that merely evaluates the same under some
//! sampled assignment.
//!
//! A monomial is a subset of the variable universe, represented as a fixed-width bit vector
//! so that union (used by multiplication) is a single word-parallel OR. A polynomial is a
//! deduplicated, sorted list of monomials combined by XOR: duplicate monomials cancel, which
//! is exactly the `x_i^2 = x_i` reduction applied one level up (a variable squared collapses
//! into the same monomial, so XOR-ing two copies of it away is the `+` analog of that rule).
//!
//! This module never fails: every operation is total over valid `Polynomial` values, and
//! every `Polynomial` producible through this API is valid.

use bitvec::prelude::*;
use hashbrown::HashMap;
use std::sync::Arc;

/// A set of variables, stored as a bit vector over the ring's fixed universe.
///
/// `Eq`/`Hash`/`Ord` are derived from the sorted list of set-bit indices rather than from
/// `BitVec`'s own impls, so canonical ordering is explicit and independent of the backing
/// store's bit order.
#[derive(Clone, Debug)]
struct Monomial(BitVec<usize, Lsb0>);

impl Monomial {
    fn empty(nb_vars: usize) -> Self {
        Monomial(bitvec![usize, Lsb0; 0; nb_vars])
    }

    fn singleton(nb_vars: usize, index: usize) -> Self {
        let mut bits = bitvec![usize, Lsb0; 0; nb_vars];
        bits.set(index, true);
        Monomial(bits)
    }

    fn union(&self, other: &Monomial) -> Monomial {
        Monomial(self.0.clone() | other.0.clone())
    }

    fn sort_key(&self) -> Vec<usize> {
        self.0.iter_ones().collect()
    }
}

impl PartialEq for Monomial {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}
impl Eq for Monomial {}

impl std::hash::Hash for Monomial {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// An element of the Boolean polynomial ring.
///
/// Canonical form: monomials sorted (for deterministic iteration/hashing) with no
/// duplicates. `Polynomial::zero()` is the empty list; `Polynomial::one()` is the list
/// containing only the empty monomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    monomials: Vec<Monomial>,
}

impl Polynomial {
    fn from_monomials(mut monomials: Vec<Monomial>) -> Self {
        monomials.sort_unstable();
        monomials.dedup();
        Polynomial { monomials }
    }

    /// A fast, non-cryptographic structural hash, suitable for memoizing ring operations.
    ///
    /// Two equal polynomials always hash equally; unequal polynomials hash equally only on
    /// a collision. Used the same way the garbling scheme this crate is grown from uses
    /// `xxh3` to fingerprint wire-shaped data for its random oracle.
    #[must_use]
    pub fn hash(&self) -> u64 {
        let mut buf = Vec::with_capacity(self.monomials.len() * 8);
        for m in &self.monomials {
            for idx in m.0.iter_ones() {
                buf.extend_from_slice(&(idx as u32).to_le_bytes());
            }
            buf.extend_from_slice(&u32::MAX.to_le_bytes());
        }
        xxhash_rust::xxh3::xxh3_64(&buf)
    }
}

/// A fixed universe of indeterminates that backs every [`Polynomial`] produced from it.
///
/// Per §4.1 the universe is fixed at construction time: share-level inputs and random
/// wires. Duplicated-input names and internal/output wire names are never ring variables —
/// they are bound to polynomials built out of these, never indeterminates themselves.
#[derive(Debug)]
pub struct PolyRing {
    var_index: HashMap<Arc<str>, usize>,
    nb_vars: usize,
}

impl PolyRing {
    /// Builds a ring whose indeterminates are exactly `variables`, in the given order.
    ///
    /// # Panics
    /// Panics if `variables` contains a duplicate name; the caller (circuit construction)
    /// is expected to de-duplicate shares and randoms before calling this.
    #[must_use]
    pub fn new<I, S>(variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let mut var_index = HashMap::new();
        for (i, name) in variables.into_iter().enumerate() {
            let name = name.into();
            let prior = var_index.insert(name.clone(), i);
            assert!(prior.is_none(), "duplicate ring variable: {name}");
        }
        let nb_vars = var_index.len();
        PolyRing { var_index, nb_vars }
    }

    #[must_use]
    pub fn zero(&self) -> Polynomial {
        Polynomial { monomials: vec![] }
    }

    #[must_use]
    pub fn one(&self) -> Polynomial {
        Polynomial {
            monomials: vec![Monomial::empty(self.nb_vars)],
        }
    }

    #[must_use]
    pub fn constant(&self, bit: bool) -> Polynomial {
        if bit {
            self.one()
        } else {
            self.zero()
        }
    }

    /// The polynomial `x` for a variable `x` in this ring's universe.
    ///
    /// # Panics
    /// Panics if `name` is not one of the variables this ring was built with.
    #[must_use]
    pub fn var(&self, name: &str) -> Polynomial {
        let index = *self
            .var_index
            .get(name)
            .unwrap_or_else(|| panic!("{name} is not a variable of this ring"));
        Polynomial {
            monomials: vec![Monomial::singleton(self.nb_vars, index)],
        }
    }

    /// XOR of two polynomials: the symmetric difference of their monomial sets.
    #[must_use]
    pub fn add(&self, p: &Polynomial, q: &Polynomial) -> Polynomial {
        Polynomial::from_monomials(xor_fold(p.monomials.iter().chain(q.monomials.iter())))
    }

    /// AND of two polynomials: distributes over the XOR sums, unioning the variable sets of
    /// each pair of monomials (a variable appearing in both factors collapses once, per
    /// `x^2 = x`), then cancels any resulting monomial with even multiplicity.
    #[must_use]
    pub fn mul(&self, p: &Polynomial, q: &Polynomial) -> Polynomial {
        let mut products = Vec::with_capacity(p.monomials.len() * q.monomials.len());
        for a in &p.monomials {
            for b in &q.monomials {
                products.push(a.union(b));
            }
        }
        Polynomial::from_monomials(xor_fold(products.iter()))
    }

    /// Structural (ring) equality: identical canonical monomial sets.
    #[must_use]
    pub fn equal(&self, p: &Polynomial, q: &Polynomial) -> bool {
        p == q
    }
}

/// Folds an iterator of monomials under XOR: a monomial appearing an even number of times
/// cancels, odd survives once. This is the shared core of both `add` (monomials already
/// distinct within each operand, so only cross-operand collisions matter) and `mul`
/// (arbitrary multiplicities from the distributed product).
fn xor_fold<'a, I: Iterator<Item = &'a Monomial>>(items: I) -> Vec<Monomial> {
    let mut counts: HashMap<&Monomial, usize> = HashMap::new();
    for m in items {
        *counts.entry(m).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| count % 2 == 1)
        .map(|(m, _)| m.clone())
        .collect()
}
