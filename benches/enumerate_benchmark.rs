use criterion::{criterion_group, criterion_main, Criterion};

use maskfault::enumerate::{run, Property};
use maskfault::Circuit;

const BENCH_CIRCUIT: &str = "\
SHARES 2
DUPLICATIONS 3
IN a b
RANDOMS r0 r1 r2
OUT o
t0 = a0_0 + r0
t1 = t0 + r0
u0 = b0_0 * t1
t2 = a0_1 + r1
t3 = t2 + r1
u1 = b0_1 * t3
t4 = a0_2 + r2
t5 = t4 + r2
u2 = b0_2 * t5
o0_0 = u0
o0_1 = u1
o0_2 = u2
o1_0 = a1_0
o1_1 = a1_1
o1_2 = a1_2
";

fn crp_enumeration(c: &mut Criterion) {
    let circuit = Circuit::parse(BENCH_CIRCUIT).expect("fixture circuit must parse");
    let ring = circuit.build_ring();

    c.bench_function("crp_k2", |b| {
        b.iter(|| run(&circuit, &ring, 2, true, Property::Crp));
    });
}

fn crpc_enumeration(c: &mut Criterion) {
    let circuit = Circuit::parse(BENCH_CIRCUIT).expect("fixture circuit must parse");
    let ring = circuit.build_ring();

    c.bench_function("crpc_k1", |b| {
        b.iter(|| run(&circuit, &ring, 1, true, Property::Crpc));
    });
}

criterion_group!(benches, crp_enumeration, crpc_enumeration);
criterion_main!(benches);
