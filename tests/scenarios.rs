//! End-to-end coverage of the concrete scenarios used to validate the analyzer.

use maskfault::enumerate::{run, Property, Report};
use maskfault::evaluate::{evaluate, FaultSet};
use maskfault::oracle::is_correctable;
use maskfault::report::{crp_mu, crpc_mu, render_crp, render_crpc};
use maskfault::Circuit;

fn crp(circuit: &Circuit, k: usize, set: bool) -> maskfault::enumerate::CrpReport {
    let ring = circuit.build_ring();
    match run(circuit, &ring, k, set, Property::Crp) {
        Report::Crp(r) => r,
        Report::Crpc(_) => unreachable!(),
    }
}

fn crpc(circuit: &Circuit, k: usize, set: bool) -> maskfault::enumerate::CrpcReport {
    let ring = circuit.build_ring();
    match run(circuit, &ring, k, set, Property::Crpc) {
        Report::Crpc(r) => r,
        Report::Crp(_) => unreachable!(),
    }
}

#[test]
fn s1_smoke_circuit() {
    let circuit = Circuit::parse(
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

    let report = crp(&circuit, 1, true);
    assert_eq!(report.length, 2);
    let mut names: Vec<String> = report.scenarios.iter().flatten().cloned().collect();
    names.sort();
    assert_eq!(names, vec!["a0_0".to_string(), "o0_0".to_string()]);

    let rendered = render_crp(&report);
    assert_eq!(rendered.lines().next().unwrap(), "2");
}

fn triplicated_identity() -> Circuit {
    Circuit::parse(
        "\
SHARES 1
DUPLICATIONS 3
IN a
RANDOMS
OUT o
o0_0 = a0_0
o0_1 = a0_1
o0_2 = a0_2
",
    )
    .unwrap()
}

#[test]
fn s2_single_faults_are_correctable() {
    let circuit = triplicated_identity();
    let report = crp(&circuit, 1, true);
    assert!(report.scenarios.is_empty());
    assert_eq!(crp_mu(&report, 0.01), 0.0);
}

#[test]
fn s3_pairs_corrupting_two_duplicates_are_uncorrectable() {
    let circuit = triplicated_identity();
    let report = crp(&circuit, 2, true);

    // The only faultable wires here are the three output duplicates (no internal eqs,
    // no randoms, and input duplicates are not members of the CRP fault universe per
    // §4.5 -- their corruption is covered by CRPC prefixes instead, see S6).
    assert_eq!(report.length, 3);
    let output_pairs = report
        .scenarios
        .iter()
        .filter(|s| s.len() == 2 && s.iter().all(|w| w.starts_with("o0_")))
        .count();
    assert_eq!(output_pairs, 3);
    assert_eq!(report.scenarios.len(), 3);
}

#[test]
fn s4_masking_cancels_and_random_fault_is_correctable() {
    let circuit = Circuit::parse(
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
    let ring = circuit.build_ring();

    let baseline = evaluate(&circuit, &ring, &FaultSet::empty(), true);
    assert!(ring.equal(&baseline.outputs["o0_0"], &ring.var("a0")));

    let faults = FaultSet::new(["r"]);
    let recomputed_baseline = evaluate(&circuit, &ring, &faults, true);
    let faulted = evaluate(&circuit, &ring, &faults, true);
    assert!(is_correctable(
        &ring,
        &circuit,
        &faulted.outputs,
        &recomputed_baseline.outputs
    ));
}

#[test]
fn s5_neg_parses_and_evaluates_as_one_plus_source() {
    let circuit = Circuit::parse(
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
    let ring = circuit.build_ring();
    let result = evaluate(&circuit, &ring, &FaultSet::empty(), true);
    let expected = ring.add(&ring.one(), &ring.var("a0"));
    assert!(ring.equal(&result.outputs["o0_0"], &expected));
}

#[test]
fn s6_crpc_prefix_enumeration_over_triplicated_input() {
    let circuit = triplicated_identity();
    let report = crpc(&circuit, 0, true);

    assert_eq!(report.prefixes.len(), 3);
    for prefix in &report.prefixes {
        assert_eq!(prefix.len(), 1);
        assert!(prefix[0].starts_with("a0_"));
    }
    assert!(report.scenarios_by_prefix.iter().all(Vec::is_empty));
    assert_eq!(crpc_mu(&report, 0.01), 0.0);

    let rendered = render_crpc(&report);
    assert_eq!(rendered.lines().next().unwrap(), "3");
}
