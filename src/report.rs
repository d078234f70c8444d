//! μ-bound computation and sidecar-file rendering (§4.6, §6.3).

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use snafu::ResultExt;

use crate::enumerate::{CrpReport, CrpcReport, Report};
use crate::error::{ReportError, WriteFailedSnafu};

/// Computes the μ upper bound for a CRP report: Σ over scenarios of `f^|S| (1-f)^(n-|S|)`.
#[must_use]
pub fn crp_mu(report: &CrpReport, fault_rate: f64) -> f64 {
    report
        .scenarios
        .iter()
        .map(|s| scenario_probability(s.len(), report.length, fault_rate))
        .sum()
}

/// Computes the μ upper bound for a CRPC report: the max, over prefixes, of the CRP-style sum
/// of its own internal scenarios.
#[must_use]
pub fn crpc_mu(report: &CrpcReport, fault_rate: f64) -> f64 {
    report
        .scenarios_by_prefix
        .iter()
        .map(|scenarios| {
            scenarios
                .iter()
                .map(|s| scenario_probability(s.len(), report.length, fault_rate))
                .sum()
        })
        .fold(0.0_f64, f64::max)
}

fn scenario_probability(size: usize, length: usize, f: f64) -> f64 {
    f.powi(size as i32) * (1.0 - f).powi((length - size) as i32)
}

/// Renders the CRP sidecar layout (§6.3): scenario count, then one `<size>, w1, ..., wn` line
/// per scenario.
#[must_use]
pub fn render_crp(report: &CrpReport) -> String {
    let mut out = String::new();
    writeln!(out, "{}", report.scenarios.len()).unwrap();
    for scenario in &report.scenarios {
        write_scenario_line(&mut out, scenario);
    }
    out
}

/// Renders the CRPC sidecar layout (§6.3): prefix count, then per prefix its own size line,
/// internal-scenario count, and internal-scenario lines.
#[must_use]
pub fn render_crpc(report: &CrpcReport) -> String {
    let mut out = String::new();
    writeln!(out, "{}", report.prefixes.len()).unwrap();
    for (prefix, scenarios) in report.prefixes.iter().zip(&report.scenarios_by_prefix) {
        write_scenario_line(&mut out, prefix);
        writeln!(out, "{}", scenarios.len()).unwrap();
        for scenario in scenarios {
            write_scenario_line(&mut out, scenario);
        }
    }
    out
}

fn write_scenario_line(out: &mut String, scenario: &[String]) {
    assert!(!scenario.is_empty(), "scenarios are never empty (§9)");
    write!(out, "{}", scenario.len()).unwrap();
    for wire in scenario {
        write!(out, ", {wire}").unwrap();
    }
    writeln!(out).unwrap();
}

/// The sidecar path for `<circuit>_faulty_scenarios_k<k>_f<s>_<property>` (§6.3).
#[must_use]
pub fn sidecar_path(circuit_path: &Path, k: usize, set: bool, property_name: &str) -> PathBuf {
    let stem = circuit_path.to_string_lossy();
    let polarity = if set { 1 } else { 0 };
    PathBuf::from(format!("{stem}_faulty_scenarios_k{k}_f{polarity}_{property_name}"))
}

/// Writes `body` to `path`, wrapping any IO failure in a typed [`ReportError`].
pub fn write_sidecar(path: &Path, body: &str) -> Result<(), ReportError> {
    std::fs::write(path, body).context(WriteFailedSnafu { path: path.to_path_buf() })
}

/// A short, human-readable one-line summary of a report, printed to stdout (§6.3, §4.6).
#[must_use]
pub fn summarize(report: &Report, k: usize, set: bool, property_name: &str, fault_rate: f64) -> String {
    let polarity = if set { "set" } else { "reset" };
    match report {
        Report::Crp(r) => format!(
            "{property_name} k={k} polarity={polarity}: {} uncorrectable scenario(s) out of {} faultable wires, mu={:.6}",
            r.scenarios.len(),
            r.length,
            crp_mu(r, fault_rate),
        ),
        Report::Crpc(r) => format!(
            "{property_name} k={k} polarity={polarity}: {} prefix(es), {} total uncorrectable scenario(s), mu={:.6}",
            r.prefixes.len(),
            r.scenarios_by_prefix.iter().map(Vec::len).sum::<usize>(),
            crpc_mu(r, fault_rate),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;
    use crate::enumerate::{run, Property};

    #[test]
    fn crp_mu_is_zero_with_no_scenarios() {
        let report = CrpReport {
            length: 4,
            scenarios: vec![],
        };
        assert_eq!(crp_mu(&report, 0.01), 0.0);
    }

    #[test]
    fn crp_mu_matches_single_scenario_formula() {
        let report = CrpReport {
            length: 3,
            scenarios: vec![vec!["a".to_string()]],
        };
        let expected = 0.01_f64 * 0.99_f64.powi(2);
        assert!((crp_mu(&report, 0.01) - expected).abs() < 1e-12);
    }

    #[test]
    fn render_crp_matches_layout() {
        let report = CrpReport {
            length: 2,
            scenarios: vec![vec!["a0_0".to_string()], vec!["o0_0".to_string()]],
        };
        let rendered = render_crp(&report);
        assert_eq!(rendered, "2\n1, a0_0\n1, o0_0\n");
    }

    #[test]
    fn render_crpc_matches_layout() {
        let c = Circuit::parse(
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
        .unwrap();
        let ring = c.build_ring();
        let report = match run(&c, &ring, 0, true, Property::Crpc) {
            Report::Crpc(r) => r,
            Report::Crp(_) => unreachable!(),
        };
        let rendered = render_crpc(&report);
        assert!(rendered.starts_with("3\n"));
        assert_eq!(rendered.lines().count(), 1 + 3 * 2);
    }

    #[test]
    fn sidecar_path_matches_naming_scheme() {
        let path = sidecar_path(Path::new("circuits/demo.txt"), 2, true, "CRP");
        assert_eq!(
            path.to_str().unwrap(),
            "circuits/demo.txt_faulty_scenarios_k2_f1_CRP"
        );
    }
}
