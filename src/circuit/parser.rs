//! Parser for the circuit description format (§6.1).
//!
//! Line-oriented ASCII. An optional leading `ORDER` line is skipped. The next five lines
//! are the header (`SHARES`, `DUPLICATIONS`, `IN`, `RANDOMS`, `OUT`); only the first token
//! of each is a keyword marker, the rest are whitespace-separated names. Equation lines
//! follow, one of `dst = src`, `dst = ~src` or `dst = a <op> b`.

use hashbrown::{HashMap, HashSet};
use snafu::{ensure, OptionExt};

use super::{BinOp, Circuit, Equation, Form};
use crate::error::{
    DuplicateDefinitionSnafu, InvalidHeaderValueSnafu, MalformedEquationSnafu,
    MissingOutputEquationsSnafu, TruncatedHeaderSnafu, UndefinedWireSnafu, UnknownOperatorSnafu,
    WrongOutputCountSnafu,
};
use crate::error::CircuitParseError;

const HEADER_LINES: usize = 5;

pub(super) fn parse(text: &str) -> Result<Circuit, CircuitParseError> {
    let mut lines: Vec<&str> = text.lines().collect();

    if lines.first().is_some_and(|l| l.starts_with("ORDER")) {
        lines.remove(0);
    }

    ensure!(
        lines.len() >= HEADER_LINES,
        TruncatedHeaderSnafu {
            expected: HEADER_LINES,
            found: lines.len(),
        }
    );

    let nb_shares = parse_header_usize(lines[0], 1, "SHARES")?;
    let nb_duplications = parse_header_usize(lines[1], 2, "DUPLICATIONS")?;
    let input_names = header_names(lines[2]);
    let randoms: Vec<String> = header_names(lines[3]).into_iter().map(str::to_string).collect();
    let output_names = header_names(lines[4]);

    ensure!(
        output_names.len() == 1,
        WrongOutputCountSnafu {
            found: output_names.len(),
        }
    );
    let output_name = output_names[0];

    let mut inputs = Vec::with_capacity(input_names.len() * nb_shares);
    let mut input_name_from_duplicate = HashMap::new();
    for base in &input_names {
        for i in 0..nb_shares {
            let share_name = format!("{base}{i}");
            inputs.push(share_name.clone());
            for j in 0..nb_duplications {
                input_name_from_duplicate.insert(format!("{share_name}_{j}"), share_name.clone());
            }
        }
    }

    let mut defined: HashSet<String> = inputs.iter().cloned().collect();
    defined.extend(input_name_from_duplicate.keys().cloned());
    defined.extend(randoms.iter().cloned());
    defined.insert("0".to_string());
    defined.insert("1".to_string());

    // Computed up front so the duplicate-`dst` check below can tell a genuinely malformed
    // redefinition apart from the legitimate repeated-output case that last-definition-wins
    // (§3, §4.2) is meant to resolve via the reverse walk further down.
    let mut expected_outputs: HashSet<String> = HashSet::new();
    let mut output_idx_from_duplicate = HashMap::new();
    for i in 0..nb_shares {
        for j in 0..nb_duplications {
            let name = format!("{output_name}{i}_{j}");
            expected_outputs.insert(name.clone());
            output_idx_from_duplicate.insert(name, i);
        }
    }

    let mut eqs = Vec::new();
    for (offset, raw_line) in lines[HEADER_LINES..].iter().enumerate() {
        let line_no = HEADER_LINES + offset + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        tokens.retain(|t| *t != "![" && *t != "]");
        if let Some(last) = tokens.last() {
            if last.starts_with('#') {
                tokens.pop();
            }
        }
        if tokens.is_empty() {
            continue;
        }

        let eq = parse_equation(line_no, &tokens)?;
        ensure!(
            !defined.contains(&eq.dst) || expected_outputs.contains(&eq.dst),
            DuplicateDefinitionSnafu {
                line: line_no,
                wire: eq.dst.clone(),
            }
        );
        for rhs in referenced_wires(&eq.form) {
            ensure!(
                defined.contains(rhs),
                UndefinedWireSnafu {
                    line: line_no,
                    wire: rhs.to_string(),
                }
            );
        }
        defined.insert(eq.dst.clone());
        eqs.push(eq);
    }

    // Last-definition-wins (§3, §4.2): walk in reverse, peel off the first occurrence of
    // each expected output name (which, walking backwards, is the *last* one in the file).
    let mut remaining = expected_outputs.clone();
    let mut output_positions = Vec::new();
    for (idx, eq) in eqs.iter().enumerate().rev() {
        if remaining.remove(&eq.dst) {
            output_positions.push(idx);
        }
    }
    output_positions.sort_unstable();

    let mut eqs_outputs = Vec::with_capacity(output_positions.len());
    for &idx in output_positions.iter().rev() {
        eqs_outputs.push(eqs.remove(idx));
    }
    eqs_outputs.reverse();

    ensure!(
        eqs_outputs.len() == nb_shares * nb_duplications,
        MissingOutputEquationsSnafu {
            expected: nb_shares * nb_duplications,
            found: eqs_outputs.len(),
        }
    );

    log::info!(
        "parsed circuit: shares={nb_shares} duplications={nb_duplications} inputs={} randoms={} internal_eqs={} output_eqs={}",
        input_names.len(),
        randoms.len(),
        eqs.len(),
        eqs_outputs.len(),
    );

    Ok(Circuit {
        nb_shares,
        nb_duplications,
        inputs,
        input_name_from_duplicate,
        randoms,
        eqs,
        eqs_outputs,
        output_idx_from_duplicate,
    })
}

fn header_names(line: &str) -> Vec<&str> {
    line.split_whitespace().skip(1).collect()
}

fn parse_header_usize(line: &str, line_no: usize, field: &'static str) -> Result<usize, CircuitParseError> {
    let value = line
        .split_whitespace()
        .nth(1)
        .with_context(|| InvalidHeaderValueSnafu {
            line: line_no,
            field,
            value: line.to_string(),
        })?;
    value
        .parse::<usize>()
        .ok()
        .with_context(|| InvalidHeaderValueSnafu {
            line: line_no,
            field,
            value: value.to_string(),
        })
}

fn parse_equation(line_no: usize, tokens: &[&str]) -> Result<Equation, CircuitParseError> {
    ensure!(
        tokens.len() >= 3 && tokens[1] == "=",
        MalformedEquationSnafu {
            line: line_no,
            text: tokens.join(" "),
        }
    );
    let dst = tokens[0].to_string();

    let form = match tokens.len() {
        3 => {
            let rhs = tokens[2];
            if let Some(src) = rhs.strip_prefix('~') {
                Form::Neg(src.to_string())
            } else {
                Form::Copy(rhs.to_string())
            }
        }
        5 => {
            let op = match tokens[3] {
                "+" => BinOp::Add,
                "*" => BinOp::Mul,
                other => {
                    return UnknownOperatorSnafu {
                        line: line_no,
                        op: other.to_string(),
                    }
                    .fail()
                }
            };
            Form::BinOp(op, tokens[2].to_string(), tokens[4].to_string())
        }
        _ => {
            return MalformedEquationSnafu {
                line: line_no,
                text: tokens.join(" "),
            }
            .fail()
        }
    };

    Ok(Equation { dst, form })
}

fn referenced_wires(form: &Form) -> Vec<&str> {
    match form {
        Form::Copy(src) | Form::Neg(src) => vec![src.as_str()],
        Form::BinOp(_, a, b) => vec![a.as_str(), b.as_str()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::tests::S1;
    use crate::circuit::Circuit;

    #[test]
    fn rejects_wire_used_before_definition() {
        let bad = "\
SHARES 1
DUPLICATIONS 1
IN a
RANDOMS
OUT o
o0_0 = nope
";
        let err = Circuit::parse(bad).unwrap_err();
        assert!(matches!(err, CircuitParseError::UndefinedWire { .. }));
    }

    #[test]
    fn neg_parses_to_add_with_one() {
        let text = "\
SHARES 1
DUPLICATIONS 1
IN a
RANDOMS
OUT o
t = ~a0_0
o0_0 = t
";
        let c = Circuit::parse(text).unwrap();
        assert_eq!(c.eqs[0].form, Form::Neg("a0_0".to_string()));
    }

    #[test]
    fn smoke_circuit_round_trips() {
        let c = Circuit::parse(S1).unwrap();
        assert_eq!(c.eqs_outputs.len(), 1);
    }

    #[test]
    fn repeated_output_definition_keeps_the_last_one() {
        let text = "\
SHARES 1
DUPLICATIONS 2
IN a
RANDOMS
OUT o
o0_0 = a0_0
o0_0 = a0_1
o0_1 = a0_1
";
        let c = Circuit::parse(text).unwrap();
        assert_eq!(c.eqs_outputs.len(), 2);
        let o0_0 = c.eqs_outputs.iter().find(|e| e.dst == "o0_0").unwrap();
        assert_eq!(o0_0.form, Form::Copy("a0_1".to_string()));
        assert!(c.eqs.is_empty());
    }

    #[test]
    fn repeated_internal_definition_is_still_rejected() {
        let bad = "\
SHARES 1
DUPLICATIONS 1
IN a
RANDOMS
OUT o
t = a0_0
t = a0_0
o0_0 = t
";
        let err = Circuit::parse(bad).unwrap_err();
        assert!(matches!(err, CircuitParseError::DuplicateDefinition { .. }));
    }
}
