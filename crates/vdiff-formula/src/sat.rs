//! SAT-backed oracle
//!
//! Provides [`SatOracle`], which Tseitin-encodes a formula into clauses and
//! hands them to the `varisat` CDCL solver. Each query uses a fresh solver,
//! so the oracle is stateless and can be shared across threads.

use crate::formula::Formula;
use crate::oracle::{FormulaOracle, OracleError};
use std::collections::HashMap;
use varisat::{ExtendFormula, Lit, Solver};

/// Oracle answering queries with the `varisat` solver
#[derive(Debug, Clone, Copy, Default)]
pub struct SatOracle;

impl SatOracle {
    /// Create new oracle
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FormulaOracle for SatOracle {
    fn is_satisfiable(&self, formula: &Formula) -> Result<bool, OracleError> {
        let simplified = formula.eliminate_true_false();
        match simplified {
            Formula::True => return Ok(true),
            Formula::False => return Ok(false),
            _ => {}
        }

        let mut encoder = TseitinEncoder::new();
        let root = encoder.encode(&simplified);
        encoder.solver.add_clause(&[root]);

        let satisfiable = encoder
            .solver
            .solve()
            .map_err(|e| OracleError::Solver(e.to_string()))?;

        tracing::trace!(
            formula = %simplified,
            variables = encoder.variables.len(),
            satisfiable,
            "sat query"
        );
        Ok(satisfiable)
    }
}

/// Equisatisfiable clause encoding with one gate literal per connective
struct TseitinEncoder<'f> {
    solver: Solver<'static>,
    variables: HashMap<&'f str, Lit>,
    constant: Option<Lit>,
}

impl<'f> TseitinEncoder<'f> {
    fn new() -> Self {
        Self {
            solver: Solver::new(),
            variables: HashMap::new(),
            constant: None,
        }
    }

    /// Literal forced to true by a unit clause
    fn constant_true(&mut self) -> Lit {
        if let Some(lit) = self.constant {
            return lit;
        }
        let lit = self.solver.new_lit();
        self.solver.add_clause(&[lit]);
        self.constant = Some(lit);
        lit
    }

    fn encode(&mut self, formula: &'f Formula) -> Lit {
        match formula {
            Formula::True => self.constant_true(),
            Formula::False => !self.constant_true(),
            Formula::Var(name) => {
                if let Some(&lit) = self.variables.get(name.as_str()) {
                    return lit;
                }
                let lit = self.solver.new_lit();
                self.variables.insert(name.as_str(), lit);
                lit
            }
            Formula::Not(inner) => !self.encode(inner),
            Formula::And(ops) => {
                let inputs: Vec<Lit> = ops.iter().map(|op| self.encode(op)).collect();
                let gate = self.solver.new_lit();
                // gate → every input
                for &input in &inputs {
                    self.solver.add_clause(&[!gate, input]);
                }
                // all inputs → gate
                let mut clause: Vec<Lit> = inputs.iter().map(|&input| !input).collect();
                clause.push(gate);
                self.solver.add_clause(&clause);
                gate
            }
            Formula::Or(ops) => {
                let inputs: Vec<Lit> = ops.iter().map(|op| self.encode(op)).collect();
                let gate = self.solver.new_lit();
                // every input → gate
                for &input in &inputs {
                    self.solver.add_clause(&[gate, !input]);
                }
                // gate → some input
                let mut clause = inputs;
                clause.push(!gate);
                self.solver.add_clause(&clause);
                gate
            }
        }
    }
}
