//! Propositional formulas over named feature variables
//!
//! Provides [`Formula`], the immutable boolean expression attached to
//! conditional annotations and produced by presence condition computation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Propositional formula
///
/// Formulas are plain values. Operations never mutate their input; every
/// transformation returns a new formula.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Formula {
    /// Constant true
    True,
    /// Constant false
    False,
    /// Named boolean variable (a feature)
    Var(String),
    /// Negation
    Not(Box<Formula>),
    /// Conjunction (empty conjunction is true)
    And(Vec<Formula>),
    /// Disjunction (empty disjunction is false)
    Or(Vec<Formula>),
}

impl Formula {
    /// Variable with the given name
    #[inline]
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// Conjunction of the given operands
    ///
    /// Collapses to `True` for no operands and to the operand itself for one.
    #[must_use]
    pub fn and(operands: impl IntoIterator<Item = Formula>) -> Self {
        let mut operands: Vec<Formula> = operands.into_iter().collect();
        match operands.len() {
            0 => Self::True,
            1 => operands.swap_remove(0),
            _ => Self::And(operands),
        }
    }

    /// Disjunction of the given operands
    ///
    /// Collapses to `False` for no operands and to the operand itself for one.
    #[must_use]
    pub fn or(operands: impl IntoIterator<Item = Formula>) -> Self {
        let mut operands: Vec<Formula> = operands.into_iter().collect();
        match operands.len() {
            0 => Self::False,
            1 => operands.swap_remove(0),
            _ => Self::Or(operands),
        }
    }

    /// Negation with constant folding and double negation elimination
    #[must_use]
    pub fn negate(&self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Not(inner) => (**inner).clone(),
            other => Self::Not(Box::new(other.clone())),
        }
    }

    /// Material implication `self ⇒ other`
    #[inline]
    #[must_use]
    pub fn implies(&self, other: &Formula) -> Self {
        Self::or([self.negate(), other.clone()])
    }

    /// Check if this is a constant
    #[inline]
    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::True | Self::False)
    }

    /// Check if this is a (possibly negated) variable
    #[inline]
    #[must_use]
    pub fn is_literal(&self) -> bool {
        match self {
            Self::Var(_) => true,
            Self::Not(inner) => matches!(**inner, Self::Var(_)),
            _ => false,
        }
    }

    /// All variable names occurring in this formula, sorted
    #[must_use]
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut vars = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(f) = stack.pop() {
            match f {
                Self::True | Self::False => {}
                Self::Var(name) => {
                    vars.insert(name.as_str());
                }
                Self::Not(inner) => stack.push(inner),
                Self::And(ops) | Self::Or(ops) => stack.extend(ops.iter()),
            }
        }
        vars
    }

    /// Check if the variable occurs anywhere in this formula
    #[must_use]
    pub fn contains_variable(&self, name: &str) -> bool {
        match self {
            Self::True | Self::False => false,
            Self::Var(v) => v == name,
            Self::Not(inner) => inner.contains_variable(name),
            Self::And(ops) | Self::Or(ops) => ops.iter().any(|op| op.contains_variable(name)),
        }
    }

    /// Number of variable occurrences
    #[must_use]
    pub fn literal_count(&self) -> usize {
        match self {
            Self::True | Self::False => 0,
            Self::Var(_) => 1,
            Self::Not(inner) => inner.literal_count(),
            Self::And(ops) | Self::Or(ops) => ops.iter().map(Self::literal_count).sum(),
        }
    }

    /// Remove constants from the formula
    ///
    /// The result is either `True`, `False`, or a formula without any
    /// constant sub-formula.
    #[must_use]
    pub fn eliminate_true_false(&self) -> Self {
        match self {
            Self::True | Self::False | Self::Var(_) => self.clone(),
            Self::Not(inner) => inner.eliminate_true_false().negate(),
            Self::And(ops) => {
                let mut kept = Vec::with_capacity(ops.len());
                for op in ops {
                    match op.eliminate_true_false() {
                        Self::True => {}
                        Self::False => return Self::False,
                        other => kept.push(other),
                    }
                }
                Self::and(kept)
            }
            Self::Or(ops) => {
                let mut kept = Vec::with_capacity(ops.len());
                for op in ops {
                    match op.eliminate_true_false() {
                        Self::False => {}
                        Self::True => return Self::True,
                        other => kept.push(other),
                    }
                }
                Self::or(kept)
            }
        }
    }

    /// Evaluate under an assignment of variables
    pub fn evaluate<F>(&self, assignment: &F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        match self {
            Self::True => true,
            Self::False => false,
            Self::Var(name) => assignment(name),
            Self::Not(inner) => !inner.evaluate(assignment),
            Self::And(ops) => ops.iter().all(|op| op.evaluate(assignment)),
            Self::Or(ops) => ops.iter().any(|op| op.evaluate(assignment)),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Or(ops) if ops.len() > 1 => 1,
            Self::And(ops) if ops.len() > 1 => 2,
            _ => 3,
        }
    }

    fn fmt_operand(&self, f: &mut Formatter<'_>, parent: u8) -> fmt::Result {
        if self.precedence() <= parent {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Var(name) => write!(f, "{name}"),
            Self::Not(inner) => {
                write!(f, "¬")?;
                inner.fmt_operand(f, 2)
            }
            Self::And(ops) | Self::Or(ops) if ops.is_empty() => {
                write!(f, "{}", if matches!(self, Self::And(_)) { "true" } else { "false" })
            }
            Self::And(ops) | Self::Or(ops) => {
                let (symbol, own) = if matches!(self, Self::And(_)) {
                    (" ∧ ", 2)
                } else {
                    (" ∨ ", 1)
                };
                for (i, op) in ops.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{symbol}")?;
                    }
                    op.fmt_operand(f, own)?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Formula {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}
