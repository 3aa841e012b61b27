use std::fmt;
use std::sync::Arc;

use crate::formula::{FormulaChecker, WellFormedChecker};
use crate::proof::{FormalProofChecker, ProofChecker};

/// Checker implementations used by a module pass.
#[derive(Clone)]
pub struct CheckerStrategy {
	pub formula: Arc<dyn FormulaChecker>,
	pub proof: Arc<dyn ProofChecker>,
}

impl CheckerStrategy {
	pub fn new(formula: Arc<dyn FormulaChecker>, proof: Arc<dyn ProofChecker>) -> Self {
		Self { formula, proof }
	}
}

impl Default for CheckerStrategy {
	fn default() -> Self {
		Self::new(Arc::new(WellFormedChecker), Arc::new(FormalProofChecker))
	}
}

impl fmt::Debug for CheckerStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CheckerStrategy").finish_non_exhaustive()
	}
}
