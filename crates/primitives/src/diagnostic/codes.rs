//! Diagnostic codes.
//!
//! Ranges: `304xx` element shape, `305xx`-`306xx` formula semantics,
//! `307xx`-`308xx` definitions and rules, `310xx` labels and references,
//! `320xx` module graph, `370xx`-`371xx` formal proofs, `390xx` internal.

pub const LIST_EXPECTED: u32 = 30410;
pub const OPERATOR_EMPTY: u32 = 30420;
pub const UNKNOWN_OPERATOR: u32 = 30430;
pub const ATOM_EXPECTED: u32 = 30440;
pub const SUBJECT_VARIABLE_EXPECTED: u32 = 30450;
pub const FORMULA_EXPECTED: u32 = 30460;
pub const TERM_EXPECTED: u32 = 30470;

pub const WRONG_NUMBER_OF_ARGUMENTS: u32 = 30510;
pub const SUBJECT_VARIABLE_ALREADY_BOUND: u32 = 30550;
pub const FREE_VARIABLE_ALREADY_BOUND: u32 = 30560;
pub const UNKNOWN_PREDICATE_CONSTANT: u32 = 30590;
pub const UNKNOWN_FUNCTION_CONSTANT: u32 = 30620;
pub const UNDEFINED_CLASS_OPERATOR: u32 = 30680;
pub const IDENTITY_OPERATOR_NOT_DEFINED: u32 = 30690;

pub const NUMBER_OF_FREE_SUBJECT_VARIABLES_NOT_EQUAL: u32 = 30770;
pub const FREE_SUBJECT_VARIABLE_MISMATCH: u32 = 30780;
pub const PREDICATE_ALREADY_DEFINED: u32 = 30790;
pub const FUNCTION_ALREADY_DEFINED: u32 = 30800;
pub const ARGUMENT_COUNT_MISMATCH: u32 = 30810;
pub const DUPLICATE_PARAMETER: u32 = 30815;
pub const QUALIFIED_DEFINITION_NAME: u32 = 30820;
/// Warning: a local definition reuses a symbol of a direct import.
pub const SYMBOL_SHADOWS_IMPORT: u32 = 30825;
pub const RULE_ALREADY_DEFINED: u32 = 30830;
pub const CHANGED_RULE_NOT_FOUND: u32 = 30840;
pub const RULE_VERSION_NOT_INCREASED: u32 = 30850;
pub const INVALID_RULE_VERSION: u32 = 30860;
pub const IDENTITY_OPERATOR_ALREADY_EXISTS: u32 = 30870;
pub const CLASS_OPERATOR_ALREADY_EXISTS: u32 = 30880;

pub const LABEL_DEFINED_MORE_THAN_ONCE: u32 = 31000;
pub const REFERENCE_FORMAT: u32 = 31010;
pub const REFERENCE_NOT_FOUND: u32 = 31020;

pub const IMPORT_CHECK_FAILED: u32 = 32000;
pub const RULE_DECLARED_IN_DIFFERENT_IMPORTS: u32 = 32010;

pub const PROOF_RULE_NOT_DECLARED: u32 = 37000;
pub const LINE_LABEL_DEFINED_MORE_THAN_ONCE: u32 = 37005;
pub const LINE_REFERENCE_NOT_FOUND: u32 = 37010;
pub const LINE_REFERENCE_INVALID: u32 = 37015;
pub const ADD_TARGET_NOT_A_FORMULA: u32 = 37020;
pub const PROPOSITION_NOT_PROVED: u32 = 37025;
pub const DERIVED_FORMULA_MISMATCH: u32 = 37030;
pub const MODUS_PONENS_MISMATCH: u32 = 37040;
pub const RENAME_NOT_POSSIBLE: u32 = 37050;
pub const SUBSTITUTION_NOT_POSSIBLE: u32 = 37060;
pub const GENERALIZATION_NOT_POSSIBLE: u32 = 37070;
pub const HYPOTHESIS_RESTRICTION: u32 = 37080;
pub const CONDITIONAL_PROOF_EMPTY: u32 = 37090;
pub const CONDITIONAL_CONCLUSION_MISMATCH: u32 = 37095;
pub const PROOF_EMPTY: u32 = 37100;
pub const PROOF_CONCLUSION_MISMATCH: u32 = 37110;
/// Warning: a proposition has no formal proof.
pub const NO_FORMAL_PROOF: u32 = 37120;

pub const UNEXPECTED_INTERNAL_ERROR: u32 = 39000;
