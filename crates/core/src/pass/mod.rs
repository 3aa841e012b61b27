//! The two visitors run over a module in each checking pass.

mod check;
mod labels;

pub(crate) use check::{ImportView, NodeChecker};
pub(crate) use labels::LabelCollector;
