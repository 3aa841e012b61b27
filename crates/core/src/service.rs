//! Checking passes over the module graph.

use std::collections::BTreeMap;
use std::sync::Arc;

use hilbert_checker::{CheckerStrategy, DefinitionSettings};
use hilbert_primitives::{CheckStatus, Diagnostic, Diagnostics, ModuleId, ModuleLocation, RuleKey, codes};
use hilbert_registry::{ExistenceRegistry, ImportedRegistry, LabelTable};
use hilbert_worker::{CheckToken, TaskClass, join_error_panic_message, spawn_blocking, spawn_named_thread};
use rustc_hash::FxHashMap;

use crate::config::CheckerConfig;
use crate::error::{CheckError, Result};
use crate::graph::{CheckedModule, ModuleHandle, ResolvedImport};
use crate::pass::{ImportView, LabelCollector, NodeChecker};
use crate::traverse::traverse;

/// Location of the `index`-th import declaration of `module`.
pub fn import_location(module: &ModuleId, index: usize) -> ModuleLocation {
	ModuleLocation::module_root(module.clone()).field("imports").index("import", index)
}

/// Runs checking passes with one configuration and checker strategy.
#[derive(Debug, Clone, Default)]
pub struct ModuleService {
	config: CheckerConfig,
	settings: DefinitionSettings,
	strategy: CheckerStrategy,
}

impl ModuleService {
	pub fn new(config: CheckerConfig) -> Self {
		Self::with_strategy(config, CheckerStrategy::default())
	}

	pub fn with_strategy(config: CheckerConfig, strategy: CheckerStrategy) -> Self {
		Self {
			settings: config.definition_settings(),
			config,
			strategy,
		}
	}

	pub fn config(&self) -> &CheckerConfig {
		&self.config
	}

	/// Checks `handle` and its imports, reusing published results.
	pub fn check(&self, handle: &Arc<ModuleHandle>, token: &CheckToken) -> Result<Arc<CheckedModule>> {
		self.run(handle, token, false)
	}

	/// Checks `handle` again even if a result is published.
	///
	/// Imports keep their published results.
	pub fn recheck(&self, handle: &Arc<ModuleHandle>, token: &CheckToken) -> Result<Arc<CheckedModule>> {
		self.run(handle, token, true)
	}

	/// Runs [`check`](Self::check) on a named worker thread.
	pub fn spawn_check(
		self: &Arc<Self>,
		handle: Arc<ModuleHandle>,
		token: CheckToken,
	) -> Result<std::thread::JoinHandle<Result<Arc<CheckedModule>>>> {
		let service = Arc::clone(self);
		let name = format!("check-{}", handle.id());
		Ok(spawn_named_thread(TaskClass::Check, name, move || service.check(&handle, &token))?)
	}

	/// Runs [`check`](Self::check) on the blocking pool of the current tokio runtime.
	pub async fn check_async(self: &Arc<Self>, handle: Arc<ModuleHandle>, token: CheckToken) -> Result<Arc<CheckedModule>> {
		let service = Arc::clone(self);
		let module = handle.id().clone();
		let task = spawn_blocking(TaskClass::CpuBlocking, move || service.check(&handle, &token))?;
		match task.await {
			Ok(result) => result,
			Err(err) => match join_error_panic_message(err) {
				Some(message) => Err(CheckError::Panicked { module, message }),
				None => Err(CheckError::Interrupted { module }),
			},
		}
	}

	fn run(&self, handle: &Arc<ModuleHandle>, token: &CheckToken, force: bool) -> Result<Arc<CheckedModule>> {
		let id = handle.id().clone();
		let span = tracing::info_span!("module_check", module = %id, pass = token.pass());
		let _entered = span.enter();

		let guard = handle
			.lock
			.acquire(token, self.config.lock_poll())
			.map_err(|_| CheckError::Interrupted { module: id.clone() })?;
		if !force && let Some(checked) = handle.checked() {
			tracing::debug!(outcome = ?guard.outcome(), checked_by = checked.pass, "module already checked");
			return Ok(checked);
		}

		let mut diagnostics = Diagnostics::new();
		let mut imports = Vec::with_capacity(handle.imports().len());
		for (index, import) in handle.imports().iter().enumerate() {
			let checked = self.run(&import.handle, token, false)?;
			if !checked.is_well_formed() {
				tracing::warn!(import = %import.handle.id(), label = %import.label, "import failed to check");
				diagnostics.push(
					Diagnostic::error(
						codes::IMPORT_CHECK_FAILED,
						import_location(&id, index),
						format!("imported module {} ({:?}) has errors", import.handle.id(), import.label),
					)
					.with_reference(ModuleLocation::module_root(import.handle.id().clone())),
				);
			}
			imports.push((index, import, checked));
		}
		if diagnostics.has_errors() {
			let checked = failed(&id, token.pass(), diagnostics);
			handle.publish(Arc::clone(&checked));
			return Ok(checked);
		}

		detect_rule_collisions(&id, &imports, &mut diagnostics);

		let module = handle.module();
		let (registry, seeded) = ExistenceRegistry::seed(
			id.clone(),
			imports
				.iter()
				.map(|(index, import, checked)| ImportedRegistry {
					label: Arc::clone(&import.label),
					registry: Arc::clone(&checked.registry),
					location: import_location(&id, *index),
				})
				.collect(),
		);
		diagnostics.extend(seeded);

		let mut collector = LabelCollector::new(
			LabelTable::new(id.clone()),
			imports
				.iter()
				.map(|(index, import, checked)| (Arc::clone(&import.label), Arc::clone(&checked.labels), import_location(&id, *index)))
				.collect(),
		);
		traverse(module, &mut collector, token)?;
		diagnostics.extend(collector.diagnostics);
		let labels = collector.table;

		let views: FxHashMap<Arc<str>, ImportView> = imports
			.iter()
			.map(|(_, import, checked)| {
				(
					Arc::clone(&import.label),
					ImportView {
						module: Arc::clone(import.handle.module()),
						checked: Arc::clone(checked),
					},
				)
			})
			.collect();
		let mut checker = NodeChecker::new(
			module,
			registry,
			&labels,
			&views,
			&self.strategy,
			&self.settings,
			self.config.link_severity,
			diagnostics,
		);
		traverse(module, &mut checker, token)?;
		let NodeChecker {
			registry,
			mut diagnostics,
			statuses,
			..
		} = checker;

		diagnostics.resolve_spans(&module.source_map);
		let well_formed = !diagnostics.has_errors();
		let proved = well_formed && statuses.values().all(|status| status.proved != CheckStatus::Failure);
		tracing::info!(
			errors = diagnostics.errors().len(),
			warnings = diagnostics.warnings().len(),
			well_formed,
			proved,
			"module checked"
		);
		let checked = Arc::new(CheckedModule {
			module: id,
			pass: token.pass(),
			registry: Arc::new(registry),
			labels: Arc::new(labels),
			diagnostics,
			nodes: statuses,
			well_formed: CheckStatus::from_ok(well_formed),
			proved: CheckStatus::from_ok(proved),
		});
		handle.publish(Arc::clone(&checked));
		drop(guard);
		Ok(checked)
	}
}

fn failed(id: &ModuleId, pass: u64, diagnostics: Diagnostics) -> Arc<CheckedModule> {
	Arc::new(CheckedModule {
		module: id.clone(),
		pass,
		registry: Arc::new(ExistenceRegistry::new(id.clone())),
		labels: Arc::new(LabelTable::new(id.clone())),
		diagnostics,
		nodes: BTreeMap::new(),
		well_formed: CheckStatus::Failure,
		proved: CheckStatus::Failure,
	})
}

/// Reports rule keys that two imports see declared by different modules.
fn detect_rule_collisions(id: &ModuleId, imports: &[(usize, &ResolvedImport, Arc<CheckedModule>)], diagnostics: &mut Diagnostics) {
	let mut seen: BTreeMap<RuleKey, (ModuleId, ModuleLocation)> = BTreeMap::new();
	for (index, import, checked) in imports {
		for (key, entry) in checked.registry.rule_keys() {
			match seen.get(&key) {
				Some((owner, first)) if owner != entry.owner() => {
					diagnostics.push(
						Diagnostic::error(
							codes::RULE_DECLARED_IN_DIFFERENT_IMPORTS,
							import_location(id, *index),
							format!(
								"rule {key} is declared by {owner} and by {} through import {:?}",
								entry.owner(),
								import.label
							),
						)
						.with_reference(first.clone()),
					);
				}
				Some(_) => {}
				None => {
					seen.insert(key, (entry.owner().clone(), entry.location.clone()));
				}
			}
		}
	}
}
