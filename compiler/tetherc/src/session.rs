//! One build: feed in, resolver out.
//!
//! A [`Session`] owns the options and the diagnostic queue for a single
//! invocation. Every phase pushes into the queue and keeps going where it
//! can; the session aborts only between phases, once the queue holds an
//! error. Nothing is written (artifact or cache) after an abort.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tether_codegen::{emit_rust, EmitOptions, ResolverPlan};
use tether_diagnostic::queue::DiagnosticQueue;
use tether_diagnostic::{Diagnostic, ErrorCode, ErrorGuaranteed};
use tether_graph::{validate_unit, ConstructorVerifier, ResolutionMap};
use tether_incremental::{FileBlob, IncrementalLog};
use tether_ir::UnitFacts;
use tracing::{debug, info, warn};

use crate::facts::FactFeed;
use crate::options::BuildOptions;

/// What a successful build produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOutcome {
    pub artifact: PathBuf,
    /// `false` when the artifact was already up to date.
    pub written: bool,
    pub resolutions: usize,
    /// Units that were new or changed relative to the cache.
    pub dirty_units: Vec<String>,
}

pub struct Session {
    options: BuildOptions,
    queue: DiagnosticQueue,
}

impl Session {
    pub fn new(options: BuildOptions) -> Self {
        let queue = DiagnosticQueue::with_config(options.diagnostic_config());
        Session { options, queue }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn queue(&self) -> &DiagnosticQueue {
        &self.queue
    }

    /// Take every diagnostic reported so far, sorted.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.queue.flush()
    }

    /// Run the whole pipeline.
    #[tracing::instrument(level = "debug", skip_all, fields(input = %self.options.input.display()))]
    pub fn run(&mut self) -> Result<BuildOutcome, ErrorGuaranteed> {
        let mut store = self.options.cache_path().map(FileBlob::new);
        let mut log = match &store {
            Some(store) => IncrementalLog::load(store, &mut self.queue),
            None => IncrementalLog::new(),
        };

        let units = self.load_units()?;
        self.collect(&mut log, units);

        let graph = log.generate_graph();
        let finalized = graph.finalize_partial(&mut self.queue);
        let map = &finalized.map;
        let mut verifier = ConstructorVerifier::new(&graph, map);
        verifier.add_constructors(log.constructors().cloned());
        verifier.add_rejected(&finalized.rejected);
        // Verify even after a resolution error so one run reports both.
        let verified = verifier.verify(&mut self.queue);
        if let Some(guarantee) = finalized.failed {
            return Err(guarantee);
        }
        verified?;

        let plan = ResolverPlan::build(map, &verifier);
        let source = emit_rust(
            &plan,
            &EmitOptions {
                crate_root: self.options.crate_root.clone(),
            },
        );

        let artifact = self.options.output_path();
        let fingerprint = map.content_hash();
        let written = if is_up_to_date(&log, fingerprint, &artifact, &source) {
            debug!(artifact = %artifact.display(), "artifact unchanged, skipping write");
            false
        } else {
            if let Err(err) = write_artifact(&artifact, &source) {
                return Err(self.queue.emit_error(
                    Diagnostic::error(ErrorCode::E9001)
                        .with_message(format!("cannot write `{}`", artifact.display()))
                        .with_unit_label(artifact.display().to_string(), err.to_string()),
                ));
            }
            info!(artifact = %artifact.display(), bytes = source.len(), "wrote resolver");
            true
        };

        log.set_fingerprint(fingerprint);
        if let Some(store) = store.as_mut() {
            if let Err(err) = log.save(store) {
                warn!(error = %err, "cache not saved");
                self.queue.add(
                    Diagnostic::warning(ErrorCode::W3001)
                        .with_message("incremental cache could not be saved")
                        .with_unit_label(
                            store.path().display().to_string(),
                            err.to_string(),
                        )
                        .with_note("the next build starts from scratch"),
                );
            }
        }

        Ok(BuildOutcome {
            artifact,
            written,
            resolutions: map.len(),
            dirty_units: log.dirty_units().map(str::to_string).collect(),
        })
    }

    /// Resolve the feed without the cache and without emitting anything.
    ///
    /// Constructors are not verified: the map is what the graph yields even
    /// if some concretes could never be built.
    #[tracing::instrument(level = "debug", skip_all, fields(input = %self.options.input.display()))]
    pub fn resolve(&mut self) -> Result<ResolutionMap, ErrorGuaranteed> {
        let mut log = IncrementalLog::new();
        let units = self.load_units()?;
        self.collect(&mut log, units);
        log.generate_graph().finalize(&mut self.queue)
    }

    /// Read, convert and validate every unit of the feed.
    ///
    /// Fails if any unit has an error; all units are still checked first.
    fn load_units(&mut self) -> Result<Vec<UnitFacts>, ErrorGuaranteed> {
        let input = self.options.input.display().to_string();
        let text = fs::read_to_string(&self.options.input).map_err(|err| {
            self.queue.emit_error(
                Diagnostic::error(ErrorCode::E0005)
                    .with_message(format!("cannot read fact feed `{input}`"))
                    .with_unit_label(input.as_str(), err.to_string()),
            )
        })?;
        let feed = FactFeed::from_json(&text).map_err(|err| {
            self.queue.emit_error(
                Diagnostic::error(ErrorCode::E0005)
                    .with_message(format!("malformed fact feed `{input}`"))
                    .with_unit_label(input.as_str(), err.to_string()),
            )
        })?;

        let (units, problems) = feed.into_units();
        self.queue.extend(problems);
        let validation = self.options.validation();
        for unit in &units {
            self.queue.extend(validate_unit(unit, &validation));
        }
        debug!(units = units.len(), "loaded fact feed");

        match self.queue.has_errors() {
            Some(guarantee) => Err(guarantee),
            None => Ok(units),
        }
    }

    fn collect(&mut self, log: &mut IncrementalLog, units: Vec<UnitFacts>) {
        let removed = log.retain_units(units.iter().map(|unit| unit.path.as_str()));
        for path in &removed {
            debug!(unit = %path, "unit removed from project");
        }
        let mut changed = 0usize;
        for unit in units {
            if log.collect(unit) {
                changed += 1;
            }
        }
        debug!(changed, total = log.len(), "collected units");
    }
}

fn is_up_to_date(log: &IncrementalLog, fingerprint: u64, artifact: &Path, source: &str) -> bool {
    log.fingerprint() == Some(fingerprint)
        && fs::read_to_string(artifact).is_ok_and(|existing| existing == source)
}

fn write_artifact(path: &Path, source: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, source)
}
