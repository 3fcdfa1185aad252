//! Clone driver
//!
//! Cloning runs in two phases per object. `resolve` answers "what is the
//! clone of this value" immediately: primitives and opaque values are
//! themselves, objects already seen return their registered clone, and new
//! objects get an empty shell that is registered *before* any of their
//! contents are visited. Filling shells is deferred to a worklist, so a
//! cycle resolves to its own shell and an arbitrarily deep graph never
//! grows the call stack.

use crate::cloners::{Shell, cloner_for};
use crate::config::CloneOptions;
use crate::diagnostics::CloneDiagnostic;
use crate::kind::{Kind, classify_object};
use crate::registry::IdentityRegistry;
use replica_value::{ObjectRef, Value};

/// Result of a clone call: the clone plus everything that was worked around
#[derive(Debug, Clone)]
pub struct CloneOutcome {
    /// The cloned value
    pub value: Value,
    /// Non-fatal problems, in the order they were met
    pub diagnostics: Vec<CloneDiagnostic>,
}

impl CloneOutcome {
    /// Whether the clone is complete with no fallback or skipped field
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// A shell registered but not yet populated
struct Populate {
    kind: Kind,
    source: ObjectRef,
    shell: ObjectRef,
}

/// Clone state for one logical clone call.
///
/// Values cloned through the same `DeepCloner` share one identity registry,
/// so an object reachable from several roots is copied once.
///
/// ```
/// use replica_clone::{CloneOptions, DeepCloner};
/// use replica_value::{ObjectRef, Value};
///
/// let shared = Value::object(ObjectRef::ordinary());
/// let options = CloneOptions::default();
/// let mut cloner = DeepCloner::new(&options);
/// let a = cloner.clone_value(&shared);
/// let b = cloner.clone_value(&shared);
/// assert_eq!(a, b);
/// assert_ne!(a, shared);
/// ```
pub struct DeepCloner<'o> {
    options: &'o CloneOptions,
    registry: IdentityRegistry,
    pending: Vec<Populate>,
    diagnostics: Vec<CloneDiagnostic>,
}

impl<'o> DeepCloner<'o> {
    /// Start a clone call with `options`
    pub fn new(options: &'o CloneOptions) -> Self {
        Self {
            options,
            registry: IdentityRegistry::new(),
            pending: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Options in effect
    pub fn options(&self) -> &CloneOptions {
        self.options
    }

    /// Clone `value` completely, sharing identity with earlier calls on this
    /// cloner.
    pub fn clone_value(&mut self, value: &Value) -> Value {
        let cloned = self.resolve(value);
        self.drain();
        cloned
    }

    /// Clone `value` and finish the call
    pub fn run(mut self, value: &Value) -> CloneOutcome {
        let _span = tracing::debug_span!("deep_clone").entered();
        let value = self.clone_value(value);
        tracing::debug!(
            objects = self.registry.len(),
            diagnostics = self.diagnostics.len(),
            "clone finished"
        );
        self.finish(value)
    }

    /// Package `value` with the diagnostics collected so far
    pub fn finish(self, value: Value) -> CloneOutcome {
        CloneOutcome {
            value,
            diagnostics: self.diagnostics,
        }
    }

    /// Number of distinct objects copied so far
    pub fn copied_objects(&self) -> usize {
        self.registry.len()
    }

    /// Diagnostics collected so far
    pub fn diagnostics(&self) -> &[CloneDiagnostic] {
        &self.diagnostics
    }

    /// The clone of `value`, possibly a shell still waiting to be populated
    pub(crate) fn resolve(&mut self, value: &Value) -> Value {
        match value {
            Value::Object(obj) => Value::Object(self.resolve_object(obj)),
            _ => value.clone(),
        }
    }

    pub(crate) fn resolve_object(&mut self, source: &ObjectRef) -> ObjectRef {
        if let Some(existing) = self.registry.get(source) {
            tracing::trace!(source = source.as_ptr(), "already cloned");
            return existing;
        }

        let kind = classify_object(source);
        let Some(cloner) = cloner_for(kind) else {
            tracing::trace!(kind = %kind, "passing through");
            return source.clone();
        };

        let shell = match cloner.make_shell(source, self) {
            Shell::Typed(shell) => shell,
            Shell::Degraded {
                shell,
                type_name,
                reason,
            } => {
                self.report(CloneDiagnostic::ConstructionFailed {
                    type_name,
                    fallback: self.options.fallback,
                    reason,
                });
                shell
            }
        };

        // A view's make_shell may have registered its buffer; the view itself
        // is registered here, before anything inside it is visited.
        self.registry.put(source, shell.clone());
        self.pending.push(Populate {
            kind,
            source: source.clone(),
            shell: shell.clone(),
        });
        shell
    }

    fn drain(&mut self) {
        while let Some(task) = self.pending.pop() {
            if let Some(cloner) = cloner_for(task.kind) {
                cloner.populate(&task.shell, &task.source, self);
            }
        }
    }

    pub(crate) fn report(&mut self, diagnostic: CloneDiagnostic) {
        if self.options.log_diagnostics {
            diagnostic.log();
        }
        self.diagnostics.push(diagnostic);
    }
}
