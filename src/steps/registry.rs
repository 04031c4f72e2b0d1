use crate::steps::error::{RegistryError, StepError};
use crate::steps::pattern::{StepArgs, StepPattern};

/// Handler invoked for a matched step.
pub type StepHandler<W> = Box<dyn Fn(&mut W, &StepArgs) -> Result<(), StepError> + Send + Sync>;

/// Hook run around every scenario.
pub type ScenarioHook<W> = Box<dyn Fn(&mut W) -> Result<(), StepError> + Send + Sync>;

/// A pattern bound to its handler. Immutable once registered.
pub struct StepBinding<W> {
    pattern: StepPattern,
    handler: StepHandler<W>,
}

impl<W> StepBinding<W> {
    pub fn pattern(&self) -> &StepPattern {
        &self.pattern
    }

    pub fn invoke(&self, world: &mut W, args: &StepArgs) -> Result<(), StepError> {
        (self.handler)(world, args)
    }
}

/// A binding selected for a phrase, with its converted arguments.
pub struct StepMatch<'a, W> {
    pub binding: &'a StepBinding<W>,
    pub args: StepArgs,
}

// ============================================================================
// Registry
// ============================================================================

/// Ordered registry of step bindings for world type `W`.
///
/// Registration rejects patterns with the same shape as an existing one, so
/// every ambiguity is a startup error. At match time the binding with the
/// most literal text wins, and ties go to the one registered first.
pub struct StepRegistry<W> {
    bindings: Vec<StepBinding<W>>,
    before: Vec<ScenarioHook<W>>,
    after: Vec<ScenarioHook<W>>,
}

impl<W> Default for StepRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> StepRegistry<W> {
    pub fn new() -> Self {
        StepRegistry {
            bindings: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Bind `pattern` to `handler`.
    pub fn register<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RegistryError>
    where
        F: Fn(&mut W, &StepArgs) -> Result<(), StepError> + Send + Sync + 'static,
    {
        let pattern = StepPattern::parse(pattern)?;

        if let Some(existing) = self.bindings.iter().find(|b| b.pattern.shape() == pattern.shape()) {
            return Err(RegistryError::DuplicatePattern {
                pattern: pattern.as_str().to_string(),
                existing: existing.pattern.as_str().to_string(),
            });
        }

        tracing::trace!(pattern = %pattern, "registered step");
        self.bindings.push(StepBinding {
            pattern,
            handler: Box::new(handler),
        });
        Ok(self)
    }

    pub fn before_scenario<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut W) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.before.push(Box::new(hook));
        self
    }

    pub fn after_scenario<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut W) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.after.push(Box::new(hook));
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &StepPattern> {
        self.bindings.iter().map(|b| &b.pattern)
    }

    /// Most specific binding whose shape fits `phrase`, with raw captures.
    pub fn find(&self, phrase: &str) -> Option<(&StepBinding<W>, Vec<String>)> {
        let mut best: Option<(&StepBinding<W>, Vec<String>)> = None;
        for binding in &self.bindings {
            let Some(raw) = binding.pattern.captures(phrase) else {
                continue;
            };
            let better = match &best {
                Some((current, _)) => binding.pattern.literal_len() > current.pattern.literal_len(),
                None => true,
            };
            if better {
                best = Some((binding, raw));
            }
        }
        best
    }

    /// Select the binding for `phrase` and convert its arguments.
    pub fn resolve(&self, phrase: &str) -> Result<StepMatch<'_, W>, StepError> {
        let (binding, raw) = self.find(phrase).ok_or_else(|| StepError::Undefined {
            phrase: phrase.to_string(),
        })?;
        let args = binding.pattern.convert(&raw)?;
        Ok(StepMatch { binding, args })
    }

    pub fn run_before(&self, world: &mut W) -> Result<(), StepError> {
        self.before.iter().try_for_each(|hook| hook(world))
    }

    pub fn run_after(&self, world: &mut W) -> Result<(), StepError> {
        self.after.iter().try_for_each(|hook| hook(world))
    }
}
