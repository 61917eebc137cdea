//! # Module Registry
//!
//! Maps module names to implementations and contains their failures.

use super::{
    BlockersModule, ContentBlock, FocusModule, GitModule, LoopsModule, Module, QueueModule,
    RenderContext, ServicesModule, MODULE_NOT_FOUND,
};
use crate::ui::theme::Tone;
use anyhow::Result;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Body of the block shown while an abandoned render is still running.
pub const STALLED_NOTICE: &str = "previous render still running";

type RenderTask = JoinHandle<Result<ContentBlock>>;

/// What happened when a module was invoked.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleOutcome {
    Rendered(ContentBlock),
    /// No module is registered under the name.
    Missing,
    /// The module returned an error or panicked.
    Failed(String),
    /// The module did not finish within the render budget.
    TimedOut(Duration),
    /// A render that timed out earlier has not returned yet, so no new one
    /// was started.
    Stalled,
}

/// Outcome without its payload, kept next to the resolved block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStatus {
    Rendered,
    Missing,
    Failed,
    TimedOut,
    Stalled,
}

impl ModuleOutcome {
    pub fn status(&self) -> InvocationStatus {
        match self {
            ModuleOutcome::Rendered(_) => InvocationStatus::Rendered,
            ModuleOutcome::Missing => InvocationStatus::Missing,
            ModuleOutcome::Failed(_) => InvocationStatus::Failed,
            ModuleOutcome::TimedOut(_) => InvocationStatus::TimedOut,
            ModuleOutcome::Stalled => InvocationStatus::Stalled,
        }
    }

    /// Resolve the outcome to the block that will be drawn.
    pub fn into_block(self, module: &str) -> ContentBlock {
        match self {
            ModuleOutcome::Rendered(block) => block,
            ModuleOutcome::Missing => ContentBlock::new(module, MODULE_NOT_FOUND)
                .with_title_tone(Tone::Dim)
                .with_border(Tone::Dim),
            ModuleOutcome::Failed(message) => ContentBlock::new(module, message)
                .with_title_tone(Tone::Alert)
                .with_border(Tone::Alert),
            ModuleOutcome::TimedOut(budget) => {
                ContentBlock::new(module, format!("timed out after {:.1}s", budget.as_secs_f64()))
                    .with_title_tone(Tone::Alert)
                    .with_border(Tone::Alert)
            }
            ModuleOutcome::Stalled => ContentBlock::new(module, STALLED_NOTICE)
                .with_title_tone(Tone::Alert)
                .with_border(Tone::Warn),
        }
    }
}

/// One module call's result for the current rebuild. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleInvocation {
    pub module: String,
    pub status: InvocationStatus,
    pub content: ContentBlock,
}

impl ModuleInvocation {
    pub fn new(module: &str, outcome: ModuleOutcome) -> Self {
        Self {
            module: module.to_string(),
            status: outcome.status(),
            content: outcome.into_block(module),
        }
    }

    /// A leaf that is not bound to any module, such as the empty-layout notice.
    pub fn notice(title: &str, body: &str) -> Self {
        Self {
            module: String::new(),
            status: InvocationStatus::Rendered,
            content: ContentBlock::new(title, body.to_string())
                .with_title_tone(Tone::Dim)
                .with_border(Tone::Dim),
        }
    }
}

/// Name to implementation map, fixed at startup.
pub struct ModuleRegistry {
    modules: BTreeMap<String, Arc<dyn Module>>,
    budget: Option<Duration>,
    /// Renders that ran past the budget, by module name. At most one per
    /// module, so a hung module holds at most one blocking thread.
    overdue: Mutex<HashMap<String, RenderTask>>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    /// An empty registry without a render budget.
    pub fn new() -> Self {
        Self {
            modules: BTreeMap::new(),
            budget: None,
            overdue: Mutex::new(HashMap::new()),
        }
    }

    /// A registry holding every built-in module, reading from `data_dir`.
    pub fn with_builtins(data_dir: &Path) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FocusModule::new(data_dir)));
        registry.register(Arc::new(QueueModule::new(data_dir)));
        registry.register(Arc::new(LoopsModule::new(data_dir)));
        registry.register(Arc::new(BlockersModule::new(data_dir)));
        registry.register(Arc::new(GitModule::new(None)));
        registry.register(Arc::new(ServicesModule::new(data_dir)));
        registry
    }

    /// Limit every module call to `budget`. `None` waits as long as it takes.
    pub fn with_budget(mut self, budget: Option<Duration>) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// Register a module under its own name, replacing any previous one.
    pub fn register(&mut self, module: Arc<dyn Module>) {
        self.modules.insert(module.name().to_string(), module);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Resolve `name` and render it. Always returns a block; failures of any
    /// kind are folded into the invocation.
    pub async fn invoke(&self, name: &str, ctx: &RenderContext) -> ModuleInvocation {
        let outcome = match self.modules.get(name) {
            None => ModuleOutcome::Missing,
            Some(module) => self.run(name, Arc::clone(module), ctx.clone()).await,
        };
        match &outcome {
            ModuleOutcome::Rendered(_) => {}
            ModuleOutcome::Missing => tracing::debug!(module = name, "module not registered"),
            ModuleOutcome::Failed(message) => {
                tracing::warn!(module = name, error = %message, "module render failed");
            }
            ModuleOutcome::TimedOut(budget) => {
                tracing::warn!(module = name, ?budget, "module render timed out");
            }
            ModuleOutcome::Stalled => {
                tracing::warn!(module = name, "skipping render, previous one still running");
            }
        }
        ModuleInvocation::new(name, outcome)
    }

    /// Run the render on the blocking pool so that a panic or a slow call
    /// stays inside its own task.
    async fn run(&self, name: &str, module: Arc<dyn Module>, ctx: RenderContext) -> ModuleOutcome {
        if self.still_overdue(name) {
            return ModuleOutcome::Stalled;
        }

        let mut task = tokio::task::spawn_blocking(move || module.render(&ctx));
        let joined = match self.budget {
            Some(budget) => match tokio::time::timeout(budget, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    self.lock_overdue().insert(name.to_string(), task);
                    return ModuleOutcome::TimedOut(budget);
                }
            },
            None => task.await,
        };
        match joined {
            Ok(Ok(block)) => ModuleOutcome::Rendered(block),
            Ok(Err(e)) => ModuleOutcome::Failed(format!("{e:#}")),
            Err(e) if e.is_panic() => {
                ModuleOutcome::Failed(format!("module panicked: {}", panic_message(&*e.into_panic())))
            }
            Err(e) => ModuleOutcome::Failed(e.to_string()),
        }
    }

    /// Whether an earlier timed-out render of `name` is still running. A
    /// finished one is dropped along with its stale result.
    fn still_overdue(&self, name: &str) -> bool {
        let mut overdue = self.lock_overdue();
        match overdue.get(name) {
            Some(task) if !task.is_finished() => true,
            Some(_) => {
                overdue.remove(name);
                false
            }
            None => false,
        }
    }

    fn lock_overdue(&self) -> std::sync::MutexGuard<'_, HashMap<String, RenderTask>> {
        self.overdue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
