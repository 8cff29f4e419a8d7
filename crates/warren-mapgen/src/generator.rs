//! Drives registered steps over a context, with safe-retry support.

use tracing::{debug, warn};

use crate::context::GenerationContext;
use crate::error::GenerationError;
use crate::step::{check_requirements, GenerationStep, StepProgress};

/// Owns a context and an ordered list of steps, and runs the latter over the
/// former.
pub struct Generator {
    context: GenerationContext,
    steps: Vec<Box<dyn GenerationStep>>,
}

/// One pause point surfaced by a [`StageRunner`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stage {
    pub step_name: String,
    pub step_index: usize,
    pub stage_index: usize,
}

impl Generator {
    /// Panics unless both dimensions are positive.
    pub fn new(width: usize, height: usize) -> Self {
        Self { context: GenerationContext::new(width, height), steps: Vec::new() }
    }

    pub fn context(&self) -> &GenerationContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut GenerationContext {
        &mut self.context
    }

    pub fn add_component<T: std::any::Any>(
        &mut self,
        component: T,
        tag: Option<&str>,
    ) -> Result<&mut Self, GenerationError> {
        self.context.add(component, tag)?;
        Ok(self)
    }

    pub fn add_step(&mut self, step: impl GenerationStep + 'static) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn add_boxed_step(&mut self, step: Box<dyn GenerationStep>) -> &mut Self {
        self.steps.push(step);
        self
    }

    pub fn add_steps(
        &mut self,
        steps: impl IntoIterator<Item = Box<dyn GenerationStep>>,
    ) -> &mut Self {
        self.steps.extend(steps);
        self
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Runs every step to completion, in registration order.
    ///
    /// A [`GenerationError::RegenerateMap`] return means the current map is
    /// unsalvageable; callers either handle it or use
    /// [`config_and_generate_safe`](Self::config_and_generate_safe).
    pub fn generate(&mut self) -> Result<(), GenerationError> {
        let Self { context, steps } = self;
        for step in steps.iter_mut() {
            step.perform(context)?;
            debug!(step = step.name(), "generation step complete");
        }
        Ok(())
    }

    /// Drops all steps and replaces the context with a fresh one of the same
    /// size.
    pub fn clear(&mut self) {
        self.steps.clear();
        self.context = GenerationContext::new(self.context.width(), self.context.height());
    }

    /// Clears, configures and generates, retrying the whole configuration on
    /// a regenerate signal.
    ///
    /// `max_attempts < 0` retries until a map generates; otherwise exhausting
    /// the budget yields [`GenerationError::GenerationFailed`]. The
    /// configuration closure runs once per attempt and is responsible for
    /// seeding its steps differently if distinct retry outcomes are wanted.
    pub fn config_and_generate_safe(
        &mut self,
        mut config_fn: impl FnMut(&mut Generator) -> Result<(), GenerationError>,
        max_attempts: i32,
    ) -> Result<(), GenerationError> {
        let mut attempts = 0_u32;
        loop {
            self.clear();
            config_fn(self)?;
            match self.generate() {
                Ok(()) => return Ok(()),
                Err(GenerationError::RegenerateMap { reason }) => {
                    attempts += 1;
                    warn!(attempt = attempts, %reason, "map unsalvageable, regenerating");
                    if max_attempts >= 0 && attempts >= max_attempts as u32 {
                        return Err(GenerationError::GenerationFailed { attempts });
                    }
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// A runner that surfaces one stage pause at a time, for debuggers and
    /// visualizers.
    pub fn stages(&mut self) -> StageRunner<'_> {
        StageRunner { generator: self, step_index: 0, stage_index: 0, step_started: false }
    }

    /// Staged variant of [`config_and_generate_safe`](Self::config_and_generate_safe):
    /// the stage stream restarts from a fresh configuration whenever a step
    /// signals regeneration, under the same attempt budget.
    pub fn config_and_stages_safe<'a, F>(
        &'a mut self,
        config_fn: F,
        max_attempts: i32,
    ) -> SafeStageRunner<'a, F>
    where
        F: FnMut(&mut Generator) -> Result<(), GenerationError>,
    {
        SafeStageRunner {
            generator: self,
            config_fn,
            max_attempts,
            attempts: 0,
            configured: false,
            step_index: 0,
            stage_index: 0,
            step_started: false,
        }
    }
}

/// Single-consumer cursor over the stage pauses of a generator run.
pub struct StageRunner<'a> {
    generator: &'a mut Generator,
    step_index: usize,
    stage_index: usize,
    step_started: bool,
}

impl StageRunner<'_> {
    /// Runs until the next stage pause. `Ok(None)` means every step has
    /// completed.
    pub fn advance(&mut self) -> Result<Option<Stage>, GenerationError> {
        let Generator { context, steps } = &mut *self.generator;
        loop {
            let Some(step) = steps.get_mut(self.step_index) else {
                return Ok(None);
            };
            if !self.step_started {
                check_requirements(step.name(), &step.requirements(), context)?;
                step.begin(context)?;
                self.step_started = true;
                self.stage_index = 0;
            }
            match step.advance(context)? {
                StepProgress::Paused => {
                    let stage = Stage {
                        step_name: step.name().to_owned(),
                        step_index: self.step_index,
                        stage_index: self.stage_index,
                    };
                    self.stage_index += 1;
                    return Ok(Some(stage));
                }
                StepProgress::Complete => {
                    debug!(step = step.name(), "generation step complete");
                    self.step_index += 1;
                    self.step_started = false;
                }
            }
        }
    }

    /// Drains the remaining stages.
    pub fn run_to_completion(&mut self) -> Result<(), GenerationError> {
        while self.advance()?.is_some() {}
        Ok(())
    }
}

/// Stage cursor that restarts from the caller's configuration on a
/// regenerate signal.
pub struct SafeStageRunner<'a, F> {
    generator: &'a mut Generator,
    config_fn: F,
    max_attempts: i32,
    attempts: u32,
    configured: bool,
    step_index: usize,
    stage_index: usize,
    step_started: bool,
}

impl<F> SafeStageRunner<'_, F>
where
    F: FnMut(&mut Generator) -> Result<(), GenerationError>,
{
    pub fn advance(&mut self) -> Result<Option<Stage>, GenerationError> {
        loop {
            if !self.configured {
                self.generator.clear();
                (self.config_fn)(&mut *self.generator)?;
                self.configured = true;
                self.step_index = 0;
                self.stage_index = 0;
                self.step_started = false;
            }

            let Generator { context, steps } = &mut *self.generator;
            let Some(step) = steps.get_mut(self.step_index) else {
                return Ok(None);
            };

            let result = (|| {
                if !self.step_started {
                    check_requirements(step.name(), &step.requirements(), context)?;
                    step.begin(context)?;
                    self.step_started = true;
                    self.stage_index = 0;
                }
                step.advance(context)
            })();

            match result {
                Ok(StepProgress::Paused) => {
                    let stage = Stage {
                        step_name: step.name().to_owned(),
                        step_index: self.step_index,
                        stage_index: self.stage_index,
                    };
                    self.stage_index += 1;
                    return Ok(Some(stage));
                }
                Ok(StepProgress::Complete) => {
                    self.step_index += 1;
                    self.step_started = false;
                }
                Err(GenerationError::RegenerateMap { reason }) => {
                    self.attempts += 1;
                    warn!(attempt = self.attempts, %reason, "map unsalvageable, regenerating");
                    if self.max_attempts >= 0 && self.attempts >= self.max_attempts as u32 {
                        return Err(GenerationError::GenerationFailed { attempts: self.attempts });
                    }
                    self.configured = false;
                }
                Err(other) => return Err(other),
            }
        }
    }
}
