//! The staged generation step contract.

use std::any::{Any, TypeId};

use crate::context::GenerationContext;
use crate::error::GenerationError;

/// Outcome of one [`GenerationStep::advance`] call.
///
/// `Paused` marks a stage boundary a driver may stop at for debugging or
/// visualization; `Complete` means the step has finished all of its work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepProgress {
    Paused,
    Complete,
}

/// A `(component type, optional tag)` pair a step needs before it can run.
#[derive(Clone, Debug)]
pub struct ComponentRequirement {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub tag: Option<String>,
}

impl ComponentRequirement {
    pub fn of<T: Any>(tag: Option<&str>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            tag: tag.map(str::to_owned),
        }
    }
}

/// A discrete, re-composable unit of map generation.
///
/// Steps run as explicit state machines: `begin` validates parameters and
/// primes state, then `advance` is driven until it reports `Complete`, each
/// `Paused` return being one stage. Signalling an unsalvageable map is done
/// by returning [`GenerationError::RegenerateMap`] from either phase.
pub trait GenerationStep {
    fn name(&self) -> &str;

    /// Components that must already exist in the context. Checked before
    /// `begin`; a miss surfaces as [`GenerationError::MissingComponent`].
    fn requirements(&self) -> Vec<ComponentRequirement> {
        Vec::new()
    }

    /// Parameter-domain validation and state priming. Runs exactly once per
    /// execution, after the requirement check.
    fn begin(&mut self, context: &mut GenerationContext) -> Result<(), GenerationError> {
        let _ = context;
        Ok(())
    }

    fn advance(&mut self, context: &mut GenerationContext)
        -> Result<StepProgress, GenerationError>;

    /// Validates and drives the step to completion.
    fn perform(&mut self, context: &mut GenerationContext) -> Result<(), GenerationError> {
        check_requirements(self.name(), &self.requirements(), context)?;
        self.begin(context)?;
        while self.advance(context)? == StepProgress::Paused {}
        Ok(())
    }
}

pub(crate) fn check_requirements(
    step_name: &str,
    requirements: &[ComponentRequirement],
    context: &GenerationContext,
) -> Result<(), GenerationError> {
    for requirement in requirements {
        if !context.has_component(requirement.type_id, requirement.tag.as_deref()) {
            return Err(GenerationError::MissingComponent {
                step: step_name.to_owned(),
                type_name: requirement.type_name,
                tag: requirement.tag.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ItemList;
    use warren_grid::Point;

    struct CountingStep {
        stages_left: u32,
        performed_stages: u32,
    }

    impl GenerationStep for CountingStep {
        fn name(&self) -> &str {
            "counting"
        }

        fn requirements(&self) -> Vec<ComponentRequirement> {
            vec![ComponentRequirement::of::<ItemList<Point>>(Some("needed"))]
        }

        fn advance(
            &mut self,
            _context: &mut GenerationContext,
        ) -> Result<StepProgress, GenerationError> {
            self.performed_stages += 1;
            if self.stages_left == 0 {
                return Ok(StepProgress::Complete);
            }
            self.stages_left -= 1;
            Ok(StepProgress::Paused)
        }
    }

    #[test]
    fn perform_reports_missing_requirements_with_full_diagnostics() {
        let mut context = GenerationContext::new(5, 5);
        let mut step = CountingStep { stages_left: 1, performed_stages: 0 };

        let error = step.perform(&mut context).unwrap_err();
        match error {
            GenerationError::MissingComponent { step, type_name, tag } => {
                assert_eq!(step, "counting");
                assert!(type_name.contains("ItemList"));
                assert_eq!(tag.as_deref(), Some("needed"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(step.performed_stages, 0, "advance must not run without requirements");
    }

    #[test]
    fn perform_drives_the_stage_machine_to_completion() {
        let mut context = GenerationContext::new(5, 5);
        context.add(ItemList::<Point>::new(), Some("needed")).unwrap();
        let mut step = CountingStep { stages_left: 3, performed_stages: 0 };

        step.perform(&mut context).unwrap();
        assert_eq!(step.performed_stages, 4, "three pauses plus the completing call");
    }
}
