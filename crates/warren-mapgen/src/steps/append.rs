//! Folds one tagged item list into another.

use std::any::Any;
use std::marker::PhantomData;

use crate::context::{GenerationContext, ItemList};
use crate::error::GenerationError;
use crate::step::{ComponentRequirement, GenerationStep, StepProgress};

/// Appends the items of the `append_list_tag` list onto the
/// `base_list_tag` list, keeping each item's original producing step. The
/// appended list itself is left in place.
pub struct ListAppender<T> {
    pub name: String,
    pub base_list_tag: String,
    pub append_list_tag: String,
    _item: PhantomData<fn() -> T>,
}

impl<T> ListAppender<T> {
    pub fn new(base_list_tag: &str, append_list_tag: &str) -> Self {
        Self {
            name: "ListAppender".to_owned(),
            base_list_tag: base_list_tag.to_owned(),
            append_list_tag: append_list_tag.to_owned(),
            _item: PhantomData,
        }
    }
}

impl<T: Any + Clone> GenerationStep for ListAppender<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> Vec<ComponentRequirement> {
        vec![
            ComponentRequirement::of::<ItemList<T>>(Some(&self.base_list_tag)),
            ComponentRequirement::of::<ItemList<T>>(Some(&self.append_list_tag)),
        ]
    }

    fn begin(&mut self, _context: &mut GenerationContext) -> Result<(), GenerationError> {
        if self.base_list_tag == self.append_list_tag {
            return Err(GenerationError::invalid(
                &self.name,
                "append_list_tag",
                format!("the base and append list tags must differ, both are {:?}", self.base_list_tag),
            ));
        }
        Ok(())
    }

    fn advance(
        &mut self,
        context: &mut GenerationContext,
    ) -> Result<StepProgress, GenerationError> {
        let appended: Vec<(T, String)> = context
            .get_first::<ItemList<T>>(Some(&self.append_list_tag))
            .expect("checked by requirements")
            .entries()
            .iter()
            .map(|entry| (entry.item.clone(), entry.source_step.clone()))
            .collect();

        let base = context
            .get_first_mut::<ItemList<T>>(Some(&self.base_list_tag))
            .expect("checked by requirements");
        for (item, source_step) in appended {
            base.add(item, &source_step);
        }
        Ok(StepProgress::Complete)
    }
}
