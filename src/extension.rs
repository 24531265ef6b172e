//! Pass entry point, as registered with the compiler's plugin pipeline.

use indexmap::IndexSet;
use tracing::debug_span;
use veld_ir::{IrArena, NodeIndex};

use crate::error::NoArgError;
use crate::transformer::NoArgTransformer;

/// The no-arg constructor generation pass.
///
/// Configured once by the hosting pipeline with the marker annotation names
/// and the replay toggle, then invoked per module. Each [`generate`] call is
/// an independent run: the synthesis memo table is scoped to the call and
/// never shared across modules or threads.
///
/// [`generate`]: NoArgGenerationExtension::generate
pub struct NoArgGenerationExtension {
    annotations: IndexSet<String>,
    invoke_initializers: bool,
}

impl NoArgGenerationExtension {
    /// `annotations` is the ordered list of fully-qualified marker names.
    /// Duplicates collapse; order is preserved. Names matching nothing in a
    /// module are not an error.
    pub fn new(annotations: Vec<String>, invoke_initializers: bool) -> NoArgGenerationExtension {
        NoArgGenerationExtension {
            annotations: annotations.into_iter().collect(),
            invoke_initializers,
        }
    }

    /// Run the pass over one module, mutating it in place.
    ///
    /// Either every eligible class in the module receives its synthesized
    /// constructor, or the first fatal condition aborts the run and the
    /// module is not considered lowered.
    pub fn generate(&self, arena: &mut IrArena, module: NodeIndex) -> Result<(), NoArgError> {
        let module_name = arena
            .get(module)
            .and_then(|n| arena.get_module(n))
            .map(|m| m.name.clone())
            .unwrap_or_default();
        let _span = debug_span!("noarg", module = %module_name).entered();

        NoArgTransformer::new(arena, &self.annotations, self.invoke_initializers).run(module)
    }
}
