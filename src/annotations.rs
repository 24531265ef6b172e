//! Annotation-based extension contract.
//!
//! Several backend plugins share the same gating scheme: a set of
//! fully-qualified annotation names is supplied at configuration time, and a
//! declaration participates in the plugin's lowering when it carries any of
//! them. The trait below captures that contract once; the no-arg transformer
//! is one implementor.

use indexmap::IndexSet;
use veld_ir::{IrArena, NodeIndex};

/// A plugin gated on declaration-level annotations.
pub trait AnnotationBasedExtension {
    /// The marker names applicable to the given declaration, fully
    /// qualified, in configuration order. Implementations with a single
    /// global marker set ignore the declaration.
    fn annotation_fq_names(&self, declaration: Option<NodeIndex>) -> &IndexSet<String>;

    /// Whether the declaration carries any applicable marker.
    ///
    /// Names that match no declaration in the module are not an error; they
    /// simply never fire.
    fn is_marked(&self, arena: &IrArena, declaration: NodeIndex) -> bool {
        let applicable = self.annotation_fq_names(Some(declaration));
        arena
            .annotations_of(declaration)
            .iter()
            .any(|fq_name| applicable.contains(fq_name.as_str()))
    }
}
