//! The no-arg constructor transformer: module walker plus memoized
//! constructor synthesis.
//!
//! The walker visits every class declaration in the module, children before
//! the enclosing class. A class gets a synthesized constructor when it is a
//! concrete class, carries a configured marker annotation, and none of its
//! declared constructors is already callable with zero arguments.
//!
//! Synthesis recurses along the superclass chain: a marked superclass gets
//! its own synthesized constructor (memoized, so repeated demand returns the
//! identical declaration), an unmarked one must already declare a
//! zero-parameter constructor or the pass aborts.

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use veld_ir::display::{render_class, render_constructor};
use veld_ir::{ClassKind, IrArena, NodeFlags, NodeIndex, node_kind};

use crate::OVERLOADS_ANNOTATION_FQ_NAME;
use crate::annotations::AnnotationBasedExtension;
use crate::error::NoArgError;
use crate::initializers::InitializersBlockBuilder;

/// One run of the pass over one module.
pub struct NoArgTransformer<'a> {
    arena: &'a mut IrArena,
    annotations: &'a IndexSet<String>,
    invoke_initializers: bool,
    /// Memoized synthesized constructors, keyed by class. Never holds two
    /// different constructors for the same class; also what terminates the
    /// recursion over a superclass chain that is demanded more than once.
    noarg_constructors: FxHashMap<NodeIndex, NodeIndex>,
}

impl AnnotationBasedExtension for NoArgTransformer<'_> {
    fn annotation_fq_names(&self, _declaration: Option<NodeIndex>) -> &IndexSet<String> {
        self.annotations
    }
}

impl<'a> NoArgTransformer<'a> {
    pub fn new(
        arena: &'a mut IrArena,
        annotations: &'a IndexSet<String>,
        invoke_initializers: bool,
    ) -> NoArgTransformer<'a> {
        NoArgTransformer {
            arena,
            annotations,
            invoke_initializers,
            noarg_constructors: FxHashMap::default(),
        }
    }

    /// Visit every declaration of the module and synthesize constructors
    /// for eligible classes. Mutates the module in place.
    pub fn run(&mut self, module: NodeIndex) -> Result<(), NoArgError> {
        let Some(node) = self.arena.get(module) else {
            return Ok(());
        };
        let Some(module_data) = self.arena.get_module(node) else {
            return Ok(());
        };

        let declarations = module_data.declarations.nodes.clone();
        for decl in declarations {
            self.visit_declaration(decl)?;
        }
        Ok(())
    }

    fn visit_declaration(&mut self, idx: NodeIndex) -> Result<(), NoArgError> {
        let Some(node) = self.arena.get(idx) else {
            return Ok(());
        };
        if node.kind == node_kind::CLASS_DECLARATION {
            self.visit_class(idx)
        } else {
            Ok(())
        }
    }

    fn visit_class(&mut self, idx: NodeIndex) -> Result<(), NoArgError> {
        // Children first: nested declarations are handled before the check
        // on their enclosing class. Synthesis itself is order-independent
        // across siblings; only superclass recursion imposes ordering.
        let members = self
            .arena
            .get(idx)
            .and_then(|n| self.arena.get_class(n))
            .map(|c| c.members.nodes.clone())
            .unwrap_or_default();
        for member in members {
            self.visit_declaration(member)?;
        }

        let Some(class) = self.arena.get(idx).and_then(|n| self.arena.get_class(n)) else {
            return Ok(());
        };
        if class.kind != ClassKind::Class {
            return Ok(());
        }
        if !self.is_marked(self.arena, idx) {
            return Ok(());
        }
        if self
            .arena
            .constructors_of(idx)
            .iter()
            .any(|&ctor| self.is_zero_parameter_constructor(ctor))
        {
            trace!(
                class = %render_class(self.arena, idx),
                "skipping class that can already be constructed without arguments"
            );
            return Ok(());
        }

        self.get_or_generate_noarg_constructor(idx)?;
        Ok(())
    }

    /// Obtain the synthesized no-arg constructor for `class_idx`, building
    /// and attaching it on first demand. Subsequent calls for the same class
    /// within this run return the identical declaration.
    pub(crate) fn get_or_generate_noarg_constructor(
        &mut self,
        class_idx: NodeIndex,
    ) -> Result<NodeIndex, NoArgError> {
        if let Some(&ctor) = self.noarg_constructors.get(&class_idx) {
            return Ok(ctor);
        }

        let super_class = self.arena.resolve_super_class(class_idx);
        let super_ctor = if self.is_marked(self.arena, super_class) {
            self.get_or_generate_noarg_constructor(super_class)?
        } else {
            self.find_zero_parameter_super_constructor(class_idx, super_class)?
        };

        let argument_count = self
            .arena
            .get(super_ctor)
            .and_then(|n| self.arena.get_constructor(n))
            .map(|c| c.parameters.len() as u32)
            .unwrap_or(0);

        let ctor = self
            .arena
            .add_constructor_with_flags(class_idx, NodeFlags::SYNTHESIZED);
        let delegating_call = self.arena.add_delegating_call(super_ctor, argument_count);
        let mut statements = vec![delegating_call];
        if self.invoke_initializers {
            let block =
                InitializersBlockBuilder::new(self.arena).create_initializers_block(class_idx);
            statements.push(block);
        }
        let body = self.arena.add_block_body(statements);
        self.arena.set_constructor_body(ctor, body);

        self.noarg_constructors.insert(class_idx, ctor);
        debug!(
            class = %render_class(self.arena, class_idx),
            "synthesized no-arg constructor"
        );
        Ok(ctor)
    }

    /// Find the single zero-parameter constructor of an unmarked superclass.
    /// Its absence is fatal: delegating anywhere else would produce invalid
    /// IR, and the condition was supposed to be ruled out up front.
    fn find_zero_parameter_super_constructor(
        &self,
        class_idx: NodeIndex,
        super_class: NodeIndex,
    ) -> Result<NodeIndex, NoArgError> {
        let ctors = self.arena.constructors_of(super_class);
        let mut zero_param = ctors.iter().copied().filter(|&ctor| {
            self.arena
                .get(ctor)
                .and_then(|n| self.arena.get_constructor(n))
                .map(|c| c.parameters.is_empty())
                .unwrap_or(false)
        });

        match (zero_param.next(), zero_param.next()) {
            (Some(ctor), None) => Ok(ctor),
            _ => Err(NoArgError::NoSuperConstructor {
                class: render_class(self.arena, class_idx),
                candidates: ctors
                    .iter()
                    .map(|&ctor| render_constructor(self.arena, ctor))
                    .collect(),
            }),
        }
    }

    /// A constructor satisfies no-arg call sites when it declares zero
    /// parameters, or when every parameter has a default value and the
    /// constructor is primary or carries the overloads-generator marker.
    pub(crate) fn is_zero_parameter_constructor(&self, ctor_idx: NodeIndex) -> bool {
        let Some(node) = self.arena.get(ctor_idx) else {
            return false;
        };
        let Some(ctor) = self.arena.get_constructor(node) else {
            return false;
        };

        if ctor.parameters.is_empty() {
            return true;
        }

        let all_defaulted = ctor.parameters.nodes.iter().all(|&param| {
            self.arena
                .get(param)
                .and_then(|n| self.arena.get_value_parameter(n))
                .map(|p| !p.default_value.is_none())
                .unwrap_or(false)
        });

        all_defaulted
            && (node.has_flag(NodeFlags::PRIMARY)
                || self
                    .arena
                    .has_annotation(ctor_idx, OVERLOADS_ANNOTATION_FQ_NAME))
    }
}
