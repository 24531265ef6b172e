//! No-arg constructor synthesis for the Veld compiler backend.
//!
//! Frameworks that instantiate objects reflectively need a constructor they
//! can call with zero arguments. This crate implements the backend lowering
//! that provides one: for every concrete class carrying one of the
//! configured marker annotations, a parameterless constructor is synthesized
//! unless the class already declares a usable one.
//!
//! # Architecture
//!
//! The pass runs as a single in-place rewrite of one module's IR:
//!
//! 1. **Walk** - [`transformer::NoArgTransformer`] visits every class
//!    declaration in the module, children first.
//! 2. **Gate** - the [`annotations::AnnotationBasedExtension`] predicate
//!    tests the class's resolved annotations against the configured marker
//!    set.
//! 3. **Synthesize** - a constructor delegating to a no-arg superclass
//!    constructor is built, recursively synthesizing one for the superclass
//!    when it is itself marked. Results are memoized so each class gets at
//!    most one synthesized constructor per run.
//! 4. **Replay** (optional) - with `invoke_initializers` enabled,
//!    [`initializers::InitializersBlockBuilder`] clones the class's instance
//!    field initializers and anonymous initializer blocks into the
//!    synthesized body, in declaration order.
//!
//! The pass either completes for every eligible class in the module or
//! aborts with a [`NoArgError`]; there is no partial-success state.

pub mod annotations;
pub mod error;
pub mod extension;
pub mod initializers;
pub mod tracing_config;
pub mod transformer;

pub use error::NoArgError;
pub use extension::NoArgGenerationExtension;

/// Fully-qualified name of the annotation marking a constructor whose
/// defaulted parameters are exposed through generated arity overloads.
/// A secondary constructor with all-default parameters satisfies no-arg
/// call sites only when it carries this marker.
pub const OVERLOADS_ANNOTATION_FQ_NAME: &str = "veld.Overloads";

#[cfg(test)]
mod initializers_tests;
