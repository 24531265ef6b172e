//! Compact human-readable rendering of IR declarations.
//!
//! Used in fatal diagnostics, where the message has to name the offending
//! class and the constructors it actually declares.

use crate::arena::IrArena;
use crate::base::{NodeIndex, TypeId};
use crate::node::{ClassKind, TyData};

/// Render a class declaration as `class Foo` / `interface Foo` / ...
pub fn render_class(arena: &IrArena, idx: NodeIndex) -> String {
    let Some(class) = arena.get(idx).and_then(|n| arena.get_class(n)) else {
        return "<unknown class>".to_string();
    };
    let keyword = match class.kind {
        ClassKind::Class => "class",
        ClassKind::Interface => "interface",
        ClassKind::Enum => "enum class",
        ClassKind::Object => "object",
        ClassKind::Annotation => "annotation class",
    };
    format!("{keyword} {}", class.name)
}

/// Render a constructor as `constructor Foo(x: Bar = ..., y: veld.Any)`.
/// Parameter defaults are abbreviated; only their presence matters here.
pub fn render_constructor(arena: &IrArena, idx: NodeIndex) -> String {
    let Some(ctor) = arena.get(idx).and_then(|n| arena.get_constructor(n)) else {
        return "<unknown constructor>".to_string();
    };
    let class_name = arena
        .get(ctor.parent)
        .and_then(|n| arena.get_class(n))
        .map(|c| c.name.as_str())
        .unwrap_or("<unknown class>");

    let mut params = Vec::with_capacity(ctor.parameters.len());
    for &param_idx in &ctor.parameters.nodes {
        let Some(param) = arena.get(param_idx).and_then(|n| arena.get_value_parameter(n)) else {
            continue;
        };
        let mut rendered = format!("{}: {}", param.name, render_type(arena, param.param_type));
        if !param.default_value.is_none() {
            rendered.push_str(" = ...");
        }
        params.push(rendered);
    }

    format!("constructor {class_name}({})", params.join(", "))
}

/// Render a type reference by name.
pub fn render_type(arena: &IrArena, id: TypeId) -> String {
    match arena.type_data(id) {
        TyData::Unit => "Unit".to_string(),
        TyData::Class(class) => arena
            .get(class)
            .and_then(|n| arena.get_class(n))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "<unknown class>".to_string()),
    }
}
