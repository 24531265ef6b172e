//! Generic child traversal over IR nodes.
//!
//! A single dispatch function pattern-matches on the node kind and invokes a
//! callback for each direct child in declaration/execution order. Passes
//! build their traversals on top of this instead of hand-rolling per-kind
//! walks; the callback recurses when it wants a deep visit.
//!
//! Only *owned* children are visited. Cross-references (a `SetField`'s target
//! field, a `GetValue`'s value declaration, a delegating call's target
//! constructor) are not children and are never yielded.

use crate::arena::IrArena;
use crate::base::NodeIndex;
use crate::node::node_kind;

/// Invoke `f` on each direct child of `idx`, in order.
pub fn for_each_child<F: FnMut(NodeIndex)>(arena: &IrArena, idx: NodeIndex, f: &mut F) {
    let Some(node) = arena.get(idx) else {
        return;
    };

    match node.kind {
        node_kind::MODULE_FRAGMENT => {
            if let Some(module) = arena.get_module(node) {
                for &decl in &module.declarations.nodes {
                    f(decl);
                }
            }
        }
        node_kind::CLASS_DECLARATION => {
            if let Some(class) = arena.get_class(node) {
                if !class.this_receiver.is_none() {
                    f(class.this_receiver);
                }
                for &member in &class.members.nodes {
                    f(member);
                }
            }
        }
        node_kind::CONSTRUCTOR_DECLARATION => {
            if let Some(ctor) = arena.get_constructor(node) {
                for &param in &ctor.parameters.nodes {
                    f(param);
                }
                if !ctor.body.is_none() {
                    f(ctor.body);
                }
            }
        }
        node_kind::FIELD_DECLARATION => {
            if let Some(field) = arena.get_field(node) {
                if !field.initializer.is_none() {
                    f(field.initializer);
                }
            }
        }
        node_kind::PROPERTY_DECLARATION => {
            if let Some(property) = arena.get_property(node) {
                if !property.backing_field.is_none() {
                    f(property.backing_field);
                }
            }
        }
        node_kind::ANONYMOUS_INITIALIZER => {
            if let Some(init) = arena.get_initializer(node) {
                if !init.body.is_none() {
                    f(init.body);
                }
            }
        }
        node_kind::VALUE_PARAMETER => {
            if let Some(param) = arena.get_value_parameter(node) {
                if !param.default_value.is_none() {
                    f(param.default_value);
                }
            }
        }
        node_kind::BLOCK_BODY => {
            if let Some(body) = arena.get_block_body(node) {
                for &stmt in &body.statements.nodes {
                    f(stmt);
                }
            }
        }
        node_kind::SET_FIELD => {
            if let Some(set_field) = arena.get_set_field(node) {
                if !set_field.receiver.is_none() {
                    f(set_field.receiver);
                }
                f(set_field.value);
            }
        }
        node_kind::GET_FIELD => {
            if let Some(get_field) = arena.get_get_field(node) {
                if !get_field.receiver.is_none() {
                    f(get_field.receiver);
                }
            }
        }
        node_kind::BLOCK_EXPRESSION => {
            if let Some(block) = arena.get_block_expr(node) {
                for &stmt in &block.statements.nodes {
                    f(stmt);
                }
            }
        }
        node_kind::CALL_EXPRESSION => {
            if let Some(call) = arena.get_call(node) {
                for &arg in &call.arguments.nodes {
                    f(arg);
                }
            }
        }
        // Leaf nodes: delegating calls carry only references, value reads
        // and constants carry no children at all.
        _ => {}
    }
}
