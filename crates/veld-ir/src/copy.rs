//! Deep structural copy with reference remapping.
//!
//! Copying a subtree allocates a fresh node identity for every node it
//! contains and records the old-to-new mapping. Cross-references *inside*
//! the copied subtree (a value read naming a parameter that was itself
//! copied, a field store naming a copied field) are rewritten through the
//! mapping so the copy is internally consistent; references to nodes outside
//! the subtree are preserved as-is. No node is ever aliased between the
//! original and the copy.
//!
//! Type references are shared between original and copy: interned types are
//! immutable, except that a copied class declaration gets a fresh default
//! type naming the copy.

use crate::arena::IrArena;
use crate::base::{NodeIndex, NodeList, TypeId};
use crate::node::{ClassData, Node, TyData, node_kind};
use rustc_hash::FxHashMap;

/// Deep-copy the subtree rooted at `root`, returning the root of the copy.
///
/// Module fragments are not copyable; passing one (or a dangling index)
/// yields `NodeIndex::NONE`.
pub fn deep_copy_with_remap(arena: &mut IrArena, root: NodeIndex) -> NodeIndex {
    let mut remap = FxHashMap::default();
    let new_root = clone_node(arena, root, &mut remap);
    patch_references(arena, &remap);
    new_root
}

fn clone_list(
    arena: &mut IrArena,
    nodes: &[NodeIndex],
    remap: &mut FxHashMap<NodeIndex, NodeIndex>,
) -> Vec<NodeIndex> {
    nodes.iter().map(|&n| clone_node(arena, n, remap)).collect()
}

fn clone_node(
    arena: &mut IrArena,
    idx: NodeIndex,
    remap: &mut FxHashMap<NodeIndex, NodeIndex>,
) -> NodeIndex {
    let Some(node) = arena.get(idx).copied() else {
        return NodeIndex::NONE;
    };

    let new_idx = match node.kind {
        node_kind::CLASS_DECLARATION => {
            let data = arena.classes[node.data_index as usize].clone();
            let new_idx = NodeIndex::new(arena.nodes.len() as u32);
            let default_type = TypeId::new(arena.types.len() as u32);
            arena.types.push(TyData::Class(new_idx));
            let data_index = arena.classes.len() as u32;
            arena.classes.push(ClassData {
                name: data.name.clone(),
                kind: data.kind,
                super_types: data.super_types.clone(),
                members: NodeList::new(),
                annotations: data.annotations.clone(),
                this_receiver: NodeIndex::NONE,
                default_type,
            });
            arena.nodes.push(Node {
                kind: node.kind,
                flags: node.flags,
                data_index,
            });

            // Map the class before cloning members so back-references from
            // members to their owner resolve to the copy.
            remap.insert(idx, new_idx);

            let new_receiver = clone_node(arena, data.this_receiver, remap);
            arena.classes[data_index as usize].this_receiver = new_receiver;
            let new_members = clone_list(arena, &data.members.nodes, remap);
            arena.classes[data_index as usize].members = NodeList::from_vec(new_members);
            new_idx
        }
        node_kind::CONSTRUCTOR_DECLARATION => {
            let mut data = arena.constructors[node.data_index as usize].clone();
            data.parameters = NodeList::from_vec(clone_list(arena, &data.parameters.nodes, remap));
            data.body = clone_node(arena, data.body, remap);
            let data_index = arena.constructors.len() as u32;
            arena.constructors.push(data);
            push_header(arena, node, data_index)
        }
        node_kind::FIELD_DECLARATION => {
            let mut data = arena.fields[node.data_index as usize].clone();
            data.initializer = clone_node(arena, data.initializer, remap);
            let data_index = arena.fields.len() as u32;
            arena.fields.push(data);
            push_header(arena, node, data_index)
        }
        node_kind::PROPERTY_DECLARATION => {
            let mut data = arena.properties[node.data_index as usize].clone();
            data.backing_field = clone_node(arena, data.backing_field, remap);
            let data_index = arena.properties.len() as u32;
            arena.properties.push(data);
            push_header(arena, node, data_index)
        }
        node_kind::ANONYMOUS_INITIALIZER => {
            let mut data = arena.initializers[node.data_index as usize].clone();
            data.body = clone_node(arena, data.body, remap);
            let data_index = arena.initializers.len() as u32;
            arena.initializers.push(data);
            push_header(arena, node, data_index)
        }
        node_kind::VALUE_PARAMETER => {
            let mut data = arena.value_parameters[node.data_index as usize].clone();
            data.default_value = clone_node(arena, data.default_value, remap);
            let data_index = arena.value_parameters.len() as u32;
            arena.value_parameters.push(data);
            push_header(arena, node, data_index)
        }
        node_kind::BLOCK_BODY => {
            let mut data = arena.block_bodies[node.data_index as usize].clone();
            data.statements = NodeList::from_vec(clone_list(arena, &data.statements.nodes, remap));
            let data_index = arena.block_bodies.len() as u32;
            arena.block_bodies.push(data);
            push_header(arena, node, data_index)
        }
        node_kind::DELEGATING_CONSTRUCTOR_CALL => {
            let data = arena.delegating_calls[node.data_index as usize].clone();
            let data_index = arena.delegating_calls.len() as u32;
            arena.delegating_calls.push(data);
            push_header(arena, node, data_index)
        }
        node_kind::SET_FIELD => {
            let mut data = arena.set_fields[node.data_index as usize].clone();
            data.receiver = clone_node(arena, data.receiver, remap);
            data.value = clone_node(arena, data.value, remap);
            let data_index = arena.set_fields.len() as u32;
            arena.set_fields.push(data);
            push_header(arena, node, data_index)
        }
        node_kind::GET_FIELD => {
            let mut data = arena.get_fields[node.data_index as usize].clone();
            data.receiver = clone_node(arena, data.receiver, remap);
            let data_index = arena.get_fields.len() as u32;
            arena.get_fields.push(data);
            push_header(arena, node, data_index)
        }
        node_kind::GET_VALUE => {
            let data = arena.get_values[node.data_index as usize].clone();
            let data_index = arena.get_values.len() as u32;
            arena.get_values.push(data);
            push_header(arena, node, data_index)
        }
        node_kind::BLOCK_EXPRESSION => {
            let mut data = arena.block_exprs[node.data_index as usize].clone();
            data.statements = NodeList::from_vec(clone_list(arena, &data.statements.nodes, remap));
            let data_index = arena.block_exprs.len() as u32;
            arena.block_exprs.push(data);
            push_header(arena, node, data_index)
        }
        node_kind::CALL_EXPRESSION => {
            let mut data = arena.calls[node.data_index as usize].clone();
            data.arguments = NodeList::from_vec(clone_list(arena, &data.arguments.nodes, remap));
            let data_index = arena.calls.len() as u32;
            arena.calls.push(data);
            push_header(arena, node, data_index)
        }
        node_kind::CONST_EXPRESSION => {
            let data = arena.consts[node.data_index as usize].clone();
            let data_index = arena.consts.len() as u32;
            arena.consts.push(data);
            push_header(arena, node, data_index)
        }
        // Module fragments are not copyable.
        _ => NodeIndex::NONE,
    };

    if !new_idx.is_none() {
        remap.insert(idx, new_idx);
    }
    new_idx
}

#[inline]
fn push_header(arena: &mut IrArena, original: Node, data_index: u32) -> NodeIndex {
    let idx = NodeIndex::new(arena.nodes.len() as u32);
    arena.nodes.push(Node {
        kind: original.kind,
        flags: original.flags,
        data_index,
    });
    idx
}

/// Rewrite cross-references inside the cloned nodes: any reference that
/// names a node covered by the remap now names its copy.
fn patch_references(arena: &mut IrArena, remap: &FxHashMap<NodeIndex, NodeIndex>) {
    for &new_idx in remap.values() {
        let Some(node) = arena.get(new_idx).copied() else {
            continue;
        };
        match node.kind {
            node_kind::CONSTRUCTOR_DECLARATION => {
                let data = &mut arena.constructors[node.data_index as usize];
                if let Some(&mapped) = remap.get(&data.parent) {
                    data.parent = mapped;
                }
            }
            node_kind::FIELD_DECLARATION => {
                let data = &mut arena.fields[node.data_index as usize];
                if let Some(&mapped) = remap.get(&data.parent) {
                    data.parent = mapped;
                }
                if let Some(&mapped) = remap.get(&data.corresponding_property) {
                    data.corresponding_property = mapped;
                }
            }
            node_kind::ANONYMOUS_INITIALIZER => {
                let data = &mut arena.initializers[node.data_index as usize];
                if let Some(&mapped) = remap.get(&data.parent) {
                    data.parent = mapped;
                }
            }
            node_kind::DELEGATING_CONSTRUCTOR_CALL => {
                let data = &mut arena.delegating_calls[node.data_index as usize];
                if let Some(&mapped) = remap.get(&data.target) {
                    data.target = mapped;
                }
            }
            node_kind::SET_FIELD => {
                let data = &mut arena.set_fields[node.data_index as usize];
                if let Some(&mapped) = remap.get(&data.field) {
                    data.field = mapped;
                }
            }
            node_kind::GET_FIELD => {
                let data = &mut arena.get_fields[node.data_index as usize];
                if let Some(&mapped) = remap.get(&data.field) {
                    data.field = mapped;
                }
            }
            node_kind::GET_VALUE => {
                let data = &mut arena.get_values[node.data_index as usize];
                if let Some(&mapped) = remap.get(&data.target) {
                    data.target = mapped;
                }
            }
            _ => {}
        }
    }
}
