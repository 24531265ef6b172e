//! Extraction of a class's instance initializers into a replayable block.
//!
//! A synthesized constructor bypasses the primary constructor entirely, so
//! with `invoke_initializers` enabled the pass replays what the primary
//! would have done: field initializers and anonymous initializer blocks, in
//! declaration order. Only instance-scoped members participate; static
//! fields and static blocks are initialized elsewhere and are never
//! replayed.

use veld_ir::display::render_class;
use veld_ir::visit::for_each_child;
use veld_ir::{IrArena, NodeFlags, NodeIndex, StatementOrigin, ValueOrigin, deep_copy_with_remap, node_kind};

/// Builds the aggregate initializers block appended to a synthesized
/// constructor body.
pub struct InitializersBlockBuilder<'a> {
    arena: &'a mut IrArena,
}

impl<'a> InitializersBlockBuilder<'a> {
    pub fn new(arena: &'a mut IrArena) -> InitializersBlockBuilder<'a> {
        InitializersBlockBuilder { arena }
    }

    /// Build the replay block for `class_idx`.
    ///
    /// The returned block is a structurally independent deep copy: it owns
    /// fresh node identities throughout and shares nothing with the class
    /// body it was extracted from, so both sides can be rewritten or emitted
    /// independently later in the pipeline.
    pub fn create_initializers_block(&mut self, class_idx: NodeIndex) -> NodeIndex {
        let statements = self.extract_initializers(class_idx);
        let block = self
            .arena
            .add_block_expression(statements, StatementOrigin::None);

        // Initializer blocks must not contain class declarations at this
        // point; local classes are hoisted out by an earlier mandatory
        // lowering, and structurally copying one here would be unsound.
        assert_no_local_classes(self.arena, block);

        deep_copy_with_remap(self.arena, block)
    }

    /// Select and convert the replayable members, in declaration order.
    fn extract_initializers(&mut self, class_idx: NodeIndex) -> Vec<NodeIndex> {
        let Some(class) = self.arena.get(class_idx).and_then(|n| self.arena.get_class(n)) else {
            return Vec::new();
        };
        let members = class.members.nodes.clone();
        let this_receiver = class.this_receiver;

        let mut statements = Vec::new();
        for member in members {
            let Some(node) = self.arena.get(member).copied() else {
                continue;
            };

            // Normalize properties to their backing field; a property
            // without one contributes nothing.
            let (decl_idx, decl_node) = if node.kind == node_kind::PROPERTY_DECLARATION {
                let backing = self
                    .arena
                    .get_property(&node)
                    .map(|p| p.backing_field)
                    .unwrap_or(NodeIndex::NONE);
                if backing.is_none() {
                    continue;
                }
                let Some(backing_node) = self.arena.get(backing).copied() else {
                    continue;
                };
                (backing, backing_node)
            } else {
                (member, node)
            };

            match decl_node.kind {
                node_kind::FIELD_DECLARATION => {
                    if decl_node.has_flag(NodeFlags::STATIC) {
                        continue;
                    }
                    let Some(field) = self.arena.get_field(&decl_node) else {
                        continue;
                    };
                    let initializer = field.initializer;
                    if initializer.is_none() {
                        continue;
                    }
                    // A field initialized straight from its constructor
                    // parameter is covered by parameter binding; replaying
                    // it would initialize the field twice.
                    if self.is_parameter_sourced(initializer) {
                        continue;
                    }
                    let receiver = self.arena.add_get_value(this_receiver, ValueOrigin::None);
                    statements.push(self.arena.add_set_field(
                        decl_idx,
                        receiver,
                        initializer,
                        StatementOrigin::InitializeField,
                    ));
                }
                node_kind::ANONYMOUS_INITIALIZER => {
                    if decl_node.has_flag(NodeFlags::STATIC) {
                        continue;
                    }
                    let Some(init) = self.arena.get_initializer(&decl_node) else {
                        continue;
                    };
                    let body = init.body;
                    let body_statements = self
                        .arena
                        .get(body)
                        .and_then(|n| self.arena.get_block_body(n))
                        .map(|b| b.statements.nodes.clone())
                        .unwrap_or_default();
                    statements.push(
                        self.arena
                            .add_block_expression(body_statements, StatementOrigin::SynthesizedInitBlock),
                    );
                }
                _ => {}
            }
        }
        statements
    }

    fn is_parameter_sourced(&self, expr: NodeIndex) -> bool {
        let Some(node) = self.arena.get(expr) else {
            return false;
        };
        let Some(get_value) = self.arena.get_get_value(node) else {
            return false;
        };
        get_value.origin == ValueOrigin::InitializePropertyFromParameter
    }
}

/// Precondition check, not input validation: a class declaration anywhere
/// inside the block is a violated compiler invariant and aborts outright.
fn assert_no_local_classes(arena: &IrArena, idx: NodeIndex) {
    let Some(node) = arena.get(idx) else {
        return;
    };
    if node.kind == node_kind::CLASS_DECLARATION {
        panic!(
            "class in initializer should have been hoisted out by local-class lowering: {}",
            render_class(arena, idx)
        );
    }
    for_each_child(arena, idx, &mut |child| assert_no_local_classes(arena, child));
}
