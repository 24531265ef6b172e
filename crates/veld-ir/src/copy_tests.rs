use crate::arena::IrArena;
use crate::base::NodeIndex;
use crate::copy::deep_copy_with_remap;
use crate::node::{ClassKind, StatementOrigin, ValueOrigin, node_kind};

#[test]
fn test_copy_block_allocates_fresh_identities() {
    let mut arena = IrArena::new();
    let module = arena.add_module("main");
    let class = arena.add_class(module, "Foo", ClassKind::Class);
    let this_receiver = arena
        .get(class)
        .and_then(|n| arena.get_class(n))
        .unwrap()
        .this_receiver;

    let field = arena.add_field(class, "x", arena.unit_type(), false, NodeIndex::NONE);
    let receiver = arena.add_get_value(this_receiver, ValueOrigin::None);
    let value = arena.add_const_int(1);
    let set = arena.add_set_field(field, receiver, value, StatementOrigin::InitializeField);
    let block = arena.add_block_expression(vec![set], StatementOrigin::None);

    let copy = deep_copy_with_remap(&mut arena, block);
    assert!(!copy.is_none());
    assert_ne!(copy, block);

    let copy_data = arena
        .get(copy)
        .and_then(|n| arena.get_block_expr(n))
        .unwrap();
    assert_eq!(copy_data.statements.len(), 1);
    let copied_set = copy_data.statements.nodes[0];
    assert_ne!(copied_set, set);

    let copied_set_data = arena
        .get(copied_set)
        .and_then(|n| arena.get_set_field(n))
        .unwrap();
    // Receiver and value are owned children: both freshly allocated.
    assert_ne!(copied_set_data.receiver, receiver);
    assert_ne!(copied_set_data.value, value);
    assert_eq!(copied_set_data.origin, StatementOrigin::InitializeField);
    // The field was not part of the copied subtree, so the reference is
    // preserved rather than remapped.
    assert_eq!(copied_set_data.field, field);
    // And the receiver still reads the class's own `this`.
    let copied_receiver = arena
        .get(copied_set_data.receiver)
        .and_then(|n| arena.get_get_value(n))
        .unwrap();
    assert_eq!(copied_receiver.target, this_receiver);
}

#[test]
fn test_copy_constructor_rebinds_parameter_reads() {
    let mut arena = IrArena::new();
    let module = arena.add_module("main");
    let class = arena.add_class(module, "Foo", ClassKind::Class);
    let field = arena.add_field(class, "x", arena.unit_type(), false, NodeIndex::NONE);

    let ctor = arena.add_constructor(class, true);
    let param = arena.add_constructor_parameter(ctor, "x", arena.unit_type(), NodeIndex::NONE);
    let read = arena.add_get_value(param, ValueOrigin::None);
    let set = arena.add_set_field(field, NodeIndex::NONE, read, StatementOrigin::None);
    let body = arena.add_block_body(vec![set]);
    arena.set_constructor_body(ctor, body);

    let copy = deep_copy_with_remap(&mut arena, ctor);
    let copy_data = arena
        .get(copy)
        .and_then(|n| arena.get_constructor(n))
        .unwrap();
    assert_eq!(copy_data.parameters.len(), 1);
    let copied_param = copy_data.parameters.nodes[0];
    assert_ne!(copied_param, param);

    let copied_body = arena
        .get(copy_data.body)
        .and_then(|n| arena.get_block_body(n))
        .unwrap();
    let copied_set = arena
        .get(copied_body.statements.nodes[0])
        .and_then(|n| arena.get_set_field(n))
        .unwrap();
    // The value read targeted the original parameter; inside the copy it
    // must target the copied parameter.
    let copied_read = arena
        .get(copied_set.value)
        .and_then(|n| arena.get_get_value(n))
        .unwrap();
    assert_eq!(copied_read.target, copied_param);
}

#[test]
fn test_copy_class_rebinds_this_receiver() {
    let mut arena = IrArena::new();
    let module = arena.add_module("main");
    let class = arena.add_class(module, "Foo", ClassKind::Class);
    let this_receiver = arena
        .get(class)
        .and_then(|n| arena.get_class(n))
        .unwrap()
        .this_receiver;

    let receiver = arena.add_get_value(this_receiver, ValueOrigin::None);
    let value = arena.add_const_int(7);
    let field = arena.add_field(class, "x", arena.unit_type(), false, NodeIndex::NONE);
    let set = arena.add_set_field(field, receiver, value, StatementOrigin::None);
    let body = arena.add_block_body(vec![set]);
    arena.add_anonymous_initializer(class, false, body);

    let copy = deep_copy_with_remap(&mut arena, class);
    let copy_data = arena.get(copy).and_then(|n| arena.get_class(n)).unwrap();
    assert_ne!(copy_data.this_receiver, this_receiver);
    // The copied class names itself through a fresh default type.
    assert_eq!(arena.type_class(copy_data.default_type), Some(copy));

    // Locate the copied initializer and check its receiver read was
    // remapped onto the copied `this`.
    let copied_init = copy_data
        .members
        .nodes
        .iter()
        .copied()
        .find(|&m| {
            arena
                .get(m)
                .map(|n| n.kind == node_kind::ANONYMOUS_INITIALIZER)
                .unwrap_or(false)
        })
        .unwrap();
    let init_data = arena
        .get(copied_init)
        .and_then(|n| arena.get_initializer(n))
        .unwrap();
    assert_eq!(init_data.parent, copy);
    let body_data = arena
        .get(init_data.body)
        .and_then(|n| arena.get_block_body(n))
        .unwrap();
    let set_data = arena
        .get(body_data.statements.nodes[0])
        .and_then(|n| arena.get_set_field(n))
        .unwrap();
    let receiver_data = arena
        .get(set_data.receiver)
        .and_then(|n| arena.get_get_value(n))
        .unwrap();
    assert_eq!(receiver_data.target, copy_data.this_receiver);
    // The copied field is inside the subtree as a member, so the store's
    // field reference was remapped as well.
    assert_ne!(set_data.field, field);
}

#[test]
fn test_copy_module_is_rejected() {
    let mut arena = IrArena::new();
    let module = arena.add_module("main");
    assert!(deep_copy_with_remap(&mut arena, module).is_none());
    assert!(deep_copy_with_remap(&mut arena, NodeIndex::NONE).is_none());
}
