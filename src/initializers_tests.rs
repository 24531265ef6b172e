use veld_ir::{
    ClassKind, ConstValue, IrArena, NodeFlags, NodeIndex, StatementOrigin, ValueOrigin, node_kind,
};

use crate::NoArgGenerationExtension;

fn run_pass_with_initializers(arena: &mut IrArena, module: NodeIndex) {
    NoArgGenerationExtension::new(vec!["test.NoArg".to_string()], true)
        .generate(arena, module)
        .unwrap();
}

fn synthesized_constructor(arena: &IrArena, class: NodeIndex) -> NodeIndex {
    let synthesized: Vec<NodeIndex> = arena
        .constructors_of(class)
        .into_iter()
        .filter(|&c| arena.get(c).unwrap().has_flag(NodeFlags::SYNTHESIZED))
        .collect();
    assert_eq!(synthesized.len(), 1);
    synthesized[0]
}

/// The statements of the replay block appended after the delegating call.
fn replay_statements(arena: &IrArena, class: NodeIndex) -> Vec<NodeIndex> {
    let ctor = synthesized_constructor(arena, class);
    let body = arena
        .get(ctor)
        .and_then(|n| arena.get_constructor(n))
        .unwrap()
        .body;
    let statements = &arena
        .get(body)
        .and_then(|n| arena.get_block_body(n))
        .unwrap()
        .statements
        .nodes;
    assert_eq!(
        arena.get(statements[0]).unwrap().kind,
        node_kind::DELEGATING_CONSTRUCTOR_CALL
    );
    assert_eq!(statements.len(), 2);

    let block_node = arena.get(statements[1]).unwrap();
    assert_eq!(block_node.kind, node_kind::BLOCK_EXPRESSION);
    arena
        .get_block_expr(block_node)
        .unwrap()
        .statements
        .nodes
        .clone()
}

fn const_int_of(arena: &IrArena, expr: NodeIndex) -> i64 {
    match &arena.get(expr).and_then(|n| arena.get_const(n)).unwrap().value {
        ConstValue::Int(value) => *value,
        other => panic!("Expected integer constant, got {other:?}"),
    }
}

#[test]
fn test_initializers_replayed_in_declaration_order() {
    let mut arena = IrArena::new();
    let module = arena.add_module("main");
    let class = arena.add_class(module, "Foo", ClassKind::Class);
    arena.add_annotation(class, "test.NoArg");
    let this_receiver = arena
        .get(class)
        .and_then(|n| arena.get_class(n))
        .unwrap()
        .this_receiver;

    // field x = 1; init { print(x) }; field y = 2
    let x_init = arena.add_const_int(1);
    let x = arena.add_field(class, "x", arena.unit_type(), false, x_init);
    let x_receiver = arena.add_get_value(this_receiver, ValueOrigin::None);
    let x_read = arena.add_get_field(x, x_receiver);
    let print_call = arena.add_call("print", vec![x_read]);
    let init_body = arena.add_block_body(vec![print_call]);
    arena.add_anonymous_initializer(class, false, init_body);
    let y_init = arena.add_const_int(2);
    let y = arena.add_field(class, "y", arena.unit_type(), false, y_init);

    run_pass_with_initializers(&mut arena, module);

    let replay = replay_statements(&arena, class);
    assert_eq!(replay.len(), 3);

    let first = arena
        .get(replay[0])
        .and_then(|n| arena.get_set_field(n))
        .unwrap();
    assert_eq!(first.field, x);
    assert_eq!(first.origin, StatementOrigin::InitializeField);
    assert_eq!(const_int_of(&arena, first.value), 1);
    let first_receiver = arena
        .get(first.receiver)
        .and_then(|n| arena.get_get_value(n))
        .unwrap();
    assert_eq!(first_receiver.target, this_receiver);

    let second = arena
        .get(replay[1])
        .and_then(|n| arena.get_block_expr(n))
        .unwrap();
    assert_eq!(second.origin, StatementOrigin::SynthesizedInitBlock);
    assert_eq!(second.statements.len(), 1);
    let copied_call = arena
        .get(second.statements.nodes[0])
        .and_then(|n| arena.get_call(n))
        .unwrap();
    assert_eq!(copied_call.callee, "print");

    let third = arena
        .get(replay[2])
        .and_then(|n| arena.get_set_field(n))
        .unwrap();
    assert_eq!(third.field, y);
    assert_eq!(const_int_of(&arena, third.value), 2);
}

#[test]
fn test_parameter_sourced_field_is_not_replayed() {
    let mut arena = IrArena::new();
    let module = arena.add_module("main");
    let class = arena.add_class(module, "Foo", ClassKind::Class);
    arena.add_annotation(class, "test.NoArg");

    let primary = arena.add_constructor(class, true);
    let param = arena.add_constructor_parameter(primary, "x", arena.unit_type(), NodeIndex::NONE);

    // field x = <read of constructor parameter x>, the canonical
    // parameter-binding pattern. Replaying it would double-initialize.
    let param_read = arena.add_get_value(param, ValueOrigin::InitializePropertyFromParameter);
    arena.add_field(class, "x", arena.unit_type(), false, param_read);

    run_pass_with_initializers(&mut arena, module);
    assert!(replay_statements(&arena, class).is_empty());
}

#[test]
fn test_static_members_are_not_replayed() {
    let mut arena = IrArena::new();
    let module = arena.add_module("main");
    let class = arena.add_class(module, "Foo", ClassKind::Class);
    arena.add_annotation(class, "test.NoArg");

    let static_init = arena.add_const_int(10);
    arena.add_field(class, "shared", arena.unit_type(), true, static_init);
    let static_body = arena.add_block_body(Vec::new());
    arena.add_anonymous_initializer(class, true, static_body);
    let instance_init = arena.add_const_int(20);
    let instance_field = arena.add_field(class, "x", arena.unit_type(), false, instance_init);

    run_pass_with_initializers(&mut arena, module);

    let replay = replay_statements(&arena, class);
    assert_eq!(replay.len(), 1);
    let set = arena
        .get(replay[0])
        .and_then(|n| arena.get_set_field(n))
        .unwrap();
    assert_eq!(set.field, instance_field);
}

#[test]
fn test_properties_normalize_to_backing_fields() {
    let mut arena = IrArena::new();
    let module = arena.add_module("main");
    let class = arena.add_class(module, "Foo", ClassKind::Class);
    arena.add_annotation(class, "test.NoArg");

    let init = arena.add_const_int(5);
    let (_prop, field) =
        arena.add_property_with_backing_field(class, "x", arena.unit_type(), false, init);
    // A computed property has no backing field and contributes nothing.
    arena.add_property_without_backing_field(class, "computed");

    run_pass_with_initializers(&mut arena, module);

    let replay = replay_statements(&arena, class);
    assert_eq!(replay.len(), 1);
    let set = arena
        .get(replay[0])
        .and_then(|n| arena.get_set_field(n))
        .unwrap();
    assert_eq!(set.field, field);
    assert_eq!(const_int_of(&arena, set.value), 5);
}

#[test]
#[should_panic(expected = "class in initializer")]
fn test_local_class_in_initializer_is_rejected() {
    let mut arena = IrArena::new();
    let module = arena.add_module("main");
    let class = arena.add_class(module, "Foo", ClassKind::Class);
    arena.add_annotation(class, "test.NoArg");

    let local = arena.add_class(NodeIndex::NONE, "Local", ClassKind::Class);
    let block = arena.add_block_expression(vec![local], StatementOrigin::None);
    let body = arena.add_block_body(vec![block]);
    arena.add_anonymous_initializer(class, false, body);

    run_pass_with_initializers(&mut arena, module);
}

#[test]
fn test_replayed_block_shares_no_structure_with_class_body() {
    let mut arena = IrArena::new();
    let module = arena.add_module("main");
    let class = arena.add_class(module, "Foo", ClassKind::Class);
    arena.add_annotation(class, "test.NoArg");

    let init = arena.add_const_int(1);
    arena.add_field(class, "x", arena.unit_type(), false, init);
    let stmt = arena.add_call("touch", Vec::new());
    let init_body = arena.add_block_body(vec![stmt]);
    arena.add_anonymous_initializer(class, false, init_body);

    run_pass_with_initializers(&mut arena, module);

    let replay = replay_statements(&arena, class);
    let set = arena
        .get(replay[0])
        .and_then(|n| arena.get_set_field(n))
        .unwrap();
    // The replayed value is a fresh copy, not the field's own initializer
    // expression.
    assert_ne!(set.value, init);

    let copied_block = arena
        .get(replay[1])
        .and_then(|n| arena.get_block_expr(n))
        .unwrap();
    assert_ne!(copied_block.statements.nodes[0], stmt);
}

#[test]
fn test_initializers_not_replayed_when_disabled() {
    let mut arena = IrArena::new();
    let module = arena.add_module("main");
    let class = arena.add_class(module, "Foo", ClassKind::Class);
    arena.add_annotation(class, "test.NoArg");
    let init = arena.add_const_int(1);
    arena.add_field(class, "x", arena.unit_type(), false, init);

    NoArgGenerationExtension::new(vec!["test.NoArg".to_string()], false)
        .generate(&mut arena, module)
        .unwrap();

    let ctor = synthesized_constructor(&arena, class);
    let body = arena
        .get(ctor)
        .and_then(|n| arena.get_constructor(n))
        .unwrap()
        .body;
    let statements = &arena
        .get(body)
        .and_then(|n| arena.get_block_body(n))
        .unwrap()
        .statements;
    assert_eq!(statements.len(), 1);
}
