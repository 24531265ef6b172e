//! The IR arena: node headers, typed data pools, accessors and builders.
//!
//! All IR nodes of one compilation module live in a single `IrArena`.
//! Passes receive `&mut IrArena` plus the `NodeIndex` of the module fragment
//! they operate on, and mutate declarations in place (appending synthesized
//! members, rewriting bodies). Node identity is the `NodeIndex`; two distinct
//! indices are distinct nodes even when their payloads are equal.

use crate::base::{NodeIndex, NodeList, TypeId};
use crate::flags::NodeFlags;
use crate::node::*;

/// Fully-qualified name of the builtin universal root class. Every class
/// without a declared class-kind supertype implicitly extends it.
pub const ROOT_CLASS_NAME: &str = "veld.Any";

/// Arena of thin node headers plus typed data pools.
#[derive(Debug)]
pub struct IrArena {
    /// The thin node headers.
    pub nodes: Vec<Node>,

    // ==========================================================================
    // Typed data pools
    // ==========================================================================
    pub modules: Vec<ModuleData>,
    pub classes: Vec<ClassData>,
    pub constructors: Vec<ConstructorData>,
    pub fields: Vec<FieldData>,
    pub properties: Vec<PropertyData>,
    pub initializers: Vec<AnonymousInitializerData>,
    pub value_parameters: Vec<ValueParameterData>,
    pub block_bodies: Vec<BlockBodyData>,
    pub delegating_calls: Vec<DelegatingCallData>,
    pub set_fields: Vec<SetFieldData>,
    pub get_fields: Vec<GetFieldData>,
    pub get_values: Vec<GetValueData>,
    pub block_exprs: Vec<BlockExpressionData>,
    pub calls: Vec<CallData>,
    pub consts: Vec<ConstData>,

    /// Interned types. Slot 0 is always the unit type.
    pub types: Vec<TyData>,

    root_class: NodeIndex,
}

impl IrArena {
    /// Create an arena pre-populated with the builtins every module shares:
    /// the unit type and the universal root class with its parameterless
    /// primary constructor.
    pub fn new() -> IrArena {
        let mut arena = IrArena {
            nodes: Vec::new(),
            modules: Vec::new(),
            classes: Vec::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            initializers: Vec::new(),
            value_parameters: Vec::new(),
            block_bodies: Vec::new(),
            delegating_calls: Vec::new(),
            set_fields: Vec::new(),
            get_fields: Vec::new(),
            get_values: Vec::new(),
            block_exprs: Vec::new(),
            calls: Vec::new(),
            consts: Vec::new(),
            types: vec![TyData::Unit],
            root_class: NodeIndex::NONE,
        };

        let root = arena.add_class(NodeIndex::NONE, ROOT_CLASS_NAME, ClassKind::Class);
        arena.add_constructor(root, true);
        arena.root_class = root;
        arena
    }

    /// The builtin universal root class.
    #[inline]
    pub fn root_class(&self) -> NodeIndex {
        self.root_class
    }

    /// The builtin unit type.
    #[inline]
    pub fn unit_type(&self) -> TypeId {
        TypeId::UNIT
    }

    /// Get a node header by index.
    #[inline]
    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.index())
    }

    // ==========================================================================
    // Typed accessors
    // ==========================================================================

    /// Get module data.
    #[inline]
    pub fn get_module(&self, node: &Node) -> Option<&ModuleData> {
        if node.kind == node_kind::MODULE_FRAGMENT {
            self.modules.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get class data.
    #[inline]
    pub fn get_class(&self, node: &Node) -> Option<&ClassData> {
        if node.kind == node_kind::CLASS_DECLARATION {
            self.classes.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get constructor data.
    #[inline]
    pub fn get_constructor(&self, node: &Node) -> Option<&ConstructorData> {
        if node.kind == node_kind::CONSTRUCTOR_DECLARATION {
            self.constructors.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get field data.
    #[inline]
    pub fn get_field(&self, node: &Node) -> Option<&FieldData> {
        if node.kind == node_kind::FIELD_DECLARATION {
            self.fields.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get property data.
    #[inline]
    pub fn get_property(&self, node: &Node) -> Option<&PropertyData> {
        if node.kind == node_kind::PROPERTY_DECLARATION {
            self.properties.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get anonymous initializer data.
    #[inline]
    pub fn get_initializer(&self, node: &Node) -> Option<&AnonymousInitializerData> {
        if node.kind == node_kind::ANONYMOUS_INITIALIZER {
            self.initializers.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get value parameter data.
    #[inline]
    pub fn get_value_parameter(&self, node: &Node) -> Option<&ValueParameterData> {
        if node.kind == node_kind::VALUE_PARAMETER {
            self.value_parameters.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get block body data.
    #[inline]
    pub fn get_block_body(&self, node: &Node) -> Option<&BlockBodyData> {
        if node.kind == node_kind::BLOCK_BODY {
            self.block_bodies.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get delegating constructor call data.
    #[inline]
    pub fn get_delegating_call(&self, node: &Node) -> Option<&DelegatingCallData> {
        if node.kind == node_kind::DELEGATING_CONSTRUCTOR_CALL {
            self.delegating_calls.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get field store data.
    #[inline]
    pub fn get_set_field(&self, node: &Node) -> Option<&SetFieldData> {
        if node.kind == node_kind::SET_FIELD {
            self.set_fields.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get field load data.
    #[inline]
    pub fn get_get_field(&self, node: &Node) -> Option<&GetFieldData> {
        if node.kind == node_kind::GET_FIELD {
            self.get_fields.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get value read data.
    #[inline]
    pub fn get_get_value(&self, node: &Node) -> Option<&GetValueData> {
        if node.kind == node_kind::GET_VALUE {
            self.get_values.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get expression-block data.
    #[inline]
    pub fn get_block_expr(&self, node: &Node) -> Option<&BlockExpressionData> {
        if node.kind == node_kind::BLOCK_EXPRESSION {
            self.block_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get call data.
    #[inline]
    pub fn get_call(&self, node: &Node) -> Option<&CallData> {
        if node.kind == node_kind::CALL_EXPRESSION {
            self.calls.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get constant data.
    #[inline]
    pub fn get_const(&self, node: &Node) -> Option<&ConstData> {
        if node.kind == node_kind::CONST_EXPRESSION {
            self.consts.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get mutable class data by index.
    #[inline]
    pub fn get_class_mut(&mut self, idx: NodeIndex) -> Option<&mut ClassData> {
        let node = *self.get(idx)?;
        if node.kind == node_kind::CLASS_DECLARATION {
            self.classes.get_mut(node.data_index as usize)
        } else {
            None
        }
    }

    /// Get the type payload for an interned type id.
    #[inline]
    pub fn type_data(&self, id: TypeId) -> TyData {
        self.types.get(id.index()).copied().unwrap_or(TyData::Unit)
    }

    /// The class declaration a type refers to, or None for non-class types.
    #[inline]
    pub fn type_class(&self, id: TypeId) -> Option<NodeIndex> {
        match self.type_data(id) {
            TyData::Class(class) => Some(class),
            TyData::Unit => None,
        }
    }

    // ==========================================================================
    // Declaration-level queries
    // ==========================================================================

    /// Resolved declaration-level annotation names of a declaration.
    /// Declarations that cannot carry annotations yield an empty slice.
    pub fn annotations_of(&self, idx: NodeIndex) -> &[String] {
        let Some(node) = self.get(idx) else {
            return &[];
        };
        match node.kind {
            node_kind::CLASS_DECLARATION => self
                .get_class(node)
                .map(|c| c.annotations.as_slice())
                .unwrap_or(&[]),
            node_kind::CONSTRUCTOR_DECLARATION => self
                .get_constructor(node)
                .map(|c| c.annotations.as_slice())
                .unwrap_or(&[]),
            node_kind::PROPERTY_DECLARATION => self
                .get_property(node)
                .map(|p| p.annotations.as_slice())
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Check whether a declaration carries the given fully-qualified
    /// annotation name.
    pub fn has_annotation(&self, idx: NodeIndex, fq_name: &str) -> bool {
        self.annotations_of(idx).iter().any(|a| a == fq_name)
    }

    /// All constructor declarations of a class, in declaration order.
    pub fn constructors_of(&self, class_idx: NodeIndex) -> Vec<NodeIndex> {
        let Some(node) = self.get(class_idx) else {
            return Vec::new();
        };
        let Some(class) = self.get_class(node) else {
            return Vec::new();
        };
        class
            .members
            .nodes
            .iter()
            .copied()
            .filter(|&m| {
                self.get(m)
                    .map(|n| n.kind == node_kind::CONSTRUCTOR_DECLARATION)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Resolve the unique direct class-kind supertype of a class.
    ///
    /// Interfaces and other non-class supertypes are ignored. When no
    /// class-kind supertype is declared (or the declaration is ambiguous,
    /// which a well-formed single-inheritance module never produces), the
    /// builtin root class is returned.
    pub fn resolve_super_class(&self, class_idx: NodeIndex) -> NodeIndex {
        let Some(node) = self.get(class_idx) else {
            return self.root_class;
        };
        let Some(class) = self.get_class(node) else {
            return self.root_class;
        };

        let mut found = None;
        for &ty in &class.super_types {
            let Some(super_idx) = self.type_class(ty) else {
                continue;
            };
            let Some(super_node) = self.get(super_idx) else {
                continue;
            };
            let Some(super_class) = self.get_class(super_node) else {
                continue;
            };
            if super_class.kind == ClassKind::Class {
                if found.is_some() {
                    return self.root_class;
                }
                found = Some(super_idx);
            }
        }

        found.unwrap_or(self.root_class)
    }

    // ==========================================================================
    // Builders
    // ==========================================================================

    #[inline]
    fn push_node(&mut self, node: Node) -> NodeIndex {
        let idx = NodeIndex::new(self.nodes.len() as u32);
        self.nodes.push(node);
        idx
    }

    fn intern_class_type(&mut self, class: NodeIndex) -> TypeId {
        let id = TypeId::new(self.types.len() as u32);
        self.types.push(TyData::Class(class));
        id
    }

    /// Create a module fragment.
    pub fn add_module(&mut self, name: &str) -> NodeIndex {
        let data_index = self.modules.len() as u32;
        self.modules.push(ModuleData {
            name: name.to_string(),
            declarations: NodeList::new(),
        });
        self.push_node(Node::with_data(node_kind::MODULE_FRAGMENT, data_index))
    }

    /// Create a class declaration and, unless `module` is NONE, append it to
    /// the module's declaration list. A fresh `this` receiver parameter and
    /// a default type naming the class are created alongside.
    pub fn add_class(&mut self, module: NodeIndex, name: &str, kind: ClassKind) -> NodeIndex {
        let class_idx = NodeIndex::new(self.nodes.len() as u32);
        let default_type = self.intern_class_type(class_idx);
        let data_index = self.classes.len() as u32;
        self.classes.push(ClassData {
            name: name.to_string(),
            kind,
            super_types: Vec::new(),
            members: NodeList::new(),
            annotations: Vec::new(),
            this_receiver: NodeIndex::NONE,
            default_type,
        });
        self.nodes
            .push(Node::with_data(node_kind::CLASS_DECLARATION, data_index));

        let this_receiver = self.add_value_parameter("this", default_type, NodeIndex::NONE);
        self.classes[data_index as usize].this_receiver = this_receiver;

        if !module.is_none() {
            if let Some(node) = self.get(module).copied() {
                if let Some(module_data) = self.modules.get_mut(node.data_index as usize) {
                    module_data.declarations.nodes.push(class_idx);
                }
            }
        }
        class_idx
    }

    /// Create a nested class declaration inside another class's member list.
    pub fn add_nested_class(
        &mut self,
        parent_class: NodeIndex,
        name: &str,
        kind: ClassKind,
    ) -> NodeIndex {
        let class_idx = self.add_class(NodeIndex::NONE, name, kind);
        if let Some(parent) = self.get_class_mut(parent_class) {
            parent.members.nodes.push(class_idx);
        }
        class_idx
    }

    /// Declare `super_decl` (class or interface) as a supertype of `class`.
    pub fn add_super_type(&mut self, class: NodeIndex, super_decl: NodeIndex) {
        let Some(super_node) = self.get(super_decl) else {
            return;
        };
        let Some(super_class) = self.get_class(super_node) else {
            return;
        };
        let ty = super_class.default_type;
        if let Some(class_data) = self.get_class_mut(class) {
            class_data.super_types.push(ty);
        }
    }

    /// Attach a resolved annotation (by fully-qualified name) to a
    /// declaration that can carry annotations.
    pub fn add_annotation(&mut self, decl: NodeIndex, fq_name: &str) {
        let Some(node) = self.get(decl).copied() else {
            return;
        };
        let fq_name = fq_name.to_string();
        match node.kind {
            node_kind::CLASS_DECLARATION => {
                if let Some(class) = self.classes.get_mut(node.data_index as usize) {
                    class.annotations.push(fq_name);
                }
            }
            node_kind::CONSTRUCTOR_DECLARATION => {
                if let Some(ctor) = self.constructors.get_mut(node.data_index as usize) {
                    ctor.annotations.push(fq_name);
                }
            }
            node_kind::PROPERTY_DECLARATION => {
                if let Some(prop) = self.properties.get_mut(node.data_index as usize) {
                    prop.annotations.push(fq_name);
                }
            }
            _ => {}
        }
    }

    /// Create a constructor for `class` and append it to the member list.
    /// The return type is the class's own default type.
    pub fn add_constructor(&mut self, class: NodeIndex, is_primary: bool) -> NodeIndex {
        let flags = if is_primary {
            NodeFlags::PRIMARY
        } else {
            NodeFlags::empty()
        };
        self.add_constructor_with_flags(class, flags)
    }

    /// Create a constructor with explicit flags (used by lowering passes to
    /// mark synthesized constructors).
    pub fn add_constructor_with_flags(&mut self, class: NodeIndex, flags: NodeFlags) -> NodeIndex {
        let return_type = self
            .get(class)
            .and_then(|n| self.get_class(n))
            .map(|c| c.default_type)
            .unwrap_or(TypeId::UNIT);
        let data_index = self.constructors.len() as u32;
        self.constructors.push(ConstructorData {
            parent: class,
            parameters: NodeList::new(),
            body: NodeIndex::NONE,
            annotations: Vec::new(),
            return_type,
        });
        let idx = self.push_node(Node::with_data_and_flags(
            node_kind::CONSTRUCTOR_DECLARATION,
            data_index,
            flags,
        ));
        if let Some(class_data) = self.get_class_mut(class) {
            class_data.members.nodes.push(idx);
        }
        idx
    }

    /// Create a bare value parameter node.
    pub fn add_value_parameter(
        &mut self,
        name: &str,
        param_type: TypeId,
        default_value: NodeIndex,
    ) -> NodeIndex {
        let data_index = self.value_parameters.len() as u32;
        self.value_parameters.push(ValueParameterData {
            name: name.to_string(),
            param_type,
            default_value,
        });
        self.push_node(Node::with_data(node_kind::VALUE_PARAMETER, data_index))
    }

    /// Create a value parameter and append it to a constructor's parameter
    /// list.
    pub fn add_constructor_parameter(
        &mut self,
        ctor: NodeIndex,
        name: &str,
        param_type: TypeId,
        default_value: NodeIndex,
    ) -> NodeIndex {
        let param = self.add_value_parameter(name, param_type, default_value);
        if let Some(node) = self.get(ctor).copied() {
            if let Some(ctor_data) = self.constructors.get_mut(node.data_index as usize) {
                ctor_data.parameters.nodes.push(param);
            }
        }
        param
    }

    /// Set a constructor's body.
    pub fn set_constructor_body(&mut self, ctor: NodeIndex, body: NodeIndex) {
        if let Some(node) = self.get(ctor).copied() {
            if node.kind == node_kind::CONSTRUCTOR_DECLARATION {
                if let Some(ctor_data) = self.constructors.get_mut(node.data_index as usize) {
                    ctor_data.body = body;
                }
            }
        }
    }

    /// Create a field declaration and append it to the class member list.
    pub fn add_field(
        &mut self,
        class: NodeIndex,
        name: &str,
        field_type: TypeId,
        is_static: bool,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let flags = if is_static {
            NodeFlags::STATIC
        } else {
            NodeFlags::empty()
        };
        let data_index = self.fields.len() as u32;
        self.fields.push(FieldData {
            name: name.to_string(),
            parent: class,
            field_type,
            initializer,
            corresponding_property: NodeIndex::NONE,
        });
        let idx = self.push_node(Node::with_data_and_flags(
            node_kind::FIELD_DECLARATION,
            data_index,
            flags,
        ));
        if let Some(class_data) = self.get_class_mut(class) {
            class_data.members.nodes.push(idx);
        }
        idx
    }

    /// Create a property with a backing field. The property is the member
    /// that appears in the class's declaration list; the field hangs off it.
    /// Returns `(property, backing_field)`.
    pub fn add_property_with_backing_field(
        &mut self,
        class: NodeIndex,
        name: &str,
        field_type: TypeId,
        is_static: bool,
        initializer: NodeIndex,
    ) -> (NodeIndex, NodeIndex) {
        let flags = if is_static {
            NodeFlags::STATIC
        } else {
            NodeFlags::empty()
        };

        let field_data_index = self.fields.len() as u32;
        self.fields.push(FieldData {
            name: name.to_string(),
            parent: class,
            field_type,
            initializer,
            corresponding_property: NodeIndex::NONE,
        });
        let field_idx = self.push_node(Node::with_data_and_flags(
            node_kind::FIELD_DECLARATION,
            field_data_index,
            flags,
        ));

        let prop_data_index = self.properties.len() as u32;
        self.properties.push(PropertyData {
            name: name.to_string(),
            backing_field: field_idx,
            annotations: Vec::new(),
        });
        let prop_idx = self.push_node(Node::with_data_and_flags(
            node_kind::PROPERTY_DECLARATION,
            prop_data_index,
            flags,
        ));

        self.fields[field_data_index as usize].corresponding_property = prop_idx;
        if let Some(class_data) = self.get_class_mut(class) {
            class_data.members.nodes.push(prop_idx);
        }
        (prop_idx, field_idx)
    }

    /// Create a property without a backing field (a computed property).
    pub fn add_property_without_backing_field(
        &mut self,
        class: NodeIndex,
        name: &str,
    ) -> NodeIndex {
        let data_index = self.properties.len() as u32;
        self.properties.push(PropertyData {
            name: name.to_string(),
            backing_field: NodeIndex::NONE,
            annotations: Vec::new(),
        });
        let idx = self.push_node(Node::with_data(node_kind::PROPERTY_DECLARATION, data_index));
        if let Some(class_data) = self.get_class_mut(class) {
            class_data.members.nodes.push(idx);
        }
        idx
    }

    /// Create an anonymous initializer block and append it to the class
    /// member list.
    pub fn add_anonymous_initializer(
        &mut self,
        class: NodeIndex,
        is_static: bool,
        body: NodeIndex,
    ) -> NodeIndex {
        let flags = if is_static {
            NodeFlags::STATIC
        } else {
            NodeFlags::empty()
        };
        let data_index = self.initializers.len() as u32;
        self.initializers.push(AnonymousInitializerData {
            parent: class,
            body,
        });
        let idx = self.push_node(Node::with_data_and_flags(
            node_kind::ANONYMOUS_INITIALIZER,
            data_index,
            flags,
        ));
        if let Some(class_data) = self.get_class_mut(class) {
            class_data.members.nodes.push(idx);
        }
        idx
    }

    /// Create a statement-list body.
    pub fn add_block_body(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        let data_index = self.block_bodies.len() as u32;
        self.block_bodies.push(BlockBodyData {
            statements: NodeList::from_vec(statements),
        });
        self.push_node(Node::with_data(node_kind::BLOCK_BODY, data_index))
    }

    /// Create a delegating constructor call.
    pub fn add_delegating_call(
        &mut self,
        target: NodeIndex,
        value_argument_count: u32,
    ) -> NodeIndex {
        let data_index = self.delegating_calls.len() as u32;
        self.delegating_calls.push(DelegatingCallData {
            target,
            value_argument_count,
        });
        self.push_node(Node::with_data(
            node_kind::DELEGATING_CONSTRUCTOR_CALL,
            data_index,
        ))
    }

    /// Create a field store.
    pub fn add_set_field(
        &mut self,
        field: NodeIndex,
        receiver: NodeIndex,
        value: NodeIndex,
        origin: StatementOrigin,
    ) -> NodeIndex {
        let data_index = self.set_fields.len() as u32;
        self.set_fields.push(SetFieldData {
            field,
            receiver,
            value,
            origin,
        });
        self.push_node(Node::with_data(node_kind::SET_FIELD, data_index))
    }

    /// Create a field load.
    pub fn add_get_field(&mut self, field: NodeIndex, receiver: NodeIndex) -> NodeIndex {
        let data_index = self.get_fields.len() as u32;
        self.get_fields.push(GetFieldData { field, receiver });
        self.push_node(Node::with_data(node_kind::GET_FIELD, data_index))
    }

    /// Create a value read.
    pub fn add_get_value(&mut self, target: NodeIndex, origin: ValueOrigin) -> NodeIndex {
        let data_index = self.get_values.len() as u32;
        self.get_values.push(GetValueData { target, origin });
        self.push_node(Node::with_data(node_kind::GET_VALUE, data_index))
    }

    /// Create an expression-position block.
    pub fn add_block_expression(
        &mut self,
        statements: Vec<NodeIndex>,
        origin: StatementOrigin,
    ) -> NodeIndex {
        let data_index = self.block_exprs.len() as u32;
        self.block_exprs.push(BlockExpressionData {
            statements: NodeList::from_vec(statements),
            origin,
        });
        self.push_node(Node::with_data(node_kind::BLOCK_EXPRESSION, data_index))
    }

    /// Create a call expression.
    pub fn add_call(&mut self, callee: &str, arguments: Vec<NodeIndex>) -> NodeIndex {
        let data_index = self.calls.len() as u32;
        self.calls.push(CallData {
            callee: callee.to_string(),
            arguments: NodeList::from_vec(arguments),
        });
        self.push_node(Node::with_data(node_kind::CALL_EXPRESSION, data_index))
    }

    /// Create an integer constant.
    pub fn add_const_int(&mut self, value: i64) -> NodeIndex {
        self.add_const(ConstValue::Int(value))
    }

    /// Create a constant expression.
    pub fn add_const(&mut self, value: ConstValue) -> NodeIndex {
        let data_index = self.consts.len() as u32;
        self.consts.push(ConstData { value });
        self.push_node(Node::with_data(node_kind::CONST_EXPRESSION, data_index))
    }
}

impl Default for IrArena {
    fn default() -> IrArena {
        IrArena::new()
    }
}
