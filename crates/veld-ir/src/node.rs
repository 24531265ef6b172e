//! Thin node headers and typed data pools for the backend IR.
//!
//! The IR uses the same storage scheme as the front-end AST: each node is a
//! small fixed-size header (`kind` + packed flags + an index into a
//! kind-specific data pool), and the per-kind payloads live in separate
//! `Vec<..Data>` pools owned by the [`crate::IrArena`].
//!
//! # Architecture
//!
//! 1. `Node` - an 8-byte header containing kind, flags, and a data index
//! 2. Typed storage pools - one `Vec<T>` per node category
//!
//! The `data_index` field points into the appropriate pool based on `kind`.
//! Cross-references between nodes (a `SetField` naming its target field, a
//! `GetValue` naming the value declaration it reads) are stored as
//! `NodeIndex` values inside the payloads, which is what makes deep copy
//! with reference remapping (`crate::copy`) possible.

use crate::base::{NodeIndex, NodeList, TypeId};
use crate::flags::NodeFlags;
use serde::{Deserialize, Serialize};

/// A thin node header.
///
/// Layout (8 bytes total):
/// - `kind`: 2 bytes (node_kind value)
/// - `flags`: 2 bytes (packed NodeFlags)
/// - `data_index`: 4 bytes (index into the kind-specific pool)
#[repr(C)]
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Node {
    /// node_kind value
    pub kind: u16,
    /// Packed node flags
    pub flags: u16,
    /// Index into the kind-specific storage pool
    pub data_index: u32,
}

impl Node {
    #[inline]
    pub fn with_data(kind: u16, data_index: u32) -> Node {
        Node {
            kind,
            flags: 0,
            data_index,
        }
    }

    #[inline]
    pub fn with_data_and_flags(kind: u16, data_index: u32, flags: NodeFlags) -> Node {
        Node {
            kind,
            flags: flags.bits(),
            data_index,
        }
    }

    /// Decode the packed flags field.
    #[inline]
    pub fn flags(&self) -> NodeFlags {
        NodeFlags::from_bits_truncate(self.flags)
    }

    /// Check a single flag.
    #[inline]
    pub fn has_flag(&self, flag: NodeFlags) -> bool {
        self.flags().contains(flag)
    }
}

/// Node kind constants.
///
/// Kept as bare u16 constants rather than an enum so that dispatch sites can
/// match on `node.kind` directly, the same way the front end dispatches on
/// syntax kinds.
pub mod node_kind {
    /// Root of one compilation module; owns top-level declarations.
    pub const MODULE_FRAGMENT: u16 = 1;
    pub const CLASS_DECLARATION: u16 = 2;
    pub const CONSTRUCTOR_DECLARATION: u16 = 3;
    pub const FIELD_DECLARATION: u16 = 4;
    pub const PROPERTY_DECLARATION: u16 = 5;
    pub const ANONYMOUS_INITIALIZER: u16 = 6;
    pub const VALUE_PARAMETER: u16 = 7;

    /// Ordered statement list forming a function/constructor body.
    pub const BLOCK_BODY: u16 = 8;
    pub const DELEGATING_CONSTRUCTOR_CALL: u16 = 9;
    pub const SET_FIELD: u16 = 10;

    pub const GET_FIELD: u16 = 11;
    pub const GET_VALUE: u16 = 12;
    /// Expression-position block; used for inlined initializer blocks.
    pub const BLOCK_EXPRESSION: u16 = 13;
    pub const CALL_EXPRESSION: u16 = 14;
    pub const CONST_EXPRESSION: u16 = 15;
}

// =============================================================================
// Enums shared by the data pools
// =============================================================================

/// Declaration kind of a class-like declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    /// A concrete class; the only kind eligible for constructor synthesis
    /// and the only kind considered during superclass resolution.
    Class,
    Interface,
    Enum,
    Object,
    Annotation,
}

/// Origin marker on statements, so later passes can tell synthesized
/// constructs from source-written ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementOrigin {
    None,
    /// A `SetField` that performs field initialization (as opposed to an
    /// ordinary assignment somewhere in a body).
    InitializeField,
    /// A block cloned out of an anonymous initializer by a lowering pass.
    SynthesizedInitBlock,
}

/// Origin marker on value reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueOrigin {
    None,
    /// The read is the canonical "initialize this property from the
    /// constructor parameter of the same name" pattern produced by the
    /// front end. Such initializers are handled by parameter binding and
    /// must never be replayed a second time.
    InitializePropertyFromParameter,
}

/// A type in the arena's type pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TyData {
    Unit,
    /// The default type of a class declaration.
    Class(NodeIndex),
}

/// Compile-time constant values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConstValue {
    Int(i64),
    Boolean(bool),
    Str(String),
}

// =============================================================================
// Typed data pools
// =============================================================================

/// Data for a module fragment (one compilation unit).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModuleData {
    pub name: String,
    pub declarations: NodeList,
}

/// Data for a class declaration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassData {
    pub name: String,
    pub kind: ClassKind,
    /// Declared supertypes. At most one of these may be a class kind;
    /// see [`crate::IrArena::resolve_super_class`].
    pub super_types: Vec<TypeId>,
    /// Members in declaration order: constructors, fields, properties,
    /// anonymous initializers, nested classes.
    pub members: NodeList,
    /// Resolved declaration-level annotations, as fully-qualified names.
    pub annotations: Vec<String>,
    /// The implicit `this` receiver parameter of instance members.
    pub this_receiver: NodeIndex,
    /// The type naming this class itself.
    pub default_type: TypeId,
}

/// Data for a constructor declaration.
///
/// The primary flag and the synthesized flag live in the node header
/// (`NodeFlags::PRIMARY`, `NodeFlags::SYNTHESIZED`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConstructorData {
    /// Owning class.
    pub parent: NodeIndex,
    /// Value parameters in declaration order.
    pub parameters: NodeList,
    /// `BLOCK_BODY` node, or NONE for builtin/bodiless constructors.
    pub body: NodeIndex,
    /// Resolved annotations, as fully-qualified names.
    pub annotations: Vec<String>,
    pub return_type: TypeId,
}

/// Data for a field declaration (the backing storage of a property, or a
/// standalone field).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldData {
    pub name: String,
    /// Owning class.
    pub parent: NodeIndex,
    pub field_type: TypeId,
    /// Initializer expression, or NONE.
    pub initializer: NodeIndex,
    /// Back-reference to the property this field backs, or NONE.
    pub corresponding_property: NodeIndex,
}

/// Data for a property declaration. Properties themselves carry no code;
/// initialization semantics live on the backing field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertyData {
    pub name: String,
    /// Backing field, or NONE for computed properties.
    pub backing_field: NodeIndex,
    pub annotations: Vec<String>,
}

/// Data for an anonymous initializer block attached to a class body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnonymousInitializerData {
    /// Owning class.
    pub parent: NodeIndex,
    /// `BLOCK_BODY` with the block's statements.
    pub body: NodeIndex,
}

/// Data for a value parameter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValueParameterData {
    pub name: String,
    pub param_type: TypeId,
    /// Default value expression, or NONE.
    pub default_value: NodeIndex,
}

/// Data for a statement-list body.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BlockBodyData {
    pub statements: NodeList,
}

/// Data for a delegating constructor call (the first statement of a
/// constructor body, invoking a superclass constructor).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DelegatingCallData {
    /// Target constructor declaration.
    pub target: NodeIndex,
    /// Arity of the call. No explicit argument expressions are carried;
    /// unfilled slots fall back to the target's parameter defaults.
    pub value_argument_count: u32,
}

/// Data for a field store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetFieldData {
    /// Target field declaration.
    pub field: NodeIndex,
    /// Receiver expression (the instance), or NONE for static fields.
    pub receiver: NodeIndex,
    pub value: NodeIndex,
    pub origin: StatementOrigin,
}

/// Data for a field load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetFieldData {
    /// Source field declaration.
    pub field: NodeIndex,
    /// Receiver expression, or NONE for static fields.
    pub receiver: NodeIndex,
}

/// Data for a read of a value declaration (parameter or receiver).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetValueData {
    /// The value declaration being read.
    pub target: NodeIndex,
    pub origin: ValueOrigin,
}

/// Data for an expression-position block.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockExpressionData {
    pub statements: NodeList,
    pub origin: StatementOrigin,
}

/// Data for a plain call expression. The callee is kept by name; call
/// resolution is a front-end concern and this pass never inspects it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallData {
    pub callee: String,
    pub arguments: NodeList,
}

/// Data for a constant expression.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConstData {
    pub value: ConstValue,
}
