//! The immutable type-identity tree.
//!
//! A [`TypeIdentity`] is the parsed form of a type-name string such as
//! ``System.Collections.Generic.List`1[[System.Int32]][]``. Each node is one
//! of six shapes (elemental, two array flavors, two pointer flavors,
//! constructed generic) and carries its grammar-level display name, an
//! optional defining-component identity, and a running complexity count that
//! bounds the work of any later traversal.
//!
//! Nodes are immutable and reference counted: cloning a [`TypeIdentity`] is a
//! pointer copy, wrap operations share their children rather than copying
//! them, and nothing here requires synchronization to read across threads.
//! Equality is structural; hashing is randomized per process so parsed
//! identities are safe dictionary keys over attacker-influenced data.

mod parser;
mod visitor;

pub use visitor::TypeIdentityVisitor;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::hash::{HashKind, RandomizedHash};
use crate::identity::restrictor::ensure_valid_type_name;
use crate::identity::ComponentIdentity;
use crate::options::ParseOptions;
use crate::Result;

/// Largest permitted rank for a variable-bound array.
pub const MAX_ARRAY_RANK: u32 = 32;

/// The shape of one [`TypeIdentity`] node.
///
/// Child handles are shared with whatever nodes were passed in at
/// construction, so matching on a shape never copies a subtree.
#[derive(Debug, Clone)]
pub enum TypeShape {
    /// A bare name with no array/pointer/generic wrapping.
    Elemental,
    /// A single-dimensional, zero-indexed array of the element type.
    SzArray {
        /// The element type.
        element: TypeIdentity,
    },
    /// A variable-bound (multi-dimensional) array of the element type.
    MdArray {
        /// The element type.
        element: TypeIdentity,
        /// Number of dimensions, between 1 and [`MAX_ARRAY_RANK`].
        rank: u32,
    },
    /// A managed pointer (byref) to the pointee. Always outermost.
    ManagedPointer {
        /// The pointee type.
        pointee: TypeIdentity,
    },
    /// An unmanaged pointer to the pointee.
    UnmanagedPointer {
        /// The pointee type.
        pointee: TypeIdentity,
    },
    /// A generic type definition instantiated with a full argument list.
    ConstructedGeneric {
        /// The generic type definition being instantiated.
        definition: TypeIdentity,
        /// The generic arguments, exactly matching the definition's arity.
        arguments: Vec<TypeIdentity>,
    },
}

#[derive(Debug)]
struct Node {
    name: Arc<str>,
    component: Option<Arc<ComponentIdentity>>,
    shape: TypeShape,
    total_complexity: usize,
}

/// An immutable, structurally-shared type identity.
///
/// Created only by parsing or by the explicit builder operations below;
/// never mutated afterwards. The handle itself is a cheap reference-counted
/// pointer, and [`TypeIdentity::ptr_eq`] exposes handle identity so
/// rewriting code can skip reallocating untouched subtrees.
///
/// # Examples
///
/// ```rust
/// use dotid::{ParseOptions, TypeIdentity};
///
/// let parsed = TypeIdentity::parse_assembly_qualified_name(
///     "System.Int32[], mscorlib",
///     &ParseOptions::default(),
/// )?;
/// assert!(parsed.is_sz_array());
/// assert_eq!(parsed.name(), "System.Int32[]");
/// assert_eq!(parsed.component().unwrap().name(), "mscorlib");
/// assert_eq!(parsed.total_complexity(), 2);
/// # Ok::<(), dotid::Error>(())
/// ```
#[derive(Clone)]
pub struct TypeIdentity {
    inner: Arc<Node>,
}

impl TypeIdentity {
    /// Parses a full assembly-qualified type-name string.
    ///
    /// This is the main entry point. The entire input must be consumed;
    /// trailing characters, including whitespace, fail the parse.
    ///
    /// # Errors
    /// Any grammar violation, disallowed identifier, depth-limit hit or
    /// arity mismatch aborts with the corresponding [`crate::Error`].
    pub fn parse_assembly_qualified_name(input: &str, options: &ParseOptions) -> Result<Self> {
        parser::parse_assembly_qualified_name(input, options)
    }

    /// Parses a type-name string that must not carry a top-level component
    /// qualifier. Generic arguments inside brackets may still be qualified.
    pub(crate) fn parse_unqualified_name(input: &str, options: &ParseOptions) -> Result<Self> {
        parser::parse_unqualified_type_name(input, options)
    }

    /// Creates an elemental identity from a bare type name, with no
    /// defining component.
    ///
    /// # Errors
    /// Fails if the name does not pass type-name validation.
    pub fn from_name(name: &str, options: &ParseOptions) -> Result<Self> {
        ensure_valid_type_name(name, options)?;
        Ok(TypeIdentity::elemental(Arc::from(name), None))
    }

    pub(crate) fn elemental(name: Arc<str>, component: Option<Arc<ComponentIdentity>>) -> Self {
        TypeIdentity {
            inner: Arc::new(Node {
                name,
                component,
                shape: TypeShape::Elemental,
                total_complexity: 1,
            }),
        }
    }

    /// The grammar-level display name, including any decorator suffixes and
    /// bracketed generic-argument text.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The defining-component identity, if the type name was qualified.
    #[must_use]
    pub fn component(&self) -> Option<&ComponentIdentity> {
        self.inner.component.as_deref()
    }

    /// The shape of this node.
    #[must_use]
    pub fn shape(&self) -> &TypeShape {
        &self.inner.shape
    }

    /// Count of nodes a full traversal of this identity would visit.
    #[must_use]
    pub fn total_complexity(&self) -> usize {
        self.inner.total_complexity
    }

    /// Whether two handles refer to the same node allocation.
    ///
    /// Handle identity implies structural equality but not vice versa; the
    /// visitor uses this to rebuild wrappers only when a child was actually
    /// replaced.
    #[must_use]
    pub fn ptr_eq(&self, other: &TypeIdentity) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether this node is elemental.
    #[must_use]
    pub fn is_elemental(&self) -> bool {
        matches!(self.inner.shape, TypeShape::Elemental)
    }

    /// Whether this node is an array of either flavor.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(
            self.inner.shape,
            TypeShape::SzArray { .. } | TypeShape::MdArray { .. }
        )
    }

    /// Whether this node is a single-dimensional, zero-indexed array.
    #[must_use]
    pub fn is_sz_array(&self) -> bool {
        matches!(self.inner.shape, TypeShape::SzArray { .. })
    }

    /// Whether this node is a variable-bound array.
    #[must_use]
    pub fn is_variable_bound_array(&self) -> bool {
        matches!(self.inner.shape, TypeShape::MdArray { .. })
    }

    /// Whether this node is a managed pointer (byref).
    #[must_use]
    pub fn is_managed_pointer(&self) -> bool {
        matches!(self.inner.shape, TypeShape::ManagedPointer { .. })
    }

    /// Whether this node is an unmanaged pointer.
    #[must_use]
    pub fn is_unmanaged_pointer(&self) -> bool {
        matches!(self.inner.shape, TypeShape::UnmanagedPointer { .. })
    }

    /// Whether this node is a constructed generic.
    #[must_use]
    pub fn is_constructed_generic(&self) -> bool {
        matches!(self.inner.shape, TypeShape::ConstructedGeneric { .. })
    }

    /// The element type of an array node or the pointee of a pointer node.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] for elemental and
    /// constructed-generic nodes.
    pub fn underlying_type(&self) -> Result<&TypeIdentity> {
        match &self.inner.shape {
            TypeShape::SzArray { element } | TypeShape::MdArray { element, .. } => Ok(element),
            TypeShape::ManagedPointer { pointee } | TypeShape::UnmanagedPointer { pointee } => {
                Ok(pointee)
            }
            TypeShape::Elemental | TypeShape::ConstructedGeneric { .. } => Err(
                crate::Error::ShapeMisuse("type has no underlying type".into()),
            ),
        }
    }

    /// The rank of an array node (1 for a single-dimensional array).
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] for non-array nodes.
    pub fn array_rank(&self) -> Result<u32> {
        match &self.inner.shape {
            TypeShape::SzArray { .. } => Ok(1),
            TypeShape::MdArray { rank, .. } => Ok(*rank),
            _ => Err(crate::Error::ShapeMisuse("type is not an array".into())),
        }
    }

    /// The generic type definition of a constructed-generic node.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] for other shapes.
    pub fn generic_definition(&self) -> Result<&TypeIdentity> {
        match &self.inner.shape {
            TypeShape::ConstructedGeneric { definition, .. } => Ok(definition),
            _ => Err(crate::Error::ShapeMisuse(
                "type is not a constructed generic".into(),
            )),
        }
    }

    /// The generic arguments of a constructed-generic node.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] for other shapes.
    pub fn generic_arguments(&self) -> Result<&[TypeIdentity]> {
        match &self.inner.shape {
            TypeShape::ConstructedGeneric { arguments, .. } => Ok(arguments),
            _ => Err(crate::Error::ShapeMisuse(
                "type is not a constructed generic".into(),
            )),
        }
    }

    /// The heuristic generic arity declared by this node's name, or `None`
    /// when the name does not look like a generic type definition.
    ///
    /// String-only: splits on the nested-type separator `+` and sums the
    /// backtick arities of the segments, with no resolution attempted.
    #[must_use]
    pub fn likely_generic_arity(&self) -> Option<usize> {
        if !self.is_elemental() {
            return None;
        }
        likely_generic_arity_of_name(&self.inner.name)
    }

    fn ensure_not_managed_pointer(&self, operation: &str) -> Result<()> {
        if self.is_managed_pointer() {
            return Err(crate::Error::ShapeMisuse(format!(
                "cannot apply {operation} to a managed pointer type"
            )));
        }
        Ok(())
    }

    fn wrapped_complexity(&self) -> Result<usize> {
        self.inner
            .total_complexity
            .checked_add(1)
            .ok_or_else(|| malformed_error!("Type complexity overflow"))
    }

    /// Wraps this identity in a single-dimensional, zero-indexed array.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] when applied to a managed
    /// pointer.
    pub fn make_sz_array_type(&self) -> Result<TypeIdentity> {
        self.ensure_not_managed_pointer("an array shape")?;
        Ok(TypeIdentity {
            inner: Arc::new(Node {
                name: Arc::from(format!("{}[]", self.inner.name)),
                component: self.inner.component.clone(),
                shape: TypeShape::SzArray {
                    element: self.clone(),
                },
                total_complexity: self.wrapped_complexity()?,
            }),
        })
    }

    /// Wraps this identity in a variable-bound array of the given rank.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] when applied to a managed
    /// pointer or when the rank is outside `1..=32`.
    pub fn make_variable_bound_array_type(&self, rank: u32) -> Result<TypeIdentity> {
        self.ensure_not_managed_pointer("an array shape")?;
        if !(1..=MAX_ARRAY_RANK).contains(&rank) {
            return Err(crate::Error::ShapeMisuse(format!(
                "array rank {rank} is outside 1..={MAX_ARRAY_RANK}"
            )));
        }

        let suffix = if rank == 1 {
            "[*]".to_string()
        } else {
            format!("[{}]", ",".repeat(rank as usize - 1))
        };
        Ok(TypeIdentity {
            inner: Arc::new(Node {
                name: Arc::from(format!("{}{}", self.inner.name, suffix)),
                component: self.inner.component.clone(),
                shape: TypeShape::MdArray {
                    element: self.clone(),
                    rank,
                },
                total_complexity: self.wrapped_complexity()?,
            }),
        })
    }

    /// Wraps this identity in a managed pointer (byref).
    ///
    /// The result cannot be wrapped any further.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] when applied to a managed
    /// pointer.
    pub fn make_managed_pointer_type(&self) -> Result<TypeIdentity> {
        self.ensure_not_managed_pointer("a pointer shape")?;
        Ok(TypeIdentity {
            inner: Arc::new(Node {
                name: Arc::from(format!("{}&", self.inner.name)),
                component: self.inner.component.clone(),
                shape: TypeShape::ManagedPointer {
                    pointee: self.clone(),
                },
                total_complexity: self.wrapped_complexity()?,
            }),
        })
    }

    /// Wraps this identity in an unmanaged pointer.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] when applied to a managed
    /// pointer.
    pub fn make_unmanaged_pointer_type(&self) -> Result<TypeIdentity> {
        self.ensure_not_managed_pointer("a pointer shape")?;
        Ok(TypeIdentity {
            inner: Arc::new(Node {
                name: Arc::from(format!("{}*", self.inner.name)),
                component: self.inner.component.clone(),
                shape: TypeShape::UnmanagedPointer {
                    pointee: self.clone(),
                },
                total_complexity: self.wrapped_complexity()?,
            }),
        })
    }

    /// Instantiates this generic type definition with the given arguments.
    ///
    /// The argument count must exactly match the arity declared by the
    /// name's backtick suffix (see [`TypeIdentity::likely_generic_arity`]).
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] when this node is not
    /// elemental, or [`crate::Error::ArityMismatch`] when the count differs
    /// from the declared arity.
    pub fn make_generic_type(&self, arguments: &[TypeIdentity]) -> Result<TypeIdentity> {
        if !self.is_elemental() {
            return Err(crate::Error::ShapeMisuse(
                "only an elemental type can be a generic type definition".into(),
            ));
        }

        let expected = likely_generic_arity_of_name(&self.inner.name).unwrap_or(0);
        if expected == 0 || expected != arguments.len() {
            return Err(crate::Error::ArityMismatch {
                expected,
                actual: arguments.len(),
            });
        }

        let mut total_complexity: usize = 2;
        let mut name = String::with_capacity(self.inner.name.len() + 16);
        name.push_str(&self.inner.name);
        name.push_str("[[");
        for (index, argument) in arguments.iter().enumerate() {
            total_complexity = total_complexity
                .checked_add(argument.inner.total_complexity)
                .ok_or_else(|| malformed_error!("Type complexity overflow"))?;
            if index > 0 {
                name.push_str("],[");
            }
            argument.write_assembly_qualified_name(&mut name);
        }
        name.push_str("]]");

        Ok(TypeIdentity {
            inner: Arc::new(Node {
                name: Arc::from(name),
                component: self.inner.component.clone(),
                shape: TypeShape::ConstructedGeneric {
                    definition: self.clone(),
                    arguments: arguments.to_vec(),
                },
                total_complexity,
            }),
        })
    }

    /// Returns a copy of this identity whose base type carries the given
    /// component identity instead of its current one.
    ///
    /// Decorator wrappers are peeled off, the base (elemental or constructed
    /// generic) is re-based onto the new component, and the decorators are
    /// replayed in their original order.
    ///
    /// # Errors
    /// Fails only if replaying a decorator fails, which cannot happen for a
    /// tree built through the public constructors.
    pub fn with_component(&self, component: Option<ComponentIdentity>) -> Result<TypeIdentity> {
        let component = component.map(Arc::new);
        self.rebase_component(&component)
    }

    fn rebase_component(&self, component: &Option<Arc<ComponentIdentity>>) -> Result<TypeIdentity> {
        match &self.inner.shape {
            TypeShape::Elemental => Ok(TypeIdentity::elemental(
                Arc::clone(&self.inner.name),
                component.clone(),
            )),
            TypeShape::SzArray { element } => {
                element.rebase_component(component)?.make_sz_array_type()
            }
            TypeShape::MdArray { element, rank } => element
                .rebase_component(component)?
                .make_variable_bound_array_type(*rank),
            TypeShape::ManagedPointer { pointee } => pointee
                .rebase_component(component)?
                .make_managed_pointer_type(),
            TypeShape::UnmanagedPointer { pointee } => pointee
                .rebase_component(component)?
                .make_unmanaged_pointer_type(),
            TypeShape::ConstructedGeneric {
                definition,
                arguments,
            } => definition
                .rebase_component(component)?
                .make_generic_type(arguments),
        }
    }

    fn write_assembly_qualified_name(&self, out: &mut String) {
        out.push_str(&self.inner.name);
        if let Some(component) = &self.inner.component {
            out.push_str(", ");
            out.push_str(&component.to_string());
        }
    }

    /// The assembly-qualified form: the display name, followed by the
    /// component full name when one is present.
    #[must_use]
    pub fn assembly_qualified_name(&self) -> String {
        let mut out = String::with_capacity(self.inner.name.len());
        self.write_assembly_qualified_name(&mut out);
        out
    }

    pub(crate) fn randomized_hash(&self) -> u64 {
        let mut hasher = match &self.inner.shape {
            TypeShape::Elemental => RandomizedHash::with_kind(HashKind::ElementalType),
            TypeShape::SzArray { .. } | TypeShape::MdArray { .. } => {
                RandomizedHash::with_kind(HashKind::ArrayType)
            }
            TypeShape::ManagedPointer { .. } | TypeShape::UnmanagedPointer { .. } => {
                RandomizedHash::with_kind(HashKind::PointerType)
            }
            TypeShape::ConstructedGeneric { .. } => {
                RandomizedHash::with_kind(HashKind::ConstructedGenericType)
            }
        };

        match &self.inner.shape {
            TypeShape::Elemental => {
                hasher.add_str(&self.inner.name);
                match &self.inner.component {
                    Some(component) => hasher.add_u64(component.randomized_hash()),
                    None => hasher.add_u64(0),
                }
            }
            TypeShape::SzArray { element } => {
                hasher.add_u64(0);
                hasher.add_u64(element.randomized_hash());
            }
            TypeShape::MdArray { element, rank } => {
                hasher.add_u64(u64::from(*rank));
                hasher.add_u64(element.randomized_hash());
            }
            TypeShape::ManagedPointer { pointee } => {
                hasher.add_u64(1);
                hasher.add_u64(pointee.randomized_hash());
            }
            TypeShape::UnmanagedPointer { pointee } => {
                hasher.add_u64(2);
                hasher.add_u64(pointee.randomized_hash());
            }
            TypeShape::ConstructedGeneric {
                definition,
                arguments,
            } => {
                hasher.add_u64(definition.randomized_hash());
                hasher.add_u64(arguments.len() as u64);
                for argument in arguments {
                    hasher.add_u64(argument.randomized_hash());
                }
            }
        }

        hasher.finish()
    }
}

/// Heuristic generic arity of a bare type name.
///
/// Splits on `+` and, per segment, accepts an optional trailing backtick
/// followed by a decimal arity with no leading zero. A backtick may open a
/// nested segment (``A+`2``) but never the whole name. Overflow or a
/// malformed suffix means "not a generic definition".
fn likely_generic_arity_of_name(name: &str) -> Option<usize> {
    if name.starts_with('`') {
        return None;
    }

    let mut total: i32 = 0;
    for segment in name.split('+') {
        let Some(tick) = segment.find('`') else {
            continue;
        };
        let digits = &segment[tick + 1..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return None;
        }
        let arity: i32 = digits.parse().ok()?;
        total = total.checked_add(arity)?;
    }

    if total > 0 {
        Some(total as usize)
    } else {
        None
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.assembly_qualified_name())
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeIdentity")
            .field("name", &self.inner.name)
            .field("component", &self.inner.component)
            .field("total_complexity", &self.inner.total_complexity)
            .finish_non_exhaustive()
    }
}

impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.inner.total_complexity != other.inner.total_complexity
            || self.inner.name != other.inner.name
            || self.inner.component.as_deref() != other.inner.component.as_deref()
        {
            return false;
        }

        match (&self.inner.shape, &other.inner.shape) {
            (TypeShape::Elemental, TypeShape::Elemental) => true,
            (TypeShape::SzArray { element: a }, TypeShape::SzArray { element: b }) => a == b,
            (
                TypeShape::MdArray {
                    element: a,
                    rank: ra,
                },
                TypeShape::MdArray {
                    element: b,
                    rank: rb,
                },
            ) => ra == rb && a == b,
            (TypeShape::ManagedPointer { pointee: a }, TypeShape::ManagedPointer { pointee: b })
            | (
                TypeShape::UnmanagedPointer { pointee: a },
                TypeShape::UnmanagedPointer { pointee: b },
            ) => a == b,
            (
                TypeShape::ConstructedGeneric {
                    definition: da,
                    arguments: aa,
                },
                TypeShape::ConstructedGeneric {
                    definition: db,
                    arguments: ab,
                },
            ) => da == db && aa == ab,
            _ => false,
        }
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.randomized_hash());
    }
}
