//! Default-recursive rewriting visitor over a parsed type tree.
//!
//! [`TypeIdentityVisitor`] is the supported mechanism for rewriting an
//! already-parsed identity (replacing a component's key token, mapping type
//! names against an allow list, rejecting a subtree outright) without going
//! back to text. Every non-elemental default method recurses into its child
//! node(s) and rebuilds the wrapper only when a child handle actually
//! changed; untouched subtrees come back reference-identical, preserving
//! structural sharing.
//!
//! A caller typically overrides exactly one method and inherits correct
//! traversal everywhere else. Each shape-specific method checks the shape of
//! its argument and fails with [`crate::Error::ShapeMisuse`] when invoked on
//! the wrong node, so a misrouted override surfaces immediately instead of
//! corrupting the rewrite.

use crate::identity::ComponentIdentity;
use crate::typename::{TypeIdentity, TypeShape};
use crate::Result;

/// A transform over a [`TypeIdentity`] tree.
///
/// # Examples
///
/// Rewriting every elemental `System.Int32` to `System.Int64`:
///
/// ```rust
/// use dotid::{ParseOptions, Result, TypeIdentity, TypeIdentityVisitor};
///
/// struct WidenInt32;
///
/// impl TypeIdentityVisitor for WidenInt32 {
///     fn visit_elemental_type(&mut self, identity: &TypeIdentity) -> Result<TypeIdentity> {
///         if identity.name() == "System.Int32" {
///             TypeIdentity::from_name("System.Int64", &ParseOptions::default())
///         } else {
///             Ok(identity.clone())
///         }
///     }
/// }
///
/// let options = ParseOptions::default();
/// let parsed = TypeIdentity::parse_assembly_qualified_name(
///     "Map`2[[System.Int32],[System.Int32[]]]",
///     &options,
/// )?;
/// let rewritten = WidenInt32.visit_type(&parsed)?;
/// assert_eq!(rewritten.name(), "Map`2[[System.Int64],[System.Int64[]]]");
/// # Ok::<(), dotid::Error>(())
/// ```
pub trait TypeIdentityVisitor {
    /// Dispatches to the shape-specific method for this node.
    fn visit_type(&mut self, identity: &TypeIdentity) -> Result<TypeIdentity> {
        match identity.shape() {
            TypeShape::Elemental => self.visit_elemental_type(identity),
            TypeShape::SzArray { .. } | TypeShape::MdArray { .. } => {
                self.visit_array_type(identity)
            }
            TypeShape::ManagedPointer { .. } => self.visit_managed_pointer_type(identity),
            TypeShape::UnmanagedPointer { .. } => self.visit_unmanaged_pointer_type(identity),
            TypeShape::ConstructedGeneric { .. } => self.visit_constructed_generic_type(identity),
        }
    }

    /// Visits an array node of either flavor.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] if the node is not an array.
    fn visit_array_type(&mut self, identity: &TypeIdentity) -> Result<TypeIdentity> {
        match identity.shape() {
            TypeShape::SzArray { .. } => self.visit_sz_array_type(identity),
            TypeShape::MdArray { .. } => self.visit_variable_bound_array_type(identity),
            _ => Err(crate::Error::ShapeMisuse(
                "visit_array_type requires an array node".into(),
            )),
        }
    }

    /// Visits a single-dimensional, zero-indexed array node.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] if the node is not an szarray.
    fn visit_sz_array_type(&mut self, identity: &TypeIdentity) -> Result<TypeIdentity> {
        let TypeShape::SzArray { element } = identity.shape() else {
            return Err(crate::Error::ShapeMisuse(
                "visit_sz_array_type requires an szarray node".into(),
            ));
        };

        let visited = self.visit_type(element)?;
        if visited.ptr_eq(element) {
            Ok(identity.clone())
        } else {
            visited.make_sz_array_type()
        }
    }

    /// Visits a variable-bound array node.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] if the node is not a
    /// variable-bound array.
    fn visit_variable_bound_array_type(&mut self, identity: &TypeIdentity) -> Result<TypeIdentity> {
        let TypeShape::MdArray { element, rank } = identity.shape() else {
            return Err(crate::Error::ShapeMisuse(
                "visit_variable_bound_array_type requires a variable-bound array node".into(),
            ));
        };

        let visited = self.visit_type(element)?;
        if visited.ptr_eq(element) {
            Ok(identity.clone())
        } else {
            visited.make_variable_bound_array_type(*rank)
        }
    }

    /// Visits a managed pointer node.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] if the node is not a managed
    /// pointer.
    fn visit_managed_pointer_type(&mut self, identity: &TypeIdentity) -> Result<TypeIdentity> {
        let TypeShape::ManagedPointer { pointee } = identity.shape() else {
            return Err(crate::Error::ShapeMisuse(
                "visit_managed_pointer_type requires a managed pointer node".into(),
            ));
        };

        let visited = self.visit_type(pointee)?;
        if visited.ptr_eq(pointee) {
            Ok(identity.clone())
        } else {
            visited.make_managed_pointer_type()
        }
    }

    /// Visits an unmanaged pointer node.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] if the node is not an unmanaged
    /// pointer.
    fn visit_unmanaged_pointer_type(&mut self, identity: &TypeIdentity) -> Result<TypeIdentity> {
        let TypeShape::UnmanagedPointer { pointee } = identity.shape() else {
            return Err(crate::Error::ShapeMisuse(
                "visit_unmanaged_pointer_type requires an unmanaged pointer node".into(),
            ));
        };

        let visited = self.visit_type(pointee)?;
        if visited.ptr_eq(pointee) {
            Ok(identity.clone())
        } else {
            visited.make_unmanaged_pointer_type()
        }
    }

    /// Visits a constructed-generic node: the definition first, then every
    /// argument in order.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] if the node is not a
    /// constructed generic.
    fn visit_constructed_generic_type(&mut self, identity: &TypeIdentity) -> Result<TypeIdentity> {
        let TypeShape::ConstructedGeneric {
            definition,
            arguments,
        } = identity.shape()
        else {
            return Err(crate::Error::ShapeMisuse(
                "visit_constructed_generic_type requires a constructed generic node".into(),
            ));
        };

        let visited_definition = self.visit_type(definition)?;
        let mut changed = !visited_definition.ptr_eq(definition);

        let mut visited_arguments = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let visited = self.visit_type(argument)?;
            changed |= !visited.ptr_eq(argument);
            visited_arguments.push(visited);
        }

        if changed {
            visited_definition.make_generic_type(&visited_arguments)
        } else {
            Ok(identity.clone())
        }
    }

    /// Visits an elemental node. The default recurses only into the node's
    /// optional component identity.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMisuse`] if the node is not elemental.
    fn visit_elemental_type(&mut self, identity: &TypeIdentity) -> Result<TypeIdentity> {
        if !identity.is_elemental() {
            return Err(crate::Error::ShapeMisuse(
                "visit_elemental_type requires an elemental node".into(),
            ));
        }

        let visited = self.visit_component(identity.component())?;
        if visited.as_ref() == identity.component() {
            Ok(identity.clone())
        } else {
            identity.with_component(visited)
        }
    }

    /// Visits the component identity attached to an elemental node. The
    /// default returns it unchanged.
    ///
    /// # Errors
    /// The default never fails; overrides may.
    fn visit_component(
        &mut self,
        component: Option<&ComponentIdentity>,
    ) -> Result<Option<ComponentIdentity>> {
        Ok(component.cloned())
    }
}
