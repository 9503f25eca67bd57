//! Adapter between an untrusted deserialization stream and the parsers.
//!
//! Binary deserializers hand over a raw `(component_name, type_name)` pair
//! taken straight from the payload. [`TypeNameBinder`] parses both through
//! the hardened parsers, asks a caller-supplied [`BindingDecision`] to
//! approve or rewrite the resulting [`TypeIdentity`] (typically with a
//! [`crate::TypeIdentityVisitor`]), and only then lets a [`TypeResolver`]
//! map the approved identity to something loadable.
//!
//! The supplied component name is authoritative: the type string must not
//! carry its own top-level qualifier, so a payload cannot redirect a type to
//! a component the deserializer did not name. Generic arguments inside
//! brackets keep their own qualifiers; they are part of the type grammar and
//! visible to the decision callback.
//!
//! Rejection is opaque by design: whatever the decision callback did (failed
//! or declined), the untrusted caller sees exactly
//! [`crate::Error::BindingDisallowed`] with no inner detail. Parse failures
//! are reported as themselves; they reveal nothing the attacker did not
//! already supply.

use crate::identity::ComponentIdentity;
use crate::options::ParseOptions;
use crate::typename::TypeIdentity;
use crate::Result;

/// Maps an approved, well-formed [`TypeIdentity`] to a loadable runtime
/// type.
///
/// The core never implements this: it guarantees only that the identity it
/// hands over is well-formed per the grammar, and leaves locating the named
/// component and resolving the simple name within it to the host.
pub trait TypeResolver {
    /// Whatever the host considers a resolved type.
    type Resolved;

    /// Resolves an identity the binder has already approved.
    ///
    /// # Errors
    /// Host-defined.
    fn resolve(&self, identity: &TypeIdentity) -> Result<Self::Resolved>;
}

/// The approval callback a host supplies to a [`TypeNameBinder`].
///
/// Returning `Ok(Some(identity))` approves (and possibly rewrites) the type;
/// `Ok(None)` or any error rejects it.
pub trait BindingDecision {
    /// Inspects one parsed identity from the untrusted stream.
    ///
    /// # Errors
    /// Any error rejects the type; the caller of the binder only ever sees
    /// [`crate::Error::BindingDisallowed`].
    fn bind_to_type(&mut self, identity: &TypeIdentity) -> Result<Option<TypeIdentity>>;
}

impl<F> BindingDecision for F
where
    F: FnMut(&TypeIdentity) -> Result<Option<TypeIdentity>>,
{
    fn bind_to_type(&mut self, identity: &TypeIdentity) -> Result<Option<TypeIdentity>> {
        self(identity)
    }
}

/// Parses untrusted `(component_name, type_name)` pairs and gates them
/// through a [`BindingDecision`].
///
/// # Examples
///
/// ```rust
/// use dotid::{Result, TypeIdentity, TypeNameBinder};
///
/// let mut binder = TypeNameBinder::new(|identity: &TypeIdentity| -> Result<Option<TypeIdentity>> {
///     if identity.name() == "System.Int32" {
///         Ok(Some(identity.clone()))
///     } else {
///         Ok(None)
///     }
/// });
///
/// assert!(binder.bind("mscorlib", "System.Int32").is_ok());
/// assert!(matches!(
///     binder.bind("mscorlib", "System.Diagnostics.Process"),
///     Err(dotid::Error::BindingDisallowed)
/// ));
/// ```
pub struct TypeNameBinder<D> {
    decision: D,
    options: ParseOptions,
}

impl<D: BindingDecision> TypeNameBinder<D> {
    /// Creates a binder with default [`ParseOptions`].
    pub fn new(decision: D) -> Self {
        TypeNameBinder {
            decision,
            options: ParseOptions::default(),
        }
    }

    /// Creates a binder with explicit [`ParseOptions`].
    pub fn with_options(decision: D, options: ParseOptions) -> Self {
        TypeNameBinder { decision, options }
    }

    /// Parses the pair, applies the decision callback, and returns the
    /// approved (possibly rewritten) identity.
    ///
    /// The type string must not carry a top-level component qualifier; the
    /// supplied component name is parsed separately and attached to the
    /// type's base. A type string with its own qualifier fails the parse.
    ///
    /// # Errors
    /// Parse failures surface as themselves; a rejecting or failing decision
    /// callback surfaces as [`crate::Error::BindingDisallowed`].
    pub fn bind(&mut self, component_name: &str, type_name: &str) -> Result<TypeIdentity> {
        let parsed = TypeIdentity::parse_unqualified_name(type_name, &self.options)?;
        let component = ComponentIdentity::parse(component_name, &self.options)?;
        let identity = parsed.with_component(Some(component))?;

        match self.decision.bind_to_type(&identity) {
            Ok(Some(approved)) => Ok(approved),
            Ok(None) | Err(_) => Err(crate::Error::BindingDisallowed),
        }
    }

    /// Like [`TypeNameBinder::bind`], then resolves the approved identity.
    ///
    /// # Errors
    /// As [`TypeNameBinder::bind`], plus whatever the resolver reports.
    pub fn bind_and_resolve<R: TypeResolver>(
        &mut self,
        resolver: &R,
        component_name: &str,
        type_name: &str,
    ) -> Result<R::Resolved> {
        let approved = self.bind(component_name, type_name)?;
        resolver.resolve(&approved)
    }
}
