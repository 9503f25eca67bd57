//! # dotid Prelude
//!
//! This module provides a convenient prelude for the most commonly used
//! types and traits from the dotid library. Import this module to get quick
//! access to the essentials for working with parsed type identities.
//!
//! # Example
//!
//! ```rust
//! use dotid::prelude::*;
//!
//! let parsed = TypeIdentity::parse_assembly_qualified_name(
//!     "System.Int32[]",
//!     &ParseOptions::default(),
//! )?;
//! assert!(parsed.is_sz_array());
//! # Ok::<(), dotid::Error>(())
//! ```

/// The main error type for all dotid operations
pub use crate::Error;

/// The result type used throughout dotid
pub use crate::Result;

/// Configuration for the type-name and component-identity parsers
pub use crate::ParseOptions;

/// The parsed, immutable type-identity tree and its shapes
pub use crate::{TypeIdentity, TypeShape};

/// Component identity values
pub use crate::{ComponentIdentity, ComponentVersion, KeyToken};

/// Rewriting traversal over a parsed tree
pub use crate::TypeIdentityVisitor;

/// Untrusted-stream binding adapter and its collaborator traits
pub use crate::{BindingDecision, TypeNameBinder, TypeResolver};
