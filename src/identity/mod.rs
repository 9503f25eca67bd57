//! Component ("assembly") identity: names, versions, cultures, key tokens.
//!
//! This module owns everything on the component side of an
//! assembly-qualified type name: the character-level identifier validation
//! shared with the type-name parser, the strict version/culture/key-token
//! value types, and the parser that turns a component full name into a
//! structured [`ComponentIdentity`].
//!
//! Nothing in here resolves or loads a component. The values are identity
//! only, suitable for inspection, filtering and rewriting before any
//! type-activation decision is made elsewhere.

mod component;
mod culture;
mod keytoken;
mod parser;
pub(crate) mod restrictor;
mod version;

pub use component::ComponentIdentity;
pub use culture::NEUTRAL_CULTURE;
pub use keytoken::KeyToken;
pub use version::ComponentVersion;
