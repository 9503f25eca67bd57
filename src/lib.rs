// Copyright 2025 the dotid authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dotid
//!
//! Parse and inspect .NET assembly-qualified type-name strings — for example
//! `` NS.Generic`2[[NS.A],[NS.B]], Component, Version=1.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089 ``
//! — into an immutable, structurally-shared tree, *without ever resolving or
//! loading the named type or component*. The crate exists so a
//! deserialization layer can inspect, filter, or rewrite the identity a
//! payload claims to have before any unsafe type activation occurs.
//!
//! ## Features
//!
//! - **Hardened parsing** - a shared recursion/complexity bound is the sole,
//!   deliberate defense against adversarial nesting; no timeouts, no partial
//!   results, fail-fast everywhere
//! - **Strict identifiers** - fixed ASCII allow tables plus an opt-in
//!   Unicode general-category filter close confusable and
//!   resource-exhaustion loopholes
//! - **Immutable trees** - cheap-clone, reference-counted nodes safe to
//!   share across threads without synchronization
//! - **DoS-resistant hashing** - structural hash codes seeded randomly once
//!   per process, safe for dictionaries keyed by attacker-influenced data
//! - **Rewriting visitor** - default-recursive traversal that rebuilds only
//!   what changed, for allow-listing and identity rewriting
//!
//! ## Quick Start
//!
//! ```rust
//! use dotid::prelude::*;
//!
//! let options = ParseOptions::default();
//! let parsed = TypeIdentity::parse_assembly_qualified_name(
//!     "System.Collections.Generic.List`1[[System.Int32]], mscorlib",
//!     &options,
//! )?;
//!
//! assert!(parsed.is_constructed_generic());
//! assert_eq!(parsed.component().unwrap().name(), "mscorlib");
//! assert_eq!(parsed.total_complexity(), 3);
//! # Ok::<(), dotid::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`identity`] - component ("assembly") identity: names, versions,
//!   cultures, public key tokens, and the component full-name parser
//! - [`typename`] - the type-name grammar, the bounded recursive-descent
//!   parser, the [`TypeIdentity`] tree and its builders, and the
//!   [`TypeIdentityVisitor`] rewriting traversal
//! - [`TypeNameBinder`] - the adapter that gates untrusted
//!   `(component_name, type_name)` pairs behind a caller-supplied decision
//! - [`Error`] and [`Result`] - one taxonomy for every failure
//!
//! ## Security Model
//!
//! Input is assumed attacker-controlled. Parsing is purely functional over
//! the input string: no I/O, no blocking, no shared mutable state, and
//! bounded stack depth and total work enforced by
//! [`ParseOptions::max_recursive_depth`]. Nothing in this crate resolves,
//! loads, or activates a type; policy decisions belong to the caller's
//! visitor or binding callback. Hash codes are randomized per process and
//! must never be persisted or compared across processes.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result):
//!
//! ```rust
//! use dotid::{Error, ParseOptions, TypeIdentity};
//!
//! match TypeIdentity::parse_assembly_qualified_name("Foo[", &ParseOptions::default()) {
//!     Ok(parsed) => println!("parsed {}", parsed),
//!     Err(Error::RecursionLimit(max)) => println!("nested deeper than {}", max),
//!     Err(Error::Malformed { message, .. }) => println!("bad input: {}", message),
//!     Err(e) => println!("other error: {}", e),
//! }
//! ```

#[macro_use]
pub(crate) mod error;

pub(crate) mod cache;
pub(crate) mod hash;
pub(crate) mod options;

/// Convenient re-exports of the most commonly used types and traits.
pub mod prelude;

/// Component ("assembly") identity values and their parser.
pub mod identity;

/// The type-name grammar: parser, tree model, and visitor.
pub mod typename;

pub(crate) mod binding;

pub use binding::{BindingDecision, TypeNameBinder, TypeResolver};
pub use error::Error;
pub use identity::{ComponentIdentity, ComponentVersion, KeyToken, NEUTRAL_CULTURE};
pub use options::{ParseOptions, DEFAULT_MAX_RECURSIVE_DEPTH};
pub use typename::{TypeIdentity, TypeIdentityVisitor, TypeShape, MAX_ARRAY_RANK};

/// The result type used throughout dotid.
pub type Result<T> = std::result::Result<T, Error>;
