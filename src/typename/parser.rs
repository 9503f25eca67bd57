//! Recursive-descent parser for assembly-qualified type-name strings.
//!
//! The grammar, processed strictly left to right:
//!
//! ```text
//! TypeName    := Name [GenericArgs] {Decorator} [", " ComponentName]
//! GenericArgs := "[[" TypeName "]" ("," "[" TypeName "]")* "]"
//! Decorator   := "*" | "&" | "[]" | "[*]" | "[" ","+ "]"
//! ```
//!
//! Spaces are tolerated before a name and after every structural character,
//! but never between a name and what follows it. The whole input must be
//! consumed; anything left over, including whitespace, fails the parse.
//!
//! A single [`RecursionCheck`] bounds the whole call tree: it dives once per
//! nested type read and once per decorator. Sibling generic arguments each
//! restart from the depth at which the argument list began, and the maximum
//! depth any sibling reached is restored afterwards, so a decorator written
//! after the argument list is measured against the deepest path through the
//! tree rather than the sum of the siblings. This bound is the only defense
//! against unbounded stack depth and unbounded work on adversarial input;
//! there is deliberately no timeout.

use std::sync::Arc;

use crate::cache::StringCache;
use crate::identity::restrictor::ensure_valid_type_name;
use crate::identity::ComponentIdentity;
use crate::options::ParseOptions;
use crate::typename::TypeIdentity;
use crate::Result;

/// Depth bookkeeping shared across one top-level parse.
///
/// `Copy` so the parser can snapshot the state before a generic argument
/// list and restore a computed maximum afterwards.
#[derive(Debug, Clone, Copy)]
struct RecursionCheck {
    current: usize,
    max: usize,
}

impl RecursionCheck {
    fn new(max: usize) -> Self {
        RecursionCheck { current: 0, max }
    }

    fn dive(&mut self) -> Result<()> {
        self.current += 1;
        if self.current > self.max {
            return Err(crate::Error::RecursionLimit(self.max));
        }
        Ok(())
    }
}

pub(crate) fn parse_assembly_qualified_name(
    input: &str,
    options: &ParseOptions,
) -> Result<TypeIdentity> {
    parse_type_name(input, options, true)
}

/// Like [`parse_assembly_qualified_name`], but a top-level component
/// qualifier is left unconsumed and therefore fails as trailing data.
/// Generic arguments inside brackets may still be qualified.
pub(crate) fn parse_unqualified_type_name(
    input: &str,
    options: &ParseOptions,
) -> Result<TypeIdentity> {
    parse_type_name(input, options, false)
}

fn parse_type_name(
    input: &str,
    options: &ParseOptions,
    allow_qualified: bool,
) -> Result<TypeIdentity> {
    if options.max_recursive_depth == 0 {
        return Err(malformed_error!("max_recursive_depth must be greater than zero"));
    }

    let mut parser = TypeNameParser {
        input,
        options,
        cache: StringCache::new(),
    };
    let mut check = RecursionCheck::new(options.max_recursive_depth);
    let parsed = parser.parse_next_type(&mut check, allow_qualified)?;

    if !parser.input.is_empty() {
        return Err(malformed_error!(
            "Trailing characters after type name: '{}'",
            parser.input
        ));
    }
    Ok(parsed)
}

struct TypeNameParser<'a, 'o> {
    /// Unconsumed remainder of the input.
    input: &'a str,
    options: &'o ParseOptions,
    cache: StringCache,
}

impl<'a> TypeNameParser<'a, '_> {
    fn strip_leading_spaces(&mut self) {
        self.input = self.input.trim_start_matches(' ');
    }

    /// Consumes `expected` and any spaces after it. Returns whether the
    /// character was present.
    fn try_strip_char(&mut self, expected: char) -> bool {
        if let Some(rest) = self.input.strip_prefix(expected) {
            self.input = rest.trim_start_matches(' ');
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.chars().next()
    }

    /// Reads one full `TypeName` production.
    fn parse_next_type(
        &mut self,
        check: &mut RecursionCheck,
        allow_qualified: bool,
    ) -> Result<TypeIdentity> {
        check.dive()?;
        self.strip_leading_spaces();

        let name = self.read_type_name()?;
        let mut result = TypeIdentity::elemental(name, None);

        result = self.try_parse_generic_arguments(result, check)?;
        result = self.parse_decorators(result, check)?;

        if allow_qualified && self.try_strip_char(',') {
            let component_text = self.read_component_name();
            let component = ComponentIdentity::parse(component_text, self.options)?;
            result = result.with_component(Some(component))?;
        }

        Ok(result)
    }

    /// Consumes the elemental name, up to the first structural delimiter.
    fn read_type_name(&mut self) -> Result<Arc<str>> {
        let end = self
            .input
            .find(['[', ']', '&', '*', ','])
            .unwrap_or(self.input.len());
        let name = &self.input[..end];
        ensure_valid_type_name(name, self.options)?;
        self.input = &self.input[end..];
        Ok(self.cache.get_or_intern(name))
    }

    /// Consumes the component name of a qualified type, up to the closing
    /// bracket of the surrounding generic argument (or end of input).
    fn read_component_name(&mut self) -> &'a str {
        let end = self.input.find(']').unwrap_or(self.input.len());
        let text = &self.input[..end];
        self.input = &self.input[end..];
        text
    }

    /// Parses `[[Arg],[Arg]]` if the input opens a generic argument list
    /// here; otherwise leaves the input untouched so the bracket can be
    /// retried as an array decorator.
    fn try_parse_generic_arguments(
        &mut self,
        definition: TypeIdentity,
        check: &mut RecursionCheck,
    ) -> Result<TypeIdentity> {
        let saved = self.input;
        if !self.try_strip_char('[') || self.peek() != Some('[') {
            self.input = saved;
            return Ok(definition);
        }

        // Each sibling argument restarts from the depth at the head of the
        // list; the deepest sibling sets the depth seen by whatever follows.
        let entry = *check;
        let mut deepest = entry.current;
        let mut arguments = Vec::new();

        loop {
            if !self.try_strip_char('[') {
                return Err(malformed_error!("Expected '[' to open a generic argument"));
            }

            let mut sibling = entry;
            arguments.push(self.parse_next_type(&mut sibling, true)?);
            deepest = deepest.max(sibling.current);

            if !self.try_strip_char(']') {
                return Err(malformed_error!("Unterminated generic argument"));
            }

            if self.try_strip_char(',') {
                continue;
            }
            if self.try_strip_char(']') {
                break;
            }
            return Err(malformed_error!("Malformed generic argument list"));
        }

        check.current = deepest;
        definition.make_generic_type(&arguments)
    }

    /// Parses zero or more `*` / `&` / array decorators, wrapping as it goes.
    fn parse_decorators(
        &mut self,
        mut result: TypeIdentity,
        check: &mut RecursionCheck,
    ) -> Result<TypeIdentity> {
        loop {
            if self.try_strip_char('*') {
                check.dive()?;
                self.ensure_decoratable(&result)?;
                result = result.make_unmanaged_pointer_type()?;
            } else if self.try_strip_char('&') {
                check.dive()?;
                self.ensure_decoratable(&result)?;
                result = result.make_managed_pointer_type()?;
            } else if self.peek() == Some('[') {
                let saved = self.input;
                self.try_strip_char('[');
                check.dive()?;
                self.ensure_decoratable(&result)?;
                result = self.parse_array_decorator(result, saved)?;
            } else {
                break;
            }
        }
        Ok(result)
    }

    fn ensure_decoratable(&self, result: &TypeIdentity) -> Result<()> {
        if result.is_managed_pointer() {
            return Err(malformed_error!(
                "A managed pointer suffix must be the last element of a type name"
            ));
        }
        Ok(())
    }

    /// Parses the remainder of an array decorator, with the opening `[`
    /// already consumed.
    fn parse_array_decorator(
        &mut self,
        element: TypeIdentity,
        whole_decorator: &str,
    ) -> Result<TypeIdentity> {
        if self.try_strip_char(']') {
            return element.make_sz_array_type();
        }

        if self.try_strip_char('*') {
            if !self.try_strip_char(']') {
                return Err(malformed_error!(
                    "Malformed array suffix in '{}'",
                    whole_decorator
                ));
            }
            return element.make_variable_bound_array_type(1);
        }

        let mut rank: u32 = 1;
        while self.try_strip_char(',') {
            rank += 1;
            if rank > crate::typename::MAX_ARRAY_RANK {
                return Err(malformed_error!(
                    "Array rank exceeds {}",
                    crate::typename::MAX_ARRAY_RANK
                ));
            }
        }
        if rank == 1 || !self.try_strip_char(']') {
            return Err(malformed_error!(
                "Malformed array suffix in '{}'",
                whole_decorator
            ));
        }
        element.make_variable_bound_array_type(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<TypeIdentity> {
        parse_assembly_qualified_name(input, &ParseOptions::default())
    }

    fn parse_depth(input: &str, depth: usize) -> Result<TypeIdentity> {
        let options = ParseOptions {
            max_recursive_depth: depth,
            ..ParseOptions::default()
        };
        parse_assembly_qualified_name(input, &options)
    }

    #[test]
    fn test_simple_type() {
        let id = parse("System.Int32").unwrap();
        assert!(id.is_elemental());
        assert_eq!(id.name(), "System.Int32");
        assert_eq!(id.component(), None);
    }

    #[test]
    fn test_leading_spaces_tolerated_trailing_not() {
        assert_eq!(parse("   System.Int32").unwrap().name(), "System.Int32");
        assert!(parse("System.Int32 ").is_err());
        assert!(parse("Foo ").is_err());
    }

    #[test]
    fn test_qualified_type() {
        let id = parse("System.Int32, mscorlib, Version=4.0.0.0").unwrap();
        assert_eq!(id.name(), "System.Int32");
        let component = id.component().unwrap();
        assert_eq!(component.name(), "mscorlib");
        assert_eq!(component.version().unwrap().to_string(), "4.0.0.0");
    }

    #[test]
    fn test_qualified_type_requires_component_text() {
        assert!(parse("System.Int32,").is_err());
        assert!(parse("System.Int32, ").is_err());
    }

    #[test]
    fn test_decorators_in_textual_order() {
        let id = parse("System.Int32[]*&").unwrap();
        assert!(id.is_managed_pointer());
        let pointee = id.underlying_type().unwrap();
        assert!(pointee.is_unmanaged_pointer());
        assert!(pointee.underlying_type().unwrap().is_sz_array());
        assert_eq!(id.total_complexity(), 4);
    }

    #[test]
    fn test_spaces_between_decorators() {
        let id = parse("SimpleTypeB[] [,, ,, ,,]  [  *  ] &").unwrap();
        assert_eq!(id.total_complexity(), 5);
        assert_eq!(id.name(), "SimpleTypeB[][,,,,,,][*]&");
    }

    #[test]
    fn test_no_space_between_name_and_decorator() {
        assert!(parse("Foo *").is_err());
        assert!(parse("Foo []").is_err());
    }

    #[test]
    fn test_trailing_spaces_after_decorator_consumed() {
        assert!(parse("Foo[] ").is_ok());
        assert!(parse("Foo[,,]  ").is_ok());
        assert!(parse("Foo& ").is_ok());
    }

    #[test]
    fn test_unqualified_parse_rejects_top_level_qualifier() {
        let options = ParseOptions::default();
        assert!(matches!(
            parse_unqualified_type_name("System.Int32, SomeLib", &options),
            Err(crate::Error::Malformed { .. })
        ));

        // Bracketed argument qualifiers are part of the grammar and stay legal.
        let id = parse_unqualified_type_name("List`1[[System.Int32, SomeLib]]", &options).unwrap();
        assert_eq!(id.component(), None);
        assert_eq!(
            id.generic_arguments().unwrap()[0].component().unwrap().name(),
            "SomeLib"
        );
    }

    #[test]
    fn test_array_ranks() {
        assert_eq!(parse("Foo[]").unwrap().array_rank().unwrap(), 1);
        assert!(parse("Foo[]").unwrap().is_sz_array());
        assert_eq!(parse("Foo[*]").unwrap().array_rank().unwrap(), 1);
        assert!(parse("Foo[*]").unwrap().is_variable_bound_array());
        assert_eq!(parse("Foo[,]").unwrap().array_rank().unwrap(), 2);
        assert_eq!(parse("Foo[,,,]").unwrap().array_rank().unwrap(), 4);
        let rank32 = format!("Foo[{}]", ",".repeat(31));
        assert_eq!(parse(&rank32).unwrap().array_rank().unwrap(), 32);
        let rank33 = format!("Foo[{}]", ",".repeat(32));
        assert!(parse(&rank33).is_err());
    }

    #[test]
    fn test_malformed_array_suffixes() {
        for bad in ["Foo[a]", "Foo[*,]", "Foo[,*]", "Foo[,+]", "Foo[", "Foo[]]"] {
            assert!(parse(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_managed_pointer_must_be_outermost() {
        for bad in ["Foo&&", "Foo&*", "Foo&[]", "Foo&[,]"] {
            assert!(parse(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_generic_instantiation() {
        let id = parse("Dictionary`2[[System.Int32],[System.String]]").unwrap();
        assert!(id.is_constructed_generic());
        assert_eq!(id.total_complexity(), 4);
        let arguments = id.generic_arguments().unwrap();
        assert_eq!(arguments[0].name(), "System.Int32");
        assert_eq!(arguments[1].name(), "System.String");
    }

    #[test]
    fn test_generic_arguments_may_be_qualified() {
        let id =
            parse("Generic`2[ [ SimpleTypeA, AssemblyA ] , [ SimpleTypeB, AssemblyB ] ] &").unwrap();
        assert!(id.is_managed_pointer());
        let generic = id.underlying_type().unwrap();
        let arguments = generic.generic_arguments().unwrap();
        assert_eq!(arguments[0].component().unwrap().name(), "AssemblyA");
        assert_eq!(arguments[1].component().unwrap().name(), "AssemblyB");
    }

    #[test]
    fn test_nested_generics() {
        let id = parse("Outer`1[[Inner`1[[System.Int32]]]]").unwrap();
        let inner = &id.generic_arguments().unwrap()[0];
        assert!(inner.is_constructed_generic());
        assert_eq!(id.total_complexity(), 6);
    }

    #[test]
    fn test_arity_must_match_argument_count() {
        assert!(matches!(
            parse("Generic`3[[A],[B]]"),
            Err(crate::Error::ArityMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert!(parse("NotGeneric[[A]]").is_err());
    }

    #[test]
    fn test_malformed_generic_lists() {
        for bad in [
            "Foo`1[[]]",
            "Foo`1[[Nested",
            "Foo`1[[Nested]",
            "Foo`1[[Nested],]",
            "Foo`1[[Nested] [A]]",
            "Foo`1 [[Nested]]",
            "Foo`1[[Nested ]]",
            "Foo`1[[Nested\0]]",
        ] {
            assert!(parse(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_unqualified_generic_definition_is_elemental() {
        let id = parse("Generic`2").unwrap();
        assert!(id.is_elemental());
        assert_eq!(id.likely_generic_arity(), Some(2));
    }

    #[test]
    fn test_trailing_data_rejected() {
        for bad in ["Foo]", "Foo, Lib]x", "Foo[] x"] {
            assert!(parse(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_sibling_arguments_bound_by_deepest_not_sum() {
        // Each argument alone reaches depth 6 (dive for the type plus four
        // decorator dives from the list head at depth 1).
        let input = "Map`2[[A****],[B****]]";
        assert!(parse_depth(input, 6).is_ok());
        assert!(matches!(
            parse_depth(input, 5),
            Err(crate::Error::RecursionLimit(5))
        ));
    }

    #[test]
    fn test_depth_requirements() {
        for (input, depth) in [
            ("SimpleType", 1),
            ("SimpleType[]", 2),
            ("SimpleType[]*", 3),
            ("GenericType`1[[SimpleType]]", 2),
            (
                "GenericType`2[[InnerType**],[OtherInnerType`1[[SubNested***]]]][]",
                7,
            ),
        ] {
            assert!(parse_depth(input, depth).is_ok(), "{input} at {depth}");
            if depth > 1 {
                assert!(
                    matches!(
                        parse_depth(input, depth - 1),
                        Err(crate::Error::RecursionLimit(_))
                    ),
                    "{input} at {}",
                    depth - 1
                );
            }
        }
    }

    #[test]
    fn test_complexity_worked_example() {
        // A1 = 1; B = 2 + (B1[] = 2) = 4; C = 2 + 1 + (C2*** = 4) = 7;
        // Generic`3 = 2 + 1 + 4 + 7 = 14; the trailing [] adds one more.
        let id = parse("Generic`3[[A1],[B`1[[B1[]]]],[C`2[[C1],[C2***]]]][]").unwrap();
        assert_eq!(id.total_complexity(), 15);
    }

    #[test]
    fn test_component_parse_failures_propagate() {
        assert!(parse("Foo, Lib, Version=bogus").is_err());
        assert!(parse("Foo, Lib, Culture=abc").is_err());
    }

    #[test]
    fn test_nul_rejected_everywhere() {
        for bad in ["Fo\0o", "Foo\0", "Foo[]\0", "Foo, Li\0b"] {
            assert!(parse(bad).is_err(), "{bad:?}");
        }
    }
}
