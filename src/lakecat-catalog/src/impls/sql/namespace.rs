//! Namespace derivation over the flat catalog relations.
//!
//! Namespaces have no parent/child columns; the tree is recovered from the
//! serialized namespace strings of both relations. Two behaviours are
//! deliberate and must not be "fixed" here:
//!
//! * Listing under a non-root parent keeps only direct children, found by a
//!   plain string-prefix match. `foobar.baz` is therefore a child of `foo`.
//! * Listing under the root returns every stored namespace at any depth,
//!   including a stored empty namespace, which reads back as the root.
//!
//! Existence is an exact match (see [`super::SqlCatalog`]), so an ancestor
//! that only has deeper descendants cannot be listed even though its
//! children show up in a root listing.

use std::collections::BTreeSet;

use crate::Namespace;

const LIKE_ESCAPE: char = '\\';

/// Builds a `LIKE ... ESCAPE '\'` pattern matching strings that start with `prefix`.
pub(crate) fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Derives the namespaces listed under `parent` from serialized namespaces
/// collected across both relations.
pub(crate) fn child_namespaces<I>(parent: &Namespace, serialized: I) -> Vec<Namespace>
where
    I: IntoIterator<Item = String>,
{
    let prefix = parent.serialize();
    let level = parent.level();
    serialized
        .into_iter()
        .filter(|namespace| namespace.starts_with(&prefix))
        .map(|namespace| Namespace::deserialize(&namespace))
        .filter(|namespace| level == 0 || namespace.level() == level + 1)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn ns(input: &str) -> Namespace {
        Namespace::parse(input).unwrap()
    }

    fn stored(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[rstest]
    #[case("foo", "foo%")]
    #[case("foo.bar", "foo.bar%")]
    #[case("a_b", "a\\_b%")]
    #[case("100%", "100\\%%")]
    #[case("back\\slash", "back\\\\slash%")]
    fn test_like_prefix_pattern(#[case] prefix: &str, #[case] expected: &str) {
        assert_eq!(like_prefix_pattern(prefix), expected);
    }

    #[test]
    fn test_root_lists_every_depth() {
        let found = child_namespaces(
            &Namespace::root(),
            stored(&["foo", "foo.bar", "a.b", "foo", "haha"]),
        );
        assert_eq!(found, vec![ns("a.b"), ns("foo"), ns("foo.bar"), ns("haha")]);
    }

    #[test]
    fn test_root_keeps_empty_namespace() {
        let found = child_namespaces(&Namespace::root(), stored(&["", "foo"]));
        assert_eq!(found, vec![Namespace::root(), ns("foo")]);

        // never a child of a non-root parent
        let found = child_namespaces(&ns("foo"), stored(&["", "foo.bar"]));
        assert_eq!(found, vec![ns("foo.bar")]);
    }

    #[test]
    fn test_direct_children_only() {
        let found = child_namespaces(
            &ns("foo"),
            stored(&["foo", "foo.bar", "foo.bar.baz", "foo.qux", "a.b"]),
        );
        assert_eq!(found, vec![ns("foo.bar"), ns("foo.qux")]);
    }

    #[test]
    fn test_string_prefix_not_segment_prefix() {
        let found = child_namespaces(&ns("foo"), stored(&["foo", "foobar.baz", "foobar"]));
        assert_eq!(found, vec![ns("foobar.baz")]);
    }

    #[test]
    fn test_prefix_match_is_case_sensitive() {
        let found = child_namespaces(&ns("foo"), stored(&["Foo.bar", "foo.bar"]));
        assert_eq!(found, vec![ns("foo.bar")]);
    }

    #[test]
    fn test_duplicates_across_relations_collapse() {
        let tables = stored(&["foo.bar"]);
        let properties = stored(&["foo.bar", "foo.baz"]);
        let found = child_namespaces(&ns("foo"), tables.into_iter().chain(properties));
        assert_eq!(found, vec![ns("foo.bar"), ns("foo.baz")]);
    }
}
