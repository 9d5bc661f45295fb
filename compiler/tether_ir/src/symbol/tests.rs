use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_id_is_pure_function_of_parts() {
    let a = Symbol::new("src/index.ts", "Foo");
    let b = Symbol::new("src/index.ts", "Foo");
    assert_eq!(a.id(), b.id());
    assert_eq!(a, b);
}

#[test]
fn test_separator_and_dash_do_not_collide() {
    let slash = SymbolId::encode("test/foo.ts", "Foo");
    let dash = SymbolId::encode("test-foo.ts", "Foo");
    let underscore = SymbolId::encode("test_foo.ts", "Foo");
    assert_ne!(slash, dash);
    assert_ne!(slash, underscore);
    assert_ne!(dash, underscore);
}

#[test]
fn test_path_name_boundary_does_not_collide() {
    // Moving characters across the path/name boundary must change the id.
    let a = SymbolId::encode("a_S", "b");
    let b = SymbolId::encode("a", "S_b");
    assert_ne!(a, b);
}

#[test]
fn test_id_uses_word_characters_only() {
    let id = SymbolId::encode("nested/dir name/child.ts", "Child$1");
    assert!(id
        .as_str()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_'));
}

#[test]
fn test_decode_inverts_encode() {
    let cases = [
        ("index.ts", "A"),
        ("nested/child.ts", "Child"),
        ("test-foo.ts", "Foo"),
        ("weird path/\u{e9}t\u{e9}.ts", "\u{3bb}_x"),
        ("", "Empty"),
    ];
    for (path, name) in cases {
        let id = SymbolId::encode(path, name);
        assert_eq!(
            id.decode(),
            Some((path.to_string(), name.to_string())),
            "roundtrip of {path}::{name}"
        );
    }
}

#[test]
fn test_decode_rejects_garbage() {
    assert_eq!(SymbolId::from_encoded("no_separator").decode(), None);
    assert_eq!(SymbolId::from_encoded("a_Sb_Sc").decode(), None);
    assert_eq!(SymbolId::from_encoded("a_Sb_").decode(), None);
    assert_eq!(SymbolId::from_encoded("a_xzz__Sb").decode(), None);
    assert_eq!(SymbolId::from_encoded("a.b_Sc").decode(), None);
}

#[test]
fn test_known_encoding() {
    assert_eq!(
        SymbolId::encode("nested/child.ts", "Child").as_str(),
        "nested_dchild_ots_SChild"
    );
}

#[test]
fn test_qualified_name() {
    let symbol = Symbol::new("circular.ts", "CircleA");
    assert_eq!(symbol.qualified(), "circular.ts::CircleA");
    assert_eq!(symbol.to_string(), "circular.ts::CircleA");
}
