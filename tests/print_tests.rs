//! Pretty-printer round trips: printing inserts only the parentheses a
//! reparse needs to rebuild the same tree, so printing a printed program
//! must be a fixed point.

use pretty_assertions::assert_eq;

use bminor::compile::print_source;

fn printed(source: &str) -> String {
    print_source(source).expect("source should parse")
}

/// P6: reparsing the printed form and printing again changes nothing.
fn assert_round_trip(source: &str) {
    let once = printed(source);
    let twice = printed(&once);
    assert_eq!(once, twice, "printing is not a fixed point for {:?}", source);
}

#[test]
fn declaration_prints_canonically() {
    assert_eq!(printed("x: integer = 5;"), "x: integer = 5;\n");
    assert_eq!(printed("x:integer=5;"), "x: integer = 5;\n");
}

#[test]
fn needed_parentheses_survive() {
    assert_eq!(printed("x: integer = (a+b)*c;"), "x: integer = (a+b)*c;\n");
}

#[test]
fn redundant_parentheses_collapse() {
    assert_eq!(printed("x: integer = a+(b*c);"), "x: integer = a+b*c;\n");
    assert_eq!(printed("x: integer = ((5));"), "x: integer = 5;\n");
}

#[test]
fn double_not_prints_without_parens() {
    assert_eq!(printed("b: boolean = !!c;"), "b: boolean = !!c;\n");
}

#[test]
fn nested_negation_keeps_parens() {
    assert_eq!(printed("x: integer = -(-y);"), "x: integer = -(-y);\n");
}

#[test]
fn right_associative_operators_print_flat() {
    assert_eq!(printed("x: integer = a^b^c;"), "x: integer = a^b^c;\n");
    assert_eq!(
        printed("x: integer = (a^b)^c;"),
        "x: integer = (a^b)^c;\n"
    );
}

#[test]
fn left_associative_chains_print_flat() {
    assert_eq!(printed("x: integer = a-b-c;"), "x: integer = a-b-c;\n");
    assert_eq!(
        printed("x: integer = a-(b-c);"),
        "x: integer = a-(b-c);\n"
    );
}

#[test]
fn array_types_print_with_lengths() {
    assert_eq!(
        printed("a: array [3] integer = {1,2,3};"),
        "a: array [3] integer = {1, 2, 3};\n"
    );
    assert_eq!(printed("a: array [] integer;"), "a: array [] integer;\n");
}

#[test]
fn string_and_char_literals_reencode() {
    assert_eq!(
        printed("s: string = \"a\\tb\\n\";"),
        "s: string = \"a\\tb\\n\";\n"
    );
    assert_eq!(printed("c: char = '\\n';"), "c: char = '\\n';\n");
}

#[test]
fn function_definitions_print_with_bodies() {
    let source = "square: function integer (x: integer) = { return x^2; }";
    assert_eq!(
        printed(source),
        "square: function integer (x: integer) = {\n    return x^2;\n}\n"
    );
}

#[test]
fn prototypes_print_with_semicolon() {
    assert_eq!(
        printed("f: function void (a: integer, b: boolean);"),
        "f: function void (a: integer, b: boolean);\n"
    );
}

#[test]
fn control_flow_round_trips() {
    assert_round_trip(
        "main: function void () = { if (a<b) { print a; } else { print b; } }",
    );
    assert_round_trip(
        "main: function void () = { for (i=0;i<10;i++) { print i, \"\\n\"; } }",
    );
    assert_round_trip("main: function void () = { if (x) print 1; else print 2; }");
}

#[test]
fn assorted_programs_are_fixed_points() {
    assert_round_trip("x: integer = -5;");
    assert_round_trip("x: integer = 0x1f;");
    assert_round_trip("b: boolean = a==b || c!=d;");
    assert_round_trip("x: integer = f(a, g(b), c[2]);");
    assert_round_trip("x: integer = #a+1;");
    assert_round_trip(
        "fib: function integer (n: integer) = { if (n<2) return n; return fib(n-1)+fib(n-2); }",
    );
}
