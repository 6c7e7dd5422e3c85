//! trybuild compile-time tests for component_macros

#[test]
fn trybuild_replace_macro() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/replace_ok.rs");
    t.pass("tests/trybuild/replace_factory_ok.rs");
}
