#[test]
fn rosetta_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/rosetta_error_pass.rs");
    t.pass("tests/ui/rosetta_error_context.rs");
}
