use routerkit_scode::samples::cutting_example;
use routerkit_scode::{Dialect, Parser, PostProcessor};

#[test]
fn test_multicam_cutting_script() {
    let tree = cutting_example(&[(0.0, 0.0), (2.0, 0.0)]);
    let script = Dialect::Multicam.post_process(&tree).script();
    assert!(script.starts_with("M90 ;// Multicam Start\nG90\nG75\n"));
    assert!(script.contains("G00 T1\nG97 S100\nM03\n"));
    assert!(script.contains("G01 X2.000000 Y0.000000 Z0 F100\n"));
    assert!(script.ends_with("M02\n\n\n"));
    assert!(!script.contains("MOVE"));
    assert!(!script.contains("CUT"));
}

#[test]
fn test_multicam_output_reparses() {
    let tree = cutting_example(&[(0.0, 0.0), (2.0, 0.0), (2.0, 3.0)]);
    let script = Dialect::Multicam.post_process(&tree).script();
    let program = Parser::default().parse(&script).unwrap();
    assert_eq!(program.dropped, 0);
    let state = program.final_state();
    assert_eq!(state.get('T'), "1");
    assert_eq!(state.get('Y'), "3.000000");
    assert_eq!(state.get('Z'), "1");
}

#[test]
fn test_dialect_listing() {
    let names: Vec<String> = Dialect::all().iter().map(|d| d.to_string()).collect();
    assert_eq!(names, vec!["generic", "multicam"]);
    assert!(!Dialect::Multicam.processor().description().is_empty());
}
