use proptest::prelude::*;
use routerkit_core::{ParseError, ParserConfig};
use routerkit_scode::{Parser, TokenId};

const PROGRAM: &str = "%
(Sample program)
G90 G21
M03 S18000
G00 X0 Y0 Z5
G01 Z-1 F600
X10
Y10 ; corner
X0
G00 Z5
M05
M02
%
";

#[test]
fn test_commands_split_on_modal_words() {
    let program = Parser::default().parse(PROGRAM).unwrap();
    let starts: Vec<u32> = program.commands.iter().map(|c| c.line_number).collect();
    assert_eq!(starts, vec![3, 4, 5, 6, 10, 11, 12]);
    assert_eq!(program.commands[3].line_count(), 4);
    assert_eq!(program.dropped, 0);
}

#[test]
fn test_modal_state_at_command_end() {
    let program = Parser::default().parse(PROGRAM).unwrap();
    let cut = program.commands[3].state().unwrap();
    assert_eq!(cut.get('X'), "0");
    assert_eq!(cut.get('Y'), "10");
    assert_eq!(cut.get('Z'), "-1");
    assert_eq!(cut.get('F'), "600");
    assert_eq!(cut.get('S'), "18000");

    let end = program.final_state();
    assert_eq!(end.get('Z'), "5");
    assert_eq!(end.get('I'), "0");
}

#[test]
fn test_parsed_program_to_tree() {
    let program = Parser::default().parse(PROGRAM).unwrap();
    let tree = program.to_operation_tree();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.commands().count(), program.commands.len());
    let comment = tree
        .tokens()
        .find(|t| t.identifier == TokenId::Comment)
        .unwrap();
    assert_eq!(comment.value, "corner");
}

#[test]
fn test_strict_reports_line() {
    let err = Parser::new(ParserConfig::strict())
        .parse("G00 X1\nG01 Y2\nG01 Z1..5\n")
        .unwrap_err();
    assert!(matches!(err, ParseError::InvalidToken { line: 3, letter: 'Z', .. }));
    assert_eq!(err.to_string(), "Invalid token 'Z1..5' at line 3");
}

fn letter_strategy() -> impl Strategy<Value = char> {
    prop_oneof![Just('X'), Just('Y'), Just('Z'), Just('F')]
}

proptest! {
    #[test]
    fn prop_last_assignment_wins(
        moves in prop::collection::vec((letter_strategy(), -5000i32..5000), 1..40)
    ) {
        let text: String = moves
            .iter()
            .map(|(letter, value)| format!("G01 {}{}\n", letter, value))
            .collect();
        let program = Parser::default().parse(&text).unwrap();
        prop_assert_eq!(program.commands.len(), moves.len());

        let state = program.final_state();
        for letter in ['X', 'Y', 'Z', 'F'] {
            let expected = moves
                .iter()
                .rev()
                .find(|(l, _)| *l == letter)
                .map(|(_, v)| v.to_string())
                .unwrap_or_else(|| "0".to_string());
            prop_assert_eq!(state.get(letter), expected.as_str());
        }
    }
}
