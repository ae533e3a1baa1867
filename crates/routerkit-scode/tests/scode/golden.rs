use routerkit_scode::samples::{cutting_example, drilling_example};
use routerkit_scode::{CommandType, OperationTree, OperationType, Token, TokenId};

const DRILLING_SCRIPT: &str = ";Drilling Example\nJOBSTART\n\n\nDRILL T1 F100 S100\n\nDRILL X10 Y10 Z0\nDRILL X20 Y20 Z0\nDRILL X30 Y30 Z0\n\n\nJOBEND ;End of Drilling Example\n\n\n";

#[test]
fn test_drilling_script_matches_byte_for_byte() {
    assert_eq!(drilling_example().script(), DRILLING_SCRIPT);
}

#[test]
fn test_builder_matches_literal_tree() {
    let mut tree = OperationTree::new();
    let com = tree
        .new_operation(OperationType::Start, Vec::new())
        .new_command(CommandType::Start, Vec::new());
    com.new_instruction(vec![Token::comment("Drilling Example")]);
    com.new_instruction(vec![Token::bare(TokenId::JobStart)]);

    let op = tree.new_operation(OperationType::Drill, Vec::new());
    op.new_command(CommandType::DrillSet, Vec::new())
        .new_instruction(vec![
            Token::bare(TokenId::Drill),
            Token::new(TokenId::Tool, "1"),
            Token::new(TokenId::Feed, "100"),
            Token::new(TokenId::Speed, "100"),
        ]);
    let motion = op.new_command(CommandType::DrillMotion, Vec::new());
    for at in ["10", "20", "30"] {
        motion
            .new_instruction(vec![Token::bare(TokenId::Drill)])
            .add_token(Token::new(TokenId::X, at))
            .add_token(Token::new(TokenId::Y, at))
            .add_token(Token::new(TokenId::Z, "0"));
    }

    tree.new_operation(OperationType::End, Vec::new())
        .new_command(CommandType::Stop, Vec::new())
        .new_instruction(vec![
            Token::bare(TokenId::JobEnd),
            Token::comment("End of Drilling Example"),
        ]);

    assert_eq!(tree, drilling_example());
}

#[test]
fn test_tree_survives_json() {
    let tree = cutting_example(&[(0.0, 0.0), (12.5, 3.0)]);
    let json = serde_json::to_string(&tree).unwrap();
    let back: OperationTree = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tree);
    assert_eq!(back.script(), tree.script());
}

#[test]
fn test_empty_tree_has_empty_script() {
    assert_eq!(OperationTree::new().script(), "");
}
