//! Reference programs built with the tree builder.
//!
//! Used as golden inputs for serialization and post-processor tests.

use crate::tree::{
    Command, CommandType, Instruction, Operation, OperationTree, OperationType, Token, TokenId,
};

/// Gang drill three holes on a diagonal
pub fn drilling_example() -> OperationTree {
    let drill_at = |at: &str| {
        Instruction::new(vec![
            Token::bare(TokenId::Drill),
            Token::new(TokenId::X, at),
            Token::new(TokenId::Y, at),
            Token::new(TokenId::Z, "0"),
        ])
    };

    OperationTree::from_operations(vec![
        Operation::new(
            OperationType::Start,
            vec![Command::new(
                CommandType::Start,
                vec![
                    Instruction::new(vec![Token::comment("Drilling Example")]),
                    Instruction::new(vec![Token::bare(TokenId::JobStart)]),
                ],
            )],
        ),
        Operation::new(
            OperationType::Drill,
            vec![
                Command::new(
                    CommandType::DrillSet,
                    vec![Instruction::new(vec![
                        Token::bare(TokenId::Drill),
                        Token::new(TokenId::Tool, "1"),
                        Token::new(TokenId::Feed, "100"),
                        Token::new(TokenId::Speed, "100"),
                    ])],
                ),
                Command::new(
                    CommandType::DrillMotion,
                    vec![drill_at("10"), drill_at("20"), drill_at("30")],
                ),
            ],
        ),
        Operation::new(
            OperationType::End,
            vec![Command::new(
                CommandType::Stop,
                vec![Instruction::new(vec![
                    Token::bare(TokenId::JobEnd),
                    Token::comment("End of Drilling Example"),
                ])],
            )],
        ),
    ])
}

/// Slew to the first point, cut through every point, then retract
///
/// Returns an empty tree when `points` is empty.
pub fn cutting_example(points: &[(f64, f64)]) -> OperationTree {
    let mut tree = OperationTree::new();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return tree;
    };

    let motion = |id: TokenId, (x, y): (f64, f64), z: &str| {
        vec![
            Token::bare(id),
            Token::new(TokenId::X, format!("{:.6}", x)),
            Token::new(TokenId::Y, format!("{:.6}", y)),
            Token::new(TokenId::Z, z),
            Token::new(TokenId::Feed, "100"),
        ]
    };
    let section = |text: &str| vec![Token::bare(TokenId::LineBreak), Token::comment(text)];

    let com = tree
        .new_operation(OperationType::Start, Vec::new())
        .new_command(CommandType::Start, Vec::new());
    com.new_instruction(vec![Token::comment("// Starting the job")]);
    com.new_instruction(vec![
        Token::bare(TokenId::JobStart),
        Token::comment("Cutting Example"),
    ]);

    let op = tree.new_operation(OperationType::Spindle, Vec::new());
    let com = op.new_command(CommandType::SpindleSet, Vec::new());
    com.new_instruction(vec![Token::comment("// Configuring the spindle")]);
    com.new_instruction(vec![
        Token::bare(TokenId::Spindle),
        Token::new(TokenId::Tool, "1"),
        Token::new(TokenId::Speed, "100"),
    ]);

    let com = op.new_command(CommandType::SpindleMotion, Vec::new());
    com.new_instruction(section("// Slewing into position"));
    com.new_instruction(motion(TokenId::Move, *first, "1"));
    com.new_instruction(section("// Iterating over waypoints and cutting through them"));
    for point in points {
        com.new_instruction(motion(TokenId::Cut, *point, "0"));
    }
    com.new_instruction(section("// Retracting the spindle"));
    com.new_instruction(motion(TokenId::Move, *last, "1"));

    let com = tree
        .new_operation(OperationType::End, Vec::new())
        .new_command(CommandType::Stop, Vec::new());
    com.new_instruction(vec![Token::comment("// Ending the job")]);
    com.new_instruction(vec![
        Token::bare(TokenId::JobEnd),
        Token::comment("End of Cutting Example"),
    ]);

    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drilling_example_shape() {
        let tree = drilling_example();
        let types: Vec<_> = tree.operations.iter().map(|o| o.operation_type).collect();
        assert_eq!(
            types,
            vec![OperationType::Start, OperationType::Drill, OperationType::End]
        );
        assert_eq!(tree.operations[1].commands[1].instructions.len(), 3);
    }

    #[test]
    fn test_cutting_example_empty() {
        assert!(cutting_example(&[]).is_empty());
    }

    #[test]
    fn test_cutting_example_motion() {
        let tree = cutting_example(&[(0.0, 0.0), (10.0, 0.0), (10.0, 5.5)]);
        let motion = &tree.operations[1].commands[1];
        assert_eq!(motion.command_type, CommandType::SpindleMotion);
        // section, slew, section, three cuts, section, retract
        assert_eq!(motion.instructions.len(), 8);
        assert_eq!(
            motion.instructions[5].to_string(),
            "CUT X10.000000 Y5.500000 Z0 F100"
        );
        assert_eq!(
            motion.instructions[7].to_string(),
            "MOVE X10.000000 Y5.500000 Z1 F100"
        );
    }
}
