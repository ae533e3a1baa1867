//! Lowering toolpaths into the instruction tree.
//!
//! Tool ids are translated into the router's slot numbers: spindle slots for
//! routed and drilled spindle work, gang drill slots for block drilling.

use crate::geometry::Point2;
use crate::toolpath::{SheetToolpath, ToolpathOperation, ToolpathSegment, ToolpathSegmentType};
use routerkit_core::{LookupError, OutputConfig, Router};
use routerkit_scode::{Command, CommandType, OperationTree, OperationType, Token, TokenId};
use tracing::debug;

/// Builds one instruction tree per sheet for a router
#[derive(Debug, Clone)]
pub struct Emitter<'a> {
    router: &'a Router,
    output: OutputConfig,
    job_name: String,
}

impl<'a> Emitter<'a> {
    pub fn new(router: &'a Router, output: OutputConfig, job_name: impl Into<String>) -> Self {
        Self {
            router,
            output,
            job_name: job_name.into(),
        }
    }

    pub fn emit(&self, sheet: &SheetToolpath) -> Result<OperationTree, LookupError> {
        let mut tree = OperationTree::new();

        let start = tree
            .new_operation(OperationType::Start, Vec::new())
            .new_command(CommandType::Start, Vec::new());
        start.new_instruction(vec![Token::comment(format!(
            "{} sheet {}",
            self.job_name, sheet.sheet_number
        ))]);
        start.new_instruction(vec![Token::bare(TokenId::JobStart)]);

        for operation in &sheet.operations {
            if operation.toolpaths.is_empty() {
                debug!(operation = %operation.name, "no toolpaths to emit");
                continue;
            }
            if operation.uses_gang_drill() {
                self.emit_gang(&mut tree, operation)?;
            } else {
                self.emit_spindle(&mut tree, operation)?;
            }
        }

        tree.new_operation(OperationType::End, Vec::new())
            .new_command(CommandType::Stop, Vec::new())
            .new_instruction(vec![
                Token::bare(TokenId::JobEnd),
                Token::comment("End of job"),
            ]);
        Ok(tree)
    }

    fn not_mounted(&self, operation: &ToolpathOperation) -> LookupError {
        LookupError::ToolNotMounted {
            tool: operation.tool.clone(),
            router: self.router.name.clone(),
        }
    }

    fn value(&self, id: TokenId, value: f64) -> Token {
        Token::new(id, self.output.format(value))
    }

    fn position(&self, at: Point2, z: f64) -> [Token; 3] {
        [
            self.value(TokenId::X, at.x),
            self.value(TokenId::Y, at.y),
            self.value(TokenId::Z, z),
        ]
    }

    fn emit_spindle(&self, tree: &mut OperationTree, operation: &ToolpathOperation) -> Result<(), LookupError> {
        let slot = self
            .router
            .spindle_slot_of(&operation.tool)
            .ok_or_else(|| self.not_mounted(operation))?;

        let op = tree.new_operation(OperationType::Spindle, Vec::new());
        let set = op.new_command(CommandType::SpindleSet, Vec::new());
        set.new_instruction(vec![Token::comment(operation.name.clone())]);
        set.new_instruction(vec![
            Token::bare(TokenId::Spindle),
            Token::new(TokenId::Tool, slot.to_string()),
            Token::new(TokenId::Speed, operation.spindle_rpm.to_string()),
        ]);

        let motion = op.new_command(CommandType::SpindleMotion, Vec::new());
        for toolpath in &operation.toolpaths {
            for segment in &toolpath.segments {
                self.spindle_segment(motion, segment, operation.feed_height);
            }
        }
        Ok(())
    }

    fn spindle_segment(&self, motion: &mut Command, segment: &ToolpathSegment, feed_height: f64) {
        let [x, y, z] = self.position(segment.end, segment.z);
        match segment.segment_type {
            ToolpathSegmentType::RapidMove => {
                motion.new_instruction(vec![Token::bare(TokenId::Move), x, y, z]);
            }
            ToolpathSegmentType::LinearMove => {
                motion.new_instruction(vec![
                    Token::bare(TokenId::Cut),
                    x,
                    y,
                    z,
                    self.value(TokenId::Feed, segment.feed_rate),
                ]);
            }
            ToolpathSegmentType::ArcCW | ToolpathSegmentType::ArcCCW => {
                let id = if segment.segment_type == ToolpathSegmentType::ArcCW {
                    TokenId::ArcCw
                } else {
                    TokenId::ArcCcw
                };
                let offset = segment.center.unwrap_or(segment.start) - segment.start;
                motion.new_instruction(vec![
                    Token::bare(id),
                    x,
                    y,
                    z,
                    self.value(TokenId::I, offset.x),
                    self.value(TokenId::J, offset.y),
                    self.value(TokenId::Feed, segment.feed_rate),
                ]);
            }
            ToolpathSegmentType::Drill => {
                motion.new_instruction(vec![
                    Token::bare(TokenId::Cut),
                    x,
                    y,
                    z,
                    self.value(TokenId::Feed, segment.feed_rate),
                ]);
                let [x, y, z] = self.position(segment.end, feed_height);
                motion.new_instruction(vec![Token::bare(TokenId::Move), x, y, z]);
            }
        }
    }

    fn emit_gang(&self, tree: &mut OperationTree, operation: &ToolpathOperation) -> Result<(), LookupError> {
        let (slot, bit) = self
            .router
            .gang_slot_of(&operation.tool)
            .and_then(|slot| self.router.gang_slot(slot).map(|bit| (slot, bit)))
            .ok_or_else(|| self.not_mounted(operation))?;
        let bit_offset = Point2::new(bit.offset_x, bit.offset_y);

        let op = tree.new_operation(OperationType::Drill, Vec::new());
        op.new_command(CommandType::DrillSet, Vec::new())
            .new_instruction(vec![
                Token::bare(TokenId::Drill),
                Token::new(TokenId::Tool, slot.to_string()),
                self.value(TokenId::Feed, operation.plunge_rate),
                Token::new(TokenId::Speed, operation.spindle_rpm.to_string()),
            ]);

        let motion = op.new_command(CommandType::DrillMotion, Vec::new());
        let hits = operation
            .toolpaths
            .iter()
            .flat_map(|t| t.segments.iter())
            .filter(|s| s.segment_type == ToolpathSegmentType::Drill);
        for hit in hits {
            // The spindle position that puts this bit over the hit
            let [x, y, z] = self.position(hit.end - bit_offset, hit.z);
            motion.new_instruction(vec![Token::bare(TokenId::Drill), x, y, z]);
        }
        Ok(())
    }
}
