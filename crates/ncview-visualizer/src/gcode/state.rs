//! Modal machine state
//!
//! G-code lines may omit any axis; omitted values carry over from the
//! previous line. `MachineState` is a plain value threaded through one parse
//! pass and never shared between passes.

use ncview_core::{MotionKind, Point3};
use serde::{Deserialize, Serialize};

use super::command::LineCommand;
use super::tokenizer::{ArgLetter, RawArgs};

/// Position and active motion mode after a line has executed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MachineState {
    pub position: Point3,
    pub last_motion: Option<MotionKind>,
}

impl MachineState {
    /// Machine at the origin with no motion mode selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective absolute target for a line
    ///
    /// Axes given in `args` override; omitted axes inherit the current
    /// position.
    pub fn resolve_target(&self, args: &RawArgs) -> Point3 {
        Point3::new(
            args.get(ArgLetter::X).unwrap_or(self.position.x),
            args.get(ArgLetter::Y).unwrap_or(self.position.y),
            args.get(ArgLetter::Z).unwrap_or(self.position.z),
        )
    }

    /// Motion kind a command selects, falling back to the modal one
    pub fn resolve_motion(&self, command: &LineCommand) -> Option<MotionKind> {
        match command {
            LineCommand::Motion(kind) => Some(*kind),
            LineCommand::ModalMotion => self.last_motion,
            LineCommand::Other(_) => None,
        }
    }

    /// State after a motion line has executed
    pub fn advance(self, position: Point3, motion: MotionKind) -> Self {
        Self {
            position,
            last_motion: Some(motion),
        }
    }

    /// State after a line that only selects a motion mode
    pub fn with_motion(self, motion: MotionKind) -> Self {
        Self {
            last_motion: Some(motion),
            ..self
        }
    }
}
