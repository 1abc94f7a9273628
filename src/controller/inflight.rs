use std::cell::RefCell;
use std::fmt;

use super::error::ControlError;

/// Kinds of operations tracked while their backend request is pending.
///
/// Playback toggles are guarded by the playback controller itself, whose
/// tickets follow renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// At most one folder load at a time, whatever the folder.
    Load,
    Playback,
    Rename,
    Copy,
    Favorite,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "folder load",
            Self::Playback => "playback toggle",
            Self::Rename => "rename",
            Self::Copy => "copy",
            Self::Favorite => "favorite update",
        })
    }
}

/// In-flight operations keyed by kind and target.
#[derive(Debug, Default)]
pub(super) struct InFlight {
    ops: RefCell<Vec<(OpKind, String)>>,
}

impl InFlight {
    /// Register `(kind, target)` or reject it if it conflicts with a pending
    /// operation. The claim is released when the guard drops.
    pub(super) fn claim(&self, kind: OpKind, target: &str) -> Result<FlightGuard<'_>, ControlError> {
        let mut ops = self.ops.borrow_mut();
        let conflict = ops
            .iter()
            .any(|(k, t)| *k == kind && (kind == OpKind::Load || t == target));
        if conflict {
            return Err(ControlError::Busy {
                kind,
                target: target.to_string(),
            });
        }
        ops.push((kind, target.to_string()));
        Ok(FlightGuard {
            owner: self,
            kind,
            target: target.to_string(),
        })
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.ops.borrow().len()
    }
}

pub(super) struct FlightGuard<'a> {
    owner: &'a InFlight,
    kind: OpKind,
    target: String,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        let mut ops = self.owner.ops.borrow_mut();
        if let Some(pos) = ops
            .iter()
            .position(|(k, t)| *k == self.kind && *t == self.target)
        {
            ops.remove(pos);
        }
    }
}
