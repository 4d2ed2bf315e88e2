use serde::Serialize;

use crate::model::MappingSet;

/// Command that produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditCommand {
    Initial,
    CreateMapping,
    UpdateMapping,
    DeleteMapping,
    ClearAll,
    AutoMap,
}

impl EditCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            EditCommand::Initial => "initial",
            EditCommand::CreateMapping => "create_mapping",
            EditCommand::UpdateMapping => "update_mapping",
            EditCommand::DeleteMapping => "delete_mapping",
            EditCommand::ClearAll => "clear_all",
            EditCommand::AutoMap => "auto_map",
        }
    }
}

/// The full mapping set as it stood after one command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySnapshot {
    pub command: EditCommand,
    pub mappings: MappingSet,
}

/// Linear undo history: pushing after an undo drops the redo tail.
#[derive(Debug, Clone)]
pub struct EditHistory {
    snapshots: Vec<HistorySnapshot>,
    cursor: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    /// A history holding one empty initial snapshot.
    pub fn new() -> Self {
        Self {
            snapshots: vec![HistorySnapshot {
                command: EditCommand::Initial,
                mappings: MappingSet::new(),
            }],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &HistorySnapshot {
        &self.snapshots[self.cursor]
    }

    pub fn push(&mut self, command: EditCommand, mappings: MappingSet) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(HistorySnapshot { command, mappings });
        self.cursor = self.snapshots.len() - 1;
    }

    pub fn undo(&mut self) -> Option<&HistorySnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<&HistorySnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[HistorySnapshot] {
        &self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use fieldmap_core::{CanonicalType, OriginSystem, canonicalize_detailed};

    use super::*;
    use crate::model::{FieldMapping, MappingKey};

    fn set_of(targets: &[&str]) -> MappingSet {
        let mut set = MappingSet::new();
        for target in targets {
            set.insert(FieldMapping::new(
                MappingKey::new("src", *target),
                CanonicalType::String,
                canonicalize_detailed("text", OriginSystem::Sql),
            ))
            .expect("unique");
        }
        set
    }

    #[test]
    fn starts_with_one_empty_snapshot() {
        let history = EditHistory::new();
        assert_eq!(history.len(), 1);
        assert!(history.current().mappings.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_undo_redo_returns_to_the_second_state() {
        let mut history = EditHistory::new();
        history.push(EditCommand::CreateMapping, set_of(&["a"]));
        history.push(EditCommand::CreateMapping, set_of(&["a", "b"]));
        history.push(EditCommand::CreateMapping, set_of(&["a", "b", "c"]));

        history.undo();
        history.undo();
        let snapshot = history.redo().expect("redo available").clone();
        assert_eq!(snapshot.mappings, set_of(&["a", "b"]));
        assert!(history.can_redo());
    }

    #[test]
    fn new_command_after_undo_drops_the_redo_tail() {
        let mut history = EditHistory::new();
        history.push(EditCommand::CreateMapping, set_of(&["a"]));
        history.push(EditCommand::CreateMapping, set_of(&["a", "b"]));
        history.undo();
        history.push(EditCommand::DeleteMapping, MappingSet::new());

        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().command, EditCommand::DeleteMapping);
    }

    #[test]
    fn undo_stops_at_the_initial_snapshot() {
        let mut history = EditHistory::new();
        history.push(EditCommand::ClearAll, MappingSet::new());
        assert!(history.undo().is_some());
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), 0);
    }
}
