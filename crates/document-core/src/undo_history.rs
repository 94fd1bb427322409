//! Undo history.
//!
//! The history stores a sequence of user operations representing the user's
//! view of the commands executed on the text. Each user operation is a run
//! of insertion/removal actions delimited by `Start` records; initially
//! there is one `Start` in the history. As each action is recorded it
//! either joins the current user operation or begins a new one. With an
//! explicit `begin_undo_action`/`end_undo_action` group open everything
//! joins the current operation; otherwise a new operation starts unless the
//! action looks like the user typing or deleting a stream of text, which is
//! coalesced to match the user's intuition of typing as one step.

/// What one history record does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionKind {
    Insert,
    Remove,
    /// Delimits user operations; carries no payload.
    #[default]
    Start,
    /// A container-defined action; `position` carries the token.
    Container,
}

/// One step of an undo/redo operation.
#[derive(Debug, Default)]
pub struct UndoAction {
    pub kind: ActionKind,
    pub position: usize,
    pub data: Option<Box<[u8]>>,
    pub may_coalesce: bool,
}

impl UndoAction {
    fn create(&mut self, kind: ActionKind, position: usize, data: &[u8], may_coalesce: bool) {
        self.kind = kind;
        self.position = position;
        self.may_coalesce = may_coalesce;
        self.data = if data.is_empty() {
            None
        } else {
            Some(data.to_vec().into_boxed_slice())
        };
    }

    fn create_start(&mut self) {
        self.create(ActionKind::Start, 0, &[], true);
    }

    /// Length of the payload bytes.
    pub fn len_data(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.len())
    }
}

/// The action log. `current_action` is one past the last applied record and
/// `max_action` one past the last recorded; redo replays the records in
/// between.
pub struct UndoHistory {
    actions: Vec<UndoAction>,
    max_action: usize,
    current_action: usize,
    undo_sequence_depth: i32,
    save_point: Option<usize>,
    tentative_point: Option<usize>,
}

impl UndoHistory {
    pub fn new() -> Self {
        let mut actions = Vec::new();
        actions.resize_with(3, UndoAction::default);
        actions[0].create_start();
        Self {
            actions,
            max_action: 0,
            current_action: 0,
            undo_sequence_depth: 0,
            save_point: Some(0),
            tentative_point: None,
        }
    }

    /// Two more records may be written by any append, so keep room for them.
    fn ensure_undo_room(&mut self) {
        if self.current_action >= self.actions.len() - 2 {
            let new_len = self.actions.len() * 2;
            self.actions.resize_with(new_len, UndoAction::default);
        }
    }

    /// Record an action. Returns whether this started a new user operation
    /// (false when it was coalesced into the current one).
    pub fn append_action(
        &mut self,
        kind: ActionKind,
        position: usize,
        data: &[u8],
        may_coalesce: bool,
    ) -> bool {
        self.ensure_undo_room();
        if self.save_point.is_some_and(|sp| self.current_action < sp) {
            // History has diverged before the save point, which can no
            // longer be reached.
            self.save_point = None;
        }
        let old_current_action = self.current_action;
        if self.current_action >= 1 {
            if self.undo_sequence_depth == 0 {
                // Top level actions may not always be coalesced.
                let mut target_act = self.current_action - 1;
                // Container actions may forward the coalesce state of
                // buffer actions.
                while target_act > 0
                    && self.actions[target_act].kind == ActionKind::Container
                    && self.actions[target_act].may_coalesce
                {
                    target_act -= 1;
                }
                let prev_kind = self.actions[target_act].kind;
                let prev_position = self.actions[target_act].position;
                let prev_len = self.actions[target_act].len_data();
                let prev_may_coalesce = self.actions[target_act].may_coalesce;
                // See if the current action can be coalesced into the
                // previous one. Works when both are inserts or removes at
                // compatible positions.
                if Some(self.current_action) == self.save_point
                    || Some(self.current_action) == self.tentative_point
                {
                    self.current_action += 1;
                } else if !self.actions[self.current_action].may_coalesce {
                    // Not allowed to coalesce if this set.
                    self.current_action += 1;
                } else if !may_coalesce || !prev_may_coalesce {
                    self.current_action += 1;
                } else if kind == ActionKind::Container
                    || self.actions[self.current_action].kind == ActionKind::Container
                {
                    // A coalescible container action.
                } else if kind != prev_kind && prev_kind != ActionKind::Start {
                    self.current_action += 1;
                } else if kind == ActionKind::Insert && position != prev_position + prev_len {
                    // Insertions must be immediately after to coalesce.
                    self.current_action += 1;
                } else if kind == ActionKind::Remove {
                    if data.len() == 1 || data.len() == 2 {
                        if position + data.len() == prev_position {
                            // Backspace.
                        } else if position == prev_position {
                            // Forward delete.
                        } else {
                            // Removals must be at the same position to
                            // coalesce.
                            self.current_action += 1;
                        }
                    } else {
                        // Removals must be of one character to coalesce.
                        self.current_action += 1;
                    }
                } else {
                    // Action coalesced.
                }
            } else {
                // Actions not at top level are always coalesced unless this
                // is after return to top level.
                if !self.actions[self.current_action].may_coalesce {
                    self.current_action += 1;
                }
            }
        } else {
            self.current_action += 1;
        }
        let start_sequence = old_current_action != self.current_action;
        self.actions[self.current_action].create(kind, position, data, may_coalesce);
        self.current_action += 1;
        self.actions[self.current_action].create_start();
        self.max_action = self.current_action;
        start_sequence
    }

    pub fn begin_undo_action(&mut self) {
        self.ensure_undo_room();
        if self.undo_sequence_depth == 0 {
            if self.actions[self.current_action].kind != ActionKind::Start {
                self.current_action += 1;
                self.actions[self.current_action].create_start();
                self.max_action = self.current_action;
            }
            self.actions[self.current_action].may_coalesce = false;
        }
        self.undo_sequence_depth += 1;
    }

    pub fn end_undo_action(&mut self) {
        debug_assert!(self.undo_sequence_depth > 0);
        self.ensure_undo_room();
        self.undo_sequence_depth -= 1;
        if self.undo_sequence_depth == 0 {
            if self.actions[self.current_action].kind != ActionKind::Start {
                self.current_action += 1;
                self.actions[self.current_action].create_start();
                self.max_action = self.current_action;
            }
            self.actions[self.current_action].may_coalesce = false;
        }
    }

    /// Abandon any open groups, e.g. when the history is cleared while a
    /// group is in flight.
    pub fn drop_undo_sequence(&mut self) {
        self.undo_sequence_depth = 0;
    }

    pub fn delete_undo_history(&mut self) {
        for action in &mut self.actions[1..] {
            action.data = None;
        }
        self.max_action = 0;
        self.current_action = 0;
        self.actions[0].create_start();
        self.save_point = Some(0);
        self.tentative_point = None;
    }

    /// Mark the current state as the one saved to disk. Undo and redo can
    /// move over the save point.
    pub fn set_save_point(&mut self) {
        self.save_point = Some(self.current_action);
    }

    pub fn is_save_point(&self) -> bool {
        self.save_point == Some(self.current_action)
    }

    pub fn tentative_start(&mut self) {
        self.tentative_point = Some(self.current_action);
    }

    pub fn tentative_commit(&mut self) {
        self.tentative_point = None;
        // Truncate undo history.
        self.max_action = self.current_action;
    }

    pub fn tentative_active(&self) -> bool {
        self.tentative_point.is_some()
    }

    /// Number of steps to roll back to the tentative start, or `None` when
    /// no tentative mode is active.
    pub fn tentative_steps(&mut self) -> Option<usize> {
        // Drop any trailing start record.
        if self.actions[self.current_action].kind == ActionKind::Start && self.current_action > 0 {
            self.current_action -= 1;
        }
        self.tentative_point.map(|tp| self.current_action - tp)
    }

    pub fn can_undo(&self) -> bool {
        self.current_action > 0 && self.max_action > 0
    }

    /// Number of records in the operation about to be undone. The caller
    /// then iterates `undo_step`/`completed_undo_step` that many times.
    pub fn start_undo(&mut self) -> usize {
        // Drop any trailing start record.
        if self.actions[self.current_action].kind == ActionKind::Start && self.current_action > 0 {
            self.current_action -= 1;
        }
        // Count the steps in this operation.
        let mut act = self.current_action;
        while self.actions[act].kind != ActionKind::Start && act > 0 {
            act -= 1;
        }
        self.current_action - act
    }

    pub fn undo_step(&self) -> &UndoAction {
        &self.actions[self.current_action]
    }

    pub fn completed_undo_step(&mut self) {
        self.current_action -= 1;
    }

    pub fn can_redo(&self) -> bool {
        self.max_action > self.current_action
    }

    pub fn start_redo(&mut self) -> usize {
        // Drop any leading start record.
        if self.current_action < self.max_action
            && self.actions[self.current_action].kind == ActionKind::Start
        {
            self.current_action += 1;
        }
        // Count the steps in this operation.
        let mut act = self.current_action;
        while act < self.max_action && self.actions[act].kind != ActionKind::Start {
            act += 1;
        }
        act - self.current_action
    }

    pub fn redo_step(&self) -> &UndoAction {
        &self.actions[self.current_action]
    }

    pub fn completed_redo_step(&mut self) {
        self.current_action += 1;
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(uh: &mut UndoHistory, position: usize, byte: u8) -> bool {
        uh.append_action(ActionKind::Insert, position, &[byte], true)
    }

    #[test]
    fn test_initial_state() {
        let uh = UndoHistory::new();
        assert!(!uh.can_undo());
        assert!(!uh.can_redo());
        assert!(uh.is_save_point());
    }

    #[test]
    fn test_typing_coalesces() {
        let mut uh = UndoHistory::new();
        assert!(typed(&mut uh, 0, b'a'));
        assert!(!typed(&mut uh, 1, b'b'));
        assert!(!typed(&mut uh, 2, b'c'));
        assert!(uh.can_undo());
        assert_eq!(uh.start_undo(), 3);
    }

    #[test]
    fn test_disjoint_inserts_do_not_coalesce() {
        let mut uh = UndoHistory::new();
        assert!(typed(&mut uh, 0, b'a'));
        assert!(typed(&mut uh, 5, b'b'));
        assert_eq!(uh.start_undo(), 1);
    }

    #[test]
    fn test_backspace_coalesces() {
        let mut uh = UndoHistory::new();
        assert!(uh.append_action(ActionKind::Remove, 5, b"x", true));
        assert!(!uh.append_action(ActionKind::Remove, 4, b"y", true));
        assert!(!uh.append_action(ActionKind::Remove, 3, b"z", true));
        assert_eq!(uh.start_undo(), 3);
    }

    #[test]
    fn test_forward_delete_coalesces() {
        let mut uh = UndoHistory::new();
        assert!(uh.append_action(ActionKind::Remove, 3, b"x", true));
        assert!(!uh.append_action(ActionKind::Remove, 3, b"y", true));
        assert_eq!(uh.start_undo(), 2);
    }

    #[test]
    fn test_long_removal_does_not_coalesce() {
        let mut uh = UndoHistory::new();
        uh.append_action(ActionKind::Remove, 3, b"x", true);
        assert!(uh.append_action(ActionKind::Remove, 0, b"abc", true));
        assert_eq!(uh.start_undo(), 1);
    }

    #[test]
    fn test_grouping_bundles_actions() {
        let mut uh = UndoHistory::new();
        uh.begin_undo_action();
        uh.append_action(ActionKind::Insert, 0, b"one", false);
        uh.append_action(ActionKind::Remove, 1, b"n", false);
        uh.append_action(ActionKind::Insert, 9, b"two", false);
        uh.end_undo_action();
        assert_eq!(uh.start_undo(), 3);
    }

    #[test]
    fn test_nested_groups_close_on_outermost_end() {
        let mut uh = UndoHistory::new();
        uh.begin_undo_action();
        uh.append_action(ActionKind::Insert, 0, b"a", false);
        uh.begin_undo_action();
        uh.append_action(ActionKind::Insert, 1, b"b", false);
        uh.end_undo_action();
        uh.append_action(ActionKind::Insert, 2, b"c", false);
        uh.end_undo_action();
        assert_eq!(uh.start_undo(), 3);
    }

    #[test]
    fn test_no_coalesce_across_group_boundary() {
        let mut uh = UndoHistory::new();
        typed(&mut uh, 0, b'a');
        uh.begin_undo_action();
        uh.append_action(ActionKind::Insert, 1, b"b", true);
        uh.end_undo_action();
        typed(&mut uh, 2, b'c');
        // Three separate operations.
        assert_eq!(uh.start_undo(), 1);
        uh.completed_undo_step();
        assert_eq!(uh.start_undo(), 1);
        uh.completed_undo_step();
        assert_eq!(uh.start_undo(), 1);
    }

    #[test]
    fn test_save_point_tracking() {
        let mut uh = UndoHistory::new();
        typed(&mut uh, 0, b'a');
        assert!(!uh.is_save_point());
        uh.set_save_point();
        assert!(uh.is_save_point());
        // Typing at a save point starts a fresh operation.
        assert!(typed(&mut uh, 1, b'b'));
        assert!(!uh.is_save_point());
        uh.start_undo();
        uh.completed_undo_step();
        assert!(uh.is_save_point());
    }

    #[test]
    fn test_save_point_invalidated_by_divergence() {
        let mut uh = UndoHistory::new();
        typed(&mut uh, 0, b'a');
        uh.set_save_point();
        uh.start_undo();
        uh.completed_undo_step();
        // Now diverge: record something else.
        typed(&mut uh, 0, b'z');
        assert!(!uh.is_save_point());
        // Redoing cannot reach the old save point any more.
        assert!(!uh.can_redo());
    }

    #[test]
    fn test_tentative_commit_truncates_redo() {
        let mut uh = UndoHistory::new();
        uh.tentative_start();
        assert!(uh.tentative_active());
        typed(&mut uh, 0, b'x');
        typed(&mut uh, 1, b'y');
        uh.tentative_commit();
        assert!(!uh.tentative_active());
        assert!(uh.can_undo());
        assert!(!uh.can_redo());
    }

    #[test]
    fn test_tentative_steps() {
        let mut uh = UndoHistory::new();
        uh.append_action(ActionKind::Insert, 0, b"a", true);
        uh.tentative_start();
        uh.append_action(ActionKind::Insert, 1, b"b", false);
        uh.append_action(ActionKind::Insert, 2, b"c", false);
        // The count includes the interior delimiter records, which the
        // rollback loop passes over.
        assert_eq!(uh.tentative_steps(), Some(3));
    }

    #[test]
    fn test_container_actions_forward_coalescing() {
        let mut uh = UndoHistory::new();
        typed(&mut uh, 0, b'a');
        uh.append_action(ActionKind::Container, 1234, &[], true);
        assert!(!typed(&mut uh, 1, b'b'));
        // All three are one operation.
        assert_eq!(uh.start_undo(), 3);
    }

    #[test]
    fn test_redo_replays_operation() {
        let mut uh = UndoHistory::new();
        typed(&mut uh, 0, b'a');
        typed(&mut uh, 1, b'b');
        let steps = uh.start_undo();
        assert_eq!(steps, 2);
        for _ in 0..steps {
            assert_eq!(uh.undo_step().kind, ActionKind::Insert);
            uh.completed_undo_step();
        }
        assert!(uh.can_redo());
        let steps = uh.start_redo();
        assert_eq!(steps, 2);
        for _ in 0..steps {
            assert_eq!(uh.redo_step().kind, ActionKind::Insert);
            uh.completed_redo_step();
        }
        assert!(!uh.can_redo());
        assert!(uh.can_undo());
    }

    #[test]
    fn test_delete_undo_history() {
        let mut uh = UndoHistory::new();
        typed(&mut uh, 0, b'a');
        uh.delete_undo_history();
        assert!(!uh.can_undo());
        assert!(!uh.can_redo());
        assert!(uh.is_save_point());
    }
}
