use shared::domain::VehicleId;

/// Which record, if any, the form is currently editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing(VehicleId),
}

impl EditSession {
    /// Starts editing `id`. Returns the id of an edit this one replaced.
    pub fn begin(&mut self, id: VehicleId) -> Option<VehicleId> {
        match std::mem::replace(self, EditSession::Editing(id)) {
            EditSession::Editing(previous) => Some(previous),
            EditSession::Idle => None,
        }
    }

    /// Ends the session (save, cancel or a fresh add), returning the id that
    /// was being edited.
    pub fn reset(&mut self) -> Option<VehicleId> {
        match std::mem::take(self) {
            EditSession::Editing(id) => Some(id),
            EditSession::Idle => None,
        }
    }

    pub fn editing_id(&self) -> Option<&VehicleId> {
        match self {
            EditSession::Editing(id) => Some(id),
            EditSession::Idle => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_replaces_an_active_edit() {
        let mut session = EditSession::default();
        assert_eq!(session.begin(VehicleId::new("1")), None);
        assert_eq!(session.begin(VehicleId::new("2")), Some(VehicleId::new("1")));
        assert_eq!(session.editing_id(), Some(&VehicleId::new("2")));
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut session = EditSession::Editing(VehicleId::new("9"));
        assert_eq!(session.reset(), Some(VehicleId::new("9")));
        assert!(!session.is_editing());
        assert_eq!(session.reset(), None);
    }
}
