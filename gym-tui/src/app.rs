//! Application view state
//!
//! All mutable UI state lives here, owned by the event loop and handed to
//! the render functions as an immutable snapshot. Key handling is pure:
//! it mutates the view state and returns the data-access `Command` to run,
//! so the whole interaction flow is testable without a network.

use crate::cache::{CacheManager, Resource};
use crate::events::UiEvent;
use crate::form::MemberForm;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use shared::{DeletedMemberRecord, Member, MemberPayload};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

/// How many history entries the panel shows.
pub const HISTORY_DISPLAY_LIMIT: usize = 5;

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Members,
    History,
}

/// Pending interactive confirmation, naming the member it affects.
#[derive(Debug)]
pub enum ConfirmAction {
    Delete(Member),
    Restore(DeletedMemberRecord),
}

impl ConfirmAction {
    pub fn message(&self) -> String {
        match self {
            ConfirmAction::Delete(m) => {
                format!("Are you sure you want to delete {}?", m.name)
            }
            ConfirmAction::Restore(r) => {
                format!("Are you sure you want to restore {}?", r.name)
            }
        }
    }
}

/// The active modal overlay, if any.
#[derive(Debug)]
pub enum Modal {
    Form(MemberForm),
    Confirm(ConfirmAction),
}

/// A data-access operation for the event loop to execute.
#[derive(Debug)]
pub enum Command {
    AddMember(MemberPayload),
    UpdateMember { id: i64, payload: MemberPayload },
    DeleteMember(Member),
    RestoreMember(DeletedMemberRecord),
}

/// Footer notice, dismissible with Esc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: true,
        }
    }
}

/// Top-level view state.
pub struct App {
    pub search: Input,
    pub searching: bool,
    pub focus: Focus,
    pub selected: usize,
    pub history_selected: usize,
    pub modal: Option<Modal>,
    pub notice: Option<Notice>,
    pub caches: CacheManager,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            search: Input::default(),
            searching: false,
            focus: Focus::Members,
            selected: 0,
            history_selected: 0,
            modal: None,
            notice: None,
            caches: CacheManager::default(),
            should_quit: false,
        }
    }
}

impl App {
    /// The lowercase, trimmed search string the filter runs on.
    pub fn search_text(&self) -> String {
        self.search.value().trim().to_lowercase()
    }

    /// Members matching the current search, in service order.
    pub fn filtered_members(&self) -> Vec<Member> {
        let query = self.search_text();
        self.caches
            .members
            .snapshot()
            .unwrap_or(&[])
            .iter()
            .filter(|m| m.matches(&query))
            .cloned()
            .collect()
    }

    pub fn total_members(&self) -> usize {
        self.caches.members.snapshot().map_or(0, |m| m.len())
    }

    /// The displayed history slice: the last five entries in collection
    /// order. Restore always resolves a displayed row back to the record
    /// itself, so no positional index ever crosses the data layer.
    pub fn visible_history(&self) -> &[DeletedMemberRecord] {
        let history = self.caches.history.snapshot().unwrap_or(&[]);
        let start = history.len().saturating_sub(HISTORY_DISPLAY_LIMIT);
        &history[start..]
    }

    pub fn selected_member(&self) -> Option<Member> {
        self.filtered_members().get(self.selected).cloned()
    }

    pub fn selected_history_entry(&self) -> Option<DeletedMemberRecord> {
        self.visible_history().get(self.history_selected).cloned()
    }

    fn clamp_selections(&mut self) {
        let members = self.filtered_members().len();
        self.selected = self.selected.min(members.saturating_sub(1));
        let history = self.visible_history().len();
        self.history_selected = self.history_selected.min(history.saturating_sub(1));
        if history == 0 && self.focus == Focus::History {
            self.focus = Focus::Members;
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Members if !self.visible_history().is_empty() => Focus::History,
            _ => Focus::Members,
        };
    }

    fn move_selection(&mut self, delta: i64) {
        let (len, index) = match self.focus {
            Focus::Members => (self.filtered_members().len(), &mut self.selected),
            Focus::History => (self.visible_history().len(), &mut self.history_selected),
        };
        if len == 0 {
            *index = 0;
            return;
        }
        let next = (*index as i64 + delta).clamp(0, len as i64 - 1);
        *index = next as usize;
    }

    /// Fold a network completion event into the view state.
    pub fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::MembersLoaded { generation, result } => match result {
                Ok(items) => {
                    self.caches.members.loaded(generation, items);
                    self.clamp_selections();
                }
                Err(err) => {
                    // a superseded fetch failing is not worth a notice
                    if self.caches.members.is_current(generation) {
                        self.notice =
                            Some(Notice::error(format!("Failed to load members: {}", err)));
                    }
                    self.caches.members.load_failed(generation);
                }
            },
            UiEvent::HistoryLoaded { generation, result } => match result {
                Ok(items) => {
                    self.caches.history.loaded(generation, items);
                    self.clamp_selections();
                }
                Err(err) => {
                    if self.caches.history.is_current(generation) {
                        self.notice = Some(Notice::error(format!(
                            "Failed to load delete history: {}",
                            err
                        )));
                    }
                    self.caches.history.load_failed(generation);
                }
            },
            UiEvent::MutationFinished {
                result,
                invalidates,
            } => {
                self.caches.invalidate(invalidates);
                self.notice = Some(match result {
                    Ok(text) => Notice::info(text),
                    Err(text) => Notice::error(text),
                });
            }
        }
    }

    /// Handle a key press, returning the command to execute, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return None;
        }
        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }
        if self.searching {
            self.handle_search_key(key);
            return None;
        }
        self.handle_browse_key(key)
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.searching = false,
            _ => {
                self.search
                    .handle_event(&crossterm::event::Event::Key(key));
                // the filtered set changes on every keystroke
                self.selected = 0;
                self.clamp_selections();
            }
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('a') => self.modal = Some(Modal::Form(MemberForm::for_create())),
            KeyCode::Char('R') => self
                .caches
                .invalidate(&[Resource::Members, Resource::DeleteHistory]),
            KeyCode::Esc => self.notice = None,
            KeyCode::Tab => self.toggle_focus(),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter | KeyCode::Char('e') if self.focus == Focus::Members => {
                if let Some(member) = self.selected_member() {
                    self.modal = Some(Modal::Form(MemberForm::for_edit(&member)));
                }
            }
            KeyCode::Char('d') if self.focus == Focus::Members => {
                if let Some(member) = self.selected_member() {
                    self.modal = Some(Modal::Confirm(ConfirmAction::Delete(member)));
                }
            }
            KeyCode::Enter | KeyCode::Char('r') if self.focus == Focus::History => {
                if let Some(entry) = self.selected_history_entry() {
                    self.modal = Some(Modal::Confirm(ConfirmAction::Restore(entry)));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<Command> {
        match self.modal.take() {
            Some(Modal::Form(mut form)) => {
                match key.code {
                    // cancel: closes and clears the edit target
                    KeyCode::Esc => return None,
                    KeyCode::Enter => match form.submit() {
                        Ok(payload) => {
                            return Some(match form.editing {
                                Some(id) => Command::UpdateMember { id, payload },
                                None => Command::AddMember(payload),
                            });
                        }
                        Err(err) => form.error = Some(err.to_string()),
                    },
                    KeyCode::Tab | KeyCode::Down => form.focus_next(),
                    KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                    code if form.wants_cycle(code) => form.cycle(code == KeyCode::Right),
                    _ => form.handle_key(key),
                }
                self.modal = Some(Modal::Form(form));
                None
            }
            Some(Modal::Confirm(action)) => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(match action {
                    ConfirmAction::Delete(member) => Command::DeleteMember(member),
                    ConfirmAction::Restore(entry) => Command::RestoreMember(entry),
                }),
                KeyCode::Char('n') | KeyCode::Esc => None,
                _ => {
                    self.modal = Some(Modal::Confirm(action));
                    None
                }
            },
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use shared::MembershipType;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn member(id: i64, name: &str) -> Member {
        Member {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0100".to_string(),
            join_date: "2023-01-01".to_string(),
            membership_type: MembershipType::Normal,
            expiry_date: "2099-01-01".to_string(),
            trainer: None,
            freeze: false,
            guest_passes: 0,
        }
    }

    fn record(id: i64, name: &str) -> DeletedMemberRecord {
        DeletedMemberRecord {
            id,
            member_id: id + 1000,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0100".to_string(),
            join_date: "2023-01-01".to_string(),
            membership_type: MembershipType::Normal,
            expiry_date: "2099-01-01".to_string(),
            trainer: None,
            freeze: false,
            guest_passes: 0,
            deletion_date: "2024-01-10 09:00:00".to_string(),
        }
    }

    fn load_members(app: &mut App, members: Vec<Member>) {
        let gen = app.caches.members.begin_fetch();
        app.caches.members.loaded(gen, members);
    }

    fn load_history(app: &mut App, records: Vec<DeletedMemberRecord>) {
        let gen = app.caches.history.begin_fetch();
        app.caches.history.loaded(gen, records);
    }

    fn loaded_app() -> App {
        let mut app = App::default();
        load_members(
            &mut app,
            vec![member(1, "Ana"), member(2, "Bo"), member(3, "Cleo")],
        );
        load_history(&mut app, vec![]);
        app
    }

    #[test]
    fn search_filters_on_every_keystroke() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('/')));
        assert!(app.searching);
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('n')));
        app.handle_key(key(KeyCode::Char('a')));
        // "ana" matches the name and the email, nobody else
        let names: Vec<String> = app.filtered_members().iter().map(|m| m.name.clone()).collect();
        assert!(names.contains(&"Ana".to_string()));
        assert!(!names.contains(&"Bo".to_string()));
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.searching);
    }

    #[test]
    fn empty_search_shows_all_members() {
        let app = loaded_app();
        assert_eq!(app.filtered_members().len(), 3);
    }

    #[test]
    fn delete_requires_confirmation_naming_the_member() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected, 1);

        let cmd = app.handle_key(key(KeyCode::Char('d')));
        assert!(cmd.is_none());
        match &app.modal {
            Some(Modal::Confirm(action)) => {
                assert_eq!(action.message(), "Are you sure you want to delete Bo?");
            }
            other => panic!("expected confirm modal, got {:?}", other),
        }

        let cmd = app.handle_key(key(KeyCode::Char('y')));
        match cmd {
            Some(Command::DeleteMember(m)) => assert_eq!(m.id, 2),
            other => panic!("expected delete command, got {:?}", other),
        }
        assert!(app.modal.is_none());
    }

    #[test]
    fn declining_a_confirmation_runs_nothing() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('d')));
        let cmd = app.handle_key(key(KeyCode::Char('n')));
        assert!(cmd.is_none());
        assert!(app.modal.is_none());
    }

    #[test]
    fn history_panel_shows_only_the_last_five() {
        let mut app = loaded_app();
        let full: Vec<DeletedMemberRecord> =
            (101..=108).map(|id| record(id, "Old")).collect();
        load_history(&mut app, full);

        let visible = app.visible_history();
        assert_eq!(visible.len(), 5);
        let ids: Vec<i64> = visible.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![104, 105, 106, 107, 108]);
    }

    #[test]
    fn restore_resolves_display_position_to_the_stable_entry_id() {
        // Full history of 8; the display shows entries 3..8. Display
        // index 2 must address exactly the entry at full position
        // 8 - 5 + 2, never an off-by-one neighbour.
        let mut app = loaded_app();
        let full: Vec<DeletedMemberRecord> =
            (101..=108).map(|id| record(id, &format!("M{}", id))).collect();
        load_history(&mut app, full);

        app.focus = Focus::History;
        app.history_selected = 2;
        app.handle_key(key(KeyCode::Char('r')));
        match &app.modal {
            Some(Modal::Confirm(ConfirmAction::Restore(entry))) => {
                assert_eq!(entry.id, 106);
            }
            other => panic!("expected restore confirm, got {:?}", other),
        }
        let cmd = app.handle_key(key(KeyCode::Enter));
        match cmd {
            Some(Command::RestoreMember(entry)) => assert_eq!(entry.id, 106),
            other => panic!("expected restore command, got {:?}", other),
        }
    }

    #[test]
    fn edit_then_cancel_then_add_shows_creation_defaults() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('e')));
        match &app.modal {
            Some(Modal::Form(form)) => {
                assert_eq!(form.editing, Some(1));
                assert_eq!(form.name.value(), "Ana");
            }
            other => panic!("expected form modal, got {:?}", other),
        }

        app.handle_key(key(KeyCode::Esc));
        assert!(app.modal.is_none());

        app.handle_key(key(KeyCode::Char('a')));
        match &app.modal {
            Some(Modal::Form(form)) => {
                assert_eq!(form.editing, None);
                assert_eq!(form.name.value(), "");
                assert_eq!(form.membership_type, None);
            }
            other => panic!("expected form modal, got {:?}", other),
        }
    }

    #[test]
    fn mutation_invalidates_the_declared_resources() {
        let mut app = loaded_app();
        app.apply_event(UiEvent::MutationFinished {
            result: Ok("Ana has been deleted.".to_string()),
            invalidates: &[Resource::Members, Resource::DeleteHistory],
        });
        assert!(app.caches.members.needs_fetch());
        assert!(app.caches.history.needs_fetch());
        assert_eq!(app.notice, Some(Notice::info("Ana has been deleted.")));
    }

    #[test]
    fn failed_fetch_keeps_snapshot_and_raises_a_notice() {
        let mut app = loaded_app();
        let gen = app.caches.members.begin_fetch();
        app.apply_event(UiEvent::MembersLoaded {
            generation: gen,
            result: Err("connection refused".to_string()),
        });
        assert_eq!(app.filtered_members().len(), 3);
        assert!(app.notice.as_ref().is_some_and(|n| n.error));

        // Esc dismisses the notice
        app.handle_key(key(KeyCode::Esc));
        assert!(app.notice.is_none());
    }

    #[test]
    fn late_result_of_a_superseded_fetch_changes_nothing() {
        let mut app = loaded_app();
        // a fetch is in flight when a mutation invalidates the slot and a
        // refetch starts; the refetch lands first
        let old_gen = app.caches.members.begin_fetch();
        app.caches.invalidate(&[Resource::Members]);
        let new_gen = app.caches.members.begin_fetch();
        app.apply_event(UiEvent::MembersLoaded {
            generation: new_gen,
            result: Ok(vec![member(9, "Zed")]),
        });
        assert_eq!(app.filtered_members().len(), 1);

        // the first fetch finally resolves with pre-mutation data
        app.apply_event(UiEvent::MembersLoaded {
            generation: old_gen,
            result: Ok(vec![member(1, "Ana"), member(2, "Bo"), member(3, "Cleo")]),
        });
        assert_eq!(app.filtered_members().len(), 1);
        assert!(!app.caches.members.needs_fetch());

        // and a superseded failure raises no notice
        app.apply_event(UiEvent::MembersLoaded {
            generation: old_gen,
            result: Err("timeout".to_string()),
        });
        assert!(app.notice.is_none());
    }

    #[test]
    fn focus_never_lands_on_an_empty_history_panel() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Members);

        load_history(&mut app, vec![record(1, "Old")]);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::History);

        // history emptied by a refetch pulls focus back
        let gen = app.caches.history.begin_fetch();
        app.apply_event(UiEvent::HistoryLoaded {
            generation: gen,
            result: Ok(vec![]),
        });
        assert_eq!(app.focus, Focus::Members);
    }
}
