//! Member edit form state
//!
//! A pure input collector: it pre-fills from a member (edit) or from
//! creation defaults, validates on submit, and hands a `MemberPayload`
//! back to the caller. It never talks to the data access layer itself.

use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{Event, KeyCode, KeyEvent};
use shared::{Member, MemberPayload, MembershipType, ValidationError, TRAINERS};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

/// Form fields, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Phone,
    JoinDate,
    MembershipType,
    ExpiryDate,
    Trainer,
    Freeze,
    GuestPasses,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::JoinDate,
        FormField::MembershipType,
        FormField::ExpiryDate,
        FormField::Trainer,
        FormField::Freeze,
        FormField::GuestPasses,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Full Name",
            FormField::Email => "Email Address",
            FormField::Phone => "Phone Number",
            FormField::JoinDate => "Join Date",
            FormField::MembershipType => "Membership Type",
            FormField::ExpiryDate => "Expiry Date",
            FormField::Trainer => "Trainer",
            FormField::Freeze => "Freeze Status",
            FormField::GuestPasses => "Guest Passes",
        }
    }

    /// Selector fields cycle with Left/Right instead of taking text.
    pub fn is_selector(&self) -> bool {
        matches!(
            self,
            FormField::MembershipType | FormField::Trainer | FormField::Freeze
        )
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }
}

/// Modal form state for creating or editing a member.
#[derive(Debug)]
pub struct MemberForm {
    /// Member id when editing, `None` in create mode
    pub editing: Option<i64>,
    pub name: Input,
    pub email: Input,
    pub phone: Input,
    pub join_date: Input,
    pub expiry_date: Input,
    pub guest_passes: Input,
    /// `None` until a tier is picked; the field is required
    pub membership_type: Option<MembershipType>,
    /// `None` means "No Trainer"
    pub trainer: Option<String>,
    pub freeze: bool,
    pub focus: FormField,
    /// Validation message shown inside the modal
    pub error: Option<String>,
}

impl MemberForm {
    /// Creation defaults: join date today, expiry exactly one year out,
    /// everything else empty/off.
    pub fn for_create_on(today: NaiveDate) -> Self {
        Self {
            editing: None,
            name: Input::default(),
            email: Input::default(),
            phone: Input::default(),
            join_date: Input::new(today.format("%Y-%m-%d").to_string()),
            expiry_date: Input::new(one_year_after(today).format("%Y-%m-%d").to_string()),
            guest_passes: Input::new("0".to_string()),
            membership_type: None,
            trainer: None,
            freeze: false,
            focus: FormField::Name,
            error: None,
        }
    }

    pub fn for_create() -> Self {
        Self::for_create_on(Local::now().date_naive())
    }

    /// Pre-fill every field from an existing member.
    pub fn for_edit(member: &Member) -> Self {
        Self {
            editing: Some(member.id),
            name: Input::new(member.name.clone()),
            email: Input::new(member.email.clone()),
            phone: Input::new(member.phone.clone()),
            join_date: Input::new(member.join_date.clone()),
            expiry_date: Input::new(member.expiry_date.clone()),
            guest_passes: Input::new(member.guest_passes.to_string()),
            membership_type: Some(member.membership_type),
            trainer: member.trainer.clone(),
            freeze: member.freeze,
            focus: FormField::Name,
            error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Member"
        } else {
            "Add New Member"
        }
    }

    pub fn focus_next(&mut self) {
        let next = (self.focus.index() + 1) % FormField::ALL.len();
        self.focus = FormField::ALL[next];
    }

    pub fn focus_prev(&mut self) {
        let prev = (self.focus.index() + FormField::ALL.len() - 1) % FormField::ALL.len();
        self.focus = FormField::ALL[prev];
    }

    /// Cycle the focused selector. `forward` is Right, otherwise Left.
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            FormField::MembershipType => {
                let options: Vec<Option<MembershipType>> = std::iter::once(None)
                    .chain(MembershipType::ALL.into_iter().map(Some))
                    .collect();
                self.membership_type = cycled(&options, &self.membership_type, forward);
            }
            FormField::Trainer => {
                let options: Vec<Option<String>> = std::iter::once(None)
                    .chain(TRAINERS.iter().map(|t| Some(t.to_string())))
                    .collect();
                self.trainer = cycled(&options, &self.trainer, forward);
            }
            FormField::Freeze => self.freeze = !self.freeze,
            _ => {}
        }
    }

    /// Route a key to the focused text field.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let input = match self.focus {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::JoinDate => &mut self.join_date,
            FormField::ExpiryDate => &mut self.expiry_date,
            FormField::GuestPasses => &mut self.guest_passes,
            _ => return,
        };
        input.handle_event(&Event::Key(key));
    }

    /// Whether a plain Left/Right key cycles (selector) or edits text.
    pub fn wants_cycle(&self, code: KeyCode) -> bool {
        matches!(code, KeyCode::Left | KeyCode::Right) && self.focus.is_selector()
    }

    /// Displayed value of the focused selector.
    pub fn selector_value(&self, field: FormField) -> String {
        match field {
            FormField::MembershipType => self
                .membership_type
                .map(|t| t.to_string())
                .unwrap_or_else(|| "Select Membership Type".to_string()),
            FormField::Trainer => self
                .trainer
                .clone()
                .unwrap_or_else(|| "No Trainer".to_string()),
            FormField::Freeze => if self.freeze { "Frozen" } else { "Active" }.to_string(),
            _ => String::new(),
        }
    }

    /// Package the fields into a validated payload.
    ///
    /// Guest passes fall back to 0 when unparsable; the freeze selector
    /// submits as a boolean.
    pub fn submit(&self) -> Result<MemberPayload, ValidationError> {
        let membership_type = self
            .membership_type
            .ok_or(ValidationError::Required("membershipType"))?;
        let payload = MemberPayload {
            name: self.name.value().trim().to_string(),
            email: self.email.value().trim().to_string(),
            phone: self.phone.value().trim().to_string(),
            join_date: self.join_date.value().trim().to_string(),
            membership_type,
            expiry_date: self.expiry_date.value().trim().to_string(),
            trainer: self.trainer.clone(),
            freeze: self.freeze,
            guest_passes: self.guest_passes.value().trim().parse().unwrap_or(0),
        };
        payload.validate()?;
        Ok(payload)
    }
}

/// Step through `options` from the current value. Unknown current values
/// restart at the first option.
fn cycled<T: Clone + PartialEq>(options: &[T], current: &T, forward: bool) -> T {
    let len = options.len();
    let pos = options.iter().position(|o| o == current).unwrap_or(0);
    let next = if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    options[next].clone()
}

/// Feb 29 rolls over to Mar 1 in non-leap target years.
fn one_year_after(date: NaiveDate) -> NaiveDate {
    date.with_year(date.year() + 1).unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(date.year() + 1, 3, 1).expect("Mar 1 is always valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Member {
        Member {
            id: 7,
            name: "Ana Silva".to_string(),
            email: "ana@example.com".to_string(),
            phone: "555-0142".to_string(),
            join_date: "2023-03-01".to_string(),
            membership_type: MembershipType::Premium,
            expiry_date: "2025-03-01".to_string(),
            trainer: Some("David Kim".to_string()),
            freeze: true,
            guest_passes: 2,
        }
    }

    #[test]
    fn create_defaults_join_today_expiry_one_year_out() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let form = MemberForm::for_create_on(today);
        assert_eq!(form.join_date.value(), "2024-01-10");
        assert_eq!(form.expiry_date.value(), "2025-01-10");
        assert_eq!(form.name.value(), "");
        assert_eq!(form.membership_type, None);
        assert_eq!(form.trainer, None);
        assert!(!form.freeze);
        assert_eq!(form.guest_passes.value(), "0");
        assert_eq!(form.title(), "Add New Member");
    }

    #[test]
    fn leap_day_expiry_rolls_to_march_first() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let form = MemberForm::for_create_on(today);
        assert_eq!(form.expiry_date.value(), "2025-03-01");
    }

    #[test]
    fn edit_prefills_every_field() {
        let form = MemberForm::for_edit(&member());
        assert_eq!(form.editing, Some(7));
        assert_eq!(form.name.value(), "Ana Silva");
        assert_eq!(form.membership_type, Some(MembershipType::Premium));
        assert_eq!(form.trainer.as_deref(), Some("David Kim"));
        assert!(form.freeze);
        assert_eq!(form.guest_passes.value(), "2");
        assert_eq!(form.title(), "Edit Member");
    }

    #[test]
    fn rebuilding_for_create_never_leaks_edited_fields() {
        // edit A, cancel, then add: creation defaults, not A's fields
        let _edited = MemberForm::for_edit(&member());
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let fresh = MemberForm::for_create_on(today);
        assert_eq!(fresh.name.value(), "");
        assert_eq!(fresh.trainer, None);
        assert_eq!(fresh.membership_type, None);
        assert!(!fresh.freeze);
    }

    #[test]
    fn unparsable_guest_passes_default_to_zero() {
        let mut form = MemberForm::for_edit(&member());
        form.guest_passes = Input::new("abc".to_string());
        let payload = form.submit().unwrap();
        assert_eq!(payload.guest_passes, 0);
    }

    #[test]
    fn submit_requires_a_membership_type() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let mut form = MemberForm::for_create_on(today);
        form.name = Input::new("Bo".to_string());
        form.email = Input::new("bo@example.com".to_string());
        form.phone = Input::new("555-0100".to_string());
        assert_eq!(
            form.submit(),
            Err(ValidationError::Required("membershipType"))
        );

        form.membership_type = Some(MembershipType::Normal);
        let payload = form.submit().unwrap();
        assert!(!payload.freeze);
        assert_eq!(payload.expiry_date, "2025-01-10");
    }

    #[test]
    fn freeze_selector_submits_as_boolean() {
        let mut form = MemberForm::for_edit(&member());
        assert!(form.submit().unwrap().freeze);
        form.focus = FormField::Freeze;
        form.cycle(true);
        assert!(!form.submit().unwrap().freeze);
    }

    #[test]
    fn membership_selector_cycles_through_all_tiers() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let mut form = MemberForm::for_create_on(today);
        form.focus = FormField::MembershipType;
        form.cycle(true);
        assert_eq!(form.membership_type, Some(MembershipType::Normal));
        form.cycle(true);
        assert_eq!(form.membership_type, Some(MembershipType::Premium));
        form.cycle(true);
        assert_eq!(form.membership_type, Some(MembershipType::Vip));
        form.cycle(true);
        assert_eq!(form.membership_type, None);
        form.cycle(false);
        assert_eq!(form.membership_type, Some(MembershipType::Vip));
    }
}
