//! Form model for an expanded command.
//!
//! [`ControlSet::render`] turns a command's field descriptors into live
//! controls, one per field in declaration order. The set is owned by whoever
//! holds the expanded command and is dropped when it collapses.
//!
//! Editing goes through the methods on [`ControlSet`]. Every successful edit
//! re-evaluates the visibility of the fields controlled by the edited field,
//! and only those.

use std::collections::HashMap;

use heck::ToTitleCase;
use hllrcon_types::{Command, Field, FieldKind, SelectOption, VisibilityRule};
use thiserror::Error;

use crate::visibility::is_visible;

pub const DEFAULT_SELECT_PLACEHOLDER: &str = "Select an option...";
pub const MAP_SELECT_PLACEHOLDER: &str = "Select a map...";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{field}' is a {found} control, not a {expected} control")]
    WrongWidget {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("field '{field}' has no option at position {index}")]
    OptionOutOfRange { field: String, index: usize },
    #[error("the placeholder of '{0}' cannot be selected")]
    PlaceholderNotSelectable(String),
    #[error("'{value}' is not an option of '{field}'")]
    UnknownOption { field: String, value: String },
}

/// One entry of a [`Choice`]. Entry 0 is always the disabled placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceEntry {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

impl ChoiceEntry {
    fn placeholder(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
            disabled: true,
        }
    }

    fn option(option: &SelectOption) -> Self {
        Self {
            value: option.value.clone(),
            label: option.label.clone(),
            disabled: false,
        }
    }

    fn map(name: &str) -> Self {
        Self {
            value: name.to_string(),
            label: name.to_string(),
            disabled: false,
        }
    }
}

/// Enumerated choice control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub entries: Vec<ChoiceEntry>,
    pub selected: usize,
    /// Waiting for the map catalog; filled once by [`ControlSet::backfill_maps`].
    pub pending: bool,
}

impl Choice {
    fn new(placeholder: impl Into<String>, options: impl IntoIterator<Item = ChoiceEntry>) -> Self {
        let mut entries = vec![ChoiceEntry::placeholder(placeholder)];
        entries.extend(options);
        Self {
            entries,
            selected: 0,
            pending: false,
        }
    }

    pub fn selected_entry(&self) -> &ChoiceEntry {
        &self.entries[self.selected]
    }

    /// Selectable entries, placeholder excluded.
    pub fn options(&self) -> &[ChoiceEntry] {
        &self.entries[1..]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    SingleLine { value: String },
    MultiLine { value: String, rows: u16 },
    Numeric { value: String },
    Toggle { checked: bool },
    Choice(Choice),
}

impl Widget {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SingleLine { .. } => "text",
            Self::MultiLine { .. } => "multi-line text",
            Self::Numeric { .. } => "numeric",
            Self::Toggle { .. } => "toggle",
            Self::Choice(_) => "choice",
        }
    }

    /// The control's current value as the operator would see it submitted.
    pub fn raw_value(&self) -> String {
        match self {
            Self::SingleLine { value } | Self::MultiLine { value, .. } | Self::Numeric { value } => value.clone(),
            Self::Toggle { checked } => checked.to_string(),
            Self::Choice(choice) => choice.selected_entry().value.clone(),
        }
    }

    pub fn is_text_entry(&self) -> bool {
        matches!(self, Self::SingleLine { .. } | Self::MultiLine { .. } | Self::Numeric { .. })
    }

    fn for_field(field: &Field, maps: Option<&[String]>) -> Self {
        if field.is_map_field() {
            let placeholder = field.placeholder.as_deref().unwrap_or(MAP_SELECT_PLACEHOLDER);
            let mut choice = Choice::new(placeholder, maps.unwrap_or_default().iter().map(|name| ChoiceEntry::map(name)));
            choice.pending = maps.is_none();
            return Self::Choice(choice);
        }

        match &field.kind {
            FieldKind::Text => Self::SingleLine { value: String::new() },
            FieldKind::MultilineText { rows } => Self::MultiLine {
                value: String::new(),
                rows: *rows,
            },
            FieldKind::Number => Self::Numeric { value: String::new() },
            FieldKind::Checkbox { default } => Self::Toggle { checked: *default },
            FieldKind::Select { options } => Self::Choice(Choice::new(
                field.placeholder.as_deref().unwrap_or(DEFAULT_SELECT_PLACEHOLDER),
                options.iter().map(ChoiceEntry::option),
            )),
        }
    }
}

/// A rendered field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub field_name: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    pub visible: bool,
    pub widget: Widget,
    visibility: Option<VisibilityRule>,
}

/// Live controls of one expanded command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSet {
    command_name: String,
    controls: Vec<Control>,
    /// controlling field → indices of the controls it shows or hides
    dependents: HashMap<String, Vec<usize>>,
}

impl ControlSet {
    /// Build one control per field, in declaration order.
    ///
    /// `maps` is the current map catalog; `None` leaves map selectors pending.
    pub fn render(command: &Command, maps: Option<&[String]>) -> Self {
        let controls: Vec<Control> = command
            .fields
            .iter()
            .map(|field| Control {
                field_name: field.name.clone(),
                label: field.name.to_title_case(),
                placeholder: field.placeholder.clone(),
                description: field.description.clone(),
                visible: field.visibility.is_none(),
                widget: Widget::for_field(field, maps),
                visibility: field.visibility.clone(),
            })
            .collect();

        let mut dependents: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, control) in controls.iter().enumerate() {
            if let Some(rule) = control.visibility.as_ref() {
                dependents.entry(rule.controlling_field.clone()).or_default().push(index);
            }
        }

        let mut set = Self {
            command_name: command.name.clone(),
            controls,
            dependents,
        };
        let controllers: Vec<String> = set.dependents.keys().cloned().collect();
        for controller in controllers {
            set.refresh_dependents(&controller);
        }
        set
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, field_name: &str) -> Option<&Control> {
        self.controls.iter().find(|control| control.field_name == field_name)
    }

    pub fn raw_value(&self, field_name: &str) -> Option<String> {
        self.control(field_name).map(|control| control.widget.raw_value())
    }

    pub fn is_visible(&self, field_name: &str) -> bool {
        self.control(field_name).is_some_and(|control| control.visible)
    }

    /// Indices of the currently visible controls.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.controls
            .iter()
            .enumerate()
            .filter(|(_, control)| control.visible)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn has_pending_maps(&self) -> bool {
        self.controls
            .iter()
            .any(|control| matches!(&control.widget, Widget::Choice(choice) if choice.pending))
    }

    /// Replace the text of a single-line, multi-line or numeric control.
    pub fn set_text(&mut self, field_name: &str, text: impl Into<String>) -> Result<(), FormError> {
        let control = self.control_mut(field_name)?;
        match &mut control.widget {
            Widget::SingleLine { value } | Widget::MultiLine { value, .. } | Widget::Numeric { value } => *value = text.into(),
            other => return Err(wrong_widget(field_name, "text", other)),
        }
        self.refresh_dependents(field_name);
        Ok(())
    }

    pub fn toggle(&mut self, field_name: &str) -> Result<(), FormError> {
        let control = self.control_mut(field_name)?;
        match &mut control.widget {
            Widget::Toggle { checked } => *checked = !*checked,
            other => return Err(wrong_widget(field_name, "toggle", other)),
        }
        self.refresh_dependents(field_name);
        Ok(())
    }

    /// Select the entry at `index` (0 is the placeholder and is refused).
    pub fn select_index(&mut self, field_name: &str, index: usize) -> Result<(), FormError> {
        let choice = self.choice_mut(field_name)?;
        let entry = choice.entries.get(index).ok_or_else(|| FormError::OptionOutOfRange {
            field: field_name.to_string(),
            index,
        })?;
        if entry.disabled {
            return Err(FormError::PlaceholderNotSelectable(field_name.to_string()));
        }
        choice.selected = index;
        self.refresh_dependents(field_name);
        Ok(())
    }

    /// Select the option whose submitted value is `value`.
    pub fn select_value(&mut self, field_name: &str, value: &str) -> Result<(), FormError> {
        let choice = self.choice_mut(field_name)?;
        let index = choice
            .entries
            .iter()
            .position(|entry| !entry.disabled && entry.value == value)
            .ok_or_else(|| FormError::UnknownOption {
                field: field_name.to_string(),
                value: value.to_string(),
            })?;
        self.select_index(field_name, index)
    }

    /// Move to the next (or previous) selectable option, wrapping around.
    /// Leaves the placeholder selected when there are no options.
    pub fn cycle_choice(&mut self, field_name: &str, forward: bool) -> Result<(), FormError> {
        let choice = self.choice_mut(field_name)?;
        let option_count = choice.entries.len() - 1;
        if option_count == 0 {
            return Ok(());
        }
        let next = match (choice.selected, forward) {
            (0, true) => 1,
            (0, false) => option_count,
            (current, true) => current % option_count + 1,
            (current, false) => (current + option_count - 2) % option_count + 1,
        };
        choice.selected = next;
        self.refresh_dependents(field_name);
        Ok(())
    }

    /// Fill every pending map selector with `maps`, keeping the placeholder.
    /// Returns how many controls were filled; controls that are not pending
    /// are left alone.
    pub fn backfill_maps(&mut self, maps: &[String]) -> usize {
        let mut filled = 0;
        for control in &mut self.controls {
            let Widget::Choice(choice) = &mut control.widget else {
                continue;
            };
            if !choice.pending {
                continue;
            }
            choice.entries.truncate(1);
            choice.entries.extend(maps.iter().map(|name| ChoiceEntry::map(name)));
            choice.selected = 0;
            choice.pending = false;
            filled += 1;
        }
        filled
    }

    fn control_mut(&mut self, field_name: &str) -> Result<&mut Control, FormError> {
        self.controls
            .iter_mut()
            .find(|control| control.field_name == field_name)
            .ok_or_else(|| FormError::UnknownField(field_name.to_string()))
    }

    fn choice_mut(&mut self, field_name: &str) -> Result<&mut Choice, FormError> {
        let control = self.control_mut(field_name)?;
        match &mut control.widget {
            Widget::Choice(choice) => Ok(choice),
            other => Err(wrong_widget(field_name, "choice", other)),
        }
    }

    fn refresh_dependents(&mut self, controlling_field: &str) {
        let Some(indices) = self.dependents.get(controlling_field) else {
            return;
        };
        let Some(value) = self.raw_value(controlling_field) else {
            return;
        };
        for &index in indices {
            let control = &mut self.controls[index];
            if let Some(rule) = control.visibility.as_ref() {
                control.visible = is_visible(&value, &rule.visible_when);
            }
        }
    }
}

fn wrong_widget(field_name: &str, expected: &'static str, found: &Widget) -> FormError {
    FormError::WrongWidget {
        field: field_name.to_string(),
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hllrcon_registry::CommandRegistry;
    use hllrcon_types::HttpMethod;

    fn builtin(name: &str) -> Command {
        let registry = CommandRegistry::builtin();
        registry.find_by_name(name).map(|(_, command)| command.clone()).expect("command in catalog")
    }

    #[test]
    fn renders_one_control_per_field_in_order() {
        let set = ControlSet::render(&builtin("TemporaryBanPlayer"), None);
        let names: Vec<&str> = set.controls().iter().map(|control| control.field_name.as_str()).collect();
        assert_eq!(names, vec!["player_id", "duration", "reason", "admin_name"]);
        assert_eq!(set.control("player_id").map(|control| control.label.as_str()), Some("Player Id"));
        assert!(matches!(set.control("duration").map(|c| &c.widget), Some(Widget::Numeric { .. })));
    }

    #[test]
    fn kinds_map_to_widgets() {
        let broadcast = ControlSet::render(&builtin("ServerBroadcast"), None);
        assert_eq!(
            broadcast.control("message").map(|c| &c.widget),
            Some(&Widget::MultiLine {
                value: String::new(),
                rows: 3
            })
        );

        let shuffle = ControlSet::render(&builtin("SetMapShuffleEnabled"), None);
        assert_eq!(shuffle.raw_value("enable").as_deref(), Some("true"));
    }

    #[test]
    fn select_starts_on_disabled_placeholder() {
        let set = ControlSet::render(&builtin("ForceTeamSwitch"), None);
        let Some(Widget::Choice(choice)) = set.control("force_mode").map(|c| &c.widget) else {
            panic!("force_mode should be a choice");
        };
        assert_eq!(choice.selected, 0);
        assert!(choice.entries[0].disabled);
        assert_eq!(choice.entries[0].label, "Select force mode");
        assert_eq!(choice.options().len(), 2);
        assert_eq!(set.raw_value("force_mode").as_deref(), Some(""));
    }

    #[test]
    fn conditional_field_tracks_controller_value() {
        let mut set = ControlSet::render(&builtin("GetServerInformation"), None);
        assert!(!set.is_visible("value"), "conditional fields start hidden");

        set.select_value("type", "player").expect("select player");
        assert!(set.is_visible("value"));

        set.select_value("type", "players").expect("select players");
        assert!(!set.is_visible("value"));

        set.cycle_choice("type", false).expect("cycle back");
        assert_eq!(set.raw_value("type").as_deref(), Some("serverconfig"));
        assert!(!set.is_visible("value"));
    }

    #[test]
    fn edits_only_touch_dependents_of_the_edited_field() {
        let command = Command::new("Sample", HttpMethod::Post, "/sample", "").with_fields(vec![
            Field::select("a", vec![SelectOption::literal("x"), SelectOption::literal("y")]),
            Field::text("b"),
            Field::text("shown_by_a").visible_when("a", ["x"]),
            Field::text("shown_by_b").visible_when("b", ["go"]),
        ]);
        let mut set = ControlSet::render(&command, None);

        set.select_value("a", "x").expect("select");
        assert!(set.is_visible("shown_by_a"));
        assert!(!set.is_visible("shown_by_b"));

        set.set_text("b", "go").expect("type");
        assert!(set.is_visible("shown_by_a"));
        assert!(set.is_visible("shown_by_b"));

        set.set_text("b", "stop").expect("type");
        assert!(set.is_visible("shown_by_a"));
        assert!(!set.is_visible("shown_by_b"));
    }

    #[test]
    fn conditional_field_is_visible_when_controller_starts_in_set() {
        let command = Command::new("Sample", HttpMethod::Post, "/sample", "").with_fields(vec![
            Field::checkbox("enable", true),
            Field::number("duration").visible_when("enable", ["true"]),
        ]);
        let mut set = ControlSet::render(&command, None);
        assert!(set.is_visible("duration"));
        set.toggle("enable").expect("toggle");
        assert!(!set.is_visible("duration"));
    }

    #[test]
    fn placeholder_and_out_of_range_selection_are_refused() {
        let mut set = ControlSet::render(&builtin("SetMatchTimer"), None);
        assert_eq!(set.select_index("game_mode", 0), Err(FormError::PlaceholderNotSelectable("game_mode".into())));
        assert!(matches!(set.select_index("game_mode", 9), Err(FormError::OptionOutOfRange { .. })));
        assert!(matches!(set.select_value("game_mode", "Domination"), Err(FormError::UnknownOption { .. })));
        set.select_index("game_mode", 2).expect("select offensive");
        assert_eq!(set.raw_value("game_mode").as_deref(), Some("Offensive"));
    }

    #[test]
    fn wrong_widget_and_unknown_field_are_errors() {
        let mut set = ControlSet::render(&builtin("SetMatchTimer"), None);
        assert!(matches!(set.toggle("game_mode"), Err(FormError::WrongWidget { .. })));
        assert!(matches!(set.set_text("game_mode", "x"), Err(FormError::WrongWidget { .. })));
        assert_eq!(set.set_text("nope", "x"), Err(FormError::UnknownField("nope".into())));
    }

    #[test]
    fn cycling_wraps_and_skips_placeholder() {
        let mut set = ControlSet::render(&builtin("SetWarmupTimer"), None);
        set.cycle_choice("game_mode", true).expect("cycle");
        assert_eq!(set.raw_value("game_mode").as_deref(), Some("Warfare"));
        set.cycle_choice("game_mode", true).expect("cycle");
        assert_eq!(set.raw_value("game_mode").as_deref(), Some("Skirmish"));
        set.cycle_choice("game_mode", true).expect("cycle");
        assert_eq!(set.raw_value("game_mode").as_deref(), Some("Warfare"));
        set.cycle_choice("game_mode", false).expect("cycle");
        assert_eq!(set.raw_value("game_mode").as_deref(), Some("Skirmish"));
    }

    #[test]
    fn map_fields_render_as_choices_from_catalog() {
        let maps = vec!["carentan_warfare".to_string(), "foy_warfare".to_string()];
        let set = ControlSet::render(&builtin("SetDynamicWeatherEnabled"), Some(&maps));
        let Some(Widget::Choice(choice)) = set.control("map_id").map(|c| &c.widget) else {
            panic!("map_id should be a choice despite its text kind");
        };
        assert!(!choice.pending);
        assert_eq!(choice.entries[0].label, "carentan_warfare", "the field's own placeholder leads");
        assert!(choice.entries[0].disabled);
        assert_eq!(choice.options().iter().map(|e| e.value.as_str()).collect::<Vec<_>>(), vec!["carentan_warfare", "foy_warfare"]);
    }

    #[test]
    fn map_choice_without_placeholder_uses_generic_prompt() {
        let command = Command::new("ChangeMap", HttpMethod::Post, "/api/v2/change-map", "").with_fields(vec![Field::text("map_name")]);
        let set = ControlSet::render(&command, None);
        let Some(Widget::Choice(choice)) = set.control("map_name").map(|c| &c.widget) else {
            panic!("map_name should be a choice");
        };
        assert_eq!(choice.entries[0].label, MAP_SELECT_PLACEHOLDER);
        assert!(choice.pending);
    }

    #[test]
    fn pending_map_selectors_are_backfilled_once() {
        let mut set = ControlSet::render(&builtin("AddMapToRotation"), None);
        assert!(set.has_pending_maps());

        let maps = vec!["kursk_warfare".to_string()];
        assert_eq!(set.backfill_maps(&maps), 1);
        assert!(!set.has_pending_maps());

        let later = vec!["other_map".to_string(), "another_map".to_string()];
        assert_eq!(set.backfill_maps(&later), 0, "filled selectors are not refilled");

        let Some(Widget::Choice(choice)) = set.control("map_name").map(|c| &c.widget) else {
            panic!("map_name should be a choice");
        };
        assert_eq!(choice.entries.len(), 2);
        assert!(choice.entries[0].disabled);
        assert_eq!(choice.entries[1].value, "kursk_warfare");
    }
}
