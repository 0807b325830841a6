use std::collections::HashSet;

use hllrcon_types::{Command, CommandId, Section};
use hllrcon_util::{placeholder_candidates, route_placeholders};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::builtin_sections;

/// Structural problems found by [`CommandRegistry::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{command}: duplicate field '{field}'")]
    DuplicateField { command: String, field: String },
    #[error("{command}: field '{field}' is controlled by unknown field '{controller}'")]
    UnknownController {
        command: String,
        field: String,
        controller: String,
    },
    #[error("{command}: field '{field}' cannot control its own visibility")]
    SelfControlled { command: String, field: String },
    #[error("{command}: route placeholder ':{placeholder}' has no matching field")]
    UnsatisfiablePlaceholder { command: String, placeholder: String },
}

/// The command catalog, grouped into sections.
///
/// Descriptors are immutable once loaded; the console addresses them by
/// [`CommandId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRegistry {
    pub sections: Vec<Section>,
}

impl CommandRegistry {
    /// Creates the registry from the compiled-in catalog.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hllrcon_registry::CommandRegistry;
    ///
    /// let registry = CommandRegistry::builtin();
    /// let command = registry.find_by_name("KickPlayer").map(|(_, command)| command).expect("KickPlayer");
    /// assert_eq!(command.path, "/api/v2/kick");
    /// ```
    pub fn builtin() -> Self {
        Self::new(builtin_sections())
    }

    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn get(&self, id: CommandId) -> Option<&Command> {
        self.sections.get(id.section)?.commands.get(id.index)
    }

    /// First command with exactly this name.
    pub fn find_by_name(&self, name: &str) -> Option<(CommandId, &Command)> {
        self.iter().find(|(_, command)| command.name == name)
    }

    /// All commands with their ids, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (CommandId, &Command)> {
        self.sections.iter().enumerate().flat_map(|(section_index, section)| {
            section
                .commands
                .iter()
                .enumerate()
                .map(move |(index, command)| (CommandId::new(section_index, index), command))
        })
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|section| section.commands.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check every command for structural consistency and return all
    /// problems found.
    pub fn validate(&self) -> Result<(), Vec<RegistryError>> {
        let errors: Vec<RegistryError> = self.iter().flat_map(|(_, command)| validate_command(command)).collect();
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn validate_command(command: &Command) -> Vec<RegistryError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for field in &command.fields {
        if !seen.insert(field.name.as_str()) {
            errors.push(RegistryError::DuplicateField {
                command: command.name.clone(),
                field: field.name.clone(),
            });
        }

        let Some(rule) = field.visibility.as_ref() else {
            continue;
        };
        if rule.controlling_field == field.name {
            errors.push(RegistryError::SelfControlled {
                command: command.name.clone(),
                field: field.name.clone(),
            });
        } else if command.field(&rule.controlling_field).is_none() {
            errors.push(RegistryError::UnknownController {
                command: command.name.clone(),
                field: field.name.clone(),
                controller: rule.controlling_field.clone(),
            });
        }
    }

    for placeholder in route_placeholders(&command.path) {
        let satisfiable = placeholder_candidates(placeholder)
            .into_iter()
            .any(|candidate| command.field(candidate).is_some());
        if !satisfiable {
            errors.push(RegistryError::UnsatisfiablePlaceholder {
                command: command.name.clone(),
                placeholder: placeholder.to_string(),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use hllrcon_types::{Field, HttpMethod, SelectOption};

    fn registry_with(command: Command) -> CommandRegistry {
        CommandRegistry::new(vec![Section::new("Test", vec![command])])
    }

    #[test]
    fn ids_address_commands_in_display_order() {
        let registry = CommandRegistry::builtin();
        let (id, command) = registry.iter().nth(2).expect("third command");
        assert_eq!(id, CommandId::new(1, 0));
        assert_eq!(command.name, "GetServerInformation");
        assert_eq!(registry.get(id), Some(command));
        assert_eq!(registry.get(CommandId::new(99, 0)), None);
    }

    #[test]
    fn detects_duplicate_fields_and_bad_controllers() {
        let command = Command::new("Broken", HttpMethod::Post, "/api/v2/broken", "").with_fields(vec![
            Field::text("reason"),
            Field::text("reason"),
            Field::text("value").visible_when("type", ["player"]),
            Field::select("mode", vec![SelectOption::literal("a")]).visible_when("mode", ["a"]),
        ]);

        let errors = registry_with(command).validate().expect_err("broken command");
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(matches!(errors[0], RegistryError::DuplicateField { .. }));
        assert!(matches!(errors[1], RegistryError::UnknownController { .. }));
        assert!(matches!(errors[2], RegistryError::SelfControlled { .. }));
    }

    #[test]
    fn detects_unsatisfiable_route_placeholders() {
        let command = Command::new("Orphan", HttpMethod::Get, "/api/v2/things/:thing_id", "").with_fields(vec![Field::text("other")]);
        let errors = registry_with(command).validate().expect_err("orphan placeholder");
        assert_eq!(
            errors,
            vec![RegistryError::UnsatisfiablePlaceholder {
                command: "Orphan".into(),
                placeholder: "thing_id".into()
            }]
        );
    }

    #[test]
    fn id_placeholder_is_satisfied_by_player_id() {
        let command =
            Command::new("MessagePlayer", HttpMethod::Post, "/api/v2/players/:id/message", "").with_fields(vec![Field::text("player_id")]);
        assert!(registry_with(command).validate().is_ok());
    }
}
