use std::collections::HashSet;

use hllrcon_registry::{CommandRegistry, FieldKind};
use hllrcon_types::HttpMethod;

#[test]
fn builtin_catalog_validates() {
    let registry = CommandRegistry::builtin();
    if let Err(errors) = registry.validate() {
        panic!("builtin catalog is inconsistent: {errors:?}");
    }
}

#[test]
fn sections_are_in_display_order() {
    let registry = CommandRegistry::builtin();
    let titles: Vec<&str> = registry.sections.iter().map(|section| section.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Connection",
            "Server Information",
            "Player Management",
            "VIPs",
            "Admins",
            "Bans",
            "Maps",
            "Server Settings",
            "Match Timers",
        ]
    );
}

#[test]
fn command_names_are_unique() {
    let registry = CommandRegistry::builtin();
    let mut seen = HashSet::new();
    let duplicates: Vec<&str> = registry
        .iter()
        .map(|(_, command)| command.name.as_str())
        .filter(|name| !seen.insert(*name))
        .collect();
    assert!(duplicates.is_empty(), "duplicates seen: {duplicates:?}");
    assert!(registry.len() > 40, "catalog unexpectedly small: {}", registry.len());
}

#[test]
fn server_information_has_conditional_value_field() {
    let registry = CommandRegistry::builtin();
    let (_, command) = registry.find_by_name("GetServerInformation").expect("GetServerInformation present");
    assert_eq!(command.method, HttpMethod::Get);
    assert_eq!(command.path, "/api/v2/server");

    let type_field = command.field("type").expect("type field");
    let FieldKind::Select { options } = &type_field.kind else {
        panic!("type should be a select, got {:?}", type_field.kind);
    };
    assert!(options.iter().any(|option| option.value == "player"));

    let rule = command.field("value").and_then(|field| field.visibility.as_ref()).expect("value is conditional");
    assert_eq!(rule.controlling_field, "type");
    assert!(rule.visible_when.contains("player"));
    assert_eq!(rule.visible_when.len(), 1);
}

#[test]
fn force_team_switch_uses_labelled_numeric_options() {
    let registry = CommandRegistry::builtin();
    let (_, command) = registry.find_by_name("ForceTeamSwitch").expect("ForceTeamSwitch present");
    let FieldKind::Select { options } = &command.field("force_mode").expect("force_mode").kind else {
        panic!("force_mode should be a select");
    };
    let pairs: Vec<(&str, &str)> = options.iter().map(|option| (option.value.as_str(), option.label.as_str())).collect();
    assert_eq!(pairs, vec![("0", "0 - On Death"), ("1", "1 - Immediately")]);
}

#[test]
fn toggles_default_to_enabled() {
    let registry = CommandRegistry::builtin();
    for name in ["SetMapShuffleEnabled", "SetAutoBalanceEnabled", "SetVoteKickEnabled", "SetDynamicWeatherEnabled"] {
        let (_, command) = registry.find_by_name(name).expect("command present");
        assert_eq!(
            command.field("enable").map(|field| &field.kind),
            Some(&FieldKind::Checkbox { default: true }),
            "{name}"
        );
    }
}

#[test]
fn broadcast_is_multiline_and_ban_listings_carry_fixed_query() {
    let registry = CommandRegistry::builtin();
    let (_, broadcast) = registry.find_by_name("ServerBroadcast").expect("ServerBroadcast");
    assert_eq!(broadcast.fields[0].kind, FieldKind::MultilineText { rows: 3 });

    let (_, perma) = registry.find_by_name("GetPermanentBans").expect("GetPermanentBans");
    assert_eq!(perma.path, "/api/v2/bans?type=perma");
    assert!(!perma.has_fields());
}

#[test]
fn map_fields_exist_where_maps_are_chosen() {
    let registry = CommandRegistry::builtin();
    let map_commands: Vec<&str> = registry
        .iter()
        .filter(|(_, command)| command.fields.iter().any(|field| field.is_map_field()))
        .map(|(_, command)| command.name.as_str())
        .collect();
    assert_eq!(
        map_commands,
        vec!["ChangeMap", "AddMapToRotation", "AddMapToSequence", "SetDynamicWeatherEnabled"]
    );
}
