use indexmap::IndexSet;

/// Whether a conditional field is shown for the controlling field's current
/// raw value.
pub fn is_visible(controlling_value: &str, visible_when: &IndexSet<String>) -> bool {
    visible_when.contains(controlling_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> IndexSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn membership_decides_visibility() {
        let when = set(&["player"]);
        assert!(is_visible("player", &when));
        assert!(!is_visible("players", &when));
        assert!(!is_visible("", &when));
    }

    #[test]
    fn empty_set_never_shows() {
        assert!(!is_visible("anything", &IndexSet::new()));
    }
}
