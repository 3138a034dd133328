//! Key bindings for keyboard-driven widgets.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One key press plus the modifiers that must be held with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    /// Base key.
    pub code: KeyCode,
    /// Required modifiers.
    pub modifiers: KeyModifiers,
}

impl KeyCombination {
    /// A key with no modifiers.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// A key with an explicit modifier set.
    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        self.code == event.code && event.modifiers.contains(self.modifiers)
    }
}

impl From<KeyCode> for KeyCombination {
    fn from(code: KeyCode) -> Self {
        KeyCombination::new(code)
    }
}

impl From<char> for KeyCombination {
    fn from(c: char) -> Self {
        KeyCombination::new(KeyCode::Char(c))
    }
}

/// A described action triggered by any of several key combinations.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Combinations that trigger the action.
    pub keys: Vec<KeyCombination>,
    /// What the action does, for help text.
    pub description: String,
    /// Disabled bindings never match.
    pub enabled: bool,
}

impl Binding {
    /// Bind `keys` to an action.
    pub fn new<K: Into<KeyCombination>>(
        keys: impl IntoIterator<Item = K>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            description: description.into(),
            enabled: true,
        }
    }

    /// Enable or disable the binding.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether `event` triggers this binding.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.enabled && self.keys.iter().any(|k| k.matches(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn matches_any_key() {
        let b = Binding::new([KeyCode::Right.into(), KeyCombination::from('l')], "Next page");
        assert!(b.matches(&press(KeyCode::Right)));
        assert!(b.matches(&press(KeyCode::Char('l'))));
        assert!(!b.matches(&press(KeyCode::Left)));
    }

    #[test]
    fn modifiers_must_be_held() {
        let b = Binding::new(
            [KeyCombination::with_modifiers(
                KeyCode::Char('s'),
                KeyModifiers::CONTROL,
            )],
            "Sort",
        );
        assert!(!b.matches(&press(KeyCode::Char('s'))));
        assert!(b.matches(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn disabled_never_matches() {
        let b = Binding::new([KeyCode::Enter], "Sort").enabled(false);
        assert!(!b.matches(&press(KeyCode::Enter)));
    }
}
