//! User configuration — keybindings and picker settings.
//!
//! Stored as TOML at `$XDG_CONFIG_HOME/catpick/config.toml`
//! (default `~/.config/catpick/config.toml`):
//!
//! ```toml
//! min_selected = 1
//! format = "plain"
//!
//! [keys]
//! select_all = ["a", "Ctrl+a"]
//! submit = ["Enter"]
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    Expand,
    Collapse,
    /// Space: flip a checkbox, or expand/collapse a category row.
    Toggle,
    /// `+` button: select one subcategory, or all of a category.
    Select,
    /// `-` button: deselect one subcategory, or all of a category.
    Deselect,
    SelectAll,
    DeselectAll,
    Submit,
    Help,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::MoveUp,
        Action::MoveDown,
        Action::Expand,
        Action::Collapse,
        Action::Toggle,
        Action::Select,
        Action::Deselect,
        Action::SelectAll,
        Action::DeselectAll,
        Action::Submit,
        Action::Help,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::MoveUp => "Move Up",
            Action::MoveDown => "Move Down",
            Action::Expand => "Expand",
            Action::Collapse => "Collapse / Parent",
            Action::Toggle => "Toggle Item",
            Action::Select => "Select (+)",
            Action::Deselect => "Deselect (-)",
            Action::SelectAll => "Select Whole Category",
            Action::DeselectAll => "Clear Whole Category",
            Action::Submit => "Submit",
            Action::Help => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::Expand => "expand",
            Action::Collapse => "collapse",
            Action::Toggle => "toggle",
            Action::Select => "select",
            Action::Deselect => "deselect",
            Action::SelectAll => "select_all",
            Action::DeselectAll => "deselect_all",
            Action::Submit => "submit",
            Action::Help => "help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.  SHIFT is ignored for characters since the character
    /// itself already carries the case (`A`, `+`).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = match self.code {
            KeyCode::Char(_) => KeyModifiers::CONTROL | KeyModifiers::ALT,
            _ => KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT,
        };
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Alt+↑"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        let key = match self.code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            _ => key_name(self.code),
        };
        format!("{}{key}", modifier_prefix(self.modifiers))
    }

    /// Serialise to config-file format (e.g. `"Alt+Up"`, `"Ctrl+c"`, `"+"`).
    fn to_config_string(&self) -> String {
        format!("{}{}", modifier_prefix(self.modifiers), key_name(self.code))
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"A"`, `"+"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        // `+` is both the separator and a bindable key.
        let (mod_part, key_part) = if s == "+" {
            (None, "+")
        } else if let Some(prefix) = s.strip_suffix("++") {
            (Some(prefix), "+")
        } else {
            match s.rsplit_once('+') {
                Some((m, k)) => (Some(m), k),
                None => (None, s),
            }
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in mod_part.into_iter().flat_map(|m| m.split('+')) {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let mut chars = key_part.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => match key_part.to_lowercase().as_str() {
                "up" => KeyCode::Up,
                "down" => KeyCode::Down,
                "left" => KeyCode::Left,
                "right" => KeyCode::Right,
                "enter" | "return" => KeyCode::Enter,
                "esc" | "escape" => KeyCode::Esc,
                "tab" => KeyCode::Tab,
                "backspace" | "bksp" => KeyCode::Backspace,
                "delete" | "del" => KeyCode::Delete,
                "home" => KeyCode::Home,
                "end" => KeyCode::End,
                "pageup" | "pgup" => KeyCode::PageUp,
                "pagedown" | "pgdn" => KeyCode::PageDown,
                "space" => KeyCode::Char(' '),
                s if s.starts_with('f') && s.len() > 1 => KeyCode::F(s[1..].parse().ok()?),
                _ => return None,
            },
        };

        // A shifted character is stored as the character terminals report
        // (`Shift+s` -> `S`), since `matches` ignores SHIFT for chars.
        if let KeyCode::Char(c) = code {
            if modifiers.contains(KeyModifiers::SHIFT) {
                modifiers.remove(KeyModifiers::SHIFT);
                let upper = c.to_uppercase().next().unwrap_or(c);
                return Some(KeyBind::new(KeyCode::Char(upper), modifiers));
            }
        }

        Some(KeyBind { code, modifiers })
    }
}

fn modifier_prefix(modifiers: KeyModifiers) -> String {
    let mut s = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        s.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        s.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        s.push_str("Shift+");
    }
    s
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── output format ─────

/// How a submitted selection is printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One subcategory key per line.
    #[default]
    Plain,
    /// `{"category": ["sub", ...]}`.
    Json,
}

// ───────────────────────────────────────── config ────────────

/// On-disk shape of the config file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    min_selected: usize,
    format: OutputFormat,
    keys: BTreeMap<String, Vec<String>>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        AppConfig::default().to_file()
    }
}

/// Application configuration — keybindings and picker settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Submit is refused until at least this many items are selected.
    pub min_selected: usize,
    pub format: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            min_selected: 1,
            format: OutputFormat::Plain,
        }
    }
}

impl AppConfig {
    /// Built-in key bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Expand, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(Collapse, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(Toggle, vec![KeyBind::new(Char(' '), n)]);
        m.insert(Select, vec![KeyBind::new(Char('+'), n), KeyBind::new(Char('='), n)]);
        m.insert(Deselect, vec![KeyBind::new(Char('-'), n)]);
        m.insert(SelectAll, vec![KeyBind::new(Char('a'), n)]);
        m.insert(DeselectAll, vec![KeyBind::new(Char('A'), n)]);
        m.insert(Submit, vec![KeyBind::new(Enter, n)]);
        m.insert(Help, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Load from the default config path.  A missing file yields defaults;
    /// a malformed one is reported and also yields defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_toml_str(&text).unwrap_or_else(|err| {
                tracing::warn!("ignoring {}: {err}", path.display());
                Self::default()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                tracing::warn!("cannot read {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Parse config text.  Actions absent from `[keys]` keep their default
    /// bindings; unknown actions and unparseable keys are skipped.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(text)?;
        let mut bindings = Self::default_bindings();

        for (name, keys) in &file.keys {
            let Some(action) = Action::from_config_key(name) else {
                tracing::warn!("unknown action `{name}` in [keys]");
                continue;
            };
            let parsed: Vec<KeyBind> = keys
                .iter()
                .filter_map(|k| {
                    let bind = KeyBind::parse(k.trim());
                    if bind.is_none() {
                        tracing::warn!("unparseable key `{k}` for `{name}`");
                    }
                    bind
                })
                .collect();
            bindings.insert(action, parsed);
        }

        Ok(Self {
            bindings,
            min_selected: file.min_selected,
            format: file.format,
        })
    }

    /// Render the effective configuration as TOML (for `--print-config`).
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&self.to_file())
    }

    fn to_file(&self) -> ConfigFile {
        let keys = Action::ALL
            .iter()
            .map(|&action| {
                let binds = self
                    .bindings
                    .get(&action)
                    .map(|b| b.iter().map(KeyBind::to_config_string).collect())
                    .unwrap_or_default();
                (action.config_key().to_string(), binds)
            })
            .collect();
        ConfigFile {
            min_selected: self.min_selected,
            format: self.format,
            keys,
        }
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        // Ties go to the action listed first in `Action::ALL`.
        for &action in Action::ALL {
            let Some(binds) = self.bindings.get(&action) else {
                continue;
            };
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Format the binding list for a given action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: toggle | {}/{}: select/clear | {}: submit | {}: help",
            self.short_binding(Action::Toggle),
            self.short_binding(Action::Select),
            self.short_binding(Action::Deselect),
            self.short_binding(Action::Submit),
            self.short_binding(Action::Help),
        )
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/catpick/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("catpick").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_key_strings() {
        let cases = [
            ("q", KeyCode::Char('q'), KeyModifiers::NONE),
            ("A", KeyCode::Char('A'), KeyModifiers::NONE),
            ("+", KeyCode::Char('+'), KeyModifiers::NONE),
            ("Ctrl++", KeyCode::Char('+'), KeyModifiers::CONTROL),
            ("Ctrl+c", KeyCode::Char('c'), KeyModifiers::CONTROL),
            ("Alt+Up", KeyCode::Up, KeyModifiers::ALT),
            ("Space", KeyCode::Char(' '), KeyModifiers::NONE),
            ("enter", KeyCode::Enter, KeyModifiers::NONE),
            ("F5", KeyCode::F(5), KeyModifiers::NONE),
        ];
        for (text, code, modifiers) in cases {
            assert_eq!(KeyBind::parse(text), Some(KeyBind::new(code, modifiers)), "{text}");
        }
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("nonsense"), None);
    }

    #[test]
    fn config_strings_parse_back() {
        for binds in AppConfig::default_bindings().values() {
            for bind in binds {
                assert_eq!(KeyBind::parse(&bind.to_config_string()).as_ref(), Some(bind));
            }
        }
    }

    #[test]
    fn default_keys_match_actions() {
        let config = AppConfig::default();
        let n = KeyModifiers::NONE;
        assert_eq!(config.match_key(key(KeyCode::Char(' '), n)), Some(Action::Toggle));
        assert_eq!(config.match_key(key(KeyCode::Enter, n)), Some(Action::Submit));
        assert_eq!(config.match_key(key(KeyCode::Esc, n)), Some(Action::Quit));
        // Terminals report shifted characters with SHIFT set.
        assert_eq!(
            config.match_key(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Action::DeselectAll)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char('+'), KeyModifiers::SHIFT)),
            Some(Action::Select)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('z'), n)), None);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
min_selected = 3

[keys]
submit = ["Ctrl+s"]
bogus = ["x"]
"#,
        )
        .unwrap();

        assert_eq!(config.min_selected, 3);
        assert_eq!(config.format, OutputFormat::Plain);
        assert_eq!(
            config.match_key(key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Action::Submit)
        );
        assert_eq!(config.match_key(key(KeyCode::Enter, KeyModifiers::NONE)), None);
        assert_eq!(
            config.match_key(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn printed_config_reloads() {
        let mut config = AppConfig::default();
        config.format = OutputFormat::Json;
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("format = \"json\""));

        let reloaded = AppConfig::from_toml_str(&text).unwrap();
        assert_eq!(reloaded.format, OutputFormat::Json);
        assert_eq!(reloaded.min_selected, 1);
        for action in Action::ALL {
            assert_eq!(reloaded.display_bindings(*action), config.display_bindings(*action));
        }
    }

    #[test]
    fn shifted_char_binding_matches_shifted_keypress() {
        assert_eq!(
            KeyBind::parse("Shift+s"),
            Some(KeyBind::new(KeyCode::Char('S'), KeyModifiers::NONE))
        );
        assert_eq!(
            KeyBind::parse("Ctrl+Shift+x"),
            Some(KeyBind::new(KeyCode::Char('X'), KeyModifiers::CONTROL))
        );

        let config = AppConfig::from_toml_str("[keys]\nsubmit = [\"Shift+s\"]\n").unwrap();
        assert_eq!(
            config.match_key(key(KeyCode::Char('S'), KeyModifiers::SHIFT)),
            Some(Action::Submit)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('s'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn shared_key_resolves_to_first_action() {
        let config = AppConfig::from_toml_str(
            r#"
[keys]
quit = ["x"]
select = ["x"]
"#,
        )
        .unwrap();
        for _ in 0..16 {
            assert_eq!(
                config.match_key(key(KeyCode::Char('x'), KeyModifiers::NONE)),
                Some(Action::Select)
            );
        }
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(AppConfig::from_toml_str("min_selected = \"many\"").is_err());
    }
}
