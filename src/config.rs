use std::{collections::HashMap, fmt::Debug, path::PathBuf, str::FromStr};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{
    de::{DeserializeOwned, Deserializer, Error as _},
    Deserialize,
};

use crate::{
    action::{Action, ActionState, Command, GameAction, HomeAction},
    pages::PageId,
};

const CONFIG: &str = include_str!("../.config/config.yaml");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
}

impl Config {
    /// The bindings shipped in `.config/config.yaml`, without any user overlay.
    pub fn defaults() -> Result<Self> {
        Ok(serde_yaml::from_str(CONFIG)?)
    }

    /// Built-in keybindings overlaid with `config.yaml` from the config directory.
    pub fn new() -> Result<Self> {
        let default_config = Self::defaults()?;
        let data_dir = crate::utils::get_data_dir();
        let config_dir = crate::utils::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().as_ref())?
            .set_default("_config_dir", config_dir.to_string_lossy().as_ref())?;

        let config_files = [("config.yaml", config::FileFormat::Yaml)];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            log::info!("No configuration file found in {}, using default keybindings", config_dir.display());
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        for (scope, default_bindings) in default_config.keybindings.pages.iter() {
            let user_bindings = cfg.keybindings.pages.entry(*scope).or_default();
            for (key, cmd) in default_bindings.iter() {
                user_bindings.entry(*key).or_insert_with(|| cmd.clone());
            }
        }
        let user_bindings = &mut cfg.keybindings.global;
        for (key, cmd) in default_config.keybindings.global.iter() {
            user_bindings.entry(*key).or_insert_with(|| cmd.clone());
        }

        Ok(cfg)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawPageKeyBindings {
    pub click: Option<HashMap<String, String>>,
    pub hold: Option<HashMap<String, String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawKeyBindings {
    #[serde(default)]
    pub global: RawPageKeyBindings,
    #[serde(default)]
    pub pages: HashMap<String, RawPageKeyBindings>,
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct PageKeyBindings(pub HashMap<KeyEvent, Action>);

impl PageKeyBindings {
    /// Terminals report symbols such as `?` with SHIFT held, bindings name them without it.
    pub fn action_for(&self, key: &KeyEvent) -> Option<Action> {
        if let Some(action) = self.get(key) {
            return Some(action.clone());
        }
        match key.code {
            KeyCode::Char(c) if !c.is_alphabetic() && key.modifiers.contains(KeyModifiers::SHIFT) => {
                let mut unshifted = *key;
                unshifted.modifiers.remove(KeyModifiers::SHIFT);
                self.get(&unshifted).cloned()
            },
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct KeyBindings {
    pub global: PageKeyBindings,
    pub pages: HashMap<PageId, PageKeyBindings>,
}

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_keybindings = RawKeyBindings::deserialize(deserializer)?;

        let global = parse_scope::<Command>(&raw_keybindings.global)
            .map_err(D::Error::custom)?
            .into_iter()
            .map(|(event, (command, state))| (event, Action { command, state }))
            .collect();

        let mut pages = HashMap::new();
        for (page, bindings) in raw_keybindings.pages.iter() {
            let page_id = PageId::from_str(page).map_err(|_| D::Error::custom(format!("Unknown page `{page}`")))?;
            let map = match page_id {
                PageId::Home => wrap_scope(parse_scope::<HomeAction>(bindings), Command::Home),
                PageId::Game => wrap_scope(parse_scope::<GameAction>(bindings), Command::Game),
            }
            .map_err(D::Error::custom)?;
            pages.insert(page_id, PageKeyBindings(map));
        }

        Ok(KeyBindings { global: PageKeyBindings(global), pages })
    }
}

fn wrap_scope<T>(
    parsed: Result<HashMap<KeyEvent, (T, ActionState)>, String>,
    wrap: fn(T) -> Command,
) -> Result<HashMap<KeyEvent, Action>, String> {
    Ok(parsed?.into_iter().map(|(event, (command, state))| (event, Action { command: wrap(command), state })).collect())
}

fn parse_binding_pairs<T>(map: &Option<HashMap<String, String>>) -> Result<HashMap<KeyEvent, T>, String>
where
    T: DeserializeOwned,
{
    let Some(inner_map) = map else {
        return Ok(HashMap::new());
    };
    inner_map
        .iter()
        .map(|(key_str, action_str)| -> Result<(KeyEvent, T), String> {
            let action: T =
                serde_plain::from_str(action_str).map_err(|e| format!("Unknown action `{action_str}`: {e}"))?;
            Ok((parse_key_event(key_str)?, action))
        })
        .collect()
}

fn parse_scope<T>(raw: &RawPageKeyBindings) -> Result<HashMap<KeyEvent, (T, ActionState)>, String>
where
    T: DeserializeOwned + Clone + Debug,
{
    let click_keybindings = parse_binding_pairs(&raw.click)?;
    let hold_keybindings = parse_binding_pairs(&raw.hold)?;

    Ok(merge_keybinding_maps(click_keybindings, hold_keybindings))
}

fn merge_keybinding_maps<A: Clone>(
    click: HashMap<KeyEvent, A>,
    hold: HashMap<KeyEvent, A>,
) -> HashMap<KeyEvent, (A, ActionState)> {
    let mut click: HashMap<KeyEvent, (A, ActionState)> =
        click.into_iter().map(|(event, command)| (event, (command, ActionState::default()))).collect();
    for (mut key_event, action) in hold {
        click.insert(key_event, (action.clone(), ActionState::Start));
        key_event.kind = KeyEventKind::Release;
        click.insert(key_event, (action.clone(), ActionState::End));
        key_event.kind = KeyEventKind::Repeat;
        click.insert(key_event, (action, ActionState::Repeat));
    }

    click
}

pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
        return Err(format!("Unable to parse `{}`", raw));
    }
    let raw = if !raw.contains("><") {
        let raw = raw.strip_prefix('<').unwrap_or(raw);
        let raw = raw.strip_prefix('>').unwrap_or(raw);
        raw
    } else {
        raw
    };
    let raw = raw.trim_start_matches('<').trim_end_matches('>');

    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        match current {
            rest if rest.starts_with("ctrl-") => {
                modifiers.insert(KeyModifiers::CONTROL);
                current = &rest[5..];
            },
            rest if rest.starts_with("alt-") => {
                modifiers.insert(KeyModifiers::ALT);
                current = &rest[4..];
            },
            rest if rest.starts_with("shift-") => {
                modifiers.insert(KeyModifiers::SHIFT);
                current = &rest[6..];
            },
            _ => break,
        };
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Result<KeyEvent, String> {
    let c = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        },
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        "hyphen" | "minus" => KeyCode::Char('-'),
        "tab" => KeyCode::Tab,
        f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
            Ok(n) if (1..=12).contains(&n) => KeyCode::F(n),
            _ => return Err(format!("Unable to parse {raw}")),
        },
        c if c.chars().count() == 1 => {
            let mut c = c.chars().next().ok_or_else(|| format!("Unable to parse {raw}"))?;
            if modifiers.contains(KeyModifiers::SHIFT) {
                c = c.to_ascii_uppercase();
            }
            KeyCode::Char(c)
        },
        _ => return Err(format!("Unable to parse {raw}")),
    };
    Ok(KeyEvent::new(c, modifiers))
}

pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let char;
    let key_code = match key_event.code {
        KeyCode::Backspace => "backspace",
        KeyCode::Enter => "enter",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Tab => "tab",
        KeyCode::BackTab => "backtab",
        KeyCode::Delete => "delete",
        KeyCode::Insert => "insert",
        KeyCode::F(c) => {
            char = format!("f{c}");
            &char
        },
        KeyCode::Char(' ') => "space",
        KeyCode::Char(c) => {
            char = c.to_string();
            &char
        },
        KeyCode::Esc => "esc",
        _ => "",
    };

    let mut modifiers = Vec::with_capacity(3);

    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        modifiers.push("ctrl");
    }

    if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
        modifiers.push("shift");
    }

    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        modifiers.push("alt");
    }

    let mut key = modifiers.join("-");

    if !key.is_empty() {
        key.push('-');
    }
    key.push_str(key_code);

    key
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_keybindings() {
        let c: Config = serde_yaml::from_str(CONFIG).unwrap();
        let game = c.keybindings.pages.get(&PageId::Game).unwrap();
        assert_eq!(
            game.get(&parse_key_event("<Space>").unwrap()),
            Some(&Action { command: Command::Game(GameAction::Jump), state: ActionState::Start })
        );

        let home = c.keybindings.pages.get(&PageId::Home).unwrap();
        assert_eq!(
            home.get(&parse_key_event("<Enter>").unwrap()).map(|a| &a.command),
            Some(&Command::Home(HomeAction::Select))
        );

        assert_eq!(
            c.keybindings.global.get(&parse_key_event("<q>").unwrap()).map(|a| &a.command),
            Some(&Command::Quit)
        );
    }

    #[test]
    fn test_config() -> Result<()> {
        let c = Config::defaults()?;
        assert!(c.keybindings.pages.contains_key(&PageId::Game));
        assert!(c.keybindings.pages.contains_key(&PageId::Home));
        Ok(())
    }

    #[test]
    fn test_lowercase_page_names() {
        let yaml = "keybindings:\n  pages:\n    game:\n      click:\n        \"<w>\": Jump\n";
        let c: Config = serde_yaml::from_str(yaml).unwrap();
        let game = c.keybindings.pages.get(&PageId::Game).unwrap();
        assert_eq!(
            game.get(&parse_key_event("w").unwrap()).map(|a| &a.command),
            Some(&Command::Game(GameAction::Jump))
        );
    }

    #[test]
    fn test_hold_bindings_expand() {
        let yaml = "keybindings:\n  pages:\n    Game:\n      hold:\n        \"<Up>\": Jump\n";
        let c: Config = serde_yaml::from_str(yaml).unwrap();
        let game = c.keybindings.pages.get(&PageId::Game).unwrap();
        assert_eq!(game.len(), 3);

        let mut release = KeyEvent::new(KeyCode::Up, KeyModifiers::empty());
        release.kind = KeyEventKind::Release;
        assert_eq!(game.get(&release).map(|a| a.state.clone()), Some(ActionState::End));
    }

    #[test]
    fn test_bad_bindings_are_errors() {
        let unknown_action = "keybindings:\n  pages:\n    Game:\n      click:\n        \"<w>\": Fly\n";
        assert!(serde_yaml::from_str::<Config>(unknown_action).is_err());

        let unknown_page = "keybindings:\n  pages:\n    Shop:\n      click:\n        \"<w>\": Jump\n";
        assert!(serde_yaml::from_str::<Config>(unknown_page).is_err());

        let unknown_key = "keybindings:\n  global:\n    click:\n      \"<ctrl-nope>\": Quit\n";
        assert!(serde_yaml::from_str::<Config>(unknown_key).is_err());
    }

    #[test]
    fn test_action_for_ignores_shift_on_symbols() {
        let c: Config = serde_yaml::from_str(CONFIG).unwrap();
        let global = &c.keybindings.global;

        let shifted = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(global.action_for(&shifted).map(|a| a.command), Some(Command::ToggleShowHelp));

        let shifted_q = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert_eq!(global.action_for(&shifted_q), None);
    }

    #[test]
    fn test_simple_keys() {
        assert_eq!(parse_key_event("a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty()));
        assert_eq!(parse_key_event("enter").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));
        assert_eq!(parse_key_event("<space>").unwrap(), KeyEvent::new(KeyCode::Char(' '), KeyModifiers::empty()));
        assert_eq!(parse_key_event("<?>").unwrap(), KeyEvent::new(KeyCode::Char('?'), KeyModifiers::empty()));
        assert_eq!(parse_key_event("f5").unwrap(), KeyEvent::new(KeyCode::F(5), KeyModifiers::empty()));
    }

    #[test]
    fn test_with_modifiers() {
        assert_eq!(parse_key_event("ctrl-a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(parse_key_event("alt-enter").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        assert_eq!(parse_key_event("shift-esc").unwrap(), KeyEvent::new(KeyCode::Esc, KeyModifiers::SHIFT));
        assert_eq!(
            parse_key_event("ctrl-alt-a").unwrap(),
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL | KeyModifiers::ALT)
        );
    }

    #[test]
    fn test_key_event_to_string() {
        assert_eq!(
            key_event_to_string(&KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL | KeyModifiers::ALT)),
            "ctrl-alt-a".to_string()
        );
        assert_eq!(key_event_to_string(&KeyEvent::new(KeyCode::Char(' '), KeyModifiers::empty())), "space");
        assert_eq!(key_event_to_string(&parse_key_event("<Ctrl-z>").unwrap()), "ctrl-z");
    }

    #[test]
    fn test_invalid_keys() {
        assert!(parse_key_event("invalid-key").is_err());
        assert!(parse_key_event("ctrl-invalid-key").is_err());
        assert!(parse_key_event("<ctrl-a").is_err());
        assert!(parse_key_event("f13").is_err());
    }

    #[test]
    fn test_case_insensitivity() {
        assert_eq!(parse_key_event("CTRL-a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(parse_key_event("AlT-eNtEr").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
    }
}
