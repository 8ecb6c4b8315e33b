//! UI Builder module for creating menus and inline keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::config::MenuVariant;
use crate::localization::t_lang;

use super::actions::MenuAction;

/// Ordered buttons plus how many of them go on one keyboard row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Menu {
    pub buttons: Vec<(String, MenuAction)>,
    pub row_width: usize,
}

impl Menu {
    fn localized(actions: &[MenuAction], row_width: usize, language_code: Option<&str>) -> Self {
        Self {
            buttons: actions
                .iter()
                .map(|action| (t_lang(action.label_key(), language_code), *action))
                .collect(),
            row_width,
        }
    }

    pub fn actions(&self) -> Vec<MenuAction> {
        self.buttons.iter().map(|(_, action)| *action).collect()
    }
}

/// Menu shown right after a photo arrives
pub fn main_menu(variant: MenuVariant, language_code: Option<&str>) -> Menu {
    match variant {
        MenuVariant::Extended => Menu::localized(
            &[
                MenuAction::Pixelate,
                MenuAction::Ascii,
                MenuAction::Invert,
                MenuAction::Reflection,
            ],
            2,
            language_code,
        ),
        MenuVariant::Reduced => Menu::localized(
            &[MenuAction::Pixelate, MenuAction::Ascii, MenuAction::Invert],
            3,
            language_code,
        ),
    }
}

/// Choice between a typed-in and the built-in character set
pub fn ascii_charset_menu(language_code: Option<&str>) -> Menu {
    Menu::localized(
        &[MenuAction::CustomCharset, MenuAction::DefaultCharset],
        3,
        language_code,
    )
}

pub fn reflection_menu(language_code: Option<&str>) -> Menu {
    Menu::localized(&[MenuAction::Horizontal, MenuAction::Vertical], 3, language_code)
}

/// Create inline keyboard for a menu
pub fn build_keyboard(menu: &Menu) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = menu
        .buttons
        .chunks(menu.row_width.max(1))
        .map(|row| {
            row.iter()
                .map(|(label, action)| InlineKeyboardButton::callback(label.clone(), action.tag()))
                .collect()
        })
        .collect();

    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_menu_sizes() {
        assert_eq!(main_menu(MenuVariant::Extended, None).buttons.len(), 4);
        assert_eq!(main_menu(MenuVariant::Reduced, None).buttons.len(), 3);
        assert!(!main_menu(MenuVariant::Reduced, None)
            .actions()
            .contains(&MenuAction::Reflection));
    }

    #[test]
    fn test_keyboard_rows_follow_row_width() {
        let keyboard = build_keyboard(&main_menu(MenuVariant::Extended, Some("en")));
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert!(keyboard.inline_keyboard.iter().all(|row| row.len() == 2));

        let keyboard = build_keyboard(&reflection_menu(None));
        assert_eq!(keyboard.inline_keyboard.len(), 1);
    }

    #[test]
    fn test_labels_are_localized() {
        let menu = ascii_charset_menu(Some("ru"));
        assert_eq!(menu.buttons[0].0, "Ввести свой набор");
        assert_eq!(menu.buttons[1].1, MenuAction::DefaultCharset);
    }
}
