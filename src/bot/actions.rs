//! Menu actions carried by inline keyboard buttons

use crate::config::MenuVariant;

/// Every button the bot can show, with its callback data tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Pixelate,
    Ascii,
    Invert,
    Reflection,
    DefaultCharset,
    CustomCharset,
    Horizontal,
    Vertical,
}

impl MenuAction {
    pub const ALL: [MenuAction; 8] = [
        MenuAction::Pixelate,
        MenuAction::Ascii,
        MenuAction::Invert,
        MenuAction::Reflection,
        MenuAction::DefaultCharset,
        MenuAction::CustomCharset,
        MenuAction::Horizontal,
        MenuAction::Vertical,
    ];

    /// Callback data sent by the button
    pub fn tag(self) -> &'static str {
        match self {
            MenuAction::Pixelate => "pixelate",
            MenuAction::Ascii => "ascii",
            MenuAction::Invert => "invert",
            MenuAction::Reflection => "reflection",
            MenuAction::DefaultCharset => "default",
            MenuAction::CustomCharset => "input",
            MenuAction::Horizontal => "horizontal",
            MenuAction::Vertical => "vertical",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.tag() == tag)
    }

    /// Localization key of the button label
    pub fn label_key(self) -> &'static str {
        match self {
            MenuAction::Pixelate => "menu-pixelate",
            MenuAction::Ascii => "menu-ascii",
            MenuAction::Invert => "menu-invert",
            MenuAction::Reflection => "menu-reflection",
            MenuAction::DefaultCharset => "menu-ascii-default",
            MenuAction::CustomCharset => "menu-ascii-custom",
            MenuAction::Horizontal => "menu-horizontal",
            MenuAction::Vertical => "menu-vertical",
        }
    }

    /// Localization key of the callback notice shown while the action runs.
    /// Actions that only open a menu or a prompt have none.
    pub fn progress_key(self) -> Option<&'static str> {
        match self {
            MenuAction::Pixelate => Some("progress-pixelate"),
            MenuAction::Invert => Some("progress-invert"),
            MenuAction::DefaultCharset => Some("progress-ascii"),
            MenuAction::Horizontal => Some("progress-horizontal"),
            MenuAction::Vertical => Some("progress-vertical"),
            MenuAction::Ascii | MenuAction::Reflection | MenuAction::CustomCharset => None,
        }
    }

    /// Whether the configured menu variant offers this action
    pub fn is_available(self, variant: MenuVariant) -> bool {
        match self {
            MenuAction::Reflection | MenuAction::Horizontal | MenuAction::Vertical => {
                variant == MenuVariant::Extended
            }
            _ => true,
        }
    }
}
