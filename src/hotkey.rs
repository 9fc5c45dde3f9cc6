//! Parse result: global flags, the window allow-list, and hotkeys in
//! source order.

use std::fmt;

use crate::formatter::quote;
use crate::keycode::{Keycode, Modifiers, render_key};

bitflags::bitflags! {
    /// Flags set by global declarations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeymapFlags: u8 {
        /// Only fire hotkeys while a listed window is active.
        const ACTIVE_WINDOW = 0x01;
    }
}

bitflags::bitflags! {
    /// Per-hotkey behavior flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HotkeyFlags: u32 {
        /// Ignore auto-repeat presses.
        const NOREPEAT = 0x01;
    }
}

/// Complete configuration loaded from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    pub flags: KeymapFlags,
    pub windows: Vec<String>,
    pub hotkeys: Vec<Hotkey>,
}

/// One binding: a key combination mapped to an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    pub key: Keycode,
    pub modifiers: Modifiers,
    pub operation: Operation,
    pub flags: HotkeyFlags,
}

/// Action triggered by a hotkey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Left mouse click.
    Click,
    /// Right mouse click.
    RClick,
    /// Move the cursor by an offset.
    Jump { dx: i32, dy: i32 },
    /// Send a synthetic key press.
    SendKey { key: Keycode, modifiers: Modifiers },
    /// Enable or disable all hotkeys.
    Toggle,
    /// Exit the program.
    Quit,
    /// Spawn a process; `argv[0]` is the program.
    Exec { argv: Vec<String> },
}

impl Keymap {
    /// Whether hotkeys only apply inside the listed windows.
    #[must_use]
    pub const fn restricts_windows(&self) -> bool {
        self.flags.contains(KeymapFlags::ACTIVE_WINDOW)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hotkeys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hotkeys.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hotkey> {
        self.hotkeys.iter()
    }
}

impl<'a> IntoIterator for &'a Keymap {
    type Item = &'a Hotkey;
    type IntoIter = std::slice::Iter<'a, Hotkey>;

    fn into_iter(self) -> Self::IntoIter {
        self.hotkeys.iter()
    }
}

impl Hotkey {
    #[must_use]
    pub const fn is_norepeat(&self) -> bool {
        self.flags.contains(HotkeyFlags::NOREPEAT)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            render_key(self.key, self.modifiers),
            self.operation
        )?;
        if self.is_norepeat() {
            f.write_str(" norepeat")?;
        }
        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Click => f.write_str("click"),
            Self::RClick => f.write_str("rclick"),
            Self::Jump { dx, dy } => write!(f, "jump {dx} {dy}"),
            Self::SendKey { key, modifiers } => {
                write!(f, "key {}", render_key(*key, *modifiers))
            }
            Self::Toggle => f.write_str("toggle"),
            Self::Quit => f.write_str("quit"),
            Self::Exec { argv } => {
                f.write_str("exec")?;
                for arg in argv {
                    write!(f, " {}", quote(arg))?;
                }
                Ok(())
            }
        }
    }
}
