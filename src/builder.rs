use crate::hotkey::{Hotkey, HotkeyFlags, Keymap, KeymapFlags, Operation};
use crate::keycode::{Keycode, Modifiers};

impl Keymap {
    /// Create a new empty keymap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            flags: KeymapFlags::empty(),
            windows: Vec::new(),
            hotkeys: Vec::new(),
        }
    }

    /// Restrict hotkeys to windows named `name`, in addition to any
    /// already listed.
    #[must_use]
    pub fn active_window(mut self, name: impl Into<String>) -> Self {
        self.flags |= KeymapFlags::ACTIVE_WINDOW;
        self.windows.push(name.into());
        self
    }

    /// Append a binding.
    #[must_use]
    pub fn bind(mut self, hotkey: Hotkey) -> Self {
        self.hotkeys.push(hotkey);
        self
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

impl Hotkey {
    /// Create a hotkey with no flags.
    ///
    /// A modifier key loses its own bit from `modifiers`, so
    /// `Hotkey::new(Keycode::Control, Modifiers::CTRL, ..)` is plain `ctrl`.
    #[must_use]
    pub const fn new(key: Keycode, modifiers: Modifiers, operation: Operation) -> Self {
        Self {
            key,
            modifiers: without_own_bit(key, modifiers),
            operation,
            flags: HotkeyFlags::empty(),
        }
    }

    /// Ignore auto-repeat presses.
    #[must_use]
    pub const fn norepeat(mut self) -> Self {
        self.flags = self.flags.union(HotkeyFlags::NOREPEAT);
        self
    }
}

impl Operation {
    #[must_use]
    pub const fn jump(dx: i32, dy: i32) -> Self {
        Self::Jump { dx, dy }
    }

    /// Send `key`; like [`Hotkey::new`], a modifier key drops its own bit.
    #[must_use]
    pub const fn key(key: Keycode, modifiers: Modifiers) -> Self {
        Self::SendKey {
            key,
            modifiers: without_own_bit(key, modifiers),
        }
    }

    /// Spawn `program` with no arguments.
    #[must_use]
    pub fn exec(program: impl Into<String>) -> Self {
        Self::Exec {
            argv: vec![program.into()],
        }
    }

    /// Append an argument to an `Exec` operation; other operations are
    /// returned unchanged.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        if let Self::Exec { argv } = &mut self {
            argv.push(arg.into());
        }
        self
    }
}

const fn without_own_bit(key: Keycode, modifiers: Modifiers) -> Modifiers {
    match key.as_modifier() {
        Some(own) => modifiers.difference(own),
        None => modifiers,
    }
}
