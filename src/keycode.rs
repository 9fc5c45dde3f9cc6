//! OS-independent keycodes, modifier masks, and the key name table.
//!
//! Keycodes are stable byte values shared by every platform backend.
//! Translating them into X11 keysyms, Win32 virtual keys, or Carbon
//! key codes happens outside this crate.

use std::fmt;

bitflags::bitflags! {
    /// Modifier keys held together with a hotkey.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0x01;
        const CTRL = 0x02;
        const SUPER = 0x04;
        const META = 0x08;
    }
}

impl Modifiers {
    /// Map a modifier sigil (`^ ! ~ @`) to its mask bit.
    #[must_use]
    pub const fn from_sigil(sigil: char) -> Option<Self> {
        match sigil {
            '^' => Some(Self::CTRL),
            '!' => Some(Self::SHIFT),
            '~' => Some(Self::SUPER),
            '@' => Some(Self::META),
            _ => None,
        }
    }

    /// Sigil spelling of the mask in canonical order (`^ ~ @ !`).
    #[must_use]
    pub fn sigils(self) -> String {
        let mut out = String::new();
        for (flag, sigil) in [
            (Self::CTRL, '^'),
            (Self::SUPER, '~'),
            (Self::META, '@'),
            (Self::SHIFT, '!'),
        ] {
            if self.contains(flag) {
                out.push(sigil);
            }
        }
        out
    }
}

macro_rules! keycodes {
    ($($variant:ident = $code:literal, $name:literal, $lexeme:literal;)*) => {
        /// Abstract identifier for a physical key.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Keycode {
            $($variant = $code,)*
        }

        impl Keycode {
            /// Every keycode, in code order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Display name used when rendering key strings.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Canonical spelling of the key in a configuration file.
            #[must_use]
            pub const fn lexeme(self) -> &'static str {
                match self {
                    $(Self::$variant => $lexeme,)*
                }
            }
        }
    };
}

keycodes! {
    Q = 0x01, "Q", "q";
    W = 0x02, "W", "w";
    E = 0x03, "E", "e";
    R = 0x04, "R", "r";
    T = 0x05, "T", "t";
    Y = 0x06, "Y", "y";
    U = 0x07, "U", "u";
    I = 0x08, "I", "i";
    O = 0x09, "O", "o";
    P = 0x0A, "P", "p";
    A = 0x0B, "A", "a";
    S = 0x0C, "S", "s";
    D = 0x0D, "D", "d";
    F = 0x0E, "F", "f";
    G = 0x0F, "G", "g";
    H = 0x10, "H", "h";
    J = 0x11, "J", "j";
    K = 0x12, "K", "k";
    L = 0x13, "L", "l";
    Z = 0x14, "Z", "z";
    X = 0x15, "X", "x";
    C = 0x16, "C", "c";
    V = 0x17, "V", "v";
    B = 0x18, "B", "b";
    N = 0x19, "N", "n";
    M = 0x1A, "M", "m";
    Digit1 = 0x1B, "1", "1";
    Digit2 = 0x1C, "2", "2";
    Digit3 = 0x1D, "3", "3";
    Digit4 = 0x1E, "4", "4";
    Digit5 = 0x1F, "5", "5";
    Digit6 = 0x20, "6", "6";
    Digit7 = 0x21, "7", "7";
    Digit8 = 0x22, "8", "8";
    Digit9 = 0x23, "9", "9";
    Digit0 = 0x24, "0", "0";
    Grave = 0x25, "`", "`";
    Minus = 0x26, "-", "-";
    Equal = 0x27, "=", "=";
    LeftBracket = 0x28, "[", "[";
    RightBracket = 0x29, "]", "]";
    Backslash = 0x2A, "\\", "\\";
    Semicolon = 0x2B, ";", ";";
    Quote = 0x2C, "'", "'";
    Comma = 0x2D, ",", ",";
    Period = 0x2E, ".", ".";
    Slash = 0x2F, "/", "/";
    Space = 0x30, "Space", "space";
    Escape = 0x31, "Escape", "escape";
    Backspace = 0x32, "Backspace", "backspace";
    Tab = 0x33, "Tab", "tab";
    CapsLock = 0x34, "CapsLock", "capslock";
    Enter = 0x35, "Enter", "enter";
    Shift = 0x36, "Shift", "shift";
    Control = 0x37, "Control", "ctrl";
    Super = 0x38, "Super", "super";
    Meta = 0x39, "Meta", "meta";
    F1 = 0x3A, "F1", "f1";
    F2 = 0x3B, "F2", "f2";
    F3 = 0x3C, "F3", "f3";
    F4 = 0x3D, "F4", "f4";
    F5 = 0x3E, "F5", "f5";
    F6 = 0x3F, "F6", "f6";
    F7 = 0x40, "F7", "f7";
    F8 = 0x41, "F8", "f8";
    F9 = 0x42, "F9", "f9";
    F10 = 0x43, "F10", "f10";
    F11 = 0x44, "F11", "f11";
    F12 = 0x45, "F12", "f12";
    PrintScreen = 0x46, "PrintScreen", "printscreen";
    ScrollLock = 0x47, "ScrollLock", "scrolllock";
    Pause = 0x48, "Pause", "pause";
    Insert = 0x49, "Insert", "insert";
    Delete = 0x4A, "Delete", "delete";
    Home = 0x4B, "Home", "home";
    End = 0x4C, "End", "end";
    PageUp = 0x4D, "PageUp", "pageup";
    PageDown = 0x4E, "PageDown", "pagedown";
    Left = 0x4F, "Left", "left";
    Right = 0x50, "Right", "right";
    Up = 0x51, "Up", "up";
    Down = 0x52, "Down", "down";
    NumLock = 0x53, "NumLock", "numlock";
    NumDivide = 0x54, "NumDiv", "numdiv";
    NumMultiply = 0x55, "NumMult", "nummult";
    NumMinus = 0x56, "NumMinus", "numminus";
    NumPlus = 0x57, "NumPlus", "numplus";
    NumEnter = 0x58, "NumEnter", "numenter";
    NumDelete = 0x59, "NumDel", "numdel";
    NumInsert = 0x5A, "NumIns", "numins";
    NumEnd = 0x5B, "NumEnd", "numend";
    NumDown = 0x5C, "NumDown", "numdown";
    NumPageDown = 0x5D, "NumPageDown", "numpagedown";
    NumLeft = 0x5E, "NumLeft", "numleft";
    NumClear = 0x5F, "NumClear", "numclear";
    NumRight = 0x60, "NumRight", "numright";
    NumHome = 0x61, "NumHome", "numhome";
    NumUp = 0x62, "NumUp", "numup";
    NumPageUp = 0x63, "NumPageUp", "numpageup";
    NumDecimal = 0x64, "NumDecimal", "numdecimal";
    Numpad0 = 0x65, "Num0", "num0";
    Numpad1 = 0x66, "Num1", "num1";
    Numpad2 = 0x67, "Num2", "num2";
    Numpad3 = 0x68, "Num3", "num3";
    Numpad4 = 0x69, "Num4", "num4";
    Numpad5 = 0x6A, "Num5", "num5";
    Numpad6 = 0x6B, "Num6", "num6";
    Numpad7 = 0x6C, "Num7", "num7";
    Numpad8 = 0x6D, "Num8", "num8";
    Numpad9 = 0x6E, "Num9", "num9";
}

impl Keycode {
    /// Raw byte value of the keycode.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// The modifier bit this key stands for, if it is a modifier key.
    #[must_use]
    pub const fn as_modifier(self) -> Option<Modifiers> {
        match self {
            Self::Shift => Some(Modifiers::SHIFT),
            Self::Control => Some(Modifiers::CTRL),
            Self::Super => Some(Modifiers::SUPER),
            Self::Meta => Some(Modifiers::META),
            _ => None,
        }
    }

    /// Numpad keys that only exist while Num Lock is on.
    ///
    /// Grabs for these keys need the platform's Num Lock modifier.
    #[must_use]
    pub const fn requires_num_lock(self) -> bool {
        self as u8 >= Self::NumDecimal as u8
    }

    /// Number-row key for a single digit.
    #[must_use]
    pub const fn from_digit(digit: i64) -> Option<Self> {
        Some(match digit {
            0 => Self::Digit0,
            1 => Self::Digit1,
            2 => Self::Digit2,
            3 => Self::Digit3,
            4 => Self::Digit4,
            5 => Self::Digit5,
            6 => Self::Digit6,
            7 => Self::Digit7,
            8 => Self::Digit8,
            9 => Self::Digit9,
            _ => return None,
        })
    }

    /// Key written as a single punctuation character.
    #[must_use]
    pub const fn from_punct(ch: char) -> Option<Self> {
        Some(match ch {
            '`' => Self::Grave,
            '-' => Self::Minus,
            '=' => Self::Equal,
            '[' => Self::LeftBracket,
            ']' => Self::RightBracket,
            '\\' => Self::Backslash,
            ';' => Self::Semicolon,
            '\'' => Self::Quote,
            ',' => Self::Comma,
            '.' => Self::Period,
            '/' => Self::Slash,
            _ => return None,
        })
    }
}

impl fmt::Display for Keycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Find the keycode named by an identifier, ignoring case.
#[must_use]
pub fn lookup_keycode(lexeme: &str) -> Option<Keycode> {
    let key = match lexeme.to_ascii_lowercase().as_str() {
        "q" => Keycode::Q,
        "w" => Keycode::W,
        "e" => Keycode::E,
        "r" => Keycode::R,
        "t" => Keycode::T,
        "y" => Keycode::Y,
        "u" => Keycode::U,
        "i" => Keycode::I,
        "o" => Keycode::O,
        "p" => Keycode::P,
        "a" => Keycode::A,
        "s" => Keycode::S,
        "d" => Keycode::D,
        "f" => Keycode::F,
        "g" => Keycode::G,
        "h" => Keycode::H,
        "j" => Keycode::J,
        "k" => Keycode::K,
        "l" => Keycode::L,
        "z" => Keycode::Z,
        "x" => Keycode::X,
        "c" => Keycode::C,
        "v" => Keycode::V,
        "b" => Keycode::B,
        "n" => Keycode::N,
        "m" => Keycode::M,
        "zero" => Keycode::Digit0,
        "one" => Keycode::Digit1,
        "two" => Keycode::Digit2,
        "three" => Keycode::Digit3,
        "four" => Keycode::Digit4,
        "five" => Keycode::Digit5,
        "six" => Keycode::Digit6,
        "seven" => Keycode::Digit7,
        "eight" => Keycode::Digit8,
        "nine" => Keycode::Digit9,
        "backtick" | "grave" => Keycode::Grave,
        "minus" | "dash" => Keycode::Minus,
        "equals" => Keycode::Equal,
        "leftbracket" | "leftsq" | "leftsquare" => Keycode::LeftBracket,
        "rightbracket" | "rightsq" | "rightsquare" => Keycode::RightBracket,
        "backslash" => Keycode::Backslash,
        "semicolon" => Keycode::Semicolon,
        "quote" | "apostrophe" => Keycode::Quote,
        "comma" => Keycode::Comma,
        "period" | "dot" => Keycode::Period,
        "slash" => Keycode::Slash,
        "space" => Keycode::Space,
        "esc" | "escape" => Keycode::Escape,
        "backspace" => Keycode::Backspace,
        "tab" => Keycode::Tab,
        "caps" | "capslock" => Keycode::CapsLock,
        "enter" | "return" => Keycode::Enter,
        "shift" => Keycode::Shift,
        "control" | "ctrl" => Keycode::Control,
        "super" | "command" | "cmd" | "win" | "windows" => Keycode::Super,
        "meta" | "alt" | "option" => Keycode::Meta,
        "f1" => Keycode::F1,
        "f2" => Keycode::F2,
        "f3" => Keycode::F3,
        "f4" => Keycode::F4,
        "f5" => Keycode::F5,
        "f6" => Keycode::F6,
        "f7" => Keycode::F7,
        "f8" => Keycode::F8,
        "f9" => Keycode::F9,
        "f10" => Keycode::F10,
        "f11" => Keycode::F11,
        "f12" => Keycode::F12,
        "printscreen" => Keycode::PrintScreen,
        "scrolllock" => Keycode::ScrollLock,
        "pause" => Keycode::Pause,
        "insert" | "ins" => Keycode::Insert,
        "delete" | "del" => Keycode::Delete,
        "home" => Keycode::Home,
        "end" => Keycode::End,
        "pageup" | "pgup" => Keycode::PageUp,
        "pagedown" | "pgdn" => Keycode::PageDown,
        "left" => Keycode::Left,
        "right" => Keycode::Right,
        "up" => Keycode::Up,
        "down" => Keycode::Down,
        "numlock" => Keycode::NumLock,
        "numdiv" | "numdivide" | "numslash" => Keycode::NumDivide,
        "nummult" | "nummultiply" | "numasterisk" | "numtimes" => Keycode::NumMultiply,
        "numminus" => Keycode::NumMinus,
        "numplus" => Keycode::NumPlus,
        "numenter" => Keycode::NumEnter,
        "numdel" | "numdelete" => Keycode::NumDelete,
        "numins" | "numinsert" => Keycode::NumInsert,
        "numend" => Keycode::NumEnd,
        "numdown" => Keycode::NumDown,
        "numpgdn" | "numpagedown" => Keycode::NumPageDown,
        "numleft" => Keycode::NumLeft,
        "numclear" => Keycode::NumClear,
        "numright" => Keycode::NumRight,
        "numhome" => Keycode::NumHome,
        "numup" => Keycode::NumUp,
        "numpgup" | "numpageup" => Keycode::NumPageUp,
        "numdecimal" | "numdec" => Keycode::NumDecimal,
        "num0" => Keycode::Numpad0,
        "num1" => Keycode::Numpad1,
        "num2" => Keycode::Numpad2,
        "num3" => Keycode::Numpad3,
        "num4" => Keycode::Numpad4,
        "num5" => Keycode::Numpad5,
        "num6" => Keycode::Numpad6,
        "num7" => Keycode::Numpad7,
        "num8" => Keycode::Numpad8,
        "num9" => Keycode::Numpad9,
        _ => return None,
    };
    Some(key)
}

/// Render a key and its modifiers, e.g. `Control-Shift-Q`.
///
/// Prefixes always appear in the order Control, Super, Meta, Shift.
#[must_use]
pub fn render_key(key: Keycode, modifiers: Modifiers) -> String {
    let mut out = String::new();
    for (flag, prefix) in [
        (Modifiers::CTRL, "Control-"),
        (Modifiers::SUPER, "Super-"),
        (Modifiers::META, "Meta-"),
        (Modifiers::SHIFT, "Shift-"),
    ] {
        if modifiers.contains(flag) {
            out.push_str(prefix);
        }
    }
    out.push_str(key.name());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup_keycode("Q"), Some(Keycode::Q));
        assert_eq!(lookup_keycode("ESCAPE"), Some(Keycode::Escape));
        assert_eq!(lookup_keycode("PgUp"), Some(Keycode::PageUp));
    }

    #[test]
    fn aliases_share_a_keycode() {
        assert_eq!(lookup_keycode("esc"), lookup_keycode("escape"));
        assert_eq!(lookup_keycode("cmd"), Some(Keycode::Super));
        assert_eq!(lookup_keycode("option"), Some(Keycode::Meta));
        assert_eq!(lookup_keycode("numtimes"), Some(Keycode::NumMultiply));
    }

    #[test]
    fn unknown_name() {
        assert_eq!(lookup_keycode("hyper"), None);
        assert_eq!(lookup_keycode("f13"), None);
        assert_eq!(lookup_keycode(""), None);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(Keycode::Q.code(), 0x01);
        assert_eq!(Keycode::Meta.code(), 0x39);
        assert_eq!(Keycode::F1.code(), 0x3A);
        assert_eq!(Keycode::Numpad9.code(), 0x6E);
        assert_eq!(Keycode::ALL.len(), 0x6E);
    }

    #[test]
    fn render_prefix_order() {
        let all = Modifiers::all();
        assert_eq!(render_key(Keycode::Q, all), "Control-Super-Meta-Shift-Q");
        assert_eq!(render_key(Keycode::PageUp, Modifiers::empty()), "PageUp");
        assert_eq!(
            render_key(Keycode::Minus, Modifiers::CTRL),
            "Control--"
        );
    }

    #[test]
    fn sigils_round_trip() {
        for sigil in ['^', '!', '~', '@'] {
            let m = Modifiers::from_sigil(sigil).unwrap();
            assert_eq!(m.sigils(), sigil.to_string());
        }
        assert_eq!(Modifiers::all().sigils(), "^~@!");
        assert_eq!(Modifiers::from_sigil('%'), None);
    }

    #[test]
    fn modifier_keys() {
        assert_eq!(Keycode::Control.as_modifier(), Some(Modifiers::CTRL));
        assert_eq!(Keycode::Shift.as_modifier(), Some(Modifiers::SHIFT));
        assert_eq!(Keycode::CapsLock.as_modifier(), None);
    }

    #[test]
    fn num_lock_variants() {
        assert!(Keycode::Numpad5.requires_num_lock());
        assert!(Keycode::NumDecimal.requires_num_lock());
        assert!(!Keycode::NumDelete.requires_num_lock());
        assert!(!Keycode::NumClear.requires_num_lock());
    }

    #[test]
    fn digits_and_punctuation() {
        assert_eq!(Keycode::from_digit(0), Some(Keycode::Digit0));
        assert_eq!(Keycode::from_digit(10), None);
        assert_eq!(Keycode::from_digit(-1), None);
        assert_eq!(Keycode::from_punct('\''), Some(Keycode::Quote));
        assert_eq!(Keycode::from_punct('$'), None);
    }
}
