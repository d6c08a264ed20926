#![forbid(unsafe_code)]

//! Colours, text attributes, and the suggestion panel theme.
//!
//! The engine never interprets these: a [`Style`] attached to a highlight
//! range or a [`Theme`] attached to the field is carried through to the
//! [`PanelView`](crate::view::PanelView) for the presentation layer to draw.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A packed RGBA colour (`0xRRGGBBAA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba(pub u32);

impl Rgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    /// Create an opaque colour.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create a colour with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }
}

bitflags::bitflags! {
    /// Text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct StyleFlags: u8 {
        /// Bold / increased intensity.
        const BOLD      = 0b0000_0001;
        /// Dim / decreased intensity.
        const DIM       = 0b0000_0010;
        /// Italic text.
        const ITALIC    = 0b0000_0100;
        /// Underlined text.
        const UNDERLINE = 0b0000_1000;
        /// Reverse video.
        const REVERSE   = 0b0001_0000;
    }
}

/// Foreground, background and attributes. `None` colours inherit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Style {
    /// Foreground colour.
    pub fg: Option<Rgba>,
    /// Background colour.
    pub bg: Option<Rgba>,
    /// Attributes.
    pub attrs: StyleFlags,
}

impl Style {
    /// An empty style (inherits everything).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: StyleFlags::empty(),
        }
    }

    /// Set the foreground colour.
    #[must_use]
    pub const fn fg(mut self, color: Rgba) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background colour.
    #[must_use]
    pub const fn bg(mut self, color: Rgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add attributes.
    #[must_use]
    pub fn attrs(mut self, attrs: StyleFlags) -> Self {
        self.attrs |= attrs;
        self
    }

    /// Add bold.
    #[must_use]
    pub fn bold(self) -> Self {
        self.attrs(StyleFlags::BOLD)
    }

    /// Add underline.
    #[must_use]
    pub fn underline(self) -> Self {
        self.attrs(StyleFlags::UNDERLINE)
    }

    /// Whether this style sets nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_empty()
    }

    /// Layer `other` on top of `self`: set colours win, attributes accumulate.
    #[must_use]
    pub fn patch(self, other: Style) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs: self.attrs | other.attrs,
        }
    }

    /// Default style applied to the matched part of a suggestion.
    #[must_use]
    pub fn default_highlight() -> Self {
        Self::new().bold().underline()
    }
}

/// Visual theme of the suggestion panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Theme {
    /// Height of one result row, in terminal rows.
    pub row_height: u16,
    /// Panel background.
    pub background: Rgba,
    /// Panel border.
    pub border: Rgba,
    /// Line between rows (transparent = none).
    pub separator: Rgba,
    /// Base text style for plain titles.
    pub text: Style,
}

impl Theme {
    /// Translucent white panel with black text.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            row_height: 1,
            background: Rgba::rgba(255, 255, 255, 153),
            border: Rgba::rgb(230, 230, 230),
            separator: Rgba::TRANSPARENT,
            text: Style::new().fg(Rgba::BLACK),
        }
    }

    /// Translucent grey panel with white text.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            row_height: 1,
            background: Rgba::rgba(204, 204, 204, 153),
            border: Rgba::rgb(179, 179, 179),
            separator: Rgba::TRANSPARENT,
            text: Style::new().fg(Rgba::WHITE),
        }
    }

    /// Set the row height (builder). Zero is treated as one.
    #[must_use]
    pub const fn with_row_height(mut self, rows: u16) -> Self {
        self.row_height = if rows == 0 { 1 } else { rows };
        self
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
