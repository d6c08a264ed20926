#![forbid(unsafe_code)]

//! Plain crossterm rendering of the field and its [`PanelView`].

use std::io::{self, Write};

use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use suggest_widgets::view::{PanelView, StyledSegment};
use suggest_widgets::{Rgba, Style, StyleFlags};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, FIELD_ROW, LEFT, PANEL_TOP};
use crate::cli::Mode;

/// Repaint the whole screen for `app` on a `cols` x `rows` terminal.
pub fn draw<W: Write>(out: &mut W, app: &App, (cols, rows): (u16, u16)) -> io::Result<()> {
    queue!(out, cursor::Hide, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    let title = match app.mode() {
        Mode::Local => "suggest-demo: local list",
        Mode::Remote => "suggest-demo: remote acronym lookup",
    };
    queue!(out, SetAttribute(Attribute::Bold), Print(title), SetAttribute(Attribute::Reset))?;

    let width = usize::from(cols.saturating_sub(LEFT * 2)).max(1);
    let caret_col = draw_field(out, app, width)?;

    let view = app.field.view();
    let mut row = PANEL_TOP;
    for row_view in view.visible_rows() {
        for line in 0..view.theme.row_height.max(1) {
            if row >= rows.saturating_sub(1) {
                break;
            }
            queue!(out, cursor::MoveTo(LEFT, row))?;
            if line == 0 {
                draw_row(out, &view, &row_view.segments, row_view.selected, width)?;
            } else {
                draw_blank(out, &view, width)?;
            }
            row += 1;
        }
    }
    if view.loading && row < rows.saturating_sub(1) {
        queue!(
            out,
            cursor::MoveTo(LEFT, row),
            SetAttribute(Attribute::Dim),
            Print("loading…"),
            SetAttribute(Attribute::Reset)
        )?;
    }

    let status = truncate(app.status(), usize::from(cols));
    queue!(
        out,
        cursor::MoveTo(0, rows.saturating_sub(1)),
        SetAttribute(Attribute::Dim),
        Print(status),
        SetAttribute(Attribute::Reset),
        cursor::MoveTo(caret_col, FIELD_ROW),
        cursor::Show
    )?;
    out.flush()
}

/// Draw the field text with its selection reversed. Returns the caret column.
fn draw_field<W: Write>(out: &mut W, app: &App, width: usize) -> io::Result<u16> {
    let buffer = app.field.buffer();
    let selection = buffer.selection();
    queue!(out, cursor::MoveTo(LEFT, FIELD_ROW))?;

    let mut used = 0usize;
    let mut caret_col = LEFT;
    for (i, g) in buffer.value().graphemes(true).enumerate() {
        if i == buffer.cursor() {
            caret_col = LEFT.saturating_add(u16::try_from(used).unwrap_or(u16::MAX));
        }
        let w = g.width();
        if used + w > width {
            break;
        }
        if selection.as_ref().is_some_and(|r| r.contains(&i)) {
            queue!(
                out,
                SetAttribute(Attribute::Reverse),
                Print(g),
                SetAttribute(Attribute::NoReverse)
            )?;
        } else {
            queue!(out, Print(g))?;
        }
        used += w;
    }
    if buffer.cursor() >= buffer.len() {
        caret_col = LEFT.saturating_add(u16::try_from(used).unwrap_or(u16::MAX));
    }
    Ok(caret_col)
}

fn draw_row<W: Write>(
    out: &mut W,
    view: &PanelView,
    segments: &[StyledSegment],
    selected: bool,
    width: usize,
) -> io::Result<()> {
    let mut used = 0usize;
    for seg in segments {
        if used >= width {
            break;
        }
        let text = truncate(&seg.text, width - used);
        used += text.width();
        apply_style(out, seg.style, view.theme.background, selected)?;
        queue!(out, Print(text), SetAttribute(Attribute::Reset), ResetColor)?;
    }
    if used < width {
        apply_style(out, view.theme.text, view.theme.background, selected)?;
        queue!(
            out,
            Print(" ".repeat(width - used)),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
    }
    Ok(())
}

fn draw_blank<W: Write>(out: &mut W, view: &PanelView, width: usize) -> io::Result<()> {
    apply_style(out, Style::new(), view.theme.background, false)?;
    queue!(out, Print(" ".repeat(width)), ResetColor)
}

fn apply_style<W: Write>(
    out: &mut W,
    style: Style,
    background: Rgba,
    selected: bool,
) -> io::Result<()> {
    if let Some(fg) = style.fg.and_then(to_color) {
        queue!(out, SetForegroundColor(fg))?;
    }
    if let Some(bg) = style.bg.or(Some(background)).and_then(to_color) {
        queue!(out, SetBackgroundColor(bg))?;
    }
    for (flag, attr) in [
        (StyleFlags::BOLD, Attribute::Bold),
        (StyleFlags::DIM, Attribute::Dim),
        (StyleFlags::ITALIC, Attribute::Italic),
        (StyleFlags::UNDERLINE, Attribute::Underlined),
    ] {
        if style.attrs.contains(flag) {
            queue!(out, SetAttribute(attr))?;
        }
    }
    // Selected rows and REVERSE cancel out.
    if selected != style.attrs.contains(StyleFlags::REVERSE) {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}

/// Terminal colour for `c`; fully transparent means "leave as is".
fn to_color(c: Rgba) -> Option<Color> {
    (c.a() > 0).then(|| Color::Rgb {
        r: c.r(),
        g: c.g(),
        b: c.b(),
    })
}

fn truncate(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for g in s.graphemes(true) {
        let w = g.width();
        if used + w > width {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Opts;
    use std::time::Instant;
    use suggest_core::event::Event;

    fn render(app: &App) -> String {
        let mut buf = Vec::new();
        draw(&mut buf, app, (60, 20)).expect("draw to a Vec");
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn focused_local_app_shows_rows_and_status() {
        let mut app = App::new(&Opts::default());
        app.handle_event(&Event::Focus(true), Instant::now());
        let screen = render(&app);
        assert!(screen.contains("suggest-demo: local list"));
        assert!(screen.contains("Jacob Portman"));
        assert!(screen.contains("Type a character name"));
        assert!(!screen.contains("Miss Alma"));
    }

    #[test]
    fn tiny_terminal_does_not_fail() {
        let mut app = App::new(&Opts::default());
        app.handle_event(&Event::Focus(true), Instant::now());
        let mut buf = Vec::new();
        draw(&mut buf, &app, (3, 2)).expect("draw to a Vec");
    }

    #[test]
    fn colors_skip_transparent() {
        assert_eq!(to_color(Rgba::TRANSPARENT), None);
        assert_eq!(
            to_color(Rgba::rgb(1, 2, 3)),
            Some(Color::Rgb { r: 1, g: 2, b: 3 })
        );
    }

    #[test]
    fn truncate_respects_wide_graphemes() {
        assert_eq!(truncate("日本語", 5), "日本");
        assert_eq!(truncate("abc", 0), "");
    }
}
