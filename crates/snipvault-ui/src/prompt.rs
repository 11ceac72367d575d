use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use snipvault_core::{PromptProvider, Result};
use std::io::{self, stdout, Write};

const PANEL_HEIGHT: u16 = 9;

/// Single-line prompt drawn in the alternate screen.
///
/// Enter submits, Esc or Ctrl-C abandons.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl PromptProvider for TerminalPrompt {
    fn ask_text(
        &mut self,
        label: &str,
        placeholder: &str,
        default: &str,
    ) -> Result<Option<String>> {
        terminal::enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let result = run_prompt(&mut stdout, label, placeholder, default);

        execute!(stdout, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;

        result
    }
}

/// Editable line with a cursor counted in characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl LineBuffer {
    pub(crate) fn new(initial: &str) -> Self {
        let chars: Vec<char> = initial.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub(crate) fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub(crate) fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub(crate) fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub(crate) fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(crate) fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub(crate) fn home(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub(crate) fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }
}

/// What a key press does to the prompt.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PromptAction {
    Continue,
    Submit(String),
    Abandon,
}

pub(crate) fn handle_key(
    buffer: &mut LineBuffer,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> PromptAction {
    match code {
        KeyCode::Enter => return PromptAction::Submit(buffer.text()),
        KeyCode::Esc => return PromptAction::Abandon,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return PromptAction::Abandon
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => buffer.clear(),
        KeyCode::Backspace => buffer.backspace(),
        KeyCode::Delete => buffer.delete(),
        KeyCode::Left => buffer.left(),
        KeyCode::Right => buffer.right(),
        KeyCode::Home => buffer.home(),
        KeyCode::End => buffer.end(),
        KeyCode::Char(c) => buffer.insert(c),
        _ => {}
    }
    PromptAction::Continue
}

fn run_prompt(
    stdout: &mut io::Stdout,
    label: &str,
    placeholder: &str,
    default: &str,
) -> Result<Option<String>> {
    let mut buffer = LineBuffer::new(default);

    loop {
        draw_ui(stdout, label, placeholder, &buffer)?;

        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            match handle_key(&mut buffer, code, modifiers) {
                PromptAction::Continue => {}
                PromptAction::Submit(text) => return Ok(Some(text)),
                PromptAction::Abandon => return Ok(None),
            }
        }
    }
}

fn draw_ui(
    stdout: &mut io::Stdout,
    label: &str,
    placeholder: &str,
    buffer: &LineBuffer,
) -> Result<()> {
    let (width, height) = terminal::size()?;
    let panel_width = width.saturating_sub(10).max(20);
    let start_x = 5;
    let start_y = height.saturating_sub(PANEL_HEIGHT) / 2;

    execute!(
        stdout,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        ResetColor
    )?;

    draw_box(stdout, start_x, start_y, panel_width, PANEL_HEIGHT)?;

    let field_x = start_x + 3;
    let field_width = panel_width.saturating_sub(6);
    execute!(
        stdout,
        cursor::MoveTo(field_x, start_y + 1),
        SetForegroundColor(Color::Yellow),
        Print(truncate(label, field_width as usize)),
        ResetColor
    )?;

    let text = buffer.text();
    let inner = field_width.saturating_sub(4) as usize;
    let (shown, shown_color) = if text.is_empty() {
        (truncate(placeholder, inner), Color::DarkGrey)
    } else {
        (tail(&text, buffer.cursor(), inner), Color::White)
    };

    execute!(
        stdout,
        cursor::MoveTo(field_x, start_y + 3),
        SetForegroundColor(Color::Blue),
        Print("│"),
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(shown_color),
        Print(" "),
        Print(&shown),
        Print(" ".repeat(inner.saturating_sub(shown.chars().count()) + 1)),
        ResetColor,
        SetForegroundColor(Color::Blue),
        Print("│"),
        ResetColor
    )?;

    let help_text = "Enter: Submit | Esc: Cancel | Ctrl-U: Clear";
    execute!(
        stdout,
        cursor::MoveTo(field_x, start_y + PANEL_HEIGHT - 2),
        SetForegroundColor(Color::DarkGrey),
        Print(truncate(help_text, field_width as usize)),
        ResetColor
    )?;

    let visible_cursor = buffer.cursor().min(inner);
    execute!(
        stdout,
        cursor::MoveTo(field_x + 2 + visible_cursor as u16, start_y + 3),
        cursor::Show
    )?;

    stdout.flush()?;
    Ok(())
}

fn draw_box(stdout: &mut io::Stdout, x: u16, y: u16, width: u16, height: u16) -> Result<()> {
    execute!(
        stdout,
        cursor::MoveTo(x, y),
        SetForegroundColor(Color::Blue),
        Print("╭"),
        Print("─".repeat(width.saturating_sub(2) as usize)),
        Print("╮")
    )?;

    for i in 1..height.saturating_sub(1) {
        execute!(
            stdout,
            cursor::MoveTo(x, y + i),
            Print("│"),
            cursor::MoveTo(x + width - 1, y + i),
            Print("│")
        )?;
    }

    execute!(
        stdout,
        cursor::MoveTo(x, y + height - 1),
        Print("╰"),
        Print("─".repeat(width.saturating_sub(2) as usize)),
        Print("╯"),
        ResetColor
    )?;

    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

// Keep the part of the line around the cursor visible.
fn tail(text: &str, cursor: usize, max: usize) -> String {
    let skip = cursor.saturating_sub(max);
    text.chars().skip(skip).take(max).collect()
}
