use crate::common::centered_rect;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Terminal,
};
use snipvault_core::{Picker, Result};
use std::io::{self, stdout};

/// Full-screen list picker. Typing filters the list, Enter picks, Esc cancels.
#[derive(Debug, Default)]
pub struct TerminalPicker;

impl TerminalPicker {
    pub fn new() -> Self {
        Self
    }
}

impl Picker for TerminalPicker {
    fn pick_one(&mut self, options: &[String], label: &str) -> Result<Option<String>> {
        if options.is_empty() {
            return Ok(None);
        }

        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        let result = run_picker(&mut terminal, options, label);

        disable_raw_mode()?;
        execute!(stdout(), LeaveAlternateScreen)?;
        result
    }
}

/// Selection and filter state, kept apart from drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PickerState {
    options: Vec<String>,
    filter: String,
    selected: usize,
}

pub(crate) enum PickerAction {
    Continue,
    Pick(String),
    Cancel,
}

impl PickerState {
    pub(crate) fn new(options: &[String]) -> Self {
        Self {
            options: options.to_vec(),
            filter: String::new(),
            selected: 0,
        }
    }

    pub(crate) fn visible(&self) -> Vec<&String> {
        let needle = self.filter.to_lowercase();
        self.options
            .iter()
            .filter(|option| option.to_lowercase().contains(&needle))
            .collect()
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> PickerAction {
        let visible_len = self.visible().len();
        match code {
            KeyCode::Esc => return PickerAction::Cancel,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return PickerAction::Cancel
            }
            KeyCode::Enter => {
                if let Some(choice) = self.visible().get(self.selected) {
                    return PickerAction::Pick((*choice).clone());
                }
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < visible_len {
                    self.selected += 1;
                }
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = visible_len.saturating_sub(1),
            KeyCode::Backspace => {
                self.filter.pop();
                self.selected = 0;
            }
            KeyCode::Char(c) => {
                self.filter.push(c);
                self.selected = 0;
            }
            _ => {}
        }
        PickerAction::Continue
    }
}

fn run_picker(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    options: &[String],
    label: &str,
) -> Result<Option<String>> {
    let mut state = PickerState::new(options);

    loop {
        terminal.draw(|f| {
            let area = centered_rect(60, 70, f.area());
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Filter
                    Constraint::Min(3),    // Options
                    Constraint::Length(1), // Help text
                ])
                .split(area);

            let filter = Paragraph::new(Line::from(vec![
                Span::styled("Filter: ", Style::default().fg(Color::Yellow)),
                Span::raw(state.filter.clone()),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", label)),
            );
            f.render_widget(filter, chunks[0]);

            let visible = state.visible();
            let items: Vec<ListItem> = if visible.is_empty() {
                vec![ListItem::new(Span::styled(
                    "No matches",
                    Style::default().fg(Color::DarkGray),
                ))]
            } else {
                visible
                    .iter()
                    .map(|option| ListItem::new(Line::from(option.as_str())))
                    .collect()
            };

            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(" snipvault "))
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");
            let mut list_state = ListState::default();
            if !visible.is_empty() {
                list_state.select(Some(state.selected()));
            }
            f.render_stateful_widget(list, chunks[1], &mut list_state);

            let help = Paragraph::new("↑/↓: Move | Enter: Select | Type: Filter | Esc: Cancel")
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(help, chunks[2]);
        })?;

        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            match state.handle_key(code, modifiers) {
                PickerAction::Continue => {}
                PickerAction::Pick(choice) => return Ok(Some(choice)),
                PickerAction::Cancel => return Ok(None),
            }
        }
    }
}
