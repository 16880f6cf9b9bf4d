use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use time::OffsetDateTime;

use crate::app::{App, InputMode};
use crate::repo::TaskRepository;

/// Runs the terminal UI until the user quits, then hands the app back.
pub fn run<R: TaskRepository>(mut app: App<R>, tick_rate: Duration) -> Result<App<R>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut last_tick = Instant::now();
    let res = loop {
        app.tick(Instant::now());
        if let Err(err) = terminal.draw(|f| draw(f, &app, OffsetDateTime::now_utc())) {
            break Err(err.into());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        match poll_key(timeout) {
            Ok(Some(code)) => {
                if handle_key(&mut app, code) {
                    break Ok(());
                }
            }
            Ok(None) => {}
            Err(err) => break Err(err),
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    };

    cleanup_terminal(&mut terminal)?;
    res.map(|()| app)
}

fn poll_key(timeout: Duration) -> Result<Option<KeyCode>> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
    {
        return Ok(Some(key.code));
    }
    Ok(None)
}

/// Applies one key press. Returns true when the app should exit.
fn handle_key<R: TaskRepository>(app: &mut App<R>, code: KeyCode) -> bool {
    match app.mode {
        InputMode::Normal => match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('j') | KeyCode::Down => app.select_next(),
            KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
            KeyCode::Char('a') | KeyCode::Char('n') => app.start_editing(),
            KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('x') => app.request_clear_all(),
            _ => {}
        },
        InputMode::Editing => match code {
            KeyCode::Esc => app.cancel_editing(),
            KeyCode::Enter => app.add_task(),
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Char(c) => app.input.push(c),
            _ => {}
        },
        InputMode::ConfirmClear => match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_clear_all(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_clear_all(),
            _ => {}
        },
    }

    false
}

fn draw<R: TaskRepository>(f: &mut ratatui::Frame, app: &App<R>, now: OffsetDateTime) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(size);

    f.render_widget(render_header(app), chunks[0]);

    if app.tasks.is_empty() && app.fading.is_empty() {
        f.render_widget(render_empty_state(), chunks[1]);
    } else {
        let (list, selected_row) = render_list(app, now);
        let mut list_state = ListState::default();
        list_state.select(selected_row);
        f.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    f.render_widget(render_footer(app), chunks[2]);
}

fn render_header<R: TaskRepository>(app: &App<R>) -> Paragraph<'static> {
    let summary = format!(
        "Total: {}  Completed: {}",
        app.stats.total, app.stats.completed
    );
    let line = Line::from(vec![
        Span::styled("jotter", Style::default().fg(Color::Cyan)),
        Span::raw("  |  "),
        Span::styled(summary, Style::default().fg(Color::Yellow)),
    ]);
    Paragraph::new(line)
        .block(Block::default().title("Overview").borders(Borders::ALL))
        .wrap(Wrap { trim: true })
}

fn render_empty_state() -> Paragraph<'static> {
    Paragraph::new("No tasks yet. Press 'a' to add one.")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().title("Tasks").borders(Borders::ALL))
}

/// Builds the task rows with deleted-but-fading rows spliced back in at
/// their old positions. Also returns the visual row of the selection.
fn render_list<R: TaskRepository>(
    app: &App<R>,
    now: OffsetDateTime,
) -> (List<'static>, Option<usize>) {
    let mut items: Vec<ListItem> = app
        .tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let symbol = if task.completed { "✔" } else { "•" };
            let line = vec![
                Span::raw(format!(" {symbol} {}", task.text)),
                Span::styled(
                    format!("  {}", app.age_label(task, now)),
                    Style::default().fg(Color::DarkGray),
                ),
            ];

            let style = if idx == app.selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if task.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(line)).style(style)
        })
        .collect();

    let mut selected_row = (!app.tasks.is_empty()).then_some(app.selected);

    let mut fading: Vec<_> = app.fading.iter().collect();
    fading.sort_by_key(|row| row.index);
    for row in fading {
        let at = row.index.min(items.len());
        let ghost = ListItem::new(Line::from(format!("   {}", row.task.text))).style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM | Modifier::CROSSED_OUT),
        );
        items.insert(at, ghost);
        if let Some(sel) = selected_row.as_mut()
            && at <= *sel
        {
            *sel += 1;
        }
    }

    let title = if app.tasks.is_empty() {
        "Tasks (a add ; q quit)"
    } else {
        "Tasks (j/k move ; a add ; Space/Enter toggle ; d delete ; x clear all)"
    };

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_symbol("➤ ");
    (list, selected_row)
}

fn render_footer<R: TaskRepository>(app: &App<R>) -> Paragraph<'_> {
    match app.mode {
        InputMode::Normal => {
            let msg = app.status.as_deref().unwrap_or("q quit ; a add");
            Paragraph::new(msg).block(Block::default().title("Normal").borders(Borders::ALL))
        }
        InputMode::Editing => {
            let line = Line::from(vec![
                Span::raw("New task: "),
                Span::styled(&app.input, Style::default().fg(Color::Yellow)),
                Span::raw("█"),
            ]);
            let border = if app.input_error() {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Paragraph::new(line).block(
                Block::default()
                    .title("Input (Enter to add / Esc to cancel)")
                    .borders(Borders::ALL)
                    .border_style(border),
            )
        }
        InputMode::ConfirmClear => {
            let msg = app.status.as_deref().unwrap_or("Delete all tasks? (y/n)");
            Paragraph::new(Span::styled(msg, Style::default().fg(Color::Red)))
                .block(Block::default().title("Confirm").borders(Borders::ALL))
        }
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
