use crate::model::Task;
use crate::service::{AuthContext, TaskController, TaskOutcome};
use crate::util;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Terminal,
};
use std::io;

enum Screen {
    Continue,
    Quit,
}

pub async fn run(auth: &mut AuthContext, tasks: &mut TaskController) -> anyhow::Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, auth, tasks).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Top-level route guard: a neutral frame while the stored session is being
/// restored, the login screen while unauthenticated, the task screen
/// otherwise.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    auth: &mut AuthContext,
    tasks: &mut TaskController,
) -> anyhow::Result<()> {
    loop {
        if auth.loading() {
            terminal.draw(|f| {
                let loading = Paragraph::new("Loading...")
                    .block(Block::default().title("taskdeck").borders(Borders::ALL));
                f.render_widget(loading, f.area());
            })?;
            auth.rehydrate();
            continue;
        }

        let screen = if auth.is_authenticated() {
            tasks_screen(terminal, auth, tasks).await?
        } else {
            login_screen(terminal, auth).await?
        };

        if let Screen::Quit = screen {
            return Ok(());
        }
    }
}

async fn login_screen<B: Backend>(
    terminal: &mut Terminal<B>,
    auth: &mut AuthContext,
) -> anyhow::Result<Screen> {
    let mut message: Option<String> = None;

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Min(3), Constraint::Length(3)])
                .split(f.area());

            let mut lines = vec![
                Line::from("Welcome to taskdeck"),
                Line::from(""),
                Line::from("l: log in    s: sign up    q: quit"),
            ];
            if let Some(msg) = &message {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    msg.clone(),
                    Style::default().fg(Color::Red),
                )));
            }

            let body = Paragraph::new(lines)
                .block(Block::default().title("Sign in").borders(Borders::ALL));
            f.render_widget(body, chunks[0]);

            let help = Paragraph::new("Not signed in")
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(help, chunks[1]);
        })?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(Screen::Quit),
                KeyCode::Char('l') => {
                    let Some(email) = prompt("Email") else { continue };
                    let Some(password) = prompt("Password") else { continue };
                    match auth.submit_login(&email, &password).await {
                        Ok(true) => return Ok(Screen::Continue),
                        Ok(false) => message = Some("Invalid email or password".to_string()),
                        Err(e) => message = Some(e),
                    }
                }
                KeyCode::Char('s') => {
                    let Some(email) = prompt("Email") else { continue };
                    let Some(password) = prompt("Password") else { continue };
                    let Some(name) = prompt("Name (optional)") else { continue };
                    let name = if name.is_empty() { None } else { Some(name.as_str()) };
                    match auth.submit_signup(&email, &password, name).await {
                        Ok(true) => return Ok(Screen::Continue),
                        Ok(false) => {
                            message = Some("Email already exists or invalid data".to_string())
                        }
                        Err(e) => message = Some(e),
                    }
                }
                _ => {}
            }
        }
    }
}

async fn tasks_screen<B: Backend>(
    terminal: &mut Terminal<B>,
    auth: &mut AuthContext,
    tasks: &mut TaskController,
) -> anyhow::Result<Screen> {
    let mut selected: usize = 0;
    let mut form_error: Option<String> = None;

    if let TaskOutcome::Unauthorized = tasks.refresh().await {
        auth.logout();
        return Ok(Screen::Continue);
    }

    loop {
        if selected >= tasks.tasks().len() {
            selected = tasks.tasks().len().saturating_sub(1);
        }

        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Length(3),
                    Constraint::Min(3),
                    Constraint::Length(3),
                ])
                .split(f.area());

            let who = auth
                .user()
                .map(|u| u.email.clone())
                .unwrap_or_else(|| "User".to_string());
            let header = match tasks.error().or(form_error.as_deref()) {
                Some(err) => Paragraph::new(Line::from(vec![
                    Span::styled(err.to_string(), Style::default().fg(Color::Red)),
                    Span::raw("  (x: dismiss)"),
                ])),
                None => Paragraph::new(format!("Signed in as {}", who)),
            }
            .block(Block::default().title("My Tasks").borders(Borders::ALL));
            f.render_widget(header, chunks[0]);

            let items: Vec<ListItem> = if tasks.loading() {
                vec![ListItem::new("Loading tasks...")]
            } else if tasks.tasks().is_empty() {
                vec![ListItem::new("No tasks yet. Press 'a' to create one!")]
            } else {
                tasks
                    .tasks()
                    .iter()
                    .enumerate()
                    .map(|(i, t)| {
                        let marker = if t.completed { "[x] " } else { "[ ] " };
                        let mut spans = vec![
                            Span::raw(marker),
                            Span::styled(
                                t.title.clone(),
                                if t.completed {
                                    Style::default()
                                        .fg(Color::DarkGray)
                                        .add_modifier(Modifier::CROSSED_OUT)
                                } else {
                                    Style::default().fg(Color::White)
                                },
                            ),
                        ];
                        if let Some(desc) = &t.description {
                            spans.push(Span::styled(
                                format!("  {}", desc),
                                Style::default().fg(Color::DarkGray),
                            ));
                        }
                        let style = if i == selected {
                            Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan)
                        } else {
                            Style::default()
                        };
                        ListItem::new(Line::from(spans)).style(style)
                    })
                    .collect()
            };
            let list = List::new(items)
                .block(Block::default().title("Tasks").borders(Borders::ALL));
            f.render_widget(list, chunks[1]);

            let help = Paragraph::new(
                "a: add  space: toggle  e: edit  d: delete  r: refresh  l: log out  q: quit",
            )
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(help, chunks[2]);
        })?;

        if let Event::Key(key) = event::read()? {
            let outcome = match key.code {
                KeyCode::Char('q') => return Ok(Screen::Quit),
                KeyCode::Char('l') => {
                    auth.logout();
                    return Ok(Screen::Continue);
                }
                KeyCode::Char('x') => {
                    tasks.dismiss_error();
                    form_error = None;
                    TaskOutcome::Done
                }
                KeyCode::Char('r') => tasks.refresh().await,
                KeyCode::Char('a') => match read_task_form(None) {
                    Ok((title, description)) => {
                        form_error = None;
                        tasks.create(&title, description.as_deref(), false).await
                    }
                    Err(e) => {
                        form_error = e;
                        TaskOutcome::Done
                    }
                },
                KeyCode::Char(' ') => match tasks.tasks().get(selected).cloned() {
                    Some(mut task) => {
                        task.completed = !task.completed;
                        tasks.update(task).await
                    }
                    None => TaskOutcome::Done,
                },
                KeyCode::Char('e') => match tasks.tasks().get(selected).cloned() {
                    Some(task) => match read_task_form(Some(&task)) {
                        Ok((title, description)) => {
                            form_error = None;
                            let updated = Task {
                                title,
                                description,
                                ..task
                            };
                            tasks.update(updated).await
                        }
                        Err(e) => {
                            form_error = e;
                            TaskOutcome::Done
                        }
                    },
                    None => TaskOutcome::Done,
                },
                KeyCode::Char('d') => match tasks.tasks().get(selected).cloned() {
                    Some(task) => {
                        if confirm(&format!("Delete '{}'?", task.title)) {
                            tasks.delete(&task.id).await
                        } else {
                            TaskOutcome::Done
                        }
                    }
                    None => TaskOutcome::Done,
                },
                KeyCode::Up => {
                    selected = selected.saturating_sub(1);
                    TaskOutcome::Done
                }
                KeyCode::Down => {
                    if selected + 1 < tasks.tasks().len() {
                        selected += 1;
                    }
                    TaskOutcome::Done
                }
                _ => TaskOutcome::Done,
            };

            if let TaskOutcome::Unauthorized = outcome {
                auth.logout();
                return Ok(Screen::Continue);
            }
        }
    }
}

/// Prompt for title and description, re-using the current values when
/// editing. `Err(Some(msg))` is a validation failure to show inline,
/// `Err(None)` an aborted prompt.
#[allow(clippy::type_complexity)]
fn read_task_form(
    current: Option<&Task>,
) -> Result<(String, Option<String>), Option<String>> {
    let title_label = match current {
        Some(task) => format!("Title [{}]", task.title),
        None => "Title".to_string(),
    };
    let mut title = prompt(&title_label).ok_or(None)?;
    if title.is_empty() {
        if let Some(task) = current {
            title = task.title.clone();
        }
    }
    util::validate_title(&title).map_err(Some)?;

    let description = prompt("Description (optional)").ok_or(None)?;
    util::validate_description(&description).map_err(Some)?;
    let description = if description.is_empty() {
        current.and_then(|t| t.description.clone())
    } else {
        Some(description)
    };

    Ok((title, description))
}

fn confirm(message: &str) -> bool {
    match prompt(&format!("{} (y/N)", message)) {
        Some(answer) => matches!(answer.as_str(), "y" | "Y" | "yes"),
        None => false,
    }
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        enable_raw_mode().ok();
        Some(input.trim().to_string())
    } else {
        enable_raw_mode().ok();
        None
    }
}
