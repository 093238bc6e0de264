use crate::config::EmergencyContact;
use crate::models::{Period, Status, TimeOfDay};
use crate::scheduler::{slot_status, SlotStatus};
use crate::session::{Action, Session, View};
use crate::stats::ComplianceTier;
use crate::utils::{format_countdown, join_medicines};
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Tabs, Wrap},
    Frame, Terminal,
};
use std::io::{self, Write};
use std::time::Duration as StdDuration;

pub fn run_tui(session: &mut Session) -> Result<()> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, session);

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("Session loop failed: {:#}", err);
        println!("{:?}", err)
    }

    Ok(())
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session,
) -> Result<()> {
    loop {
        let now = Local::now().naive_local();
        session.tick(now);
        if session.take_bell() {
            ring_bell()?;
        }

        terminal.draw(|f| draw(f, session, now))?;

        if event::poll(StdDuration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.code == KeyCode::Char('q') && !session.confirm_clear {
                    return Ok(());
                }
                if let Some(action) = key_action(session.view, session.confirm_clear, key.code) {
                    session.apply(action, Local::now().naive_local());
                }
            }
        }
    }
}

fn ring_bell() -> Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(b"\x07")?;
    stdout.flush()?;
    Ok(())
}

pub fn key_action(view: View, confirm_clear: bool, code: KeyCode) -> Option<Action> {
    if confirm_clear {
        return Some(match code {
            KeyCode::Char('y') => Action::ConfirmClear,
            _ => Action::CancelClear,
        });
    }

    match code {
        KeyCode::Tab => return Some(Action::NextView),
        KeyCode::BackTab => return Some(Action::PrevView),
        _ => {}
    }

    match view {
        View::Home => match code {
            KeyCode::Left | KeyCode::Up => Some(Action::PrevPeriod),
            KeyCode::Right | KeyCode::Down => Some(Action::NextPeriod),
            KeyCode::Char('t') => Some(Action::Log(Status::Taken)),
            KeyCode::Char('m') => Some(Action::Log(Status::Missed)),
            KeyCode::Char('z') => Some(Action::Snooze),
            _ => None,
        },
        View::History => match code {
            KeyCode::Char('t') => Some(Action::ToggleStatusFilter(Status::Taken)),
            KeyCode::Char('m') => Some(Action::ToggleStatusFilter(Status::Missed)),
            KeyCode::Char('1') => Some(Action::TogglePeriodFilter(Period::Morning)),
            KeyCode::Char('2') => Some(Action::TogglePeriodFilter(Period::Afternoon)),
            KeyCode::Char('3') => Some(Action::TogglePeriodFilter(Period::Night)),
            KeyCode::Char('e') => Some(Action::Export),
            KeyCode::Char('c') => Some(Action::RequestClear),
            _ => None,
        },
        View::Reminders => match code {
            KeyCode::Char('e') => Some(Action::ToggleEnabled),
            KeyCode::Char('s') => Some(Action::ToggleSound),
            KeyCode::Up => Some(Action::PrevSlot),
            KeyCode::Down => Some(Action::NextSlot),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::LaterSlot),
            KeyCode::Left | KeyCode::Char('-') => Some(Action::EarlierSlot),
            KeyCode::Char('d') => Some(Action::ResetDefaults),
            KeyCode::Char('w') => Some(Action::SaveSettings),
            KeyCode::Char('x') => Some(Action::TestAlert),
            _ => None,
        },
        View::Emergency | View::About => None,
    }
}

pub fn draw(frame: &mut Frame, session: &Session, now: NaiveDateTime) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], session, now);
    draw_tabs(frame, chunks[1], session);
    match session.view {
        View::Home => draw_home(frame, chunks[2], session, now),
        View::History => draw_history(frame, chunks[2], session),
        View::Reminders => draw_reminders(frame, chunks[2], session, now),
        View::Emergency => draw_emergency(frame, chunks[2], session),
        View::About => draw_about(frame, chunks[2], session),
    }
    draw_footer(frame, chunks[3], session);
}

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn draw_header(frame: &mut Frame, area: Rect, session: &Session, now: NaiveDateTime) {
    let reminders = &session.config.reminders;
    let status_text = if reminders.enabled {
        Span::styled("REMINDERS ON", bold(Color::Green))
    } else {
        Span::styled("REMINDERS OFF", bold(Color::Yellow))
    };

    let header_content = Line::from(vec![
        Span::styled(" MedTrack ", bold(Color::Cyan)),
        Span::raw(" | "),
        status_text,
        Span::raw(" | "),
        Span::raw(now.format("%Y-%m-%d %I:%M:%S %p").to_string()),
        Span::raw(" | Taken: "),
        Span::styled(session.log.taken_count().to_string(), bold(Color::Green)),
        Span::raw(" | Missed: "),
        Span::styled(session.log.missed_count().to_string(), bold(Color::Red)),
    ]);

    let header = Paragraph::new(header_content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_tabs(frame: &mut Frame, area: Rect, session: &Session) {
    let titles: Vec<&str> = View::ALL.iter().map(|v| v.title()).collect();
    let tabs = Tabs::new(titles)
        .select(session.view.index())
        .highlight_style(bold(Color::Cyan).add_modifier(Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(tabs, area);
}

fn draw_home(frame: &mut Frame, area: Rect, session: &Session, now: NaiveDateTime) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Reminder
            Constraint::Length(3), // Quote
            Constraint::Min(0),    // Logging
        ])
        .split(area);

    let name = &session.config.profile.name;
    let reminder_lines = if let Some(banner) = session.banner(now) {
        let mut title = "MEDICATION REMINDER!".to_string();
        if banner.snoozed {
            title.push_str(" (snoozed)");
        }
        vec![
            Line::from(Span::styled(title, bold(Color::Yellow))),
            Line::raw(format!(
                "It's time for your {} medication, {}!",
                banner.slot.period, name
            )),
            Line::from(vec![
                Span::styled("Please take: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(join_medicines(&banner.slot.medicines)),
            ]),
            Line::raw(format!("Reminder set for: {}", banner.slot.time.format_12h())),
        ]
    } else {
        let (next, _) = session.next_reminder(now);
        vec![Line::raw(format!(
            "Next reminder: {} at {} - {}",
            next.slot.period,
            next.slot.time.format_12h(),
            join_medicines(&next.slot.medicines)
        ))]
    };
    let reminder = Paragraph::new(reminder_lines)
        .block(Block::default().title(" Reminder ").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(reminder, chunks[0]);

    let quote = Paragraph::new(Line::from(Span::styled(
        format!("\"{}\"", session.quote()),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
    )))
    .block(Block::default().borders(Borders::ALL))
    .wrap(Wrap { trim: true });
    frame.render_widget(quote, chunks[1]);

    let period = session.selected_period;
    let medicines = session.config.reminders.slot(period).medicines;
    let mut lines = vec![
        Line::raw(format!("What time is it, {}?", name)),
        Line::from(vec![
            Span::raw("  < "),
            Span::styled(period.name(), bold(Color::Cyan)),
            Span::raw(" >"),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Time to take: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(join_medicines(&medicines)),
        ]),
        Line::raw(""),
        Line::raw("Did you take your medication?"),
        Line::from(vec![
            Span::styled("  [t] Yes, I took it!", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled("[m] No, I missed it", Style::default().fg(Color::Red)),
        ]),
    ];
    if let Some(message) = &session.message {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(message.clone(), bold(Color::Magenta))));
    }
    let logging = Paragraph::new(lines)
        .block(Block::default().title(" Log a dose ").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(logging, chunks[2]);
}

fn checkbox(on: bool, label: &str) -> String {
    format!("[{}] {}", if on { "x" } else { " " }, label)
}

fn draw_history(frame: &mut Frame, area: Rect, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Metrics
            Constraint::Length(3), // Filters
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Message
        ])
        .split(area);

    let log = &session.log;
    let metrics = Paragraph::new(Line::from(vec![
        Span::raw(format!("  Total Records: {}", log.len())),
        Span::raw("   "),
        Span::styled(format!("Taken: {}", log.taken_count()), Style::default().fg(Color::Green)),
        Span::raw("   "),
        Span::styled(format!("Missed: {}", log.missed_count()), Style::default().fg(Color::Red)),
        Span::raw("   "),
        Span::styled(
            format!("Compliance Rate: {:.1}%", log.compliance_rate()),
            bold(Color::Cyan),
        ),
    ]))
    .block(Block::default().title(" Summary ").borders(Borders::ALL));
    frame.render_widget(metrics, chunks[0]);

    let mut filter_parts: Vec<String> = Status::ALL
        .iter()
        .map(|s| checkbox(session.status_filter.contains(s), s.name()))
        .collect();
    filter_parts.push("|".to_string());
    filter_parts.extend(
        Period::ALL
            .iter()
            .map(|p| checkbox(session.period_filter.contains(p), p.name())),
    );
    let filters = Paragraph::new(format!("  {}", filter_parts.join("  ")))
        .block(Block::default().title(" Filters ").borders(Borders::ALL));
    frame.render_widget(filters, chunks[1]);

    let block = Block::default()
        .title(" Detailed History ")
        .borders(Borders::ALL);
    if log.is_empty() {
        let empty = Paragraph::new(
            "No history available yet. Start tracking your medication intake from the Home page!",
        )
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(empty, chunks[2]);
    } else {
        let rows: Vec<Row> = session
            .filtered_records()
            .into_iter()
            .map(|r| {
                let color = match r.status {
                    Status::Taken => Color::Green,
                    Status::Missed => Color::Red,
                };
                Row::new(vec![
                    r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    r.period.name().to_string(),
                    join_medicines(&r.medicines),
                    r.status.name().to_string(),
                    r.note.clone(),
                ])
                .style(Style::default().fg(color))
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(20),
                Constraint::Length(11),
                Constraint::Percentage(35),
                Constraint::Length(8),
                Constraint::Min(10),
            ],
        )
        .header(
            Row::new(vec!["Date & Time", "Time of Day", "Medicines", "Status", "Notes"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(block);
        frame.render_widget(table, chunks[2]);
    }

    let message = match &session.message {
        Some(message) => Span::styled(message.clone(), bold(Color::Magenta)),
        None if log.is_empty() => Span::raw(""),
        None => {
            let tier = ComplianceTier::from_rate(log.compliance_rate());
            let color = match tier {
                ComplianceTier::Excellent => Color::Green,
                ComplianceTier::Good => Color::Cyan,
                ComplianceTier::NeedsEncouragement => Color::Yellow,
            };
            Span::styled(
                tier.message(&session.config.profile.name, log.taken_count() as u32),
                Style::default().fg(color),
            )
        }
    };
    let footer = Paragraph::new(Line::from(message))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_reminders(frame: &mut Frame, area: Rect, session: &Session, now: NaiveDateTime) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Settings
            Constraint::Length(7), // Schedule
            Constraint::Min(0),    // Next reminder
        ])
        .split(area);

    let reminders = &session.config.reminders;
    let on_off = |on: bool| {
        if on {
            Span::styled("ON", bold(Color::Green))
        } else {
            Span::styled("OFF", bold(Color::Red))
        }
    };
    let settings = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("  Medication Reminders: "),
            on_off(reminders.enabled),
            Span::raw("    Sound Alerts: "),
            on_off(reminders.sound_enabled),
        ]),
        Line::raw(format!(
            "  Snooze: {} min    Reminder window: {} min",
            reminders.snooze_mins, reminders.window_mins
        )),
    ])
    .block(Block::default().title(" Reminder Settings ").borders(Borders::ALL));
    frame.render_widget(settings, chunks[0]);

    let now_tod: TimeOfDay = now.into();
    let rows: Vec<Row> = reminders
        .slots()
        .into_iter()
        .map(|slot| {
            let (status, color) = match slot_status(now_tod, slot.time) {
                SlotStatus::Upcoming => ("Upcoming", Color::Cyan),
                SlotStatus::Active => ("ACTIVE", Color::Yellow),
                SlotStatus::Completed => ("Completed", Color::Green),
            };
            let mut style = Style::default().fg(color);
            if slot.period == session.selected_slot {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Row::new(vec![
                slot.period.name().to_string(),
                slot.time.format_12h(),
                join_medicines(&slot.medicines),
                status.to_string(),
            ])
            .style(style)
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(14),
            Constraint::Percentage(50),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["Time Period", "Reminder Time", "Medications", "Status"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title(" Reminder Schedule ").borders(Borders::ALL));
    frame.render_widget(table, chunks[1]);

    let (next, until) = session.next_reminder(now);
    let mut lines = vec![
        Line::raw(format!("  Current Time: {}", now.format("%I:%M:%S %p"))),
        Line::raw(format!("  Period:       {}", next.slot.period)),
        Line::raw(format!(
            "  Time:         {}{}",
            next.slot.time.format_12h(),
            if next.tomorrow { " (tomorrow)" } else { "" }
        )),
        Line::raw(format!("  Medications:  {}", join_medicines(&next.slot.medicines))),
        Line::raw(format!("  Time Until:   {}", format_countdown(until))),
    ];
    if session.test_alert {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!(
                "TEST REMINDER! This is how your reminder will look, {}!",
                session.config.profile.name
            ),
            bold(Color::Yellow),
        )));
    }
    if let Some(message) = &session.message {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(message.clone(), bold(Color::Magenta))));
    }
    let next_block = Paragraph::new(lines)
        .block(Block::default().title(" Next Reminder ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(next_block, chunks[2]);
}

const DANGER_SIGNS: [&str; 5] = [
    "Blood sugar very high (>300 mg/dL)",
    "Blood sugar very low (<70 mg/dL)",
    "Confusion or unconsciousness",
    "Severe nausea or vomiting",
    "Difficulty breathing",
];

const EMERGENCY_STEPS: [&str; 5] = [
    "Call the emergency number immediately",
    "Check blood sugar if possible",
    "Stay calm and don't panic",
    "Have someone stay with you",
    "Keep your medication list handy",
];

const REMINDER_TIPS: [&str; 4] = [
    "Keep medications in a visible place",
    "Take medications at the same time each day",
    "Use the snooze key if you need a few more minutes",
    "Log every dose so your history stays accurate",
];

fn emergency_lines(contacts: &[EmergencyContact]) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "  Emergency Numbers",
        bold(Color::Red),
    ))];
    for contact in contacts {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}: ", contact.label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(contact.phone.clone()),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "  When to seek emergency help",
        bold(Color::Yellow),
    )));
    for sign in DANGER_SIGNS {
        lines.push(Line::raw(format!("  - {}", sign)));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("  What to do", bold(Color::Yellow))));
    for (i, step) in EMERGENCY_STEPS.iter().enumerate() {
        lines.push(Line::raw(format!("  {}. {}", i + 1, step)));
    }
    lines
}

fn draw_emergency(frame: &mut Frame, area: Rect, session: &Session) {
    let para = Paragraph::new(emergency_lines(&session.config.contacts))
        .block(
            Block::default()
                .title(" Emergency Contact Information ")
                .borders(Borders::ALL),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(para, area);
}

fn draw_about(frame: &mut Frame, area: Rect, session: &Session) {
    let profile = &session.config.profile;
    let mut lines = vec![
        Line::from(Span::styled("  Medicine Intake Tracker", bold(Color::Cyan))),
        Line::raw(format!(
            "  Name: {}   GP: {}   Condition: {}",
            profile.name, profile.gp, profile.condition
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "  Your Current Medication Schedule",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for slot in session.config.reminders.slots() {
        lines.push(Line::raw(format!(
            "  {:<10} {}  {}",
            slot.period.name(),
            slot.time.format_12h(),
            join_medicines(&slot.medicines)
        )));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "  Reminder tips",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for tip in REMINDER_TIPS {
        lines.push(Line::raw(format!("  - {}", tip)));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw(format!(
        "  This app is a tracking tool and does not replace professional medical advice. Always consult with {} or your healthcare provider for medical decisions.",
        profile.gp
    )));
    lines.push(Line::raw(""));
    lines.push(Line::raw(format!(
        "  Version: {}",
        env!("CARGO_PKG_VERSION")
    )));

    let para = Paragraph::new(lines)
        .block(Block::default().title(" About ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(para, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, session: &Session) {
    let keys = if session.confirm_clear {
        "'y' to confirm clearing history | any other key to cancel"
    } else {
        match session.view {
            View::Home => "Tab: next view | arrows: period | 't' taken | 'm' missed | 'z' snooze | 'q' quit",
            View::History => {
                "Tab: next view | 't'/'m' status filter | '1'-'3' period filter | 'e' export | 'c' clear | 'q' quit"
            }
            View::Reminders => {
                "Up/Down: slot | Left/Right: -/+5 min | 'e' enable | 's' sound | 'd' defaults | 'w' save | 'x' test | 'q' quit"
            }
            View::Emergency | View::About => "Tab: next view | Shift+Tab: previous view | 'q' quit",
        }
    };
    let help = Paragraph::new(keys)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(help, area);
}
