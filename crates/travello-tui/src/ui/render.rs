use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use travello_core::forms::{LoginFocus, SignupFocus};
use travello_core::i18n::Message;
use travello_core::Route;

use crate::app::{App, AppState};

use super::styles;

/// Visible width of a text field, in characters
const FIELD_WIDTH: usize = 24;

/// Width of the form dialogs
const FORM_WIDTH: u16 = 50;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let route = app.visible_route();
    let title = format!("  Travello  {}", route.path());
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled("  Travello", styles::title_style()),
        Span::styled(format!("  {}", route.path()), styles::muted_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.chars().count() + help_hint.len() + 4),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.session.is_loading() {
        render_loading(frame, app, area);
        return;
    }

    match app.visible_route() {
        Route::Home => render_home(frame, app, area),
        Route::Login => render_login(frame, app, area),
        Route::Signup => render_signup(frame, app, area),
        Route::Profile => render_profile(frame, app, area),
    }
}

fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let text = app.config.locale.text(Message::CheckingSession);
    let area = centered_rect_fixed(FORM_WIDTH, 3, area);
    let paragraph = Paragraph::new(Line::from(Span::styled(text, styles::muted_style())))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let locale = app.config.locale;
    let mut lines = vec![
        Line::from(Span::styled("Travello", styles::title_style())),
        Line::from(""),
    ];

    if app.session.is_logged_in() {
        lines.push(Line::from(Span::styled(
            app.profile.greeting(),
            styles::success_style(),
        )));
        lines.push(Line::from(""));
        lines.push(key_hint("p", Route::Profile.title()));
        lines.push(key_hint("o", locale.text(Message::Logout)));
    } else {
        lines.push(key_hint("l", locale.text(Message::LoginButton)));
        lines.push(key_hint("s", locale.text(Message::SignupButton)));
    }

    let area = centered_rect_fixed(FORM_WIDTH, lines.len() as u16 + 2, area);
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.login;
    let locale = form.locale();

    let mut lines = vec![
        Line::from(""),
        field_line("Email:    ", &form.email, form.focus == LoginFocus::Email),
        field_line(
            "Password: ",
            &mask(&form.password),
            form.focus == LoginFocus::Password,
        ),
        Line::from(""),
        button_line(form.submit_label(), form.focus == LoginFocus::Submit),
        Line::from(""),
        link_line(
            locale.text(Message::NoAccountPrompt),
            locale.text(Message::SignupButton),
            form.focus == LoginFocus::SignupLink,
        ),
    ];
    push_error(&mut lines, form.error());

    render_form_box(frame, area, Route::Login.title(), lines);
}

fn render_signup(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.signup;
    let locale = form.locale();

    let mut lines = vec![
        Line::from(""),
        field_line("Email:    ", &form.email, form.focus == SignupFocus::Email),
        field_line(
            "Password: ",
            &mask(&form.password),
            form.focus == SignupFocus::Password,
        ),
        field_line("Username: ", &form.username, form.focus == SignupFocus::Username),
        Line::from(""),
        button_line(form.submit_label(), form.focus == SignupFocus::Submit),
        Line::from(""),
        link_line(
            locale.text(Message::HaveAccountPrompt),
            locale.text(Message::LoginButton),
            form.focus == SignupFocus::LoginLink,
        ),
    ];
    push_error(&mut lines, form.error());

    render_form_box(frame, area, Route::Signup.title(), lines);
}

fn render_profile(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(app.profile.greeting(), styles::title_style())),
        Line::from(""),
        button_line(app.profile.logout_label(), true),
        Line::from(""),
        Line::from(Span::styled("[Enter] / [o]", styles::muted_style())),
    ];

    render_form_box(frame, area, Route::Profile.title(), lines);
}

fn render_form_box(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let area = centered_rect_fixed(FORM_WIDTH, lines.len() as u16 + 3, area);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), styles::title_style()))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn field_line(label: &'static str, value: &str, focused: bool) -> Line<'static> {
    // Show the tail of long values so the cursor stays in view
    let count = value.chars().count();
    let visible: String = value.chars().skip(count.saturating_sub(FIELD_WIDTH - 1)).collect();
    let cursor = if focused { "▌" } else { " " };
    let display = format!("{:<width$}", format!("{}{}", visible, cursor), width = FIELD_WIDTH);

    Line::from(vec![
        Span::styled(label, styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(display, styles::field_style(focused)),
        Span::styled("]", styles::muted_style()),
    ])
}

fn button_line(label: &str, focused: bool) -> Line<'static> {
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Line::from(vec![
        Span::raw("["),
        Span::styled(text, styles::field_style(focused)),
        Span::raw("]"),
    ])
}

fn link_line(prompt: &'static str, target: &'static str, focused: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{} ", prompt), styles::muted_style()),
        Span::styled(target, styles::link_style(focused)),
    ])
}

fn push_error(lines: &mut Vec<Line<'static>>, error: Option<&str>) {
    if let Some(error) = error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.to_string(), styles::error_style())));
    }
}

fn key_hint(key: &'static str, label: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("[{}] ", key), styles::help_key_style()),
        Span::styled(label, styles::help_desc_style()),
    ])
}

fn mask(password: &str) -> String {
    "*".repeat(password.chars().count())
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.visible_route() {
        Route::Login | Route::Signup => "[Tab] next | [Enter] select | [Esc] back",
        Route::Home | Route::Profile => "[?] help | [q]uit",
    };

    let left_text = format!(" {} ", app.server);
    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  Travello", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("h         ", "Home"),
        help_line("l / s     ", "Login / Sign up"),
        help_line("p         ", "Profile"),
        help_line("o         ", "Log out"),
        Line::from(""),
        Line::from(Span::styled(" Forms", styles::highlight_style())),
        help_line("Tab / ↓   ", "Next field"),
        help_line("S-Tab / ↑ ", "Previous field"),
        help_line("Enter     ", "Next field / submit / follow link"),
        help_line("Esc       ", "Back to home"),
        Line::from(""),
        help_line("q         ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let area = centered_rect_fixed(FORM_WIDTH, help_text.len() as u16 + 2, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
