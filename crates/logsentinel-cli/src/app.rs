use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use logsentinel_core::analysis::AnalysisReply;
use logsentinel_core::constants::messages;
use logsentinel_core::context::read_log_file;
use logsentinel_core::{
    ChatRole, LogFile, RepoContext, RepoField, ReplyStatus, SentinelError, Session, Settings,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::commands::{self, CommandResult};
use crate::render::ChatRenderer;
use crate::theme::Theme;

/// Files and repository context supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub files: Vec<PathBuf>,
    pub repo: RepoContext,
    pub snippet_file: Option<PathBuf>,
}

impl LaunchOptions {
    /// Attach the files and install the repository context. Unreadable
    /// attachments become notices; an unreadable snippet file is an error.
    async fn apply(&self, session: &mut Session) -> Result<()> {
        for path in &self.files {
            let _ = session.attach_path(path).await;
        }

        let mut repo = self.repo.clone();
        if let Some(ref path) = self.snippet_file {
            let snippet = read_log_file(path)
                .await
                .with_context(|| format!("loading snippet from {}", path.display()))?;
            repo = repo.with_field(RepoField::Snippet, snippet.content());
        }
        session.replace_repo_context(repo);
        Ok(())
    }
}

// ── Single-prompt mode ──────────────────────────────────────────────────

pub async fn run_single_prompt(
    settings: &Settings,
    prompt: &str,
    launch: &LaunchOptions,
) -> Result<()> {
    let client = settings.build_analysis_client()?;
    let mut session = Session::new(client);
    launch.apply(&mut session).await?;

    for notice in session
        .conversation()
        .messages()
        .iter()
        .filter(|m| m.role == ChatRole::System)
    {
        eprintln!("{}", notice.text);
    }

    let job = session.begin(prompt)?;
    eprintln!("{}", messages::THINKING);
    let reply = job.run().await;
    if let Some(diagnosis) = reply.diagnosis() {
        tracing::info!(%diagnosis, "analysis complete");
    }
    let answer = session.finish(reply);
    println!("{}", answer.text);
    Ok(())
}

// ── Interactive TUI ─────────────────────────────────────────────────────

/// Results delivered back to the UI loop by spawned tasks.
enum AppEvent {
    AnalysisComplete(AnalysisReply),
    FileRead(std::result::Result<LogFile, SentinelError>),
    SnippetRead(std::result::Result<LogFile, SentinelError>),
}

struct AppState {
    // Input
    input: String,
    /// Byte offset into `input`, always on a char boundary.
    cursor_pos: usize,
    input_history: Vec<String>,
    history_pos: Option<usize>,

    // Chat
    session: Session,
    scroll_offset: usize,

    // Status
    status_text: String,

    // Display
    should_quit: bool,
    show_sidebar: bool,
    show_timestamps: bool,
    theme: Theme,
}

impl AppState {
    fn new(session: Session, theme: Theme, show_timestamps: bool) -> Self {
        Self {
            input: String::new(),
            cursor_pos: 0,
            input_history: Vec::new(),
            history_pos: None,

            session,
            scroll_offset: 0,

            status_text: "Ready".into(),

            should_quit: false,
            show_sidebar: true,
            show_timestamps,
            theme,
        }
    }

    fn is_processing(&self) -> bool {
        self.session.conversation().is_in_flight()
    }

    fn notice(&mut self, text: impl Into<String>) {
        self.session.notice(text);
        self.scroll_to_bottom();
    }

    fn scroll_to_bottom(&mut self) {
        // Will be resolved on next draw
        self.scroll_offset = usize::MAX;
    }

    fn take_input(&mut self) -> String {
        self.cursor_pos = 0;
        std::mem::take(&mut self.input)
    }

    fn push_history(&mut self, input: String) {
        if !input.trim().is_empty() && self.input_history.last() != Some(&input) {
            self.input_history.push(input);
        }
        self.history_pos = None;
    }

    fn history_prev(&mut self) {
        if self.input_history.is_empty() {
            return;
        }
        let pos = match self.history_pos {
            None => self.input_history.len().saturating_sub(1),
            Some(0) => 0,
            Some(p) => p - 1,
        };
        self.history_pos = Some(pos);
        self.input = self.input_history[pos].clone();
        self.cursor_pos = self.input.len();
    }

    fn history_next(&mut self) {
        if let Some(pos) = self.history_pos {
            if pos + 1 >= self.input_history.len() {
                self.history_pos = None;
                self.input.clear();
                self.cursor_pos = 0;
            } else {
                self.history_pos = Some(pos + 1);
                self.input = self.input_history[pos + 1].clone();
                self.cursor_pos = self.input.len();
            }
        }
    }

    fn insert_str(&mut self, text: &str) {
        self.input.insert_str(self.cursor_pos, text);
        self.cursor_pos += text.len();
    }
}

pub async fn run_tui(settings: Settings, theme_name: &str, launch: LaunchOptions) -> Result<()> {
    let (client, key_error) = match settings.build_analysis_client() {
        Ok(client) => (client, None),
        Err(e) => (
            settings.analysis_client(settings.build_llm_client_with_key("")?),
            Some(e),
        ),
    };

    let mut session = Session::new(client);
    if let Some(e) = key_error {
        session.notice(format!("{e}\nRequests will fail until the key is set."));
    }
    launch.apply(&mut session).await?;
    tracing::info!(session = %session.id(), model = %session.client().model(), "starting TUI");

    let mut state = AppState::new(
        session,
        Theme::by_name(theme_name),
        settings.ui.show_timestamps,
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut state).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    loop {
        // Draw
        terminal.draw(|f| draw_ui(f, state))?;

        // Results from spawned tasks (non-blocking)
        while let Ok(app_event) = event_rx.try_recv() {
            handle_app_event(state, app_event);
        }

        // Handle keyboard input with timeout
        if event::poll(Duration::from_millis(33))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(state, key, &event_tx);
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_app_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::AnalysisComplete(reply) => {
            state.status_text = match reply.status {
                ReplyStatus::Answered => "Analysis complete",
                ReplyStatus::Empty => "No text returned",
                ReplyStatus::Failed => "Analysis failed",
            }
            .into();
            state.session.finish(reply);
            state.scroll_to_bottom();
        }
        AppEvent::FileRead(Ok(file)) => {
            let summary = format!(
                "Attached {} ({}, {} chars)",
                file.name(),
                file.kind(),
                file.char_len()
            );
            state.session.attach(file);
            state.status_text = summary.clone();
            state.notice(summary);
        }
        AppEvent::SnippetRead(Ok(file)) => {
            let repo = state
                .session
                .repo_context()
                .with_field(RepoField::Snippet, file.content());
            state.session.replace_repo_context(repo);
            state.notice(format!("Loaded code snippet from {}", file.name()));
        }
        AppEvent::FileRead(Err(e)) | AppEvent::SnippetRead(Err(e)) => {
            state.status_text = "File read failed".into();
            state.session.record_file_error(&e);
            state.scroll_to_bottom();
        }
    }
}

// ── Drawing ─────────────────────────────────────────────────────────────

fn draw_ui(f: &mut ratatui::Frame, state: &mut AppState) {
    let input_lines = state.input.split('\n').count().clamp(1, 6) as u16;

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // header
            Constraint::Min(5),                  // sidebar + chat
            Constraint::Length(input_lines + 2), // input
            Constraint::Length(1),               // status
        ])
        .split(f.area());

    draw_header(f, main_chunks[0], state);

    let chat_area = if state.show_sidebar {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(40)])
            .split(main_chunks[1]);

        draw_sidebar(f, h_chunks[0], state);
        h_chunks[1]
    } else {
        main_chunks[1]
    };

    draw_chat(f, chat_area, state);
    draw_input(f, main_chunks[2], state);
    draw_status_bar(f, main_chunks[3], state);
}

fn draw_header(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let (label, color) = if state.is_processing() {
        ("● ANALYZING LOGS...", theme.warning)
    } else {
        ("● SYSTEM READY", theme.success)
    };
    let header = Line::from(vec![
        Span::styled(
            " LogSentinel ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", state.session.client().model()),
            Style::default().fg(theme.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn draw_sidebar(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let heading = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" ATTACHED FILES", heading)));
    if state.session.files().is_empty() {
        lines.push(Line::from(Span::styled(
            "   none. /attach <path>",
            Style::default().fg(theme.muted),
        )));
    }
    for (i, file) in state.session.files().iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!(" {:>2}. ", i + 1), Style::default().fg(theme.muted)),
            Span::styled(file.name().to_string(), Style::default().fg(theme.fg)),
            Span::styled(
                format!(" {}", file.kind()),
                Style::default().fg(theme.muted),
            ),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(" REPO LINK", heading)));
    let repo = state.session.repo_context();
    if repo.has_access {
        lines.push(Line::from(Span::styled(
            "   ● Active",
            Style::default().fg(theme.success),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "   ○ Disconnected",
            Style::default().fg(theme.muted),
        )));
    }
    let field_style = Style::default().fg(if repo.has_access { theme.fg } else { theme.muted });
    for (label, value) in [
        ("url", repo.repo_url.as_str()),
        ("branch", repo.branch.as_str()),
        ("build", repo.build_version.as_str()),
    ] {
        if !value.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("   {label}: {value}"),
                field_style,
            )));
        }
    }
    if let Some(snippet) = repo.snippet() {
        lines.push(Line::from(Span::styled(
            format!("   snippet: {} lines", snippet.lines().count()),
            field_style,
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Context ")
        .border_style(Style::default().fg(theme.border));

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_chat(f: &mut ratatui::Frame, area: Rect, state: &mut AppState) {
    let chat_lines = ChatRenderer::new(&state.theme)
        .with_timestamps(state.show_timestamps)
        .conversation_lines(
            state.session.conversation().messages(),
            state.is_processing(),
        );

    // Inside the borders
    let inner_width = area.width.saturating_sub(2);
    let visible_height = area.height.saturating_sub(2) as usize;

    // Long paragraphs wrap, so count screen rows rather than lines
    let chat = Paragraph::new(Text::from(chat_lines)).wrap(Wrap { trim: false });
    let total_lines = chat.line_count(inner_width);
    let max_scroll = total_lines.saturating_sub(visible_height);

    // Resolve scroll_to_bottom, then clamp
    if state.scroll_offset == usize::MAX || state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }

    let theme = &state.theme;
    let chat = chat
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Diagnosis ")
                .border_style(Style::default().fg(theme.border)),
        )
        .style(Style::default().bg(theme.bg))
        .scroll((state.scroll_offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(chat, area);

    if total_lines > visible_height {
        let mut scrollbar_state = ScrollbarState::new(max_scroll).position(state.scroll_offset);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("^"))
                .end_symbol(Some("v")),
            area,
            &mut scrollbar_state,
        );
    }
}

fn draw_input(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let is_command = state.input.starts_with('/');
    // Highlight the border once Enter would do something
    let ready = is_command || state.session.can_submit(&state.input);

    let title = if state.is_processing() {
        " Input (analyzing...) "
    } else if is_command {
        " Command "
    } else {
        " Message  Enter to send, Shift+Enter for newline "
    };

    // Cursor row and column within the multi-line input
    let before = &state.input[..state.cursor_pos];
    let row = before.matches('\n').count() as u16;
    let col = before
        .rsplit('\n')
        .next()
        .map(|s| s.chars().count())
        .unwrap_or(0) as u16;
    let visible_rows = area.height.saturating_sub(2).max(1);
    let first_row = row.saturating_sub(visible_rows - 1);

    let input = Paragraph::new(state.input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(if ready {
                    theme.accent
                } else {
                    theme.border
                })),
        )
        .style(Style::default().fg(theme.fg))
        .scroll((first_row, 0));
    f.render_widget(input, area);

    let max_x = area.x + area.width.saturating_sub(2);
    let cursor_x = (area.x + col + 1).min(max_x);
    let cursor_y = area.y + 1 + row - first_row;
    f.set_cursor_position((cursor_x, cursor_y));
}

fn draw_status_bar(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let session = &state.session;

    let state_str = if state.is_processing() {
        "analyzing"
    } else {
        "idle"
    };

    let usage = session.usage();
    let tokens_str = if usage.input_tokens > 0 || usage.output_tokens > 0 {
        format!(
            "| {}in/{}out ",
            format_tokens(u64::from(usage.input_tokens)),
            format_tokens(u64::from(usage.output_tokens)),
        )
    } else {
        String::new()
    };

    let diagnosis_span = match session.last_diagnosis() {
        Some(d) => Span::styled(
            format!("| {d} "),
            Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::raw(""),
    };

    let status_spans = vec![
        Span::styled(
            format!(" {} ", session.client().model()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("| {state_str} "), Style::default().fg(theme.accent)),
        Span::styled(
            format!("| {} files ", session.files().len()),
            Style::default().fg(theme.muted),
        ),
        diagnosis_span,
        Span::styled(tokens_str, Style::default().fg(theme.muted)),
        Span::styled("| ", Style::default().fg(theme.muted)),
        Span::styled(state.status_text.clone(), Style::default().fg(theme.muted)),
    ];
    f.render_widget(Paragraph::new(Line::from(status_spans)), area);
}

// ── Input handling ──────────────────────────────────────────────────────

fn handle_key(state: &mut AppState, key: KeyEvent, event_tx: &mpsc::UnboundedSender<AppEvent>) {
    match (key.modifiers, key.code) {
        // Quit
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            state.should_quit = true;
        }

        // Toggle sidebar
        (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
            state.show_sidebar = !state.show_sidebar;
        }

        // New conversation
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => {
            handle_command_result(state, CommandResult::NewConversation, event_tx);
        }

        // Newline
        (m, KeyCode::Enter) if m.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            state.insert_str("\n");
        }

        // Submit input
        (_, KeyCode::Enter) => submit_input(state, event_tx),

        // Input editing
        (_, KeyCode::Backspace) => {
            if state.cursor_pos > 0 {
                let prev = prev_boundary(&state.input, state.cursor_pos);
                state.input.drain(prev..state.cursor_pos);
                state.cursor_pos = prev;
            }
        }
        (_, KeyCode::Delete) => {
            if state.cursor_pos < state.input.len() {
                let next = next_boundary(&state.input, state.cursor_pos);
                state.input.drain(state.cursor_pos..next);
            }
        }
        (_, KeyCode::Left) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                // Word jump left
                state.cursor_pos = word_boundary_left(&state.input, state.cursor_pos);
            } else {
                state.cursor_pos = prev_boundary(&state.input, state.cursor_pos);
            }
        }
        (_, KeyCode::Right) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                // Word jump right
                state.cursor_pos = word_boundary_right(&state.input, state.cursor_pos);
            } else {
                state.cursor_pos = next_boundary(&state.input, state.cursor_pos);
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
            state.cursor_pos = 0;
        }
        (_, KeyCode::Home) => {
            state.cursor_pos = 0;
        }
        (_, KeyCode::End) => {
            state.cursor_pos = state.input.len();
        }

        // Scroll (Shift+arrows, must come before bare arrows)
        (KeyModifiers::SHIFT, KeyCode::Up) => {
            state.scroll_offset = state.scroll_offset.saturating_sub(1);
        }
        (KeyModifiers::SHIFT, KeyCode::Down) => {
            state.scroll_offset = state.scroll_offset.saturating_add(1);
        }
        (_, KeyCode::PageUp) => {
            state.scroll_offset = state.scroll_offset.saturating_sub(20);
        }
        (_, KeyCode::PageDown) => {
            state.scroll_offset = state.scroll_offset.saturating_add(20);
        }

        // History navigation
        (_, KeyCode::Up) => state.history_prev(),
        (_, KeyCode::Down) => state.history_next(),

        // Kill line (Ctrl+U)
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            state.input.drain(..state.cursor_pos);
            state.cursor_pos = 0;
        }

        // Kill to end of line (Ctrl+K)
        (KeyModifiers::CONTROL, KeyCode::Char('k')) => {
            state.input.truncate(state.cursor_pos);
        }

        // Delete word backward (Ctrl+W)
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
            let new_pos = word_boundary_left(&state.input, state.cursor_pos);
            state.input.drain(new_pos..state.cursor_pos);
            state.cursor_pos = new_pos;
        }

        // Clipboard paste (Ctrl+V)
        (KeyModifiers::CONTROL, KeyCode::Char('v')) => {
            if let Ok(mut cb) = arboard::Clipboard::new() {
                if let Ok(text) = cb.get_text() {
                    state.insert_str(&text.replace('\r', ""));
                }
            }
        }

        // Tab completion for commands
        (_, KeyCode::Tab) => {
            if state.input.starts_with('/') {
                if let Some(completion) = commands::complete_command(&state.input) {
                    state.input = completion;
                    state.cursor_pos = state.input.len();
                }
            }
        }

        // Regular character input; unbound Ctrl chords are ignored
        (modifiers, KeyCode::Char(c)) if !modifiers.contains(KeyModifiers::CONTROL) => {
            let mut buf = [0u8; 4];
            state.insert_str(c.encode_utf8(&mut buf));
        }

        _ => {}
    }
}

fn submit_input(state: &mut AppState, event_tx: &mpsc::UnboundedSender<AppEvent>) {
    if state.input.trim_start().starts_with('/') {
        let input = state.take_input();
        state.push_history(input.clone());
        handle_command_result(state, commands::handle_command(input.trim()), event_tx);
        return;
    }

    if !state.session.can_submit(&state.input) {
        state.status_text = if state.is_processing() {
            "Still analyzing, please wait"
        } else {
            "Type a message or attach a file first"
        }
        .into();
        return;
    }

    match state.session.begin(state.input.clone()) {
        Ok(job) => {
            let input = state.take_input();
            state.push_history(input);
            state.status_text = "Analyzing...".into();
            state.scroll_to_bottom();

            let tx = event_tx.clone();
            tokio::spawn(async move {
                let reply = job.run().await;
                let _ = tx.send(AppEvent::AnalysisComplete(reply));
            });
        }
        Err(e) => {
            state.status_text = e.to_string();
        }
    }
}

fn handle_command_result(
    state: &mut AppState,
    result: CommandResult,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match result {
        CommandResult::Message(msg) => state.notice(msg),
        CommandResult::Quit => state.should_quit = true,
        CommandResult::Attach(path) => {
            state.status_text = format!("Reading {}...", path.display());
            let tx = event_tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(AppEvent::FileRead(read_log_file(path).await));
            });
        }
        CommandResult::Detach(index) => match state.session.detach(index) {
            Ok(removed) => {
                let listing = files_summary(&state.session);
                state.notice(format!("Detached {}\n{listing}", removed.name()));
            }
            Err(e) => state.notice(e.to_string()),
        },
        CommandResult::ListFiles => {
            let listing = files_summary(&state.session);
            state.notice(listing);
        }
        CommandResult::ShowRepo => {
            let summary = repo_summary(state.session.repo_context());
            state.notice(summary);
        }
        CommandResult::SetRepoAccess(on) => {
            let next = state.session.repo_context().with_access(on);
            state.session.replace_repo_context(next);
            state.notice(if on {
                "Repository access enabled. Context will be sent with each request."
            } else {
                "Repository access disabled."
            });
        }
        CommandResult::SetRepoField(field, value) => {
            let next = state.session.repo_context().with_field(field, value);
            state.session.replace_repo_context(next);
            let summary = repo_summary(state.session.repo_context());
            state.notice(summary);
        }
        CommandResult::LoadSnippet(path) => {
            state.status_text = format!("Reading {}...", path.display());
            let tx = event_tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(AppEvent::SnippetRead(read_log_file(path).await));
            });
        }
        CommandResult::ThemeChanged(name) => match Theme::find(&name) {
            Some(theme) => {
                state.theme = theme;
                state.status_text = format!("Theme: {name}");
            }
            None => {
                let themes = Theme::all_names().join(", ");
                state.notice(format!("Unknown theme: {name}. Available: {themes}"));
            }
        },
        CommandResult::NewConversation => match state.session.reset_conversation() {
            Ok(()) => {
                state.scroll_offset = 0;
                state.status_text = "New conversation".into();
            }
            Err(e) => state.notice(e.to_string()),
        },
        CommandResult::ShowStatus => {
            let status = status_summary(&state.session);
            state.notice(status);
        }
        CommandResult::NotACommand => {}
    }
}

// ── Helper functions ────────────────────────────────────────────────────

fn files_summary(session: &Session) -> String {
    if session.files().is_empty() {
        return "No files attached. Use /attach <path>.".into();
    }
    let mut out = String::from("Attached files:");
    for (i, file) in session.files().iter().enumerate() {
        out.push_str(&format!(
            "\n  {}. {} ({}, {} chars)",
            i + 1,
            file.name(),
            file.kind(),
            file.char_len()
        ));
    }
    out
}

fn repo_summary(repo: &RepoContext) -> String {
    let link = if repo.has_access { "Active" } else { "Disconnected" };
    let or_unset = |s: &str| {
        if s.is_empty() {
            "(not set)".to_string()
        } else {
            s.to_string()
        }
    };
    let snippet = match repo.snippet() {
        Some(s) => format!("{} lines", s.lines().count()),
        None => "none".into(),
    };
    format!(
        "Repository link: {link}\n  URL: {}\n  Branch: {}\n  Build: {}\n  Snippet: {snippet}",
        or_unset(&repo.repo_url),
        or_unset(&repo.branch),
        or_unset(&repo.build_version),
    )
}

fn status_summary(session: &Session) -> String {
    let usage = session.usage();
    let diagnosis = session
        .last_diagnosis()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "none yet".into());
    format!(
        "Model: {}\nSession: {}\nState: {:?}\nFiles: {}\nRepository link: {}\nLast diagnosis: {diagnosis}\nTokens: {} in / {} out",
        session.client().model(),
        session.id(),
        session.conversation().request_state(),
        session.files().len(),
        if session.repo_context().has_access { "Active" } else { "Disconnected" },
        format_tokens(u64::from(usage.input_tokens)),
        format_tokens(u64::from(usage.output_tokens)),
    )
}

fn prev_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_boundary(s: &str, pos: usize) -> usize {
    s[pos..].chars().next().map(|c| pos + c.len_utf8()).unwrap_or(pos)
}

fn word_boundary_left(s: &str, pos: usize) -> usize {
    let before = &s[..pos];
    let trimmed = before.trim_end_matches(|c: char| c.is_whitespace());
    trimmed
        .rfind(|c: char| c.is_whitespace())
        .map(|i| i + trimmed[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0)
}

fn word_boundary_right(s: &str, pos: usize) -> usize {
    let after = &s[pos..];
    let word_end = after
        .find(|c: char| c.is_whitespace())
        .unwrap_or(after.len());
    let rest = &after[word_end..];
    let gap = rest.len() - rest.trim_start_matches(|c: char| c.is_whitespace()).len();
    pos + word_end + gap
}

fn format_tokens(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
