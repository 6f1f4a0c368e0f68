use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use matchday_terminal::api::{ApiClient, ApiConfig};
use matchday_terminal::field::{self, FieldSlot};
use matchday_terminal::form::{self, FieldKind, Form, FormKind, FormModal};
use matchday_terminal::live::{self, LiveHandle};
use matchday_terminal::manager::{self, BackendCommand};
use matchday_terminal::model::{
    Match, StatPair, TimelineEventKind, short_date, stat_split, status_line, years_and_days,
};
use matchday_terminal::state::{
    AdminTab, AppState, Delta, EditView, LiveView, Notice, NoticeLevel, Screen, apply_delta,
};

struct App {
    state: AppState,
    should_quit: bool,
    backend_tx: mpsc::Sender<BackendCommand>,
    delta_tx: mpsc::Sender<Delta>,
    ws_url: String,
    live_handle: Option<LiveHandle>,
    return_screen: Screen,
}

impl App {
    fn new(
        backend_tx: mpsc::Sender<BackendCommand>,
        delta_tx: mpsc::Sender<Delta>,
        ws_url: String,
    ) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            backend_tx,
            delta_tx,
            ws_url,
            live_handle: None,
            return_screen: Screen::Browse,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.modal.is_some() {
            self.on_modal_key(key);
            return;
        }
        if self.state.screen == Screen::Edit {
            self.on_edit_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('1') => self.leave_to(Screen::Browse),
            KeyCode::Char('2') => self.leave_to(Screen::Admin),
            KeyCode::Char('r') => self.refresh_current(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Tab if self.state.screen == Screen::Admin => {
                self.state.admin_tab = self.state.admin_tab.next();
            }
            KeyCode::Enter => match self.state.screen {
                Screen::Browse => {
                    if let Some(id) = self.state.selected_browse_match().map(|m| m.id) {
                        self.open_live(id);
                    }
                }
                Screen::Admin if self.state.admin_tab == AdminTab::Matches => {
                    if let Some(id) = self.state.selected_admin_match().map(|m| m.id) {
                        self.open_live(id);
                    }
                }
                _ => {}
            },
            KeyCode::Char('n') if self.state.screen == Screen::Admin => {
                match self.state.admin_tab {
                    AdminTab::Teams => self.open_modal(FormKind::AddTeam),
                    AdminTab::Matches => self.open_modal(FormKind::AddMatch),
                    AdminTab::Players => self.open_modal(FormKind::AddPlayer),
                }
            }
            KeyCode::Char('e') if self.state.screen == Screen::Admin => {
                match self.state.admin_tab {
                    AdminTab::Matches => {
                        if let Some(id) = self.state.selected_admin_match().map(|m| m.id) {
                            self.open_edit(id);
                        }
                    }
                    AdminTab::Players => {
                        if let Some(id) = self.state.selected_player().map(|p| p.id) {
                            self.open_modal(FormKind::EditPlayer(id));
                        }
                    }
                    AdminTab::Teams => {}
                }
            }
            KeyCode::Char('d') if self.state.screen == Screen::Admin => {
                match self.state.admin_tab {
                    AdminTab::Teams => {
                        if let Some(id) = self.state.selected_team().map(|t| t.id) {
                            let _ = self.backend_tx.send(BackendCommand::DeleteTeam(id));
                        }
                    }
                    AdminTab::Players => {
                        if let Some(id) = self.state.selected_player().map(|p| p.id) {
                            let _ = self.backend_tx.send(BackendCommand::DeletePlayer(id));
                        }
                    }
                    AdminTab::Matches => {}
                }
            }
            KeyCode::Char('b') | KeyCode::Esc if self.state.screen == Screen::Live => {
                self.close_live();
                self.state.screen = self.return_screen;
            }
            _ => {}
        }
    }

    fn on_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.modal = None,
            KeyCode::Enter => self.submit_modal(),
            KeyCode::Tab | KeyCode::Down => {
                if let Some(modal) = &mut self.state.modal {
                    modal.form.focus_next();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(modal) = &mut self.state.modal {
                    modal.form.focus_prev();
                }
            }
            KeyCode::Left | KeyCode::Right => {
                if let Some(modal) = &mut self.state.modal
                    && let Some(field) = modal.form.focused_mut()
                {
                    field.cycle(key.code == KeyCode::Right);
                }
            }
            KeyCode::Backspace => {
                if let Some(modal) = &mut self.state.modal
                    && let Some(field) = modal.form.focused_mut()
                {
                    field.backspace();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(modal) = &mut self.state.modal
                    && let Some(field) = modal.form.focused_mut()
                {
                    field.input_char(ch);
                }
            }
            _ => {}
        }
    }

    fn on_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.edit = None;
                self.state.screen = self.return_screen;
            }
            KeyCode::Enter => self.submit_edit(),
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = self.edit_form_mut() {
                    form.focus_next();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = self.edit_form_mut() {
                    form.focus_prev();
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                if let Some(field) = self.edit_form_mut().and_then(|f| f.focused_mut()) {
                    field.cycle(forward);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.edit_form_mut().and_then(|f| f.focused_mut()) {
                    field.backspace();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(field) = self.edit_form_mut().and_then(|f| f.focused_mut()) {
                    field.input_char(ch);
                }
            }
            _ => {}
        }
    }

    fn edit_form_mut(&mut self) -> Option<&mut Form> {
        self.state.edit.as_mut().and_then(|edit| edit.form.as_mut())
    }

    // Leaving the live view counts as page exit: unsubscribe and close the
    // channel before switching screens.
    fn leave_to(&mut self, screen: Screen) {
        if self.state.screen == Screen::Live {
            self.close_live();
        }
        self.state.screen = screen;
    }

    fn open_live(&mut self, id: i64) {
        self.close_live();
        self.return_screen = self.state.screen;
        self.state.live = Some(LiveView::new(id));
        self.state.screen = Screen::Live;
        let _ = self.backend_tx.send(BackendCommand::LoadLiveMatch(id));
        self.live_handle = Some(live::spawn_channel(
            self.delta_tx.clone(),
            id,
            self.ws_url.clone(),
        ));
    }

    fn close_live(&mut self) {
        if let Some(handle) = self.live_handle.take() {
            handle.shutdown();
        }
        self.state.live = None;
    }

    fn open_edit(&mut self, id: i64) {
        self.return_screen = self.state.screen;
        self.state.edit = Some(EditView::new(id));
        self.state.screen = Screen::Edit;
        let _ = self.backend_tx.send(BackendCommand::LoadEditMatch(id));
    }

    fn submit_edit(&mut self) {
        let Some(edit) = &self.state.edit else {
            return;
        };
        let Some(form) = &edit.form else {
            return;
        };
        match form::validate_edit(form) {
            Ok(()) => {
                let payload = form::match_update_payload(form);
                let _ = self.backend_tx.send(BackendCommand::SubmitMatchEdit {
                    id: edit.match_id,
                    payload,
                });
            }
            Err(msg) => self.state.push_notice(NoticeLevel::Error, msg),
        }
    }

    fn open_modal(&mut self, kind: FormKind) {
        let form = match kind {
            FormKind::AddTeam => form::team_form(),
            FormKind::AddMatch => form::match_form(&self.state.teams),
            FormKind::AddPlayer => form::player_form(&self.state.teams, None),
            FormKind::EditPlayer(id) => {
                let existing = self.state.players.iter().find(|p| p.id == id).cloned();
                form::player_form(&self.state.teams, existing.as_ref())
            }
        };
        self.state.modal = Some(FormModal { kind, form });
    }

    fn submit_modal(&mut self) {
        let Some(modal) = self.state.modal.take() else {
            return;
        };
        let cmd = match modal.kind {
            FormKind::AddTeam => BackendCommand::CreateTeam(form::team_payload(&modal.form)),
            FormKind::AddMatch => BackendCommand::CreateMatch(form::match_payload(&modal.form)),
            FormKind::AddPlayer => {
                BackendCommand::CreatePlayer(form::player_payload(&modal.form))
            }
            FormKind::EditPlayer(id) => BackendCommand::UpdatePlayer {
                id,
                payload: form::player_payload(&modal.form),
            },
        };
        let _ = self.backend_tx.send(cmd);
    }

    fn refresh_current(&mut self) {
        let cmd = match self.state.screen {
            Screen::Browse => BackendCommand::RefreshBrowse,
            Screen::Admin => match self.state.admin_tab {
                AdminTab::Teams => BackendCommand::RefreshTeams,
                AdminTab::Matches => BackendCommand::RefreshMatches,
                AdminTab::Players => BackendCommand::RefreshPlayers,
            },
            Screen::Live => match self.state.live.as_ref().map(|l| l.match_id) {
                Some(id) => BackendCommand::LoadLiveMatch(id),
                None => return,
            },
            Screen::Edit => match self.state.edit.as_ref().map(|e| e.match_id) {
                Some(id) => BackendCommand::LoadEditMatch(id),
                None => return,
            },
        };
        let _ = self.backend_tx.send(cmd);
    }
}

enum BootTarget {
    Dashboard,
    Live(i64),
    Edit(i64),
}

fn parse_args() -> Result<BootTarget, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut iter = args.iter();
    match iter.next().map(String::as_str) {
        None => Ok(BootTarget::Dashboard),
        Some("--live") => match iter.next().and_then(|raw| raw.parse::<i64>().ok()) {
            Some(id) => Ok(BootTarget::Live(id)),
            None => Err("Match ID is required".to_string()),
        },
        Some("--edit") => match iter.next().and_then(|raw| raw.parse::<i64>().ok()) {
            Some(id) => Ok(BootTarget::Edit(id)),
            None => Err("Match ID is required".to_string()),
        },
        Some(other) => Err(format!(
            "unknown argument `{other}` (usage: matchday_terminal [--live <match-id> | --edit <match-id>])"
        )),
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let boot = match parse_args() {
        Ok(boot) => boot,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(2);
        }
    };

    let config = ApiConfig::from_env();

    let (delta_tx, delta_rx) = mpsc::channel();
    let (backend_tx, backend_rx) = mpsc::channel();
    manager::spawn_backend(
        delta_tx.clone(),
        backend_rx,
        ApiClient::new(config.base_url.clone()),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(backend_tx, delta_tx, config.ws_url.clone());
    let _ = app.backend_tx.send(BackendCommand::RefreshAll);
    match boot {
        BootTarget::Dashboard => {}
        BootTarget::Live(id) => app.open_live(id),
        BootTarget::Edit(id) => app.open_edit(id),
    }

    let res = run_app(&mut terminal, &mut app, delta_rx);

    app.close_live();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Browse => render_browse(frame, chunks[1], &app.state),
        Screen::Admin => render_admin(frame, chunks[1], &app.state),
        Screen::Live => render_live(frame, chunks[1], &app.state),
        Screen::Edit => render_edit(frame, chunks[1], &app.state),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if let Some(modal) = &app.state.modal {
        render_form_modal(frame, frame.size(), modal);
    }

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    match state.screen {
        Screen::Browse => "MATCHDAY | Matches".to_string(),
        Screen::Admin => format!("MATCHDAY | Admin · {}", state.admin_tab.label()),
        Screen::Live => {
            let phase = state
                .live
                .as_ref()
                .map(|l| l.phase.label())
                .unwrap_or("offline");
            format!("MATCHDAY | Match Detail [{phase}]")
        }
        Screen::Edit => {
            let title = state
                .edit
                .as_ref()
                .filter(|e| !e.title.is_empty())
                .map(|e| e.title.clone())
                .unwrap_or_else(|| "Loading...".to_string());
            format!("MATCHDAY | Update Match · {title}")
        }
    }
}

fn footer_text(state: &AppState) -> String {
    let hints = match state.screen {
        Screen::Browse => "1 Matches | 2 Admin | j/k Move | Enter View | r Refresh | ? Help | q Quit",
        Screen::Admin => {
            "1 Matches | 2 Admin | Tab Section | j/k Move | n New | e Edit | d Delete | Enter View | r Refresh | q Quit"
        }
        Screen::Live => "b/Esc Back | r Reload | ? Help | q Quit",
        Screen::Edit => "Tab/↑/↓ Field | ←/→ Option | Enter Save | Esc Back",
    };
    match state.last_notice() {
        Some(notice) => format!("{hints}  ·  {}", notice_text(notice)),
        None => hints.to_string(),
    }
}

fn notice_text(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "[INFO]",
        NoticeLevel::Success => "[OK]",
        NoticeLevel::Error => "[ERROR]",
    };
    format!("{tag} {}", notice.message)
}

fn notice_style(level: NoticeLevel) -> Style {
    match level {
        NoticeLevel::Info => Style::default().fg(Color::DarkGray),
        NoticeLevel::Success => Style::default().fg(Color::Green),
        NoticeLevel::Error => Style::default().fg(Color::Red),
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

const CARD_HEIGHT: u16 = 6;
const CARD_COLUMNS: usize = 3;

fn render_browse(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.browse.is_empty() {
        let empty =
            Paragraph::new("No matches yet").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let rows_visible = (area.height / CARD_HEIGHT).max(1) as usize;
    let cards_visible = rows_visible * CARD_COLUMNS;
    let selected_row = state.browse_selected / CARD_COLUMNS;
    let total_rows = state.browse.len().div_ceil(CARD_COLUMNS);
    let (first_row, _) = visible_range(selected_row, total_rows, rows_visible);
    let first_card = first_row * CARD_COLUMNS;

    for (slot, idx) in (first_card..(first_card + cards_visible).min(state.browse.len())).enumerate()
    {
        let m = &state.browse[idx];
        let row = (slot / CARD_COLUMNS) as u16;
        let col = (slot % CARD_COLUMNS) as u16;
        let width = area.width / CARD_COLUMNS as u16;
        let card_area = Rect {
            x: area.x + col * width,
            y: area.y + row * CARD_HEIGHT,
            width: width.min(area.width.saturating_sub(col * width)),
            height: CARD_HEIGHT.min(area.height.saturating_sub(row * CARD_HEIGHT)),
        };
        if card_area.width < 8 || card_area.height < 4 {
            continue;
        }
        render_match_card(frame, card_area, m, idx == state.browse_selected);
    }
}

fn render_match_card(frame: &mut Frame, area: Rect, m: &Match, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let date = m
        .created_at
        .as_deref()
        .map(short_date)
        .unwrap_or_else(|| "-".to_string());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(date);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let title = format!("{} vs {}", m.team1_name(), m.team2_name());
    let score = format!("{} - {}", m.score_team1, m.score_team2);
    let meta = format!("{} | {}", m.tournament_label(), m.status);
    let body = Paragraph::new(format!("{title}\n{score}\n{meta}"))
        .alignment(Alignment::Center);
    frame.render_widget(body, inner);
}

fn render_admin(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(area);

    let tabs = [AdminTab::Teams, AdminTab::Matches, AdminTab::Players]
        .iter()
        .map(|tab| {
            if *tab == state.admin_tab {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    frame.render_widget(
        Paragraph::new(tabs).style(Style::default().add_modifier(Modifier::BOLD)),
        chunks[0],
    );

    match state.admin_tab {
        AdminTab::Teams => render_teams_table(frame, chunks[1], state),
        AdminTab::Matches => render_matches_table(frame, chunks[1], state),
        AdminTab::Players => render_players_table(frame, chunks[1], state),
    }

    render_console(frame, chunks[2], state);
}

fn render_table_row(frame: &mut Frame, area: Rect, widths: &[Constraint], cells: &[&str], style: Style) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    for (col, text) in cols.iter().zip(cells) {
        frame.render_widget(Paragraph::new(*text).style(style), *col);
    }
}

fn table_rows(area: Rect, selected: usize, total: usize) -> Option<(Rect, std::ops::Range<usize>)> {
    if area.height < 2 {
        return None;
    }
    let body = Rect {
        x: area.x,
        y: area.y + 1,
        width: area.width,
        height: area.height - 1,
    };
    let (start, end) = visible_range(selected, total, body.height as usize);
    Some((body, start..end))
}

fn render_teams_table(frame: &mut Frame, area: Rect, state: &AppState) {
    let widths = [
        Constraint::Length(6),
        Constraint::Min(18),
        Constraint::Length(18),
        Constraint::Length(8),
    ];
    let header_area = Rect { height: 1, ..area };
    let header_style = Style::default().add_modifier(Modifier::BOLD);
    render_table_row(frame, header_area, &widths, &["ID", "Name", "City", "Players"], header_style);

    let Some((body, range)) = table_rows(area, state.team_selected, state.teams.len()) else {
        return;
    };
    for (row, idx) in range.enumerate() {
        let team = &state.teams[idx];
        let row_area = Rect {
            x: body.x,
            y: body.y + row as u16,
            width: body.width,
            height: 1,
        };
        let style = row_style(idx == state.team_selected);
        let id = team.id.to_string();
        let count = team.player_count().to_string();
        let city = team.city.as_deref().unwrap_or("-");
        render_table_row(frame, row_area, &widths, &[&id, &team.name, city, &count], style);
    }
}

fn render_matches_table(frame: &mut Frame, area: Rect, state: &AppState) {
    let widths = [
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Min(16),
        Constraint::Length(8),
        Constraint::Length(14),
        Constraint::Length(14),
    ];
    let header_area = Rect { height: 1, ..area };
    let header_style = Style::default().add_modifier(Modifier::BOLD);
    render_table_row(
        frame,
        header_area,
        &widths,
        &["ID", "Team 1", "Team 2", "Score", "Created", "Status"],
        header_style,
    );

    let Some((body, range)) = table_rows(area, state.match_selected, state.matches.len()) else {
        return;
    };
    for (row, idx) in range.enumerate() {
        let m = &state.matches[idx];
        let row_area = Rect {
            x: body.x,
            y: body.y + row as u16,
            width: body.width,
            height: 1,
        };
        let style = row_style(idx == state.match_selected);
        let id = m.id.to_string();
        let score = format!("{}-{}", m.score_team1, m.score_team2);
        let created = m
            .created_at
            .as_deref()
            .map(short_date)
            .unwrap_or_else(|| "-".to_string());
        render_table_row(
            frame,
            row_area,
            &widths,
            &[&id, m.team1_name(), m.team2_name(), &score, &created, &m.status],
            style,
        );
    }
}

fn render_players_table(frame: &mut Frame, area: Rect, state: &AppState) {
    let widths = [
        Constraint::Min(18),
        Constraint::Length(20),
        Constraint::Length(22),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(8),
    ];
    let header_area = Rect { height: 1, ..area };
    let header_style = Style::default().add_modifier(Modifier::BOLD);
    render_table_row(
        frame,
        header_area,
        &widths,
        &["Name", "Age", "Position", "Team", "Apps", "Goals", "Assists"],
        header_style,
    );

    let Some((body, range)) = table_rows(area, state.player_selected, state.players.len()) else {
        return;
    };
    let today = Local::now().date_naive();
    for (row, idx) in range.enumerate() {
        let player = &state.players[idx];
        let row_area = Rect {
            x: body.x,
            y: body.y + row as u16,
            width: body.width,
            height: 1,
        };
        let style = row_style(idx == state.player_selected);
        let age = player
            .birth
            .as_deref()
            .and_then(|birth| years_and_days(birth, today))
            .unwrap_or_else(|| "-".to_string());
        let apps = player.appearances.to_string();
        let goals = player.goals.to_string();
        let assists = player.assists.to_string();
        render_table_row(
            frame,
            row_area,
            &widths,
            &[
                &player.name,
                &age,
                player.position.wire_name(),
                player.team_name(),
                &apps,
                &goals,
                &assists,
            ],
            style,
        );
    }
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    }
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Console").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.notices.is_empty() {
        frame.render_widget(
            Paragraph::new("No messages yet").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let take = inner.height as usize;
    let lines: Vec<Line> = state
        .notices
        .iter()
        .rev()
        .take(take)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(|notice| Line::styled(notice_text(notice), notice_style(notice.level)))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_live(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(live) = &state.live else {
        frame.render_widget(Paragraph::new("No match selected"), area);
        return;
    };
    let Some(snapshot) = &live.snapshot else {
        frame.render_widget(Paragraph::new("Loading match..."), area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(7),
        ])
        .split(area);

    render_scoreboard(frame, rows[0], live.phase.label(), snapshot);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    render_pitch(frame, middle[0], snapshot);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(4)])
        .split(middle[1]);
    render_stats(frame, right[0], snapshot);
    render_lineups(frame, right[1], snapshot);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);
    render_timeline(frame, bottom[0], state);
    render_console(frame, bottom[1], state);
}

fn render_scoreboard(frame: &mut Frame, area: Rect, phase: &str, m: &Match) {
    let now = Local::now().naive_local();
    let city = m
        .team1
        .as_ref()
        .and_then(|t| t.city.as_deref())
        .unwrap_or("-");
    let text = format!(
        "{}  {} - {}  {}\n{}  ·  channel: {phase}\nVenue: {city}",
        m.team1_name(),
        m.score_team1,
        m.score_team2,
        m.team2_name(),
        status_line(m, now),
    );
    let board = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(board, area);
}

fn render_pitch(frame: &mut Frame, area: Rect, m: &Match) {
    let block = Block::default().title("Pitch").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width < 8 || inner.height < 6 {
        return;
    }

    let home: Vec<FieldSlot> = m
        .team1
        .as_ref()
        .map(|t| field::layout_team(&t.players, true))
        .unwrap_or_default();
    let away: Vec<FieldSlot> = m
        .team2
        .as_ref()
        .map(|t| field::layout_team(&t.players, false))
        .unwrap_or_default();

    let half_line = Rect {
        x: inner.x,
        y: inner.y + inner.height / 2,
        width: inner.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new("-".repeat(inner.width as usize))
            .style(Style::default().fg(Color::DarkGray)),
        half_line,
    );

    for (slots, style) in [
        (&home, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        (&away, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
    ] {
        for slot in slots.iter() {
            let x = inner.x + (slot.x_pct / 100.0 * f64::from(inner.width - 2)) as u16;
            let y = inner.y + (slot.y_pct / 100.0 * f64::from(inner.height - 1)) as u16;
            let label = slot
                .number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string());
            let cell = Rect {
                x: x.min(inner.x + inner.width - 2),
                y: y.min(inner.y + inner.height - 1),
                width: 2,
                height: 1,
            };
            frame.render_widget(Paragraph::new(label).style(style), cell);
        }
    }
}

fn stat_bar(pair: &StatPair, width: usize) -> String {
    let (left, _) = stat_split(pair.team1, pair.team2);
    let filled = ((left / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_stats(frame: &mut Frame, area: Rect, m: &Match) {
    let block = Block::default().title("Stats").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(stats) = &m.stats else {
        frame.render_widget(
            Paragraph::new("No stats yet").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    let bar_width = (inner.width as usize).saturating_sub(28).clamp(6, 24);
    let lines: Vec<Line> = stats
        .rows()
        .iter()
        .map(|pair| {
            let (v1, v2) = if pair.percent {
                (format!("{}%", pair.team1), format!("{}%", pair.team2))
            } else {
                (pair.team1.to_string(), pair.team2.to_string())
            };
            Line::from(format!(
                "{:<16}{:>4} {} {:<4}",
                pair.label,
                v1,
                stat_bar(pair, bar_width),
                v2
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_lineups(frame: &mut Frame, area: Rect, m: &Match) {
    let block = Block::default().title("Lineups").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    render_lineup_side(frame, cols[0], m.team1.as_ref().map(|t| (t.name.as_str(), &t.players)));
    render_lineup_side(frame, cols[1], m.team2.as_ref().map(|t| (t.name.as_str(), &t.players)));
}

fn render_lineup_side(
    frame: &mut Frame,
    area: Rect,
    side: Option<(&str, &Vec<matchday_terminal::model::Player>)>,
) {
    let text = match side {
        Some((name, players)) => {
            let mut lines = vec![name.to_string()];
            for player in players.iter() {
                let number = player
                    .number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "--".to_string());
                lines.push(format!("{number} {} {}", player.name, player.position.wire_name()));
            }
            lines.push("Subs:".to_string());
            for sub in field::placeholder_bench() {
                lines.push(format!("-- {} {}", sub.name, sub.role));
            }
            lines.join("\n")
        }
        None => "No lineup".to_string(),
    };
    frame.render_widget(Paragraph::new(text), area);
}

fn timeline_style(kind: TimelineEventKind) -> Style {
    match kind {
        TimelineEventKind::Goal => Style::default().fg(Color::Green),
        TimelineEventKind::YellowCard => Style::default().fg(Color::Yellow),
        TimelineEventKind::RedCard => Style::default().fg(Color::Red),
        TimelineEventKind::Substitution => Style::default().fg(Color::Cyan),
        TimelineEventKind::Other => Style::default().fg(Color::Blue),
    }
}

fn render_timeline(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Timeline").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(live) = &state.live else {
        return;
    };
    if live.timeline.is_empty() {
        frame.render_widget(
            Paragraph::new("No events yet").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = live
        .timeline
        .iter()
        .take(inner.height as usize)
        .map(|entry| {
            Line::styled(
                format!("{:<5}{}", entry.kind.label(), entry.text()),
                timeline_style(entry.kind),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_edit(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(edit) = &state.edit else {
        frame.render_widget(Paragraph::new("No match selected"), area);
        return;
    };
    let Some(form) = &edit.form else {
        frame.render_widget(Paragraph::new("Loading match..."), area);
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    // Match-level fields on the left, the sixteen stat counters on the right.
    render_field_list(frame, cols[0], form, 0..7, "Match");
    render_field_list(frame, cols[1], form, 7..form.fields.len(), "Statistics");
}

fn render_field_list(
    frame: &mut Frame,
    area: Rect,
    form: &Form,
    range: std::ops::Range<usize>,
    title: &str,
) {
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = range
        .filter_map(|idx| form.fields.get(idx).map(|field| (idx, field)))
        .take(inner.height as usize)
        .map(|(idx, field)| {
            let focused = idx == form.focus;
            let marker = if focused { ">" } else { " " };
            let cursor = if focused && field.kind != FieldKind::Select {
                "_"
            } else {
                ""
            };
            let text = format!("{marker} {:<16} {}{cursor}", field.label, field.display());
            if focused {
                Line::styled(
                    text,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )
            } else {
                Line::from(text)
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_form_modal(frame: &mut Frame, area: Rect, modal: &FormModal) {
    let height = (modal.form.fields.len() as u16 + 4).min(area.height);
    let popup = centered_rect(50, area, height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(modal.form.title.clone())
        .borders(Borders::ALL);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines: Vec<Line> = modal
        .form
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let focused = idx == modal.form.focus;
            let marker = if focused { ">" } else { " " };
            let cursor = if focused && field.kind != FieldKind::Select {
                "_"
            } else {
                ""
            };
            let text = format!("{marker} {:<10} {}{cursor}", field.label, field.display());
            if focused {
                Line::styled(
                    text,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )
            } else {
                Line::from(text)
            }
        })
        .collect();
    lines.push(Line::styled(
        "Enter Save · Esc Cancel",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, area, (area.height * 3 / 5).max(16));
    frame.render_widget(Clear, popup_area);

    let text = [
        "Matchday Terminal - Help",
        "",
        "Global:",
        "  1            Public matches",
        "  2            Admin",
        "  r            Refresh",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Admin:",
        "  Tab          Cycle Teams/Matches/Players",
        "  j/k or ↑/↓   Move",
        "  n            New entry",
        "  e            Edit (match form / player)",
        "  d            Delete",
        "  Enter        Open live view",
        "",
        "Live:",
        "  b / Esc      Back",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let vertical_margin = (area.height - height) / 2;
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    Rect {
        x: horizontal[1].x,
        y: area.y + vertical_margin,
        width: horizontal[1].width,
        height,
    }
}
