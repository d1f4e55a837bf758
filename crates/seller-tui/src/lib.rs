// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use seller_app::{
    AppCommand, AppEvent, AppState, ConsoleView, DetailMode, DetailPanel, EMPTY_HINT, EMPTY_TITLE,
    FilterPreferences, Lead, LeadGateway, LeadId, LeadStatus, LoadState, Opportunity,
    OpportunityStage, OpportunitySummary, SaveRequest, ScoreBand, format_currency, merge_stored,
    rejection,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const EMPTY_LEADS: &str = "No leads found";
const LOADING_TEXT: &str = "Loading leads...";
const SEARCH_PLACEHOLDER: &str = "Search leads...";

/// Gateway shared between the UI thread and gateway jobs.
pub type SharedGateway = Arc<Mutex<dyn LeadGateway + Send>>;

/// A gateway call bundled with the send of its outcome.
pub type GatewayJob = Box<dyn FnOnce() + Send>;

/// Backend seam for the terminal UI. `spawn` runs jobs inline by default;
/// runtimes with real latency override it to run them on a worker thread.
pub trait AppRuntime {
    fn gateway(&self) -> SharedGateway;
    fn load_filters(&mut self) -> Result<Option<FilterPreferences>>;
    fn save_filters(&mut self, prefs: &FilterPreferences) -> Result<()>;

    fn spawn(&mut self, job: GatewayJob) -> Result<()> {
        job();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    LeadsLoaded(Result<Vec<Lead>, String>),
    LeadSaved {
        lead_id: LeadId,
        result: Result<Lead, String>,
    },
    LeadConverted {
        lead_id: LeadId,
        result: Result<Opportunity, String>,
    },
}

fn call_gateway<T>(
    gateway: &SharedGateway,
    call: impl FnOnce(&mut (dyn LeadGateway + Send)) -> Result<T>,
) -> Result<T, String> {
    let mut guard = gateway.lock().map_err(|_| {
        "lead gateway is unavailable after a worker panic; restart seller".to_owned()
    })?;
    call(&mut *guard).map_err(|error| format!("{error:#}"))
}

/// Hands a gateway call to the runtime; `wrap` turns its outcome into the
/// event posted back to the UI thread.
fn submit<R, T>(
    runtime: &mut R,
    internal_tx: &Sender<InternalEvent>,
    call: impl FnOnce(&mut (dyn LeadGateway + Send)) -> Result<T> + Send + 'static,
    wrap: impl FnOnce(Result<T, String>) -> InternalEvent + Send + 'static,
) -> Result<()>
where
    R: AppRuntime,
{
    let gateway = runtime.gateway();
    let sender = internal_tx.clone();
    runtime.spawn(Box::new(move || {
        let event = wrap(call_gateway(&gateway, call));
        let _ = sender.send(event);
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    cursor: usize,
    search_editing: bool,
    detail: Option<DetailPanel>,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    mount(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Restores stored filters before anything is drawn, then starts the load.
fn mount<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match runtime.load_filters() {
        Ok(Some(stored)) => {
            let merged = merge_stored(&state.filters, &stored);
            state.dispatch(AppCommand::ApplyPreferences(merged));
        }
        Ok(None) => {}
        Err(error) => {
            tracing::warn!(error = %format!("{error:#}"), "stored filters ignored");
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("stored filters ignored: {error:#}"),
            );
        }
    }
    start_load(state, runtime, internal_tx);
}

fn start_load<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    internal_tx: &Sender<InternalEvent>,
) {
    state.dispatch(AppCommand::BeginLoad);
    tracing::info!("loading leads");
    let submitted = submit(
        runtime,
        internal_tx,
        |gateway| gateway.load_leads(),
        InternalEvent::LeadsLoaded,
    );
    if let Err(error) = submitted {
        state.dispatch(AppCommand::FinishLoad(Err(format!("{error:#}"))));
    }
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        handle_internal_event(state, view_data, tx, event);
    }
}

fn handle_internal_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: InternalEvent,
) {
    match event {
        InternalEvent::ClearStatus { token } if token == view_data.status_token => {
            state.dispatch(AppCommand::ClearStatus);
        }
        InternalEvent::ClearStatus { .. } => {}
        InternalEvent::LeadsLoaded(result) => {
            let events = state.dispatch(AppCommand::FinishLoad(result));
            if let [AppEvent::LeadsLoaded(count)] = events.as_slice() {
                tracing::info!(count, "leads loaded");
            }
            view_data.detail = None;
            clamp_cursor(state, view_data);
        }
        InternalEvent::LeadSaved { lead_id, result } => {
            finish_save(state, view_data, tx, lead_id, result);
        }
        InternalEvent::LeadConverted { lead_id, result } => {
            finish_conversion(state, view_data, tx, lead_id, result);
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if state.load == LoadState::Loading {
        return false;
    }
    if matches!(state.load, LoadState::Failed(_)) {
        if key.code == KeyCode::Char('r') {
            start_load(state, runtime, internal_tx);
        }
        return false;
    }

    if view_data.detail.is_some() {
        handle_detail_key(state, runtime, view_data, internal_tx, key);
    } else if view_data.search_editing {
        handle_search_key(state, runtime, view_data, internal_tx, key);
    } else {
        handle_list_key(state, runtime, view_data, internal_tx, key);
    }
    false
}

fn handle_list_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('/') => view_data.search_editing = true,
        KeyCode::Char('s') => {
            let next = state.filters.status.next();
            change_filters(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::SetStatusFilter(next),
            );
        }
        KeyCode::Char('o') => {
            let next = state.filters.sort.next();
            change_filters(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::SetSort(next),
            );
        }
        KeyCode::Char('j') | KeyCode::Down => move_cursor(state, view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(state, view_data, -1),
        KeyCode::Char('g') | KeyCode::Home => view_data.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            view_data.cursor = state.visible_leads().len().saturating_sub(1);
        }
        KeyCode::Enter => open_detail(state, view_data, internal_tx),
        KeyCode::Esc if !state.filters.search.is_empty() => {
            change_filters(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::SetSearch(String::new()),
            );
        }
        _ => {}
    }
}

fn handle_search_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let mut search = state.filters.search.clone();
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            view_data.search_editing = false;
            return;
        }
        KeyCode::Backspace => {
            search.pop();
        }
        KeyCode::Char(value) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            search.push(value);
        }
        _ => return,
    }
    change_filters(
        state,
        runtime,
        view_data,
        internal_tx,
        AppCommand::SetSearch(search),
    );
}

/// Applies a filter command and writes the full preference triple whenever
/// it changed anything.
fn change_filters<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    for event in state.dispatch(command) {
        let AppEvent::FiltersChanged(prefs) = event else {
            continue;
        };
        if let Err(error) = runtime.save_filters(&prefs) {
            tracing::warn!(error = %format!("{error:#}"), "saving filter preferences failed");
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("filters not saved: {error:#}"),
            );
        }
    }
    clamp_cursor(state, view_data);
}

fn move_cursor(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let len = state.visible_leads().len();
    if len == 0 {
        view_data.cursor = 0;
        return;
    }
    let next = view_data.cursor.saturating_add_signed(delta);
    view_data.cursor = next.min(len - 1);
}

fn clamp_cursor(state: &AppState, view_data: &mut ViewData) {
    let len = state.visible_leads().len();
    view_data.cursor = view_data.cursor.min(len.saturating_sub(1));
}

fn open_detail(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(lead) = state.visible_leads().get(view_data.cursor).cloned() else {
        return;
    };
    let events = state.dispatch(AppCommand::Select(lead.id));
    if let Some(message) = rejection(&events) {
        emit_status(state, view_data, internal_tx, message.to_owned());
        return;
    }
    view_data.detail = Some(DetailPanel::new(lead));
}

fn close_detail(state: &mut AppState, view_data: &mut ViewData) {
    view_data.detail = None;
    state.dispatch(AppCommand::ClearSelection);
}

fn handle_detail_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(mode) = view_data.detail.as_ref().map(DetailPanel::mode) else {
        return;
    };
    match mode {
        DetailMode::Viewing => match key.code {
            KeyCode::Esc => close_detail(state, view_data),
            KeyCode::Char('e') => {
                if let Some(panel) = view_data.detail.as_mut() {
                    panel.begin_edit();
                }
            }
            KeyCode::Char('c') => start_convert(state, runtime, view_data, internal_tx),
            _ => {}
        },
        DetailMode::Editing => handle_edit_key(state, runtime, view_data, internal_tx, key),
        DetailMode::Saving | DetailMode::Converting => {}
    }
}

fn handle_edit_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if key.code == KeyCode::Enter {
        start_save(state, runtime, view_data, internal_tx);
        return;
    }
    let Some(panel) = view_data.detail.as_mut() else {
        return;
    };
    let edited = match key.code {
        KeyCode::Esc => {
            panel.cancel_edit();
            Ok(())
        }
        KeyCode::Tab => panel.cycle_status(),
        KeyCode::Backspace => panel.pop_email_char(),
        KeyCode::Char(value) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            panel.push_email_char(value)
        }
        _ => Ok(()),
    };
    if let Err(error) = edited {
        emit_status(state, view_data, internal_tx, format!("{error:#}"));
    }
}

fn start_save<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(panel) = view_data.detail.as_mut() else {
        return;
    };
    match panel.request_save() {
        SaveRequest::Submit(lead) => {
            let lead_id = lead.id;
            tracing::info!(%lead_id, "saving lead");
            let submitted = submit(
                runtime,
                internal_tx,
                move |gateway| gateway.update_lead(&lead),
                move |result| InternalEvent::LeadSaved { lead_id, result },
            );
            if let Err(error) = submitted {
                finish_save(
                    state,
                    view_data,
                    internal_tx,
                    lead_id,
                    Err(format!("{error:#}")),
                );
            }
        }
        SaveRequest::Invalid(message) => tracing::debug!(%message, "lead edit rejected"),
        SaveRequest::NotEditing => {}
    }
}

fn start_convert<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(lead) = view_data
        .detail
        .as_mut()
        .and_then(DetailPanel::request_convert)
    else {
        emit_status(
            state,
            view_data,
            internal_tx,
            "lead is already converted",
        );
        return;
    };
    let lead_id = lead.id;
    tracing::info!(%lead_id, "converting lead");
    let submitted = submit(
        runtime,
        internal_tx,
        move |gateway| gateway.convert_lead(&lead),
        move |result| InternalEvent::LeadConverted { lead_id, result },
    );
    if let Err(error) = submitted {
        finish_conversion(
            state,
            view_data,
            internal_tx,
            lead_id,
            Err(format!("{error:#}")),
        );
    }
}

fn finish_save(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    lead_id: LeadId,
    result: Result<Lead, String>,
) {
    let (outcome, saved) = state.complete_update(result);
    if let Some(error) = &outcome.error {
        tracing::warn!(%lead_id, %error, "lead update failed");
    }
    if let Some(panel) = view_data
        .detail
        .as_mut()
        .filter(|panel| panel.lead().id == lead_id)
    {
        panel.finish_save(&outcome, saved);
    }
    clamp_cursor(state, view_data);
    if outcome.success {
        emit_status(state, view_data, internal_tx, format!("lead {lead_id} saved"));
    }
}

fn finish_conversion(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    lead_id: LeadId,
    result: Result<Opportunity, String>,
) {
    let outcome = state.complete_conversion(result);
    let panel_open = view_data
        .detail
        .as_ref()
        .is_some_and(|panel| panel.lead().id == lead_id);

    if outcome.success {
        if panel_open {
            view_data.detail = None;
        }
        clamp_cursor(state, view_data);
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("lead {lead_id} converted to opportunity"),
        );
        return;
    }

    if let Some(error) = &outcome.error {
        tracing::warn!(%lead_id, %error, "lead conversion failed");
    }
    if let Some(panel) = view_data.detail.as_mut().filter(|_| panel_open) {
        panel.finish_convert(&outcome);
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let view = state.view();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(filter_bar_text(&view.filters, view_data.search_editing))
        .block(Block::default().title("seller").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    match &view.load {
        LoadState::Loading => {
            let loading = Paragraph::new(LOADING_TEXT)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title("leads").borders(Borders::ALL));
            frame.render_widget(loading, layout[1]);
        }
        LoadState::Failed(message) => {
            let retry = Paragraph::new(retry_text(message))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(Block::default().title("leads").borders(Borders::ALL));
            frame.render_widget(retry, layout[1]);
        }
        LoadState::Ready => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
                .split(layout[1]);
            render_leads(frame, body[0], &view, view_data.cursor);
            render_opportunities(frame, body[1], &view.summary);
        }
    }

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let Some(panel) = &view_data.detail {
        let area = centered_rect(60, 60, frame.area());
        frame.render_widget(Clear, area);
        let mut block = Block::default()
            .title(panel.lead().name.clone())
            .borders(Borders::ALL);
        if panel.error().is_some() {
            block = block.border_style(Style::default().fg(Color::Red));
        }
        let detail = Paragraph::new(detail_lines(panel).join("\n"))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(detail, area);
    }
}

fn render_leads(frame: &mut ratatui::Frame<'_>, area: Rect, view: &ConsoleView, cursor: usize) {
    let block = Block::default().title("leads").borders(Borders::ALL);
    if view.leads.is_empty() {
        let empty = Paragraph::new(EMPTY_LEADS)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let header = header_row(&["Name", "Status", "Company", "Email", "Source", "Score"]);
    // Borders and header take three rows.
    let height = usize::from(sections[0].height.saturating_sub(3)).max(1);
    let (start, end) = visible_window(view.leads.len(), cursor, height);

    let rows = view.leads[start..end]
        .iter()
        .enumerate()
        .map(|(offset, lead)| {
            let mut style = Style::default();
            if view.is_selected(lead.id) {
                style = style.add_modifier(Modifier::BOLD);
            }
            if start + offset == cursor {
                style = style.bg(Color::DarkGray);
            }
            Row::new(vec![
                Cell::from(lead.name.clone()),
                Cell::from(lead.status.label()).style(status_style(lead.status)),
                Cell::from(lead.company.clone()),
                Cell::from(lead.email.clone()),
                Cell::from(lead.source.clone()),
                Cell::from(lead.score.to_string()).style(score_style(lead.score_band())),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Min(14),
        Constraint::Length(10),
        Constraint::Min(12),
        Constraint::Min(18),
        Constraint::Length(11),
        Constraint::Length(5),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(table, sections[0]);

    let footer = Paragraph::new(footer_text(view.leads.len()))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, sections[1]);
}

fn render_opportunities(frame: &mut ratatui::Frame<'_>, area: Rect, summary: &OpportunitySummary) {
    let block = Block::default().title("opportunities").borders(Borders::ALL);
    if summary.is_empty() {
        let empty = Paragraph::new(format!("{EMPTY_TITLE}\n{EMPTY_HINT}"))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(area);

    let rows = summary.rows.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.name.clone()),
            Cell::from(row.stage.label()).style(stage_style(row.stage)),
            Cell::from(row.account.clone()),
            Cell::from(row.value.map(format_currency).unwrap_or_default()),
        ])
    });
    let header = header_row(&["Opportunity", "Stage", "Account", "Value"]);
    let widths = [
        Constraint::Min(14),
        Constraint::Length(13),
        Constraint::Min(10),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(table, sections[0]);

    let footer = Paragraph::new(summary_footer_text(summary));
    frame.render_widget(footer, sections[1]);
}

fn header_row(labels: &[&'static str]) -> Row<'static> {
    Row::new(labels.iter().map(|label| {
        Cell::from(*label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }))
}

fn visible_window(len: usize, cursor: usize, height: usize) -> (usize, usize) {
    if len <= height {
        return (0, len);
    }
    let start = cursor.saturating_sub(height - 1).min(len - height);
    (start, start + height)
}

fn filter_bar_text(filters: &FilterPreferences, editing: bool) -> String {
    let search = if editing {
        format!("{}_", filters.search)
    } else if filters.search.is_empty() {
        SEARCH_PLACEHOLDER.to_owned()
    } else {
        filters.search.clone()
    };
    format!(
        "/ {search} | s {} | o {}",
        filters.status.label(),
        filters.sort.label()
    )
}

fn footer_text(count: usize) -> String {
    format!("Showing {count} lead(s)")
}

fn summary_footer_text(summary: &OpportunitySummary) -> String {
    format!("{}\n{}", summary.count_label(), summary.total_label())
}

fn retry_text(message: &str) -> String {
    format!("Failed to load leads: {message}\n\npress r to retry or ctrl+q to quit")
}

fn detail_lines(panel: &DetailPanel) -> Vec<String> {
    let lead = panel.lead();
    let mut lines = vec![
        format!("Company: {}", lead.company),
        format!("Source:  {}", lead.source),
        format!("Score:   {}", lead.score),
        String::new(),
    ];

    match (panel.mode(), panel.draft()) {
        (DetailMode::Editing | DetailMode::Saving, Some(draft)) => {
            let cursor = if panel.mode() == DetailMode::Editing {
                "_"
            } else {
                ""
            };
            lines.push(format!("Email:   {}{cursor}", draft.email));
            lines.push(format!("Status:  {} (tab cycles)", draft.status.label()));
        }
        _ => {
            lines.push(format!("Email:   {}", lead.email));
            lines.push(format!("Status:  {}", lead.status.label()));
        }
    }

    if let Some(error) = panel.error() {
        lines.push(String::new());
        lines.push(format!("error: {error}"));
    }

    lines.push(String::new());
    match panel.mode() {
        DetailMode::Editing | DetailMode::Saving => {
            lines.push(format!("[enter] {}  [esc] Cancel", panel.save_label()));
        }
        DetailMode::Viewing | DetailMode::Converting => {
            let mut actions = vec!["[e] Edit".to_owned()];
            if panel.can_convert() || panel.mode() == DetailMode::Converting {
                actions.push(format!("[c] {}", panel.convert_label()));
            } else if lead.is_converted() {
                actions.push("Converted".to_owned());
            }
            actions.push("[esc] Close".to_owned());
            lines.push(actions.join("  "));
        }
    }
    lines
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let (mode, hints) = match (&state.load, &view_data.detail) {
        (LoadState::Loading, _) => ("LOAD", "ctrl+q quit"),
        (LoadState::Failed(_), _) => ("ERROR", "r retry | ctrl+q quit"),
        (LoadState::Ready, Some(panel)) if panel.is_busy() => ("BUSY", "waiting for backend"),
        (LoadState::Ready, Some(panel)) if panel.mode() == DetailMode::Editing => {
            ("EDIT", "type email | tab status | enter save | esc cancel")
        }
        (LoadState::Ready, Some(_)) => ("DETAIL", "e edit | c convert | esc close"),
        (LoadState::Ready, None) if view_data.search_editing => {
            ("SEARCH", "type to filter | enter done")
        }
        (LoadState::Ready, None) => (
            "LIST",
            "j/k move | enter open | / search | s status | o sort | ctrl+q quit",
        ),
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn status_style(status: LeadStatus) -> Style {
    let color = match status {
        LeadStatus::New => Color::Blue,
        LeadStatus::Contacted => Color::Yellow,
        LeadStatus::Qualified => Color::Green,
        LeadStatus::Converted => Color::Magenta,
    };
    Style::default().fg(color)
}

fn score_style(band: ScoreBand) -> Style {
    match band {
        ScoreBand::High => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ScoreBand::Medium => Style::default().fg(Color::Yellow),
        ScoreBand::Low => Style::default().fg(Color::Gray),
    }
}

fn stage_style(stage: OpportunityStage) -> Style {
    let color = match stage {
        OpportunityStage::Prospecting => Color::Blue,
        OpportunityStage::Qualification => Color::Yellow,
        OpportunityStage::Proposal => Color::LightRed,
        OpportunityStage::Negotiation => Color::Magenta,
        OpportunityStage::ClosedWon => Color::Green,
        OpportunityStage::ClosedLost => Color::Red,
    };
    Style::default().fg(color)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
