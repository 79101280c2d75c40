// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal front-end: a mouse-driven canvas over the zone editor.

mod canvas;

use std::error::Error;
use std::io;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout as Split, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::editor::{
    Editor, EditorConfig, EditorError, MenuCommand, Modifiers, PointerButton, PromptField,
    TextTarget,
};
use crate::gateway::{LayoutGateway, SaveOutcome, SaveQueue};
use crate::model::color::ZoneColor;
use crate::model::geometry::{Point, Size, Viewport};
use crate::model::layout::Layout;
use crate::model::record::count_zones;

use canvas::{device_cells, CanvasView, SELECTION_COLOR};

/// Canvas units covered by one terminal cell; cells are roughly twice as tall as wide.
const CELL_SCALE_X: f64 = 8.0;
const CELL_SCALE_Y: f64 = 16.0;
const PAN_STEP: f64 = 4.0;
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);
const TOAST_TTL: Duration = Duration::from_secs(3);

pub fn run(gateway: Arc<dyn LayoutGateway>) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(gateway.describe());
    app.load_from(gateway.as_ref());

    let (queue, outcomes) = SaveQueue::spawn(Arc::clone(&gateway))?;
    app.attach_saves(queue, outcomes);

    let mut terminal = TerminalSession::new()?;
    while !app.should_quit {
        app.poll_saves();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    drop(terminal);
    app.finish();
    Ok(())
}

#[derive(Debug)]
struct Toast {
    message: String,
    expires_at: Instant,
}

/// A yes/no question shown in the footer; `y` confirms, any other key cancels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirm {
    ResetGrid,
    /// The stored layout was never read, so saving would replace it with what is on screen.
    OverwriteStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Click {
    at: Instant,
    column: u16,
    row: u16,
}

struct App {
    editor: Editor,
    viewport: Viewport,
    canvas_area: Rect,
    source: String,
    saves: Option<SaveQueue>,
    outcomes: Option<Receiver<SaveOutcome>>,
    toast: Option<Toast>,
    alert: Option<String>,
    confirm: Option<Confirm>,
    store_unread: bool,
    last_click: Option<Click>,
    should_quit: bool,
}

impl App {
    fn new(source: String) -> Self {
        // The handle glyph fills the zone's last terminal cell; the whole cell must hit it.
        let config = EditorConfig {
            resizer: Size::new(CELL_SCALE_X, CELL_SCALE_Y),
            ..EditorConfig::default()
        };
        Self {
            editor: Editor::new(Layout::new(), config),
            viewport: Viewport::new(Point::ORIGIN, CELL_SCALE_X, CELL_SCALE_Y),
            canvas_area: Rect::default(),
            source,
            saves: None,
            outcomes: None,
            toast: None,
            alert: None,
            confirm: None,
            store_unread: false,
            last_click: None,
            should_quit: false,
        }
    }

    fn load_from(&mut self, gateway: &dyn LayoutGateway) {
        let records = match gateway.load() {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(%err, gateway = %self.source, "load failed; starting empty");
                self.store_unread = true;
                self.alert = Some(format!("Load failed: {err}"));
                return;
            }
        };
        match Layout::from_records(&records) {
            Ok(layout) => {
                self.editor.replace_layout(layout);
                self.set_toast(format!("Loaded {} zones", count_zones(&records)));
            }
            Err(err) => {
                tracing::warn!(%err, gateway = %self.source, "stored layout rejected");
                self.store_unread = true;
                self.alert = Some(format!("Stored layout rejected: {err}"));
            }
        }
    }

    fn attach_saves(&mut self, queue: SaveQueue, outcomes: Receiver<SaveOutcome>) {
        self.saves = Some(queue);
        self.outcomes = Some(outcomes);
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn report(&mut self, err: EditorError) {
        match err {
            EditorError::Grid(_) | EditorError::Layout(_) => self.alert = Some(err.to_string()),
            other => self.set_toast(other.to_string()),
        }
    }

    fn save(&mut self) {
        if self.store_unread {
            self.confirm = Some(Confirm::OverwriteStore);
            return;
        }
        let records = self.editor.records();
        let zones = count_zones(&records);
        match &self.saves {
            Some(queue) => {
                queue.submit(records);
                self.set_toast(format!("Saving {zones} zones..."));
            }
            None => self.set_toast("Nowhere to save to"),
        }
    }

    fn poll_saves(&mut self) {
        let Some(outcomes) = &self.outcomes else {
            return;
        };
        let mut latest = None;
        loop {
            match outcomes.try_recv() {
                Ok(outcome) => latest = Some(outcome),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.outcomes = None;
                    break;
                }
            }
        }
        match latest {
            Some(SaveOutcome::Saved { zones }) => {
                self.set_toast(format!("Saved {zones} zones to {}", self.source));
            }
            Some(SaveOutcome::Failed { message }) => {
                self.set_toast(format!("Save failed: {message}"));
            }
            None => {}
        }
    }

    /// Waits for queued saves so quitting never drops the last edit.
    fn finish(&mut self) {
        if let Some(queue) = self.saves.take() {
            if queue.is_busy() {
                tracing::info!("waiting for pending save");
            }
            queue.flush();
        }
    }

    // ---- keyboard --------------------------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.alert.take().is_some() {
            return;
        }
        if let Some(question) = self.confirm.take() {
            if matches!(key.code, KeyCode::Char('y' | 'Y')) {
                self.confirmed(question);
            }
            return;
        }
        if ctrl && key.code == KeyCode::Char('s') {
            self.save();
            return;
        }
        if self.editor.text_edit().is_some() {
            self.handle_text_key(key);
            return;
        }
        if self.editor.grid_prompt().is_some() {
            self.handle_prompt_key(key);
            return;
        }
        if self.editor.context_menu().is_some() {
            self.handle_menu_key(key);
            return;
        }

        let result = match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Ok(())
            }
            KeyCode::Char('a') => self.editor.add_zone().map(|_| ()),
            KeyCode::Delete | KeyCode::Backspace => self.editor.delete_selected().map(|_| ()),
            KeyCode::Enter => match self.editor.first_selected() {
                Some(zone) => self.editor.enter_zone(zone).map(|_| ()),
                None => Err(EditorError::NoSelection),
            },
            KeyCode::Esc => {
                if self.editor.cell_target().is_some() {
                    self.editor.exit_cell_mode();
                } else {
                    self.editor.exit_zone();
                }
                Ok(())
            }
            KeyCode::Char('c') => self.cycle_color(),
            KeyCode::Char('g') => self.editor.open_grid_prompt(),
            KeyCode::Char('r') => self.ask_reset(),
            KeyCode::Char('m') => self.editor.merge_selected_cells().map(|_| ()),
            KeyCode::Char('s') => self.editor.split_selected_cell().map(|_| ()),
            KeyCode::Char('n') => self.begin_rename(),
            KeyCode::Left => self.pan(PAN_STEP, 0.0),
            KeyCode::Right => self.pan(-PAN_STEP, 0.0),
            KeyCode::Up => self.pan(0.0, PAN_STEP / 2.0),
            KeyCode::Down => self.pan(0.0, -PAN_STEP / 2.0),
            _ => Ok(()),
        };
        if let Err(err) = result {
            self.report(err);
        }
    }

    fn confirmed(&mut self, question: Confirm) {
        match question {
            Confirm::ResetGrid => {
                if let Err(err) = self.editor.apply_menu(MenuCommand::Reset) {
                    self.report(err);
                }
            }
            Confirm::OverwriteStore => {
                self.store_unread = false;
                self.save();
            }
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if let Err(err) = self.editor.commit_text_edit() {
                    self.report(err);
                }
            }
            KeyCode::Esc => self.editor.cancel_text_edit(),
            KeyCode::Backspace => {
                if let Some(edit) = self.editor.text_edit_mut() {
                    edit.backspace();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(edit) = self.editor.text_edit_mut() {
                    edit.push(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if let Err(err) = self.editor.submit_grid_prompt() {
                    self.report(err);
                }
            }
            KeyCode::Esc => self.editor.cancel_grid_prompt(),
            KeyCode::Tab | KeyCode::BackTab => {
                if let Some(prompt) = self.editor.grid_prompt_mut() {
                    prompt.switch_field();
                }
            }
            KeyCode::Backspace => {
                if let Some(prompt) = self.editor.grid_prompt_mut() {
                    prompt.backspace();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(prompt) = self.editor.grid_prompt_mut() {
                    prompt.push(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let command = match key.code {
            KeyCode::Char('d') | KeyCode::Delete => MenuCommand::Delete,
            KeyCode::Char('g') => MenuCommand::SplitIntoCells,
            KeyCode::Char('r') => {
                self.editor.dismiss_context_menu();
                self.confirm = Some(Confirm::ResetGrid);
                return;
            }
            KeyCode::Char(digit @ '1'..='9') => {
                let index = digit as usize - '1' as usize;
                match ZoneColor::PALETTE.get(index) {
                    Some(color) => MenuCommand::Recolor(*color),
                    None => return,
                }
            }
            KeyCode::Esc => {
                self.editor.dismiss_context_menu();
                return;
            }
            _ => return,
        };
        if let Err(err) = self.editor.apply_menu(command) {
            self.report(err);
        }
    }

    fn cycle_color(&mut self) -> Result<(), EditorError> {
        let zone = self.editor.first_selected().ok_or(EditorError::NoSelection)?;
        let current = self
            .editor
            .layout()
            .zone(zone)
            .map(|zone| zone.color())
            .unwrap_or_default();
        self.editor.recolor_selected(current.next())
    }

    fn ask_reset(&mut self) -> Result<(), EditorError> {
        self.editor.first_selected().ok_or(EditorError::NoSelection)?;
        self.confirm = Some(Confirm::ResetGrid);
        Ok(())
    }

    fn begin_rename(&mut self) -> Result<(), EditorError> {
        if self.editor.cell_target().is_some() {
            let mut cells = self.editor.selected_cells().iter();
            return match (cells.next(), cells.next()) {
                (Some(cell), None) => {
                    let cell = *cell;
                    self.editor.begin_cell_rename(cell)
                }
                _ => {
                    self.set_toast("Select exactly one cell to rename");
                    Ok(())
                }
            };
        }
        let zone = self.editor.first_selected().ok_or(EditorError::NoSelection)?;
        self.editor.begin_zone_rename(zone)
    }

    fn pan(&mut self, dx: f64, dy: f64) -> Result<(), EditorError> {
        self.viewport.origin = Point::new(self.viewport.origin.x + dx, self.viewport.origin.y + dy);
        Ok(())
    }

    // ---- mouse -----------------------------------------------------------------------------

    fn canvas_point(&self, column: u16, row: u16) -> Point {
        let device = Point::new(
            f64::from(column) - f64::from(self.canvas_area.x) + 0.5,
            f64::from(row) - f64::from(self.canvas_area.y) + 0.5,
        );
        self.viewport.to_canvas(device)
    }

    fn in_canvas(&self, column: u16, row: u16) -> bool {
        let area = self.canvas_area;
        column >= area.left() && column < area.right() && row >= area.top() && row < area.bottom()
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let point = self.canvas_point(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(button) => {
                if !self.in_canvas(mouse.column, mouse.row) {
                    return;
                }
                self.alert = None;
                self.confirm = None;
                let button = match button {
                    MouseButton::Right => PointerButton::Secondary,
                    _ => PointerButton::Primary,
                };
                let modifiers = if mouse.modifiers.contains(KeyModifiers::CONTROL) {
                    Modifiers::TOGGLE
                } else {
                    Modifiers::NONE
                };
                self.editor.pointer_down(point, button, modifiers);
            }
            MouseEventKind::Drag(_) | MouseEventKind::Moved => self.editor.pointer_move(point),
            MouseEventKind::Up(MouseButton::Left) => {
                self.editor.pointer_up(point);
                self.register_click(mouse.column, mouse.row, point);
            }
            MouseEventKind::Up(_) => self.editor.pointer_up(point),
            _ => {}
        }
    }

    fn register_click(&mut self, column: u16, row: u16, point: Point) {
        let now = Instant::now();
        let repeated = self.last_click.is_some_and(|last| {
            last.column == column
                && last.row == row
                && now.duration_since(last.at) <= DOUBLE_CLICK_WINDOW
        });
        if !repeated {
            self.last_click = Some(Click {
                at: now,
                column,
                row,
            });
            return;
        }

        self.last_click = None;
        if let Err(err) = self.editor.double_click(point) {
            self.report(err);
        }
    }

    // ---- labels ----------------------------------------------------------------------------

    fn breadcrumb(&self) -> String {
        let mut parts = vec!["Root".to_owned()];
        for id in self.editor.nav_stack() {
            let name = self
                .editor
                .layout()
                .zone(*id)
                .map(|zone| zone.name().to_owned())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| id.to_string());
            parts.push(name);
        }
        parts.join(" > ")
    }

    fn hints(&self) -> &'static str {
        if self.confirm == Some(Confirm::ResetGrid) {
            "Reset the grid of the first selected zone? y confirm | any other key cancels"
        } else if self.confirm == Some(Confirm::OverwriteStore) {
            "The stored layout was not loaded. Overwrite it? y confirm | any other key cancels"
        } else if self.editor.text_edit().is_some() {
            "Enter save name | Esc cancel"
        } else if self.editor.grid_prompt().is_some() {
            "Tab switch field | Enter split | Esc cancel"
        } else if self.editor.context_menu().is_some() {
            "d delete | g split into cells | 1-6 color | r reset | Esc close"
        } else if self.editor.cell_target().is_some() {
            "click/drag select cells | m merge | s split | n rename | Esc done"
        } else {
            "a add | drag move | right-click menu | dbl-click enter | Esc up | Ctrl+S save | q quit"
        }
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let rows = Split::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let (header_area, canvas_area, footer_area) = (rows[0], rows[1], rows[2]);
    app.canvas_area = canvas_area;

    let mut header = vec![
        Span::styled("Zoneplan", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" | {} | {}", app.source, app.breadcrumb())),
    ];
    if let Some(zone) = app.editor.cell_target() {
        header.push(Span::styled(
            format!(" | cells of {zone}"),
            Style::default().fg(SELECTION_COLOR),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(header)), header_area);

    frame.render_widget(
        CanvasView {
            editor: &app.editor,
            viewport: app.viewport,
        },
        canvas_area,
    );

    if app.toast.as_ref().is_some_and(|toast| Instant::now() >= toast.expires_at) {
        app.toast = None;
    }
    let mut footer = vec![Span::styled(
        app.hints(),
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(edit) = app.editor.text_edit() {
        let label = match edit.target {
            TextTarget::Zone(_) => "Zone name",
            TextTarget::Cell { .. } => "Cell name",
        };
        footer = vec![Span::raw(format!("{label}: {}_", edit.buffer))];
    }
    if let Some(toast) = &app.toast {
        footer.push(Span::raw("  "));
        footer.push(Span::styled(
            toast.message.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(footer)), footer_area);

    if let Some(menu) = app.editor.context_menu() {
        let anchor = app.viewport.to_device(menu.anchor);
        draw_menu(frame, canvas_area, anchor);
    }
    if let Some(prompt) = app.editor.grid_prompt() {
        let focused = Style::default().add_modifier(Modifier::REVERSED);
        let field = |label: &str, value: &str, active: bool| {
            Line::from(vec![
                Span::raw(format!("{label}: ")),
                Span::styled(
                    format!("{value:<6}"),
                    if active { focused } else { Style::default() },
                ),
            ])
        };
        let lines = vec![
            field("Rows", &prompt.rows, prompt.field == PromptField::Rows),
            field("Cols", &prompt.cols, prompt.field == PromptField::Cols),
        ];
        draw_popup(frame, area, " Split into cells ", lines, 30);
    }
    if let Some(alert) = &app.alert {
        draw_popup(frame, area, " Error ", vec![Line::from(alert.clone())], 48);
    }
}

fn draw_menu(frame: &mut Frame<'_>, canvas_area: Rect, anchor: Point) {
    let mut lines = vec![
        Line::from("d  Delete"),
        Line::from("g  Split into cells"),
        Line::from("r  Reset"),
    ];
    for (index, color) in ZoneColor::PALETTE.iter().enumerate() {
        let (r, g, b) = color.rgb();
        lines.push(Line::from(vec![
            Span::raw(format!("{}  ", index + 1)),
            Span::styled("  ", Style::default().bg(Color::Rgb(r, g, b))),
            Span::raw(format!(" {}", color.hex())),
        ]));
    }

    let width = 24;
    let height = lines.len() as u16 + 2;
    let wanted = crate::model::geometry::Rect::new(
        anchor.x,
        anchor.y,
        f64::from(width),
        f64::from(height),
    );
    let Some(mut popup) = device_cells(wanted, canvas_area) else {
        return;
    };
    // Keep the whole menu on screen when the anchor is near the right or bottom edge.
    popup.x = popup.x.min(canvas_area.right().saturating_sub(width));
    popup.y = popup.y.min(canvas_area.bottom().saturating_sub(height));
    popup.width = width.min(canvas_area.width);
    popup.height = height.min(canvas_area.height);

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Zone ")),
        popup,
    );
}

fn draw_popup(frame: &mut Frame<'_>, area: Rect, title: &str, lines: Vec<Line<'_>>, width: u16) {
    let width = width.min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(title.to_owned())),
        popup,
    );
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}
