//! TUI: 非同期Stream + メッセージエンジン
//!
//! - ユーザー入力を非同期Streamで処理
//! - ウィジェットのタイマー/検索完了イベントを同じループで処理
//! - ホスト(地図)はビューポートを所有し、選択イベントで更新する

use super::map_view::{render_map, render_status, viewport_size_for};
use super::renderer::{item_at, render_toast, GeocoderView, INPUT_HEIGHT};
use super::toast::{ToastState, ToastType, ERROR_TOAST_DURATION, SELECTION_TOAST_DURATION};
use crate::types::{GeocodeResult, Viewport};
use crate::widget::{GeocoderWidget, HostEvent, InputOperation};

use anyhow::{Context, Result};
use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use futures_util::{Stream, StreamExt};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub mod timing {
    use std::time::Duration;

    pub const INPUT_POLL: Duration = Duration::from_millis(10);
    pub const IDLE_POLL: Duration = Duration::from_millis(5);
    pub const UI_REFRESH: Duration = Duration::from_millis(33);
}

/// ユーザー入力イベント
#[derive(Debug)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// What a key press means to the demo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Edit(InputOperation),
    ClearInput,
    HighlightNext,
    HighlightPrevious,
    Select,
    ToggleFocus,
    Quit,
    Ignore,
}

/// Emacs-style bindings plus list navigation
pub fn key_action(key: &KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('a') if ctrl => KeyAction::Edit(InputOperation::MoveCursorToStart),
        KeyCode::Char('e') if ctrl => KeyAction::Edit(InputOperation::MoveCursorToEnd),
        KeyCode::Char('b') if ctrl => KeyAction::Edit(InputOperation::MoveCursorLeft),
        KeyCode::Char('f') if ctrl => KeyAction::Edit(InputOperation::MoveCursorRight),
        KeyCode::Char('d') if ctrl => KeyAction::Edit(InputOperation::DeleteCharForward),
        KeyCode::Char('h') if ctrl => KeyAction::Edit(InputOperation::DeleteCharBackward),
        KeyCode::Char('k') if ctrl => KeyAction::Edit(InputOperation::KillLine),
        KeyCode::Char('y') if ctrl => KeyAction::Edit(InputOperation::Yank),
        KeyCode::Char('u') if ctrl => KeyAction::ClearInput,
        KeyCode::Char('p') if ctrl => KeyAction::HighlightPrevious,
        KeyCode::Char('n') if ctrl => KeyAction::HighlightNext,
        KeyCode::Char(_) if ctrl => KeyAction::Ignore,
        KeyCode::Char(c) => KeyAction::Edit(InputOperation::InsertChar(c)),
        KeyCode::Backspace => KeyAction::Edit(InputOperation::DeleteCharBackward),
        KeyCode::Delete => KeyAction::Edit(InputOperation::DeleteCharForward),
        KeyCode::Left => KeyAction::Edit(InputOperation::MoveCursorLeft),
        KeyCode::Right => KeyAction::Edit(InputOperation::MoveCursorRight),
        KeyCode::Home => KeyAction::Edit(InputOperation::MoveCursorToStart),
        KeyCode::End => KeyAction::Edit(InputOperation::MoveCursorToEnd),
        KeyCode::Up => KeyAction::HighlightPrevious,
        KeyCode::Down => KeyAction::HighlightNext,
        KeyCode::Enter => KeyAction::Select,
        KeyCode::Tab => KeyAction::ToggleFocus,
        _ => KeyAction::Ignore,
    }
}

/// ユーザー入力を非同期Streamに変換
pub fn create_input_stream() -> impl Stream<Item = InputEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            if crossterm::event::poll(timing::INPUT_POLL).unwrap_or(false) {
                let Ok(event) = crossterm::event::read() else {
                    break;
                };
                let input_event = match event {
                    CrosstermEvent::Key(key) => InputEvent::Key(key),
                    CrosstermEvent::Mouse(mouse) => InputEvent::Mouse(mouse),
                    CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
                    _ => continue,
                };
                if tx.send(input_event).is_err() {
                    break;
                }
            }

            tokio::time::sleep(timing::IDLE_POLL).await;
        }
    });

    UnboundedReceiverStream::new(rx)
}

/// Page state of the demo: the geocoder plus the map it drives
pub struct DemoApp {
    pub widget: GeocoderWidget,
    host_events: mpsc::UnboundedReceiver<HostEvent>,
    /// Owned by the page; the widget only proposes new values
    pub viewport: Viewport,
    pub marker: Option<GeocodeResult>,
    pub toast: ToastState,
    view: GeocoderView,
    input_area: Rect,
    dropdown_area: Option<Rect>,
    seen_error: Option<String>,
}

impl DemoApp {
    pub fn new(
        widget: GeocoderWidget,
        host_events: mpsc::UnboundedReceiver<HostEvent>,
        view: GeocoderView,
    ) -> Self {
        let viewport = *widget.viewport();
        Self {
            widget,
            host_events,
            viewport,
            marker: None,
            toast: ToastState::new(),
            view,
            input_area: Rect::default(),
            dropdown_area: None,
            seen_error: None,
        }
    }

    /// Returns true when the user asked to quit
    pub fn handle_input(&mut self, input: InputEvent) -> bool {
        match input {
            InputEvent::Key(key) if key.kind == KeyEventKind::Press => {
                return self.handle_key(&key);
            }
            InputEvent::Key(_) => {}
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
            InputEvent::Resize(width, height) => {
                log::debug!("Terminal resized: {}x{}", width, height);
            }
        }
        false
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key_action(key) {
            KeyAction::Quit => return true,
            KeyAction::Edit(operation) => {
                if !self.widget.is_focused() {
                    self.widget.on_focus();
                }
                self.widget.edit(operation);
            }
            KeyAction::ClearInput => self.widget.on_input_changed(""),
            KeyAction::HighlightNext => self.widget.highlight_next(),
            KeyAction::HighlightPrevious => self.widget.highlight_previous(),
            KeyAction::Select => {
                self.widget.select_highlighted();
            }
            KeyAction::ToggleFocus => {
                if self.widget.is_focused() {
                    self.widget.on_blur();
                } else {
                    self.widget.on_focus();
                }
            }
            KeyAction::Ignore => {}
        }
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        if let Some(dropdown) = self.dropdown_area {
            let count = self.widget.visible_results().len();
            if let Some(index) = item_at(dropdown, mouse.column, mouse.row, count) {
                self.widget.select_index(index);
                return;
            }
        }

        let on_input = mouse.column >= self.input_area.x
            && mouse.column < self.input_area.x + self.input_area.width
            && mouse.row >= self.input_area.y
            && mouse.row < self.input_area.y + self.input_area.height;
        if on_input {
            self.widget.on_focus();
        } else if self.widget.is_focused() {
            self.widget.on_blur();
        }
    }

    /// Apply notifications the widget sent to its host
    pub fn drain_host_events(&mut self) {
        while let Ok(event) = self.host_events.try_recv() {
            self.handle_host_event(event);
        }
    }

    pub fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Selected { viewport, item } => {
                log::info!("Selected: {}", item.place_name);
                self.viewport = viewport;
                self.widget.set_viewport(viewport);
                self.toast.show(
                    format!("Selected: {}", item.place_name),
                    ToastType::Success,
                    SELECTION_TOAST_DURATION,
                );
                self.marker = Some(item);
            }
            HostEvent::Focused => log::trace!("Geocoder focused"),
            HostEvent::Blurred => log::trace!("Geocoder blurred"),
        }
    }

    /// Raise a toast when a new remote failure is surfaced
    pub fn check_errors(&mut self) {
        let current = self.widget.state().last_error.clone();
        if current != self.seen_error {
            if let Some(message) = &current {
                self.toast
                    .show(message.clone(), ToastType::Error, ERROR_TOAST_DURATION);
            }
            self.seen_error = current;
        }
    }

    /// Keep the viewport's pixel size in step with the map panel
    fn sync_viewport_size(&mut self, map_area: Rect) {
        let (width, height) = viewport_size_for(map_area);
        if self.viewport.width != width || self.viewport.height != height {
            self.viewport = self.viewport.with_size(width, height);
            self.widget.set_viewport(self.viewport);
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(f.size());

        self.sync_viewport_size(chunks[1]);
        self.toast.update();

        render_map(f, chunks[1], &self.viewport, self.marker.as_ref());

        let status = match &self.marker {
            Some(item) => format!("Selected: {}", item.place_name),
            None => format!("{} result(s)", self.widget.results().len()),
        };
        render_status(f, chunks[2], &status, self.widget.state().last_error.as_deref());

        // ドロップダウンは地図の上に重ねて描画
        self.input_area = chunks[0];
        self.dropdown_area = self.view.render(f, chunks[0], &self.widget);

        render_toast(f, &self.toast);
    }
}

/// メッセージ処理エンジン
pub struct TuiEngine {
    app: DemoApp,
    input_stream: std::pin::Pin<Box<dyn Stream<Item = InputEvent> + Send>>,
    tick_interval: tokio::time::Interval,
    terminal: ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
}

impl TuiEngine {
    pub fn new(app: DemoApp) -> Result<Self> {
        use crossterm::{
            event::EnableMouseCapture,
            execute,
            terminal::{enable_raw_mode, EnterAlternateScreen},
        };
        use ratatui::{backend::CrosstermBackend, Terminal};

        let input_stream = Box::pin(create_input_stream());
        let tick_interval = tokio::time::interval(timing::UI_REFRESH);

        let mut stdout = std::io::stdout();
        enable_raw_mode().context("failed to enable raw mode")?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("failed to create terminal")?;

        Ok(Self {
            app,
            input_stream,
            tick_interval,
            terminal,
        })
    }

    /// メインイベントループ
    pub async fn run(&mut self) -> Result<()> {
        self.app.widget.on_focus();

        let result = self.event_loop().await;
        self.cleanup()?;
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                biased;

                // 入力処理を最優先（Escの即座検出）
                Some(input) = self.input_stream.next() => {
                    if self.app.handle_input(input) {
                        break;
                    }
                }

                Some(event) = self.app.widget.next_event() => {
                    self.app.widget.handle_event(event);
                    self.app.check_errors();
                }

                // UI更新（最低優先度）
                _ = self.tick_interval.tick() => {
                    self.app.drain_host_events();
                    let app = &mut self.app;
                    self.terminal
                        .draw(|f| app.draw(f))
                        .context("failed to draw frame")?;
                }
            }
        }

        self.app.widget.dispose();
        Ok(())
    }

    /// Terminal クリーンアップ
    fn cleanup(&mut self) -> Result<()> {
        use crossterm::{
            event::DisableMouseCapture,
            execute,
            terminal::{disable_raw_mode, LeaveAlternateScreen},
        };

        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

/// Convenience entry point used by the binary
pub async fn run_demo(app: DemoApp) -> Result<()> {
    let mut engine = TuiEngine::new(app)?;
    engine.run().await
}
