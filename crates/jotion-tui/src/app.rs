use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::api::{ApiClient, ApiError};
use crate::layout::{LayoutController, PointerEvent};
use crate::tree::{DocumentTree, TreeRow};
use crate::ui::{self, CELL_WIDTH};

const NOTICE_DURATION: Duration = Duration::from_secs(3);
const NEW_DOCUMENT_TITLE: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Login,
    VerifyingAuth,
    Documents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VimMode {
    Normal,
    Insert,
}

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
    VerifyAuth,
    DocumentCreated {
        parent: Option<Uuid>,
        result: Result<Uuid, ApiError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Short-lived message shown after an operation settles.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: Instant,
}

pub struct App {
    pub api: ApiClient,
    pub view: View,
    pub vim_mode: VimMode,

    // Loading state
    pub loading: bool,
    pub loading_message: String,
    pub error_message: Option<String>,
    pub notice: Option<Notice>,

    // Token entry
    pub token_input: String,
    pub user_name: Option<String>,

    // Document shell
    pub layout: LayoutController,
    pub tree: DocumentTree,
    pub selected_row: usize,
    /// First tree row drawn in the sidebar
    pub tree_scroll: usize,
    /// Document currently open in the main area; `None` is the start page.
    pub active_document: Option<Uuid>,

    /// Terminal area, in cells
    pub viewport: Rect,
    /// A drag that started on the resize handle has moved.
    handle_dragged: bool,
}

impl App {
    pub fn new(api: ApiClient, has_token: bool, viewport: Rect) -> Self {
        let view = if has_token {
            View::VerifyingAuth
        } else {
            View::Login
        };

        Self {
            api,
            view,
            vim_mode: VimMode::Normal,
            loading: false,
            loading_message: String::new(),
            error_message: None,
            notice: None,
            token_input: String::new(),
            user_name: None,
            layout: LayoutController::new(),
            tree: DocumentTree::new(),
            selected_row: 0,
            tree_scroll: 0,
            active_document: None,
            viewport,
            handle_dragged: false,
        }
    }

    pub fn set_loading(&mut self, loading: bool, message: &str) {
        self.loading = loading;
        self.loading_message = message.to_string();
    }

    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn notify(&mut self, kind: NoticeKind, message: &str) {
        self.notice = Some(Notice {
            kind,
            message: message.to_string(),
            expires_at: Instant::now() + NOTICE_DURATION,
        });
    }

    /// Viewport width in layout units
    fn viewport_units(&self) -> u16 {
        self.viewport.width.saturating_mul(CELL_WIDTH)
    }

    pub fn on_tick(&mut self) {
        let now = Instant::now();
        self.layout.tick(now);

        if self.notice.as_ref().is_some_and(|n| n.expires_at <= now) {
            self.notice = None;
        }
    }

    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.viewport = Rect::new(0, 0, width, height);
        self.layout.on_viewport_resize(self.viewport_units(), Instant::now());
        self.keep_selection_visible();
    }

    /// Handle key events, returns true if app should quit
    pub async fn handle_key(
        &mut self,
        key: KeyEvent,
        tx: mpsc::Sender<AppEvent>,
    ) -> Result<bool> {
        // Clear error on any key press
        if self.error_message.is_some() && key.code != KeyCode::Esc {
            self.clear_error();
        }

        // Global quit with Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        match self.view {
            View::Login => self.handle_login_key(key).await,
            View::VerifyingAuth => Ok(false), // No input during verification
            View::Documents => self.handle_documents_key(key, tx).await,
        }
    }

    async fn handle_login_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('q') if self.vim_mode == VimMode::Normal => return Ok(true),
            KeyCode::Esc => self.vim_mode = VimMode::Normal,
            KeyCode::Char('i') if self.vim_mode == VimMode::Normal => {
                self.vim_mode = VimMode::Insert;
            }
            KeyCode::Enter => {
                if !self.token_input.trim().is_empty() {
                    self.submit_token().await;
                }
            }
            KeyCode::Char(c) if self.vim_mode == VimMode::Insert => self.token_input.push(c),
            KeyCode::Backspace if self.vim_mode == VimMode::Insert => {
                self.token_input.pop();
            }
            _ => {}
        }

        Ok(false)
    }

    async fn submit_token(&mut self) {
        let token = std::mem::take(&mut self.token_input);
        if let Err(e) = self.api.set_token(&token) {
            self.set_error(format!("Could not save token: {}", e));
            return;
        }

        self.vim_mode = VimMode::Normal;
        self.verify_auth().await;
    }

    async fn handle_documents_key(
        &mut self,
        key: KeyEvent,
        tx: mpsc::Sender<AppEvent>,
    ) -> Result<bool> {
        if self.loading {
            return Ok(false);
        }

        let now = Instant::now();

        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('[') => self.layout.collapse(now),
            KeyCode::Char(']') => self.layout.reset_width(now),
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_document_id() {
                    self.expand_document(id).await;
                }
            }
            KeyCode::Char('h') | KeyCode::Left => self.collapse_selected(),
            KeyCode::Enter => {
                if let Some(id) = self.selected_document_id() {
                    self.open_document(id);
                }
            }
            KeyCode::Esc => {
                self.active_document = None;
                self.layout.on_route_change(now);
            }
            KeyCode::Char('n') => self.create_document(None, tx),
            KeyCode::Char('a') => {
                if let Some(id) = self.selected_document_id() {
                    self.create_document(Some(id), tx);
                }
            }
            KeyCode::Char('r') => self.refresh().await,
            KeyCode::Char('L') => self.logout(),
            _ => {}
        }

        Ok(false)
    }

    pub async fn handle_mouse(&mut self, mouse: MouseEvent, tx: mpsc::Sender<AppEvent>) {
        if self.view != View::Documents || self.loading {
            return;
        }

        let now = Instant::now();
        let position = Position::new(mouse.column, mouse.row);
        let areas = ui::shell_areas(self.viewport, self);

        // During a drag every move and release belongs to the layout controller
        if self.layout.captures_pointer() {
            match mouse.kind {
                MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                    self.handle_dragged = true;
                    self.layout.on_pointer_move(pointer_x(mouse.column));
                }
                MouseEventKind::Up(_) => {
                    self.layout.end_resize();
                    let released_on_handle =
                        areas.resize_handle.is_some_and(|r| r.contains(position));
                    if !self.handle_dragged && released_on_handle {
                        self.layout.reset_width(now);
                    }
                }
                _ => {}
            }
            return;
        }

        let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
            return;
        };

        if areas.resize_handle.is_some_and(|r| r.contains(position)) {
            let mut event = PointerEvent::new(pointer_x(mouse.column));
            self.handle_dragged = false;
            self.layout.begin_resize(&mut event);
            if event.propagation_stopped() {
                return;
            }
        }

        if areas.collapse_button.is_some_and(|r| r.contains(position)) {
            self.layout.collapse(now);
        } else if areas.menu_button.is_some_and(|r| r.contains(position)) {
            self.layout.reset_width(now);
        } else if areas.new_page.is_some_and(|r| r.contains(position))
            || areas.create_button.is_some_and(|r| r.contains(position))
        {
            self.create_document(None, tx);
        } else if areas.tree.contains(position) {
            self.click_tree_row(areas.tree, position).await;
        }
    }

    async fn click_tree_row(&mut self, tree_area: Rect, position: Position) {
        let index = self.tree_scroll + (position.y - tree_area.y) as usize;
        let Some((id, level)) = self
            .tree
            .rows()
            .get(index)
            .and_then(|row| row.document().map(|d| (d.id, row.level())))
        else {
            return;
        };

        self.selected_row = index;

        let chevron_x = tree_area.x + ui::item_padding(level);
        if position.x == chevron_x {
            if self.tree.is_expanded(id) {
                self.tree.collapse(id);
            } else {
                self.expand_document(id).await;
            }
        } else {
            self.open_document(id);
        }
    }

    fn selected_document_id(&self) -> Option<Uuid> {
        self.tree
            .rows()
            .get(self.selected_row)
            .and_then(TreeRow::document)
            .map(|d| d.id)
    }

    pub fn move_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
        self.keep_selection_visible();
    }

    pub fn move_down(&mut self) {
        let len = self.tree.rows().len();
        if self.selected_row < len.saturating_sub(1) {
            self.selected_row += 1;
        }
        self.keep_selection_visible();
    }

    fn clamp_selection(&mut self) {
        let len = self.tree.rows().len();
        self.selected_row = self.selected_row.min(len.saturating_sub(1));
        self.keep_selection_visible();
    }

    /// Scroll the sidebar tree so the selected row is on screen.
    fn keep_selection_visible(&mut self) {
        let height = ui::shell_areas(self.viewport, self).tree.height as usize;
        if height == 0 {
            return;
        }

        if self.selected_row < self.tree_scroll {
            self.tree_scroll = self.selected_row;
        } else if self.selected_row >= self.tree_scroll + height {
            self.tree_scroll = self.selected_row + 1 - height;
        }

        let max_scroll = self.tree.rows().len().saturating_sub(height);
        self.tree_scroll = self.tree_scroll.min(max_scroll);
    }

    fn collapse_selected(&mut self) {
        let Some(id) = self.selected_document_id() else {
            return;
        };

        if self.tree.is_expanded(id) {
            self.tree.collapse(id);
            self.clamp_selection();
            return;
        }

        // Already collapsed: jump to the parent row
        let parent = self.tree.find(id).and_then(|d| d.parent_document);
        if let Some(parent_id) = parent {
            if let Some(index) = self
                .tree
                .rows()
                .iter()
                .position(|row| row.document().is_some_and(|d| d.id == parent_id))
            {
                self.selected_row = index;
                self.keep_selection_visible();
            }
        }
    }

    /// Show a document in the main area. This is a route change.
    pub fn open_document(&mut self, id: Uuid) {
        self.active_document = Some(id);
        self.layout.on_route_change(Instant::now());
    }

    async fn expand_document(&mut self, id: Uuid) {
        if !self.tree.is_loaded(Some(id)) && !self.load_children(Some(id)).await {
            return;
        }
        self.tree.expand(id);
    }

    /// Fetch one level of the tree. Returns false if the request failed.
    async fn load_children(&mut self, parent: Option<Uuid>) -> bool {
        match self.api.get_sidebar(parent).await {
            Ok(documents) => {
                self.tree.set_children(parent, documents);
                self.clamp_selection();
                true
            }
            Err(ApiError::Unauthenticated) => {
                self.on_session_expired();
                false
            }
            Err(e) => {
                self.set_error(format!("Failed to load documents: {}", e));
                false
            }
        }
    }

    async fn refresh(&mut self) {
        self.set_loading(true, "Loading documents...");
        self.tree.clear();
        self.tree_scroll = 0;
        self.load_children(None).await;
        self.set_loading(false, "");
    }

    /// Start creating an untitled document. The request runs in the
    /// background so the pending state is drawn; the outcome comes back as
    /// `AppEvent::DocumentCreated`.
    fn create_document(&mut self, parent: Option<Uuid>, tx: mpsc::Sender<AppEvent>) {
        self.set_loading(true, "Creating a new note...");

        let api = self.api.clone();
        tokio::spawn(async move {
            let result = api.create_document(NEW_DOCUMENT_TITLE, parent).await;
            let _ = tx.send(AppEvent::DocumentCreated { parent, result }).await;
        });
    }

    pub async fn on_document_created(
        &mut self,
        parent: Option<Uuid>,
        result: Result<Uuid, ApiError>,
    ) {
        self.set_loading(false, "");

        match result {
            Ok(id) => {
                tracing::info!(document_id = %id, "Created document");
                self.notify(NoticeKind::Success, "New note created!");
                if self.load_children(parent).await {
                    if let Some(parent_id) = parent {
                        self.tree.expand(parent_id);
                    }
                }
            }
            Err(ApiError::Unauthenticated) => {
                self.notify(NoticeKind::Error, "Failed to create a new note.");
                self.on_session_expired();
            }
            Err(e) => {
                tracing::warn!("Create failed: {}", e);
                self.notify(NoticeKind::Error, "Failed to create a new note.");
            }
        }
    }

    pub async fn verify_auth(&mut self) {
        self.set_loading(true, "Verifying authentication...");

        match self.api.get_sidebar(None).await {
            Ok(documents) => {
                self.user_name = self.api.display_name();
                self.tree.clear();
                self.tree.set_children(None, documents);
                self.enter_documents();
            }
            Err(ApiError::Unauthenticated) => self.on_session_expired(),
            Err(e) => {
                self.view = View::Login;
                self.set_error(format!("Could not reach server: {}", e));
            }
        }

        self.set_loading(false, "");
    }

    /// First render of the document shell: the sidebar and navbar exist now.
    fn enter_documents(&mut self) {
        self.view = View::Documents;
        self.selected_row = 0;
        self.tree_scroll = 0;
        self.active_document = None;
        self.layout = LayoutController::new();
        self.layout.mount(self.viewport_units(), Instant::now());
    }

    fn on_session_expired(&mut self) {
        if let Err(e) = self.api.clear_token() {
            tracing::warn!("Could not delete stored token: {}", e);
        }
        self.view = View::Login;
        self.set_error("Session expired. Paste a new access token.".to_string());
    }

    fn logout(&mut self) {
        if let Err(e) = self.api.clear_token() {
            self.set_error(format!("Could not delete stored token: {}", e));
        }
        self.user_name = None;
        self.tree.clear();
        self.selected_row = 0;
        self.tree_scroll = 0;
        self.active_document = None;
        self.view = View::Login;
    }

    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or("Your")
    }
}

/// Pointer position in layout units. A pointer over column `c` asks for a
/// sidebar that includes that column.
fn pointer_x(column: u16) -> u16 {
    column.saturating_add(1).saturating_mul(CELL_WIDTH)
}
