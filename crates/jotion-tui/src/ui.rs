use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, NoticeKind, View, VimMode};
use crate::layout::ResolvedGeometry;
use crate::tree::TreeRow;

/// Layout units per terminal column.
pub const CELL_WIDTH: u16 = 10;

const CREATE_BUTTON: &str = "[ + Create a note ]";

/// Left padding of a sidebar item, in cells.
pub fn item_padding(level: usize) -> u16 {
    let units = (level as u16).saturating_mul(12).saturating_add(12);
    units / CELL_WIDTH
}

/// Screen regions of the document shell, shared by drawing and mouse hit tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellAreas {
    pub sidebar: Rect,
    pub resize_handle: Option<Rect>,
    pub collapse_button: Option<Rect>,
    pub new_page: Option<Rect>,
    pub tree: Rect,
    pub navbar: Rect,
    pub menu_button: Option<Rect>,
    pub main: Rect,
    pub create_button: Option<Rect>,
}

pub fn shell_areas(area: Rect, app: &App) -> ShellAreas {
    let geometry = app.layout.resolved().unwrap_or(ResolvedGeometry {
        sidebar_width: 0,
        navbar_left: 0,
        navbar_width: area.width.saturating_mul(CELL_WIDTH),
    });
    let to_cells = |units: u16| (units / CELL_WIDTH).min(area.width);

    let sidebar_width = to_cells(geometry.sidebar_width);
    let navbar_x = to_cells(geometry.navbar_left);
    let navbar_width = to_cells(geometry.navbar_width).min(area.width - navbar_x);
    let navbar_height = area.height.min(1);

    let mut areas = ShellAreas {
        sidebar: Rect::new(area.x, area.y, sidebar_width, area.height),
        navbar: Rect::new(area.x + navbar_x, area.y, navbar_width, navbar_height),
        main: Rect::new(
            area.x + navbar_x,
            area.y + navbar_height,
            navbar_width,
            area.height - navbar_height,
        ),
        ..ShellAreas::default()
    };

    // Sidebar needs room for the handle plus some content
    if sidebar_width >= 3 {
        let sidebar = areas.sidebar;
        let content = Rect::new(sidebar.x, sidebar.y, sidebar.width - 1, sidebar.height);

        areas.resize_handle = Some(Rect::new(sidebar.right() - 1, sidebar.y, 1, sidebar.height));
        areas.collapse_button = Some(Rect::new(content.right() - 2, content.y, 1, 1));
        if content.height > 2 {
            areas.new_page = Some(Rect::new(content.x, content.y + 2, content.width, 1));
        }
        if content.height > 5 {
            areas.tree = Rect::new(content.x, content.y + 5, content.width, content.height - 5);
        }
    }

    if app.layout.is_collapsed() && areas.navbar.width >= 2 {
        areas.menu_button = Some(Rect::new(areas.navbar.x + 1, areas.navbar.y, 1, 1));
    }

    let main = areas.main;
    let button_width = CREATE_BUTTON.chars().count() as u16;
    if app.active_document.is_none() && main.width >= button_width && main.height >= 4 {
        let center_y = main.y + main.height / 2;
        areas.create_button = Some(Rect::new(
            main.x + (main.width - button_width) / 2,
            center_y + 1,
            button_width,
            1,
        ));
    }

    areas
}

pub fn draw(f: &mut Frame, app: &App) {
    // Draw based on current view
    match app.view {
        View::Login => draw_login(f, app),
        View::VerifyingAuth => draw_loading(f, "Verifying authentication..."),
        View::Documents => draw_documents(f, app),
    }

    if let Some(ref notice) = app.notice {
        draw_notice(f, notice.kind, &notice.message);
    }

    // Draw error overlay if present
    if let Some(ref error) = app.error_message {
        draw_error_popup(f, error);
    }

    // Draw loading overlay if loading
    if app.loading {
        draw_loading_overlay(f, &app.loading_message);
    }
}

fn draw_login(f: &mut Frame, app: &App) {
    let area = f.area();

    // Center the token form
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(9),
            Constraint::Percentage(30),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical[1]);

    let form_area = horizontal[1];

    let form_block = Block::default()
        .title(" Sign in to Jotion ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = form_block.inner(form_area);
    f.render_widget(form_block, form_area);

    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Token
            Constraint::Length(2), // Submit hint
            Constraint::Min(0),    // Spacer
        ])
        .split(inner);

    let field_style = if app.vim_mode == VimMode::Insert {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let token_block = Block::default()
        .title(" Access token ")
        .borders(Borders::ALL)
        .border_style(field_style);

    // Keep the tail visible while pasting long tokens
    let visible = form_chunks[0].width.saturating_sub(2) as usize;
    let shown: String = {
        let chars: Vec<char> = app.token_input.chars().collect();
        let start = chars.len().saturating_sub(visible);
        chars[start..].iter().collect()
    };
    f.render_widget(Paragraph::new(shown.as_str()).block(token_block), form_chunks[0]);

    let hint = match app.vim_mode {
        VimMode::Normal => "'i' edit | Enter submit | 'q' quit",
        VimMode::Insert => "Paste token | Esc normal | Enter submit",
    };
    let hint = Paragraph::new(hint)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint, form_chunks[1]);

    if app.vim_mode == VimMode::Insert {
        f.set_cursor_position((
            form_chunks[0].x + 1 + shown.chars().count() as u16,
            form_chunks[0].y + 1,
        ));
    }
}

fn draw_documents(f: &mut Frame, app: &App) {
    let areas = shell_areas(f.area(), app);

    draw_sidebar(f, &areas, app);
    draw_navbar(f, &areas, app);
    draw_main(f, &areas, app);
}

fn draw_sidebar(f: &mut Frame, areas: &ShellAreas, app: &App) {
    if areas.sidebar.width == 0 {
        return;
    }

    // Dimmed while a collapse/expand transition is running
    let base = if app.layout.is_resetting() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    f.render_widget(Block::default().style(base), areas.sidebar);

    if let Some(button) = areas.collapse_button {
        let header_area = Rect::new(areas.sidebar.x, areas.sidebar.y, button.x - areas.sidebar.x, 1);
        let header = Paragraph::new(Line::from(Span::styled(
            format!(" {}'s Jotion", app.display_name()),
            base.add_modifier(Modifier::BOLD),
        )));
        f.render_widget(header, header_area);
        f.render_widget(
            Paragraph::new("«").style(Style::default().fg(Color::Gray)),
            button,
        );
    }

    if let Some(new_page) = areas.new_page {
        f.render_widget(
            Paragraph::new(" + New page").style(base.fg(Color::Gray)),
            new_page,
        );
        let label_area = Rect::new(new_page.x, new_page.y + 2, new_page.width, 1);
        f.render_widget(
            Paragraph::new(" Documents").style(Style::default().fg(Color::DarkGray)),
            label_area,
        );
    }

    draw_tree(f, areas.tree, app);

    if let Some(handle) = areas.resize_handle {
        let style = if app.layout.is_resizing() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let bar: Vec<Line> = (0..handle.height).map(|_| Line::from("│")).collect();
        f.render_widget(Paragraph::new(bar).style(style), handle);
    }
}

fn draw_tree(f: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }

    let rows = app.tree.rows();
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(app.tree_scroll)
        .take(area.height as usize)
        .map(|(i, row)| {
            let padding = " ".repeat(item_padding(row.level()) as usize);
            match row {
                TreeRow::Document {
                    document,
                    expanded,
                    ..
                } => {
                    let chevron = if *expanded { "▾" } else { "▸" };
                    let icon = document.icon.as_deref().unwrap_or("📄");
                    let mut style = Style::default();
                    if app.active_document == Some(document.id) {
                        style = style.fg(Color::Cyan);
                    }
                    if i == app.selected_row {
                        style = style.bg(Color::DarkGray).fg(Color::White);
                    }
                    Line::from(vec![
                        Span::raw(padding),
                        Span::styled(chevron, Style::default().fg(Color::DarkGray)),
                        Span::raw(" "),
                        Span::raw(format!("{} ", icon)),
                        Span::styled(document.title.clone(), style),
                    ])
                }
                TreeRow::Empty { .. } => Line::from(vec![
                    Span::raw(padding),
                    Span::styled(
                        "No pages inside",
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    ),
                ]),
            }
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_navbar(f: &mut Frame, areas: &ShellAreas, app: &App) {
    if areas.navbar.width == 0 {
        return;
    }

    let title = app
        .active_document
        .and_then(|id| app.tree.find(id))
        .map(|d| d.title.as_str())
        .unwrap_or("Documents");

    let mut spans = vec![Span::raw(" ")];
    if areas.menu_button.is_some() {
        spans.push(Span::styled("☰", Style::default().fg(Color::Gray)));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(title, Style::default().fg(Color::Yellow)));

    f.render_widget(Paragraph::new(Line::from(spans)), areas.navbar);
}

fn draw_main(f: &mut Frame, areas: &ShellAreas, app: &App) {
    let main = areas.main;
    if main.width == 0 || main.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Page
            Constraint::Length(1), // Status bar
        ])
        .split(main);

    match app.active_document.and_then(|id| app.tree.find(id)) {
        Some(document) => {
            let body = document.content.as_deref().unwrap_or("Empty page");
            let page = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    document.title.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(body, Style::default().fg(Color::Gray))),
            ])
            .wrap(Wrap { trim: false })
            .block(Block::default().padding(ratatui::widgets::Padding::horizontal(4)));
            f.render_widget(page, chunks[0]);
        }
        None => {
            if let Some(button) = areas.create_button {
                let welcome_area = Rect::new(main.x, button.y - 2, main.width, 1);
                f.render_widget(
                    Paragraph::new(format!("Welcome to {}'s Jotion", app.display_name()))
                        .style(Style::default().add_modifier(Modifier::BOLD))
                        .alignment(Alignment::Center),
                    welcome_area,
                );
                f.render_widget(
                    Paragraph::new(CREATE_BUTTON).style(Style::default().fg(Color::Cyan)),
                    button,
                );
            }
        }
    }

    draw_status_bar(f, chunks[1]);
}

fn draw_status_bar(f: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
        Span::raw(" "),
        Span::styled(
            "n: new | a: add inside | l/h: expand | Enter: open | [ ]: sidebar | q: quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    f.render_widget(status, area);
}

fn draw_notice(f: &mut Frame, kind: NoticeKind, message: &str) {
    let area = f.area();
    let width = (message.chars().count() as u16 + 4).min(area.width);
    if area.height < 3 || width == 0 {
        return;
    }
    let rect = Rect::new(area.right() - width, area.bottom() - 3, width, 3);

    let color = match kind {
        NoticeKind::Success => Color::Green,
        NoticeKind::Error => Color::Red,
    };

    f.render_widget(Clear, rect);
    let text = Paragraph::new(message)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(text, rect);
}

fn draw_loading(f: &mut Frame, message: &str) {
    let area = f.area();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(block, area);

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);

    let center = centered_rect(50, 20, area);
    f.render_widget(text, center);
}

fn draw_loading_overlay(f: &mut Frame, message: &str) {
    let area = centered_rect(40, 10, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Loading ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(block);

    f.render_widget(text, area);
}

fn draw_error_popup(f: &mut Frame, error: &str) {
    let area = centered_rect(60, 20, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = Paragraph::new(error)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(text, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
