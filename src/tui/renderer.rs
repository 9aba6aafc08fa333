//! Geocoder rendering
//!
//! Draws the input box and, while the dropdown is visible and non-empty, the result
//! list as an overlay directly below it. How the input line and each item look is
//! delegated to `InputRenderer` / `ItemRenderer` strategies.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::toast::{ToastState, ToastType};
use crate::types::GeocodeResult;
use crate::widget::GeocoderWidget;

/// Height of the input box including borders
pub const INPUT_HEIGHT: u16 = 3;

const DEFAULT_TITLE: &str = "Search places";

/// Input line as the user sees it
pub struct InputView<'a> {
    pub text: &'a str,
    /// Char index
    pub cursor: usize,
    pub focused: bool,
    pub loading: bool,
}

pub trait InputRenderer: Send + Sync {
    fn render_input(&self, input: &InputView<'_>) -> Line<'static>;
}

pub trait ItemRenderer: Send + Sync {
    fn render_item(&self, label: &str, item: &GeocodeResult) -> ListItem<'static>;
}

/// Text with a block cursor while focused
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainInput;

impl InputRenderer for PlainInput {
    fn render_input(&self, input: &InputView<'_>) -> Line<'static> {
        if !input.focused {
            return Line::from(input.text.to_string());
        }

        let mut chars: Vec<char> = input.text.chars().collect();
        let cursor = input.cursor.min(chars.len());
        chars.insert(cursor, '█');
        Line::from(chars.into_iter().collect::<String>())
    }
}

/// Formatted label only
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainItem;

impl ItemRenderer for PlainItem {
    fn render_item(&self, label: &str, _item: &GeocodeResult) -> ListItem<'static> {
        ListItem::new(label.to_string())
    }
}

/// Label followed by the dimmed coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailedItem;

impl ItemRenderer for DetailedItem {
    fn render_item(&self, label: &str, item: &GeocodeResult) -> ListItem<'static> {
        ListItem::new(Line::from(vec![
            Span::raw(label.to_string()),
            Span::styled(
                format!("  {:.4}, {:.4}", item.longitude(), item.latitude()),
                Style::default().fg(Color::DarkGray),
            ),
        ]))
    }
}

pub struct GeocoderView {
    input_renderer: Box<dyn InputRenderer>,
    item_renderer: Box<dyn ItemRenderer>,
}

impl Default for GeocoderView {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocoderView {
    pub fn new() -> Self {
        Self {
            input_renderer: Box::new(PlainInput),
            item_renderer: Box::new(PlainItem),
        }
    }

    pub fn with_input_renderer(mut self, renderer: impl InputRenderer + 'static) -> Self {
        self.input_renderer = Box::new(renderer);
        self
    }

    pub fn with_item_renderer(mut self, renderer: impl ItemRenderer + 'static) -> Self {
        self.item_renderer = Box::new(renderer);
        self
    }

    /// Draw the widget into `area` (the input box). Returns the dropdown rect when
    /// one was drawn, so the caller can map mouse clicks back to items.
    pub fn render(&self, f: &mut Frame, area: Rect, widget: &GeocoderWidget) -> Option<Rect> {
        self.render_input_box(f, area, widget);

        let items = widget.visible_results();
        if items.is_empty() {
            return None;
        }

        let dropdown = dropdown_area(area, items.len(), f.size());
        if dropdown.height < 3 {
            return None;
        }
        self.render_dropdown(f, dropdown, widget);
        Some(dropdown)
    }

    fn render_input_box(&self, f: &mut Frame, area: Rect, widget: &GeocoderWidget) {
        let state = widget.state();
        let view = InputView {
            text: &state.input.text,
            cursor: state.input.cursor,
            focused: widget.is_focused(),
            loading: state.loading,
        };

        let class_name = widget.config().class_name.as_str();
        let mut title = if class_name.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            class_name.to_string()
        };
        if view.loading {
            title.push_str(" (searching...)");
        }

        let border = if view.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let input = Paragraph::new(self.input_renderer.render_input(&view))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(border),
            )
            .style(Style::default().fg(Color::White));
        f.render_widget(input, area);
    }

    fn render_dropdown(&self, f: &mut Frame, area: Rect, widget: &GeocoderWidget) {
        let results = widget.visible_results();
        let items: Vec<ListItem> = results
            .iter()
            .map(|item| {
                self.item_renderer
                    .render_item(&widget.format_item(item), item)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::White))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );

        let mut list_state = ListState::default();
        list_state.select(widget.state().selected_index);

        f.render_widget(Clear, area);
        f.render_stateful_widget(list, area, &mut list_state);
    }
}

/// Overlay rect directly below the input, clipped to the screen
pub fn dropdown_area(input: Rect, item_count: usize, screen: Rect) -> Rect {
    let y = input.y.saturating_add(input.height);
    let available = screen.y.saturating_add(screen.height).saturating_sub(y);
    let wanted = u16::try_from(item_count)
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    Rect {
        x: input.x,
        y,
        width: input.width,
        height: wanted.min(available),
    }
}

/// Index of the item under a terminal cell, if any
pub fn item_at(dropdown: Rect, column: u16, row: u16, item_count: usize) -> Option<usize> {
    let inside_x = column > dropdown.x && column < dropdown.x + dropdown.width.saturating_sub(1);
    let inside_y = row > dropdown.y && row < dropdown.y + dropdown.height.saturating_sub(1);
    if !inside_x || !inside_y {
        return None;
    }
    let index = (row - dropdown.y - 1) as usize;
    (index < item_count).then_some(index)
}

/// Render toast notification in the top-right corner
pub fn render_toast(f: &mut Frame, toast_state: &ToastState) {
    if !toast_state.visible {
        return;
    }

    let (width, height) = toast_size(&toast_state.message, f.size());
    let popup_area = top_right_rect(width, height, f.size());

    let (border_color, text_color, title) = match toast_state.toast_type {
        ToastType::Info => (Color::Blue, Color::White, "Info"),
        ToastType::Success => (Color::Green, Color::White, "Success"),
        ToastType::Warning => (Color::Yellow, Color::Black, "Warning"),
        ToastType::Error => (Color::Red, Color::White, "Error"),
    };

    let toast = Paragraph::new(toast_state.message.clone())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border_color)),
        )
        .style(Style::default().fg(text_color))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(toast, popup_area);
}

/// Toast size in cells: content plus borders and padding, at least 20 wide
pub fn toast_size(message: &str, screen: Rect) -> (u16, u16) {
    let max_width = screen.width.saturating_sub(4);
    let content_width = message.chars().count() as u16;
    let width = content_width.saturating_add(4).max(20).min(max_width);

    let text_width = width.saturating_sub(4);
    let height = wrapped_lines(message, text_width as usize) as u16 + 2;
    (width, height)
}

pub fn top_right_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.width.saturating_sub(width.saturating_add(1));
    Rect {
        x: r.x + x,
        y: r.y + 1,
        width: width.min(r.width),
        height: height.min(r.height),
    }
}

/// Number of lines needed for text when wrapped to given width
pub fn wrapped_lines(text: &str, width: usize) -> usize {
    if width == 0 {
        return text.lines().count().max(1);
    }

    text.lines()
        .map(|line| {
            let char_count = line.chars().count();
            if char_count == 0 {
                1
            } else {
                (char_count + width - 1) / width
            }
        })
        .sum::<usize>()
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_plain_input_cursor() {
        let view = InputView {
            text: "Rom",
            cursor: 1,
            focused: true,
            loading: false,
        };
        assert_eq!(line_text(&PlainInput.render_input(&view)), "R█om");

        let blurred = InputView {
            focused: false,
            ..view
        };
        assert_eq!(line_text(&PlainInput.render_input(&blurred)), "Rom");
    }

    #[test]
    fn test_dropdown_area_is_clipped() {
        let screen = Rect::new(0, 0, 80, 10);
        let input = Rect::new(0, 0, 80, INPUT_HEIGHT);

        let area = dropdown_area(input, 3, screen);
        assert_eq!(area, Rect::new(0, 3, 80, 5));

        let clipped = dropdown_area(input, 20, screen);
        assert_eq!(clipped.height, 7);

        // counts past u16 range still fill the screen
        let huge = dropdown_area(input, 65_539, screen);
        assert_eq!(huge.height, 7);
    }

    #[test]
    fn test_item_at() {
        let dropdown = Rect::new(0, 3, 40, 5);
        assert_eq!(item_at(dropdown, 5, 4, 3), Some(0));
        assert_eq!(item_at(dropdown, 5, 6, 3), Some(2));
        // border rows and columns
        assert_eq!(item_at(dropdown, 5, 3, 3), None);
        assert_eq!(item_at(dropdown, 0, 4, 3), None);
        assert_eq!(item_at(dropdown, 5, 7, 3), None);
    }

    #[test]
    fn test_wrapped_lines() {
        assert_eq!(wrapped_lines("", 10), 1);
        assert_eq!(wrapped_lines("hello", 10), 1);
        assert_eq!(wrapped_lines("hello world", 5), 3);
        assert_eq!(wrapped_lines("line1\nline2", 10), 2);
        assert!(wrapped_lines("test", 0) > 0);
    }

    #[test]
    fn test_toast_geometry() {
        let screen = Rect::new(0, 0, 80, 24);
        let (width, height) = toast_size("Selected: Paris, France", screen);
        assert!(width >= 20);
        assert!(width <= 76);
        assert!(height >= 3);

        let popup = top_right_rect(20, 5, screen);
        assert_eq!(popup.x, 59);
        assert_eq!(popup.y, 1);
    }
}
