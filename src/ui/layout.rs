use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub input_area: Rect,
    pub list_area: Rect,
    pub details_area: Option<Rect>,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Input bar for new to-dos (3 rows)
/// - Main area: List, or List (60%) | Details (40%) when a details editor is open
pub fn create_layout(area: Rect, show_details: bool) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Length(3), // Input bar
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    let (list_area, details_area) = if show_details {
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[2]);
        (horizontal[0], Some(horizontal[1]))
    } else {
        (main_chunks[2], None)
    };

    MainLayout {
        keybindings_area: main_chunks[0],
        input_area: main_chunks[1],
        list_area,
        details_area,
    }
}

/// Create centered modal area
pub fn create_modal_area(area: Rect) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(9),
            Constraint::Percentage(30),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
