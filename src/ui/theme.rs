use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub goroutine_id: Color, // Red for goroutine ids
    pub package: Color,      // Mauve for package paths
    pub function: Color,     // Blue for function names
    pub age: Color,          // Yellow for ages and group labels
    pub match_bg: Color,     // Filter match highlight
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    comment: Color::Rgb(108, 112, 134),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
    goroutine_id: Color::Rgb(243, 139, 168),
    package: Color::Rgb(203, 166, 247),
    function: Color::Rgb(137, 180, 250),
    age: Color::Rgb(249, 226, 175),
    match_bg: Color::Rgb(250, 179, 135),
};
