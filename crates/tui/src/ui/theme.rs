use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub positive: Color,
    pub error: Color,
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(220, 220, 220),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(120, 160, 220),
            positive: Color::Rgb(110, 190, 120),
            error: Color::Rgb(210, 90, 90),
            border: Color::Rgb(70, 80, 90),
        }
    }
}
