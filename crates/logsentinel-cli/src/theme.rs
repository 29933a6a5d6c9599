use ratatui::style::Color;

#[derive(Clone, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub user_color: Color,
    pub model_color: Color,
    pub system_color: Color,
    /// Fenced code blocks.
    pub code_fg: Color,
    /// Inline code spans.
    pub inline_code_fg: Color,
    pub border: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            bg: Color::Rgb(15, 23, 42),
            fg: Color::Rgb(226, 232, 240),
            accent: Color::Rgb(56, 189, 248),
            muted: Color::Rgb(100, 116, 139),
            success: Color::Rgb(74, 222, 128),
            error: Color::Rgb(248, 113, 113),
            warning: Color::Rgb(251, 191, 36),
            user_color: Color::Rgb(125, 211, 252),
            model_color: Color::Rgb(226, 232, 240),
            system_color: Color::Rgb(148, 163, 184),
            code_fg: Color::Rgb(134, 239, 172),
            inline_code_fg: Color::Rgb(251, 146, 60),
            border: Color::Rgb(51, 65, 85),
        }
    }

    pub fn tokyo_night() -> Self {
        Self {
            name: "tokyo-night",
            bg: Color::Rgb(26, 27, 38),
            fg: Color::Rgb(169, 177, 214),
            accent: Color::Rgb(122, 162, 247),
            muted: Color::Rgb(86, 95, 137),
            success: Color::Rgb(158, 206, 106),
            error: Color::Rgb(247, 118, 142),
            warning: Color::Rgb(224, 175, 104),
            user_color: Color::Rgb(125, 207, 255),
            model_color: Color::Rgb(192, 202, 245),
            system_color: Color::Rgb(86, 95, 137),
            code_fg: Color::Rgb(158, 206, 106),
            inline_code_fg: Color::Rgb(255, 158, 100),
            border: Color::Rgb(52, 53, 74),
        }
    }

    pub fn dracula() -> Self {
        Self {
            name: "dracula",
            bg: Color::Rgb(40, 42, 54),
            fg: Color::Rgb(248, 248, 242),
            accent: Color::Rgb(255, 121, 198),
            muted: Color::Rgb(98, 114, 164),
            success: Color::Rgb(80, 250, 123),
            error: Color::Rgb(255, 85, 85),
            warning: Color::Rgb(241, 250, 140),
            user_color: Color::Rgb(139, 233, 253),
            model_color: Color::Rgb(248, 248, 242),
            system_color: Color::Rgb(98, 114, 164),
            code_fg: Color::Rgb(80, 250, 123),
            inline_code_fg: Color::Rgb(255, 184, 108),
            border: Color::Rgb(68, 71, 90),
        }
    }

    /// Exact lookup; `None` for unknown names.
    pub fn find(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "tokyo-night" => Some(Self::tokyo_night()),
            "dracula" => Some(Self::dracula()),
            _ => None,
        }
    }

    /// Lookup that falls back to the dark theme.
    pub fn by_name(name: &str) -> Self {
        Self::find(name).unwrap_or_else(Self::dark)
    }

    pub fn all_names() -> &'static [&'static str] {
        &["dark", "tokyo-night", "dracula"]
    }
}
