use logsentinel_core::constants::messages;
use logsentinel_core::markdown::{Block, CommonMarkFormatter, Inline, MarkdownFormatter};
use logsentinel_core::{ChatMessage, ChatRole};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme::Theme;

const INDENT: &str = "  ";

static COMMONMARK: CommonMarkFormatter = CommonMarkFormatter;

/// Turns conversation messages into styled terminal lines.
pub struct ChatRenderer<'a> {
    theme: &'a Theme,
    formatter: &'a dyn MarkdownFormatter,
    show_timestamps: bool,
}

impl<'a> ChatRenderer<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            formatter: &COMMONMARK,
            show_timestamps: true,
        }
    }

    pub fn with_formatter(mut self, formatter: &'a dyn MarkdownFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    /// Every message in order, followed by the thinking placeholder while a
    /// request is outstanding.
    pub fn conversation_lines(
        &self,
        messages: &[ChatMessage],
        in_flight: bool,
    ) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for msg in messages {
            lines.extend(self.message_lines(msg));
            lines.push(Line::raw(""));
        }
        if in_flight {
            lines.push(self.header_line("LogSentinel", self.theme.model_color, None));
            lines.push(Line::from(Span::styled(
                format!("{INDENT}{}", messages::THINKING),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::DIM | Modifier::ITALIC),
            )));
        }
        lines
    }

    pub fn message_lines(&self, msg: &ChatMessage) -> Vec<Line<'static>> {
        let time = self.show_timestamps.then(|| msg.time_label());
        let mut lines = Vec::new();
        match msg.role {
            ChatRole::User => {
                lines.push(self.header_line("You", self.theme.user_color, time));
                lines.extend(self.plain_lines(&msg.text, Style::default().fg(self.theme.fg)));
            }
            ChatRole::Model => {
                lines.push(self.header_line("LogSentinel", self.theme.model_color, time));
                lines.extend(self.markdown_lines(&msg.text));
            }
            ChatRole::System => {
                lines.push(self.header_line("System", self.theme.system_color, time));
                lines.extend(self.plain_lines(
                    &msg.text,
                    Style::default()
                        .fg(self.theme.muted)
                        .add_modifier(Modifier::ITALIC),
                ));
            }
        }
        lines
    }

    fn header_line(
        &self,
        who: &str,
        color: ratatui::style::Color,
        time: Option<String>,
    ) -> Line<'static> {
        let mut spans = vec![Span::styled(
            who.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )];
        if let Some(time) = time {
            spans.push(Span::styled(
                format!("  {time}"),
                Style::default().fg(self.theme.muted),
            ));
        }
        Line::from(spans)
    }

    /// Preformatted text: one line per source line, whitespace kept.
    fn plain_lines(&self, text: &str, style: Style) -> Vec<Line<'static>> {
        if text.is_empty() {
            return vec![Line::from(Span::styled(
                format!("{INDENT}(files only)"),
                Style::default().fg(self.theme.muted),
            ))];
        }
        text.split('\n')
            .map(|line| {
                Line::from(Span::styled(
                    format!("{INDENT}{}", line.trim_end_matches('\r')),
                    style,
                ))
            })
            .collect()
    }

    fn markdown_lines(&self, text: &str) -> Vec<Line<'static>> {
        let blocks = self.formatter.render(text);
        let mut lines = Vec::new();
        for (i, block) in blocks.iter().enumerate() {
            // Consecutive list items stay together.
            let tight = i > 0
                && matches!(block, Block::ListItem { .. })
                && matches!(blocks[i - 1], Block::ListItem { .. });
            if i > 0 && !tight {
                lines.push(Line::raw(""));
            }
            self.block_lines(block, &mut lines);
        }
        lines
    }

    fn block_lines(&self, block: &Block, out: &mut Vec<Line<'static>>) {
        let theme = self.theme;
        match block {
            Block::Paragraph(content) => {
                out.extend(self.inline_lines(
                    content,
                    INDENT.to_string(),
                    Style::default().fg(theme.fg),
                ));
            }
            Block::Heading { level, content } => {
                let marker = format!("{INDENT}{} ", "#".repeat(*level as usize));
                let style = Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD);
                out.extend(self.inline_lines(content, marker, style));
            }
            Block::ListItem { depth, content } => {
                let marker = format!("{INDENT}{}• ", "  ".repeat(depth.saturating_sub(1)));
                out.extend(self.inline_lines(content, marker, Style::default().fg(theme.fg)));
            }
            Block::CodeBlock { language, code } => {
                let border = Style::default().fg(theme.muted);
                let label = language.as_deref().unwrap_or("");
                out.push(Line::from(Span::styled(format!("{INDENT}┌── {label}"), border)));
                for line in code.split('\n') {
                    out.push(Line::from(vec![
                        Span::styled(format!("{INDENT}│ "), border),
                        Span::styled(line.to_string(), Style::default().fg(theme.code_fg)),
                    ]));
                }
                out.push(Line::from(Span::styled(format!("{INDENT}└──"), border)));
            }
            Block::Rule => {
                out.push(Line::from(Span::styled(
                    format!("{INDENT}{}", "─".repeat(40)),
                    Style::default().fg(theme.muted),
                )));
            }
        }
    }

    /// Lay inline spans out on lines, starting the first with `lead` and
    /// indenting continuation lines to match.
    fn inline_lines(&self, content: &[Inline], lead: String, base: Style) -> Vec<Line<'static>> {
        let pad = " ".repeat(lead.chars().count());
        let mut lines = Vec::new();
        let mut spans = vec![Span::styled(lead, Style::default().fg(self.theme.muted))];

        for inline in content {
            match inline {
                Inline::Text(text) => spans.push(Span::styled(text.clone(), base)),
                Inline::Strong(text) => {
                    spans.push(Span::styled(text.clone(), base.add_modifier(Modifier::BOLD)))
                }
                Inline::Emphasis(text) => {
                    spans.push(Span::styled(text.clone(), base.add_modifier(Modifier::ITALIC)))
                }
                Inline::Code(code) => spans.push(Span::styled(
                    code.clone(),
                    Style::default().fg(self.theme.inline_code_fg),
                )),
                Inline::LineBreak => {
                    lines.push(Line::from(std::mem::take(&mut spans)));
                    spans.push(Span::raw(pad.clone()));
                }
            }
        }
        lines.push(Line::from(spans));
        lines
    }
}

/// Plain text of a rendered line.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
