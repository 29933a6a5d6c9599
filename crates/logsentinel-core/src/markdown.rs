//! Markdown → structured blocks for rendering model replies.
//!
//! Front ends only deal with [`Block`] and [`Inline`]; the parser behind
//! [`MarkdownFormatter`] can be swapped without touching them.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    /// Inline code span.
    Code(String),
    Strong(String),
    Emphasis(String),
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading { level: u8, content: Vec<Inline> },
    /// `depth` starts at 1 for a top-level list.
    ListItem { depth: usize, content: Vec<Inline> },
    /// Fenced or indented code block.
    CodeBlock { language: Option<String>, code: String },
    Rule,
}

pub trait MarkdownFormatter: Send + Sync {
    fn render(&self, text: &str) -> Vec<Block>;
}

/// CommonMark formatter backed by `pulldown-cmark`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMarkFormatter;

#[derive(Debug, Clone, Copy)]
enum Container {
    Paragraph,
    Heading(u8),
    Item(usize),
}

#[derive(Default)]
struct BlockCollector {
    blocks: Vec<Block>,
    inlines: Vec<Inline>,
    current: Option<Container>,
    list_depth: usize,
    strong: usize,
    emphasis: usize,
    code: Option<(Option<String>, String)>,
    /// Open link or image: target and the text seen so far.
    link: Option<(String, String)>,
}

impl BlockCollector {
    fn open(&mut self, container: Container) {
        self.flush();
        self.current = Some(container);
    }

    fn flush(&mut self) {
        let content = std::mem::take(&mut self.inlines);
        let container = self.current.take();
        if content.is_empty() {
            return;
        }
        let block = match container.unwrap_or(Container::Paragraph) {
            Container::Paragraph => Block::Paragraph(content),
            Container::Heading(level) => Block::Heading { level, content },
            Container::Item(depth) => Block::ListItem { depth, content },
        };
        self.blocks.push(block);
    }

    fn push_text(&mut self, text: &str) {
        if self.current.is_none() {
            self.current = Some(if self.list_depth > 0 {
                Container::Item(self.list_depth)
            } else {
                Container::Paragraph
            });
        }
        if let Some((_, seen)) = self.link.as_mut() {
            seen.push_str(text);
        }
        let inline = if self.strong > 0 {
            Inline::Strong(text.to_string())
        } else if self.emphasis > 0 {
            Inline::Emphasis(text.to_string())
        } else {
            Inline::Text(text.to_string())
        };

        match (self.inlines.last_mut(), inline) {
            (Some(Inline::Text(prev)), Inline::Text(next)) => prev.push_str(&next),
            (Some(Inline::Strong(prev)), Inline::Strong(next)) => prev.push_str(&next),
            (Some(Inline::Emphasis(prev)), Inline::Emphasis(next)) => prev.push_str(&next),
            (_, inline) => self.inlines.push(inline),
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        if self.code.is_some() {
            match event {
                Event::Text(text) => {
                    if let Some((_, code)) = self.code.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((language, mut code)) = self.code.take() {
                        if code.ends_with('\n') {
                            code.pop();
                        }
                        self.blocks.push(Block::CodeBlock { language, code });
                    }
                }
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(Tag::Paragraph) => {
                // Loose list items wrap their text in paragraphs.
                if !matches!(self.current, Some(Container::Item(_))) {
                    self.open(Container::Paragraph);
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if matches!(self.current, Some(Container::Item(_))) {
                    self.inlines.push(Inline::LineBreak);
                } else {
                    self.flush();
                }
            }
            Event::Start(Tag::Heading { level, .. }) => self.open(Container::Heading(level as u8)),
            Event::End(TagEnd::Heading(_)) => self.flush(),
            Event::Start(Tag::List(_)) => {
                self.flush();
                self.list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                self.flush();
                self.list_depth = self.list_depth.saturating_sub(1);
            }
            Event::Start(Tag::Item) => self.open(Container::Item(self.list_depth.max(1))),
            Event::End(TagEnd::Item) => {
                while matches!(self.inlines.last(), Some(Inline::LineBreak)) {
                    self.inlines.pop();
                }
                self.flush();
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((language, String::new()));
            }
            Event::Start(Tag::Link { dest_url, .. })
            | Event::Start(Tag::Image { dest_url, .. }) => {
                self.link = Some((dest_url.to_string(), String::new()));
            }
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                // Autolinks already show their target.
                if let Some((url, text)) = self.link.take() {
                    if !url.is_empty() && text != url {
                        self.push_text(&format!(" ({url})"));
                    }
                }
            }
            Event::Start(Tag::Strong) => self.strong += 1,
            Event::End(TagEnd::Strong) => self.strong = self.strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => self.emphasis += 1,
            Event::End(TagEnd::Emphasis) => self.emphasis = self.emphasis.saturating_sub(1),
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                self.push_text(&text)
            }
            Event::Code(code) => {
                if self.current.is_none() {
                    self.current = Some(Container::Paragraph);
                }
                self.inlines.push(Inline::Code(code.to_string()));
            }
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.inlines.push(Inline::LineBreak),
            Event::Rule => {
                self.flush();
                self.blocks.push(Block::Rule);
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        if let Some((language, code)) = self.code.take() {
            self.blocks.push(Block::CodeBlock { language, code });
        }
        self.blocks
    }
}

impl MarkdownFormatter for CommonMarkFormatter {
    fn render(&self, text: &str) -> Vec<Block> {
        let mut collector = BlockCollector::default();
        for event in Parser::new(text) {
            collector.handle(event);
        }
        collector.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> Vec<Block> {
        CommonMarkFormatter.render(text)
    }

    #[test]
    fn paragraph_with_inline_code_and_strong() {
        let blocks = render("Set **PORT** with `export PORT=8080` now.");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![
                Inline::Text("Set ".into()),
                Inline::Strong("PORT".into()),
                Inline::Text(" with ".into()),
                Inline::Code("export PORT=8080".into()),
                Inline::Text(" now.".into()),
            ])]
        );
    }

    #[test]
    fn fenced_code_keeps_language_and_whitespace() {
        let blocks = render("Patch:\n\n```diff\n-  a\n+  b\n```\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[1],
            Block::CodeBlock {
                language: Some("diff".into()),
                code: "-  a\n+  b".into(),
            }
        );
    }

    #[test]
    fn fence_without_language() {
        let blocks = render("```\nkubectl rollout restart deploy/api\n```");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                language: None,
                code: "kubectl rollout restart deploy/api".into(),
            }]
        );
    }

    #[test]
    fn headings_and_lists() {
        let blocks = render("## Fix\n\n- one\n- two\n  - nested\n");
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 2,
                content: vec![Inline::Text("Fix".into())],
            }
        );
        assert_eq!(
            blocks[1],
            Block::ListItem {
                depth: 1,
                content: vec![Inline::Text("one".into())],
            }
        );
        assert_eq!(
            blocks[3],
            Block::ListItem {
                depth: 2,
                content: vec![Inline::Text("nested".into())],
            }
        );
    }

    #[test]
    fn soft_breaks_join_lines() {
        let blocks = render("first line\nsecond line");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![Inline::Text(
                "first line second line".into()
            )])]
        );
    }

    #[test]
    fn link_targets_are_kept() {
        let blocks = render("See [the runbook](https://wiki.example.com/oom) first.");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![Inline::Text(
                "See the runbook (https://wiki.example.com/oom) first.".into()
            )])]
        );
    }

    #[test]
    fn autolinks_are_not_repeated() {
        let blocks = render("<https://status.example.com>");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![Inline::Text(
                "https://status.example.com".into()
            )])]
        );
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render("").is_empty());
    }
}
