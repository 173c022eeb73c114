//! Paragraph shaping and flowing text into a rectangular frame.
//!
//! Whitespace, newlines included, collapses to single spaces and lines
//! break greedily at word boundaries. Only `<br/>` forces a break. A handful of entities
//! are decoded so that markup-sensitive characters can be written.

use crate::canvas::Canvas;
use crate::error::Result;
use crate::style::{Alignment, TextStyle};
use tracing::warn;

/// Horizontal padding inside every frame, in points
pub const FRAME_SIDE_PADDING: f32 = 6.0;

/// Slack allowed when deciding whether another line fits
const FIT_TOLERANCE: f32 = 1e-3;

const BREAKS: &[&str] = &["<br/>", "<br />", "<br>", "<BR/>", "<BR />", "<BR>"];

const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&nbsp;", " "),
    ("&amp;", "&"),
];

fn decode_entities(word: &str) -> String {
    if !word.contains('&') {
        return word.to_string();
    }
    let mut out = String::with_capacity(word.len());
    let mut rest = word;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, text)) => {
                out.push_str(text);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// One laid-out line and its width in points.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub width: f32,
}

/// Styled text split into hard-broken blocks of words.
#[derive(Debug, Clone)]
pub struct Paragraph<'a> {
    blocks: Vec<Vec<String>>,
    style: &'a TextStyle,
}

impl<'a> Paragraph<'a> {
    pub fn new(markup: &str, style: &'a TextStyle) -> Self {
        let mut text = markup.to_string();
        for br in &BREAKS[1..] {
            text = text.replace(br, BREAKS[0]);
        }

        let blocks = if text.trim().is_empty() {
            Vec::new()
        } else {
            text.split(BREAKS[0])
                .map(|block| block.split_whitespace().map(decode_entities).collect())
                .collect()
        };

        Self { blocks, style }
    }

    pub fn style(&self) -> &TextStyle {
        self.style
    }

    /// Break the paragraph into lines no wider than `max_width` where
    /// possible. A single word wider than `max_width` gets a line to itself.
    pub fn wrap(&self, max_width: f32) -> Vec<Line> {
        let space = self.style.text_width(" ");
        let mut lines = Vec::new();

        for block in &self.blocks {
            let mut current = Line {
                text: String::new(),
                width: 0.0,
            };
            for word in block {
                let width = self.style.text_width(word);
                if current.text.is_empty() {
                    current.text.push_str(word);
                    current.width = width;
                } else if current.width + space + width <= max_width + FIT_TOLERANCE {
                    current.text.push(' ');
                    current.text.push_str(word);
                    current.width += space + width;
                } else {
                    lines.push(std::mem::replace(
                        &mut current,
                        Line {
                            text: word.clone(),
                            width,
                        },
                    ));
                }
            }
            lines.push(current);
        }

        lines
    }
}

// ============================================================================
// Frame
// ============================================================================

/// Rectangle that text is flowed into, top down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn inner_width(&self) -> f32 {
        self.width - 2.0 * FRAME_SIDE_PADDING
    }

    /// How many lines of `style` fit in the frame height
    pub fn capacity(&self, style: &TextStyle) -> usize {
        if style.leading <= 0.0 {
            return usize::MAX;
        }
        ((self.height + FIT_TOLERANCE) / style.leading).floor().max(0.0) as usize
    }

    /// Lay `paragraph` out and draw it. The first baseline sits one font
    /// size below the top edge; lines that do not fit are dropped.
    /// Returns the number of lines drawn.
    pub fn flow<C: Canvas + ?Sized>(&self, canvas: &mut C, paragraph: &Paragraph) -> Result<usize> {
        let style = paragraph.style();
        let inner = self.inner_width();
        let lines = paragraph.wrap(inner);
        let fit = self.capacity(style).min(lines.len());

        if fit < lines.len() {
            warn!(
                "text does not fit its frame, dropped {} of {} line(s) starting {:?}",
                lines.len() - fit,
                lines.len(),
                lines[fit].text
            );
        }

        let top = self.y + self.height;
        for (k, line) in lines.iter().take(fit).enumerate() {
            if line.text.is_empty() {
                continue;
            }
            let baseline = top - style.font_size - k as f32 * style.leading;
            let x = match style.alignment {
                Alignment::Left => self.x + FRAME_SIDE_PADDING,
                Alignment::Center => self.x + FRAME_SIDE_PADDING + (inner - line.width) / 2.0,
            };
            canvas.draw_text(&line.text, x, baseline, style)?;
        }

        Ok(fit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{Op, RecordingCanvas};
    use crate::style::{Font, StyleOptions};

    fn courier(size: f32, alignment: Alignment) -> TextStyle {
        // Courier: every character is 0.6 em wide
        TextStyle::resolve(&StyleOptions {
            font: Some(Font::Courier),
            font_size: Some(size),
            leading: Some(size * 1.1),
            alignment: Some(alignment),
            ..Default::default()
        })
    }

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn whitespace_collapses() {
        let style = courier(10.0, Alignment::Left);
        let p = Paragraph::new("  Best \t  Bitter  ", &style);
        assert_eq!(texts(&p.wrap(1000.0)), vec!["Best Bitter"]);
    }

    #[test]
    fn words_wrap_at_width() {
        let style = courier(10.0, Alignment::Left);
        // 6pt per character: "aaa bbb" is 42pt wide
        let p = Paragraph::new("aaa bbb ccc", &style);
        assert_eq!(texts(&p.wrap(42.0)), vec!["aaa bbb", "ccc"]);
        assert_eq!(texts(&p.wrap(41.0)), vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn long_words_overflow_on_their_own_line() {
        let style = courier(10.0, Alignment::Left);
        let p = Paragraph::new("a extraordinarily b", &style);
        assert_eq!(texts(&p.wrap(30.0)), vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn breaks_and_entities() {
        let style = courier(10.0, Alignment::Left);
        let p = Paragraph::new("Fish &amp; Chips<br/>&lt;4.0%&gt;<BR />x&nbsp;y", &style);
        assert_eq!(texts(&p.wrap(1000.0)), vec!["Fish & Chips", "<4.0%>", "x y"]);

        let p = Paragraph::new("AT&T", &style);
        assert_eq!(texts(&p.wrap(1000.0)), vec!["AT&T"]);
    }

    #[test]
    fn newlines_are_ordinary_whitespace() {
        let style = TextStyle::default();
        let p = Paragraph::new("Best\nBitter\r\n  from\rthe wood", &style);
        assert_eq!(texts(&p.wrap(1000.0)), vec!["Best Bitter from the wood"]);

        let frame = Frame::new(0.0, 0.0, 200.0, 12.0);
        let mut canvas = RecordingCanvas::default();
        let p = Paragraph::new("Best\nBitter", &style);
        assert_eq!(frame.flow(&mut canvas, &p).unwrap(), 1);
        assert_eq!(canvas.texts(), vec!["Best Bitter"]);
    }

    #[test]
    fn blank_text_has_no_lines() {
        let style = TextStyle::default();
        assert!(Paragraph::new("   ", &style).wrap(100.0).is_empty());
    }

    #[test]
    fn left_aligned_lines_step_down_by_leading() {
        let style = courier(10.0, Alignment::Left);
        let frame = Frame::new(0.0, 0.0, 54.0, 40.0);
        let p = Paragraph::new("aaa bbb", &style);
        let mut canvas = RecordingCanvas::default();

        // inner width 42pt fits "aaa bbb" on one line
        assert_eq!(frame.flow(&mut canvas, &p).unwrap(), 1);
        assert_eq!(
            canvas.ops,
            vec![Op::Text {
                text: "aaa bbb".into(),
                x: FRAME_SIDE_PADDING,
                y: 30.0
            }]
        );

        let narrow = Frame::new(0.0, 0.0, 40.0, 40.0);
        let mut canvas = RecordingCanvas::default();
        narrow.flow(&mut canvas, &p).unwrap();
        match &canvas.ops[..] {
            [Op::Text { y: y0, .. }, Op::Text { y: y1, .. }] => {
                assert!((y0 - y1 - 11.0).abs() < 1e-4);
            }
            other => panic!("expected two lines, got {:?}", other),
        }
    }

    #[test]
    fn centred_lines_are_offset_by_half_the_slack() {
        let style = courier(10.0, Alignment::Center);
        let frame = Frame::new(100.0, 0.0, 72.0, 20.0);
        let p = Paragraph::new("abc", &style);
        let mut canvas = RecordingCanvas::default();
        frame.flow(&mut canvas, &p).unwrap();

        // inner 60pt, text 18pt
        match &canvas.ops[..] {
            [Op::Text { x, .. }] => assert!((x - (100.0 + 6.0 + 21.0)).abs() < 1e-4),
            other => panic!("unexpected ops {:?}", other),
        }
    }

    #[test]
    fn lines_beyond_the_frame_height_are_dropped() {
        let style = courier(10.0, Alignment::Left);
        // 11pt leading, 25pt tall: two lines fit
        let frame = Frame::new(0.0, 0.0, 30.0, 25.0);
        let p = Paragraph::new("aaa bbb ccc ddd", &style);
        let mut canvas = RecordingCanvas::default();

        assert_eq!(frame.flow(&mut canvas, &p).unwrap(), 2);
        assert_eq!(canvas.texts(), vec!["aaa", "bbb"]);
    }
}
