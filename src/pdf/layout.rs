use pdf_writer::{Content, Name, Str};

use crate::fonts::FontEntry;

/// Regular and bold faces of the body font.
pub(crate) struct Fonts {
    pub(crate) regular: FontEntry,
    pub(crate) bold: FontEntry,
}

impl Fonts {
    pub(crate) fn get(&self, bold: bool) -> &FontEntry {
        if bold { &self.bold } else { &self.regular }
    }

    pub(crate) fn entries(&self) -> [&FontEntry; 2] {
        [&self.regular, &self.bold]
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct TextStyle {
    pub(crate) bold: bool,
    pub(crate) size: f32,
}

/// Greedy word wrap into lines no wider than `max_width`. Explicit newlines
/// start a new line; a word wider than the line is split between chars.
pub(crate) fn wrap_text(text: &str, font: &FontEntry, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let space_w = font.space_width(size);

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_w = 0.0_f32;

        for word in paragraph.split_whitespace() {
            let word_w = font.text_width(word, size);
            let gap = if line.is_empty() { 0.0 } else { space_w };
            if line_w + gap + word_w <= max_width {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
                line_w += gap + word_w;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_w = 0.0;
            }
            if word_w <= max_width {
                line.push_str(word);
                line_w = word_w;
                continue;
            }
            for ch in word.chars() {
                let mut buf = [0u8; 4];
                let ch_w = font.text_width(ch.encode_utf8(&mut buf), size);
                if !line.is_empty() && line_w + ch_w > max_width {
                    lines.push(std::mem::take(&mut line));
                    line_w = 0.0;
                }
                line.push(ch);
                line_w += ch_w;
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

/// One `Tj` per line, so each line stays a single string in the output.
pub(crate) fn draw_line(
    content: &mut Content,
    fonts: &Fonts,
    style: TextStyle,
    x: f32,
    baseline_y: f32,
    text: &str,
) {
    let font = fonts.get(style.bold);
    content.begin_text();
    content.set_font(Name(font.pdf_name.as_bytes()), style.size);
    content.next_line(x, baseline_y);
    content.show(Str(&font.encode(text)));
    content.end_text();
}

/// Draw wrapped lines top-down starting at `top`, left- or right-aligned
/// inside `[x, x + width]`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_lines(
    content: &mut Content,
    fonts: &Fonts,
    style: TextStyle,
    lines: &[String],
    x: f32,
    width: f32,
    top: f32,
    right_align: bool,
) {
    let font = fonts.get(style.bold);
    let line_h = font.line_height(style.size);
    let mut baseline = top - style.size * font.ascender_ratio;
    for line in lines {
        // a right-aligned line wider than the cell starts left of `x`
        let line_x = if right_align {
            x + width - font.text_width(line, style.size)
        } else {
            x
        };
        draw_line(content, fonts, style, line_x, baseline, line);
        baseline -= line_h;
    }
}
