use crate::constants::APPROX_CHAR_WIDTH;

/// Character budget for a line `max_width` wide at `font_size`.
#[inline]
pub fn max_chars_per_line(max_width: f32, font_size: f32) -> usize {
    let char_width = font_size * APPROX_CHAR_WIDTH;
    if char_width <= 0.0 {
        return usize::MAX;
    }
    (max_width / char_width).floor().max(0.0) as usize
}

/// Greedy word wrap on single spaces using an approximate glyph width.
///
/// A word that does not fit starts a new line; a word longer than the whole
/// budget still gets a line of its own rather than being split.
pub fn wrap_text(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let max_chars = max_chars_per_line(max_width, font_size);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split(' ') {
        let word_len = word.chars().count();
        let candidate_len = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if candidate_len > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len = candidate_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_uses_point_six_em() {
        // 0.3 * 0.6 = 0.18 per char
        assert_eq!(max_chars_per_line(15.0, 0.3), 83);
        assert_eq!(max_chars_per_line(8.5, 0.3), 47);
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap_text("hello world", 15.0, 0.3), vec!["hello world"]);
    }
}
