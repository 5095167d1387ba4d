//! Comment removal and whitespace normalization for raw expression text.

/// Removes `//` line comments and `/* */` block comments, then collapses
/// whitespace.
///
/// The newline ending a line comment is kept so statements on adjacent lines
/// are not glued together before whitespace collapsing. An unterminated block
/// comment swallows the rest of the input.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '/' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('/') => {
                chars.next();
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            Some('*') => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }

    collapse_whitespace(&out)
}

fn collapse_whitespace(raw: &str) -> String {
    // `\r` is whitespace for `split_whitespace`, so it collapses like a space.
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
