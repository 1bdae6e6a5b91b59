/// Split `line` into its top-level `[...]` spans, in order.
///
/// Brackets inside JSON strings (including escaped quotes) are ignored. A
/// stray `]` at depth zero is skipped and depth never goes negative, so in
/// `] [1]` the `[1]` is still split out and processed rather than the whole
/// line being handed to the parser and rejected. When the line holds no complete
/// top-level array the whole line is returned as the only payload, so the
/// parser still sees it and reports why it is invalid.
pub fn split_payloads(line: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut depth: usize = 0;
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escape = false;

    for (i, ch) in line.char_indices() {
        if in_string {
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            ']' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        chunks.push(&line[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    if chunks.is_empty() {
        vec![line]
    } else {
        chunks
    }
}
