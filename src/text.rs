use log::debug;

/// Transcript text after caption annotations have been stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedText {
    pub text: String,
    /// Bracketed caption tags that were removed, e.g. `[Música]`.
    pub annotations: Vec<String>,
}

/// Removes `[...]` caption annotations and collapses whitespace runs.
///
/// Nested brackets are removed as one annotation. An unterminated `[` and
/// everything after it is kept as literal text, as is a stray `]`.
pub fn clean_text(raw: &str) -> CleanedText {
    let mut kept = String::with_capacity(raw.len());
    let mut annotations = Vec::new();
    let mut depth = 0usize;
    let mut open_at = 0;

    for (i, c) in raw.char_indices() {
        match c {
            '[' => {
                if depth == 0 {
                    open_at = i;
                }
                depth += 1;
            }
            ']' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    annotations.push(raw[open_at..=i].to_string());
                    kept.push(' ');
                }
            }
            _ if depth == 0 => kept.push(c),
            _ => {}
        }
    }
    if depth > 0 {
        kept.push_str(&raw[open_at..]);
    }

    let text = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    debug!(
        "Cleaned transcript: {} -> {} characters, {} annotations removed",
        raw.len(),
        text.len(),
        annotations.len()
    );

    CleanedText { text, annotations }
}

/// Builds a lowercase dash-separated slug from a title.
pub fn build_uri(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        let mut buf = [0u8; 4];
        let folded: &str = match fold_accent(c) {
            Some(ascii) => ascii,
            None => c.encode_utf8(&mut buf),
        };
        if folded.bytes().all(|b| b.is_ascii_alphanumeric()) {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push_str(folded);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// ASCII spelling of a lowercase Latin letter, if it has one.
fn fold_accent(c: char) -> Option<&'static str> {
    let folded = match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => "a",
        'é' | 'è' | 'ë' | 'ê' => "e",
        'í' | 'ì' | 'ï' | 'î' => "i",
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' | 'ø' => "o",
        'ú' | 'ù' | 'ü' | 'û' => "u",
        'ñ' => "n",
        'ç' => "c",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        _ => return None,
    };
    Some(folded)
}
