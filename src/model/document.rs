/// The whole todo.txt text as an ordered list of lines.
///
/// Splitting on newlines and joining back is lossless, including a trailing
/// newline (kept as a final empty line). A file that uses `\r\n` is stored
/// without the `\r` and written back with `\r\n`. Line numbers are 1-based
/// and positional: reordering lines changes which task a number refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<String>,
    pub crlf: bool,
}

impl Document {
    pub fn from_text(text: &str) -> Self {
        let crlf = text.contains("\r\n");
        let lines = text
            .split('\n')
            .map(|l| match l.strip_suffix('\r') {
                Some(stripped) if crlf => stripped.to_string(),
                _ => l.to_string(),
            })
            .collect();
        Document { lines, crlf }
    }

    pub fn to_text(&self) -> String {
        self.lines.join(self.line_ending())
    }

    fn line_ending(&self) -> &'static str {
        if self.crlf { "\r\n" } else { "\n" }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    /// Line at a 1-based index
    pub fn line(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(|l| l.as_str())
    }

    /// Non-blank lines paired with their 1-based index
    pub fn task_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| (i + 1, l.as_str()))
    }
}
