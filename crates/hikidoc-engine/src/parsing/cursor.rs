use regex::Regex;

/// Line reader with an unbounded push-back stack.
///
/// Lines keep their trailing `\n` (CRLF is folded to LF). Pushed-back lines
/// are served last-in-first-out before the source is touched again, so a
/// speculative parse undoes itself by pushing its lines back in reverse
/// read order. Reading past the end keeps returning `None`.
#[derive(Debug, Clone, Default)]
pub struct LineCursor {
    lines: Vec<String>,
    next: usize,
    pushed: Vec<String>,
}

impl LineCursor {
    pub fn new(src: &str) -> Self {
        let lines = src
            .split_inclusive('\n')
            .map(|line| match line.strip_suffix("\r\n") {
                Some(body) => format!("{body}\n"),
                None => line.to_owned(),
            })
            .collect();
        Self {
            lines,
            next: 0,
            pushed: Vec::new(),
        }
    }

    /// Takes the next line.
    pub fn read(&mut self) -> Option<String> {
        if let Some(line) = self.pushed.pop() {
            return Some(line);
        }
        let line = self.lines.get_mut(self.next)?;
        self.next += 1;
        Some(std::mem::take(line))
    }

    /// Makes `line` the next thing [`read`](Self::read) returns.
    pub fn push_back(&mut self, line: String) {
        self.pushed.push(line);
    }

    /// Pushes a sequence back so that it reads again in its original order.
    pub fn push_back_all(&mut self, lines: impl DoubleEndedIterator<Item = String>) {
        for line in lines.rev() {
            self.push_back(line);
        }
    }

    pub fn peek(&self) -> Option<&str> {
        self.pushed
            .last()
            .or_else(|| self.lines.get(self.next))
            .map(String::as_str)
    }

    /// True when neither pushed-back nor unread source lines remain.
    pub fn at_end(&self) -> bool {
        self.pushed.is_empty() && self.next >= self.lines.len()
    }

    /// Reads the next line only if it matches `pattern`.
    pub fn read_if(&mut self, pattern: &Regex) -> Option<String> {
        if pattern.is_match(self.peek()?) {
            self.read()
        } else {
            None
        }
    }

    /// Reads lines for as long as they match `pattern`.
    pub fn read_while(&mut self, pattern: &Regex) -> Vec<String> {
        let mut taken = Vec::new();
        while let Some(line) = self.read_if(pattern) {
            taken.push(line);
        }
        taken
    }

    /// Reads lines up to, but not including, the first one matching `pattern`.
    pub fn read_until(&mut self, pattern: &Regex) -> Vec<String> {
        let mut taken = Vec::new();
        while let Some(line) = self.peek() {
            if pattern.is_match(line) {
                break;
            }
            taken.extend(self.read());
        }
        taken
    }
}
