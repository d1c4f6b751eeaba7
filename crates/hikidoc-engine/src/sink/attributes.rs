use std::collections::VecDeque;

/// Decomposed attribute bracket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub id: Option<String>,
    pub class: Option<String>,
    pub title: Option<String>,
}

impl Attributes {
    /// Splits a pending attribute string into its fields.
    ///
    /// Slots are comma separated. The first slot is the id unless it starts
    /// with a quote, the next is the class under the same rule, and whatever
    /// remains (commas included) is the title with one level of surrounding
    /// quotes removed. Empty fields become `None`.
    pub fn parse(raw: &str) -> Self {
        let mut slots: VecDeque<&str> = if raw.is_empty() {
            VecDeque::new()
        } else {
            raw.split(',').collect()
        };

        let take_unquoted = |slots: &mut VecDeque<&str>| {
            let quoted = slots
                .front()
                .is_some_and(|slot| slot.trim_start_matches([' ', '\t']).starts_with('"'));
            if quoted {
                None
            } else {
                non_empty(slots.pop_front().unwrap_or_default())
            }
        };
        let id = take_unquoted(&mut slots);
        let class = take_unquoted(&mut slots);

        let title = if slots.is_empty() {
            None
        } else {
            let joined = slots.into_iter().collect::<Vec<_>>().join(",");
            non_empty(unquote(&joined))
        };

        Self { id, class, title }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.class.is_none() && self.title.is_none()
    }
}

fn non_empty(field: &str) -> Option<String> {
    let field = field.trim();
    (!field.is_empty()).then(|| field.to_owned())
}

fn unquote(title: &str) -> &str {
    title
        .trim_matches([' ', '\t'])
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .filter(|inner| !inner.contains('\n'))
        .unwrap_or(title)
}

/// Stack of attribute strings waiting for the next element to claim them.
///
/// Entries stay raw until popped. Popping an empty stack yields empty
/// attributes, so consumers never need to check first.
#[derive(Debug, Clone, Default)]
pub struct PendingAttributes {
    stack: Vec<String>,
}

impl PendingAttributes {
    pub fn push(&mut self, raw: String) {
        self.stack.push(raw);
    }

    pub fn pop(&mut self) -> Attributes {
        self.stack
            .pop()
            .map(|raw| Attributes::parse(&raw))
            .unwrap_or_default()
    }

    /// Pops the top entry and pushes it back with the given fields prepended,
    /// each field space-joined with the existing one.
    pub fn merge(&mut self, id: &str, class: &str, title: &str) {
        let top = self.pop();
        let join = |new: &str, old: Option<String>| {
            format!("{new} {}", old.unwrap_or_default())
                .trim()
                .to_owned()
        };
        let id = join(id, top.id);
        let class = join(class, top.class);
        let title = join(title, top.title);
        self.stack.push(format!("{id},{class},{title}"));
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
