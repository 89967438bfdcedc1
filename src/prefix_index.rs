use serde::Serialize;

/// A node in the prefix tree
#[derive(Debug, Default)]
struct PrefixNode {
    // Whether some inserted word ends exactly at this node
    terminal: bool,
    // Child edges in the order they were first created
    children: Vec<(char, PrefixNode)>,
}

impl PrefixNode {
    fn child(&self, c: char) -> Option<&PrefixNode> {
        self.children
            .iter()
            .find(|(edge, _)| *edge == c)
            .map(|(_, node)| node)
    }

    fn child_or_insert(&mut self, c: char) -> &mut PrefixNode {
        let pos = match self.children.iter().position(|(edge, _)| *edge == c) {
            Some(pos) => pos,
            None => {
                self.children.push((c, PrefixNode::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[pos].1
    }
}

/// One step of a character-by-character trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharMatch {
    #[serde(rename = "char")]
    pub ch: char,
    pub exists: bool,
}

/// Prefix tree over item names.
///
/// Built once per catalog snapshot and read-only afterwards; every query
/// takes `&self`.
#[derive(Debug, Default)]
pub struct PrefixIndex {
    root: PrefixNode,
}

impl PrefixIndex {
    /// Creates a new, empty prefix index
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a word. The empty word marks the root itself as terminal.
    pub fn insert(&mut self, word: &str) {
        let mut current_node = &mut self.root;
        for c in word.chars() {
            current_node = current_node.child_or_insert(c);
        }
        current_node.terminal = true;
    }

    /// Returns true only if `word` was inserted as a whole word.
    pub fn search_exact(&self, word: &str) -> bool {
        self.walk(word).is_some_and(|node| node.terminal)
    }

    /// Tests each character of `word` against the current traversal node.
    ///
    /// A missing character is recorded as such and the traversal stays
    /// where it was, so the following characters are tested against the
    /// same node rather than failing outright. The trace always has one
    /// record per input character.
    pub fn search_char_by_char(&self, word: &str) -> Vec<CharMatch> {
        let mut current_node = &self.root;
        word.chars()
            .map(|ch| match current_node.child(ch) {
                Some(next_node) => {
                    current_node = next_node;
                    CharMatch { ch, exists: true }
                }
                None => CharMatch { ch, exists: false },
            })
            .collect()
    }

    /// Returns every stored word starting with `prefix`.
    ///
    /// Words come out in pre-order, siblings visited in the order their
    /// edges were created. The whole set is returned; callers cap it.
    pub fn suggest_by_prefix(&self, prefix: &str) -> Vec<String> {
        let Some(start) = self.walk(prefix) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        let mut word = prefix.to_string();
        // Each entry remembers how long `word` was at its parent.
        let mut stack = vec![(start, word.len(), None)];
        while let Some((node, parent_len, edge)) = stack.pop() {
            word.truncate(parent_len);
            if let Some(c) = edge {
                word.push(c);
            }
            if node.terminal {
                result.push(word.clone());
            }
            // Reverse so the first-created edge is popped first.
            let len = word.len();
            for (c, child) in node.children.iter().rev() {
                stack.push((child, len, Some(*c)));
            }
        }
        result
    }

    /// True when no word, not even the empty one, has been inserted.
    pub fn is_empty(&self) -> bool {
        !self.root.terminal && self.root.children.is_empty()
    }

    fn walk(&self, word: &str) -> Option<&PrefixNode> {
        let mut current_node = &self.root;
        for c in word.chars() {
            current_node = current_node.child(c)?;
        }
        Some(current_node)
    }
}

impl Drop for PrefixIndex {
    // Tear the tree down level by level; the derived drop recurses once per
    // character of the longest word.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.root.children);
        while let Some((_, mut node)) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
