use tracing::warn;

use super::error::SgfError;
use super::tree::{NodeId, NodeKind, ROOT, SgfTree};

/// Parse SGF text into a raw [`SgfTree`].
///
/// Anything outside `(`, `)`, `;` and `KEY[value]` tokens is not an error:
/// it is kept as chaff (see [`SgfTree::chaff`]) and reported as a warning.
/// Unbalanced parentheses and unterminated values are errors.
pub fn parse(input: &str) -> Result<SgfTree, SgfError> {
    let mut p = Parser::new(input);
    p.collection()?;
    let tree = p.finish();
    if !tree.chaff().is_empty() {
        warn!(chaff = tree.chaff(), "ignored stray characters in SGF");
    }
    Ok(tree)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    tree: SgfTree,
    chaff: Vec<u8>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            bytes: input.as_bytes(),
            pos: 0,
            tree: SgfTree::new(),
            chaff: Vec::new(),
        }
    }

    fn finish(mut self) -> SgfTree {
        let chaff = String::from_utf8_lossy(&self.chaff).into_owned();
        self.tree.push_chaff(&chaff);
        self.tree
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Top level scan. `open` holds the offsets of unclosed `(`.
    fn collection(&mut self) -> Result<(), SgfError> {
        let mut current: NodeId = ROOT;
        let mut open: Vec<usize> = Vec::new();

        while let Some(b) = self.peek() {
            match b {
                b'(' => {
                    open.push(self.pos);
                    current = self.tree.add_child(current, NodeKind::GameTree);
                    self.pos += 1;
                }
                b')' => {
                    if open.pop().is_none() {
                        return Err(SgfError::Unmatched {
                            brace: ')',
                            pos: self.pos,
                        });
                    }
                    current = self.tree.parent_of(current).unwrap_or(ROOT);
                    self.pos += 1;
                }
                b';' => {
                    self.pos += 1;
                    let node = self.tree.add_child(current, NodeKind::PropList);
                    self.properties(node)?;
                }
                b'\\' => {
                    self.chaff.push(b);
                    self.pos += 1;
                    if let Some(escaped) = self.advance() {
                        self.chaff.push(escaped);
                    }
                }
                b if b.is_ascii_whitespace() => self.pos += 1,
                b => {
                    self.chaff.push(b);
                    self.pos += 1;
                }
            }
        }

        match open.pop() {
            Some(pos) => Err(SgfError::Unmatched { brace: '(', pos }),
            None => Ok(()),
        }
    }

    // Property = Ident Value+, where a bare Value repeats the previous Ident.
    fn properties(&mut self, node: NodeId) -> Result<(), SgfError> {
        let mut last_key = String::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(b'(' | b')' | b';') => return Ok(()),
                Some(b'[') => {
                    let start = self.pos;
                    let value = self.prop_value()?;
                    if last_key.is_empty() {
                        self.chaff.extend_from_slice(&self.bytes[start..self.pos]);
                    } else {
                        self.add_property(node, last_key.clone(), value);
                    }
                }
                Some(b) if b.is_ascii_alphabetic() => {
                    let start = self.pos;
                    let ident = self.prop_ident();
                    self.skip_whitespace();
                    // FF[3] allowed lowercase letters in identifiers; only the capitals count.
                    let key: String = ident.chars().filter(char::is_ascii_uppercase).collect();
                    if self.peek() == Some(b'[') && !key.is_empty() {
                        let value = self.prop_value()?;
                        last_key = key;
                        self.add_property(node, last_key.clone(), value);
                    } else {
                        // Values that follow belong to the dropped identifier.
                        last_key.clear();
                        self.chaff.extend_from_slice(&self.bytes[start..self.pos]);
                    }
                }
                Some(b) => {
                    self.chaff.push(b);
                    self.pos += 1;
                }
            }
        }
    }

    fn add_property(&mut self, node: NodeId, key: String, value: String) {
        self.tree.add_child(node, NodeKind::Property { key, value });
    }

    fn prop_ident(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned()
    }

    fn prop_value(&mut self) -> Result<String, SgfError> {
        let open = self.pos;
        self.pos += 1;
        let unmatched = SgfError::Unmatched {
            brace: '[',
            pos: open,
        };
        let mut value = Vec::new();
        loop {
            match self.advance() {
                None => return Err(unmatched),
                Some(b'\\') => match self.advance() {
                    None => return Err(unmatched),
                    // Soft line break: removed together with its partner byte.
                    Some(b'\n') => {
                        if self.peek() == Some(b'\r') {
                            self.pos += 1;
                        }
                    }
                    Some(b'\r') => {
                        if self.peek() == Some(b'\n') {
                            self.pos += 1;
                        }
                    }
                    Some(ch) => value.push(ch),
                },
                Some(b']') => break,
                Some(ch) => value.push(ch),
            }
        }
        Ok(String::from_utf8_lossy(&value).into_owned())
    }
}
