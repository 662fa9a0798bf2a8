//! Tree builder: token stream to a flat stream of elements.
//!
//! Openers are emitted as soon as their pending window closes (the next tag
//! arrives or input ends); a matched closing tag emits a second, marker
//! element whose `closes` field names the opener it paired with. Downstream
//! stages use those markers to segment and nest; unmatched closers emit
//! nothing at all.

use std::collections::VecDeque;

use crate::error::Result;
use crate::tree::policy::{MatchPolicy, OpenElement};
use crate::types::{Element, ElementId, Token, TokenKind};

/// The currently accumulating opener plus its trailing text tokens.
struct PendingWindow {
    opener: Token,
    trailing: Vec<Token>,
}

/// Stack-based element builder over a token stream.
pub struct TreeBuilder<I, P> {
    tokens: I,
    policy: P,
    stack: Vec<OpenElement>,
    window: Option<PendingWindow>,
    next_id: u64,
    queued: VecDeque<Element>,
    done: bool,
}

impl<I, P> TreeBuilder<I, P>
where
    I: Iterator<Item = Result<Token>>,
    P: MatchPolicy,
{
    /// Create a builder over `tokens` resolving closers with `policy`.
    pub fn new(tokens: I, policy: P) -> Self {
        Self {
            tokens,
            policy,
            stack: Vec::new(),
            window: None,
            next_id: 0,
            queued: VecDeque::new(),
            done: false,
        }
    }

    fn fresh_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Finalize the pending window into an element, push it on the stack of
    /// open candidates, and queue it for emission.
    fn flush_window(&mut self) {
        let Some(window) = self.window.take() else {
            return;
        };

        let text: String = window.trailing.iter().map(|t| t.text.as_str()).collect();
        let text = text.trim();
        let (end_offset, end_line) = match window.trailing.last() {
            Some(last) => (last.end_offset, last.end_line),
            None => (window.opener.end_offset, window.opener.end_line),
        };

        let id = self.fresh_id();
        let name = window
            .opener
            .tag_name()
            .unwrap_or_default()
            .to_string();

        self.stack.push(OpenElement {
            id,
            name: name.clone(),
            begin_line: window.opener.begin_line,
        });

        self.queued.push_back(Element {
            id,
            name,
            text: (!text.is_empty()).then(|| text.to_string()),
            children: Vec::new(),
            closes: None,
            begin_offset: window.opener.begin_offset,
            end_offset,
            begin_line: window.opener.begin_line,
            end_line,
        });
    }

    /// Resolve a closing tag token against the stack and queue the marker
    /// element if an opener matched.
    fn handle_closer(&mut self, token: &Token, name: &str) {
        let resolution = self.policy.resolve(&mut self.stack, name);

        for lost in &resolution.discarded {
            tracing::warn!(
                element = %lost.name,
                line = lost.begin_line,
                closer = %name,
                "unclosed element discarded while matching a closing tag"
            );
        }

        match resolution.opener {
            Some(opener) => {
                let id = self.fresh_id();
                self.queued.push_back(Element {
                    id,
                    name: name.to_string(),
                    text: None,
                    children: Vec::new(),
                    closes: Some(opener.id),
                    begin_offset: token.begin_offset,
                    end_offset: token.end_offset,
                    begin_line: token.begin_line,
                    end_line: token.end_line,
                });
            }
            None => {
                tracing::debug!(
                    closer = %name,
                    line = token.begin_line,
                    "closing tag without an opener dropped"
                );
            }
        }
    }
}

impl<I, P> Iterator for TreeBuilder<I, P>
where
    I: Iterator<Item = Result<Token>>,
    P: MatchPolicy,
{
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.queued.pop_front() {
                return Some(Ok(element));
            }
            if self.done {
                return None;
            }

            match self.tokens.next() {
                Some(Ok(token)) => {
                    if token.is_closing_tag() {
                        let name = token.tag_name().unwrap_or_default().to_string();
                        self.flush_window();
                        self.handle_closer(&token, &name);
                    } else if matches!(token.kind, TokenKind::Tag { .. }) {
                        self.flush_window();
                        self.window = Some(PendingWindow {
                            opener: token,
                            trailing: Vec::new(),
                        });
                    } else if let Some(window) = self.window.as_mut() {
                        window.trailing.push(token);
                    }
                    // Text outside any open window is not expected in this
                    // format and is not retained at this stage.
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    self.flush_window();
                }
            }
        }
    }
}
