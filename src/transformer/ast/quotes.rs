//! String literal quote normalization
//!
//! The code generator prints a string literal from its raw source text when
//! one is present. Rewriting the raw text here switches the delimiter while
//! keeping the literal's value.

use crate::config::QuoteStyle;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

pub struct QuoteNormalizer {
    quote: char,
    changes_made: usize,
    in_jsx_attr: bool,
}

impl QuoteNormalizer {
    /// Returns `None` for `QuoteStyle::Preserve`
    pub fn new(style: QuoteStyle) -> Option<Self> {
        let quote = match style {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
            QuoteStyle::Preserve => return None,
        };
        Some(Self {
            quote,
            changes_made: 0,
            in_jsx_attr: false,
        })
    }

    pub fn changes_count(&self) -> usize {
        self.changes_made
    }
}

impl VisitMut for QuoteNormalizer {
    fn visit_mut_str(&mut self, node: &mut Str) {
        if self.in_jsx_attr {
            return;
        }
        let Some(raw) = &node.raw else {
            return;
        };
        if let Some(requoted) = requote(raw, self.quote) {
            node.raw = Some(requoted.into());
            self.changes_made += 1;
        }
    }

    // JSX attribute strings have no escape sequences
    fn visit_mut_jsx_attr_value(&mut self, node: &mut JSXAttrValue) {
        let outer = std::mem::replace(&mut self.in_jsx_attr, true);
        node.visit_mut_children_with(self);
        self.in_jsx_attr = outer;
    }

    fn visit_mut_jsx_expr_container(&mut self, node: &mut JSXExprContainer) {
        let outer = std::mem::replace(&mut self.in_jsx_attr, false);
        node.visit_mut_children_with(self);
        self.in_jsx_attr = outer;
    }
}

/// Re-delimit a quoted literal with `quote`, or `None` if nothing changes
pub fn requote(raw: &str, quote: char) -> Option<String> {
    let mut chars = raw.chars();
    let open = chars.next()?;
    if open == quote || !matches!(open, '\'' | '"') || raw.len() < 2 || !raw.ends_with(open) {
        return None;
    }

    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(raw.len() + 2);
    out.push(quote);

    let mut inner_chars = inner.chars();
    while let Some(c) = inner_chars.next() {
        match c {
            '\\' => match inner_chars.next() {
                Some(escaped) if escaped == open => out.push(escaped),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => out.push('\\'),
            },
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }

    out.push(quote);
    Some(out)
}
