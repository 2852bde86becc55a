//! Terminal painter - writes a [`HostTree`] subtree to a terminal.
//!
//! Text leaves are printed in tree order. Block elements (`div`, `p`,
//! headings, list items, ...) start on a fresh line and end one. Boolean
//! attributes named after [`Attr`] flags (`bold`, `italic`, ...) style the
//! text below them; styles are inherited by descendants.
//!
//! ```ignore
//! let mut stdout = std::io::stdout();
//! terminal::paint(engine.host(), container, &mut stdout)?;
//! ```

use std::io::Write;

use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};

use super::memory::{HostId, HostNode, HostTree};
use crate::error::HostError;
use crate::primitives::PropValue;
use crate::types::Attr;

/// Tags painted as blocks.
pub const BLOCK_TAGS: &[&str] = &[
    "div", "p", "section", "article", "header", "footer", "main", "nav", "ul", "ol", "li", "h1",
    "h2", "h3", "h4", "h5", "h6", "pre", "blockquote",
];

pub fn is_block(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

/// Attributes switched on by a node's boolean properties.
pub fn attrs_of(node: &HostNode) -> Attr {
    Attr::PROPERTY_NAMES
        .iter()
        .filter(|(_, name)| node.attribute(name).and_then(PropValue::as_bool) == Some(true))
        .fold(Attr::NONE, |attrs, (attr, _)| attrs | *attr)
}

fn crossterm_attributes(attrs: Attr) -> impl Iterator<Item = Attribute> {
    [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::BLINK, Attribute::SlowBlink),
        (Attr::INVERSE, Attribute::Reverse),
        (Attr::HIDDEN, Attribute::Hidden),
        (Attr::STRIKETHROUGH, Attribute::CrossedOut),
    ]
    .into_iter()
    .filter(move |(flag, _)| attrs.contains(*flag))
    .map(|(_, attribute)| attribute)
}

enum Step {
    Enter(HostId, Attr),
    Leave { block: bool },
}

/// Paint the subtree under `root` (excluding `root`'s own tag) to `out`.
pub fn paint<W: Write>(tree: &HostTree, root: HostId, out: &mut W) -> Result<(), HostError> {
    walk(tree, root, out, true)?;
    out.flush()?;
    Ok(())
}

/// Plain-text rendering of the subtree under `root`, without styling.
pub fn render_to_string(tree: &HostTree, root: HostId) -> Result<String, HostError> {
    let mut buffer = Vec::new();
    walk(tree, root, &mut buffer, false)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn walk<W: Write>(
    tree: &HostTree,
    root: HostId,
    out: &mut W,
    styled: bool,
) -> Result<(), HostError> {
    let mut at_line_start = true;
    let mut stack: Vec<Step> = tree
        .children(root)
        .iter()
        .rev()
        .map(|&child| Step::Enter(child, Attr::NONE))
        .collect();

    while let Some(step) = stack.pop() {
        let (id, inherited) = match step {
            Step::Enter(id, inherited) => (id, inherited),
            Step::Leave { block } => {
                if block && !at_line_start {
                    queue!(out, Print("\n"))?;
                    at_line_start = true;
                }
                continue;
            }
        };

        let node = tree
            .node(id)
            .ok_or_else(|| HostError::UnknownNode(id.to_string()))?;

        if let Some(text) = node.text() {
            if text.is_empty() {
                continue;
            }
            let attrs = inherited | attrs_of(node);
            if styled && !attrs.is_empty() {
                for attribute in crossterm_attributes(attrs) {
                    queue!(out, SetAttribute(attribute))?;
                }
                queue!(out, Print(text), SetAttribute(Attribute::Reset))?;
            } else {
                queue!(out, Print(text))?;
            }
            at_line_start = text.ends_with('\n');
            continue;
        }

        let block = node.tag().is_some_and(is_block);
        if block && !at_line_start {
            queue!(out, Print("\n"))?;
            at_line_start = true;
        }

        let attrs = inherited | attrs_of(node);
        stack.push(Step::Leave { block });
        stack.extend(
            node.children()
                .iter()
                .rev()
                .map(|&child| Step::Enter(child, attrs)),
        );
    }

    Ok(())
}
