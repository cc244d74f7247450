//! Tag-soup body tree.
//!
//! The domain builder only needs two things from a markup engine: select
//! descendants by `a > b` paths (comma-separated alternatives) and read the
//! flattened text of a node. [`TagTree`] is that interface; [`HtmlTagTree`]
//! backs it with `scraper`.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use ofx_core::{OfxError, OfxResult};
use regex::{Captures, Regex};
use scraper::{ElementRef, Html, Selector};

pub trait TagTree {
    type Node<'a>: Copy
    where
        Self: 'a;

    fn root(&self) -> Self::Node<'_>;

    /// Descendants of `scope` matching `pattern`, in document order.
    /// Tag names match case-insensitively.
    fn select<'a>(
        &'a self,
        scope: Self::Node<'a>,
        pattern: &str,
    ) -> OfxResult<Vec<Self::Node<'a>>>;

    /// All text under `node`, trimmed.
    fn text(&self, node: Self::Node<'_>) -> String;

    fn first_text<'a>(&'a self, scope: Self::Node<'a>, pattern: &str) -> OfxResult<Option<String>> {
        Ok(self
            .select(scope, pattern)?
            .into_iter()
            .next()
            .map(|node| self.text(node)))
    }

    fn exists<'a>(&'a self, scope: Self::Node<'a>, pattern: &str) -> OfxResult<bool> {
        Ok(!self.select(scope, pattern)?.is_empty())
    }
}

/// An OFX SGML body parsed by html5ever.
#[derive(Debug)]
pub struct HtmlTagTree {
    html: Html,
}

impl HtmlTagTree {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_fragment(&close_leaf_tags(body)),
        }
    }
}

impl TagTree for HtmlTagTree {
    type Node<'a> = ElementRef<'a>;

    fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    fn select<'a>(&'a self, scope: ElementRef<'a>, pattern: &str) -> OfxResult<Vec<ElementRef<'a>>> {
        let selector = Selector::parse(&pattern.to_ascii_lowercase())
            .map_err(|_| OfxError::InvalidSelector(pattern.to_string()))?;
        Ok(scope.select(&selector).collect())
    }

    fn text(&self, node: ElementRef<'_>) -> String {
        node.text().collect::<String>().trim().to_string()
    }
}

fn around_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+<|>\s+").expect("static pattern compiles"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<(/?)([A-Za-z0-9_.]+)>").expect("static pattern compiles"))
}

fn leaf_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([A-Za-z0-9_.]+)>([^<]*)").expect("static pattern compiles"))
}

/// Upper-cased names that are closed at least as often as they are opened.
/// In SGML OFX only aggregates (`STMTTRN`, `LEDGERBAL`, ...) carry end tags.
fn aggregate_names(body: &str) -> HashSet<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for caps in tag_re().captures_iter(body) {
        let (opened, closed) = counts.entry(caps[2].to_ascii_uppercase()).or_default();
        if caps[1].is_empty() {
            *opened += 1;
        } else {
            *closed += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, (opened, closed))| *closed > 0 && closed >= opened)
        .map(|(name, _)| name)
        .collect()
}

/// Turn SGML leaf elements (`<TRNAMT>-10.00`, or an empty `<MEMO>`) into
/// closed elements so an HTML parser doesn't nest every following sibling
/// inside them. Whitespace around tags is dropped first.
pub(crate) fn close_leaf_tags(body: &str) -> String {
    let body = around_tag_re().replace_all(body, |caps: &Captures| {
        if caps[0].starts_with('>') { ">" } else { "<" }
    });
    let aggregates = aggregate_names(&body);

    leaf_re()
        .replace_all(&body, |caps: &Captures| {
            let tag = &caps[1];
            let value = &caps[2];
            let rest = &body[caps.get(0).map_or(body.len(), |m| m.end())..];
            let already_closed = rest
                .get(..tag.len() + 2)
                .is_some_and(|head| head.eq_ignore_ascii_case(&format!("</{tag}")));
            let opens_aggregate =
                value.is_empty() && aggregates.contains(&tag.to_ascii_uppercase());
            if already_closed || opens_aggregate {
                caps[0].to_string()
            } else {
                format!("<{tag}>{value}</{tag}>")
            }
        })
        .into_owned()
}
