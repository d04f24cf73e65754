//! Property tests for the tree builder.
//!
//! `Markup` generates well-nested documents with attributes in every quoting
//! style; `TagSoup` generates unbalanced tag streams that exercise implicit
//! closing and end-tag recovery.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use sift_dom::{DomTree, NodeId, NodeKind, Renderer};
use sift_html::{ParseOptions, parse_document};

const TAGS: &[&str] = &["div", "span", "em", "section", "article", "a"];
const SOUP_TAGS: &[&str] = &["div", "p", "li", "ul", "b", "i", "table", "tr", "td", "span"];
const ATTR_NAMES: &[&str] = &["id", "title", "href", "data-x", "checked"];
const WORD_CHARS: &[char] = &[
    'a', 'b', 'c', 'x', 'y', 'z', 'K', 'Q', '0', '1', '7', '9',
];

fn pick<'a>(g: &mut Gen, items: &[&'a str]) -> &'a str {
    g.choose(items).copied().unwrap()
}

fn below(g: &mut Gen, n: usize) -> usize {
    usize::arbitrary(g) % n
}

fn word(g: &mut Gen) -> String {
    let len = 1 + below(g, 6);
    (0..len).map(|_| *g.choose(WORD_CHARS).unwrap()).collect()
}

fn text(g: &mut Gen) -> String {
    let mut out = word(g);
    for _ in 0..below(g, 3) {
        out.push(' ');
        out.push_str(&word(g));
    }
    out
}

#[derive(Debug, Clone)]
struct Markup(String);

impl Arbitrary for Markup {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut out = String::new();
        let depth = g.size().min(4);
        write_nodes(g, depth, &mut out);
        Self(out)
    }
}

fn write_nodes(g: &mut Gen, depth: usize, out: &mut String) {
    for _ in 0..below(g, 4) {
        match below(g, 4) {
            0 => out.push_str(&format!("<!-- {} -->", text(g))),
            1 | 2 if depth > 0 => write_element(g, depth - 1, out),
            _ => out.push_str(&text(g)),
        }
    }
}

fn write_element(g: &mut Gen, depth: usize, out: &mut String) {
    let tag = pick(g, TAGS);
    out.push('<');
    out.push_str(tag);
    for name in ATTR_NAMES {
        if !bool::arbitrary(g) {
            continue;
        }
        out.push_str(pick(g, &[" ", "  ", "\t"]));
        let value = word(g);
        let attr = match below(g, 5) {
            0 => format!("{name}=\"{value}\""),
            1 => format!("{name}='{value}'"),
            2 => format!("{name}={value}"),
            3 => format!("{name} = \"{value}\""),
            _ => (*name).to_string(),
        };
        out.push_str(&attr);
    }
    if below(g, 5) == 0 {
        out.push_str(" />");
        return;
    }
    out.push_str(pick(g, &["", " "]));
    out.push('>');
    write_nodes(g, depth, out);
    out.push_str(&format!("</{tag}>"));
}

#[derive(Debug, Clone)]
struct TagSoup(String);

impl Arbitrary for TagSoup {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut out = String::new();
        let len = below(g, g.size().max(1) * 2);
        for _ in 0..len {
            match below(g, 6) {
                0 | 1 => out.push_str(&format!("<{}>", pick(g, SOUP_TAGS))),
                2 => out.push_str(&format!("</{}>", pick(g, SOUP_TAGS))),
                3 => out.push_str(&format!("<!--{}-->", word(g))),
                4 => out.push_str(" < "),
                _ => out.push_str(&text(g)),
            }
        }
        Self(out)
    }
}

fn parse(html: &str) -> DomTree {
    parse_document(html, &ParseOptions::default()).tree
}

fn render(tree: &DomTree) -> String {
    Renderer::new(tree).outer_text(NodeId::ROOT)
}

#[quickcheck]
fn prop_markup_round_trips(markup: Markup) -> bool {
    render(&parse(&markup.0)) == markup.0
}

#[quickcheck]
fn prop_tag_soup_round_trips(soup: TagSoup) -> bool {
    render(&parse(&soup.0)) == soup.0
}

#[quickcheck]
fn prop_reparse_is_stable(soup: TagSoup) -> bool {
    let once = render(&parse(&soup.0.replace(' ', "\r\n")));
    render(&parse(&once)) == once
}

#[quickcheck]
fn prop_closed_ranges_cover_descendants(soup: TagSoup) -> bool {
    let tree = parse(&soup.0);
    tree.iter()
        .filter(|(_, n)| n.kind == NodeKind::Element && n.end != 0)
        .all(|(id, node)| {
            tree.iter().all(|(other, _)| {
                let inside = other.0 > id.0 && other.0 < node.end;
                inside == tree.ancestors(other).any(|a| a == id)
            })
        })
}

#[quickcheck]
fn prop_children_are_element_child_nodes(soup: TagSoup) -> bool {
    let tree = parse(&soup.0);
    tree.iter().all(|(id, _)| {
        let elements: Vec<NodeId> = tree
            .child_nodes(id)
            .iter()
            .copied()
            .filter(|&c| tree.get(c).is_some_and(|n| n.kind == NodeKind::Element))
            .collect();
        tree.children(id) == elements.as_slice()
    })
}

#[quickcheck]
fn prop_sequence_numbers_follow_document_order(markup: Markup) -> bool {
    let tree = parse(&markup.0);
    let offsets: Vec<usize> = tree.iter().skip(1).map(|(_, n)| n.tag_offset).collect();
    offsets.windows(2).all(|w| w[0] < w[1])
}
