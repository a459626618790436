use ::scraper::node::Node;
use ::scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::app::{Result, RevsieveError};
use crate::domain::ReviewRecord;
use crate::scraper::fieldmap::{FieldMap, FieldRule, Transform};

enum CompiledRule {
    Text(Selector),
    Attr(Option<Selector>, String),
    Count(Selector),
    Url(Selector, String),
    FirstOf(Vec<CompiledRule>),
}

/// Maps review elements to [`ReviewRecord`]s according to a [`FieldMap`].
///
/// The same map runs two ways: [`extraction_script`](Self::extraction_script)
/// evaluates it inside a live page, where `innerText` and `img.src` come
/// from the browser; [`extract`](Self::extract) applies it to a serialized
/// DOM snapshot. A missing sub-element gives an empty field, never a
/// dropped record.
pub struct ReviewExtractor {
    map: FieldMap,
    item: Selector,
    rules: Vec<CompiledRule>,
}

impl ReviewExtractor {
    pub fn new(map: &FieldMap) -> Result<Self> {
        let item = parse_selector(&map.item)?;
        let rules = map
            .fields
            .iter()
            .map(|spec| compile(&spec.rule))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            map: map.clone(),
            item,
            rules,
        })
    }

    /// Extract every review element in `html`, in document order.
    ///
    /// `base` is the page URL that relative image links are resolved against.
    pub fn extract(&self, html: &str, base: Option<&Url>) -> Vec<ReviewRecord> {
        let document = Html::parse_document(html);
        document
            .select(&self.item)
            .map(|el| {
                let row = self.rules.iter().map(|rule| apply(rule, el, base)).collect();
                self.record_from_row(row)
            })
            .collect()
    }

    /// Generate JavaScript that applies the map to the live document.
    ///
    /// The script returns one array of strings per review element, with
    /// values in field-map order; feed them to [`records_from_rows`](Self::records_from_rows).
    pub fn extraction_script(&self) -> String {
        let item = js_literal(&self.map.item);
        let row = self
            .map
            .fields
            .iter()
            .map(|spec| js_rule(&spec.rule))
            .collect::<Vec<_>>()
            .join(",\n                    ");

        format!(
            r#"
            (() => {{
                const text = n => (n && n.innerText) || '';
                const attr = (n, a) => (n && n.getAttribute(a)) || '';
                const count = list => list.length ? String(list.length) : '';
                const link = (n, a) => {{
                    const raw = attr(n, a).trim();
                    if (!raw) return '';
                    try {{
                        return new URL(raw, document.baseURI).href;
                    }} catch (e) {{
                        return raw;
                    }}
                }};
                return Array.from(document.querySelectorAll({item}), el => [
                    {row}
                ]);
            }})()
            "#
        )
    }

    /// Turn rows returned by the extraction script into records
    pub fn records_from_rows(&self, rows: Vec<Vec<String>>) -> Vec<ReviewRecord> {
        rows.into_iter().map(|row| self.record_from_row(row)).collect()
    }

    fn record_from_row(&self, row: Vec<String>) -> ReviewRecord {
        let mut record = ReviewRecord::default();
        for (spec, value) in self.map.fields.iter().zip(row) {
            *record.field_mut(spec.field) = match spec.transform {
                Transform::None => value,
                Transform::CollapseNewlines => collapse_newlines(&value),
            };
        }
        record
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| RevsieveError::Selector(format!("{}: {:?}", selector, e)))
}

fn compile(rule: &FieldRule) -> Result<CompiledRule> {
    Ok(match rule {
        FieldRule::Text { selector } => CompiledRule::Text(parse_selector(selector)?),
        FieldRule::Attr { selector, attr } => CompiledRule::Attr(
            selector.as_deref().map(parse_selector).transpose()?,
            attr.clone(),
        ),
        FieldRule::Count { selector } => CompiledRule::Count(parse_selector(selector)?),
        FieldRule::Url { selector, attr } => {
            CompiledRule::Url(parse_selector(selector)?, attr.clone())
        }
        FieldRule::FirstOf(rules) => {
            CompiledRule::FirstOf(rules.iter().map(compile).collect::<Result<_>>()?)
        }
    })
}

/// JavaScript expression for `rule`, evaluated with the review element bound to `el`
fn js_rule(rule: &FieldRule) -> String {
    match rule {
        FieldRule::Text { selector } => {
            format!("text(el.querySelector({}))", js_literal(selector))
        }
        FieldRule::Attr {
            selector: None,
            attr,
        } => format!("attr(el, {})", js_literal(attr)),
        FieldRule::Attr {
            selector: Some(selector),
            attr,
        } => format!(
            "attr(el.querySelector({}), {})",
            js_literal(selector),
            js_literal(attr)
        ),
        FieldRule::Count { selector } => {
            format!("count(el.querySelectorAll({}))", js_literal(selector))
        }
        FieldRule::Url { selector, attr } => format!(
            "link(el.querySelector({}), {})",
            js_literal(selector),
            js_literal(attr)
        ),
        FieldRule::FirstOf(rules) => {
            let parts = rules.iter().map(js_rule).collect::<Vec<_>>();
            format!("({} || '')", parts.join(" || "))
        }
    }
}

/// Quote a string as a JavaScript literal
pub(crate) fn js_literal(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

fn apply(rule: &CompiledRule, el: ElementRef<'_>, base: Option<&Url>) -> String {
    match rule {
        CompiledRule::Text(sel) => el.select(sel).next().map(inner_text).unwrap_or_default(),
        CompiledRule::Attr(None, attr) => el.value().attr(attr).unwrap_or("").to_string(),
        CompiledRule::Attr(Some(sel), attr) => el
            .select(sel)
            .next()
            .and_then(|child| child.value().attr(attr))
            .unwrap_or("")
            .to_string(),
        CompiledRule::Count(sel) => match el.select(sel).count() {
            0 => String::new(),
            n => n.to_string(),
        },
        CompiledRule::Url(sel, attr) => {
            let raw = el
                .select(sel)
                .next()
                .and_then(|child| child.value().attr(attr))
                .unwrap_or("")
                .trim();
            resolve(raw, base)
        }
        CompiledRule::FirstOf(rules) => rules
            .iter()
            .map(|r| apply(r, el, base))
            .find(|v| !v.is_empty())
            .unwrap_or_default(),
    }
}

fn resolve(raw: &str, base: Option<&Url>) -> String {
    if raw.is_empty() {
        return String::new();
    }
    base.and_then(|b| b.join(raw).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| raw.to_string())
}

enum Chunk {
    Text(String),
    /// `<br>`
    LineBreak,
    /// Block boundary worth this many line breaks; adjacent ones merge
    Break(usize),
}

/// Rendered text of an element the way `innerText` lays it out.
///
/// ASCII whitespace collapses and is trimmed at line edges, while NBSP is
/// kept. Block boundaries give one line break and paragraphs two. Elements
/// hidden with `display:none` or the `hidden` attribute contribute nothing.
fn inner_text(el: ElementRef<'_>) -> String {
    let mut chunks = Vec::new();
    collect_chunks(el, &mut chunks);

    let mut out = String::new();
    let mut pending = 0;
    for chunk in chunks {
        match chunk {
            Chunk::Break(n) => pending = pending.max(n),
            Chunk::LineBreak => {
                flush_breaks(&mut out, &mut pending);
                trim_trailing_spaces(&mut out);
                out.push('\n');
            }
            Chunk::Text(text) => {
                let line_start = pending > 0 || out.is_empty() || out.ends_with('\n');
                let text = if line_start || out.ends_with(' ') {
                    text.trim_start_matches(' ')
                } else {
                    text.as_str()
                };
                if text.is_empty() {
                    continue;
                }
                flush_breaks(&mut out, &mut pending);
                out.push_str(text);
            }
        }
    }
    trim_trailing_spaces(&mut out);
    out
}

fn flush_breaks(out: &mut String, pending: &mut usize) {
    if *pending > 0 && !out.is_empty() {
        trim_trailing_spaces(out);
        out.extend(std::iter::repeat('\n').take(*pending));
    }
    *pending = 0;
}

fn trim_trailing_spaces(out: &mut String) {
    let len = out.trim_end_matches(' ').len();
    out.truncate(len);
}

fn collect_chunks(el: ElementRef<'_>, out: &mut Vec<Chunk>) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            match name {
                "br" => out.push(Chunk::LineBreak),
                "script" | "style" | "template" => {}
                _ if is_hidden(child_el) => {}
                _ => {
                    let gap = match name {
                        "p" => 2,
                        _ if is_block(name) => 1,
                        _ => 0,
                    };
                    if gap > 0 {
                        out.push(Chunk::Break(gap));
                    }
                    collect_chunks(child_el, out);
                    if gap > 0 {
                        out.push(Chunk::Break(gap));
                    }
                }
            }
        } else if let Node::Text(text) = child.value() {
            out.push(Chunk::Text(collapse_whitespace(text)));
        }
    }
}

fn is_hidden(el: ElementRef<'_>) -> bool {
    let value = el.value();
    if value.attr("hidden").is_some() {
        return true;
    }
    value.attr("style").is_some_and(|style| {
        let style = style
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        style.contains("display:none")
    })
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "div" | "li" | "ul" | "ol" | "blockquote" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
            | "section" | "article" | "header" | "footer" | "tr"
    )
}

/// Runs of ASCII whitespace become one space; NBSP is not whitespace here
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

pub(crate) fn collapse_newlines(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Field, ReviewCollection};

    const LISTING: &str = r#"
        <html><body>
          <div class="jdgm-rev-widg__reviews">
            <div class="jdgm-rev" data-review-id="101" data-product-title="Wool Socks">
              <span class="jdgm-rev__rating" data-score="5"></span>
              <span class="jdgm-rev__timestamp">03/14/2024</span>
              <span class="jdgm-rev__author">Jane   D.</span>
              <b class="jdgm-rev__title">Say "Hi"</b>
              <div class="jdgm-rev__body"><p>Warm and soft.</p><p>Would buy again.</p></div>
              <a class="jdgm-rev__prod-link">Ignored Because Attr Wins</a>
              <img class="jdgm-rev__pic-img" src="/cdn/pics/101.jpg">
            </div>
            <div class="jdgm-rev" data-review-id="102">
              <span class="jdgm-rev__author">Sam</span>
              <div class="jdgm-rev__body">line1<br>line2</div>
              <a class="jdgm-rev__prod-link">Cotton Tee</a>
            </div>
          </div>
        </body></html>
    "#;

    const CAROUSEL: &str = r#"
        <div class="jdgm-carousel">
          <div class="jdgm-carousel-item" data-review-id="c1">
            <img class="jdgm-carousel-item__product-image" src="https://cdn.example.com/p.png">
            <div class="jdgm-carousel-item__review-rating">
              <span class="jdgm-star jdgm--on"></span><span class="jdgm-star jdgm--on"></span>
              <span class="jdgm-star jdgm--on"></span><span class="jdgm-star jdgm--on"></span>
              <span class="jdgm-star jdgm--off"></span>
            </div>
            <div class="jdgm-carousel-item__review-title">Great fit</div>
            <div class="jdgm-carousel-item__review-body">Fits well</div>
            <div class="jdgm-carousel-item__reviewer-name">Lee</div>
            <div class="jdgm-carousel-item__product-title">Rain Jacket</div>
            <span class="jdgm-carousel-item__timestamp" data-time="2024-01-02 10:00:00 UTC">2 days ago</span>
          </div>
          <div class="jdgm-carousel-item" data-review-id="c2">
            <span class="jdgm-star jdgm--off"></span>
          </div>
        </div>
    "#;

    fn listing() -> ReviewExtractor {
        ReviewExtractor::new(&FieldMap::listing()).unwrap()
    }

    fn text_of(html: &str) -> String {
        let document = Html::parse_fragment(html);
        let root = Selector::parse(".t").unwrap();
        document.select(&root).next().map(inner_text).unwrap()
    }

    #[test]
    fn test_listing_fields() {
        let base = Url::parse("https://shop.example.com/pages/reviews").unwrap();
        let records = listing().extract(LISTING, Some(&base));
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.id, "101");
        assert_eq!(first.author, "Jane D.");
        assert_eq!(first.date, "03/14/2024");
        assert_eq!(first.rating, "5");
        assert_eq!(first.title, "Say \"Hi\"");
        assert_eq!(first.body, "Warm and soft.  Would buy again.");
        assert_eq!(first.product, "Wool Socks");
        assert_eq!(first.image_url, "https://shop.example.com/cdn/pics/101.jpg");
    }

    #[test]
    fn test_missing_elements_become_empty() {
        let records = listing().extract(LISTING, None);
        let second = &records[1];
        assert_eq!(second.id, "102");
        assert_eq!(second.rating, "");
        assert_eq!(second.title, "");
        assert_eq!(second.date, "");
        assert_eq!(second.image_url, "");
    }

    #[test]
    fn test_product_falls_back_to_link_text() {
        let records = listing().extract(LISTING, None);
        assert_eq!(records[1].product, "Cotton Tee");
    }

    #[test]
    fn test_body_line_breaks_become_spaces() {
        let records = listing().extract(LISTING, None);
        assert_eq!(records[1].body, "line1 line2");
    }

    #[test]
    fn test_relative_image_kept_without_base() {
        let records = listing().extract(LISTING, None);
        assert_eq!(records[0].image_url, "/cdn/pics/101.jpg");
    }

    #[test]
    fn test_hidden_text_and_nbsp_match_rendering() {
        let html = r#"
            <div class="jdgm-rev" data-review-id="7">
              <span class="jdgm-rev__author">Jane&nbsp;D.</span>
              <b class="jdgm-rev__title"><span style="display: none">HIDDEN</span>Shown</b>
              <div class="jdgm-rev__body"><p>Warm.</p><p>Soft.</p><p hidden>Draft</p></div>
            </div>
        "#;
        let records = listing().extract(html, None);
        assert_eq!(records[0].author, "Jane\u{a0}D.");
        assert_eq!(records[0].title, "Shown");
        assert_eq!(records[0].body, "Warm.  Soft.");
    }

    #[test]
    fn test_inner_text_layout() {
        assert_eq!(text_of(r#"<div class="t"><p>Warm.</p><p>Soft.</p></div>"#), "Warm.\n\nSoft.");
        assert_eq!(
            text_of("<div class=\"t\">\n  <div>one</div>\n  <div>two</div>\n</div>"),
            "one\ntwo"
        );
        assert_eq!(text_of(r#"<span class="t">a <b>bold</b>  word</span>"#), "a bold word");
        assert_eq!(text_of(r#"<span class="t">line1 <br> line2</span>"#), "line1\nline2");
    }

    #[test]
    fn test_carousel_fields() {
        let extractor = ReviewExtractor::new(&FieldMap::carousel()).unwrap();
        let records = extractor.extract(CAROUSEL, None);
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.id, "c1");
        assert_eq!(first.author, "Lee");
        assert_eq!(first.date, "2024-01-02 10:00:00 UTC");
        assert_eq!(first.rating, "4");
        assert_eq!(first.title, "Great fit");
        assert_eq!(first.body, "Fits well");
        assert_eq!(first.product, "Rain Jacket");
        assert_eq!(first.image_url, "https://cdn.example.com/p.png");
    }

    #[test]
    fn test_carousel_zero_stars_is_empty_rating() {
        let extractor = ReviewExtractor::new(&FieldMap::carousel()).unwrap();
        let records = extractor.extract(CAROUSEL, None);
        assert_eq!(records[1].rating, "");
    }

    #[test]
    fn test_no_review_elements() {
        let records = listing().extract("<html><body><p>nothing</p></body></html>", None);
        assert!(records.is_empty());
    }

    #[test]
    fn test_repeated_extraction_adds_nothing() {
        let extractor = listing();
        let mut collection = ReviewCollection::new();
        assert_eq!(collection.extend(extractor.extract(LISTING, None)), 2);
        assert_eq!(collection.extend(extractor.extract(LISTING, None)), 0);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_extraction_script_reads_rendered_text() {
        let script = listing().extraction_script();

        assert!(script.contains(r#"document.querySelectorAll(".jdgm-rev")"#));
        assert!(script.contains("n.innerText"));
        assert!(script.contains("document.baseURI"));
        assert!(script.contains(r#"text(el.querySelector(".jdgm-rev__body"))"#));
        assert!(script.contains(
            r#"(attr(el, "data-product-title") || text(el.querySelector(".jdgm-rev__prod-link")) || '')"#
        ));
        assert!(script.contains(r#"link(el.querySelector(".jdgm-rev__pic-img"), "src")"#));
    }

    #[test]
    fn test_carousel_script_counts_stars() {
        let extractor = ReviewExtractor::new(&FieldMap::carousel()).unwrap();
        let script = extractor.extraction_script();
        assert!(script.contains(r#"count(el.querySelectorAll(".jdgm-star.jdgm--on"))"#));
    }

    #[test]
    fn test_rows_follow_map_order_and_transforms() {
        let rows = vec![vec![
            "101".to_string(),
            "Jane\u{a0}D.".to_string(),
            "03/14/2024".to_string(),
            "5".to_string(),
            "Shown".to_string(),
            "Warm.\n\nSoft.".to_string(),
            "Wool Socks".to_string(),
            "https://shop.example.com/a.jpg".to_string(),
        ]];
        let records = listing().records_from_rows(rows);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "101");
        assert_eq!(records[0].author, "Jane\u{a0}D.");
        assert_eq!(records[0].body, "Warm.  Soft.");
        assert_eq!(records[0].image_url, "https://shop.example.com/a.jpg");
    }

    #[test]
    fn test_short_row_leaves_fields_empty() {
        let records = listing().records_from_rows(vec![vec!["9".to_string()]]);
        assert_eq!(records[0].id, "9");
        assert_eq!(records[0].body, "");
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let map = FieldMap::new(".jdgm-rev").with(Field::Title, FieldRule::text("[[bad"));
        let err = ReviewExtractor::new(&map).err().unwrap();
        assert!(matches!(err, RevsieveError::Selector(_)));
    }

    #[test]
    fn test_js_literal_escapes_quotes() {
        assert_eq!(js_literal(".jdgm-rev"), "\".jdgm-rev\"");
        assert_eq!(js_literal(r#"a[title="x"]"#), r#""a[title=\"x\"]""#);
        assert_eq!(js_literal("line\nbreak"), "\"line\\nbreak\"");
    }

    #[test]
    fn test_collapse_newlines() {
        assert_eq!(collapse_newlines("a\nb\r\nc"), "a b c");
        assert_eq!(collapse_newlines("plain"), "plain");
    }
}
