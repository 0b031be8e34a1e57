use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref TITLE: Selector = Selector::parse("title").expect("static selector");
    static ref HEADING: Selector = Selector::parse("h1").expect("static selector");
    static ref ARTICLE: Selector = Selector::parse("article").expect("static selector");
    static ref PARAGRAPH: Selector = Selector::parse("p").expect("static selector");
}

/// Readable parts of an HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub title: Option<String>,
    pub body: String,
}

/// Pulls a title and paragraph text out of `html`.
///
/// The title is the `<title>` text, falling back to the first `<h1>`. The body
/// is every non-empty `<p>` inside the first `<article>`, or in the whole
/// document when there is no `<article>`, separated by blank lines. An empty
/// body is returned as-is; callers decide whether that is a failure.
pub fn extract(html: &str) -> Extracted {
    let document = Html::parse_document(html);
    Extracted {
        title: extract_title(&document),
        body: extract_body(&document),
    }
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn extract_title(document: &Html) -> Option<String> {
    first_text(document, &TITLE).or_else(|| first_text(document, &HEADING))
}

fn extract_body(document: &Html) -> String {
    let paragraphs: Vec<String> = match document.select(&ARTICLE).next() {
        Some(article) => article.select(&PARAGRAPH).map(element_text).collect(),
        None => document.select(&PARAGRAPH).map(element_text).collect(),
    };

    paragraphs
        .into_iter()
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_paragraphs_only() {
        let html = r#"
            <html>
              <head><title> Page Title </title></head>
              <body>
                <p>Navigation</p>
                <article>
                  <h1>Heading</h1>
                  <p>First paragraph.</p>
                  <p>   </p>
                  <div><p>Second <b>bold</b> paragraph.</p></div>
                </article>
                <p>Footer</p>
              </body>
            </html>
        "#;

        let extracted = extract(html);
        assert_eq!(extracted.title.as_deref(), Some("Page Title"));
        assert_eq!(extracted.body, "First paragraph.\n\nSecond bold paragraph.");
    }

    #[test]
    fn test_whole_document_without_article() {
        let html = "<html><body><p>One</p><section><p>Two</p></section><p></p></body></html>";

        let extracted = extract(html);
        assert_eq!(extracted.title, None);
        assert_eq!(extracted.body, "One\n\nTwo");
    }

    #[test]
    fn test_title_falls_back_to_heading() {
        let html = "<html><head><title>   </title></head><body><h1> Headline </h1><h1>Other</h1></body></html>";
        assert_eq!(extract(html).title.as_deref(), Some("Headline"));

        let html = "<html><body><h1></h1><p>text</p></body></html>";
        assert_eq!(extract(html).title, None);
    }

    #[test]
    fn test_two_of_three_paragraphs() {
        let html = "<html><body><article><p>Hello</p><p> </p><p>World</p></article></body></html>";
        let body = extract(html).body;
        assert_eq!(body, "Hello\n\nWorld");
        assert_eq!(body.split("\n\n").count(), 2);
    }

    #[test]
    fn test_no_paragraphs() {
        let html = "<html><head><title>T</title></head><body><div>Just a div</div></body></html>";
        let extracted = extract(html);
        assert_eq!(extracted.title.as_deref(), Some("T"));
        assert!(extracted.body.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let html = "<html><title>T</title><article><p>Hello</p><p>World</p></article></html>";
        assert_eq!(extract(html), extract(html));
    }
}
