use dom_query::{Node, Selection};

use crate::utils::escape_text;

/// Extension trait for dom_query::Node to provide helper methods
pub trait NodeExt {
    /// Append text as trailing content, leaving existing children in place.
    fn append_text(&self, text: &str);
    /// Replace this node (in place) with parsed markup.
    fn replace_with_markup(&self, markup: String);
}

impl<'a> NodeExt for Node<'a> {
    fn append_text(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.append_html(escape_text(text).into_owned());
    }

    fn replace_with_markup(&self, markup: String) {
        let selection = Selection::from(self.clone());
        selection.replace_with_html(markup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;

    #[test]
    fn test_append_text_is_non_destructive() {
        let doc = Document::from("<p>Year: <b>AD</b></p>");
        let node = doc.select("p").nodes().first().unwrap().clone();
        node.append_text("2012");
        assert_eq!(node.text().as_ref(), "Year: AD2012");
        // the child element survives the append
        assert!(!doc.select("p b").is_empty());
    }

    #[test]
    fn test_append_text_escapes_markup() {
        let doc = Document::from("<p></p>");
        let node = doc.select("p").nodes().first().unwrap().clone();
        node.append_text("<b>bold?</b>");
        assert!(doc.select("p b").is_empty());
        assert_eq!(node.text().as_ref(), "<b>bold?</b>");
    }

    #[test]
    fn test_replace_with_markup() {
        let doc = Document::from("<div><text>placeholder</text></div>");
        let node = doc.select("text").nodes().first().unwrap().clone();
        node.replace_with_markup("<span>v</span>".to_string());
        assert!(doc.select("div text").is_empty());
        assert_eq!(doc.select("div span").nodes().first().unwrap().text().as_ref(), "v");
    }
}
