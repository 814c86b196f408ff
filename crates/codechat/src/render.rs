//! Turns a raw model reply into an HTML page with code fences marked for
//! client-side syntax highlighting.
//!
//! The reply is split into alternating prose and fenced-code segments by a
//! small scanner, each segment is escaped and wrapped, and the result is
//! embedded in a page shell that loads Prism so code blocks get
//! language-aware coloring once the DOM is ready. Total over any input;
//! rendering never fails.

const FENCE: &str = "```";
const DEFAULT_LANGUAGE: &str = "plaintext";

/// One piece of a reply, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text between fences. Newlines are significant and become `<br>`.
    Prose(String),
    /// The body of one fence, with the language tag captured from its
    /// opening marker (empty when the marker carried none).
    Code { language: String, text: String },
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Splits a reply into `[prose, code, prose, ..., prose]`.
///
/// An opening marker is three backticks, an optional run of word
/// characters, and a newline; the body runs to the next three backticks
/// (shortest span, fences do not nest). A candidate opener that does not
/// have that shape is skipped by one character and scanning continues. An
/// opener with no closing marker is not a fence at all: the remaining
/// text is left in the surrounding prose segment.
///
/// A (possibly empty) prose segment is emitted before every fence and
/// after the last one, so back-to-back fences keep an empty prose segment
/// between them and empty input yields a single empty prose segment.
pub fn split_segments(input: &str) -> Vec<Segment> {
    let bytes = input.as_bytes();
    let mut segments = Vec::new();
    let mut prose_start = 0;
    let mut scan = 0;

    while let Some(found) = input[scan..].find(FENCE) {
        let open = scan + found;
        let mut lang_end = open + FENCE.len();
        while lang_end < bytes.len() && is_word_byte(bytes[lang_end]) {
            lang_end += 1;
        }
        if bytes.get(lang_end) != Some(&b'\n') {
            // Not an opening marker at this position
            scan = open + 1;
            continue;
        }

        let body_start = lang_end + 1;
        let Some(close) = input[body_start..].find(FENCE) else {
            // Unterminated fence
            break;
        };
        let close = body_start + close;

        segments.push(Segment::Prose(input[prose_start..open].to_string()));
        segments.push(Segment::Code {
            language: input[open + FENCE.len()..lang_end].to_string(),
            text: input[body_start..close].to_string(),
        });
        prose_start = close + FENCE.len();
        scan = prose_start;
    }

    segments.push(Segment::Prose(input[prose_start..].to_string()));
    segments
}

/// Prose escaping: `&`, `<`, `>` only. Quotes pass through unchanged.
fn escape_prose(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Code escaping: all five reserved characters.
fn escape_code(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn render_segment(segment: &Segment) -> String {
    match segment {
        Segment::Prose(text) => {
            format!("<p>{}</p>", escape_prose(text).replace('\n', "<br>"))
        }
        Segment::Code { language, text } => {
            let language = if language.is_empty() {
                DEFAULT_LANGUAGE
            } else {
                language
            };
            format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                language,
                escape_code(text)
            )
        }
    }
}

/// Renders the reply's segments, concatenated in source order.
pub fn render_body(reply: &str) -> String {
    split_segments(reply)
        .iter()
        .map(render_segment)
        .collect::<Vec<_>>()
        .join("")
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <link href="https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/themes/prism.min.css" rel="stylesheet" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/prism.min.js"></script>
  <script src="https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/components/prism-core.min.js"></script>
  <script src="https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/plugins/autoloader/prism-autoloader.min.js"></script>
  <style>
    body { font-family: sans-serif; padding: 1em; }
    pre { background: #f5f5f5; padding: 1em; border-radius: 6px; overflow: auto; }
    code { font-family: monospace; }
  </style>
</head>
<body>
  <h2>Response</h2>
"#;

const PAGE_FOOT: &str = "\n</body>\n</html>\n";

/// The full HTML document for one reply. Prism highlights the
/// `language-*` code blocks after the DOM loads.
pub fn render_page(reply: &str) -> String {
    format!("{}{}{}", PAGE_HEAD, render_body(reply), PAGE_FOOT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prose(text: &str) -> Segment {
        Segment::Prose(text.to_string())
    }

    fn code(language: &str, text: &str) -> Segment {
        Segment::Code {
            language: language.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_no_fences_single_prose_segment() {
        let segments = split_segments("just some text\nwith a newline");
        assert_eq!(segments, vec![prose("just some text\nwith a newline")]);
    }

    #[test]
    fn test_empty_input_single_empty_prose() {
        assert_eq!(split_segments(""), vec![prose("")]);
        assert_eq!(render_body(""), "<p></p>");
    }

    #[test]
    fn test_prose_code_prose() {
        let segments = split_segments("before\n```rust\nfn main() {}\n```\nafter");
        assert_eq!(
            segments,
            vec![
                prose("before\n"),
                code("rust", "fn main() {}\n"),
                prose("\nafter"),
            ]
        );
    }

    #[test]
    fn test_fence_without_language() {
        let segments = split_segments("```\nplain\n```");
        assert_eq!(segments, vec![prose(""), code("", "plain\n"), prose("")]);

        let body = render_body("```\nplain\n```");
        assert_eq!(
            body,
            "<p></p><pre><code class=\"language-plaintext\">plain\n</code></pre><p></p>"
        );
    }

    #[test]
    fn test_back_to_back_fences_keep_empty_paragraph() {
        let input = "```a\nx\n``````b\ny\n```";
        let segments = split_segments(input);
        assert_eq!(
            segments,
            vec![
                prose(""),
                code("a", "x\n"),
                prose(""),
                code("b", "y\n"),
                prose(""),
            ]
        );
        assert!(render_body(input).contains("</pre><p></p><pre>"));
    }

    #[test]
    fn test_unterminated_fence_stays_prose() {
        let input = "a ```b\ncode";
        assert_eq!(split_segments(input), vec![prose("a ```b\ncode")]);
        assert_eq!(render_body(input), "<p>a ```b<br>code</p>");
    }

    #[test]
    fn test_opener_without_newline_is_not_a_fence() {
        // No newline after the marker and its word run, so no match there,
        // and the later marker has no closer.
        let input = "```js code``` more";
        assert_eq!(split_segments(input), vec![prose(input)]);
    }

    #[test]
    fn test_extra_backtick_before_opener() {
        // Scanning bumps along one character and matches the real opener.
        let segments = split_segments("````js\ncode```");
        assert_eq!(
            segments,
            vec![prose("`"), code("js", "code"), prose("")]
        );
    }

    #[test]
    fn test_fence_body_match_is_non_greedy() {
        let segments = split_segments("```a\nfirst``` mid ```b\nsecond```");
        assert_eq!(
            segments,
            vec![
                prose(""),
                code("a", "first"),
                prose(" mid "),
                code("b", "second"),
                prose(""),
            ]
        );
    }

    #[test]
    fn test_prose_escapes_three_characters_only() {
        let body = render_body("a & b <tag> \"quoted\" 'single'");
        assert_eq!(body, "<p>a &amp; b &lt;tag&gt; \"quoted\" 'single'</p>");
    }

    #[test]
    fn test_code_escapes_five_characters() {
        let body = render_body("```\n& < > \" '\n```");
        assert!(body.contains("&amp; &lt; &gt; &quot; &#39;"));
    }

    #[test]
    fn test_escaping_does_not_double_escape_entities() {
        // An already-escaped entity in the source is itself escaped once
        // more at the ampersand, identically on both paths.
        assert_eq!(escape_prose("&amp;"), "&amp;amp;");
        assert_eq!(escape_code("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_prose_newlines_become_breaks_code_newlines_do_not() {
        let body = render_body("one\ntwo\n```\nline1\nline2\n```");
        assert!(body.starts_with("<p>one<br>two<br></p>"));
        assert!(body.contains(">line1\nline2\n</code>"));
    }

    #[test]
    fn test_worked_example() {
        let body = render_body("Here:\n\n```js\nconsole.log(1)\n```\n\nDone");
        assert_eq!(
            body,
            "<p>Here:<br><br></p>\
             <pre><code class=\"language-js\">console.log(1)\n</code></pre>\
             <p><br><br>Done</p>"
        );
    }

    #[test]
    fn test_page_shell_wraps_body() {
        let page = render_page("hello");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("prism.min.js"));
        assert!(page.contains("<p>hello</p>"));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_multibyte_prose_around_fence() {
        let segments = split_segments("héllo\n```py\nprint('é')\n```\n∎");
        assert_eq!(
            segments,
            vec![
                prose("héllo\n"),
                code("py", "print('é')\n"),
                prose("\n∎"),
            ]
        );
    }
}
