use regex::Regex;

/// Remove markup from a lyric block and prefix a newline.
///
/// Every minimal `<...>` run on a single line is deleted, so
/// `"<p>Hello</p>"` becomes `"\nHello"`. Entities are left as they are.
/// A `>` inside an attribute value ends the match early; lyric paragraphs
/// don't carry such attributes.
pub fn strip_tags(markup: &str) -> String {
    let re = Regex::new(r"<.*?>").expect("valid regex");
    format!("\n{}", re.replace_all(markup, ""))
}
