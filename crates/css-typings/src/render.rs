//! Typings document rendering.

/// First line of every generated file.
pub const HEADER: &str = "// AUTO-GENERATED";

/// Renders the declaration file for a stylesheet exporting `selectors`.
///
/// Names are emitted as single-quoted property keys in the given order.
/// The output has no trailing newline.
pub fn render_typings<S: AsRef<str>>(selectors: &[S]) -> String {
    let mut out = String::with_capacity(96 + selectors.len() * 24);
    out.push_str(HEADER);
    out.push_str("\ninterface CSSExports {");
    for selector in selectors {
        out.push_str(" '");
        push_escaped(&mut out, selector.as_ref());
        out.push_str("': string;");
    }
    out.push_str(" }\nexport const exports: CSSExports;\nexport default exports;");
    out
}

fn push_escaped(out: &mut String, name: &str) {
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
}
