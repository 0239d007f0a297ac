/// Wraps an HTML fragment in the minimal document the preview displays.
///
/// An empty `base_uri` leaves relative links unresolved; otherwise a `<base>`
/// element points them at `base_uri`.
pub fn wrap_html_document(fragment: &str, base_uri: &str) -> String {
    let base = if base_uri.is_empty() {
        String::new()
    } else {
        format!("\n    <base href=\"{}\">", base_uri.replace('"', "%22"))
    };
    format!(
        "<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"utf-8\">{base}\n  </head>\n  <body>\n    {fragment}\n  </body>\n</html>\n"
    )
}
