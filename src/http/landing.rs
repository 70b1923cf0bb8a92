//! Static landing page served at `/`.

const TEMPLATE: &str = include_str!("../../static/index.html");

/// Render the landing page for a namespace prefix.
///
/// The namespace is validated at config load to contain only URL path
/// characters, so it is safe inside the page's script string.
pub fn render(namespace: &str) -> String {
    TEMPLATE.replace("{{namespace}}", namespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_inserts_namespace() {
        let page = render("/browse/");
        assert!(page.contains(r#""/browse/" + encodeURIComponent(target)"#));
        assert!(!page.contains("{{namespace}}"));
    }
}
