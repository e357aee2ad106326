use std::sync::LazyLock;

use regex::Regex;

use crate::models::ApplicationForm;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>").expect("script block pattern is valid")
});

static JAVASCRIPT_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("javascript uri pattern is valid"));

static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+\s*=").expect("event handler pattern is valid"));

/// Strip script blocks, `javascript:` URIs and inline `on*=` handlers from a
/// value, then trim it.
pub fn sanitize(value: &str) -> String {
    let value = SCRIPT_BLOCK.replace_all(value, "");
    let value = JAVASCRIPT_URI.replace_all(&value, "");
    let value = EVENT_HANDLER.replace_all(&value, "");
    value.trim().to_string()
}

/// Sanitize every field of a form.
pub fn sanitize_form(form: &ApplicationForm) -> ApplicationForm {
    form.iter()
        .map(|(name, value)| (name, sanitize(value)))
        .collect()
}
