use regex::Regex;
use std::sync::LazyLock;

static OPENING_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\s*```[A-Za-z0-9_+#-]*[ \t]*\r?\n").unwrap());

static CLOSING_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n?[ \t]*```\s*\z").unwrap());

/// Remove the outer markdown code fence (with an optional language tag) and trim the result.
/// Fences inside the code are left alone.
pub fn strip_code_fences(text: &str) -> String {
    let text = OPENING_FENCE_RE.replace(text, "");
    CLOSING_FENCE_RE.replace(&text, "").trim().to_string()
}
