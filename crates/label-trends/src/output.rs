use serde::Serialize;

/// Serialise `value` as JSON, two-space indented when `pretty`.
pub fn render_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    let mut rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    rendered.push('\n');
    Ok(rendered)
}
