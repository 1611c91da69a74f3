use once_cell::sync::Lazy;

pub static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

pub fn spawn_async<F>(fut: F) -> tokio::task::JoinHandle<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    // Reuse the ambient runtime when one exists (tests, async callers),
    // otherwise fall back to the shared one.
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle.spawn(fut),
        Err(_) => RUNTIME.spawn(fut),
    }
}

pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Clock label in the shape the message log displays, e.g. "10:32 AM".
pub fn time_label() -> String {
    chrono::Local::now().format("%-I:%M %p").to_string()
}

/// Avatar initial: first character of the name, upper-cased.
pub fn initial(name: &str) -> char {
    name.chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('U')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_url_adds_scheme_when_missing() {
        assert_eq!(normalize_url("myserver:1234"), "https://myserver:1234");
        assert_eq!(normalize_url(" http://a.b "), "http://a.b");
        assert_eq!(normalize_url("https://a.b"), "https://a.b");
    }

    #[test]
    fn initial_upper_cases_and_defaults() {
        assert_eq!(initial("alice"), 'A');
        assert_eq!(initial("Bob"), 'B');
        assert_eq!(initial(""), 'U');
    }
}
