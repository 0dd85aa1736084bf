//! Opening links in the system browser

/// Program and arguments that hand `url` to the platform's default handler
fn launcher(url: &str) -> (&'static str, Vec<&str>) {
    if cfg!(target_os = "macos") {
        ("open", vec![url])
    } else if cfg!(target_os = "windows") {
        // `start` treats the first quoted argument as a window title
        ("cmd", vec!["/C", "start", "", url])
    } else {
        ("xdg-open", vec![url])
    }
}

/// Only web links leave the app; anything else could be a local path or a
/// shell argument on Windows.
pub fn is_web_link(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

/// Launch the default browser for `url` and wait for the launcher to exit
pub async fn open_url(url: String) {
    if !is_web_link(&url) {
        log::warn!("Refusing to open non-web link {:?}", url);
        return;
    }

    let (program, args) = launcher(&url);
    match tokio::process::Command::new(program).args(&args).spawn() {
        Ok(mut child) => match child.wait().await {
            Ok(status) if !status.success() => {
                log::warn!("{} exited with {} for {}", program, status, url)
            }
            Ok(_) => {}
            Err(e) => log::warn!("Waiting for {} failed: {}", program, e),
        },
        Err(e) => log::error!("Failed to open URL in browser: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_web_links_are_opened() {
        assert!(is_web_link("https://gitlab.com/dashboard/merge_requests"));
        assert!(is_web_link("HTTP://intranet.local"));
        assert!(!is_web_link("file:///etc/passwd"));
        assert!(!is_web_link("javascript:alert(1)"));
        assert!(!is_web_link(""));
    }

    #[test]
    fn test_launcher_passes_url_last() {
        let (_, args) = launcher("https://example.com");
        assert_eq!(args.last(), Some(&"https://example.com"));
    }
}
