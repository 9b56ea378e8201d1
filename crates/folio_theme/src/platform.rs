//! System color scheme detection
//!
//! Stands in for `prefers-color-scheme` when the page runs outside a
//! browser: asks the desktop environment through its command line tools.
//! Each tool's output is interpreted by a pure parser so the decision logic
//! is testable without the tool installed.

use std::process::Command;

use crate::scheme::ColorScheme;

/// Detect the desktop's preferred scheme, `None` when it cannot be told
pub fn detect_system_color_scheme() -> Option<ColorScheme> {
    let detected = detect();
    tracing::debug!("system color scheme: {:?}", detected);
    detected
}

#[cfg(target_os = "linux")]
fn detect() -> Option<ColorScheme> {
    // color-scheme is authoritative on GNOME 42+, gtk-theme covers older desktops
    let color_scheme = run("gsettings", &["get", "org.gnome.desktop.interface", "color-scheme"]);
    if let Some(scheme) = color_scheme.as_deref().and_then(parse_gsettings_color_scheme) {
        return Some(scheme);
    }
    run("gsettings", &["get", "org.gnome.desktop.interface", "gtk-theme"])
        .as_deref()
        .and_then(parse_gtk_theme)
}

#[cfg(target_os = "macos")]
fn detect() -> Option<ColorScheme> {
    // `defaults` exits non-zero when the key is absent, which means light
    let output = Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .ok()?;
    Some(parse_apple_interface_style(
        output.status.success(),
        &String::from_utf8_lossy(&output.stdout),
    ))
}

#[cfg(target_os = "windows")]
fn detect() -> Option<ColorScheme> {
    run(
        "reg",
        &[
            "query",
            r"HKCU\Software\Microsoft\Windows\CurrentVersion\Themes\Personalize",
            "/v",
            "AppsUseLightTheme",
        ],
    )
    .as_deref()
    .and_then(parse_apps_use_light_theme)
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn detect() -> Option<ColorScheme> {
    None
}

/// Run a command and return its stdout when it succeeds
#[allow(dead_code)]
fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        tracing::trace!("{program} exited with {}", output.status);
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// `'prefer-dark'`, `'prefer-light'` or `'default'`
pub fn parse_gsettings_color_scheme(output: &str) -> Option<ColorScheme> {
    let value = output.trim().trim_matches('\'');
    match value {
        "prefer-dark" => Some(ColorScheme::Dark),
        "prefer-light" => Some(ColorScheme::Light),
        // `default` defers to the theme name
        _ => None,
    }
}

/// GTK theme names such as `'Adwaita-dark'`
pub fn parse_gtk_theme(output: &str) -> Option<ColorScheme> {
    let value = output.trim().trim_matches('\'');
    if value.is_empty() {
        return None;
    }
    Some(ColorScheme::from_prefers_dark(
        value.to_ascii_lowercase().contains("dark"),
    ))
}

/// `defaults read -g AppleInterfaceStyle` prints `Dark` in dark mode
pub fn parse_apple_interface_style(succeeded: bool, output: &str) -> ColorScheme {
    ColorScheme::from_prefers_dark(succeeded && output.trim().eq_ignore_ascii_case("dark"))
}

/// `reg query` output; `AppsUseLightTheme` is `0x0` in dark mode
pub fn parse_apps_use_light_theme(output: &str) -> Option<ColorScheme> {
    output
        .lines()
        .find(|line| line.trim_start().starts_with("AppsUseLightTheme"))
        .and_then(|line| line.split_whitespace().last())
        .and_then(|value| u32::from_str_radix(value.trim_start_matches("0x"), 16).ok())
        .map(|value| ColorScheme::from_prefers_dark(value == 0))
}
