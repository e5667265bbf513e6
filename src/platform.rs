//! Platform tagging for cosmetic styling.
//!
//! The tag only selects colours and labels; no behaviour depends on it.

use std::fmt;

/// Coarse client platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    MacOs,
    Windows,
    Linux,
    /// Anything unrecognized.
    Web,
}

impl Platform {
    /// All tags, in classification priority order.
    pub const ALL: [Platform; 6] = [
        Platform::Ios,
        Platform::Android,
        Platform::MacOs,
        Platform::Windows,
        Platform::Linux,
        Platform::Web,
    ];

    /// Classifies the platform this binary was built for.
    pub fn detect() -> Self {
        classify(std::env::consts::OS)
    }

    /// Lower-case tag, e.g. `"android"`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::MacOs => "macos",
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::Web => "web",
        }
    }

    /// Style class name, e.g. `"platform-android"`.
    pub fn css_class(self) -> String {
        format!("platform-{}", self.tag())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Classifies a user-agent or OS identifier string.
///
/// Mobile markers are checked before desktop ones, since mobile user agents
/// also mention `Mac OS X` or `Linux`.
pub fn classify(env: &str) -> Platform {
    let s = env.to_ascii_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| s.contains(n));

    if has(&["iphone", "ipad", "ipod", "ios"]) {
        Platform::Ios
    } else if has(&["android"]) {
        Platform::Android
    } else if has(&["mac", "darwin"]) {
        Platform::MacOs
    } else if has(&["win"]) {
        Platform::Windows
    } else if has(&["linux", "x11", "freebsd", "openbsd", "netbsd"]) {
        Platform::Linux
    } else {
        Platform::Web
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_os_identifiers() {
        assert_eq!(classify("linux"), Platform::Linux);
        assert_eq!(classify("macos"), Platform::MacOs);
        assert_eq!(classify("windows"), Platform::Windows);
        assert_eq!(classify("android"), Platform::Android);
        assert_eq!(classify("ios"), Platform::Ios);
        assert_eq!(classify("freebsd"), Platform::Linux);
    }

    #[test]
    fn mobile_user_agents_beat_desktop_markers() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
        let android = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36";
        assert_eq!(classify(iphone), Platform::Ios);
        assert_eq!(classify(android), Platform::Android);
    }

    #[test]
    fn desktop_user_agents() {
        assert_eq!(
            classify("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
            Platform::Windows
        );
        assert_eq!(
            classify("Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)"),
            Platform::MacOs
        );
        assert_eq!(
            classify("Mozilla/5.0 (X11; Ubuntu; Linux x86_64)"),
            Platform::Linux
        );
    }

    #[test]
    fn unknown_is_web() {
        assert_eq!(classify(""), Platform::Web);
        assert_eq!(classify("Lynx/2.8.9"), Platform::Web);
    }

    #[test]
    fn css_class_uses_tag() {
        for platform in Platform::ALL {
            assert_eq!(platform.css_class(), format!("platform-{platform}"));
        }
    }
}
