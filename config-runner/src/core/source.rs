//! Source syntax detection for config modules.

use std::path::Path;

/// Syntax of a config module, as understood by the transpiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Ts,
    Tsx,
    Js,
    Jsx,
}

impl SourceKind {
    /// Detect from the file extension. Unknown or missing extensions are
    /// treated as TypeScript, which accepts plain JavaScript too.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("tsx") => Self::Tsx,
            Some("js" | "mjs" | "cjs") => Self::Js,
            Some("jsx") => Self::Jsx,
            _ => Self::Ts,
        }
    }

    /// Loader name passed to the transpiler (`--loader=<name>`).
    pub fn loader(self) -> &'static str {
        match self {
            Self::Ts => "ts",
            Self::Tsx => "tsx",
            Self::Js => "js",
            Self::Jsx => "jsx",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_kind_from_extension() {
        let cases = [
            ("config.ts", SourceKind::Ts),
            ("config.mts", SourceKind::Ts),
            ("config.cts", SourceKind::Ts),
            ("config.tsx", SourceKind::Tsx),
            ("config.js", SourceKind::Js),
            ("config.MJS", SourceKind::Js),
            ("config.cjs", SourceKind::Js),
            ("config.jsx", SourceKind::Jsx),
            ("config", SourceKind::Ts),
            ("config.conf", SourceKind::Ts),
        ];
        for (path, expected) in cases {
            assert_eq!(SourceKind::from_path(Path::new(path)), expected, "{path}");
        }
    }
}
