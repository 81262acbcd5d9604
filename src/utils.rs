//! Console helpers: colored prefixes, glyph selection, and path display.

use owo_colors::OwoColorize;
use std::path::Path;

/// Colors are on unless `NO_COLOR` is set.
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Whether the console locale advertises UTF-8. An unset locale counts as
/// UTF-8; an explicit non-UTF-8 locale (e.g. `C`, `POSIX`) does not.
pub fn console_is_utf8() -> bool {
    for var in ["LC_ALL", "LC_CTYPE", "LANG"] {
        if let Ok(v) = std::env::var(var) {
            if v.is_empty() {
                continue;
            }
            let v = v.to_ascii_lowercase();
            return v.contains("utf-8") || v.contains("utf8");
        }
    }
    true
}

/// Glyph set used by printers.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub error: &'static str,
    pub warning: &'static str,
    pub info: &'static str,
    pub ok: &'static str,
    pub dash: &'static str,
}

pub const UNICODE_GLYPHS: Glyphs = Glyphs {
    error: "✖",
    warning: "▲",
    info: "◆",
    ok: "✔",
    dash: "—",
};

pub const ASCII_GLYPHS: Glyphs = Glyphs {
    error: "x",
    warning: "!",
    info: "*",
    ok: "ok",
    dash: "-",
};

pub fn glyphs() -> Glyphs {
    if console_is_utf8() {
        UNICODE_GLYPHS
    } else {
        ASCII_GLYPHS
    }
}

fn prefix(label: &str, paint: fn(&str) -> String) -> String {
    if use_colors() {
        paint(label)
    } else {
        label.to_string()
    }
}

pub fn error_prefix() -> String {
    prefix("error:", |s| s.red().bold().to_string())
}

pub fn warn_prefix() -> String {
    prefix("warn:", |s| s.yellow().bold().to_string())
}

pub fn note_prefix() -> String {
    prefix("note:", |s| s.cyan().bold().to_string())
}

pub fn info_prefix() -> String {
    prefix("info:", |s| s.blue().bold().to_string())
}

/// Display `p` relative to the working directory when possible.
pub fn rel_to_wd(p: &Path) -> String {
    let Ok(cwd) = std::env::current_dir() else {
        return p.to_string_lossy().to_string();
    };
    if p.is_relative() {
        return p.to_string_lossy().to_string();
    }
    pathdiff::diff_paths(p, &cwd)
        .map(|r| r.to_string_lossy().to_string())
        .unwrap_or_else(|| p.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_to_wd_keeps_relative_paths() {
        assert_eq!(rel_to_wd(Path::new("src/app.py")), "src/app.py");
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(rel_to_wd(&cwd.join("a/b.yml")), "a/b.yml");
    }

    #[test]
    fn test_ascii_glyphs_are_ascii() {
        for g in [
            ASCII_GLYPHS.error,
            ASCII_GLYPHS.warning,
            ASCII_GLYPHS.info,
            ASCII_GLYPHS.ok,
            ASCII_GLYPHS.dash,
        ] {
            assert!(g.is_ascii());
        }
    }
}
