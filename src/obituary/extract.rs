//! Heuristic symbol extraction keyed by file extension.
//!
//! This is pattern matching, not parsing: each known extension maps to a
//! handful of regular expressions whose first capture group is a declared
//! name. Unknown extensions yield no symbols.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Facts pulled from a deleted file's final content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Declared function/class names in order of first appearance.
    pub symbols: Vec<String>,
    /// Number of lines, ignoring a single trailing newline.
    pub line_count: usize,
}

struct LanguagePatterns {
    extensions: &'static [&'static str],
    patterns: Vec<Regex>,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

static LANGUAGES: LazyLock<Vec<LanguagePatterns>> = LazyLock::new(|| {
    vec![
        LanguagePatterns {
            extensions: &["py", "pyw"],
            patterns: compile(&[
                r"(?m)^[ \t]*(?:async[ \t]+)?def[ \t]+([A-Za-z_]\w*)[ \t]*\(",
                r"(?m)^[ \t]*class[ \t]+([A-Za-z_]\w*)[ \t]*[(:]",
            ]),
        },
        LanguagePatterns {
            extensions: &["js", "jsx", "ts", "tsx", "mjs", "cjs"],
            patterns: compile(&[
                r"(?m)^[ \t]*(?:export[ \t]+)?(?:default[ \t]+)?(?:async[ \t]+)?function\*?[ \t]+([A-Za-z_$][\w$]*)",
                r"(?m)^[ \t]*(?:export[ \t]+)?(?:default[ \t]+)?(?:abstract[ \t]+)?class[ \t]+([A-Za-z_$][\w$]*)",
                r"(?m)^[ \t]*(?:export[ \t]+)?(?:const|let|var)[ \t]+([A-Za-z_$][\w$]*)[ \t]*=[ \t]*(?:async[ \t]+)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)[ \t]*=>",
            ]),
        },
        LanguagePatterns {
            extensions: &["rs"],
            patterns: compile(&[
                r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?(?:const[ \t]+)?(?:async[ \t]+)?(?:unsafe[ \t]+)?fn[ \t]+([A-Za-z_]\w*)",
                r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?(?:unsafe[ \t]+)?(?:struct|enum|trait|union)[ \t]+([A-Za-z_]\w*)",
            ]),
        },
        LanguagePatterns {
            extensions: &["go"],
            patterns: compile(&[
                r"(?m)^func[ \t]+(?:\([^)]*\)[ \t]*)?([A-Za-z_]\w*)",
                r"(?m)^type[ \t]+([A-Za-z_]\w*)[ \t]+(?:struct|interface)\b",
            ]),
        },
        LanguagePatterns {
            extensions: &["java", "cs"],
            patterns: compile(&[
                r"(?m)^[ \t]*(?:(?:public|private|protected|internal|static|final|abstract|sealed|partial)[ \t]+)*(?:class|interface|enum|record)[ \t]+([A-Za-z_]\w*)",
            ]),
        },
        LanguagePatterns {
            extensions: &["kt", "kts"],
            patterns: compile(&[
                r"(?m)^[ \t]*(?:(?:public|private|protected|internal|abstract|sealed|open|data)[ \t]+)*(?:class|interface|object)[ \t]+([A-Za-z_]\w*)",
                r"(?m)^[ \t]*(?:(?:public|private|protected|internal|override|suspend|inline)[ \t]+)*fun[ \t]+([A-Za-z_]\w*)",
            ]),
        },
        LanguagePatterns {
            extensions: &["rb"],
            patterns: compile(&[
                r"(?m)^[ \t]*def[ \t]+(?:self\.)?([A-Za-z_]\w*[?!=]?)",
                r"(?m)^[ \t]*(?:class|module)[ \t]+([A-Z]\w*)",
            ]),
        },
        LanguagePatterns {
            extensions: &["sh", "bash", "zsh"],
            patterns: compile(&[
                r"(?m)^[ \t]*function[ \t]+([A-Za-z_][\w-]*)",
                r"(?m)^[ \t]*([A-Za-z_][\w-]*)[ \t]*\(\)",
            ]),
        },
        LanguagePatterns {
            extensions: &["c", "h", "cc", "cpp", "cxx", "hpp"],
            patterns: compile(&[
                r"(?m)^[ \t]*(?:typedef[ \t]+)?(?:class|struct)[ \t]+([A-Za-z_]\w*)[ \t]*(?:[:{]|$)",
                r"(?m)^[A-Za-z_][\w \t\*]*?[ \t\*]([A-Za-z_]\w*)[ \t]*\([^;\n]*$",
            ]),
        },
        LanguagePatterns {
            extensions: &["php"],
            patterns: compile(&[
                r"(?m)^[ \t]*(?:(?:public|private|protected|static|final|abstract)[ \t]+)*function[ \t]+([A-Za-z_]\w*)",
                r"(?m)^[ \t]*(?:(?:final|abstract)[ \t]+)?(?:class|interface|trait)[ \t]+([A-Za-z_]\w*)",
            ]),
        },
    ]
});

// Control-flow words the C function-head pattern can mistake for names.
const NOT_SYMBOLS: &[&str] = &["if", "else", "for", "while", "switch", "return", "sizeof"];

static SURVIVOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let extensions = LANGUAGES
        .iter()
        .flat_map(|lang| lang.extensions.iter().copied())
        .chain(["json", "yaml", "yml", "toml", "sql", "html", "css", "md"])
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(\w[\w./-]*\.(?:{extensions}))\b")).unwrap()
});

// Frameworks and runtimes conventionally written as if they were `.js` files.
const JS_PROJECTS: &[&str] = &[
    "node", "vue", "next", "nuxt", "express", "three", "d3", "chart", "ember", "backbone", "angular",
    "react", "svelte", "moment", "p5", "deno", "nest", "alpine", "knockout", "socket",
];

/// `true` for tokens like `Node.js` that name a project rather than a file.
fn is_js_project(name: &str) -> bool {
    if name.contains('/') {
        return false;
    }
    name.rsplit_once('.').is_some_and(|(stem, ext)| {
        ext.eq_ignore_ascii_case("js") && JS_PROJECTS.iter().any(|p| stem.eq_ignore_ascii_case(p))
    })
}

/// Lower-cased extension of `filename`, if any.
pub(crate) fn extension(filename: &str) -> Option<String> {
    Path::new(filename).extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase)
}

/// Extracts declared symbol names and the line count from `content`.
///
/// `filename` only selects the pattern set. Never fails: empty content
/// yields no symbols and zero lines.
#[must_use]
pub fn extract(content: &str, filename: &str) -> Extraction {
    let line_count = content.lines().count();
    let Some(language) = extension(filename)
        .and_then(|ext| LANGUAGES.iter().find(|lang| lang.extensions.contains(&ext.as_str())))
    else {
        return Extraction { symbols: Vec::new(), line_count };
    };

    let mut found: Vec<(usize, &str)> = language
        .patterns
        .iter()
        .flat_map(|pattern| pattern.captures_iter(content))
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str()))
        .filter(|(_, name)| !NOT_SYMBOLS.contains(name))
        .collect();
    found.sort_by_key(|(offset, _)| *offset);

    let mut seen = HashSet::new();
    let symbols = found
        .into_iter()
        .filter(|(_, name)| seen.insert(*name))
        .map(|(_, name)| name.to_string())
        .collect();

    Extraction { symbols, line_count }
}

/// Human-readable description of a file's type, keyed by extension.
#[must_use]
pub fn describe_file_type(filename: &str) -> &'static str {
    match extension(filename).as_deref() {
        Some("py") => "Python module",
        Some("js" | "mjs" | "cjs") => "JavaScript module",
        Some("ts") => "TypeScript module",
        Some("tsx") => "React TypeScript component",
        Some("jsx") => "React JavaScript component",
        Some("java") => "Java class",
        Some("kt" | "kts") => "Kotlin source file",
        Some("rb") => "Ruby script",
        Some("go") => "Go source file",
        Some("rs") => "Rust source file",
        Some("c" | "h") => "C source file",
        Some("cpp" | "cc" | "cxx" | "hpp") => "C++ source file",
        Some("cs") => "C# source file",
        Some("php") => "PHP script",
        Some("sh" | "bash" | "zsh") => "shell script",
        Some("sql") => "SQL script",
        Some("yaml" | "yml") => "YAML configuration",
        Some("json") => "JSON configuration",
        Some("toml") => "TOML configuration",
        Some("md") => "Markdown document",
        Some("html") => "HTML template",
        Some("css") => "CSS stylesheet",
        _ => "source file",
    }
}

/// Finds file names mentioned in `texts` that may have replaced
/// `deleted_path`.
///
/// Purely textual: any token that looks like a source file name counts,
/// except the deceased itself and well-known projects such as `Node.js`.
/// Order of first mention, no duplicates.
#[must_use]
pub fn find_survivors(deleted_path: &str, texts: &[&str]) -> Vec<String> {
    let basename = deleted_path.rsplit('/').next().unwrap_or(deleted_path);
    let mut seen = HashSet::new();
    texts
        .iter()
        .flat_map(|text| SURVIVOR_PATTERN.captures_iter(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_start_matches("./").trim_end_matches('.'))
        .filter(|name| *name != deleted_path && *name != basename)
        .filter(|name| !is_js_project(name))
        .filter(|name| seen.insert(name.to_string()))
        .map(String::from)
        .collect()
}
