use morphrules::{CacheStats, RuleSet};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Everything the CLI prints about one input.
#[derive(Debug, Clone)]
pub struct Report {
    pub positions: Vec<PositionReport>,
    /// Rendered nodes after one greedy left-to-right fold.
    pub folded: Vec<String>,
    pub cache: CacheStats,
}

/// Matches starting at one token position.
#[derive(Debug, Clone)]
pub struct PositionReport {
    pub start: usize,
    pub token: String,
    /// Priority match (`find_first`) over the remainder of the input.
    pub first: Option<String>,
    /// Exact matches (`find_all`) per window length; empty windows are omitted.
    pub windows: Vec<WindowMatch>,
}

#[derive(Debug, Clone)]
pub struct WindowMatch {
    pub len: usize,
    pub text: String,
    pub rules: Vec<String>,
}

pub fn print_report(input: &str, rules: &RuleSet, report: &Report, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Matching: \"{}\"", input.trim()), ansi::CYAN)));
    println!(
        "  {} rules  │  max arity {}",
        palette.paint(rules.len().to_string(), ansi::GREEN),
        palette.paint(rules.max_arity().to_string(), ansi::GREEN)
    );

    println!("\n{}", palette.paint("━━━ Positions ━━━", ansi::GRAY));
    print_positions(report, &palette);

    println!("\n{}", palette.paint("━━━ Greedy fold ━━━", ansi::GRAY));
    if report.folded.is_empty() {
        println!("{}", palette.dim("  No tokens"));
    } else {
        for (idx, node) in report.folded.iter().enumerate() {
            println!(
                "  {} {}",
                palette.paint(format!("[{}]", idx), ansi::GRAY),
                palette.bold(palette.paint(node, ansi::GREEN))
            );
        }
    }

    println!("\n{}", palette.paint("━━━ Cache ━━━", ansi::GRAY));
    print_cache(&report.cache, &palette);
    println!();
}

fn print_positions(report: &Report, palette: &ansi::Palette) {
    for pos in &report.positions {
        println!("  {} {}", palette.paint(format!("@{}", pos.start), ansi::BLUE), palette.bold(&pos.token));

        match &pos.first {
            Some(rule) => println!("    {} {}", palette.dim("first:"), palette.paint(rule, ansi::CYAN)),
            None => println!("    {} {}", palette.dim("first:"), palette.dim("✗ none")),
        }

        for window in &pos.windows {
            println!(
                "    {} {}",
                palette.paint(format!("len {}", window.len), ansi::YELLOW),
                palette.dim(&window.text)
            );
            for rule in &window.rules {
                println!("      {} {}", palette.paint("✓", ansi::GREEN), palette.paint(rule, ansi::CYAN));
            }
        }
    }
}

fn print_cache(stats: &CacheStats, palette: &ansi::Palette) {
    if stats.capacity == 0 {
        println!("  {}", palette.dim("disabled"));
        return;
    }
    println!(
        "  Entries: {}  │  Hits: {}  │  Misses: {}  │  Evictions: {}  │  Hit ratio: {}",
        palette.paint(format!("{}/{}", stats.len, stats.capacity), ansi::GREEN),
        palette.paint(stats.hits.to_string(), ansi::BLUE),
        palette.paint(stats.misses.to_string(), ansi::YELLOW),
        palette.dim(stats.evictions.to_string()),
        palette.dim(format!("{:.2}", stats.hit_ratio())),
    );
}
