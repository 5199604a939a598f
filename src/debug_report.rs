use synoptic_core::{FormatMode, ProcessResultVerbose};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const YELLOW: &str = "\x1b[33m";
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

pub fn print_run(run: &ProcessResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &run.details;
    let result = &run.result;

    println!("\n{}", palette.bold(palette.paint(format!("⚙  Processing: \"{}\"", result.text), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Pipeline ━━━", ansi::GRAY));
    println!("  tokenize  {:>10.1?}", details.tokenize);
    println!("  matching  {:>10.1?}", details.matching);
    println!("  build     {:>10.1?}", details.build);
    println!("  total     {:>10.1?}", details.total);
    println!(
        "  {}",
        palette.dim(format!(
            "{} positions scanned, {} rule attempts",
            details.positions_scanned, details.rules_attempted
        ))
    );

    println!("\n{}", palette.paint("━━━ Active rules ━━━", ansi::GRAY));
    if details.active_rules.is_empty() {
        println!("{}", palette.dim("  none (all rules gated out for this input)"));
    } else {
        for rule in &details.active_rules {
            println!("  - {rule}");
        }
    }

    println!("\n{}", palette.paint("━━━ Tokens ━━━", ansi::GRAY));
    for token in &details.tokens {
        let line = format!(
            "  {:>4}..{:<4} {:<10} {:?}",
            token.start,
            token.end,
            token.kind,
            token.preview
        );
        if token.skip {
            println!("{}", palette.dim(line));
        } else {
            println!("{line}");
        }
    }

    println!("\n{}", palette.paint("━━━ Matches ━━━", ansi::GRAY));
    if details.matches.is_empty() {
        println!("{}", palette.dim("  no matches"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • Rules were gated out (check required literals)");
        println!("  • Patterns didn't align with the token stream");
        println!("\n{}", palette.dim("  Tip: set SYNOPTIC_DEBUG_RULES=1 to see rule filtering details"));
    } else {
        for m in &details.matches {
            println!(
                "  {:<16} tokens {}..{}  bytes {}..{}",
                m.rule, m.token_span.0, m.token_span.1, m.byte_span.start, m.byte_span.end
            );
        }
    }

    println!("\n{}", palette.paint("━━━ Statements ━━━", ansi::GRAY));
    if result.statements.is_empty() {
        println!("{}", palette.dim("  none"));
    } else {
        for statement in &result.statements {
            println!("  {}", statement.format(FormatMode::Verbose));
        }
    }
    println!();
}
