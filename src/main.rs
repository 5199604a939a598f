mod debug_report;

use std::io::{self, IsTerminal, Read};

use synoptic_core::{
    Encoding, FormatMode, Options, RuleSet, TokenizerConfig, default_rules, process_verbose_with,
    process_with,
};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if config.list_rules {
        print_rule_listing();
        return;
    }

    let tokenizer = TokenizerConfig::default();
    let loaded;
    let rules: &RuleSet = match &config.rules_path {
        Some(path) => {
            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    eprintln!("error: cannot read rule set {path}: {err}");
                    std::process::exit(2);
                }
            };
            match RuleSet::from_json(&text, &tokenizer) {
                Ok(ruleset) => {
                    loaded = ruleset;
                    &loaded
                }
                Err(err) => {
                    eprintln!("error: invalid rule set {path}: {err}");
                    std::process::exit(1);
                }
            }
        }
        None => default_rules(),
    };

    let options = Options { encoding: config.encoding, format: config.format, tokenizer };

    if config.report {
        match process_verbose_with(&config.input, rules, &options) {
            Ok(run) => debug_report::print_run(&run, config.color),
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    match process_with(&config.input, rules, &options) {
        Ok(result) => {
            if config.json {
                println!("{}", result.to_json());
            } else if result.statements.is_empty() {
                eprintln!("no statements");
            } else {
                for line in result.rendered() {
                    println!("{line}");
                }
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

struct CliConfig {
    input: String,
    rules_path: Option<String>,
    format: FormatMode,
    json: bool,
    encoding: Encoding,
    report: bool,
    list_rules: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut rules_path: Option<String> = None;
    let mut format = FormatMode::Default;
    let mut json = false;
    let mut encoding = Encoding::Utf8;
    let mut report = false;
    let mut list_rules = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("synoptic-core {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--report" => report = true,
            "--list-rules" => list_rules = true,
            "--rules" | "-r" => {
                let value = args.next().ok_or_else(|| "error: --rules expects a path".to_string())?;
                rules_path = Some(value);
            }
            "--format" | "-f" => {
                let value = args.next().ok_or_else(|| "error: --format expects a value".to_string())?;
                (format, json) = parse_format(&value)?;
            }
            "--encoding" | "-e" => {
                let value =
                    args.next().ok_or_else(|| "error: --encoding expects a value".to_string())?;
                encoding = parse_encoding(&value)?;
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--input=") => {
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(arg.trim_start_matches("--input=").to_string());
            }
            _ if arg.starts_with("--rules=") => {
                rules_path = Some(arg.trim_start_matches("--rules=").to_string());
            }
            _ if arg.starts_with("--format=") => {
                (format, json) = parse_format(arg.trim_start_matches("--format="))?;
            }
            _ if arg.starts_with("--encoding=") => {
                encoding = parse_encoding(arg.trim_start_matches("--encoding="))?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None if list_rules => String::new(),
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() && !list_rules {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, rules_path, format, json, encoding, report, list_rules, color })
}

fn parse_format(value: &str) -> Result<(FormatMode, bool), String> {
    if value == "json" {
        return Ok((FormatMode::Default, true));
    }
    FormatMode::from_name(value)
        .map(|mode| (mode, false))
        .ok_or_else(|| format!("error: invalid --format '{value}' (expected default, verbose, or json)"))
}

fn parse_encoding(value: &str) -> Result<Encoding, String> {
    Encoding::from_name(value)
        .ok_or_else(|| format!("error: invalid --encoding '{value}' (expected utf-8, ascii, or latin-1)"))
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_rule_listing() {
    println!("builtin rules:");
    for rule in default_rules().summaries() {
        let kind = rule.kind.map(|k| format!("  kind={k}")).unwrap_or_default();
        println!("  {:<16} priority={:<3} {}{}", rule.id, rule.priority, rule.template, kind);
    }
}

fn help_text() -> String {
    format!(
        "synoptic-core {version}

Deterministic symbolic-logic extraction CLI.

Usage:
  synoptic-core [OPTIONS] [--] <text...>
  synoptic-core [OPTIONS] --input <text>

Options:
  -i, --input <text>      Input text to process. If omitted, reads remaining
                          args or stdin when no args are provided.
  -r, --rules <path>      JSON rule-set document. Default: builtin rules.
  -f, --format <mode>     Output format: default, verbose, or json.
                          Default: default.
  -e, --encoding <name>   Byte encoding: utf-8, ascii, or latin-1.
                          Default: utf-8.
      --list-rules        Print the builtin rule set and exit.
      --report            Print a diagnostic pipeline report.
      --color             Force ANSI color output.
      --no-color          Disable ANSI color output.
  -h, --help              Show this help message.
  -V, --version           Print version information.

Exit codes:
  0  Success.
  1  Processing error (bad rule set, unrepresentable input).
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
