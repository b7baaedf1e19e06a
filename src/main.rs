mod debug_report;

use debug_report::{PositionReport, Report, WindowMatch};
use morphrules::{GrammemeSet, Node, Options, RuleSet, RuleSetBuilder, TaggedNode, demo_builder, mean_score};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let rules = match build_rules(&config) {
        Ok(rules) => rules,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let nodes = match parse_tokens(&config.input) {
        Ok(nodes) => nodes,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let report = analyze(&rules, &nodes);
    debug_report::print_report(&config.input, &rules, &report, config.color);
}

struct CliConfig {
    input: String,
    rules: Vec<(String, String)>,
    demo_grammar: bool,
    cache_capacity: usize,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut rules = Vec::new();
    let mut demo_grammar = true;
    let mut cache_capacity = Options::default().cache_capacity;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("morphrules {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--no-demo" => demo_grammar = false,
            "--rule" | "-r" => {
                let value = args.next().ok_or_else(|| "error: --rule expects a value".to_string())?;
                rules.push(parse_rule_arg(&value)?);
            }
            "--cache-capacity" => {
                let value = args.next().ok_or_else(|| "error: --cache-capacity expects a value".to_string())?;
                cache_capacity = parse_capacity(&value)?;
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
            _ if arg.starts_with("--rule=") => {
                rules.push(parse_rule_arg(arg.trim_start_matches("--rule="))?);
            }
            _ if arg.starts_with("--cache-capacity=") => {
                cache_capacity = parse_capacity(arg.trim_start_matches("--cache-capacity="))?;
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
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
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, rules, demo_grammar, cache_capacity, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

/// `LEFT -> RIGHT`, the same shape rules are displayed in.
fn parse_rule_arg(value: &str) -> Result<(String, String), String> {
    let (left, right) = value
        .split_once("->")
        .ok_or_else(|| format!("error: invalid --rule '{value}' (expected 'LEFT -> RIGHT')"))?;
    Ok((left.trim().to_string(), right.trim().to_string()))
}

fn parse_capacity(value: &str) -> Result<usize, String> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("error: invalid --cache-capacity '{value}' (expected a non-negative integer)"))
}

fn build_rules(config: &CliConfig) -> Result<RuleSet, String> {
    let options = Options { cache_capacity: config.cache_capacity };
    let mut builder = if config.demo_grammar {
        demo_builder(options).map_err(|err| format!("error: demo grammar: {err}"))?
    } else {
        RuleSetBuilder::with_options(options)
    };

    for (left, right) in &config.rules {
        builder.add(left, right).map_err(|err| format!("error: rule '{left} -> {right}': {err}"))?;
    }

    if builder.is_empty() {
        return Err("error: no rules (pass --rule or drop --no-demo)".to_string());
    }
    Ok(builder.build())
}

/// Tokens are `word/TAG,TAG`, `/TAG` (no surface word) or a bare `word`.
fn parse_tokens(input: &str) -> Result<Vec<TaggedNode>, String> {
    let token_re = morphrules::regex!(r"^(?P<word>.*)/(?P<tags>[^/]*)$");

    input
        .split_whitespace()
        .map(|token| {
            let Some(caps) = token_re.captures(token) else {
                return Ok(TaggedNode::word(token, GrammemeSet::new()));
            };
            let word = &caps["word"];
            let tags = GrammemeSet::parse(&caps["tags"]).map_err(|err| format!("error: token '{token}': {err}"))?;
            Ok(if word.is_empty() { TaggedNode::tagged(tags) } else { TaggedNode::word(word, tags) })
        })
        .collect()
}

/// Probe every start position with `find_first`, every window up to
/// `max_arity` with `find_all`, then do one greedy left-to-right fold.
fn analyze(rules: &RuleSet, nodes: &[TaggedNode]) -> Report {
    let max_arity = rules.max_arity();
    let mut positions = Vec::with_capacity(nodes.len());

    for start in 0..nodes.len() {
        let first = rules.find_first(&nodes[start..]).map(|r| r.to_string());
        let mut windows = Vec::new();
        for len in 1..=max_arity.min(nodes.len() - start) {
            let window = &nodes[start..start + len];
            let found = rules.find_all(window);
            if !found.is_empty() {
                windows.push(WindowMatch {
                    len,
                    text: window.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" "),
                    rules: found.iter().map(|r| r.to_string()).collect(),
                });
            }
        }
        positions.push(PositionReport { start, token: nodes[start].to_string(), first, windows });
    }

    let mut folded = Vec::new();
    let mut rest = nodes;
    while !rest.is_empty() {
        match rules.find_first(rest).and_then(|rule| rule.match_prefix(rest)).filter(|m| !m.consumed().is_empty()) {
            Some(m) => {
                folded.push(m.apply(mean_score));
                rest = m.rest();
            }
            None => {
                folded.push(rest[0].clone());
                rest = &rest[1..];
            }
        }
    }

    tracing::debug!(keys = %nodes.iter().map(Node::cache_key).collect::<Vec<_>>().join(" "), "analyzed input");

    Report { positions, folded: folded.iter().map(|n| n.to_string()).collect(), cache: rules.cache_stats() }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "morphrules {version}

Grammar rule matching over tagged tokens.

Usage:
  morphrules [OPTIONS] [--] <tokens...>
  morphrules [OPTIONS] --input <tokens>

Tokens are whitespace-separated 'word/TAG,TAG' items, e.g.
  morphrules the/DET big/ADJ dog/NOUN barks/VERB

Options:
  -i, --input <tokens>       Tokens to analyze. If omitted, reads remaining args
                             or stdin when no args are provided.
  -r, --rule <'L -> R'>      Add a production (repeatable), e.g. \"NP -> ADJ NOUN\".
  --no-demo                  Do not load the built-in demo grammar.
  --cache-capacity <n>       find_all cache size; 0 disables. Default: {capacity}
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  RUST_LOG                   Log filter, e.g. morphrules=trace. Default: warn

Exit codes:
  0  Success.
  2  Invalid arguments, rules or input.
",
        version = env!("CARGO_PKG_VERSION"),
        capacity = Options::default().cache_capacity
    )
}
