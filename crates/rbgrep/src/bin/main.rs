use rbregex::{MatchLimits, MatchResult, Options, Pattern, RegexError};
use std::env;
use std::fs;
use std::io::{self, BufRead};
use std::process;

const VERSION: &str = "rbgrep 0.1.0";

fn print_usage() {
    eprintln!("usage: rbgrep [options] pattern [file ...]");
    eprintln!("Available options are:");
    eprintln!("  -i        case-insensitive matching");
    eprintln!("  -x        extended (free-spacing) pattern syntax");
    eprintln!("  -m        let '.' match newlines");
    eprintln!("  -v        select non-matching lines");
    eprintln!("  -n        prefix output with line numbers");
    eprintln!("  -o        print only the matched part of the line");
    eprintln!("  -g name   print only the named capture group");
    eprintln!("  -c        print only a count of matching lines");
    eprintln!("  -V        show version information");
    eprintln!("  --        stop handling options");
}

#[derive(Default)]
struct CliOptions {
    pattern: Option<String>,
    files: Vec<String>,
    regex_options: u16,
    invert: bool,
    line_numbers: bool,
    only_matching: bool,
    group: Option<String>,
    count_only: bool,
    show_version: bool,
}

fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().collect();
    let mut opts = CliOptions::default();
    let mut i = 1;
    let mut stop_options = false;

    while i < args.len() {
        let arg = &args[i];

        if !stop_options && arg.starts_with('-') && arg.len() > 1 {
            match arg.as_str() {
                "-i" => opts.regex_options |= Options::IGNORECASE.bits(),
                "-x" => opts.regex_options |= Options::EXTENDED.bits(),
                "-m" => opts.regex_options |= Options::MULTILINE.bits(),
                "-v" => opts.invert = true,
                "-n" => opts.line_numbers = true,
                "-o" => opts.only_matching = true,
                "-c" => opts.count_only = true,
                "-V" => opts.show_version = true,
                "-g" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("'-g' needs argument".to_string());
                    }
                    opts.group = Some(args[i].clone());
                }
                "--" => stop_options = true,
                _ => return Err(format!("unrecognized option '{}'", arg)),
            }
        } else if opts.pattern.is_none() {
            opts.pattern = Some(arg.clone());
        } else {
            opts.files.push(arg.clone());
        }
        i += 1;
    }

    Ok(opts)
}

struct Scanner {
    pattern: Pattern,
    limits: MatchLimits,
    // Most recent successful match, the way an embedding runtime keeps
    // a last-match register on the caller's side.
    last_match: Option<MatchResult>,
    opts: CliOptions,
    matched_lines: u64,
}

impl Scanner {
    fn scan_line(&mut self, line: &str, number: usize) -> Result<(), RegexError> {
        let result = self
            .pattern
            .search(line.as_bytes(), 0, false, &self.limits)?;
        let hit = result.is_some();
        if let Some(m) = result {
            self.last_match = Some(m);
        }
        if hit == self.invert() {
            return Ok(());
        }
        self.matched_lines += 1;
        if self.opts.count_only {
            return Ok(());
        }
        let text = self.output_text(line)?;
        if self.opts.line_numbers {
            println!("{}:{}", number, text);
        } else {
            println!("{}", text);
        }
        Ok(())
    }

    fn invert(&self) -> bool {
        self.opts.invert
    }

    fn output_text(&self, line: &str) -> Result<String, RegexError> {
        if self.invert() {
            return Ok(line.to_string());
        }
        let Some(m) = &self.last_match else {
            return Ok(line.to_string());
        };
        if let Some(name) = &self.opts.group {
            let captured = m.captured(name.as_str())?;
            return Ok(String::from_utf8_lossy(captured.unwrap_or(b"")).into_owned());
        }
        if self.opts.only_matching {
            return Ok(String::from_utf8_lossy(m.matched()).into_owned());
        }
        Ok(line.to_string())
    }
}

fn run(opts: CliOptions) -> Result<u64, String> {
    let source = opts
        .pattern
        .clone()
        .ok_or_else(|| "no pattern given".to_string())?;
    let pattern = Pattern::with_options(&source, Options::from_bits(opts.regex_options))
        .map_err(|e| format!("{}", e))?;

    let files = opts.files.clone();
    let count_only = opts.count_only;
    let mut scanner = Scanner {
        pattern,
        limits: MatchLimits::default(),
        last_match: None,
        opts,
        matched_lines: 0,
    };

    if files.is_empty() {
        let stdin = io::stdin();
        for (number, line) in stdin.lock().lines().enumerate() {
            let line = line.map_err(|e| format!("{}", e))?;
            scanner
                .scan_line(&line, number + 1)
                .map_err(|e| format!("{}", e))?;
        }
    } else {
        for file in &files {
            let content =
                fs::read_to_string(file).map_err(|e| format!("cannot open {}: {}", file, e))?;
            for (number, line) in content.lines().enumerate() {
                scanner
                    .scan_line(line, number + 1)
                    .map_err(|e| format!("{}", e))?;
            }
        }
    }

    if count_only {
        println!("{}", scanner.matched_lines);
    }
    Ok(scanner.matched_lines)
}

fn main() {
    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("rbgrep: {}", err);
            print_usage();
            process::exit(2);
        }
    };

    if opts.show_version {
        println!("{}", VERSION);
        return;
    }

    match run(opts) {
        Ok(0) => process::exit(1),
        Ok(_) => {}
        Err(err) => {
            eprintln!("rbgrep: {}", err);
            process::exit(2);
        }
    }
}
