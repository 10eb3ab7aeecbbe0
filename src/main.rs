//! partint - CLI Entry Point
//!
//! Commands:
//! - `partint demo` - Print the sample additions and multiplications
//! - `partint run <script>` - Run a script file
//! - `partint calc <op> <lhs> [rhs]` - Evaluate a single operation
//! - `partint admits <digits> <n>...` - Membership checks
//! - `partint fmt <script>` - Normalize a script file
//! - `partint test` - Built-in self-test

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::collections::BTreeMap;

#[derive(Parser)]
#[command(name = "partint")]
#[command(version = "0.1.0")]
#[command(about = "Partially-known fixed-width integers with windowed carry tracking")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Width/precision combinations available at runtime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// 8 bits, 4-bit window
    I8,
    /// 16 bits, 5-bit window
    I16,
    /// 32 bits, 6-bit window
    I32,
    /// 64 bits, 6-bit window
    I64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum CalcOp {
    Add,
    Sub,
    Mul,
    Neg,
    Shl,
    Join,
    Meet,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sample computations
    Demo,
    /// Run a script file
    Run {
        /// Path to the script
        script: String,
        /// Integer shape
        #[arg(short, long, value_enum, default_value = "i64")]
        preset: Preset,
        /// Print a JSON report instead of plain lines
        #[arg(long)]
        json: bool,
    },
    /// Evaluate a single operation on digit strings
    Calc {
        /// Operation to apply
        #[arg(value_enum)]
        op: CalcOp,
        /// Left operand (digits over 0, 1, u)
        lhs: String,
        /// Right operand, required by binary operations
        rhs: Option<String>,
        /// Shift amount, required by `shl`
        #[arg(short, long, required_if_eq("op", "shl"))]
        amount: Option<usize>,
        /// Integer shape
        #[arg(short, long, value_enum, default_value = "i64")]
        preset: Preset,
        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },
    /// Check which concrete values a digit string admits
    Admits {
        /// Value as digits over 0, 1, u
        digits: String,
        /// Concrete values to test
        #[arg(required = true)]
        values: Vec<u64>,
        /// Integer shape
        #[arg(short, long, value_enum, default_value = "i64")]
        preset: Preset,
    },
    /// Rewrite a script in normalized form
    Fmt {
        /// Path to the script
        script: String,
        /// Output path (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run the built-in self-test
    Test,
}

macro_rules! with_preset {
    ($preset:expr, $func:ident ( $($arg:expr),* )) => {
        match $preset {
            Preset::I8 => $func::<8, 4>($($arg),*),
            Preset::I16 => $func::<16, 5>($($arg),*),
            Preset::I32 => $func::<32, 6>($($arg),*),
            Preset::I64 => $func::<64, 6>($($arg),*),
        }
    };
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Demo) => demo(),
        Some(Commands::Run { script, preset, json }) => {
            with_preset!(preset, run_script(&script, json));
        }
        Some(Commands::Calc { op, lhs, rhs, amount, preset, json }) => {
            with_preset!(preset, calc(op, &lhs, rhs.as_deref(), amount, json));
        }
        Some(Commands::Admits { digits, values, preset }) => {
            with_preset!(preset, admits(&digits, &values));
        }
        Some(Commands::Fmt { script, output }) => {
            format_script(&script, output);
        }
        Some(Commands::Test) => run_self_test(),
        None => {
            println!("partint v0.1.0");
            println!("Partially-known integers with windowed carry tracking");
            println!();
            println!("Use --help for available commands");
            demo();
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("⚠️  Logging unavailable: {}", e);
    }
}

fn parse_or_exit<const W: usize, const P: usize>(digits: &str) -> partint::PartialInt<W, P> {
    match digits.parse() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("❌ Invalid value {:?}: {}", digits, e);
            std::process::exit(1);
        }
    }
}

#[derive(Serialize)]
struct RunReport {
    statements: usize,
    output: Vec<String>,
    variables: BTreeMap<String, String>,
}

fn run_script<const W: usize, const P: usize>(path: &str, json: bool) {
    use partint::{load_script, Session};

    let script = match load_script(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ Failed to load script: {}", e);
            std::process::exit(1);
        }
    };

    let mut session = Session::<W, P>::new();
    let result = session.run(&script);

    if json {
        let report = RunReport {
            statements: session.executed,
            output: session.output().to_vec(),
            variables: session
                .variables()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("❌ Failed to encode report: {}", e),
        }
    } else {
        for line in session.output() {
            println!("{}", line);
        }
    }

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

#[derive(Serialize)]
struct CalcReport<const W: usize, const P: usize> {
    op: CalcOp,
    operands: Vec<String>,
    result: String,
    value: partint::PartialInt<W, P>,
}

fn calc<const W: usize, const P: usize>(
    op: CalcOp,
    lhs: &str,
    rhs: Option<&str>,
    amount: Option<usize>,
    json: bool,
) {
    use partint::Lattice;

    let a = parse_or_exit::<W, P>(lhs);
    let binary = |rhs: Option<&str>| match rhs {
        Some(digits) => parse_or_exit::<W, P>(digits),
        None => {
            eprintln!("❌ {:?} needs a right operand", op);
            std::process::exit(1);
        }
    };

    let value = match op {
        CalcOp::Add => a.add(&binary(rhs)),
        CalcOp::Sub => a.subtract(&binary(rhs)),
        CalcOp::Mul => a.multiply(&binary(rhs)),
        CalcOp::Join => a.join(&binary(rhs)),
        CalcOp::Meet => a.meet(&binary(rhs)),
        CalcOp::Neg => a.negate(),
        CalcOp::Shl => {
            let amount = match amount {
                Some(n) => n,
                None => {
                    eprintln!("❌ shl needs --amount");
                    std::process::exit(1);
                }
            };
            match a.checked_left_shift(amount) {
                Some(v) => v,
                None => {
                    eprintln!("❌ Shift by {} out of range for width {}", amount, W);
                    std::process::exit(1);
                }
            }
        }
    };

    if json {
        let mut operands = vec![lhs.to_string()];
        operands.extend(rhs.map(str::to_string));
        let report = CalcReport { op, operands, result: value.to_string(), value };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Failed to encode report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", value);
    }
}

fn admits<const W: usize, const P: usize>(digits: &str, values: &[u64]) {
    let value = parse_or_exit::<W, P>(digits);
    for n in values {
        let mark = if value.admits(*n) { "✓" } else { "✗" };
        println!("{} {} admits {}", mark, value, n);
    }
}

fn format_script(path: &str, output: Option<String>) {
    use partint::{load_script, script::save_script};

    let out_path = output.unwrap_or_else(|| path.to_string());
    let script = match load_script(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ Failed to load script: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = save_script(&out_path, &script) {
        eprintln!("❌ Failed to save script: {}", e);
        std::process::exit(1);
    }
    println!("✓ Wrote {} statements to {}", script.len(), out_path);
}

fn demo() {
    use partint::Int64;

    println!();
    println!("## Addition phase 1");
    let a = Int64::new("00u");
    let b = Int64::new("001");
    let c = Int64::new("001");
    println!("{}", a.add(&b).add(&c).write(true));

    println!();
    println!("## Addition phase 2");
    println!("{}", a.add(&b.add(&c)));

    println!();
    println!("## Addition phase 3");
    let a = Int64::new("000");
    let b = Int64::new("001");
    let c = Int64::new("0u1");
    println!("{}", a.add(&b));
    println!("{}", a.add(&c));
    println!("{}", b.add(&c));

    println!();
    println!("## Multiplication phase 1");
    let a = Int64::new("00u");
    let b = Int64::new("1u1");
    println!("{}", a.multiply(&b).write(true));
    println!("{}", b.multiply(&a).write(true));
    println!("{}", a.multiply(&a).write(true));
}

fn run_self_test() {
    use partint::{Int8, Int64};

    println!("━━━ partint Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;
    let mut check = |name: &str, ok: bool| {
        if ok {
            println!("{}... ✓", name);
            passed += 1;
        } else {
            println!("{}... ✗", name);
            failed += 1;
        }
    };

    let a = Int64::new("00u");
    let b = Int64::new("001");
    let c = Int64::new("001");
    check("Addition (a + b) + c renders 1u", a.add(&b).add(&c).write(true) == "1u");
    check("Addition (b + a) + c renders 1u", b.add(&a).add(&c).write(true) == "1u");
    check("Addition a + (b + c) renders 1u", a.add(&b.add(&c)).write(true) == "1u");

    let bin_57 = Int64::new("111001");
    let bin_133 = Int64::new("10000101");
    let bin_190 = Int64::new("10111110");
    check("Decoded 57 admits 57", bin_57.admits(57));
    check("Decoded 133 admits 133", bin_133.admits(133));
    check("Decoded 190 admits 190", bin_190.admits(190));
    check("57 + 133 equals decoded 190", bin_57.add(&bin_133) == bin_190);
    check("57 + 133 admits 190", bin_57.add(&bin_133).admits(190));
    check(
        "57 + 133 rejects 191, 95, 382",
        [191, 95, 382].iter().all(|&n| !bin_57.add(&bin_133).admits(n)),
    );

    check(
        "Multiplication of constants",
        Int64::constant(123).multiply(&Int64::constant(456)) == Int64::constant(56088),
    );
    check(
        "Negation of constants",
        (0..=255u64).all(|n| Int8::constant(n).negate() == Int8::constant(n.wrapping_neg() & 0xFF)),
    );
    check(
        "Shift left of constants",
        Int64::constant(1).left_shift(3) == Int64::constant(8),
    );

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shl_requires_amount() {
        assert!(Cli::try_parse_from(["partint", "calc", "shl", "1u1"]).is_err());
        let cli = Cli::try_parse_from(["partint", "calc", "shl", "1u1", "--amount", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Calc { op: CalcOp::Shl, amount: Some(3), .. })
        ));
    }

    #[test]
    fn test_amount_optional_for_other_ops() {
        let cli = Cli::try_parse_from(["partint", "calc", "add", "1u1", "11"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Calc { op: CalcOp::Add, amount: None, .. })));
    }
}
