//! `hermite`: classify real numbers and inspect the evidence.
//!
//! **Usage:**
//! ```text
//! hermite [OPTIONS] classify <VALUE>
//! hermite [OPTIONS] periodicity <VALUE> [--show N]
//! hermite [OPTIONS] verify <VALUE> [--poly c0,c1,...]
//! hermite [OPTIONS] cf <VALUE> [--terms N]
//! hermite [OPTIONS] polynomial <c0,c1,...>
//! ```
//!
//! `<VALUE>` is an expression such as `cbrt(2)`, `2^(1/3) + 1`, `355/113`
//! or `(1 + sqrt(5))/2`. Settings come from `--config <file.toml>` and are
//! overridden by flags. Logging is controlled by `RUST_LOG` and goes to
//! stderr.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hermite::analyzer::{degree, find_factor, rational_roots};
use hermite::continued_fraction::{continued_fraction, convergents};
use hermite::hapd::{PeriodicityReport, PeriodicityStatus, TerminationReason};
use hermite::verifier::{CubicEvidence, CubicVerdict};
use hermite::{
    classify, is_irreducible, run_periodicity, verify_cubic, Classification, HermiteConfig, Real,
};
use hermite_clients::{parse_polynomial, parse_value};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Detect cubic irrationals by projective-triple periodicity and
/// companion-matrix verification.
#[derive(Parser)]
#[command(
    name = "hermite",
    version,
    about = "Classify real numbers as rational, quadratic, cubic or beyond"
)]
struct Args {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

/// Settings shared by every subcommand.
#[derive(clap::Args)]
struct Settings {
    /// TOML file with `HermiteConfig` fields.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Working precision in decimal digits.
    #[arg(long, global = true)]
    precision: Option<u32>,

    /// Absolute tolerance for zero tests and comparisons.
    #[arg(long, global = true)]
    tolerance: Option<f64>,

    /// Iteration cap of the periodicity search.
    #[arg(long, global = true)]
    max_iterations: Option<usize>,

    /// Confirmations a period needs.
    #[arg(long, global = true)]
    min_confirmations: Option<usize>,

    /// Highest degree of the minimal-polynomial search.
    #[arg(long, global = true)]
    max_degree: Option<usize>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Full classification.
    Classify {
        /// Value expression.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Run the projective-triple iteration.
    Periodicity {
        /// Value expression.
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Digit pairs to print.
        #[arg(long, default_value_t = 20)]
        show: usize,
    },
    /// Companion-matrix cubic verification.
    Verify {
        /// Value expression.
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Coefficients, highest degree first; discovered when omitted.
        #[arg(long, allow_hyphen_values = true)]
        poly: Option<String>,
    },
    /// Continued-fraction expansion.
    Cf {
        /// Value expression.
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Maximum number of terms.
        #[arg(long, default_value_t = 20)]
        terms: usize,
    },
    /// Degree and irreducibility of a polynomial.
    Polynomial {
        /// Coefficients, highest degree first.
        #[arg(allow_hyphen_values = true)]
        coefficients: String,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(&args.settings)?;
    let json = args.settings.json;

    match args.command {
        Command::Classify { value } => {
            let value = evaluate(&value, &config)?;
            let result = classify(&value, &config)?;
            if json {
                print_json(&result)?;
            } else {
                print_classification(&value, &result);
            }
        }
        Command::Periodicity { value, show } => {
            let value = evaluate(&value, &config)?;
            let report = run_periodicity(&value, &config)?;
            if json {
                print_json(&report)?;
            } else {
                print_report(&report, show);
            }
        }
        Command::Verify { value, poly } => {
            let value = evaluate(&value, &config)?;
            let polynomial = poly
                .as_deref()
                .map(parse_polynomial)
                .transpose()
                .context("parsing --poly")?;
            let verdict = verify_cubic(&value, polynomial.as_ref(), &config)?;
            if json {
                print_json(&verdict)?;
            } else {
                print_verdict(&verdict);
            }
        }
        Command::Cf { value, terms } => {
            let value = evaluate(&value, &config)?;
            let tolerance = config.tolerance_at(value.precision())?;
            let cf = continued_fraction(&value, terms, &tolerance);
            if json {
                print_json(&cf)?;
            } else {
                let terms: Vec<String> = cf.terms.iter().map(ToString::to_string).collect();
                match terms.split_first() {
                    Some((head, tail)) => println!("[{head}; {}]", tail.join(", ")),
                    None => println!("[]"),
                }
                println!("terminated:  {}", if cf.terminated { "yes" } else { "no" });
                if let Some(last) = convergents(&cf.terms).last() {
                    println!("convergent:  {last}");
                }
            }
        }
        Command::Polynomial { coefficients } => {
            let polynomial = parse_polynomial(&coefficients).context("parsing coefficients")?;
            let found_degree = degree(polynomial.coefficients());
            let irreducible = is_irreducible(&polynomial);
            let factor = find_factor(&polynomial);
            let roots = rational_roots(&polynomial);
            if json {
                let roots: Vec<String> = roots.iter().map(ToString::to_string).collect();
                print_json(&serde_json::json!({
                    "polynomial": polynomial,
                    "degree": found_degree,
                    "irreducible": irreducible,
                    "factor": factor,
                    "rational_roots": roots,
                }))?;
            } else {
                println!("polynomial:  {polynomial}");
                println!("degree:      {found_degree}");
                println!("irreducible: {}", if irreducible { "yes" } else { "no" });
                if let Some(factor) = factor {
                    println!("factor:      {factor}");
                }
                if !roots.is_empty() {
                    let roots: Vec<String> = roots.iter().map(ToString::to_string).collect();
                    println!("roots:       {}", roots.join(", "));
                }
            }
        }
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

/// File settings first, then flags.
fn load_config(settings: &Settings) -> Result<HermiteConfig> {
    let mut config = match &settings.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => HermiteConfig::default(),
    };
    if let Some(precision) = settings.precision {
        config.precision = precision;
    }
    if let Some(tolerance) = settings.tolerance {
        config.tolerance = tolerance;
    }
    if let Some(max_iterations) = settings.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(min_confirmations) = settings.min_confirmations {
        config.min_confirmations = min_confirmations;
    }
    if let Some(max_degree) = settings.max_degree {
        config.max_degree = max_degree;
    }
    config.validate().context("invalid configuration")?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn evaluate(expression: &str, config: &HermiteConfig) -> Result<Real> {
    let precision = config.working_precision()?;
    parse_value(expression, precision).with_context(|| format!("evaluating '{expression}'"))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_classification(value: &Real, result: &Classification) {
    println!("value:       {value}");
    println!("kind:        {}", result.kind);
    println!("confidence:  {}", result.confidence);
    println!("method:      {}", result.method);
    if let Some(polynomial) = &result.polynomial {
        println!("polynomial:  {polynomial}");
    }
    if let Some(verdict) = &result.verification {
        println!("matrix:      {}", verdict.label());
    }
    if let Some(report) = &result.periodicity {
        println!("periodicity: {}", describe_status(&report.status));
    }
}

fn print_report(report: &PeriodicityReport, show: usize) {
    println!("status:      {}", describe_status(&report.status));
    println!("iterations:  {}", report.iterations());
    if !report.digit_pairs.is_empty() {
        let pairs: Vec<String> = report
            .digit_pairs
            .iter()
            .take(show)
            .map(ToString::to_string)
            .collect();
        let more = if report.digit_pairs.len() > show { " ..." } else { "" };
        println!("digits:      {}{more}", pairs.join(" "));
        if let Some(encoded) = report.encoded_sequence() {
            let codes: Vec<String> = encoded.iter().take(show).map(ToString::to_string).collect();
            println!("encoded:     {}{more}", codes.join(" "));
        }
    }
    for m in &report.matches {
        println!(
            "match:       step {} ~ point {} (period {})",
            m.iteration, m.earlier, m.period
        );
    }
}

fn describe_status(status: &PeriodicityStatus) -> String {
    match status {
        PeriodicityStatus::Periodic {
            preperiod,
            period,
            confirmations,
        } => format!(
            "periodic (preperiod {preperiod}, period {period}, {confirmations} confirmations)"
        ),
        PeriodicityStatus::Terminated { reason } => match reason {
            TerminationReason::SmallDenominator { rational } => {
                format!("terminated (equals {rational})")
            }
            TerminationReason::ContinuedFraction { terms } => {
                format!("terminated (continued fraction of {} terms)", terms.len())
            }
            TerminationReason::VanishingThirdComponent { step } => {
                format!("terminated (v3 vanished at step {step})")
            }
        },
        PeriodicityStatus::Collapsed { step, component } => {
            format!("collapsed (r{component} vanished at step {step})")
        }
        PeriodicityStatus::PotentiallyPeriodic { candidates } => {
            let list: Vec<String> = candidates
                .iter()
                .map(|c| format!("{}x{}", c.period, c.confirmations))
                .collect();
            format!("potentially periodic (candidates {})", list.join(", "))
        }
        PeriodicityStatus::NoPeriodicity => "no periodicity".to_string(),
    }
}

fn print_verdict(verdict: &CubicVerdict) {
    println!("verdict:     {}", verdict.label());
    if let Some(polynomial) = verdict.polynomial() {
        println!("polynomial:  {polynomial}");
    }
    match verdict {
        CubicVerdict::NotCubic { reason, .. } => println!("reason:      {reason:?}"),
        CubicVerdict::Inconclusive { reason } => println!("reason:      {reason:?}"),
        CubicVerdict::CubicIrrational { .. } => {}
    }
    if let Some(evidence) = verdict.evidence() {
        print_evidence(evidence);
    }
}

fn print_evidence(evidence: &CubicEvidence) {
    let traces: Vec<String> = evidence
        .traces
        .values()
        .iter()
        .map(|t| t.to_decimal_string(6))
        .collect();
    println!("traces:      {}", traces.join(", "));
    for check in &evidence.checks {
        println!(
            "  k = {}:     {} (error {})",
            check.power,
            if check.passed { "ok" } else { "FAILED" },
            check.error.to_scientific_string(3)
        );
    }
    println!("residual:    {}", evidence.residual.to_scientific_string(3));
    println!("root:        {}", if evidence.is_root { "yes" } else { "no" });
}
