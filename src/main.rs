//! stepcalc CLI
//!
//! Runs one analysis and prints its step trail, optionally as JSON or with an
//! ASCII plot of the function around the analysis point.

use std::process;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use stepcalc::plot::{analysis_marker, sample_curve, Marker, PlotWindow};
use stepcalc::{AnalysisReport, Analyzer, Expression, Mode, SolutionStep};

const PLOT_WIDTH: usize = 72;
const PLOT_HEIGHT: usize = 20;

#[derive(Parser)]
#[command(name = "stepcalc")]
#[command(about = "Step-by-step limit, derivative, continuity and sign analysis")]
#[command(version)]
struct Cli {
    /// Function of one variable, e.g. "(x^2 - 4)/(x - 2)"
    #[arg(default_value = "(x^2 - 8*x + 15)/(x^2 - 5)")]
    expression: String,

    /// Analysis to run: limit, derivative, continuity or sign
    #[arg(long, short = 'm', default_value = "limit")]
    mode: Mode,

    /// Point of analysis (ignored in sign mode)
    #[arg(long, short = 'p', default_value_t = 3.0, allow_hyphen_values = true)]
    point: f64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Show the LaTeX form of each step
    #[arg(long)]
    latex: bool,

    /// Draw an ASCII plot around the point
    #[arg(long)]
    plot: bool,

    /// Values closer to zero than this count as zero
    #[arg(long)]
    epsilon: Option<f64>,

    /// Agreement threshold for one-sided limits
    #[arg(long)]
    tolerance: Option<f64>,

    /// Lower bound of the sign-analysis grid
    #[arg(long, allow_hyphen_values = true)]
    grid_min: Option<f64>,

    /// Upper bound of the sign-analysis grid
    #[arg(long, allow_hyphen_values = true)]
    grid_max: Option<f64>,

    /// Spacing of the sign-analysis grid
    #[arg(long)]
    grid_step: Option<f64>,
}

impl Cli {
    fn analyzer(&self) -> Analyzer {
        let mut analyzer = Analyzer::new();
        if let Some(eps) = self.epsilon {
            analyzer = analyzer.epsilon(eps);
        }
        if let Some(tol) = self.tolerance {
            analyzer = analyzer.tolerance(tol);
        }
        let c = analyzer.config().clone();
        analyzer.grid(
            self.grid_min.unwrap_or(c.grid_min),
            self.grid_max.unwrap_or(c.grid_max),
            self.grid_step.unwrap_or(c.grid_step),
        )
    }
}

fn init_logging() {
    let filter = if std::env::var("STEPCALC_TRACE").is_ok_and(|v| v == "1") {
        EnvFilter::new("stepcalc=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_step(step: &SolutionStep, latex: bool) {
    println!("{}", step.label);
    println!("{}", step.content);
    if latex {
        if let Some(math) = &step.math {
            println!("  LaTeX: {math}");
        }
    }
    println!();
}

fn print_report(report: &AnalysisReport, latex: bool) {
    for step in report.steps() {
        print_step(step, latex);
    }
    println!("Result: {}", report.summary());
}

/// Character grid with the curve, axes and the analysis marker
fn render_plot(expression: &Expression, analyzer: &Analyzer, x0: f64) -> String {
    let config = analyzer.config();
    let window = PlotWindow::around(x0);
    let curve = sample_curve(expression, &window, config);
    let marker = analysis_marker(expression, x0, config);

    let (mut y_min, mut y_max) = curve.y_range().unwrap_or((-1.0, 1.0));
    if let Marker::Filled { y, .. } | Marker::Hollow { y, .. } = marker {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let col = |x: f64| {
        let t = (x - window.x_min) / (window.x_max - window.x_min);
        ((t * (PLOT_WIDTH - 1) as f64).round() as isize).clamp(0, PLOT_WIDTH as isize - 1) as usize
    };
    let row = |y: f64| {
        let t = (y_max - y) / (y_max - y_min);
        ((t * (PLOT_HEIGHT - 1) as f64).round() as isize).clamp(0, PLOT_HEIGHT as isize - 1) as usize
    };

    let mut grid = vec![vec![' '; PLOT_WIDTH]; PLOT_HEIGHT];
    if y_min <= 0.0 && y_max >= 0.0 {
        let r = row(0.0);
        grid[r].iter_mut().for_each(|c| *c = '-');
    }
    if window.x_min <= 0.0 && window.x_max >= 0.0 {
        let c = col(0.0);
        grid.iter_mut().for_each(|line| line[c] = '|');
    }
    let guide = col(marker.x());
    for line in grid.iter_mut() {
        if line[guide] == ' ' {
            line[guide] = ':';
        }
    }
    for &(x, y) in curve.segments.iter().flatten() {
        grid[row(y)][col(x)] = '*';
    }
    match marker {
        Marker::Filled { x, y } => grid[row(y)][col(x)] = '@',
        Marker::Hollow { x, y } => grid[row(y)][col(x)] = 'o',
        Marker::Hidden { .. } => {}
    }

    let mut out = format!(
        "y ∈ [{y_min:.2}, {y_max:.2}], x ∈ [{:.2}, {:.2}]\n",
        window.x_min, window.x_max
    );
    for line in grid {
        out.extend(line);
        out.push('\n');
    }
    out
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let analyzer = cli.analyzer();

    let report = match analyzer.run(cli.mode, &cli.expression, cli.point) {
        Ok(report) => report,
        Err(e) => {
            error!(expression = %cli.expression, error = %e, "analysis failed");
            if cli.json {
                match serde_json::to_string_pretty(&e.as_step()) {
                    Ok(json) => println!("{json}"),
                    Err(_) => println!("{e}"),
                }
            } else {
                print_step(&e.as_step(), false);
            }
            process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!(error = %e, "could not serialize report");
                process::exit(1);
            }
        }
    } else {
        print_report(&report, cli.latex);
    }

    if cli.plot {
        if let Ok(expression) = analyzer.parse(&cli.expression) {
            println!();
            print!("{}", render_plot(&expression, &analyzer, cli.point));
        }
    }
}
