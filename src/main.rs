use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use recon::config::{self, Settings};
use recon::rbac::{self, RbacData, RbacSheet};
use recon::reconcile::{self, GroupDiffRecord, Reconciliation, UserSetDiff};
use recon::report::{self, source, LineFilter, ReportError, UserMap};

#[derive(Parser)]
#[command(
    name = "recon",
    author,
    version,
    about = "Reconcile RUGAR access reports against the RBAC workbook",
    long_about = r#"recon parses the RUGAR "Users Group Access Report" (R01RUGAR_<YYYYMMDD>.rpt) and compares its operators and group memberships with the profile assignments exported from the RBAC workbook.

Configuration comes from the environment or a .env file:
  RUGAR_REPORT_DIR       directory holding the reports (default: .)
  RUGAR_REPORT_DATE      report date to load, YYYYMMDD (default: newest report)
  RBAC_JSON_DIR          directory of exported RBAC sheets (default: ./files/json)
  RUGAR_DISCARD_PHRASES  '|'-separated noise phrases overriding the built-in list

Examples:
  recon parse --date 20241030
  recon users --report ./R01RUGAR_20241030.rpt
  recon check --json
"#,
    after_help = "Use `recon <subcommand> --help` to get subcommand specific options."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Args, Clone, Default)]
struct ReportArgs {
    /// Explicit report file; overrides --date
    #[arg(long)]
    report: Option<PathBuf>,
    /// Report date (YYYYMMDD) looked up in RUGAR_REPORT_DIR
    #[arg(long)]
    date: Option<String>,
    /// Path to .env file
    #[arg(long)]
    env_file: Option<String>,
    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone, Default)]
struct RbacArgs {
    /// Directory of exported RBAC sheets; overrides RBAC_JSON_DIR
    #[arg(long)]
    rbac_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a report and list its operators
    #[command(about = "Parse a RUGAR report", long_about = "Parse a RUGAR report and list every operator with the groups it holds. Repeated operators are merged.")]
    Parse {
        #[command(flatten)]
        report: ReportArgs,
    },
    /// Operators present in only one source
    #[command(about = "Compare operator lists", long_about = "List operators present in the report but not in RBAC, and operators assigned a profile in RBAC but absent from the report.")]
    Users {
        #[command(flatten)]
        report: ReportArgs,
        #[command(flatten)]
        rbac: RbacArgs,
    },
    /// Group membership mismatches
    #[command(about = "Compare group memberships", long_about = "For every RBAC profile assignment whose operator appears in the report, list groups granted in one source but not the other. Matching assignments are not shown.")]
    Groups {
        #[command(flatten)]
        report: ReportArgs,
        #[command(flatten)]
        rbac: RbacArgs,
    },
    /// Run both comparisons
    #[command(about = "Run the full reconciliation", long_about = "Run the operator and group comparisons together. With --fail-on-diff the exit code is 2 when any anomaly is found.")]
    Check {
        #[command(flatten)]
        report: ReportArgs,
        #[command(flatten)]
        rbac: RbacArgs,
        /// Exit with status 2 when differences are found
        #[arg(long)]
        fail_on_diff: bool,
    },
    /// Show the resolved configuration and check that inputs exist
    CheckConfig {
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    match run(cli.command).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            tracing::error!(%e, "Command failed");
            eprintln!("{}: {}", yansi::Paint::red("Error"), e);
            if let recon::Error::Report(ReportError::NotFound { .. }) = &e {
                eprintln!(
                    "{}",
                    yansi::Paint::yellow("Check RUGAR_REPORT_DIR / --date, or pass the file with --report.")
                );
            }
            process::exit(1);
        }
    }
}

async fn run(command: Commands) -> Result<i32, recon::Error> {
    match command {
        Commands::Parse { report } => {
            let settings = settings_for(report.env_file.as_deref());
            let users = load_users(&settings, &report).await?;
            if report.json {
                print_json(&users.values().collect::<Vec<_>>());
            } else {
                print_users(&users);
            }
            Ok(0)
        }
        Commands::Users { report, rbac } => {
            let settings = settings_for(report.env_file.as_deref());
            let (users, rbac_data) = load_both(&settings, &report, &rbac).await?;
            let diff = reconcile::diff_user_sets(users.keys(), rbac_data.user_ids());
            if report.json {
                print_json(&diff);
            } else {
                print_user_diff(&diff);
            }
            Ok(0)
        }
        Commands::Groups { report, rbac } => {
            let settings = settings_for(report.env_file.as_deref());
            let (users, rbac_data) = load_both(&settings, &report, &rbac).await?;
            let diff = reconcile::diff_user_groups(&users, &rbac_data.profile_users);
            if report.json {
                print_json(&diff);
            } else {
                print_group_diff(&diff);
            }
            Ok(0)
        }
        Commands::Check { report, rbac, fail_on_diff } => {
            let settings = settings_for(report.env_file.as_deref());
            let (users, rbac_data) = load_both(&settings, &report, &rbac).await?;
            let result = reconcile::reconcile(&users, &rbac_data.profile_users);
            if report.json {
                print_json(&result);
            } else {
                print_reconciliation(&result);
            }
            Ok(if fail_on_diff && !result.is_clean() { 2 } else { 0 })
        }
        Commands::CheckConfig { env_file } => {
            let settings = settings_for(env_file.as_deref());
            Ok(if check_config(&settings) { 0 } else { 1 })
        }
    }
}

fn settings_for(env_file: Option<&str>) -> Settings {
    config::load_env_file(env_file);
    Settings::from_env()
}

/// `--report`, then `--date`, then `RUGAR_REPORT_DATE`, then the newest report in the directory.
fn resolve_report_path(settings: &Settings, args: &ReportArgs) -> Result<PathBuf, ReportError> {
    if let Some(path) = &args.report {
        return Ok(path.clone());
    }
    if let Some(raw) = args.date.as_ref().or(settings.report_date.as_ref()) {
        let date = source::parse_report_date(raw)?;
        return Ok(source::report_path(&settings.report_dir, date));
    }
    match source::find_latest_report(&settings.report_dir)? {
        Some((date, path)) => {
            tracing::info!("No report date given; using newest report {}", date);
            Ok(path)
        }
        None => Err(ReportError::NotFound {
            path: settings.report_dir.join(format!("{}*.{}", config::REPORT_FILE_PREFIX, config::REPORT_FILE_EXTENSION)),
        }),
    }
}

async fn load_users(settings: &Settings, args: &ReportArgs) -> Result<UserMap, ReportError> {
    let path = resolve_report_path(settings, args)?;
    let filter = LineFilter::new(settings.discard_phrases.iter().cloned());

    let spinner = spinner(format!("Parsing {}", path.display()));
    let result = report::load_report(&path, filter).await;
    spinner.finish_and_clear();
    result
}

async fn load_both(
    settings: &Settings,
    report_args: &ReportArgs,
    rbac_args: &RbacArgs,
) -> Result<(UserMap, RbacData), recon::Error> {
    let users = load_users(settings, report_args).await?;
    let dir = rbac_args.rbac_dir.clone().unwrap_or_else(|| settings.rbac_dir.clone());
    let rbac_data = rbac::load_rbac_dir(&dir).await?;
    Ok((users, rbac_data))
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("{}: {}", yansi::Paint::red("Failed to serialize output"), e);
            process::exit(1);
        }
    }
}

fn print_users(users: &UserMap) {
    if users.is_empty() {
        println!("{}", yansi::Paint::yellow("The report lists no operators."));
        return;
    }
    let mut table = new_table();
    table.set_header(vec!["Operator ID", "Name", "Groups"]);
    for user in users.values() {
        table.add_row(vec![
            user.operator_id.clone(),
            user.display_name.clone(),
            user.sorted_groups().join(", "),
        ]);
    }
    println!("\n{table}");
    println!("\n{}\n", yansi::Paint::new(format!("{} operators", users.len())).dim());
}

fn print_user_diff(diff: &UserSetDiff) {
    if diff.is_empty() {
        println!("{}", yansi::Paint::green("Both sources list the same operators."));
        return;
    }
    let mut table = new_table();
    table.set_header(vec!["Only in report", "Only in RBAC"]);
    let rows = diff.only_in_report.len().max(diff.only_in_rbac.len());
    for i in 0..rows {
        table.add_row(vec![
            diff.only_in_report.get(i).cloned().unwrap_or_default(),
            diff.only_in_rbac.get(i).cloned().unwrap_or_default(),
        ]);
    }
    println!("\n{table}");
    println!("\n{}\n", yansi::Paint::new(user_diff_summary(diff)).yellow());
}

fn user_diff_summary(diff: &UserSetDiff) -> String {
    format!(
        "{} only in report, {} only in RBAC",
        diff.only_in_report.len(),
        diff.only_in_rbac.len()
    )
}

fn print_group_diff(diff: &[GroupDiffRecord]) {
    if diff.is_empty() {
        println!("{}", yansi::Paint::green("Group memberships match for every shared operator."));
        return;
    }
    let mut table = new_table();
    table.set_header(vec!["Operator", "Profile", "Only in RBAC", "Only in report", "RBAC groups", "Report groups"]);
    for rec in diff {
        table.add_row(vec![
            rec.operator_id.clone(),
            rec.profile.clone(),
            rec.groups_only_in_rbac.join(", "),
            rec.groups_only_in_report.join(", "),
            rec.rbac_groups.join(", "),
            rec.report_groups.join(", "),
        ]);
    }
    println!("\n{table}");
    println!("\n{}\n", yansi::Paint::new(group_diff_summary(diff)).yellow());
}

fn group_diff_summary(diff: &[GroupDiffRecord]) -> String {
    match diff.len() {
        1 => "1 assignment needs review".to_string(),
        n => format!("{} assignments need review", n),
    }
}

fn print_reconciliation(result: &Reconciliation) {
    println!("{}", yansi::Paint::new("Operators").bold().underline());
    print_user_diff(&result.users);
    println!("{}", yansi::Paint::new("Group memberships").bold().underline());
    print_group_diff(&result.groups);
    if result.is_clean() {
        println!("{}", yansi::Paint::green("No differences found.").bold());
    }
}

fn check_config(settings: &Settings) -> bool {
    let mut ok = true;
    let mut table = new_table();
    table.set_header(vec!["Setting", "Value", "Status"]);

    table.add_row(vec![
        "RUGAR_REPORT_DIR".to_string(),
        settings.report_dir.display().to_string(),
        dir_status(&settings.report_dir, &mut ok),
    ]);

    let date_status = match &settings.report_date {
        Some(raw) => match source::parse_report_date(raw) {
            Ok(date) => {
                let path = source::report_path(&settings.report_dir, date);
                if path.is_file() {
                    "found".to_string()
                } else {
                    ok = false;
                    format!("missing {}", path.display())
                }
            }
            Err(e) => {
                ok = false;
                e.to_string()
            }
        },
        None => match source::find_latest_report(&settings.report_dir) {
            Ok(Some((date, _))) => format!("newest report: {}", date.format("%Y%m%d")),
            Ok(None) => {
                ok = false;
                "no report found".to_string()
            }
            Err(e) => {
                ok = false;
                e.to_string()
            }
        },
    };
    table.add_row(vec![
        "RUGAR_REPORT_DATE".to_string(),
        settings.report_date.clone().unwrap_or_else(|| "(newest)".to_string()),
        date_status,
    ]);

    table.add_row(vec![
        "RBAC_JSON_DIR".to_string(),
        settings.rbac_dir.display().to_string(),
        dir_status(&settings.rbac_dir, &mut ok),
    ]);
    let sheets = rbac::available_sheets(&settings.rbac_dir);
    for sheet in RbacSheet::all() {
        let present = sheets.contains(sheet);
        if !present && *sheet == RbacSheet::ProfileUsers {
            ok = false;
        }
        table.add_row(vec![
            format!("  {}", sheet),
            sheet.file_name(),
            sheet_status(*sheet, present).to_string(),
        ]);
    }

    table.add_row(vec![
        "RUGAR_DISCARD_PHRASES".to_string(),
        settings.discard_phrases.join(" | "),
        format!("{} phrases", settings.discard_phrases.len()),
    ]);

    println!("\n{table}\n");
    if ok {
        println!("{}", yansi::Paint::green("Configuration looks valid"));
    } else {
        eprintln!("{}", yansi::Paint::red("Configuration is incomplete"));
    }
    ok
}

fn sheet_status(sheet: RbacSheet, present: bool) -> &'static str {
    match (present, sheet) {
        (true, _) => "found",
        (false, RbacSheet::ProfileUsers) => "missing (required)",
        (false, RbacSheet::Profiles | RbacSheet::ProfileGroups) => "missing",
        (false, _) => "missing (not used)",
    }
}

fn dir_status(dir: &Path, ok: &mut bool) -> String {
    if dir.is_dir() {
        "ok".to_string()
    } else {
        *ok = false;
        "not a directory".to_string()
    }
}
